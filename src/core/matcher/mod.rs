//! # Matcher Module
//!
//! Finds an existing destination name that refers to the same logical file.
//!
//! Earlier runs may have stored a file under a prefixed name
//! (`2021_IMG_0099.jpg`) or a renumbered camera prefix (`DCIM_0099.jpg`).
//! Both are recognised: first by the full basename as a suffix, then by the
//! trailing numeric suffix (`0099.jpg`).

use regex::Regex;
use std::sync::OnceLock;

fn trailing_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.*?([0-9]+\..*)$").expect("valid trailing-number regex"))
}

/// Tail of `basename` starting at the first digit run that is directly
/// followed by a `.`, e.g. `1234.jpg` for `IMG_1234.jpg`
pub fn trailing_numeric_suffix(basename: &str) -> Option<&str> {
    trailing_number_regex()
        .captures(basename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Best existing match for `candidate` among `existing`
///
/// An existing name ending with the whole candidate wins over any name that
/// only shares the trailing numeric suffix. Without a suffix only the first
/// rule applies.
pub fn find_match<'a>(existing: &[&'a str], candidate: &str) -> Option<&'a str> {
    if let Some(name) = existing.iter().find(|name| name.ends_with(candidate)) {
        return Some(*name);
    }

    let suffix = trailing_numeric_suffix(candidate)?;
    existing.iter().find(|name| name.ends_with(suffix)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_starts_at_digit_run_before_dot() {
        assert_eq!(trailing_numeric_suffix("IMG_1234.jpg"), Some("1234.jpg"));
        assert_eq!(trailing_numeric_suffix("DCIM_0099.jpg"), Some("0099.jpg"));
        assert_eq!(trailing_numeric_suffix("2021_IMG_5.jpg"), Some("5.jpg"));
    }

    #[test]
    fn no_suffix_without_digits_before_dot() {
        assert_eq!(trailing_numeric_suffix("holiday.jpg"), None);
        assert_eq!(trailing_numeric_suffix("IMG_12a.jpg"), None);
        assert_eq!(trailing_numeric_suffix("1234"), None);
    }

    #[test]
    fn renumbered_prefix_matches_on_suffix() {
        let existing = ["IMG_0099.jpg"];
        assert_eq!(find_match(&existing, "DCIM_0099.jpg"), Some("IMG_0099.jpg"));
    }

    #[test]
    fn unrelated_names_do_not_match() {
        let existing = ["a.jpg"];
        assert_eq!(find_match(&existing, "b.jpg"), None);
    }

    #[test]
    fn prefixed_destination_name_matches_exactly() {
        let existing = ["IMG_0007.jpg", "2021_IMG_0007.jpg"];
        assert_eq!(find_match(&existing, "IMG_0007.jpg"), Some("IMG_0007.jpg"));

        let existing = ["DSC_0007.jpg", "trip_IMG_0007.jpg"];
        assert_eq!(find_match(&existing, "IMG_0007.jpg"), Some("trip_IMG_0007.jpg"));
    }

    #[test]
    fn name_without_suffix_only_matches_exactly() {
        let existing = ["holidayNone", "my_holiday.jpg"];
        assert_eq!(find_match(&existing, "holiday.jpg"), Some("my_holiday.jpg"));
        assert_eq!(find_match(&existing[..1], "holiday.jpg"), None);
    }

    #[test]
    fn empty_directory_has_no_match() {
        let existing: [&str; 0] = [];
        assert_eq!(find_match(&existing, "IMG_1.jpg"), None);
    }
}
