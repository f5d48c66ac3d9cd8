//! # photo-classify CLI
//!
//! Files photos and videos into a `YYYY/MM/DD` archive, setting duplicates aside.
//!
//! ## Usage
//! ```bash
//! photo-classify /Volumes/CARD/DCIM
//! photo-classify ./import --dry-run --output json
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    photo_classify::init_tracing();

    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
