//! Types for the placement module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A single rename to perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMove {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// How an existing destination file was found to be the same capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Same name or same trailing number
    Name,
    /// Tag comparison against every file in the directory
    ContentScan,
}

/// Why a destination was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlacementKind {
    /// Untagged media, filed by date without any reconciliation
    Simple,
    /// Nothing equivalent exists at the destination
    New,
    /// The same name and the same capture already exist; the source is quarantined
    DuplicateOfExisting { existing: PathBuf },
    /// The name is taken by a different capture; a `_1` suffix is added
    Disambiguated,
    /// An existing file under another name is the same capture. The source is
    /// quarantined and the existing file takes the source's canonical name.
    ReplacesMatch { matched: PathBuf, by: MatchMethod },
}

impl fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementKind::Simple => write!(f, "simple"),
            PlacementKind::New => write!(f, "new"),
            PlacementKind::DuplicateOfExisting { .. } => write!(f, "duplicate"),
            PlacementKind::Disambiguated => write!(f, "renamed"),
            PlacementKind::ReplacesMatch { by: MatchMethod::Name, .. } => {
                write!(f, "duplicate (name match)")
            }
            PlacementKind::ReplacesMatch { by: MatchMethod::ContentScan, .. } => {
                write!(f, "duplicate (content match)")
            }
        }
    }
}

/// The resolver's output for one file
///
/// `source -> destination` is the primary move. When a match is redirected,
/// `source` is the matched existing file and `quarantine` moves the incoming
/// file to the duplicate directory first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDecision {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub quarantine: Option<FileMove>,
    pub kind: PlacementKind,
}

impl PlacementDecision {
    /// Moves in execution order
    pub fn moves(&self) -> Vec<FileMove> {
        let mut moves: Vec<FileMove> = self.quarantine.iter().cloned().collect();
        moves.push(FileMove {
            from: self.source.clone(),
            to: self.destination.clone(),
        });
        moves
    }

    /// Whether some file ends up in the duplicate directory
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self.kind,
            PlacementKind::DuplicateOfExisting { .. } | PlacementKind::ReplacesMatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarantine_runs_before_primary_move() {
        let decision = PlacementDecision {
            source: PathBuf::from("/archive/2021/01/02/IMG_0099.jpg"),
            destination: PathBuf::from("/archive/2021/01/02/DCIM_0099.jpg"),
            quarantine: Some(FileMove {
                from: PathBuf::from("/card/DCIM_0099.jpg"),
                to: PathBuf::from("/dup/DCIM_0099.jpg"),
            }),
            kind: PlacementKind::ReplacesMatch {
                matched: PathBuf::from("/archive/2021/01/02/IMG_0099.jpg"),
                by: MatchMethod::Name,
            },
        };

        let moves = decision.moves();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].to, PathBuf::from("/dup/DCIM_0099.jpg"));
        assert_eq!(moves[1].from, PathBuf::from("/archive/2021/01/02/IMG_0099.jpg"));
        assert!(decision.is_duplicate());
    }

    #[test]
    fn kind_serializes_with_tag() {
        let json = serde_json::to_string(&PlacementKind::Disambiguated).unwrap();
        assert_eq!(json, r#"{"kind":"disambiguated"}"#);
    }
}
