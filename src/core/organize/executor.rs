//! Executor for placement decisions.

use super::ops::FileOps;
use crate::core::placement::{FileMove, PlacementDecision};
use crate::error::OrganizeError;
use std::collections::HashSet;
use std::path::PathBuf;

/// Applies decisions through a `FileOps` capability
pub struct OrganizeExecutor<'a> {
    ops: &'a dyn FileOps,
    created_dirs: HashSet<PathBuf>,
    folders_created: usize,
}

impl<'a> OrganizeExecutor<'a> {
    pub fn new(ops: &'a dyn FileOps) -> Self {
        Self {
            ops,
            created_dirs: HashSet::new(),
            folders_created: 0,
        }
    }

    /// Perform the quarantine move (if any), then the primary move
    ///
    /// Stops at the first failure; a completed quarantine move is not undone.
    pub fn apply(&mut self, decision: &PlacementDecision) -> Result<(), OrganizeError> {
        for file_move in decision.moves() {
            self.apply_move(&file_move)?;
        }
        Ok(())
    }

    /// Directories this executor had to create
    pub fn folders_created(&self) -> usize {
        self.folders_created
    }

    fn apply_move(&mut self, file_move: &FileMove) -> Result<(), OrganizeError> {
        if let Some(parent) = file_move.to.parent() {
            if !self.created_dirs.contains(parent) {
                if !parent.exists() {
                    self.ops.create_dir_all(parent)?;
                    self.folders_created += 1;
                }
                self.created_dirs.insert(parent.to_path_buf());
            }
        }

        tracing::info!(
            from = %file_move.from.display(),
            to = %file_move.to.display(),
            dry_run = self.ops.is_dry_run(),
            "moving"
        );
        self.ops.move_file(&file_move.from, &file_move.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::organize::{DryRunFileOps, FsFileOps};
    use crate::core::placement::{MatchMethod, PlacementKind};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn apply_moves_into_new_date_directory() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("IMG_1.jpg");
        fs::write(&src, b"test content").unwrap();
        let dest = temp.path().join("archive/2024/01/15/IMG_1.jpg");

        let decision = PlacementDecision {
            source: src.clone(),
            destination: dest.clone(),
            quarantine: None,
            kind: PlacementKind::New,
        };

        let mut executor = OrganizeExecutor::new(&FsFileOps);
        executor.apply(&decision).unwrap();

        assert!(!src.exists());
        assert!(dest.exists());
        assert_eq!(executor.folders_created(), 1);
    }

    #[test]
    fn apply_quarantines_then_swaps_match() {
        let temp = TempDir::new().unwrap();
        let incoming = temp.path().join("card/DCIM_0099.jpg");
        let matched = temp.path().join("archive/2021/01/02/IMG_0099.jpg");
        fs::create_dir_all(incoming.parent().unwrap()).unwrap();
        fs::create_dir_all(matched.parent().unwrap()).unwrap();
        fs::write(&incoming, b"incoming").unwrap();
        fs::write(&matched, b"archived").unwrap();

        let canonical = temp.path().join("archive/2021/01/02/DCIM_0099.jpg");
        let quarantined = temp.path().join("dup/DCIM_0099.jpg");
        let decision = PlacementDecision {
            source: matched.clone(),
            destination: canonical.clone(),
            quarantine: Some(FileMove {
                from: incoming.clone(),
                to: quarantined.clone(),
            }),
            kind: PlacementKind::ReplacesMatch {
                matched: matched.clone(),
                by: MatchMethod::Name,
            },
        };

        OrganizeExecutor::new(&FsFileOps).apply(&decision).unwrap();

        assert_eq!(fs::read(&quarantined).unwrap(), b"incoming");
        assert_eq!(fs::read(&canonical).unwrap(), b"archived");
        assert!(!incoming.exists());
        assert!(!matched.exists());
    }

    #[test]
    fn apply_reports_missing_source() {
        let temp = TempDir::new().unwrap();
        let decision = PlacementDecision {
            source: temp.path().join("gone.jpg"),
            destination: temp.path().join("2024/01/15/gone.jpg"),
            quarantine: None,
            kind: PlacementKind::New,
        };

        let result = OrganizeExecutor::new(&FsFileOps).apply(&decision);

        assert!(matches!(result, Err(OrganizeError::Move { .. })));
    }

    #[test]
    fn dry_run_leaves_tree_untouched() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("IMG_1.jpg");
        fs::write(&src, b"x").unwrap();
        let dest = temp.path().join("archive/2024/01/15/IMG_1.jpg");

        let decision = PlacementDecision {
            source: src.clone(),
            destination: dest.clone(),
            quarantine: None,
            kind: PlacementKind::New,
        };

        OrganizeExecutor::new(&DryRunFileOps).apply(&decision).unwrap();

        assert!(src.exists());
        assert!(!dest.parent().unwrap().exists());
    }
}
