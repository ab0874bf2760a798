//! Ranking snapshot and index file publishing
//!
//! Rankings are published as static JSON files: one snapshot per season and
//! week, plus an `index.json` listing every snapshot and the team metadata.

pub mod index;
pub mod snapshot;

pub use index::{build_index, RankingIndex, TeamSummary, INDEX_FILE_NAME};
pub use snapshot::snapshot_file_name;

use crate::error::{RankingError, Result};
use crate::rating::StoredRating;
use crate::teams::TeamDirectory;
use crate::types::{Season, Week};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes ranking snapshots and the index into one directory
#[derive(Debug, Clone)]
pub struct RankingPublisher {
    rankings_dir: PathBuf,
}

impl RankingPublisher {
    pub fn new(rankings_dir: impl Into<PathBuf>) -> Self {
        Self {
            rankings_dir: rankings_dir.into(),
        }
    }

    pub fn rankings_dir(&self) -> &Path {
        &self.rankings_dir
    }

    /// Write `<season>.<week>.json` with the ranked records
    pub fn write_snapshot(
        &self,
        season: Season,
        week: Week,
        rankings: &[StoredRating],
    ) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.rankings_dir.join(snapshot_file_name(season, week));
        let json = snapshot::render(rankings)?;
        write_file(&path, &json)?;

        info!(
            "Wrote ranking snapshot for season {} week {} ({} teams) to {}",
            season,
            week,
            rankings.len(),
            path.display()
        );
        Ok(path)
    }

    /// Rebuild `index.json` from the directory contents and team metadata
    pub fn write_index(&self, directory: &dyn TeamDirectory) -> Result<PathBuf> {
        self.ensure_dir()?;
        let index = build_index(&self.rankings_dir, &directory.teams()?)?;
        let path = self.rankings_dir.join(INDEX_FILE_NAME);
        write_file(&path, &serde_json::to_string(&index)?)?;

        info!(
            "Wrote ranking index with {} files and {} teams",
            index.files.len(),
            index.teams.len()
        );
        Ok(path)
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.rankings_dir).map_err(|e| {
            RankingError::PublishError {
                message: format!("Failed to create {}: {}", self.rankings_dir.display(), e),
            }
            .into()
        })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| {
        RankingError::PublishError {
            message: format!("Failed to write {}: {}", path.display(), e),
        }
        .into()
    })
}
