//! Index of published ranking snapshots

use crate::error::{RankingError, Result};
use crate::types::{TeamId, TeamInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const INDEX_FILE_NAME: &str = "index.json";

/// Files never listed in the index
const IGNORED_FILES: [&str; 2] = [".DS_Store", INDEX_FILE_NAME];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub name: String,
    pub mascot: String,
}

/// Contents of `index.json`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankingIndex {
    /// Snapshot file names, sorted
    pub files: Vec<String>,
    pub teams: BTreeMap<TeamId, TeamSummary>,
}

/// Scan `rankings_dir` and pair the listing with team metadata
pub fn build_index(rankings_dir: &Path, teams: &[TeamInfo]) -> Result<RankingIndex> {
    let entries = fs::read_dir(rankings_dir).map_err(|e| RankingError::PublishError {
        message: format!("Failed to list {}: {}", rankings_dir.display(), e),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RankingError::PublishError {
            message: format!("Failed to list {}: {}", rankings_dir.display(), e),
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !IGNORED_FILES.contains(&name.as_str()) {
            files.push(name);
        }
    }
    files.sort();

    let teams = teams
        .iter()
        .map(|team| {
            (
                team.id.clone(),
                TeamSummary {
                    name: team.name.clone(),
                    mascot: team.mascot.clone(),
                },
            )
        })
        .collect();

    Ok(RankingIndex { files, teams })
}
