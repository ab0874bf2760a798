//! Team directory traits and implementations

use crate::error::{RankingError, Result};
use crate::types::{TeamId, TeamInfo};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Trait for looking up team display metadata
#[cfg_attr(test, mockall::automock)]
pub trait TeamDirectory: Send + Sync {
    /// All known teams
    fn teams(&self) -> Result<Vec<TeamInfo>>;

    /// A single team by id
    fn team(&self, id: &TeamId) -> Result<Option<TeamInfo>> {
        Ok(self.teams()?.into_iter().find(|team| &team.id == id))
    }
}

/// Fixed list of teams, typically loaded from a JSON file
#[derive(Debug, Clone, Default)]
pub struct StaticTeamDirectory {
    teams: Vec<TeamInfo>,
}

impl StaticTeamDirectory {
    /// Create a directory from a list of teams, rejecting duplicate ids
    pub fn new(teams: Vec<TeamInfo>) -> Result<Self> {
        let mut seen = HashSet::new();
        for team in &teams {
            if !seen.insert(team.id.as_str()) {
                return Err(RankingError::ConfigurationError {
                    message: format!("Duplicate team id in directory: {}", team.id),
                }
                .into());
            }
        }

        Ok(Self { teams })
    }

    /// Load a JSON array of `{id, name, mascot}` objects
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| RankingError::ConfigurationError {
            message: format!("Failed to read team directory {}: {}", path.display(), e),
        })?;
        let teams: Vec<TeamInfo> =
            serde_json::from_str(&contents).map_err(|e| RankingError::ConfigurationError {
                message: format!("Failed to parse team directory {}: {}", path.display(), e),
            })?;

        debug!("Loaded {} teams from {}", teams.len(), path.display());
        Self::new(teams)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

impl TeamDirectory for StaticTeamDirectory {
    fn teams(&self) -> Result<Vec<TeamInfo>> {
        Ok(self.teams.clone())
    }
}
