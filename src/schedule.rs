//! Loading team score histories
//!
//! A schedule is a JSON array of teams, each with its weekly scores:
//!
//! ```json
//! [{ "id": "1", "scores": [null, { "score": 21, "opposingScore": 14, "opposingTeam": "2" }] }]
//! ```
//!
//! `scores[i]` is week `i + 1`; `null` marks a week the team did not play.

use crate::error::{RankingError, Result};
use crate::types::Team;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Parse a schedule from a JSON string
pub fn parse_schedule(json: &str) -> Result<Vec<Team>> {
    let teams: Vec<Team> = serde_json::from_str(json).map_err(|e| RankingError::InvalidSchedule {
        reason: e.to_string(),
    })?;
    validate_schedule(&teams)?;
    Ok(teams)
}

/// Read and parse a schedule file
pub fn load_schedule(path: impl AsRef<Path>) -> Result<Vec<Team>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| RankingError::InvalidSchedule {
        reason: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let teams = parse_schedule(&contents)?;
    debug!(
        "Loaded schedule for {} teams from {}",
        teams.len(),
        path.display()
    );
    Ok(teams)
}

/// Reject duplicate or empty team ids.
///
/// Games against teams missing from the schedule are allowed; the opponent
/// just counts as unrated.
pub fn validate_schedule(teams: &[Team]) -> Result<()> {
    let mut seen = HashSet::new();
    for team in teams {
        if team.id.is_empty() {
            return Err(RankingError::InvalidSchedule {
                reason: "Team with empty id".to_string(),
            }
            .into());
        }
        if !seen.insert(team.id.as_str()) {
            return Err(RankingError::InvalidSchedule {
                reason: format!("Duplicate team id: {}", team.id),
            }
            .into());
        }
    }

    for team in teams {
        for (week, game) in team.games() {
            if !seen.contains(game.opposing_team.as_str()) {
                warn!(
                    "Team {} played unknown opponent {} in week {}",
                    team.id, game.opposing_team, week
                );
            }
        }
    }

    Ok(())
}

/// Highest week number with any game
pub fn last_week(teams: &[Team]) -> u32 {
    teams
        .iter()
        .filter_map(|team| team.games().map(|(week, _)| week).last())
        .max()
        .unwrap_or(0)
}
