//! Common types used throughout the ranking service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for teams
pub type TeamId = String;

/// Season identifier, opaque to the rating engine
pub type Season = u32;

/// 1-based week number within a season
pub type Week = u32;

/// One game from a team's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Points scored by this team
    pub score: u32,
    /// Points scored by the opponent
    pub opposing_score: u32,
    /// Identifier of the opponent
    pub opposing_team: TeamId,
}

impl ScoreEntry {
    pub fn new(score: u32, opposing_score: u32, opposing_team: impl Into<TeamId>) -> Self {
        Self {
            score,
            opposing_score,
            opposing_team: opposing_team.into(),
        }
    }

    /// Ties count as losses.
    pub fn is_win(&self) -> bool {
        self.score > self.opposing_score
    }

    pub fn margin(&self) -> u32 {
        self.score.abs_diff(self.opposing_score)
    }
}

/// A team and its weekly score history
///
/// `scores[i]` holds week `i + 1`; `None` means the team did not play that week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(default)]
    pub scores: Vec<Option<ScoreEntry>>,
}

impl Team {
    pub fn new(id: impl Into<TeamId>) -> Self {
        Self {
            id: id.into(),
            scores: Vec::new(),
        }
    }

    /// Record a game in the given 1-based week, padding skipped weeks with `None`.
    pub fn add_game(&mut self, week: Week, entry: ScoreEntry) {
        let index = week.saturating_sub(1) as usize;
        if self.scores.len() <= index {
            self.scores.resize(index + 1, None);
        }
        self.scores[index] = Some(entry);
    }

    pub fn with_game(mut self, week: Week, entry: ScoreEntry) -> Self {
        self.add_game(week, entry);
        self
    }

    /// Whether the team has a game in the given 1-based week
    pub fn plays_in(&self, week: Week) -> bool {
        let Some(index) = (week as usize).checked_sub(1) else {
            return false;
        };
        matches!(self.scores.get(index), Some(Some(_)))
    }

    /// Iterate over the weeks with a score entry, as (week number, entry).
    pub fn games(&self) -> impl Iterator<Item = (Week, &ScoreEntry)> {
        self.scores
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_ref().map(|e| (index as Week + 1, e)))
    }
}

/// Derived per-week rating detail for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRecord {
    /// Value of the game
    #[serde(rename = "v")]
    pub value_of_win: f64,
    #[serde(rename = "w")]
    pub win: bool,
    #[serde(rename = "s")]
    pub score: u32,
    #[serde(rename = "os")]
    pub opposing_score: u32,
    #[serde(rename = "mv")]
    pub margin_value: f64,
    #[serde(rename = "o")]
    pub opponent: TeamId,
    /// Opponent's rating when this game was evaluated
    #[serde(rename = "qoo")]
    pub quality_of_opponent: f64,
    /// Weighted share of `quality_of_opponent` added to the value
    #[serde(rename = "qoov")]
    pub quality_of_opponent_value: f64,
}

/// Rating of a single team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub rating: f64,
    pub id: TeamId,
    /// Indexed by week - 1; `None` for weeks without a game
    pub weeks: Vec<Option<WeekRecord>>,
}

impl TeamRating {
    pub fn new(id: impl Into<TeamId>) -> Self {
        Self {
            rating: 0.0,
            id: id.into(),
            weeks: Vec::new(),
        }
    }

    /// Week record for a 1-based week number
    pub fn week(&self, week: Week) -> Option<&WeekRecord> {
        let index = (week as usize).checked_sub(1)?;
        self.weeks.get(index).and_then(Option::as_ref)
    }

    /// Store a week record, overwriting whatever was in that slot
    pub fn set_week(&mut self, week: Week, record: WeekRecord) {
        let index = week.saturating_sub(1) as usize;
        if self.weeks.len() <= index {
            self.weeks.resize(index + 1, None);
        }
        self.weeks[index] = Some(record);
    }

    pub fn games_played(&self) -> usize {
        self.weeks.iter().flatten().count()
    }

    pub fn wins(&self) -> usize {
        self.weeks.iter().flatten().filter(|record| record.win).count()
    }
}

/// Team id to rating; the unit of convergence comparison
pub type RatingsMap = BTreeMap<TeamId, TeamRating>;

/// Display metadata for a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: TeamId,
    pub name: String,
    pub mascot: String,
}
