//! Opponent-adjusted rating engine
//!
//! Each team's rating is the running average of its weekly values of win.
//! A game's value depends on the result, the margin and the opponent's
//! current rating, so the whole league is swept repeatedly until a sweep
//! leaves the ratings mapping unchanged.

use crate::error::{RankingError, Result};
use crate::rating::rounding::round4;
use crate::types::{RatingsMap, ScoreEntry, Team, TeamId, TeamRating, Week, WeekRecord};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Base value awarded for a win
pub const WIN_VALUE: f64 = 0.5;
/// Floor of the margin value, and the pivot for the loss penalty
pub const MIN_MARGIN_VALUE: f64 = 0.2;
/// Damping constant in `margin / (margin + MARGIN_DAMPING)`
pub const MARGIN_DAMPING: f64 = 120.0;
/// Share of the opponent's rating added to a game's value
pub const QUALITY_OF_OPPONENT_WEIGHT: f64 = 0.3;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Give up after this many sweeps. `None` sweeps until stable.
    pub max_sweeps: Option<usize>,
}

impl EngineConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_sweeps == Some(0) {
            return Err(RankingError::ConfigurationError {
                message: "max_sweeps must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Converged ratings and the number of sweeps it took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub ratings: RatingsMap,
    pub sweeps: usize,
}

/// Iterative rating engine
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: EngineConfig,
}

impl RankingEngine {
    /// Create a new engine
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Zero ratings with no week records, one per team
    pub fn initial_ratings(teams: &[Team]) -> RatingsMap {
        teams
            .iter()
            .map(|team| (team.id.clone(), TeamRating::new(team.id.clone())))
            .collect()
    }

    /// Sweep until the ratings stop changing.
    ///
    /// Fails only when `max_sweeps` is configured and exhausted.
    pub fn build(&self, teams: &[Team]) -> Result<RankingOutcome> {
        let started = Instant::now();
        let mut ratings = Self::initial_ratings(teams);
        let mut sweeps = 0;

        loop {
            let previous = ratings.clone();
            Self::sweep(&mut ratings, teams);
            sweeps += 1;

            if ratings_converged(&previous, &ratings) {
                break;
            }

            debug!("Sweep {} changed ratings, sweeping again", sweeps);

            if let Some(max_sweeps) = self.config.max_sweeps {
                if sweeps >= max_sweeps {
                    warn!(
                        "Ratings for {} teams still changing after {} sweeps",
                        teams.len(),
                        sweeps
                    );
                    return Err(RankingError::NotConverged { sweeps }.into());
                }
            }
        }

        info!(
            "Iterations needed to compute rankings: {} ({} teams, {:?})",
            sweeps,
            teams.len(),
            started.elapsed()
        );

        Ok(RankingOutcome { ratings, sweeps })
    }

    /// One full pass over every team and week, in input order.
    ///
    /// Ratings are updated in place, so a team sees the new rating of any
    /// opponent processed before it in this sweep and the previous sweep's
    /// rating of any opponent processed after it.
    pub fn sweep(ratings: &mut RatingsMap, teams: &[Team]) {
        for team in teams {
            // Each team's average restarts from zero every sweep.
            if let Some(entry) = ratings.get_mut(&team.id) {
                entry.rating = 0.0;
            }

            for (week, score) in team.games() {
                Self::calculate(ratings, team, score, week);
            }
        }
    }

    /// Score one game and fold it into the team's running average.
    pub fn calculate(ratings: &mut RatingsMap, team: &Team, score: &ScoreEntry, week: Week) {
        let margin = f64::from(score.margin());
        let mut margin_value = (margin / (margin + MARGIN_DAMPING)).max(MIN_MARGIN_VALUE);
        let quality_of_opponent = quality_of_opponent(ratings, &score.opposing_team);
        let quality_of_opponent_value = round4(quality_of_opponent * QUALITY_OF_OPPONENT_WEIGHT);

        let win = score.is_win();
        let mut value_of_win = 0.0;
        if win {
            value_of_win = WIN_VALUE;
        } else {
            // Negative once the losing margin pushes margin_value past the floor.
            margin_value = MIN_MARGIN_VALUE - margin_value;
        }
        let margin_value = round4(margin_value);
        let value_of_win = round4(value_of_win + margin_value + quality_of_opponent_value);

        let Some(entry) = ratings.get_mut(&team.id) else {
            return;
        };

        entry.set_week(
            week,
            WeekRecord {
                value_of_win,
                win,
                score: score.score,
                opposing_score: score.opposing_score,
                margin_value,
                opponent: score.opposing_team.clone(),
                quality_of_opponent,
                quality_of_opponent_value,
            },
        );
        entry.rating = running_average(entry.rating, week, value_of_win);
    }
}

/// Current rating of an opponent, or 0.0 if unknown or not a number.
pub fn quality_of_opponent(ratings: &RatingsMap, opponent: &TeamId) -> f64 {
    let rating = ratings
        .get(opponent)
        .map(|entry| entry.rating)
        .filter(|rating| !rating.is_nan())
        .unwrap_or(0.0);

    round4(rating)
}

/// Fold a week's value into an average over calendar weeks.
///
/// The divisor is the week number, not the games played, so a bye week
/// dilutes the average like a zero-value game.
pub fn running_average(prior: f64, week: Week, value_of_win: f64) -> f64 {
    let week = f64::from(week.max(1));
    round4((prior * (week - 1.0) + value_of_win) / week)
}

/// True when two full ratings mappings are structurally identical.
pub fn ratings_converged(previous: &RatingsMap, current: &RatingsMap) -> bool {
    previous == current
}
