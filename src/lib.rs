//! League Ranker - opponent-adjusted power ratings for weekly league results
//!
//! This crate computes a rating per team by repeatedly sweeping a season's
//! results until every team's rating is consistent with its opponents', then
//! stores the ratings and publishes ranked JSON snapshots.

pub mod config;
pub mod error;
pub mod metrics;
pub mod publish;
pub mod rating;
pub mod schedule;
pub mod service;
pub mod teams;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{RankingEngine, RankingOutcome, RatingStorage};
pub use service::{RankingService, StoreOutcome};
pub use teams::{StaticTeamDirectory, TeamDirectory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
