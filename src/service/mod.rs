//! Service layer for league-ranker
//!
//! This module coordinates the rating engine with storage, team metadata and
//! snapshot publishing.

pub mod ranking;

pub use ranking::{RankingService, StoreOutcome};
