//! Rating engine and rating persistence
//!
//! This module provides the iterative opponent-adjusted rating engine, the
//! shared rounding rule, and storage interfaces for computed ratings.

pub mod engine;
pub mod rounding;
pub mod storage;

// Re-export commonly used types
pub use engine::{
    quality_of_opponent, ratings_converged, running_average, EngineConfig, RankingEngine,
    RankingOutcome,
};
pub use rounding::round4;
pub use storage::{InMemoryRatingStorage, JsonFileRatingStorage, RatingStorage, StoredRating};
