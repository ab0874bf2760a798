//! Team metadata lookup
//!
//! Ratings only carry team ids; this module provides the names and mascots
//! published alongside them.

pub mod directory;

pub use directory::{StaticTeamDirectory, TeamDirectory};
