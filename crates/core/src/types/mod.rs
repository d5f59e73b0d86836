//! Core types for Shopsight.
//!
//! This module provides the time-bucketing vocabulary shared by the API and
//! its tests.

pub mod bucket;
pub mod granularity;

pub use bucket::TimeBucket;
pub use granularity::{Granularity, GranularityError, TimePart};
