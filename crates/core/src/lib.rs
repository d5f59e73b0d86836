//! Shopsight Core - Shared types library.
//!
//! This crate provides common types used across all Shopsight components:
//! - `api` - Read-only analytics API serving the dashboard
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Time-bucketing vocabulary: reporting granularities, the
//!   calendar parts they decompose into, and the bucket keys aggregation
//!   results are grouped under

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
