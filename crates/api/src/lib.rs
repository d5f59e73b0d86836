//! Shopsight API - Read-only analytics over e-commerce records.
//!
//! Exposes time-bucketed aggregates (sales totals, growth rates, customer
//! counts, geographic distribution, cohort lifetime value) computed from the
//! order and customer collections, for consumption by the dashboard.
//!
//! # Architecture
//!
//! Every request is handled independently: parse the query parameters, build
//! one aggregation pipeline, run it against the record store, and serialize
//! the rows as JSON. All aggregation work executes inside MongoDB; this
//! process only shapes pipelines and converts their results.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Unified error type with Sentry capture
//! - [`models`] - Stored record shapes and report row types
//! - [`routes`] - HTTP handlers and router assembly
//! - [`state`] - Shared application state
//! - [`store`] - Record store trait, pipelines, and implementations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
