//! Integration tests for Shopsight.
//!
//! # Running Tests
//!
//! ```bash
//! # Start MongoDB and seed the analytics collections
//! docker compose up -d mongodb
//!
//! # Start the API
//! cargo run -p shopsight-api
//!
//! # Run integration tests
//! cargo test -p shopsight-integration-tests -- --ignored
//! ```
//!
//! All tests are `#[ignore]`d by default: they need a running server backed
//! by a seeded MongoDB, which CI does not provide.

#![cfg_attr(not(test), forbid(unsafe_code))]

/// Base URL for the analytics API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("SHOPSIGHT_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// HTTP client for talking to the API under test.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}
