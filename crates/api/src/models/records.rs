//! Stored record shapes for the analytics collections.
//!
//! All records are created by an upstream ingestion process; this API never
//! writes them. Creation timestamps are stored as strings in the live
//! collections, so every pipeline normalizes them with `$toDate` before
//! extracting calendar parts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default address embedded in a customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// A customer record from the customers collection.
///
/// The email is the identity key joining customers to orders. It is not
/// enforced as unique; duplicate emails join the same orders more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub default_address: Option<Address>,
}

/// An order record from the orders collection.
///
/// `total_price` is stored as text and parsed to a decimal amount at query
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub total_price: String,
}

/// A product record from the products collection.
///
/// Defined for completeness; no report reads products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}
