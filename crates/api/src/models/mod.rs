//! Data shapes for the analytics API.
//!
//! [`records`] describes the documents as stored in the collections;
//! [`reports`] describes the aggregated rows the endpoints serve.

pub mod records;
pub mod reports;
