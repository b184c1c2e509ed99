//! Remote query executor for Cloudflare D1.
//!
//! Statement plans are POSTed as `{"batch": [{"sql", "params"}, ...]}` to
//! the per-account, per-database query endpoint with a bearer token.
//! Failures come back as errors for the caller to log; nothing here retries.

mod client;
mod types;

pub use client::D1Client;
pub use types::{BatchRequest, D1Envelope, D1Message, QueryMeta, QueryRequest, QueryResult};
