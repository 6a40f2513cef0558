//! Client Access Protocol
//!
//! Endpoints and bodies a storage member serves so clients can write entries and
//! read them back. Every successful read bumps the entry's touch count.

use serde::{Deserialize, Serialize};

/// POST: write one entry into a named cache on the receiving member.
pub const ENDPOINT_PUT: &str = "/put";
/// GET `/get/{cache}/{key}`: read one entry and count the access.
pub const ENDPOINT_GET: &str = "/get";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub cache: String,
    /// Key in its encoded string form.
    pub key: String,
    /// Value as a JSON document; rejected when it does not parse.
    pub value_json: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    /// Absent when the cache or key is unknown.
    pub value_json: Option<String>,
}
