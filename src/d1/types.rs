use serde::{Deserialize, Serialize};

use gallery_db::Statement;

/// Body of a batched query request.
#[derive(Debug, Serialize)]
pub struct BatchRequest<'a> {
    pub batch: &'a [Statement],
}

/// Body of a single query request.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub sql: &'a str,
}

/// Response envelope returned by the Cloudflare API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct D1Envelope {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub errors: Vec<D1Message>,

    #[serde(default)]
    pub messages: Vec<D1Message>,

    #[serde(default)]
    pub result: Vec<QueryResult>,
}

impl D1Envelope {
    /// Rows changed across every statement, as reported by D1.
    pub fn total_changes(&self) -> u64 {
        self.result
            .iter()
            .filter_map(|r| r.meta.as_ref().and_then(|m| m.changes))
            .sum()
    }

    /// Error messages joined for logging.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("[{}] {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct D1Message {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Outcome of one statement in a request.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    #[serde(default = "default_true")]
    pub success: bool,

    #[serde(default)]
    pub results: Vec<serde_json::Value>,

    #[serde(default)]
    pub meta: Option<QueryMeta>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryMeta {
    #[serde(default)]
    pub changes: Option<u64>,
    #[serde(default)]
    pub rows_written: Option<u64>,
    #[serde(default)]
    pub duration: Option<f64>,
}
