use std::time::Duration;

use anyhow::{Context, Result};
use gallery_db::schema::single_line;
use gallery_db::StatementPlan;
use reqwest::Client;
use serde::Serialize;

use super::types::{BatchRequest, D1Envelope, QueryRequest};
use crate::config::D1Config;

/// Request timeout for D1 API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the D1 HTTP query endpoint.
pub struct D1Client {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl D1Client {
    pub fn new(api_base: &str, account_id: &str, database_id: &str, api_token: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            endpoint: format!(
                "{}/accounts/{}/d1/database/{}/query",
                api_base.trim_end_matches('/'),
                account_id,
                database_id
            ),
            api_token: api_token.to_string(),
        }
    }

    /// Build a client from config, failing if any credential is missing.
    pub fn from_config(config: &D1Config) -> Result<Self> {
        let account_id = require(&config.account_id, "d1.account_id", crate::config::ENV_ACCOUNT_ID)?;
        let database_id = require(&config.database_id, "d1.database_id", crate::config::ENV_DATABASE_ID)?;
        let api_token = require(&config.api_token, "d1.api_token", crate::config::ENV_API_TOKEN)?;
        Ok(Self::new(&config.api_base, account_id, database_id, api_token))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send every statement of `plan` in one batch request.
    ///
    /// An empty plan sends nothing.
    pub async fn batch(&self, plan: &StatementPlan) -> Result<D1Envelope> {
        if plan.is_empty() {
            tracing::debug!("Empty statement plan, nothing to send");
            return Ok(D1Envelope::default());
        }

        tracing::debug!(
            "Attempting batch of {} queries ({} bound parameters)",
            plan.len(),
            plan.param_count()
        );
        let body = BatchRequest {
            batch: plan.statements(),
        };
        let envelope = self.post(&body, "Failed to send D1 batch query").await?;
        tracing::info!(
            "Batch query successful ({} rows changed)",
            envelope.total_changes()
        );
        Ok(envelope)
    }

    /// Send a single unparameterized query.
    pub async fn query(&self, sql: &str) -> Result<D1Envelope> {
        tracing::info!("Querying D1 with SQL string: {}", single_line(sql));
        self.post(&QueryRequest { sql }, "Failed to send D1 query")
            .await
    }

    async fn post<T: Serialize>(&self, body: &T, context_msg: &str) -> Result<D1Envelope> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await
            .context(context_msg.to_string())?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        tracing::debug!("HTTP {}: {}", status.as_u16(), text);

        if !status.is_success() {
            anyhow::bail!("{}: HTTP {}: {}", context_msg, status.as_u16(), text);
        }

        let envelope: D1Envelope = serde_json::from_str(&text)
            .with_context(|| format!("{}: unexpected response body", context_msg))?;

        if !envelope.success {
            anyhow::bail!("{}: {}", context_msg, envelope.error_summary());
        }

        Ok(envelope)
    }
}

fn require<'a>(value: &'a Option<String>, key: &str, env: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing {} (set it in the config file or {})", key, env))
}
