// =================================================================
// sink/client.rs - QuestDB HTTP Client
// =================================================================

use async_trait::async_trait;
use tracing::debug;

use super::errors::SinkError;
use crate::config::SinkConfig;

/// Anything that can accept an insert statement. Producer loops only see
/// this trait, so tests can swap in a scripted mock.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn submit(&self, statement: &str) -> Result<(), SinkError>;
}

/// QuestDB client speaking the text query protocol: the statement goes
/// out as the `query` parameter of an HTTP GET against `/exec`.
pub struct QuestDbClient {
    exec_url: String,
    client: reqwest::Client,
}

impl QuestDbClient {
    pub fn new(config: &SinkConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .expect("reqwest client build");

        Self {
            exec_url: format!("{}/exec", config.base_url.trim_end_matches('/')),
            client,
        }
    }

    /// Endpoint the client submits to, mainly for startup logging
    pub fn exec_url(&self) -> &str {
        &self.exec_url
    }
}

#[async_trait]
impl Sink for QuestDbClient {
    async fn submit(&self, statement: &str) -> Result<(), SinkError> {
        debug!("Submitting statement: {}", statement);

        let response = self
            .client
            .get(&self.exec_url)
            .query(&[("query", statement)])
            .send()
            .await
            .map_err(|e| SinkError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SinkError::Unexpected(e.to_string()))?;

        if !status.is_success() {
            return Err(SinkError::Rejected(format!("HTTP {}: {}", status, body)));
        }

        // QuestDB answers 200 with an `error` field when the statement
        // itself is bad (e.g. schema mismatch)
        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| SinkError::Unexpected(format!("invalid JSON body: {}", e)))?;

        if json.get("error").is_some() {
            let message = json["error"].as_str().unwrap_or("unknown sink error");
            return Err(SinkError::Rejected(message.to_string()));
        }

        Ok(())
    }
}
