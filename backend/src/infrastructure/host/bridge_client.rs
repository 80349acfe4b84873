use crate::domain::ports::{CapabilityError, CapabilityResult};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP client for the host-side command bridge.
#[derive(Clone)]
pub struct BridgeClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BridgeClient {
    /// `request_timeout` bounds each whole request, including a bridge that
    /// accepts the connection and never answers.
    pub fn new(
        base_url: String,
        token: Option<String>,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);
        if let Some(limit) = request_timeout {
            builder = builder.timeout(limit);
        }
        let client = builder
            .build()
            .context("failed to build host bridge http client")?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` to `{base_url}{path}`. `label` names the call in errors.
    ///
    /// A 2xx reply counts as success unless its JSON body says `"ok": false`.
    pub async fn post(&self, path: &str, label: &str, body: &Value) -> CapabilityResult {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|error| CapabilityError::Transport(format!("{url}: {error}")))?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(CapabilityError::Rejected {
                command: label.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        if let Ok(payload) = serde_json::from_str::<Value>(&text) {
            if payload.get("ok").and_then(Value::as_bool) == Some(false) {
                let reason = payload
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("host reported failure")
                    .to_string();
                return Err(CapabilityError::Rejected {
                    command: label.to_string(),
                    status: status.as_u16(),
                    body: reason,
                });
            }
        }
        Ok(())
    }
}
