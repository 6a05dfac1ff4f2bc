use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{model::AskRequest, provider::truncate_body};

use super::{AnswerBackend, BackendId};

/// Forwards the question to another service speaking the `/api/ai` contract.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    url: String,
    http: Client,
}

impl RemoteBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for remote assistant")?;

        Ok(Self { url: url.into(), http })
    }
}

#[derive(Debug, Deserialize)]
struct RemoteBody {
    answer: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl AnswerBackend for RemoteBackend {
    fn id(&self) -> BackendId {
        BackendId::Remote
    }

    async fn ask(&self, request: &AskRequest) -> Result<String> {
        let res = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to remote assistant at {}", self.url))?;

        let status = res.status();
        let body = res.text().await.context("Failed to read remote assistant response body")?;
        let parsed = serde_json::from_str::<RemoteBody>(&body);

        if !status.is_success() {
            let detail = parsed
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| truncate_body(&body));
            return Err(anyhow!("Remote assistant request failed with status {status}: {detail}"));
        }

        parsed
            .context("Failed to parse remote assistant JSON")?
            .answer
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| anyhow!("Remote assistant returned no answer"))
    }
}
