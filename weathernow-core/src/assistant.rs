//! Answer backends and the fallback chain that tries them in order.

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    Config,
    assistant::{remote::RemoteBackend, rules::RuleBasedBackend},
    model::AskRequest,
};

pub mod remote;
pub mod rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    Rules,
    Remote,
}

impl BackendId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Rules => "rules",
            BackendId::Remote => "remote",
        }
    }

    pub const fn all() -> &'static [BackendId] {
        &[BackendId::Rules, BackendId::Remote]
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BackendId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "rules" => Ok(BackendId::Rules),
            "remote" => Ok(BackendId::Remote),
            _ => Err(anyhow!("Unknown answer backend '{value}'. Supported backends: rules, remote.")),
        }
    }
}

/// Anything that can answer a question about a snapshot.
#[async_trait]
pub trait AnswerBackend: Send + Sync + Debug {
    fn id(&self) -> BackendId;

    async fn ask(&self, request: &AskRequest) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answered {
    pub answer: String,
    pub backend: BackendId,
}

/// Backends in priority order. The first one to succeed answers.
#[derive(Debug)]
pub struct FallbackChain {
    backends: Vec<Box<dyn AnswerBackend>>,
}

impl FallbackChain {
    pub fn new(backends: Vec<Box<dyn AnswerBackend>>) -> Self {
        Self { backends }
    }

    pub fn rules_only() -> Self {
        Self::new(vec![Box::new(RuleBasedBackend)])
    }

    /// Build the chain from `[assistant]` in config.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let ids = config.backend_ids()?;
        if ids.is_empty() {
            return Err(anyhow!(
                "No answer backends configured.\n\
                 Hint: set `backends = [\"rules\"]` under [assistant] or run `weathernow configure`."
            ));
        }

        let mut backends: Vec<Box<dyn AnswerBackend>> = Vec::with_capacity(ids.len());
        for id in ids {
            let backend: Box<dyn AnswerBackend> = match id {
                BackendId::Rules => Box::new(RuleBasedBackend),
                BackendId::Remote => {
                    let url = config.assistant.remote_url.as_deref().ok_or_else(|| {
                        anyhow!(
                            "The 'remote' answer backend needs a URL.\n\
                             Hint: set `remote_url` under [assistant] or run `weathernow configure`."
                        )
                    })?;
                    Box::new(RemoteBackend::new(url, config.weather.timeout())?)
                }
            };
            backends.push(backend);
        }

        Ok(Self::new(backends))
    }

    pub fn backend_ids(&self) -> Vec<BackendId> {
        self.backends.iter().map(|b| b.id()).collect()
    }

    pub async fn ask(&self, request: &AskRequest) -> anyhow::Result<Answered> {
        let mut last_error = None;

        for backend in &self.backends {
            match backend.ask(request).await {
                Ok(answer) => {
                    debug!(backend = %backend.id(), "answered");
                    return Ok(Answered { answer, backend: backend.id() });
                }
                Err(err) => {
                    warn!(backend = %backend.id(), error = %format!("{err:#}"), "answer backend failed, trying next");
                    last_error = Some((backend.id(), err));
                }
            }
        }

        match last_error {
            Some((id, err)) => Err(err.context(format!("All answer backends failed (last tried: {id})"))),
            None => Err(anyhow!("No answer backends configured")),
        }
    }
}
