use async_trait::async_trait;

use crate::{composer::compose, model::AskRequest};

use super::{AnswerBackend, BackendId};

/// Local keyword rules. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedBackend;

#[async_trait]
impl AnswerBackend for RuleBasedBackend {
    fn id(&self) -> BackendId {
        BackendId::Rules
    }

    async fn ask(&self, request: &AskRequest) -> anyhow::Result<String> {
        Ok(compose(&request.snapshot, &request.question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_even_without_data() {
        let answer = RuleBasedBackend.ask(&AskRequest::default()).await.unwrap();
        assert!(answer.starts_with("Currently in the location: temperature unknown, unknown."));
    }
}
