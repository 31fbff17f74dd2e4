//! Prompt pipeline: build the request, dispatch it, normalize the answer

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::{GatewayConfig, Transport};
use crate::domain::chat::{normalizer, ChatRole, RequestBuilder, TokenSource, Usage};
use crate::domain::error::ErrorKind;
use crate::domain::DomainError;

/// Separator used when answers are joined into one text
pub const ANSWER_SEPARATOR: &str = "\n";

/// Stage of a single gateway invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayStage {
    Idle,
    Building,
    Dispatching,
    Normalizing,
    Done,
    Failed,
}

impl GatewayStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    fn can_advance_to(self, next: GatewayStage) -> bool {
        use GatewayStage::*;

        matches!(
            (self, next),
            (Idle, Building)
                | (Building, Dispatching)
                | (Dispatching, Normalizing)
                | (Normalizing, Done)
                | (Building | Dispatching | Normalizing, Failed)
        )
    }
}

impl fmt::Display for GatewayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Building => "building",
            Self::Dispatching => "dispatching",
            Self::Normalizing => "normalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the stage of one invocation; never retries
#[derive(Debug)]
struct Progress {
    stage: GatewayStage,
}

impl Progress {
    fn start() -> Self {
        Self {
            stage: GatewayStage::Idle,
        }
    }

    fn advance(&mut self, next: GatewayStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal transition {} -> {}",
            self.stage,
            next
        );
        debug!(from = %self.stage, to = %next, "Gateway stage transition");
        self.stage = next;
    }

    fn fail(&mut self, error: DomainError) -> GatewayFailure {
        let stage = self.stage;
        self.advance(GatewayStage::Failed);
        GatewayFailure { stage, error }
    }
}

/// A failed invocation: the stage that failed and the error it raised
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct GatewayFailure {
    stage: GatewayStage,
    #[source]
    error: DomainError,
}

impl GatewayFailure {
    pub fn stage(&self) -> GatewayStage {
        self.stage
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn error(&self) -> &DomainError {
        &self.error
    }

    pub fn into_error(self) -> DomainError {
        self.error
    }
}

/// One normalized answer with its provider metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub index: u32,
    pub role: ChatRole,
    pub content: String,
}

/// Successful invocation: answers in provider order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    answers: Vec<Answer>,
    usage: Option<Usage>,
}

impl Completion {
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }

    pub fn joined_text(&self) -> String {
        self.answers
            .iter()
            .map(|a| a.content.as_str())
            .collect::<Vec<_>>()
            .join(ANSWER_SEPARATOR)
    }

    pub fn into_answers(self) -> Vec<Answer> {
        self.answers
    }
}

/// Flattened outcome of one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResult {
    TextAnswer { joined_text: String },
    GatewayError { kind: ErrorKind, message: String },
}

impl From<Result<Completion, GatewayFailure>> for GatewayResult {
    fn from(result: Result<Completion, GatewayFailure>) -> Self {
        match result {
            Ok(completion) => Self::TextAnswer {
                joined_text: completion.joined_text(),
            },
            Err(failure) => Self::GatewayError {
                kind: failure.kind(),
                message: failure.error().to_string(),
            },
        }
    }
}

/// Prompt gateway wired to exactly one transport.
///
/// Holds no mutable state; one instance serves concurrent prompts.
pub struct Gateway {
    config: Arc<GatewayConfig>,
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    /// Gateway whose builder follows `config.cache_busting`
    pub fn new(
        config: Arc<GatewayConfig>,
        transport: Arc<dyn Transport>,
        token_source: Arc<dyn TokenSource>,
    ) -> Self {
        let builder = if config.cache_busting {
            RequestBuilder::with_cache_busting(token_source)
        } else {
            RequestBuilder::new()
        };

        Self::with_builder(config, builder, transport)
    }

    pub fn with_builder(
        config: Arc<GatewayConfig>,
        builder: RequestBuilder,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            builder,
            transport,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Run one prompt through build, dispatch and normalization
    #[instrument(name = "gateway.complete", skip_all, fields(transport = self.transport.name()))]
    pub async fn complete(&self, prompt: Option<&str>) -> Result<Completion, GatewayFailure> {
        let mut progress = Progress::start();

        progress.advance(GatewayStage::Building);
        let request = match self.builder.build(&self.config, prompt) {
            Ok(request) => request,
            Err(e) => {
                info!(error = %e, "Rejected prompt before dispatch");
                return Err(progress.fail(e));
            }
        };

        progress.advance(GatewayStage::Dispatching);
        let response = match self.transport.send(request, &self.config).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Upstream call failed");
                return Err(progress.fail(e));
            }
        };

        progress.advance(GatewayStage::Normalizing);
        let answers = match normalizer::extract(&response) {
            Ok(answers) => answers,
            Err(e) => {
                warn!(error = %e, "Upstream returned no answer");
                return Err(progress.fail(e));
            }
        };

        let answers: Vec<Answer> = answers
            .with_metadata()
            .map(|(index, role, content)| {
                info!(index, role = %role, "Received choice");
                debug!(index, content, "Choice content");
                Answer {
                    index,
                    role,
                    content: content.to_string(),
                }
            })
            .collect();

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Upstream token usage"
            );
        }

        progress.advance(GatewayStage::Done);

        Ok(Completion {
            answers,
            usage: response.usage,
        })
    }

    /// Like [`complete`](Self::complete), flattened to joined text or an error
    pub async fn answer(&self, prompt: Option<&str>) -> GatewayResult {
        self.complete(prompt).await.into()
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .field("builder", &self.builder)
            .field("transport", &self.transport.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{Choice, MockTokenSource, ProviderResponse};
    use crate::domain::gateway::MockTransport;

    fn config() -> Arc<GatewayConfig> {
        Arc::new(
            GatewayConfig::new("https://example.com", "key")
                .with_deployment("d")
                .with_cache_busting(false),
        )
    }

    fn gateway(transport: MockTransport) -> Gateway {
        Gateway::with_builder(config(), RequestBuilder::new(), Arc::new(transport))
    }

    fn named(mut transport: MockTransport) -> MockTransport {
        transport.expect_name().return_const("mock");
        transport
    }

    #[tokio::test]
    async fn test_hello_round_trip() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request, _| request.user_content() == Some("hello"))
            .times(1)
            .returning(|_, _| {
                Ok(ProviderResponse::new(vec![Choice::new(
                    0,
                    ChatRole::Assistant,
                    "hi there",
                )]))
            });

        let result = gateway(named(transport)).answer(Some("hello")).await;

        assert_eq!(
            result,
            GatewayResult::TextAnswer {
                joined_text: "hi there".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_prompt_never_dispatches() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let gateway = gateway(named(transport));

        let failure = gateway.complete(Some("")).await.unwrap_err();
        assert_eq!(failure.kind(), ErrorKind::InvalidInput);
        assert_eq!(failure.stage(), GatewayStage::Building);

        let result = gateway.answer(None).await;
        assert_eq!(
            result,
            GatewayResult::GatewayError {
                kind: ErrorKind::InvalidInput,
                message: "Invalid input: User prompt cannot be empty".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_completion_keeps_usage() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_, _| {
            Ok(
                ProviderResponse::new(vec![Choice::new(0, ChatRole::Assistant, "ok")])
                    .with_usage(Usage::new(7, 1)),
            )
        });

        let completion = gateway(named(transport))
            .complete(Some("hello"))
            .await
            .unwrap();

        assert_eq!(completion.usage().map(|u| u.total_tokens), Some(8));
        assert_eq!(completion.joined_text(), "ok");
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_, _| Err(DomainError::upstream_status(500, "internal")));

        let failure = gateway(named(transport))
            .complete(Some("hello"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::Transport);
        assert_eq!(failure.stage(), GatewayStage::Dispatching);
        assert!(failure.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_zero_choices_is_empty_response() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_, _| Ok(ProviderResponse::default()));

        let failure = gateway(named(transport))
            .complete(Some("hello"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::EmptyResponse);
        assert_eq!(failure.stage(), GatewayStage::Normalizing);
    }

    #[tokio::test]
    async fn test_multiple_choices_joined_in_provider_order() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_, _| {
            Ok(ProviderResponse::new(vec![
                Choice::new(2, ChatRole::Assistant, "b"),
                Choice::new(1, ChatRole::Assistant, "a"),
            ]))
        });

        let completion = gateway(named(transport))
            .complete(Some("hello"))
            .await
            .unwrap();

        assert_eq!(completion.joined_text(), "b\na");
        assert_eq!(completion.answers()[0].index, 2);
    }

    #[tokio::test]
    async fn test_cache_busting_follows_config() {
        let mut source = MockTokenSource::new();
        source
            .expect_next_token()
            .times(1)
            .returning(|| "tok".to_string());

        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request, _| request.user_content() == Some("tok\nhello"))
            .returning(|_, _| {
                Ok(ProviderResponse::new(vec![Choice::new(
                    0,
                    ChatRole::Assistant,
                    "ok",
                )]))
            });

        let config = Arc::new(
            GatewayConfig::new("https://example.com", "key")
                .with_deployment("d")
                .with_cache_busting(true),
        );
        let gateway = Gateway::new(config, Arc::new(named(transport)), Arc::new(source));

        assert!(gateway.complete(Some("hello")).await.is_ok());
    }

    #[test]
    fn test_stage_transitions() {
        assert!(GatewayStage::Idle.can_advance_to(GatewayStage::Building));
        assert!(GatewayStage::Dispatching.can_advance_to(GatewayStage::Failed));
        assert!(!GatewayStage::Idle.can_advance_to(GatewayStage::Dispatching));
        assert!(!GatewayStage::Done.can_advance_to(GatewayStage::Failed));
        assert!(!GatewayStage::Failed.can_advance_to(GatewayStage::Building));
        assert!(GatewayStage::Done.is_terminal());
    }
}
