// advisory_core/src/flow.rs

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{FormatStage, TransportError};
use crate::prompt::CompiledPrompt;
use crate::result::AdvisoryResult;
use crate::shape::{InputShape, OutputShape};

/// Unparsed reply of the chat-completion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnvelope {
    pub status: u16,
    pub body: String,
}

/// The one outbound call of an advisory flow.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, api_key: &str, prompt: &CompiledPrompt) -> Result<RawEnvelope, TransportError>;
}

/// User-facing messages for failures that end in `{"error": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureMessages {
    pub invalid_input: &'static str,
    pub missing_key: &'static str,
    pub transport: &'static str,
}

/// What a domain wants to do with a validated request.
#[derive(Debug)]
pub enum Preparation<T> {
    /// Ask the model.
    Prompt(CompiledPrompt),
    /// Answer without the model.
    Settled(T),
}

/// Per-domain configuration of the advisory pipeline.
#[async_trait]
pub trait AdvisoryDomain: Send + Sync + 'static {
    type Input: DeserializeOwned + Send + Sync;
    type Output: DeserializeOwned + Serialize + Send + Sync;

    /// Routing key, e.g. `market-and-yield`.
    const NAME: &'static str;
    const INPUT: InputShape;
    const OUTPUT: OutputShape;
    const MESSAGES: FailureMessages;

    async fn prepare(&self, input: &Self::Input) -> Preparation<Self::Output>;

    /// Result returned when the model's reply can't be trusted.
    fn fallback(&self, stage: FormatStage) -> AdvisoryResult<Self::Output>;
}

/// Type-erased advisory flow, so a dispatcher can hold every domain in one list.
#[async_trait]
pub trait AdvisoryFlow: Send + Sync {
    fn name(&self) -> &'static str;

    async fn advise_json(&self, request: &Value) -> Value;
}
