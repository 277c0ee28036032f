// orchestrator/src/pipeline.rs

//! The advisory pipeline shared by every domain:
//! validate → prepare prompt → call the model → normalize → coerce → validate.

use std::sync::Arc;

use advisory_core::{
    AdvisoryDomain, AdvisoryFlow, AdvisoryResult, ChatTransport, Preparation, ShapeError,
    UpstreamFormatError, ValidationError,
};
use async_trait::async_trait;
use common_utils::AdvisoryConfig;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::coercer;
use crate::error::AdvisoryError;
use crate::normalizer;

/// One advisory domain wired to its configuration and transport.
pub struct Advisor<D: AdvisoryDomain> {
    domain: D,
    config: Arc<AdvisoryConfig>,
    transport: Arc<dyn ChatTransport>,
}

impl<D: AdvisoryDomain> Advisor<D> {
    pub fn new(domain: D, config: Arc<AdvisoryConfig>, transport: Arc<dyn ChatTransport>) -> Self {
        Self { domain, config, transport }
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// Runs one invocation. Always returns either the domain record or `{error}`.
    pub async fn advise(&self, request: &Value) -> AdvisoryResult<D::Output> {
        match self.run(request).await {
            Ok(output) => AdvisoryResult::Advice(output),
            Err(err) => self.recover(err),
        }
    }

    async fn run(&self, request: &Value) -> Result<D::Output, AdvisoryError> {
        let fields = D::INPUT.validate(request)?;
        let input: D::Input = serde_json::from_value(Value::Object(fields))
            .map_err(|e| ValidationError::Decode(e.to_string()))?;

        let api_key = self.config.api_key()?;

        let prompt = match self.domain.prepare(&input).await {
            Preparation::Prompt(prompt) => prompt,
            Preparation::Settled(output) => {
                info!("[Advisor:{}] Request settled without calling the model.", D::NAME);
                return Ok(output);
            }
        };

        info!("[Advisor:{}] Sending prompt to the chat-completion API...", D::NAME);
        let envelope = self.transport.send(api_key, &prompt).await?;
        debug!("[Advisor:{}] Raw envelope: {}", D::NAME, envelope.body);

        Ok(self.interpret(&envelope.body)?)
    }

    /// Envelope body → typed output, or the stage at which it stopped making sense.
    pub fn interpret(&self, body: &str) -> Result<D::Output, UpstreamFormatError> {
        let envelope = normalizer::parse_envelope(body).map_err(UpstreamFormatError::Envelope)?;
        let content = normalizer::normalize(&envelope);
        let parsed: Value = serde_json::from_str(&content).map_err(UpstreamFormatError::Content)?;

        let coerced = coercer::coerce(parsed, &D::OUTPUT)?;
        D::OUTPUT.validate(&coerced)?;

        serde_json::from_value(coerced)
            .map_err(|e| UpstreamFormatError::from(ShapeError::Decode(e.to_string())))
    }

    fn recover(&self, err: AdvisoryError) -> AdvisoryResult<D::Output> {
        let messages = D::MESSAGES;
        match err {
            AdvisoryError::Validation(cause) => {
                warn!("[Advisor:{}] Rejected request: {}", D::NAME, cause);
                AdvisoryResult::failed(messages.invalid_input)
            }
            AdvisoryError::Configuration(cause) => {
                error!("[Advisor:{}] {}", D::NAME, cause);
                AdvisoryResult::failed(messages.missing_key)
            }
            AdvisoryError::Transport(cause) => {
                error!("[Advisor:{}] Transport failure: {}", D::NAME, cause);
                AdvisoryResult::failed(messages.transport)
            }
            AdvisoryError::UpstreamFormat(cause) => {
                warn!("[Advisor:{}] Failed to parse model reply: {:#?}", D::NAME, cause);
                self.domain.fallback(cause.stage())
            }
        }
    }
}

#[async_trait]
impl<D: AdvisoryDomain> AdvisoryFlow for Advisor<D> {
    fn name(&self) -> &'static str {
        D::NAME
    }

    async fn advise_json(&self, request: &Value) -> Value {
        let result = self.advise(request).await;
        serde_json::to_value(&result).unwrap_or_else(|e| {
            error!("[Advisor:{}] Could not serialize result: {}", D::NAME, e);
            serde_json::json!({ "error": D::MESSAGES.transport })
        })
    }
}
