use advisory_core::{TransportError, UpstreamFormatError, ValidationError};
use common_utils::ConfigError;
use thiserror::Error;

/// Everything that can stop an advisory invocation. Never leaves the
/// pipeline: `Advisor::advise` maps each variant to a result.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("invalid advisory request")]
    Validation(#[from] ValidationError),

    #[error("advisory service is not configured")]
    Configuration(#[from] ConfigError),

    #[error("could not reach the chat-completion API")]
    Transport(#[from] TransportError),

    #[error("could not understand the model's reply")]
    UpstreamFormat(#[from] UpstreamFormatError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown advisory domain '{0}'")]
    UnknownDomain(String),
}
