use thiserror::Error;

/// A request that does not match the domain's declared input shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request must be a JSON object")]
    NotAnObject,

    #[error("required field '{0}' is missing")]
    MissingField(String),

    #[error("required field '{0}' is empty")]
    EmptyField(String),

    #[error("field '{field}' must be a {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("request could not be decoded: {0}")]
    Decode(String),
}

impl ValidationError {
    /// Name of the offending field, when the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField(field) | ValidationError::EmptyField(field) => Some(field),
            ValidationError::WrongType { field, .. } => Some(field),
            ValidationError::NotAnObject | ValidationError::Decode(_) => None,
        }
    }
}

/// Failure of the single outbound chat-completion call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to the chat-completion API failed: {0}")]
    Network(String),

    #[error("chat-completion API returned status {status}")]
    Status { status: u16, body: String },
}

/// Mismatch between parsed model output and the declared output shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected a JSON object at {path}")]
    NotAnObject { path: String },

    #[error("field {path} is missing")]
    MissingField { path: String },

    #[error("field {path} should be {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("coerced output could not be decoded: {0}")]
    Decode(String),
}

/// Where in response handling the upstream reply stopped making sense.
/// Domains pick their fallback result by stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStage {
    /// The HTTP body is not JSON.
    Envelope,
    /// The message content is not JSON even after sanitizing.
    Content,
    /// The content parsed but does not fit the output shape.
    Shape,
}

#[derive(Debug, Error)]
pub enum UpstreamFormatError {
    #[error("chat-completion envelope is not valid JSON")]
    Envelope(#[source] serde_json::Error),

    #[error("model content is not valid JSON after sanitizing")]
    Content(#[source] serde_json::Error),

    #[error("model content does not match the output shape")]
    Shape(#[from] ShapeError),
}

impl UpstreamFormatError {
    pub fn stage(&self) -> FormatStage {
        match self {
            UpstreamFormatError::Envelope(_) => FormatStage::Envelope,
            UpstreamFormatError::Content(_) => FormatStage::Content,
            UpstreamFormatError::Shape(_) => FormatStage::Shape,
        }
    }
}
