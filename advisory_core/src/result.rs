use serde::{Deserialize, Serialize};

/// Outcome of one advisory invocation.
///
/// Serialized untagged: a success is the domain record itself, a failure is
/// exactly `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdvisoryResult<T> {
    Failed { error: String },
    Advice(T),
}

impl<T> AdvisoryResult<T> {
    pub fn failed(message: impl Into<String>) -> Self {
        AdvisoryResult::Failed { error: message.into() }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AdvisoryResult::Failed { .. })
    }

    pub fn advice(&self) -> Option<&T> {
        match self {
            AdvisoryResult::Advice(advice) => Some(advice),
            AdvisoryResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AdvisoryResult::Failed { error } => Some(error),
            AdvisoryResult::Advice(_) => None,
        }
    }
}
