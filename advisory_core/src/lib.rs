// advisory_core/src/lib.rs

//! Shared vocabulary of the advisory backend.
//!
//! Every advisory domain is described by an input shape, an output shape,
//! a prompt and a set of failure messages. The generic pipeline in the
//! `orchestrator` crate runs any [`AdvisoryDomain`] through the same stages;
//! this crate only holds the types those stages exchange.

mod error;
mod flow;
mod prompt;
mod result;
mod shape;

pub use crate::error::{FormatStage, ShapeError, TransportError, UpstreamFormatError, ValidationError};
pub use crate::flow::{AdvisoryDomain, AdvisoryFlow, ChatTransport, FailureMessages, Preparation, RawEnvelope};
pub use crate::prompt::{CompiledPrompt, FactSheet};
pub use crate::result::AdvisoryResult;
pub use crate::shape::{json_type_name, InputField, InputShape, OutputField, OutputKind, OutputShape, Primitive};
