pub mod client;
pub mod coercer;
pub mod error;
pub mod flows;
pub mod normalizer;
pub mod orchestrator;
pub mod pipeline;
pub mod weather;

// Re-exported so callers can write `use orchestrator::Orchestrator`.
pub use crate::client::OpenRouterClient;
pub use crate::error::{AdvisoryError, DispatchError};
pub use crate::orchestrator::Orchestrator;
pub use crate::pipeline::Advisor;
pub use crate::weather::{Forecast, ForecastLookup, SampleForecasts};
