// orchestrator/src/flows/mod.rs

// One module per advisory domain: input/output types, prompt, fallbacks.
pub mod crop_advisor;
pub mod fertilizer_soil;
pub mod govt_schemes;
pub mod market_yield;
pub mod pest_disease;
pub mod plant_disease;
pub mod weather_watch;

/// Closing instruction shared by every prompt.
pub(crate) const PLAIN_ENGLISH: &str =
    "Use only simple, clear English. Do not use Hindi, Hinglish or any other mixed language.";
