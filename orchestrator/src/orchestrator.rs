use advisory_core::{AdvisoryFlow, ChatTransport};
use common_utils::AdvisoryConfig;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::OpenRouterClient;
use crate::error::DispatchError;
use crate::flows::{
    crop_advisor::CropAdvisor, fertilizer_soil::FertilizerAndSoil, govt_schemes::GovtSchemes,
    market_yield::MarketAndYield, pest_disease::PestAndDisease, plant_disease::PlantDisease,
    weather_watch::WeatherWatch,
};
use crate::pipeline::Advisor;
use crate::weather::ForecastLookup;

/// Central dispatcher.
/// Owns one flow per advisory domain and routes requests by domain key.
pub struct Orchestrator {
    flows: Vec<Arc<dyn AdvisoryFlow>>,
}

impl Orchestrator {
    /// Wires all seven domains to one configuration and transport.
    pub fn new(
        config: AdvisoryConfig,
        transport: Arc<dyn ChatTransport>,
        forecasts: Arc<dyn ForecastLookup>,
    ) -> Self {
        let config = Arc::new(config);
        let flows: Vec<Arc<dyn AdvisoryFlow>> = vec![
            Arc::new(Advisor::new(FertilizerAndSoil, config.clone(), transport.clone())),
            Arc::new(Advisor::new(GovtSchemes, config.clone(), transport.clone())),
            Arc::new(Advisor::new(CropAdvisor, config.clone(), transport.clone())),
            Arc::new(Advisor::new(MarketAndYield, config.clone(), transport.clone())),
            Arc::new(Advisor::new(PestAndDisease, config.clone(), transport.clone())),
            Arc::new(Advisor::new(PlantDisease, config.clone(), transport.clone())),
            Arc::new(Advisor::new(WeatherWatch::new(forecasts), config, transport)),
        ];

        Self::with_flows(flows)
    }

    /// Same as `new`, talking to the configured OpenRouter endpoint.
    pub fn from_config(config: AdvisoryConfig, forecasts: Arc<dyn ForecastLookup>) -> Self {
        let transport = Arc::new(OpenRouterClient::from_config(&config));
        Self::new(config, transport, forecasts)
    }

    pub fn with_flows(flows: Vec<Arc<dyn AdvisoryFlow>>) -> Self {
        info!("[Orchestrator] Registered {} advisory flows.", flows.len());
        Self { flows }
    }

    /// Domain keys in registration order.
    pub fn domains(&self) -> Vec<&'static str> {
        self.flows.iter().map(|flow| flow.name()).collect()
    }

    pub fn flow(&self, name: &str) -> Option<&Arc<dyn AdvisoryFlow>> {
        self.flows.iter().find(|flow| flow.name() == name)
    }

    /// Routes one request to its domain. The returned JSON is the domain
    /// record or `{"error": ...}`; only an unknown domain is an `Err`.
    pub async fn dispatch(&self, domain: &str, request: &Value) -> Result<Value, DispatchError> {
        match self.flow(domain) {
            Some(flow) => {
                info!("[Orchestrator] Routing request to '{}'...", domain);
                Ok(flow.advise_json(request).await)
            }
            None => {
                warn!("[Orchestrator] No flow registered for '{}'.", domain);
                Err(DispatchError::UnknownDomain(domain.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::ScriptedTransport;
    use crate::weather::SampleForecasts;
    use serde_json::json;

    fn orchestrator() -> Orchestrator {
        let transport = ScriptedTransport::failing_with_status(500, "boom");
        Orchestrator::new(
            AdvisoryConfig::new(Some("sk-test".into())),
            transport,
            Arc::new(SampleForecasts::new()),
        )
    }

    #[test]
    fn registers_every_domain() {
        assert_eq!(
            orchestrator().domains(),
            vec![
                "fertilizer-and-soil",
                "govt-schemes",
                "crop-advisor",
                "market-and-yield",
                "pest-and-disease",
                "plant-disease",
                "weather-watch",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_domain_is_an_error() {
        let err = orchestrator().dispatch("horoscope", &json!({})).await.unwrap_err();
        assert_eq!(err, DispatchError::UnknownDomain("horoscope".into()));
    }

    #[tokio::test]
    async fn known_domain_always_answers_with_json() {
        let reply = orchestrator().dispatch("govt-schemes", &json!({"state": "Bihar"})).await.unwrap();
        assert_eq!(reply, json!({"error": "❌ Invalid input provided. Please check the fields."}));
    }
}
