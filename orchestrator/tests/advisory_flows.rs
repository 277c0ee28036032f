// orchestrator/tests/advisory_flows.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use advisory_core::{ChatTransport, CompiledPrompt, RawEnvelope, TransportError};
use async_trait::async_trait;
use common_utils::AdvisoryConfig;
use orchestrator::{Orchestrator, SampleForecasts};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(content: &str) -> Value {
    json!({
        "id": "gen-1",
        "model": "mistralai/mistral-7b-instruct",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

/// Counts calls and answers every one with the same assistant content.
struct CountingTransport {
    content: String,
    calls: AtomicUsize,
}

impl CountingTransport {
    fn new(content: &str) -> Arc<Self> {
        Arc::new(Self { content: content.to_string(), calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for CountingTransport {
    async fn send(&self, _api_key: &str, _prompt: &CompiledPrompt) -> Result<RawEnvelope, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawEnvelope { status: 200, body: envelope(&self.content).to_string() })
    }
}

fn with_transport(transport: Arc<CountingTransport>) -> Orchestrator {
    Orchestrator::new(
        AdvisoryConfig::new(Some("sk-or-test".into())),
        transport,
        Arc::new(SampleForecasts::new()),
    )
}

fn against(server: &MockServer) -> Orchestrator {
    let mut config = AdvisoryConfig::new(Some("sk-or-test".into()));
    config.llm_url = server.uri();
    Orchestrator::from_config(config, Arc::new(SampleForecasts::new()))
}

#[tokio::test]
async fn market_forecast_end_to_end() {
    let server = MockServer::start().await;
    let content = r#"{"yieldEstimation":"18 quintals/acre","marketAdvice":"Sell in May","profitAnalysis":"Moderate"}"#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-or-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(content)))
        .expect(1)
        .mount(&server)
        .await;

    let request = json!({
        "cropName": "Wheat",
        "location": "Patna",
        "landSize": "2",
        "farmingMethod": "Organic",
        "expectedHarvestMonth": "April"
    });
    let reply = against(&server).dispatch("market-and-yield", &request).await.unwrap();

    assert_eq!(
        reply,
        json!({
            "yieldEstimation": "18 quintals/acre",
            "marketAdvice": "Sell in May",
            "profitAnalysis": "Moderate"
        })
    );
}

#[tokio::test]
async fn upstream_error_status_yields_only_the_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let request = json!({
        "cropType": "Rice",
        "growthStage": "Tillering",
        "symptomsObserved": "Brown spots"
    });
    let reply = against(&server).dispatch("plant-disease", &request).await.unwrap();

    assert_eq!(reply, json!({"error": "⚠️ Could not connect to AI. Please try again later."}));
}

#[tokio::test]
async fn unknown_weather_location_never_calls_the_model() {
    let transport = CountingTransport::new("{}");
    let orchestrator = with_transport(transport.clone());

    let reply = orchestrator
        .dispatch("weather-watch", &json!({"location": "Atlantis", "cropPlanned": "Rice"}))
        .await
        .unwrap();

    assert_eq!(
        reply,
        json!({
            "reportTitle": "Weather Report for Atlantis",
            "overallSummary": "Sorry, weather data for \"Atlantis\" could not be fetched.",
            "recommendations": [
                "✅ Try entering a nearby city or district name.",
                "✅ Check spelling and avoid local town nicknames."
            ],
            "motivationalMessage": "Keep going! Nature rewards the patient."
        })
    );
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn known_weather_location_goes_through_the_model() {
    let transport = CountingTransport::new(
        r#"{"reportTitle":"Weather Forecast for Patna","overallSummary":"Hot","recommendations":["Irrigate early"],"motivationalMessage":"Stay strong"}"#,
    );
    let orchestrator = with_transport(transport.clone());

    let reply = orchestrator.dispatch("weather-watch", &json!({"location": "Patna"})).await.unwrap();

    assert_eq!(reply["reportTitle"], "Weather Forecast for Patna");
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn mixed_pest_lists_are_flattened_to_text() {
    let transport = CountingTransport::new(
        r#"{"pestThreats":["Aphids",{"name":"Whitefly","risk":"high"}],"diseaseThreats":["Leaf curl virus"],"preventativeMeasures":["Yellow sticky traps"],"organicTreatments":["Neem oil spray"],"chemicalTreatments":[]}"#,
    );
    let orchestrator = with_transport(transport);

    let request = json!({
        "cropType": "Cotton",
        "growthStage": "Flowering",
        "symptomsObserved": "Sticky leaves",
        "organicPreference": "Yes"
    });
    let reply = orchestrator.dispatch("pest-and-disease", &request).await.unwrap();

    let pests = reply["pestThreats"].as_array().unwrap();
    assert_eq!(pests[0], "Aphids");
    let flattened = pests[1].as_str().unwrap();
    assert!(flattened.starts_with('{'));
    assert!(flattened.contains("\"name\": \"Whitefly\""));
    assert_eq!(reply["chemicalTreatments"], json!([]));
}

#[tokio::test]
async fn missing_required_field_is_rejected_without_a_call() {
    let transport = CountingTransport::new("{}");
    let orchestrator = with_transport(transport.clone());

    let reply = orchestrator
        .dispatch("crop-advisor", &json!({"location": "Nashik", "soilType": "Black"}))
        .await
        .unwrap();

    assert_eq!(reply, json!({"error": "❌ Invalid input. Please check the fields."}));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn chatty_reply_falls_back_to_the_domain_placeholder() {
    let transport = CountingTransport::new("Here are some schemes you might like!");
    let orchestrator = with_transport(transport);

    let request = json!({
        "state": "Bihar",
        "landholdingSize": "1",
        "cropsGrown": "Paddy",
        "farmerCategory": "Marginal"
    });
    let reply = orchestrator.dispatch("govt-schemes", &request).await.unwrap();

    assert_eq!(reply["schemes"][0]["name"], "❌ Parsing Error");
    assert_eq!(reply["schemes"][0]["howToApply"], "N/A");
}

#[tokio::test]
async fn unknown_domain_is_reported() {
    let orchestrator = with_transport(CountingTransport::new("{}"));
    assert!(orchestrator.dispatch("astrology", &json!({})).await.is_err());
}
