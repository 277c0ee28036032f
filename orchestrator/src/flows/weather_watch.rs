// orchestrator/src/flows/weather_watch.rs

use std::sync::Arc;

use advisory_core::{
    AdvisoryDomain, AdvisoryResult, CompiledPrompt, FactSheet, FailureMessages, FormatStage, InputField,
    InputShape, OutputField, OutputShape, Preparation,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::PLAIN_ENGLISH;
use crate::weather::{normalize_location, Forecast, ForecastLookup};

const SYSTEM_PROMPT: &str = "You are a kind weather assistant for Indian farmers. \
Always reply in very simple and clear English. Keep the tone friendly and short so rural farmers can follow it.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRequest {
    pub location: String,
    pub crop_planned: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub report_title: String,
    pub overall_summary: String,
    pub recommendations: Vec<String>,
    pub motivational_message: String,
}

impl WeatherReport {
    /// Returned without contacting the model when no forecast is available.
    pub fn apology(location: &str) -> Self {
        Self {
            report_title: format!("Weather Report for {location}"),
            overall_summary: format!("Sorry, weather data for \"{location}\" could not be fetched."),
            recommendations: vec![
                "✅ Try entering a nearby city or district name.".to_string(),
                "✅ Check spelling and avoid local town nicknames.".to_string(),
            ],
            motivational_message: "Keep going! Nature rewards the patient.".to_string(),
        }
    }
}

pub fn compile(input: &WeatherRequest, forecast: &Forecast) -> CompiledPrompt {
    let facts = FactSheet::new()
        .fact("Location", &input.location)
        .fact("Crop", input.crop_planned.as_deref().unwrap_or("Unknown"))
        .fact("Weather Summary", &forecast.summary)
        .fact("Temperature", format_args!("{}°C", forecast.temperature))
        .fact("Rain/Precipitation", &forecast.precipitation)
        .fact("Wind", format_args!("{} km/h", forecast.wind_speed))
        .fact("Humidity", format_args!("{}%", forecast.humidity));

    let user = format!(
        r#"You are a kind weather advisor for Indian farmers.

{PLAIN_ENGLISH}

{facts}

Tasks:
1. A title like "Weather Forecast for Patna".
2. A simple explanation of the weather (rain, sun, storm).
3. 2 to 3 easy farming tips.
4. One motivational line.

Strictly use this JSON format:
{{
  "reportTitle": "...",
  "overallSummary": "...",
  "recommendations": ["...", "..."],
  "motivationalMessage": "..."
}}"#,
        facts = facts.render()
    );

    CompiledPrompt::new(SYSTEM_PROMPT, user)
}

pub struct WeatherWatch {
    forecasts: Arc<dyn ForecastLookup>,
}

impl WeatherWatch {
    pub fn new(forecasts: Arc<dyn ForecastLookup>) -> Self {
        Self { forecasts }
    }
}

#[async_trait]
impl AdvisoryDomain for WeatherWatch {
    type Input = WeatherRequest;
    type Output = WeatherReport;

    const NAME: &'static str = "weather-watch";

    const INPUT: InputShape =
        InputShape::new(&[InputField::text("location"), InputField::optional_text("cropPlanned")]);

    const OUTPUT: OutputShape = OutputShape::new(&[
        OutputField::text("reportTitle"),
        OutputField::text("overallSummary"),
        OutputField::text_list("recommendations"),
        OutputField::text("motivationalMessage"),
    ]);

    const MESSAGES: FailureMessages = FailureMessages {
        invalid_input: "❌ Invalid input. Please check the fields.",
        missing_key: "❌ Missing OPENROUTER_API_KEY in .env file.",
        transport: "❌ Could not connect to weather AI. Please try again later.",
    };

    async fn prepare(&self, input: &Self::Input) -> Preparation<Self::Output> {
        let key = normalize_location(&input.location);
        match self.forecasts.forecast(&key).await {
            Some(forecast) if !forecast.summary.trim().is_empty() => Preparation::Prompt(compile(input, &forecast)),
            _ => {
                info!("[WeatherWatch] No forecast for '{}', answering without the model.", key);
                Preparation::Settled(WeatherReport::apology(&input.location))
            }
        }
    }

    fn fallback(&self, _stage: FormatStage) -> AdvisoryResult<Self::Output> {
        AdvisoryResult::Advice(WeatherReport {
            report_title: "Weather Report Unavailable".to_string(),
            overall_summary: "⚠️ Could not understand AI response. Please try again.".to_string(),
            recommendations: Vec::new(),
            motivational_message: String::new(),
        })
    }
}
