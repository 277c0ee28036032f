// orchestrator/src/flows/market_yield.rs

use advisory_core::{
    AdvisoryDomain, AdvisoryResult, CompiledPrompt, FactSheet, FailureMessages, FormatStage, InputField,
    InputShape, OutputField, OutputShape, Preparation,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PLAIN_ENGLISH;

const SYSTEM_PROMPT: &str =
    "You are a helpful agricultural assistant for Indian farmers. Use only simple English.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketForecastInput {
    pub crop_name: String,
    pub location: String,
    pub land_size: String,
    pub farming_method: String,
    pub expected_harvest_month: String,
    pub crop_variety: Option<String>,
    pub input_costs: Option<String>,
    pub mandi_preference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketForecast {
    pub yield_estimation: String,
    pub market_advice: String,
    pub profit_analysis: String,
}

pub fn compile(input: &MarketForecastInput) -> CompiledPrompt {
    let facts = FactSheet::new()
        .fact("Crop", &input.crop_name)
        .maybe("Variety", input.crop_variety.as_deref())
        .fact("Location", &input.location)
        .fact("Land Size", format_args!("{} acres", input.land_size))
        .fact("Farming Method", &input.farming_method)
        .fact("Expected Harvest Month", &input.expected_harvest_month)
        .maybe("Input Costs", input.input_costs.as_deref().map(|cost| format!("Rs. {cost}")))
        .maybe("Preferred Mandi", input.mandi_preference.as_deref());

    let user = format!(
        r#"You advise Indian farmers on crop yield and market prices. A farmer shared these details:

{facts}

Your job:
1. Estimate the yield per acre in quintals or tons.
2. Give market advice: expected price, demand, and whether to store or sell.
3. If input costs are given, estimate profit as (yield x price) - cost.

{PLAIN_ENGLISH}

Respond only with this exact JSON structure:
{{
  "yieldEstimation": "...",
  "marketAdvice": "...",
  "profitAnalysis": "..."
}}"#,
        facts = facts.render()
    );

    CompiledPrompt::new(SYSTEM_PROMPT, user)
}

pub struct MarketAndYield;

#[async_trait]
impl AdvisoryDomain for MarketAndYield {
    type Input = MarketForecastInput;
    type Output = MarketForecast;

    const NAME: &'static str = "market-and-yield";

    const INPUT: InputShape = InputShape::new(&[
        InputField::text("cropName"),
        InputField::text("location"),
        InputField::text("landSize"),
        InputField::text("farmingMethod"),
        InputField::text("expectedHarvestMonth"),
        InputField::optional_text("cropVariety"),
        InputField::optional_text("inputCosts"),
        InputField::optional_text("mandiPreference"),
    ]);

    const OUTPUT: OutputShape = OutputShape::new(&[
        OutputField::text("yieldEstimation"),
        OutputField::text("marketAdvice"),
        OutputField::text("profitAnalysis"),
    ]);

    const MESSAGES: FailureMessages = FailureMessages {
        invalid_input: "❌ Invalid input provided.",
        missing_key: "❌ Missing OPENROUTER_API_KEY in .env file.",
        transport: "❌ Could not connect to AI service. Check logs or API key.",
    };

    async fn prepare(&self, input: &Self::Input) -> Preparation<Self::Output> {
        Preparation::Prompt(compile(input))
    }

    fn fallback(&self, _stage: FormatStage) -> AdvisoryResult<Self::Output> {
        AdvisoryResult::Advice(MarketForecast {
            yield_estimation: "❌ Failed to parse AI response.".to_string(),
            market_advice: String::new(),
            profit_analysis: String::new(),
        })
    }
}
