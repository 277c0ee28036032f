// orchestrator/src/flows/fertilizer_soil.rs

use advisory_core::{
    AdvisoryDomain, AdvisoryResult, CompiledPrompt, FactSheet, FailureMessages, FormatStage, InputField,
    InputShape, OutputField, OutputShape, Preparation,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PLAIN_ENGLISH;

const SYSTEM_PROMPT: &str =
    "You are a kind and clear-speaking farming assistant for Indian farmers. Use only simple English.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilAdviceInput {
    pub crop_selected: String,
    pub soil_type: String,
    pub land_size: String,
    pub organic_preference: String,
    pub soil_test_available: String,
    pub recent_fertilizer_used: Option<String>,
    /// kg/ha
    pub nitrogen_level: Option<f64>,
    pub phosphorus_level: Option<f64>,
    pub potassium_level: Option<f64>,
    #[serde(rename = "pH")]
    pub ph: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilAdvice {
    pub fertilizer_suggestions: Vec<Suggestion>,
    pub soil_improvement_suggestions: Vec<Suggestion>,
}

pub fn compile(input: &SoilAdviceInput) -> CompiledPrompt {
    let kg_per_ha = |level: Option<f64>| level.map(|value| format!("{value} kg/ha"));

    let farm = FactSheet::new()
        .fact("Crop", &input.crop_selected)
        .fact("Soil Type", &input.soil_type)
        .fact("Land Size", format_args!("{} acres", input.land_size))
        .fact("Organic Preference", &input.organic_preference)
        .maybe("Recently Used Fertilizers", input.recent_fertilizer_used.as_deref());

    let soil_test = FactSheet::new()
        .fact("Available", &input.soil_test_available)
        .maybe("Nitrogen", kg_per_ha(input.nitrogen_level))
        .maybe("Phosphorus", kg_per_ha(input.phosphorus_level))
        .maybe("Potassium", kg_per_ha(input.potassium_level))
        .maybe("Soil pH", input.ph);

    let user = format!(
        r#"You are an Indian soil and fertilizer expert. A farmer has shared the following:

{farm}

Soil test:
{soil_test}

Your task:
1. Suggest 2 to 3 fertilizers, organic or chemical depending on the farmer's preference.
2. Give 2 to 3 tips to improve soil health over the long term.

{PLAIN_ENGLISH} Keep every suggestion short and practical.

Reply only in this exact JSON format:
{{
  "fertilizerSuggestions": [
    {{ "suggestion": "..." }},
    {{ "suggestion": "..." }}
  ],
  "soilImprovementSuggestions": [
    {{ "suggestion": "..." }},
    {{ "suggestion": "..." }}
  ]
}}"#,
        farm = farm.render(),
        soil_test = soil_test.render()
    );

    CompiledPrompt::new(SYSTEM_PROMPT, user)
}

const SUGGESTION_FIELDS: &[OutputField] = &[OutputField::text("suggestion")];

pub struct FertilizerAndSoil;

#[async_trait]
impl AdvisoryDomain for FertilizerAndSoil {
    type Input = SoilAdviceInput;
    type Output = SoilAdvice;

    const NAME: &'static str = "fertilizer-and-soil";

    const INPUT: InputShape = InputShape::new(&[
        InputField::text("cropSelected"),
        InputField::text("soilType"),
        InputField::text("landSize"),
        InputField::text("organicPreference"),
        InputField::text("soilTestAvailable"),
        InputField::optional_text("recentFertilizerUsed"),
        InputField::optional_number("nitrogenLevel"),
        InputField::optional_number("phosphorusLevel"),
        InputField::optional_number("potassiumLevel"),
        InputField::optional_number("pH"),
    ]);

    const OUTPUT: OutputShape = OutputShape::new(&[
        OutputField::records("fertilizerSuggestions", SUGGESTION_FIELDS),
        OutputField::records("soilImprovementSuggestions", SUGGESTION_FIELDS),
    ]);

    const MESSAGES: FailureMessages = FailureMessages {
        invalid_input: "❌ Invalid input. Please check the fields.",
        missing_key: "❌ Missing OPENROUTER_API_KEY in environment.",
        transport: "❌ Failed to connect to AI. Please try again later.",
    };

    async fn prepare(&self, input: &Self::Input) -> Preparation<Self::Output> {
        Preparation::Prompt(compile(input))
    }

    fn fallback(&self, _stage: FormatStage) -> AdvisoryResult<Self::Output> {
        AdvisoryResult::Advice(SoilAdvice {
            fertilizer_suggestions: vec![Suggestion {
                suggestion: "❌ Sorry, could not understand the AI response.".to_string(),
            }],
            soil_improvement_suggestions: Vec::new(),
        })
    }
}
