// orchestrator/src/flows/crop_advisor.rs

use advisory_core::{
    AdvisoryDomain, AdvisoryResult, CompiledPrompt, FactSheet, FailureMessages, FormatStage, InputField,
    InputShape, OutputField, OutputShape, Preparation,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PLAIN_ENGLISH;

const SYSTEM_PROMPT: &str = "You are a helpful agriculture assistant for Indian farmers. \
Use only English, with simple and clear words. Avoid Hindi. Keep advice short and practical.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPlanInput {
    pub location: String,
    pub soil_type: String,
    pub season: String,
    pub land_size: String,
    pub irrigation_available: String,
    pub budget_level: String,
    pub preferred_crops: Option<String>,
    pub past_crops: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPlan {
    pub crops: Vec<String>,
    pub fertilizer_suggestions: String,
    pub pest_disease_control: String,
    pub weather_precautions: String,
    pub estimated_yield: String,
    pub market_advice: String,
    pub motivational_message: String,
}

pub fn compile(input: &CropPlanInput) -> CompiledPrompt {
    let facts = FactSheet::new()
        .fact("Location", &input.location)
        .fact("Soil Type", &input.soil_type)
        .fact("Season", &input.season)
        .fact("Land Size", format_args!("{} acres", input.land_size))
        .fact("Irrigation Available", &input.irrigation_available)
        .fact("Budget Level", &input.budget_level)
        .maybe("Preferred Crops", input.preferred_crops.as_deref())
        .maybe("Past Crops", input.past_crops.as_deref());

    let user = format!(
        r#"You are an Indian agricultural advisor. A farmer shared these details:

{facts}

Please give:
1. 3 to 4 crops that fit this situation.
2. Fertilizer advice for the top crop.
3. Common pest and disease protection tips.
4. Seasonal weather precautions.
5. Estimated yield for the top crop.
6. Tips on where and when to sell.
7. A motivational message.

{PLAIN_ENGLISH} Keep sentences short so small farmers can follow them.

Return your answer in this exact JSON format:
{{
  "crops": ["...", "..."],
  "fertilizerSuggestions": "...",
  "pestDiseaseControl": "...",
  "weatherPrecautions": "...",
  "estimatedYield": "...",
  "marketAdvice": "...",
  "motivationalMessage": "..."
}}"#,
        facts = facts.render()
    );

    CompiledPrompt::new(SYSTEM_PROMPT, user)
}

pub struct CropAdvisor;

#[async_trait]
impl AdvisoryDomain for CropAdvisor {
    type Input = CropPlanInput;
    type Output = CropPlan;

    const NAME: &'static str = "crop-advisor";

    const INPUT: InputShape = InputShape::new(&[
        InputField::text("location"),
        InputField::text("soilType"),
        InputField::text("season"),
        InputField::text("landSize"),
        InputField::text("irrigationAvailable"),
        InputField::text("budgetLevel"),
        InputField::optional_text("preferredCrops"),
        InputField::optional_text("pastCrops"),
    ]);

    const OUTPUT: OutputShape = OutputShape::new(&[
        OutputField::text_list("crops"),
        OutputField::text("fertilizerSuggestions"),
        OutputField::text("pestDiseaseControl"),
        OutputField::text("weatherPrecautions"),
        OutputField::text("estimatedYield"),
        OutputField::text("marketAdvice"),
        OutputField::text("motivationalMessage"),
    ]);

    const MESSAGES: FailureMessages = FailureMessages {
        invalid_input: "❌ Invalid input. Please check the fields.",
        missing_key: "❌ Missing OPENROUTER_API_KEY in environment.",
        transport: "❌ Failed to communicate with AI. Please try again.",
    };

    async fn prepare(&self, input: &Self::Input) -> Preparation<Self::Output> {
        Preparation::Prompt(compile(input))
    }

    fn fallback(&self, _stage: FormatStage) -> AdvisoryResult<Self::Output> {
        AdvisoryResult::Advice(CropPlan {
            crops: vec!["❌ Could not parse AI response.".to_string()],
            fertilizer_suggestions: String::new(),
            pest_disease_control: String::new(),
            weather_precautions: String::new(),
            estimated_yield: String::new(),
            market_advice: String::new(),
            motivational_message: String::new(),
        })
    }
}
