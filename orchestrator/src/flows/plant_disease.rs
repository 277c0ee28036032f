// orchestrator/src/flows/plant_disease.rs

use advisory_core::{
    AdvisoryDomain, AdvisoryResult, CompiledPrompt, FactSheet, FailureMessages, FormatStage, InputField,
    InputShape, OutputField, OutputShape, Preparation,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PLAIN_ENGLISH;

const SYSTEM_PROMPT: &str =
    "You are a friendly plant doctor for Indian farmers. Only use clear, simple English.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomReport {
    pub crop_type: String,
    pub growth_stage: String,
    pub symptoms_observed: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub disease: String,
    pub description: String,
    pub solution: String,
    pub motivational_message: String,
}

pub fn compile(input: &SymptomReport) -> CompiledPrompt {
    let facts = FactSheet::new()
        .fact("Crop", &input.crop_type)
        .fact("Growth Stage", &input.growth_stage)
        .fact("Symptoms", &input.symptoms_observed)
        .maybe("Location", input.location.as_deref());

    let user = format!(
        r#"You are a plant disease expert who helps Indian farmers. Based on the following input:

{facts}

{PLAIN_ENGLISH} Use farmer-friendly words.

Respond only in this exact JSON format:
{{
  "disease": "Name of the disease, or 'Healthy', or 'Unknown'",
  "description": "Short explanation of the disease in simple English",
  "solution": "Step-by-step treatment, organic and chemical if needed",
  "motivationalMessage": "Short, positive encouragement for the farmer"
}}"#,
        facts = facts.render()
    );

    CompiledPrompt::new(SYSTEM_PROMPT, user)
}

pub struct PlantDisease;

#[async_trait]
impl AdvisoryDomain for PlantDisease {
    type Input = SymptomReport;
    type Output = Diagnosis;

    const NAME: &'static str = "plant-disease";

    const INPUT: InputShape = InputShape::new(&[
        InputField::text("cropType"),
        InputField::text("growthStage"),
        InputField::text("symptomsObserved"),
        InputField::optional_text("location"),
    ]);

    // `solution` often comes back as a list of steps or an object; the text
    // coercion pretty-prints it. It is the one field that must be present.
    const OUTPUT: OutputShape = OutputShape::new(&[
        OutputField::text("disease").lenient(),
        OutputField::text("description").lenient(),
        OutputField::text("solution"),
        OutputField::text("motivationalMessage").lenient(),
    ]);

    const MESSAGES: FailureMessages = FailureMessages {
        invalid_input: "❌ Invalid input. Please check all fields.",
        missing_key: "❌ Missing OPENROUTER_API_KEY in .env file.",
        transport: "⚠️ Could not connect to AI. Please try again later.",
    };

    async fn prepare(&self, input: &Self::Input) -> Preparation<Self::Output> {
        Preparation::Prompt(compile(input))
    }

    fn fallback(&self, _stage: FormatStage) -> AdvisoryResult<Self::Output> {
        AdvisoryResult::failed("⚠️ AI response could not be understood. Please try again.")
    }
}
