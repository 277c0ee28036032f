// orchestrator/src/flows/pest_disease.rs

use advisory_core::{
    AdvisoryDomain, AdvisoryResult, CompiledPrompt, FactSheet, FailureMessages, FormatStage, InputField,
    InputShape, OutputField, OutputShape, Preparation,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PLAIN_ENGLISH;

const SYSTEM_PROMPT: &str = "You are a helpful agricultural assistant. Use only simple English.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatReportInput {
    pub crop_type: String,
    pub growth_stage: String,
    pub symptoms_observed: String,
    pub organic_preference: String,
    pub weather_conditions: Option<String>,
    pub chemicals_used_earlier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatAssessment {
    pub pest_threats: Vec<String>,
    pub disease_threats: Vec<String>,
    pub preventative_measures: Vec<String>,
    pub organic_treatments: Vec<String>,
    pub chemical_treatments: Vec<String>,
}

pub fn compile(input: &ThreatReportInput) -> CompiledPrompt {
    let facts = FactSheet::new()
        .fact("Growth Stage", &input.growth_stage)
        .fact("Symptoms", &input.symptoms_observed)
        .fact("Organic Preference", &input.organic_preference)
        .maybe("Weather Conditions", input.weather_conditions.as_deref())
        .maybe("Previously Used Chemicals", input.chemicals_used_earlier.as_deref());

    let user = format!(
        r#"You are a pest and plant disease expert helping Indian farmers.

A farmer is growing {crop}. Identify the likely threats and how to prevent them, based on this report:

{facts}

{PLAIN_ENGLISH} Avoid technical terms so rural farmers can follow the advice.

Return the response in exactly this JSON format:
{{
  "pestThreats": ["..."],
  "diseaseThreats": ["..."],
  "preventativeMeasures": ["..."],
  "organicTreatments": ["..."],
  "chemicalTreatments": ["..."]
}}
Only return the JSON. No explanation."#,
        crop = input.crop_type,
        facts = facts.render()
    );

    CompiledPrompt::new(SYSTEM_PROMPT, user)
}

pub struct PestAndDisease;

#[async_trait]
impl AdvisoryDomain for PestAndDisease {
    type Input = ThreatReportInput;
    type Output = ThreatAssessment;

    const NAME: &'static str = "pest-and-disease";

    const INPUT: InputShape = InputShape::new(&[
        InputField::text("cropType"),
        InputField::text("growthStage"),
        InputField::text("symptomsObserved"),
        InputField::text("organicPreference"),
        InputField::optional_text("weatherConditions"),
        InputField::optional_text("chemicalsUsedEarlier"),
    ]);

    // A list the model leaves out (or sends as a non-list) becomes empty.
    const OUTPUT: OutputShape = OutputShape::new(&[
        OutputField::text_list("pestThreats").lenient(),
        OutputField::text_list("diseaseThreats").lenient(),
        OutputField::text_list("preventativeMeasures").lenient(),
        OutputField::text_list("organicTreatments").lenient(),
        OutputField::text_list("chemicalTreatments").lenient(),
    ]);

    const MESSAGES: FailureMessages = FailureMessages {
        invalid_input: "❌ Invalid input provided.",
        missing_key: "❌ Missing OPENROUTER_API_KEY in .env file.",
        transport: "An error occurred while communicating with the AI service. Please check the logs or API key.",
    };

    async fn prepare(&self, input: &Self::Input) -> Preparation<Self::Output> {
        Preparation::Prompt(compile(input))
    }

    fn fallback(&self, stage: FormatStage) -> AdvisoryResult<Self::Output> {
        match stage {
            FormatStage::Content => AdvisoryResult::failed("AI returned badly formatted data. Please try again."),
            FormatStage::Envelope | FormatStage::Shape => {
                AdvisoryResult::failed("Something went wrong while processing AI response.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercer::coerce;
    use serde_json::json;

    #[test]
    fn crop_is_named_in_the_prompt_body() {
        let prompt = compile(&ThreatReportInput {
            crop_type: "Cotton".into(),
            growth_stage: "Flowering".into(),
            symptoms_observed: "Curling leaves".into(),
            organic_preference: "No".into(),
            weather_conditions: None,
            chemicals_used_earlier: None,
        });

        assert!(prompt.user.contains("growing Cotton"));
        assert!(!prompt.user.contains("Weather Conditions:"));
        assert!(!prompt.user.contains("Previously Used Chemicals:"));
    }

    #[test]
    fn missing_lists_are_filled_in() {
        let coerced = coerce(json!({"pestThreats": ["Whitefly"]}), &PestAndDisease::OUTPUT).unwrap();
        let assessment: ThreatAssessment = serde_json::from_value(coerced).unwrap();

        assert_eq!(assessment.pest_threats, vec!["Whitefly"]);
        assert!(assessment.chemical_treatments.is_empty());
    }

    #[test]
    fn format_failures_degrade_to_error_results() {
        assert_eq!(
            PestAndDisease.fallback(FormatStage::Content).error(),
            Some("AI returned badly formatted data. Please try again.")
        );
        assert!(PestAndDisease.fallback(FormatStage::Envelope).is_failed());
    }
}
