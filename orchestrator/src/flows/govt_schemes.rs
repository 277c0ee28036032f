// orchestrator/src/flows/govt_schemes.rs

use advisory_core::{
    AdvisoryDomain, AdvisoryResult, CompiledPrompt, FactSheet, FailureMessages, FormatStage, InputField,
    InputShape, OutputField, OutputShape, Preparation,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PLAIN_ENGLISH;

const SYSTEM_PROMPT: &str =
    "You are a kind government scheme advisor who speaks only in clear English for Indian farmers.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeSearchInput {
    pub state: String,
    pub landholding_size: String,
    pub crops_grown: String,
    pub farmer_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub name: String,
    pub summary: String,
    pub eligibility: String,
    pub how_to_apply: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeList {
    pub schemes: Vec<Scheme>,
}

pub fn compile(input: &SchemeSearchInput) -> CompiledPrompt {
    let facts = FactSheet::new()
        .fact("State", &input.state)
        .fact("Land Size", format_args!("{} acres", input.landholding_size))
        .fact("Crops", &input.crops_grown)
        .fact("Farmer Category", &input.farmer_category);

    let user = format!(
        r#"You are an expert in Indian government schemes for agriculture. A farmer has shared the following:

{facts}

Your task:
1. Suggest 2 to 3 state or central government schemes that would help this farmer.
2. Keep the answer short and easy for rural farmers to understand.

{PLAIN_ENGLISH}

Respond ONLY in this strict JSON format:
{{
  "schemes": [
    {{
      "name": "Scheme Name",
      "summary": "What benefits this scheme gives.",
      "eligibility": "Who can apply.",
      "howToApply": "Simple steps to apply."
    }}
  ]
}}"#,
        facts = facts.render()
    );

    CompiledPrompt::new(SYSTEM_PROMPT, user)
}

fn placeholder(name: &str, summary: &str) -> AdvisoryResult<SchemeList> {
    AdvisoryResult::Advice(SchemeList {
        schemes: vec![Scheme {
            name: name.to_string(),
            summary: summary.to_string(),
            eligibility: "N/A".to_string(),
            how_to_apply: "N/A".to_string(),
        }],
    })
}

const SCHEME_FIELDS: &[OutputField] = &[
    OutputField::text("name"),
    OutputField::text("summary"),
    OutputField::text("eligibility"),
    OutputField::text("howToApply"),
];

pub struct GovtSchemes;

#[async_trait]
impl AdvisoryDomain for GovtSchemes {
    type Input = SchemeSearchInput;
    type Output = SchemeList;

    const NAME: &'static str = "govt-schemes";

    const INPUT: InputShape = InputShape::new(&[
        InputField::text("state"),
        InputField::text("landholdingSize"),
        InputField::text("cropsGrown"),
        InputField::text("farmerCategory"),
    ]);

    const OUTPUT: OutputShape = OutputShape::new(&[OutputField::records("schemes", SCHEME_FIELDS)]);

    const MESSAGES: FailureMessages = FailureMessages {
        invalid_input: "❌ Invalid input provided. Please check the fields.",
        missing_key: "❌ Missing OPENROUTER_API_KEY in .env file.",
        transport: "❌ Failed to connect to the AI service. Please try again later.",
    };

    async fn prepare(&self, input: &Self::Input) -> Preparation<Self::Output> {
        Preparation::Prompt(compile(input))
    }

    fn fallback(&self, stage: FormatStage) -> AdvisoryResult<Self::Output> {
        match stage {
            FormatStage::Envelope => placeholder("❌ Invalid AI response", "Unable to parse AI output."),
            FormatStage::Content | FormatStage::Shape => {
                placeholder("❌ Parsing Error", "Sorry, could not understand the AI response.")
            }
        }
    }
}
