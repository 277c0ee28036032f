use std::fmt::Display;

use serde_json::Value;

/// System and user instruction pair sent to the chat-completion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt {
    pub system: String,
    pub user: String,
}

impl CompiledPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self { system: system.into(), user: user.into() }
    }

    /// Chat messages in the order the API expects them.
    pub fn messages(&self) -> Vec<Value> {
        vec![
            serde_json::json!({"role": "system", "content": self.system}),
            serde_json::json!({"role": "user", "content": self.user}),
        ]
    }
}

/// Bullet list of farmer-supplied facts, one `- Label: value` line each.
///
/// Optional facts that are absent produce no line at all.
#[derive(Debug, Default, Clone)]
pub struct FactSheet {
    lines: Vec<String>,
}

impl FactSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fact(mut self, label: &str, value: impl Display) -> Self {
        self.lines.push(format!("- {label}: {value}"));
        self
    }

    pub fn maybe<T: Display>(self, label: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.fact(label, value),
            None => self,
        }
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}
