// advisory_core/src/shape.rs

use serde_json::{Map, Value};

use crate::error::{ShapeError, ValidationError};

/// Primitive kinds accepted in an advisory request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Text,
    Number,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Text => "string",
            Primitive::Number => "number",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Primitive::Text => value.is_string(),
            Primitive::Number => value.is_number(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    pub name: &'static str,
    pub kind: Primitive,
    pub required: bool,
}

impl InputField {
    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: Primitive::Text, required: true }
    }

    pub const fn optional_text(name: &'static str) -> Self {
        Self { name, kind: Primitive::Text, required: false }
    }

    pub const fn optional_number(name: &'static str) -> Self {
        Self { name, kind: Primitive::Number, required: false }
    }
}

/// Declared shape of an advisory request.
#[derive(Debug, Clone, Copy)]
pub struct InputShape {
    fields: &'static [InputField],
}

impl InputShape {
    pub const fn new(fields: &'static [InputField]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [InputField] {
        self.fields
    }

    /// Checks `request` against the shape and returns the normalized field map.
    ///
    /// Null and blank optional values are dropped, unknown keys are ignored.
    pub fn validate(&self, request: &Value) -> Result<Map<String, Value>, ValidationError> {
        let object = request.as_object().ok_or(ValidationError::NotAnObject)?;
        let mut normalized = Map::new();

        for field in self.fields {
            let value = match object.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ValidationError::MissingField(field.name.to_string()))
                }
                None | Some(Value::Null) => continue,
                Some(value) => value,
            };

            if !field.kind.matches(value) {
                return Err(ValidationError::WrongType {
                    field: field.name.to_string(),
                    expected: field.kind.name(),
                });
            }

            if value.as_str().is_some_and(|text| text.trim().is_empty()) {
                if field.required {
                    return Err(ValidationError::EmptyField(field.name.to_string()));
                }
                continue;
            }

            normalized.insert(field.name.to_string(), value.clone());
        }

        Ok(normalized)
    }
}

/// Kind of a field in the model's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Text,
    TextList,
    Records(&'static [OutputField]),
}

impl OutputKind {
    pub fn describe(self) -> &'static str {
        match self {
            OutputKind::Text => "a string",
            OutputKind::TextList => "a list of strings",
            OutputKind::Records(_) => "a list of objects",
        }
    }

    /// Value used for a lenient field the model left out.
    pub fn empty(self) -> Value {
        match self {
            OutputKind::Text => Value::String(String::new()),
            OutputKind::TextList | OutputKind::Records(_) => Value::Array(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputField {
    pub name: &'static str,
    pub kind: OutputKind,
    /// Lenient fields fall back to their empty value instead of failing the reply.
    pub lenient: bool,
}

impl OutputField {
    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: OutputKind::Text, lenient: false }
    }

    pub const fn text_list(name: &'static str) -> Self {
        Self { name, kind: OutputKind::TextList, lenient: false }
    }

    pub const fn records(name: &'static str, fields: &'static [OutputField]) -> Self {
        Self { name, kind: OutputKind::Records(fields), lenient: false }
    }

    pub const fn lenient(self) -> Self {
        Self { lenient: true, ..self }
    }
}

/// Declared shape of an advisory reply.
#[derive(Debug, Clone, Copy)]
pub struct OutputShape {
    fields: &'static [OutputField],
}

impl OutputShape {
    pub const fn new(fields: &'static [OutputField]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [OutputField] {
        self.fields
    }

    /// Strict check, no coercion. Every declared field must be present with its exact type.
    pub fn validate(&self, value: &Value) -> Result<(), ShapeError> {
        validate_record(value, self.fields, "$")
    }
}

fn validate_record(value: &Value, fields: &[OutputField], path: &str) -> Result<(), ShapeError> {
    let object = value
        .as_object()
        .ok_or_else(|| ShapeError::NotAnObject { path: path.to_string() })?;

    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        let value = object
            .get(field.name)
            .ok_or_else(|| ShapeError::MissingField { path: field_path.clone() })?;
        let mismatch = |found: &Value| ShapeError::Mismatch {
            path: field_path.clone(),
            expected: field.kind.describe(),
            found: json_type_name(found),
        };

        match (field.kind, value) {
            (OutputKind::Text, Value::String(_)) => {}
            (OutputKind::TextList, Value::Array(items)) => {
                if let Some(bad) = items.iter().find(|item| !item.is_string()) {
                    return Err(mismatch(bad));
                }
            }
            (OutputKind::Records(inner), Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    validate_record(item, inner, &format!("{field_path}[{index}]"))?;
                }
            }
            (_, other) => return Err(mismatch(other)),
        }
    }

    Ok(())
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
