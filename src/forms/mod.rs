//! Submitted form bodies, their validation, and conversion into typed commands.
//!
//! Form structs mirror what a browser posts: every field arrives as text, so
//! enum choices and numbers are parsed here and reported as per-field errors
//! instead of rejecting the whole request.

pub mod finding;
pub mod solution;
pub mod translation;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

/// Per-field error messages shown next to the offending inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Run the derived validators of `form`, collecting their messages.
    pub fn validate<F: Validate>(form: &F) -> Self {
        match form.validate() {
            Ok(()) => Self::default(),
            Err(errors) => Self::from(errors),
        }
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn merge(&mut self, other: FormErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parse a mandatory choice field, recording an error when it is blank or unknown.
    pub fn required_choice<T: DeserializeOwned>(&mut self, field: &str, raw: &str) -> Option<T> {
        if raw.trim().is_empty() {
            self.push(field, "This field is required.");
            return None;
        }
        let parsed = parse_choice(raw);
        if parsed.is_none() {
            self.push(field, "Not a valid choice.");
        }
        parsed
    }

    /// Parse an optional choice field; blank means "not set".
    pub fn optional_choice<T: DeserializeOwned>(
        &mut self,
        field: &str,
        raw: Option<&str>,
    ) -> Option<T> {
        let raw = raw?;
        let parsed = parse_choice(raw);
        if parsed.is_none() {
            self.push(field, "Not a valid choice.");
        }
        parsed
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::default();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", err.code));
                out.push(&field, message);
            }
        }
        out
    }
}

/// A form as handed to a view: the submitted (or pre-filled) data plus errors.
#[derive(Debug, Clone, Serialize)]
pub struct FormView<F: Serialize> {
    pub data: F,
    pub errors: FormErrors,
}

impl<F: Serialize> FormView<F> {
    pub fn new(data: F) -> Self {
        Self {
            data,
            errors: FormErrors::default(),
        }
    }

    pub fn with_errors(data: F, errors: FormErrors) -> Self {
        Self { data, errors }
    }
}

/// One `<option>` of a select input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// Parse a submitted choice through the type's serde representation.
pub fn parse_choice<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string())).ok()
}

/// Inverse of [`parse_choice`], used to pre-fill forms from stored values.
pub fn choice_value<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

/// Deserialize an optional text input, treating a blank submission as absent.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
