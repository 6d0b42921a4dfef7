//! Add/edit form for remediation solutions.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::{choice_value, FormErrors};
use crate::models::language::Language;
use crate::models::solution::{Solution, SolutionFields};

/// Solution names appear as a URL path segment. Emptiness is left to the length check.
static SOLUTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/?#%]*$").expect("solution name pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SolutionForm {
    #[validate(
        length(min = 1, max = 64, message = "Name must be 1 to 64 characters."),
        regex(path = *SOLUTION_NAME, message = "Name cannot contain '/', '?', '#' or '%'.")
    )]
    pub name: String,
    pub lang: String,
    #[validate(length(min = 1, message = "Text is required."))]
    pub text: String,
}

impl SolutionForm {
    /// Validate the trimmed input; a blank name or text is an error.
    pub fn to_fields(&self) -> Result<SolutionFields, FormErrors> {
        let form = Self {
            name: self.name.trim().to_string(),
            lang: self.lang.clone(),
            text: self.text.trim().to_string(),
        };
        let mut errors = FormErrors::validate(&form);
        let lang = errors.required_choice::<Language>("lang", &form.lang);

        match lang {
            Some(lang) if errors.is_empty() => Ok(SolutionFields {
                name: form.name,
                lang,
                text: form.text,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&Solution> for SolutionForm {
    fn from(s: &Solution) -> Self {
        Self {
            name: s.name.clone(),
            lang: choice_value(&s.lang),
            text: s.text.clone(),
        }
    }
}
