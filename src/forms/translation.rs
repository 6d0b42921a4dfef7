//! Translation forms: the shared text block and the add-translation form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::{choice_value, empty_as_none, Choice, FormErrors};
use crate::models::language::Language;
use crate::models::translation::{FindingTemplateTranslation, NewTranslation, TranslationText};

/// Localized text fields; also the whole edit-translation form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TranslationForm {
    #[validate(length(min = 1, max = 256, message = "Title must be 1 to 256 characters."))]
    pub title: String,
    #[validate(length(min = 1, message = "Definition is required."))]
    pub definition: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub references: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

impl TranslationForm {
    /// Validate the trimmed text; blank title or definition is an error.
    pub fn to_text(&self) -> Result<TranslationText, FormErrors> {
        let form = Self {
            title: self.title.trim().to_string(),
            definition: self.definition.trim().to_string(),
            ..self.clone()
        };
        let errors = FormErrors::validate(&form);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(TranslationText {
            title: form.title,
            definition: form.definition,
            references: form.references,
            description: form.description,
        })
    }
}

impl From<&FindingTemplateTranslation> for TranslationForm {
    fn from(t: &FindingTemplateTranslation) -> Self {
        Self {
            title: t.title.clone(),
            definition: t.definition.clone(),
            references: t.references.clone(),
            description: t.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddTranslationForm {
    #[serde(default)]
    pub lang: String,
    #[serde(flatten)]
    pub text: TranslationForm,
}

impl AddTranslationForm {
    pub fn to_command(&self) -> Result<NewTranslation, FormErrors> {
        let mut errors = FormErrors::default();
        let lang = errors.required_choice::<Language>("lang", &self.lang);
        let text = self.text.to_text().map_err(|e| errors.merge(e)).ok();

        match (lang, text) {
            (Some(lang), Some(text)) if errors.is_empty() => Ok(NewTranslation { lang, text }),
            _ => Err(errors),
        }
    }
}

/// Select options for the languages still open on a finding.
pub fn language_choices(languages: &[Language]) -> Vec<Choice> {
    languages
        .iter()
        .map(|lang| Choice {
            value: choice_value(lang),
            label: lang.label().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_text_becomes_none() {
        let form: TranslationForm =
            serde_urlencoded::from_str("title=XSS&definition=Script+injection&references=+&description=")
                .unwrap();
        let text = form.to_text().unwrap();
        assert_eq!(text.references, None);
        assert_eq!(text.description, None);
    }

    #[test]
    fn title_is_required() {
        let form = TranslationForm {
            definition: "x".to_string(),
            ..Default::default()
        };
        let errors = form.to_text().unwrap_err();
        assert_eq!(errors.field("title"), ["Title must be 1 to 256 characters."]);
        assert!(errors.field("definition").is_empty());
    }

    #[test]
    fn whitespace_only_title_and_definition_are_rejected() {
        let form = TranslationForm {
            title: " \t ".to_string(),
            definition: "\n".to_string(),
            ..Default::default()
        };
        let errors = form.to_text().unwrap_err();
        assert_eq!(errors.field("title"), ["Title must be 1 to 256 characters."]);
        assert_eq!(errors.field("definition"), ["Definition is required."]);
    }

    #[test]
    fn add_form_parses_language() {
        let form: AddTranslationForm =
            serde_urlencoded::from_str("lang=fr&title=Injection+SQL&definition=Requ%C3%AAte")
                .unwrap();
        let cmd = form.to_command().unwrap();
        assert_eq!(cmd.lang, Language::French);
        assert_eq!(cmd.text.definition, "Requête");
    }

    #[test]
    fn add_form_without_language_is_a_field_error() {
        let form = AddTranslationForm {
            lang: String::new(),
            text: TranslationForm {
                title: "t".to_string(),
                definition: "d".to_string(),
                ..Default::default()
            },
        };
        let errors = form.to_command().unwrap_err();
        assert_eq!(errors.field("lang"), ["This field is required."]);
    }

    #[test]
    fn choices_use_codes_and_labels() {
        let choices = language_choices(&[Language::Italian]);
        assert_eq!(
            choices,
            vec![Choice {
                value: "it".to_string(),
                label: "Italian".to_string()
            }]
        );
    }
}
