//! Localized text for one finding template in one language.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::language::Language;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FindingTemplateTranslation {
    pub finding_id: i64,
    pub lang: Language,
    pub title: String,
    pub definition: String,
    pub references: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable text of a translation. The language is part of the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationText {
    pub title: String,
    pub definition: String,
    pub references: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTranslation {
    pub lang: Language,
    pub text: TranslationText,
}

impl From<&FindingTemplateTranslation> for TranslationText {
    fn from(t: &FindingTemplateTranslation) -> Self {
        Self {
            title: t.title.clone(),
            definition: t.definition.clone(),
            references: t.references.clone(),
            description: t.description.clone(),
        }
    }
}
