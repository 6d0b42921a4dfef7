//! Named remediation suggestion attached to a finding template.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::language::Language;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Solution {
    pub finding_id: i64,
    pub name: String,
    pub lang: Language,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Solution attributes used for both insert and in-place update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionFields {
    pub name: String,
    pub lang: Language,
    pub text: String,
}

impl From<&Solution> for SolutionFields {
    fn from(s: &Solution) -> Self {
        Self {
            name: s.name.clone(),
            lang: s.lang,
            text: s.text.clone(),
        }
    }
}
