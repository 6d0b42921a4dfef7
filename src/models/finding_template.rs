//! Finding template model: the catalog entry owning translations and solutions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::language::Language;

// -- Enums matching PostgreSQL --

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "finding_type")]
pub enum FindingType {
    Web,
    Mobile,
    Infra,
    #[sqlx(rename = "OSINT")]
    #[serde(rename = "OSINT")]
    Osint,
    Config,
    Other,
}

/// OWASP Top 10 (2017).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "owasp_category")]
pub enum OwaspCategory {
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    A8,
    A9,
    A10,
}

/// OWASP Mobile Top 10 (2016).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "owasp_mobile_category")]
pub enum OwaspMobileCategory {
    M1,
    M2,
    M3,
    M4,
    M5,
    M6,
    M7,
    M8,
    M9,
    M10,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FindingTemplate {
    pub id: i64,
    pub name: String,
    pub finding_type: FindingType,
    pub owasp_category: Option<OwaspCategory>,
    pub owasp_mobile_category: Option<OwaspMobileCategory>,
    pub masvs: Option<String>,
    pub asvs: Option<String>,
    pub cvss_v3_vector: Option<String>,
    pub cvss_v3_score: Option<f64>,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Languages with an existing translation, filled in after the row is loaded.
    #[sqlx(skip)]
    pub langs: Vec<Language>,
}

/// Attributes of a finding template as entered on the create and edit forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingTemplateFields {
    pub name: String,
    pub finding_type: FindingType,
    pub owasp_category: Option<OwaspCategory>,
    pub owasp_mobile_category: Option<OwaspMobileCategory>,
    pub masvs: Option<String>,
    pub asvs: Option<String>,
    pub cvss_v3_vector: Option<String>,
    pub cvss_v3_score: Option<f64>,
}

/// Insert command for a new template; `creator` comes from the session, never the form.
#[derive(Debug, Clone)]
pub struct NewFindingTemplate {
    pub creator: String,
    pub fields: FindingTemplateFields,
}

impl From<&FindingTemplate> for FindingTemplateFields {
    fn from(f: &FindingTemplate) -> Self {
        Self {
            name: f.name.clone(),
            finding_type: f.finding_type,
            owasp_category: f.owasp_category,
            owasp_mobile_category: f.owasp_mobile_category,
            masvs: f.masvs.clone(),
            asvs: f.asvs.clone(),
            cvss_v3_vector: f.cvss_v3_vector.clone(),
            cvss_v3_score: f.cvss_v3_score,
        }
    }
}
