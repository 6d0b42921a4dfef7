//! Create and edit forms for finding templates.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::forms::translation::TranslationForm;
use crate::forms::{choice_value, empty_as_none, FormErrors};
use crate::models::finding_template::{
    FindingTemplate, FindingTemplateFields, FindingType, OwaspCategory, OwaspMobileCategory,
};
use crate::models::language::Language;
use crate::models::translation::NewTranslation;

/// CVSS v3.0/v3.1 vector: mandatory base metrics, then any temporal or environmental ones.
static CVSS_V3_VECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^CVSS:3\.[01]/AV:[NALP]/AC:[LH]/PR:[NLH]/UI:[NR]/S:[UC]/C:[NLH]/I:[NLH]/A:[NLH](/[A-Z]{1,3}:[A-Z])*$",
    )
    .expect("CVSS vector pattern is valid")
});

/// Attributes of the finding template itself, shared by the create and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FindingTemplateForm {
    #[validate(length(min = 1, max = 128, message = "Name must be 1 to 128 characters."))]
    pub name: String,
    pub finding_type: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub owasp_category: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub owasp_mobile_category: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    #[validate(length(max = 64, message = "MASVS reference is too long."))]
    pub masvs: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    #[validate(length(max = 64, message = "ASVS reference is too long."))]
    pub asvs: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    #[validate(regex(path = *CVSS_V3_VECTOR, message = "Not a valid CVSS v3 vector."))]
    pub cvss_v3_vector: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_cvss_score"))]
    pub cvss_v3_score: Option<String>,
}

fn validate_cvss_score(raw: &str) -> Result<(), ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(score) if (0.0..=10.0).contains(&score) => Ok(()),
        _ => Err(ValidationError::new("cvss_score")
            .with_message("CVSS score must be a number between 0.0 and 10.0.".into())),
    }
}

impl FindingTemplateForm {
    fn trimmed(&self) -> Self {
        let trim = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            name: self.name.trim().to_string(),
            masvs: trim(&self.masvs),
            asvs: trim(&self.asvs),
            cvss_v3_vector: trim(&self.cvss_v3_vector),
            ..self.clone()
        }
    }

    /// Validate and convert into the typed attributes of a template.
    ///
    /// Text is trimmed before validation, so a blank name is rejected.
    pub fn to_fields(&self) -> Result<FindingTemplateFields, FormErrors> {
        let form = self.trimmed();
        let mut errors = FormErrors::validate(&form);
        let finding_type = errors.required_choice::<FindingType>("finding_type", &form.finding_type);
        let owasp_category =
            errors.optional_choice::<OwaspCategory>("owasp_category", form.owasp_category.as_deref());
        let owasp_mobile_category = errors.optional_choice::<OwaspMobileCategory>(
            "owasp_mobile_category",
            form.owasp_mobile_category.as_deref(),
        );
        let cvss_v3_score = form
            .cvss_v3_score
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok());

        match finding_type {
            Some(finding_type) if errors.is_empty() => Ok(FindingTemplateFields {
                name: form.name,
                finding_type,
                owasp_category,
                owasp_mobile_category,
                masvs: form.masvs,
                asvs: form.asvs,
                cvss_v3_vector: form.cvss_v3_vector,
                cvss_v3_score,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&FindingTemplate> for FindingTemplateForm {
    fn from(f: &FindingTemplate) -> Self {
        Self {
            name: f.name.clone(),
            finding_type: choice_value(&f.finding_type),
            owasp_category: f.owasp_category.as_ref().map(choice_value),
            owasp_mobile_category: f.owasp_mobile_category.as_ref().map(choice_value),
            masvs: f.masvs.clone(),
            asvs: f.asvs.clone(),
            cvss_v3_vector: f.cvss_v3_vector.clone(),
            cvss_v3_score: f.cvss_v3_score.map(|s| s.to_string()),
        }
    }
}

/// Combined form creating a template together with its first translation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateFindingForm {
    #[serde(flatten)]
    pub finding: FindingTemplateForm,
    #[serde(default)]
    pub lang: String,
    #[serde(flatten)]
    pub translation: TranslationForm,
}

impl CreateFindingForm {
    /// Validate both halves, reporting every field error at once.
    pub fn to_commands(&self) -> Result<(FindingTemplateFields, NewTranslation), FormErrors> {
        let mut errors = FormErrors::default();
        let fields = self.finding.to_fields().map_err(|e| errors.merge(e)).ok();
        let lang = errors.required_choice::<Language>("lang", &self.lang);
        let text = self.translation.to_text().map_err(|e| errors.merge(e)).ok();

        match (fields, lang, text) {
            (Some(fields), Some(lang), Some(text)) if errors.is_empty() => {
                Ok((fields, NewTranslation { lang, text }))
            }
            _ => Err(errors),
        }
    }
}
