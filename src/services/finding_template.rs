//! Finding template service: catalog listing, CRUD, and detail loading.
//!
//! Every function works on the caller's connection, which is the request
//! transaction; nothing here commits it. Writes that can hit a unique
//! constraint run inside a savepoint so a violation leaves the request
//! transaction usable for re-rendering the form.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{Connection, PgConnection};

use crate::errors::AppError;
use crate::models::finding_template::{FindingTemplate, FindingTemplateFields, NewFindingTemplate};
use crate::models::language::Language;
use crate::models::solution::Solution;
use crate::models::translation::{FindingTemplateTranslation, NewTranslation};
use crate::services::{solution as solution_service, translation as translation_service};

/// A template with everything the details page shows.
#[derive(Debug, Clone, Serialize)]
pub struct FindingTemplateDetails {
    #[serde(flatten)]
    pub finding: FindingTemplate,
    pub translations: Vec<FindingTemplateTranslation>,
    pub solutions: Vec<Solution>,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Finding template {id} not found"))
}

fn duplicate_name(name: &str) -> String {
    format!("Finding template name {name} already exists.")
}

/// List every template in id order, each with its translated languages.
pub async fn list(conn: &mut PgConnection) -> Result<Vec<FindingTemplate>, AppError> {
    let mut findings =
        sqlx::query_as::<_, FindingTemplate>("SELECT * FROM finding_templates ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;

    let pairs = sqlx::query_as::<_, (i64, Language)>(
        "SELECT finding_id, lang FROM finding_template_translations ORDER BY finding_id, lang",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut langs: BTreeMap<i64, Vec<Language>> = BTreeMap::new();
    for (finding_id, lang) in pairs {
        langs.entry(finding_id).or_default().push(lang);
    }
    for finding in &mut findings {
        finding.langs = langs.remove(&finding.id).unwrap_or_default();
    }

    Ok(findings)
}

/// Load a template by id, including its translated languages.
pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<FindingTemplate, AppError> {
    let mut finding =
        sqlx::query_as::<_, FindingTemplate>("SELECT * FROM finding_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| not_found(id))?;
    finding.langs = langs_of(conn, id).await?;
    Ok(finding)
}

/// Languages that already have a translation for `finding_id`, in declaration order.
pub async fn langs_of(conn: &mut PgConnection, finding_id: i64) -> Result<Vec<Language>, AppError> {
    let langs = sqlx::query_scalar::<_, Language>(
        "SELECT lang FROM finding_template_translations WHERE finding_id = $1 ORDER BY lang",
    )
    .bind(finding_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(langs)
}

/// Load a template together with its translations and solutions.
pub async fn details(conn: &mut PgConnection, id: i64) -> Result<FindingTemplateDetails, AppError> {
    let finding = find_by_id(conn, id).await?;
    let translations = translation_service::list_for(conn, id).await?;
    let solutions = solution_service::list_for(conn, id).await?;
    Ok(FindingTemplateDetails {
        finding,
        translations,
        solutions,
    })
}

/// Create a template and its first translation as one unit.
///
/// A duplicate name yields `AppError::Conflict`.
pub async fn create(
    conn: &mut PgConnection,
    new: &NewFindingTemplate,
    first: &NewTranslation,
) -> Result<FindingTemplate, AppError> {
    let mut savepoint = conn.begin().await?;
    match insert_with_translation(&mut savepoint, new, first).await {
        Ok(mut finding) => {
            savepoint.commit().await?;
            finding.langs = vec![first.lang];
            tracing::info!(
                finding_id = finding.id,
                creator = %finding.creator,
                lang = %first.lang,
                "Created finding template"
            );
            Ok(finding)
        }
        Err(e) => {
            savepoint.rollback().await?;
            Err(AppError::conflict_on_unique(e, || {
                duplicate_name(&new.fields.name)
            }))
        }
    }
}

async fn insert_with_translation(
    conn: &mut PgConnection,
    new: &NewFindingTemplate,
    first: &NewTranslation,
) -> Result<FindingTemplate, sqlx::Error> {
    let f = &new.fields;
    let finding = sqlx::query_as::<_, FindingTemplate>(
        r#"
        INSERT INTO finding_templates (name, finding_type, owasp_category, owasp_mobile_category,
            masvs, asvs, cvss_v3_vector, cvss_v3_score, creator)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&f.name)
    .bind(f.finding_type)
    .bind(f.owasp_category)
    .bind(f.owasp_mobile_category)
    .bind(&f.masvs)
    .bind(&f.asvs)
    .bind(&f.cvss_v3_vector)
    .bind(f.cvss_v3_score)
    .bind(&new.creator)
    .fetch_one(&mut *conn)
    .await?;

    translation_service::insert(conn, finding.id, first).await?;
    Ok(finding)
}

/// Overwrite every editable attribute of a template.
///
/// Missing id yields `AppError::NotFound`; renaming onto an existing name
/// yields `AppError::Conflict`.
pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    fields: &FindingTemplateFields,
) -> Result<FindingTemplate, AppError> {
    let mut savepoint = conn.begin().await?;
    let updated = sqlx::query_as::<_, FindingTemplate>(
        r#"
        UPDATE finding_templates SET
            name = $2,
            finding_type = $3,
            owasp_category = $4,
            owasp_mobile_category = $5,
            masvs = $6,
            asvs = $7,
            cvss_v3_vector = $8,
            cvss_v3_score = $9,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&fields.name)
    .bind(fields.finding_type)
    .bind(fields.owasp_category)
    .bind(fields.owasp_mobile_category)
    .bind(&fields.masvs)
    .bind(&fields.asvs)
    .bind(&fields.cvss_v3_vector)
    .bind(fields.cvss_v3_score)
    .fetch_optional(&mut *savepoint)
    .await;

    let mut finding = match updated {
        Ok(Some(finding)) => {
            savepoint.commit().await?;
            finding
        }
        Ok(None) => {
            savepoint.rollback().await?;
            return Err(not_found(id));
        }
        Err(e) => {
            savepoint.rollback().await?;
            return Err(AppError::conflict_on_unique(e, || duplicate_name(&fields.name)));
        }
    };

    finding.langs = langs_of(conn, id).await?;
    tracing::info!(finding_id = id, "Updated finding template");
    Ok(finding)
}

/// Delete a template; translations and solutions go with it.
pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM finding_templates WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    tracing::info!(finding_id = id, "Deleted finding template");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_id() {
        let err = not_found(41);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: Finding template 41 not found");
    }

    #[test]
    fn duplicate_name_message() {
        assert_eq!(
            duplicate_name("SQLi"),
            "Finding template name SQLi already exists."
        );
    }
}
