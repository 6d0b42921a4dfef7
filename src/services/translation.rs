//! Translation service: per-language text of a finding template.

use sqlx::{Connection, PgConnection};

use crate::errors::AppError;
use crate::models::language::Language;
use crate::models::translation::{FindingTemplateTranslation, NewTranslation, TranslationText};

fn not_found(finding_id: i64, lang: Language) -> AppError {
    AppError::NotFound(format!(
        "Translation '{lang}' of finding template {finding_id} not found"
    ))
}

/// Message shown when a language is submitted twice for the same finding.
pub fn duplicate_language(lang: Language) -> String {
    format!("Language {lang} already created for this finding.")
}

pub async fn list_for(
    conn: &mut PgConnection,
    finding_id: i64,
) -> Result<Vec<FindingTemplateTranslation>, AppError> {
    let translations = sqlx::query_as::<_, FindingTemplateTranslation>(
        "SELECT * FROM finding_template_translations WHERE finding_id = $1 ORDER BY lang",
    )
    .bind(finding_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(translations)
}

pub async fn find(
    conn: &mut PgConnection,
    finding_id: i64,
    lang: Language,
) -> Result<FindingTemplateTranslation, AppError> {
    sqlx::query_as::<_, FindingTemplateTranslation>(
        "SELECT * FROM finding_template_translations WHERE finding_id = $1 AND lang = $2",
    )
    .bind(finding_id)
    .bind(lang)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| not_found(finding_id, lang))
}

/// Raw insert; callers decide how a key violation is reported.
pub(crate) async fn insert(
    conn: &mut PgConnection,
    finding_id: i64,
    new: &NewTranslation,
) -> Result<FindingTemplateTranslation, sqlx::Error> {
    sqlx::query_as::<_, FindingTemplateTranslation>(
        r#"
        INSERT INTO finding_template_translations
            (finding_id, lang, title, definition, "references", description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(finding_id)
    .bind(new.lang)
    .bind(&new.text.title)
    .bind(&new.text.definition)
    .bind(&new.text.references)
    .bind(&new.text.description)
    .fetch_one(&mut *conn)
    .await
}

/// Add a translation. The `(finding_id, lang)` key turns a duplicate,
/// including one racing in from another request, into `AppError::Conflict`.
pub async fn create(
    conn: &mut PgConnection,
    finding_id: i64,
    new: &NewTranslation,
) -> Result<FindingTemplateTranslation, AppError> {
    let mut savepoint = conn.begin().await?;
    match insert(&mut savepoint, finding_id, new).await {
        Ok(translation) => {
            savepoint.commit().await?;
            tracing::info!(finding_id, lang = %new.lang, "Added translation");
            Ok(translation)
        }
        Err(e) => {
            savepoint.rollback().await?;
            Err(AppError::conflict_on_unique(e, || duplicate_language(new.lang)))
        }
    }
}

/// Replace the text of an existing translation.
pub async fn update(
    conn: &mut PgConnection,
    finding_id: i64,
    lang: Language,
    text: &TranslationText,
) -> Result<FindingTemplateTranslation, AppError> {
    let translation = sqlx::query_as::<_, FindingTemplateTranslation>(
        r#"
        UPDATE finding_template_translations SET
            title = $3,
            definition = $4,
            "references" = $5,
            description = $6,
            updated_at = NOW()
        WHERE finding_id = $1 AND lang = $2
        RETURNING *
        "#,
    )
    .bind(finding_id)
    .bind(lang)
    .bind(&text.title)
    .bind(&text.definition)
    .bind(&text.references)
    .bind(&text.description)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| not_found(finding_id, lang))?;

    tracing::info!(finding_id, lang = %lang, "Updated translation");
    Ok(translation)
}

pub async fn delete(conn: &mut PgConnection, finding_id: i64, lang: Language) -> Result<(), AppError> {
    let result =
        sqlx::query("DELETE FROM finding_template_translations WHERE finding_id = $1 AND lang = $2")
            .bind(finding_id)
            .bind(lang)
            .execute(&mut *conn)
            .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(finding_id, lang));
    }
    tracing::info!(finding_id, lang = %lang, "Deleted translation");
    Ok(())
}
