//! Solution service: named remediation text scoped to one finding template.

use sqlx::{Connection, PgConnection};

use crate::errors::AppError;
use crate::models::solution::{Solution, SolutionFields};

fn not_found(finding_id: i64, name: &str) -> AppError {
    AppError::NotFound(format!(
        "Solution '{name}' of finding template {finding_id} not found"
    ))
}

/// Field error shown when a solution name is already used within the finding.
pub fn duplicate_name(name: &str) -> String {
    format!("Solution name {name} already exist for this finding.")
}

pub async fn list_for(conn: &mut PgConnection, finding_id: i64) -> Result<Vec<Solution>, AppError> {
    let solutions = sqlx::query_as::<_, Solution>(
        "SELECT * FROM solutions WHERE finding_id = $1 ORDER BY name",
    )
    .bind(finding_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(solutions)
}

pub async fn find(conn: &mut PgConnection, finding_id: i64, name: &str) -> Result<Solution, AppError> {
    sqlx::query_as::<_, Solution>("SELECT * FROM solutions WHERE finding_id = $1 AND name = $2")
        .bind(finding_id)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found(finding_id, name))
}

/// Attach a solution; a name already used in this finding yields `AppError::Conflict`.
pub async fn create(
    conn: &mut PgConnection,
    finding_id: i64,
    fields: &SolutionFields,
) -> Result<Solution, AppError> {
    let mut savepoint = conn.begin().await?;
    let inserted = sqlx::query_as::<_, Solution>(
        "INSERT INTO solutions (finding_id, name, lang, text) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(finding_id)
    .bind(&fields.name)
    .bind(fields.lang)
    .bind(&fields.text)
    .fetch_one(&mut *savepoint)
    .await;

    match inserted {
        Ok(solution) => {
            savepoint.commit().await?;
            tracing::info!(finding_id, solution = %solution.name, "Added solution");
            Ok(solution)
        }
        Err(e) => {
            savepoint.rollback().await?;
            Err(AppError::conflict_on_unique(e, || duplicate_name(&fields.name)))
        }
    }
}

/// Overwrite a solution in place, possibly renaming it.
pub async fn update(
    conn: &mut PgConnection,
    finding_id: i64,
    name: &str,
    fields: &SolutionFields,
) -> Result<Solution, AppError> {
    let mut savepoint = conn.begin().await?;
    let updated = sqlx::query_as::<_, Solution>(
        r#"
        UPDATE solutions SET
            name = $3,
            lang = $4,
            text = $5,
            updated_at = NOW()
        WHERE finding_id = $1 AND name = $2
        RETURNING *
        "#,
    )
    .bind(finding_id)
    .bind(name)
    .bind(&fields.name)
    .bind(fields.lang)
    .bind(&fields.text)
    .fetch_optional(&mut *savepoint)
    .await;

    match updated {
        Ok(Some(solution)) => {
            savepoint.commit().await?;
            tracing::info!(finding_id, solution = %solution.name, "Updated solution");
            Ok(solution)
        }
        Ok(None) => {
            savepoint.rollback().await?;
            Err(not_found(finding_id, name))
        }
        Err(e) => {
            savepoint.rollback().await?;
            Err(AppError::conflict_on_unique(e, || duplicate_name(&fields.name)))
        }
    }
}

pub async fn delete(conn: &mut PgConnection, finding_id: i64, name: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM solutions WHERE finding_id = $1 AND name = $2")
        .bind(finding_id)
        .bind(name)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(finding_id, name));
    }
    tracing::info!(finding_id, solution = name, "Deleted solution");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_message() {
        assert_eq!(
            duplicate_name("patch"),
            "Solution name patch already exist for this finding."
        );
    }

    #[test]
    fn not_found_is_404_kind() {
        assert!(not_found(1, "patch").is_not_found());
    }
}
