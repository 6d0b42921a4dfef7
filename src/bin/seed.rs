//! Seed script for development: populates a fresh database with sample catalog entries.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use anyhow::Context;
use findcat::models::finding_template::{
    FindingTemplateFields, FindingType, NewFindingTemplate, OwaspCategory, OwaspMobileCategory,
};
use findcat::models::language::Language;
use findcat::models::solution::SolutionFields;
use findcat::models::translation::{NewTranslation, TranslationText};
use findcat::services::{finding_template, solution, translation};
use sqlx::PgPool;

const ADMIN_PASSWORD: &str = "Test123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = findcat::db::create_pool(&db_url, 5).await?;

    findcat::db::run_migrations(&pool).await?;

    println!("=== findcat Seed Script ===");

    seed_users(&pool).await?;
    seed_catalog(&pool).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: admin / {ADMIN_PASSWORD}");

    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = 'admin')")
            .fetch_one(pool)
            .await?;

    let hash = findcat::services::auth::hash_password(ADMIN_PASSWORD)?;

    if exists {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE username = 'admin'")
            .bind(&hash)
            .execute(pool)
            .await?;
        println!("[done] Updated admin password");
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO users (username, email, password_hash, display_name, role)
         VALUES ('admin', 'admin@findcat.local', $1, 'Catalog Administrator', 'Admin')",
    )
    .bind(&hash)
    .execute(pool)
    .await?;

    // Read-mostly account for trying out the catalog
    let auditor_hash = findcat::services::auth::hash_password("auditor123")?;
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, display_name, role)
         VALUES ('auditor', 'auditor@findcat.local', $1, 'Pentest Auditor', 'Auditor')",
    )
    .bind(&auditor_hash)
    .execute(pool)
    .await?;

    println!("[done] Created admin and auditor users");
    Ok(())
}

struct SampleFinding {
    fields: FindingTemplateFields,
    translations: Vec<(Language, &'static str, &'static str)>,
    solutions: Vec<(&'static str, Language, &'static str)>,
}

fn fields(name: &str, finding_type: FindingType) -> FindingTemplateFields {
    FindingTemplateFields {
        name: name.to_string(),
        finding_type,
        owasp_category: None,
        owasp_mobile_category: None,
        masvs: None,
        asvs: None,
        cvss_v3_vector: None,
        cvss_v3_score: None,
    }
}

fn samples() -> Vec<SampleFinding> {
    vec![
        SampleFinding {
            fields: FindingTemplateFields {
                owasp_category: Some(OwaspCategory::A1),
                asvs: Some("5.3.4".to_string()),
                cvss_v3_vector: Some("CVSS:3.0/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H".to_string()),
                cvss_v3_score: Some(9.8),
                ..fields("SQLi", FindingType::Web)
            },
            translations: vec![
                (
                    Language::English,
                    "SQL Injection",
                    "User input is concatenated into SQL statements without parameterization.",
                ),
                (
                    Language::French,
                    "Injection SQL",
                    "Des entrées utilisateur sont concaténées dans des requêtes SQL.",
                ),
            ],
            solutions: vec![
                (
                    "prepared_statements",
                    Language::English,
                    "Use parameterized queries for every statement built from user input.",
                ),
                (
                    "requetes_preparees",
                    Language::French,
                    "Utiliser des requêtes paramétrées.",
                ),
            ],
        },
        SampleFinding {
            fields: FindingTemplateFields {
                owasp_category: Some(OwaspCategory::A7),
                asvs: Some("5.3.3".to_string()),
                cvss_v3_score: Some(6.1),
                ..fields("XSS", FindingType::Web)
            },
            translations: vec![(
                Language::English,
                "Cross-Site Scripting",
                "Untrusted data is rendered into pages without context-aware encoding.",
            )],
            solutions: vec![(
                "output_encoding",
                Language::English,
                "Encode output according to the HTML context it lands in.",
            )],
        },
        SampleFinding {
            fields: FindingTemplateFields {
                owasp_mobile_category: Some(OwaspMobileCategory::M2),
                masvs: Some("MSTG-STORAGE-1".to_string()),
                ..fields("Insecure Data Storage", FindingType::Mobile)
            },
            translations: vec![(
                Language::English,
                "Insecure Data Storage",
                "Sensitive data is written to world-readable or unencrypted storage.",
            )],
            solutions: vec![],
        },
    ]
}

async fn seed_catalog(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM finding_templates")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Finding templates already exist ({count})");
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for sample in samples() {
        let mut translations = sample.translations.into_iter().map(|(lang, title, definition)| {
            NewTranslation {
                lang,
                text: TranslationText {
                    title: title.to_string(),
                    definition: definition.to_string(),
                    references: None,
                    description: None,
                },
            }
        });
        let first = translations
            .next()
            .context("every sample finding carries at least one translation")?;

        let new = NewFindingTemplate {
            creator: "admin".to_string(),
            fields: sample.fields,
        };
        let finding = finding_template::create(&mut *tx, &new, &first).await?;

        for extra in translations {
            translation::create(&mut *tx, finding.id, &extra).await?;
        }
        for (name, lang, text) in sample.solutions {
            let fields = SolutionFields {
                name: name.to_string(),
                lang,
                text: text.to_string(),
            };
            solution::create(&mut *tx, finding.id, &fields).await?;
        }
        println!("[done] Seeded finding template {}", finding.name);
    }
    tx.commit().await?;

    Ok(())
}
