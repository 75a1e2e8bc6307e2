//! PostgreSQL persistence for resumes.
//!
//! A resume is one `resumes` row plus one `resume_items` row per child entry
//! (experience, skill, reference, ...). Saving always replaces the whole child
//! set inside a single transaction, so readers see either the old set or the
//! new one.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use sqlx::{FromRow, PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Resume;

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub title: String,
    pub full_name: String,
    pub profile_title: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub summary: String,
    pub profile_pic: Option<Vec<u8>>,
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
    pub website: String,
    pub qr_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One child entry as stored in `resume_items`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ChildRecord {
    pub kind: String,
    pub sort_order: i32,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub full_name: String,
    pub updated_at: DateTime<Utc>,
}

const EXPERIENCE: &str = "experience";
const EDUCATION: &str = "education";
const PROJECT: &str = "project";
const CERTIFICATION: &str = "certification";
const LANGUAGE: &str = "language";
const SKILL: &str = "skill";
const ACHIEVEMENT: &str = "achievement";
const REFERENCE: &str = "reference";
const CUSTOM_SECTION: &str = "custom_section";

// ────────────────────────────────────────────────────────────────────────────
// Pure mapping
// ────────────────────────────────────────────────────────────────────────────

fn push_kind<T: Serialize>(
    out: &mut Vec<ChildRecord>,
    kind: &str,
    items: &[T],
) -> Result<(), serde_json::Error> {
    for (i, item) in items.iter().enumerate() {
        out.push(ChildRecord {
            kind: kind.to_string(),
            sort_order: i as i32,
            data: serde_json::to_value(item)?,
        });
    }
    Ok(())
}

/// Flattens every child collection into storable records; `sort_order` is
/// the position within its collection.
pub fn child_records(resume: &Resume) -> Result<Vec<ChildRecord>, serde_json::Error> {
    let mut out = Vec::new();
    push_kind(&mut out, EXPERIENCE, &resume.experiences)?;
    push_kind(&mut out, EDUCATION, &resume.educations)?;
    push_kind(&mut out, PROJECT, &resume.projects)?;
    push_kind(&mut out, CERTIFICATION, &resume.certifications)?;
    push_kind(&mut out, LANGUAGE, &resume.languages)?;
    push_kind(&mut out, SKILL, &resume.skills)?;
    push_kind(&mut out, ACHIEVEMENT, &resume.achievements)?;
    push_kind(&mut out, REFERENCE, &resume.references)?;
    push_kind(&mut out, CUSTOM_SECTION, &resume.custom_sections)?;
    Ok(out)
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(data)
}

/// Rebuilds a resume from its row and child records. Records may arrive in
/// any order; each collection is restored by `sort_order`.
pub fn assemble(row: ResumeRow, mut items: Vec<ChildRecord>) -> Result<Resume, serde_json::Error> {
    items.sort_by_key(|item| item.sort_order);

    let mut resume = Resume {
        id: Some(row.id),
        title: row.title,
        created: Some(row.created_at),
        updated: Some(row.updated_at),
        full_name: row.full_name,
        profile_title: row.profile_title,
        email: row.email,
        phone: row.phone,
        city: row.city,
        address: row.address,
        summary: row.summary,
        profile_pic: row.profile_pic.filter(|bytes| !bytes.is_empty()),
        linkedin: row.linkedin,
        github: row.github,
        twitter: row.twitter,
        website: row.website,
        qr_link: row.qr_link,
        ..Default::default()
    };

    for item in items {
        match item.kind.as_str() {
            EXPERIENCE => resume.experiences.push(decode(item.data)?),
            EDUCATION => resume.educations.push(decode(item.data)?),
            PROJECT => resume.projects.push(decode(item.data)?),
            CERTIFICATION => resume.certifications.push(decode(item.data)?),
            LANGUAGE => resume.languages.push(decode(item.data)?),
            SKILL => resume.skills.push(decode(item.data)?),
            ACHIEVEMENT => resume.achievements.push(decode(item.data)?),
            REFERENCE => resume.references.push(decode(item.data)?),
            CUSTOM_SECTION => resume.custom_sections.push(decode(item.data)?),
            other => warn!(resume_id = %row.id, kind = other, "ignoring unknown resume item kind"),
        }
    }
    Ok(resume)
}

// ────────────────────────────────────────────────────────────────────────────
// Queries
// ────────────────────────────────────────────────────────────────────────────

/// Binds the personal fields as `$2..=$15`, after the id.
fn bind_personal<'q>(
    query: Query<'q, Postgres, PgArguments>,
    r: &'q Resume,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(&r.title)
        .bind(&r.full_name)
        .bind(&r.profile_title)
        .bind(&r.email)
        .bind(&r.phone)
        .bind(&r.city)
        .bind(&r.address)
        .bind(&r.summary)
        .bind(r.profile_pic.as_deref())
        .bind(&r.linkedin)
        .bind(&r.github)
        .bind(&r.twitter)
        .bind(&r.website)
        .bind(&r.qr_link)
}

/// Creates or fully replaces a resume. A resume without an id is new and
/// gets one here; saving an id that does not exist is a `NotFound`.
pub async fn save_resume(pool: &PgPool, resume: &Resume) -> Result<Resume, AppError> {
    let records = child_records(resume).map_err(|e| AppError::Internal(e.into()))?;
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let (id, created) = match resume.id {
        None => {
            let id = Uuid::new_v4();
            bind_personal(
                sqlx::query(
                    r#"
                    INSERT INTO resumes
                        (id, title, full_name, profile_title, email, phone, city, address,
                         summary, profile_pic, linkedin, github, twitter, website, qr_link,
                         created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
                    "#,
                )
                .bind(id),
                resume,
            )
            .bind(now)
            .execute(&mut *tx)
            .await?;
            info!(resume_id = %id, "resume created");
            (id, now)
        }
        Some(id) => {
            let updated = bind_personal(
                sqlx::query(
                    r#"
                    UPDATE resumes SET
                        title = $2, full_name = $3, profile_title = $4, email = $5, phone = $6,
                        city = $7, address = $8, summary = $9, profile_pic = $10, linkedin = $11,
                        github = $12, twitter = $13, website = $14, qr_link = $15, updated_at = $16
                    WHERE id = $1
                    RETURNING created_at
                    "#,
                )
                .bind(id),
                resume,
            )
            .bind(now)
            .fetch_optional(&mut *tx)
            .await?;
            let Some(row) = updated else {
                return Err(AppError::NotFound(format!("Resume {id} not found")));
            };
            let created: DateTime<Utc> = row.try_get("created_at")?;
            (id, created)
        }
    };

    sqlx::query("DELETE FROM resume_items WHERE resume_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    for record in &records {
        sqlx::query(
            "INSERT INTO resume_items (resume_id, kind, sort_order, data) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(&record.kind)
        .bind(record.sort_order)
        .bind(&record.data)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(resume_id = %id, items = records.len(), "resume saved");
    Ok(Resume {
        id: Some(id),
        created: Some(created),
        updated: Some(now),
        ..resume.clone()
    })
}

/// Loads a resume with its children in display order.
pub async fn load_resume(pool: &PgPool, id: Uuid) -> Result<Option<Resume>, AppError> {
    // One snapshot for both reads so a concurrent save cannot interleave.
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let items = sqlx::query_as::<_, ChildRecord>(
        "SELECT kind, sort_order, data FROM resume_items WHERE resume_id = $1 ORDER BY kind, sort_order",
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;
    tx.commit().await?;

    let resume = assemble(row, items).map_err(|e| AppError::Internal(e.into()))?;
    Ok(Some(resume))
}

/// All resumes, most recently updated first.
pub async fn list_resumes(pool: &PgPool) -> Result<Vec<ResumeSummary>, AppError> {
    Ok(sqlx::query_as::<_, ResumeSummary>(
        "SELECT id, title, full_name, updated_at FROM resumes ORDER BY updated_at DESC",
    )
    .fetch_all(pool)
    .await?)
}

/// Deletes a resume and (by cascade) its items. `false` when nothing matched.
pub async fn delete_resume(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() > 0 {
        info!(resume_id = %id, "resume deleted");
    }
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Experience, Language, Reference};
    use crate::render::fixtures::sample_resume;

    fn row_for(resume: &Resume) -> ResumeRow {
        let now = Utc::now();
        ResumeRow {
            id: resume.id.unwrap_or_else(Uuid::new_v4),
            title: resume.title.clone(),
            full_name: resume.full_name.clone(),
            profile_title: resume.profile_title.clone(),
            email: resume.email.clone(),
            phone: resume.phone.clone(),
            city: resume.city.clone(),
            address: resume.address.clone(),
            summary: resume.summary.clone(),
            profile_pic: resume.profile_pic.clone(),
            linkedin: resume.linkedin.clone(),
            github: resume.github.clone(),
            twitter: resume.twitter.clone(),
            website: resume.website.clone(),
            qr_link: resume.qr_link.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_child_records_index_each_collection() {
        let mut resume = sample_resume();
        resume.skills = vec!["Zig".into(), "Ada".into()];
        let records = child_records(&resume).unwrap();
        let skills: Vec<(i32, &Value)> = records
            .iter()
            .filter(|r| r.kind == SKILL)
            .map(|r| (r.sort_order, &r.data))
            .collect();
        assert_eq!(skills, vec![(0, &Value::from("Zig")), (1, &Value::from("Ada"))]);
        let educations: Vec<i32> = records
            .iter()
            .filter(|r| r.kind == EDUCATION)
            .map(|r| r.sort_order)
            .collect();
        assert_eq!(educations, vec![0, 1]);
    }

    #[test]
    fn test_assemble_round_trips_children() {
        let resume = sample_resume();
        let row = row_for(&resume);
        let id = row.id;
        let back = assemble(row, child_records(&resume).unwrap()).unwrap();
        assert_eq!(back.id, Some(id));
        assert!(back.created.is_some());
        assert_eq!(
            Resume {
                id: None,
                created: None,
                updated: None,
                ..back
            },
            resume
        );
    }

    #[test]
    fn test_assemble_restores_order_from_shuffled_items() {
        let resume = Resume {
            experiences: vec![
                Experience {
                    job_title: "First".into(),
                    ..Default::default()
                },
                Experience {
                    job_title: "Second".into(),
                    ..Default::default()
                },
                Experience {
                    job_title: "Third".into(),
                    ..Default::default()
                },
            ],
            references: vec![Reference {
                name: "Ref".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut items = child_records(&resume).unwrap();
        items.reverse();
        let back = assemble(row_for(&resume), items).unwrap();
        let titles: Vec<&str> = back.experiences.iter().map(|e| e.job_title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(back.references.len(), 1);
    }

    #[test]
    fn test_assemble_skips_unknown_kinds_and_defaults_fields() {
        let items = vec![
            ChildRecord {
                kind: "hobby".into(),
                sort_order: 0,
                data: serde_json::json!({"name": "chess"}),
            },
            ChildRecord {
                kind: LANGUAGE.into(),
                sort_order: 0,
                data: serde_json::json!({"name": "German"}),
            },
        ];
        let back = assemble(row_for(&Resume::default()), items).unwrap();
        assert_eq!(
            back.languages,
            vec![Language {
                name: "German".into(),
                proficiency: "Fluent".into(),
            }]
        );
    }

    #[test]
    fn test_assemble_rejects_malformed_item() {
        let items = vec![ChildRecord {
            kind: SKILL.into(),
            sort_order: 0,
            data: serde_json::json!({"not": "a string"}),
        }];
        assert!(assemble(row_for(&Resume::default()), items).is_err());
    }
}
