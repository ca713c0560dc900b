//! Database helpers for portfolio projects.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::ProjectInput;

#[derive(Debug)]
pub(crate) struct ProjectRecord {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) images: Vec<String>,
    pub(crate) technologies: Vec<String>,
    pub(crate) client_name: Option<String>,
    pub(crate) project_link: Option<String>,
    pub(crate) category: String,
    pub(crate) featured: bool,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, title, description, images, technologies, client_name, \
                       project_link, category, featured, created_at, updated_at";

fn record_from_row(row: &sqlx::postgres::PgRow) -> ProjectRecord {
    ProjectRecord {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        images: row.get("images"),
        technologies: row.get("technologies"),
        client_name: row.get("client_name"),
        project_link: row.get("project_link"),
        category: row.get("category"),
        featured: row.get("featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// List projects, optionally narrowed to one category. Featured projects
/// come first, newest first within each group.
pub(crate) async fn list(pool: &PgPool, category: Option<&str>) -> Result<Vec<ProjectRecord>> {
    let query = format!(
        "SELECT {COLUMNS} FROM projects \
         WHERE ($1::text IS NULL OR category = $1) \
         ORDER BY featured DESC, created_at DESC"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(category)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list projects")?;

    Ok(rows.iter().map(record_from_row).collect())
}

pub(crate) async fn get(pool: &PgPool, id: Uuid) -> Result<Option<ProjectRecord>> {
    let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch project")?;

    Ok(row.as_ref().map(record_from_row))
}

pub(crate) async fn insert(pool: &PgPool, input: &ProjectInput) -> Result<ProjectRecord> {
    let query = format!(
        "INSERT INTO projects \
         (title, description, images, technologies, client_name, project_link, category, featured) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(&input.images)
        .bind(&input.technologies)
        .bind(input.client_name.as_deref())
        .bind(input.project_link.as_deref())
        .bind(input.category.trim())
        .bind(input.featured)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert project")?;

    Ok(record_from_row(&row))
}

pub(crate) async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &ProjectInput,
) -> Result<Option<ProjectRecord>> {
    let query = format!(
        "UPDATE projects SET \
         title = $2, description = $3, images = $4, technologies = $5, client_name = $6, \
         project_link = $7, category = $8, featured = $9, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(&input.images)
        .bind(&input.technologies)
        .bind(input.client_name.as_deref())
        .bind(input.project_link.as_deref())
        .bind(input.category.trim())
        .bind(input.featured)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update project")?;

    Ok(row.as_ref().map(record_from_row))
}

pub(crate) async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let query = "DELETE FROM projects WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete project")?;

    Ok(result.rows_affected() > 0)
}
