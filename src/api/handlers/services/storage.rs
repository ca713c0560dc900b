//! Database helpers for the service catalog.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::ServiceInput;

#[derive(Debug)]
pub(crate) struct ServiceRecord {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) icon: String,
    pub(crate) features: Vec<String>,
    pub(crate) active: bool,
    pub(crate) sort_order: i32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

const COLUMNS: &str =
    "id, title, description, icon, features, active, sort_order, created_at, updated_at";

fn record_from_row(row: &sqlx::postgres::PgRow) -> ServiceRecord {
    ServiceRecord {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        icon: row.get("icon"),
        features: row.get("features"),
        active: row.get("active"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// List catalog entries in display order. Anonymous callers only see
/// active entries; the backoffice sees everything.
pub(crate) async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<ServiceRecord>> {
    let query = format!(
        "SELECT {COLUMNS} FROM services \
         WHERE ($1 OR active) \
         ORDER BY sort_order ASC, created_at ASC"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(include_inactive)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list services")?;

    Ok(rows.iter().map(record_from_row).collect())
}

pub(crate) async fn insert(pool: &PgPool, input: &ServiceInput) -> Result<ServiceRecord> {
    let query = format!(
        "INSERT INTO services (title, description, icon, features, active, sort_order) \
         VALUES ($1, $2, $3, $4, $5, $6) \
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
        .bind(input.icon.trim())
        .bind(&input.features)
        .bind(input.active)
        .bind(input.sort_order)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert service")?;

    Ok(record_from_row(&row))
}

pub(crate) async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &ServiceInput,
) -> Result<Option<ServiceRecord>> {
    let query = format!(
        "UPDATE services SET \
         title = $2, description = $3, icon = $4, features = $5, active = $6, \
         sort_order = $7, updated_at = NOW() \
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
        .bind(input.icon.trim())
        .bind(&input.features)
        .bind(input.active)
        .bind(input.sort_order)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update service")?;

    Ok(row.as_ref().map(record_from_row))
}

pub(crate) async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let query = "DELETE FROM services WHERE id = $1";
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
        .context("failed to delete service")?;

    Ok(result.rows_affected() > 0)
}
