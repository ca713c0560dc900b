//! Database helpers for contact messages.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use crate::api::email::enqueue_contact_notification;

use super::types::ContactRequest;

#[derive(Debug)]
pub(crate) struct MessageRecord {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) subject: String,
    pub(crate) message: String,
    pub(crate) read: bool,
    pub(crate) created_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, name, email, subject, message, read, created_at";

fn record_from_row(row: &sqlx::postgres::PgRow) -> MessageRecord {
    MessageRecord {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        read: row.get("read"),
        created_at: row.get("created_at"),
    }
}

/// Store a contact message and enqueue its notification email in one
/// transaction, so a stored message always has a queued notification.
pub(crate) async fn insert_with_notification(
    pool: &PgPool,
    input: &ContactRequest,
    notify_to: &str,
) -> Result<()> {
    let mut tx = pool.begin().await.context("begin contact transaction")?;

    let query = r"
        INSERT INTO contact_messages (name, email, subject, message)
        VALUES ($1, $2, $3, $4)
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(input.name.trim())
        .bind(input.email.trim())
        .bind(input.subject.trim())
        .bind(input.message.trim())
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to insert contact message")?;

    let payload = serde_json::json!({
        "name": input.name.trim(),
        "email": input.email.trim(),
        "subject": input.subject.trim(),
        "message": input.message.trim(),
    });
    enqueue_contact_notification(&mut tx, notify_to, &payload).await?;

    tx.commit().await.context("commit contact transaction")?;

    Ok(())
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<MessageRecord>> {
    let query = format!("SELECT {COLUMNS} FROM contact_messages ORDER BY created_at DESC");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list contact messages")?;

    Ok(rows.iter().map(record_from_row).collect())
}

pub(crate) async fn set_read(
    pool: &PgPool,
    id: Uuid,
    read: bool,
) -> Result<Option<MessageRecord>> {
    let query = format!(
        "UPDATE contact_messages SET read = $2 WHERE id = $1 RETURNING {COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(id)
        .bind(read)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update contact message")?;

    Ok(row.as_ref().map(record_from_row))
}

pub(crate) async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let query = "DELETE FROM contact_messages WHERE id = $1";
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
        .context("failed to delete contact message")?;

    Ok(result.rows_affected() > 0)
}
