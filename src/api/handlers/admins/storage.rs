//! Database helpers for admin accounts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub(crate) struct AdminRecord {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) password_hash: String,
    pub(crate) created_at: DateTime<Utc>,
}

/// Outcome when creating a new admin account.
#[derive(Debug)]
pub(crate) enum InsertOutcome {
    Created(AdminRecord),
    Duplicate,
}

/// Outcome when deleting an admin account. `LastAdmin` preserves the
/// invariant that at least one account exists at all times.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DeleteOutcome {
    Deleted,
    LastAdmin,
    NotFound,
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> AdminRecord {
    AdminRecord {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

/// Look up an admin by (normalized) email for login.
pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminRecord>> {
    let query = "SELECT id, email, name, password_hash, created_at FROM admins WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to look up admin by email")?;

    Ok(row.as_ref().map(record_from_row))
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<AdminRecord>> {
    let query =
        "SELECT id, email, name, password_hash, created_at FROM admins ORDER BY created_at DESC";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list admins")?;

    Ok(rows.iter().map(record_from_row).collect())
}

pub(crate) async fn insert(
    pool: &PgPool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<InsertOutcome> {
    let query = r"
        INSERT INTO admins (email, name, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, name, password_hash, created_at
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(InsertOutcome::Created(record_from_row(&row))),
        Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
        Err(err) => Err(err).context("failed to insert admin"),
    }
}

/// Delete an admin while preserving the at-least-one invariant.
///
/// The admin rows are locked before counting so two concurrent deletes
/// cannot both observe a count of two and empty the table.
pub(crate) async fn delete(pool: &PgPool, id: Uuid) -> Result<DeleteOutcome> {
    let mut tx = pool.begin().await.context("begin admin delete")?;

    let query = "SELECT id FROM admins FOR UPDATE";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(&mut *tx)
        .instrument(span)
        .await
        .context("failed to lock admin rows")?;

    if rows.len() <= 1 {
        let _ = tx.rollback().await;
        return Ok(DeleteOutcome::LastAdmin);
    }

    let exists = rows.iter().any(|row| row.get::<Uuid, _>("id") == id);
    if !exists {
        let _ = tx.rollback().await;
        return Ok(DeleteOutcome::NotFound);
    }

    let query = "DELETE FROM admins WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(id)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to delete admin")?;

    tx.commit().await.context("commit admin delete")?;

    Ok(DeleteOutcome::Deleted)
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolClosed));
    }
}
