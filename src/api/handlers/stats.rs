//! Dashboard stats aggregation.
//!
//! Totals plus a per-category breakdown and a six-month trend series,
//! bucketed by calendar month ending at the current month.

use anyhow::{anyhow, Context, Result};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::{principal::require_auth, AuthState};

use super::{internal_error, unauthorized};

const TREND_MONTHS: u32 = 6;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct CategoryCount {
    pub name: String,
    pub value: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TrendPoint {
    pub name: String,
    pub messages: i64,
    pub projects: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StatsResponse {
    pub total_projects: i64,
    pub total_messages: i64,
    pub unread_messages: i64,
    pub total_services: i64,
    pub categories: Vec<CategoryCount>,
    pub trend_data: Vec<TrendPoint>,
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard aggregation.", body = StatsResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
    ),
    tag = "stats"
)]
pub async fn stats(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    match collect(&pool).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => internal_error("Failed to collect stats", &err),
    }
}

async fn collect(pool: &PgPool) -> Result<StatsResponse> {
    let total_projects = count(pool, "SELECT COUNT(*) FROM projects").await?;
    let total_messages = count(pool, "SELECT COUNT(*) FROM contact_messages").await?;
    let unread_messages =
        count(pool, "SELECT COUNT(*) FROM contact_messages WHERE NOT read").await?;
    let total_services = count(pool, "SELECT COUNT(*) FROM services WHERE active").await?;

    let categories = categories(pool).await?;
    let trend_data = trend(pool, Utc::now()).await?;

    Ok(StatsResponse {
        total_projects,
        total_messages,
        unread_messages,
        total_services,
        categories,
        trend_data,
    })
}

async fn count(pool: &PgPool, query: &str) -> Result<i64> {
    sqlx::query_scalar(query)
        .fetch_one(pool)
        .await
        .with_context(|| format!("stats count failed: {query}"))
}

async fn categories(pool: &PgPool) -> Result<Vec<CategoryCount>> {
    let rows = sqlx::query(
        "SELECT category, COUNT(*) AS count FROM projects GROUP BY category ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await
    .context("stats category breakdown failed")?;

    Ok(rows
        .iter()
        .map(|row| {
            let name: String = row.get("category");
            CategoryCount {
                name: if name.is_empty() {
                    "Uncategorized".to_string()
                } else {
                    name
                },
                value: row.get("count"),
            }
        })
        .collect())
}

async fn trend(pool: &PgPool, now: DateTime<Utc>) -> Result<Vec<TrendPoint>> {
    let mut points = Vec::with_capacity(TREND_MONTHS as usize);

    for back in (0..TREND_MONTHS).rev() {
        let (year, month) = months_back(now, back);
        let start = month_start(year, month)?;
        let (next_year, next_month) = next_month(year, month);
        let end = month_start(next_year, next_month)?;

        let messages: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
        .context("stats message trend failed")?;

        let projects: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
        .context("stats project trend failed")?;

        points.push(TrendPoint {
            name: MONTH_NAMES[(month - 1) as usize].to_string(),
            messages,
            projects,
        });
    }

    Ok(points)
}

/// The (year, month) `back` calendar months before `now`.
fn months_back(now: DateTime<Utc>, back: u32) -> (i32, u32) {
    let total = now.year() * 12 + i32::try_from(now.month0()).unwrap_or(0) - i32::try_from(back).unwrap_or(0);
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12);
    (year, u32::try_from(month0).unwrap_or(0) + 1)
}

const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| anyhow!("invalid month boundary: {year}-{month}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn months_back_crosses_year_boundaries() {
        let now = at(2026, 2, 15, 12);
        assert_eq!(months_back(now, 0), (2026, 2));
        assert_eq!(months_back(now, 1), (2026, 1));
        assert_eq!(months_back(now, 2), (2025, 12));
        assert_eq!(months_back(now, 5), (2025, 9));
        assert_eq!(months_back(now, 14), (2024, 12));
    }

    #[test]
    fn next_month_rolls_over_december() {
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(next_month(2026, 1), (2026, 2));
    }

    #[test]
    fn month_bucket_includes_first_and_last_day() {
        let start = month_start(2026, 3).expect("start");
        let end = month_start(2026, 4).expect("end");

        let first_day = at(2026, 3, 1, 0);
        let last_day = at(2026, 3, 31, 23);
        let previous = at(2026, 2, 28, 23);

        assert!(first_day >= start && first_day < end);
        assert!(last_day >= start && last_day < end);
        assert!(previous < start);
        assert!(end > last_day);
    }

    #[test]
    fn month_names_line_up() {
        assert_eq!(MONTH_NAMES[0], "Jan");
        assert_eq!(MONTH_NAMES[11], "Dec");
        let (_, month) = months_back(at(2026, 8, 8, 0), 0);
        assert_eq!(MONTH_NAMES[(month - 1) as usize], "Aug");
    }
}
