//! Usage report endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;

use super::AuthenticatedUser;

/// A single labelled count
#[derive(Debug, Serialize, ToSchema)]
pub struct StatEntry {
    /// Label
    pub label: String,
    /// Value
    pub value: i64,
}

/// Aggregated booking usage over a date range
#[derive(Serialize, ToSchema)]
pub struct UsageReport {
    /// Start of the range (inclusive), if given
    pub from: Option<NaiveDate>,
    /// End of the range (inclusive), if given
    pub to: Option<NaiveDate>,
    /// Total number of bookings in the range
    pub total: i64,
    /// Bookings by effective status
    pub by_status: Vec<StatEntry>,
    /// Bookings by classroom
    pub by_classroom: Vec<StatEntry>,
    /// Bookings by program
    pub by_program: Vec<StatEntry>,
    /// Bookings by type (booking / borrow)
    pub by_booking_type: Vec<StatEntry>,
    /// Most booked equipment, top 20
    pub top_equipment: Vec<StatEntry>,
}

/// Query parameters for usage reports
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Start date (inclusive, ISO 8601)
    pub from: Option<NaiveDate>,
    /// End date (inclusive, ISO 8601)
    pub to: Option<NaiveDate>,
}

/// Get aggregated booking usage (admin only)
#[utoipa::path(
    get,
    path = "/reports/usage",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Usage report", body = UsageReport),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn usage_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<UsageReport>> {
    claims.require_admin()?;

    let report = state.services.reports.usage(query.from, query.to).await?;
    Ok(Json(report))
}

/// Export bookings as CSV (admin only)
#[utoipa::path(
    get,
    path = "/reports/export",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn export_csv(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    claims.require_admin()?;

    let csv = state.services.reports.export_csv(query.from, query.to).await?;

    let filename = match (query.from, query.to) {
        (Some(from), Some(to)) => format!("bookings_{}_{}.csv", from, to),
        _ => "bookings.csv".to_string(),
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}
