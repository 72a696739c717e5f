//! Settings endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::period::PeriodWindow};

use super::AuthenticatedUser;

/// Period schedule response
#[derive(Serialize, ToSchema)]
pub struct PeriodsResponse {
    /// The six daily periods with their time windows
    pub periods: Vec<PeriodWindow>,
}

/// Get the configured period time table
#[utoipa::path(
    get,
    path = "/settings/periods",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Period time table", body = PeriodsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_periods(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<PeriodsResponse>> {
    let periods = state.services.bookings.schedule().windows().to_vec();
    Ok(Json(PeriodsResponse { periods }))
}
