//! Booking management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingDetails, BookingQuery, CreateBooking},
};

use super::{validate_body, AuthenticatedUser, PaginatedResponse};

/// Create booking response
#[derive(Serialize, ToSchema)]
pub struct CreateBookingResponse {
    pub id: i32,
    pub booking: Booking,
    pub message: String,
}

/// Resolution response with booking details
#[derive(Serialize, ToSchema)]
pub struct ResolveResponse {
    pub status: String,
    pub booking: BookingDetails,
}

/// Create a new booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = CreateBookingResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "User, classroom or equipment not found"),
        (status = 409, description = "Slot already booked")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<CreateBookingResponse>)> {
    validate_body(&request)?;

    // Teachers book for themselves; only admins may book on behalf of others
    let user_id = match request.user_id {
        Some(id) if id != claims.user_id => {
            claims.require_admin().map_err(|_| {
                AppError::Authorization(
                    "Only administrators can book on behalf of another user".to_string(),
                )
            })?;
            id
        }
        _ => claims.user_id,
    };

    let booking = state.services.bookings.create_booking(user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            id: booking.id,
            booking,
            message: "Booking created successfully".to_string(),
        }),
    ))
}

/// List bookings with filters and pagination
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "List of bookings", body = PaginatedResponse<BookingDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<PaginatedResponse<BookingDetails>>> {
    let (bookings, total) = state.services.bookings.list_bookings(&query).await?;

    Ok(Json(PaginatedResponse {
        items: bookings,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get booking details by ID
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state.services.bookings.get_booking(id).await?;
    Ok(Json(booking))
}

/// Cancel a booking (owner or admin, non-terminal only)
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Booking already resolved")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state
        .services
        .bookings
        .cancel_booking(id, claims.user_id, claims.is_admin())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Confirm the return of a booking (admin only)
#[utoipa::path(
    post,
    path = "/bookings/{id}/return",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Return confirmed", body = ResolveResponse),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Booking already resolved")
    )
)]
pub async fn return_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ResolveResponse>> {
    claims.require_admin()?;

    let booking = state.services.bookings.return_booking(id, claims.user_id).await?;

    Ok(Json(ResolveResponse {
        status: "returned".to_string(),
        booking,
    }))
}

/// Mark a booking as never used (admin only)
#[utoipa::path(
    post,
    path = "/bookings/{id}/not-used",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking marked as not used", body = ResolveResponse),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Booking already resolved")
    )
)]
pub async fn mark_not_used(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ResolveResponse>> {
    claims.require_admin()?;

    let booking = state.services.bookings.mark_not_used(id, claims.user_id).await?;

    Ok(Json(ResolveResponse {
        status: "not_used".to_string(),
        booking,
    }))
}

/// Get bookings for a specific user (own bookings or admin)
#[utoipa::path(
    get,
    path = "/users/{id}/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's bookings", body = Vec<BookingDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    claims.require_self_or_admin(user_id)?;

    let bookings = state.services.bookings.get_user_bookings(user_id).await?;
    Ok(Json(bookings))
}
