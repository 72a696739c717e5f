//! Classroom management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::classroom::{Classroom, CreateClassroom, UpdateClassroom},
};

use super::{validate_body, AuthenticatedUser};

/// List all classrooms
#[utoipa::path(
    get,
    path = "/classrooms",
    tag = "classrooms",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of classrooms", body = Vec<Classroom>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_classrooms(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Classroom>>> {
    let classrooms = state.services.classrooms.list().await?;
    Ok(Json(classrooms))
}

/// Get a classroom by ID
#[utoipa::path(
    get,
    path = "/classrooms/{id}",
    tag = "classrooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Classroom ID")
    ),
    responses(
        (status = 200, description = "Classroom", body = Classroom),
        (status = 404, description = "Classroom not found")
    )
)]
pub async fn get_classroom(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Classroom>> {
    let classroom = state.services.classrooms.get_by_id(id).await?;
    Ok(Json(classroom))
}

/// Create a classroom (admin only)
#[utoipa::path(
    post,
    path = "/classrooms",
    tag = "classrooms",
    security(("bearer_auth" = [])),
    request_body = CreateClassroom,
    responses(
        (status = 201, description = "Classroom created", body = Classroom),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn create_classroom(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateClassroom>,
) -> AppResult<(StatusCode, Json<Classroom>)> {
    claims.require_admin()?;
    validate_body(&request)?;

    let classroom = state.services.classrooms.create(request).await?;
    Ok((StatusCode::CREATED, Json(classroom)))
}

/// Update a classroom (admin only)
#[utoipa::path(
    put,
    path = "/classrooms/{id}",
    tag = "classrooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Classroom ID")
    ),
    request_body = UpdateClassroom,
    responses(
        (status = 200, description = "Classroom updated", body = Classroom),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Classroom not found")
    )
)]
pub async fn update_classroom(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateClassroom>,
) -> AppResult<Json<Classroom>> {
    claims.require_admin()?;
    validate_body(&request)?;

    let classroom = state.services.classrooms.update(id, request).await?;
    Ok(Json(classroom))
}

/// Delete a classroom (admin only, refused while active bookings exist)
#[utoipa::path(
    delete,
    path = "/classrooms/{id}",
    tag = "classrooms",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Classroom ID")
    ),
    responses(
        (status = 204, description = "Classroom deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Classroom not found"),
        (status = 409, description = "Classroom has active bookings")
    )
)]
pub async fn delete_classroom(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.classrooms.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
