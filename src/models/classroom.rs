//! Classroom model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Classroom model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Classroom {
    pub id: i32,
    pub name: String,
    /// Localized display name
    pub name_local: Option<String>,
    pub program: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create classroom request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassroom {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub name_local: Option<String>,
    pub program: Option<String>,
}

/// Update classroom request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClassroom {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub name_local: Option<String>,
    pub program: Option<String>,
}
