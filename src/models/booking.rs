//! Booking model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Booking lifecycle status.
///
/// `Returned` and `NotUsed` are terminal and stored authoritatively; the
/// other three are derived at read time from the period time table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    InUse,
    PendingReturn,
    Returned,
    NotUsed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::InUse => "in_use",
            BookingStatus::PendingReturn => "pending_return",
            BookingStatus::Returned => "returned",
            BookingStatus::NotUsed => "not_used",
        }
    }

    /// Terminal statuses are never recomputed once set
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Returned | BookingStatus::NotUsed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "booked" => Ok(BookingStatus::Booked),
            "in_use" => Ok(BookingStatus::InUse),
            "pending_return" => Ok(BookingStatus::PendingReturn),
            "returned" => Ok(BookingStatus::Returned),
            "not_used" => Ok(BookingStatus::NotUsed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

// SQLx conversion for BookingStatus (stored as text)
impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Booking kind: classroom use on site, or equipment taken away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Booking,
    Borrow,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Booking => "booking",
            BookingType::Borrow => "borrow",
        }
    }
}

impl std::fmt::Display for BookingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "booking" => Ok(BookingType::Booking),
            "borrow" => Ok(BookingType::Borrow),
            _ => Err(format!("Invalid booking type: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for BookingType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookingType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Booking model from database. `status` is the stored status, which is
/// authoritative only when terminal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub booking_type: BookingType,
    pub teacher_name: String,
    pub program: Option<String>,
    pub classroom_id: i32,
    pub period: i16,
    #[schema(value_type = String, example = "2025-03-10")]
    pub date: NaiveDate,
    pub equipment_ids: Vec<i32>,
    pub learning_plan: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub returned_by: Option<i32>,
}

/// Booking with resolved names and derived status, for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingDetails {
    pub id: i32,
    pub user_id: i32,
    pub booking_type: BookingType,
    pub teacher_name: String,
    pub program: Option<String>,
    pub classroom_id: i32,
    pub classroom_name: String,
    pub period: i16,
    #[schema(value_type = String, example = "2025-03-10")]
    pub date: NaiveDate,
    pub equipment: Vec<EquipmentRef>,
    pub learning_plan: Option<String>,
    /// Derived status (terminal stored statuses pass through unchanged)
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub returned_by: Option<i32>,
}

/// Equipment reference embedded in booking details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentRef {
    pub id: i32,
    pub name: String,
    pub name_local: Option<String>,
}

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBooking {
    /// Book on behalf of this user (admin only; defaults to the caller)
    pub user_id: Option<i32>,
    pub booking_type: BookingType,
    /// Display name of the booking teacher (defaults to the booking user's name)
    pub teacher_name: Option<String>,
    pub program: Option<String>,
    pub classroom_id: i32,
    #[validate(range(min = 1, max = 6, message = "Period must be between 1 and 6"))]
    pub period: i16,
    #[schema(value_type = String, example = "2025-03-10")]
    pub date: NaiveDate,
    #[serde(default)]
    pub equipment_ids: Vec<i32>,
    pub learning_plan: Option<String>,
}

/// Booking list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookingQuery {
    #[param(value_type = Option<String>, example = "2025-03-10")]
    pub date: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2025-03-01")]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2025-03-31")]
    pub to: Option<NaiveDate>,
    pub classroom_id: Option<i32>,
    pub period: Option<i16>,
    pub user_id: Option<i32>,
    /// Filter on the derived status
    pub status: Option<BookingStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
