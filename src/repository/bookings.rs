//! Bookings repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingStatus, BookingType},
};

/// Resolved fields for a booking insert (request defaults already applied)
pub struct NewBooking {
    pub user_id: i32,
    pub booking_type: BookingType,
    pub teacher_name: String,
    pub program: Option<String>,
    pub classroom_id: i32,
    pub period: i16,
    pub date: NaiveDate,
    pub equipment_ids: Vec<i32>,
    pub learning_plan: Option<String>,
}

/// A booking joined with its classroom name, for lists and reports
#[derive(Debug, Clone)]
pub struct BookingRow {
    pub booking: Booking,
    pub classroom_name: String,
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    /// List bookings matching the given filters, joined with classroom names.
    /// The derived-status filter cannot run in SQL, so callers filter and
    /// paginate after deriving statuses.
    pub async fn list(
        &self,
        date: Option<NaiveDate>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        classroom_id: Option<i32>,
        period: Option<i16>,
        user_id: Option<i32>,
    ) -> AppResult<Vec<BookingRow>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 0;

        macro_rules! cond {
            ($opt:expr, $fmt:expr) => {
                if $opt.is_some() {
                    idx += 1;
                    conditions.push(format!($fmt, idx));
                }
            };
        }

        cond!(date, "b.date = ${}");
        cond!(from, "b.date >= ${}");
        cond!(to, "b.date <= ${}");
        cond!(classroom_id, "b.classroom_id = ${}");
        cond!(period, "b.period = ${}");
        cond!(user_id, "b.user_id = ${}");
        let _ = idx;

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            r#"
            SELECT b.*, c.name as classroom_name
            FROM bookings b
            JOIN classrooms c ON b.classroom_id = c.id
            {}
            ORDER BY b.date DESC, b.period, b.id
            "#,
            where_clause
        );

        let mut builder = sqlx::query(&query);
        if let Some(d) = date {
            builder = builder.bind(d);
        }
        if let Some(d) = from {
            builder = builder.bind(d);
        }
        if let Some(d) = to {
            builder = builder.bind(d);
        }
        if let Some(c) = classroom_id {
            builder = builder.bind(c);
        }
        if let Some(p) = period {
            builder = builder.bind(p);
        }
        if let Some(u) = user_id {
            builder = builder.bind(u);
        }

        let rows = builder.fetch_all(&self.pool).await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(BookingRow {
                booking: booking_from_row(&row),
                classroom_name: row.get("classroom_name"),
            });
        }

        Ok(result)
    }

    /// Create a booking. The conflict check and insert run in a single
    /// transaction so two racing requests cannot both claim the slot.
    pub async fn create(&self, booking: &NewBooking) -> AppResult<Booking> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Lock any competing row for the slot for the duration of the check
        let conflict: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT id FROM bookings
            WHERE classroom_id = $1 AND date = $2 AND period = $3
              AND status NOT IN ('returned', 'not_used')
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(booking.classroom_id)
        .bind(booking.date)
        .bind(booking.period)
        .fetch_optional(&mut *tx)
        .await?;

        if conflict.is_some() {
            return Err(AppError::Conflict(
                "Classroom is already booked for this period and date".to_string(),
            ));
        }

        let inserted = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                user_id, booking_type, teacher_name, program, classroom_id,
                period, date, equipment_ids, learning_plan, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'booked', $10)
            RETURNING *
            "#,
        )
        .bind(booking.user_id)
        .bind(booking.booking_type)
        .bind(&booking.teacher_name)
        .bind(&booking.program)
        .bind(booking.classroom_id)
        .bind(booking.period)
        .bind(booking.date)
        .bind(&booking.equipment_ids)
        .bind(&booking.learning_plan)
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        // The partial unique index on active slots backstops the check above
        // when two inserts race on an empty slot.
        let created = match inserted {
            Ok(b) => b,
            Err(sqlx::Error::Database(e)) if e.constraint() == Some("bookings_active_slot_idx") => {
                return Err(AppError::Conflict(
                    "Classroom is already booked for this period and date".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;

        Ok(created)
    }

    /// Resolve a booking into a terminal status (returned / not_used).
    /// The status predicate keeps racing resolutions from overwriting a
    /// row that just went terminal; callers report that as a business-rule
    /// error.
    pub async fn resolve(
        &self,
        id: i32,
        status: BookingStatus,
        resolved_by: i32,
    ) -> AppResult<Booking> {
        let now = Utc::now();

        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $1, returned_at = $2, returned_by = $3
            WHERE id = $4 AND status NOT IN ('returned', 'not_used')
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(now)
        .bind(resolved_by)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BusinessRule("Booking has already been resolved".to_string()))
    }

    /// Delete (cancel) a booking. Terminal bookings are kept as history, so
    /// the delete is guarded the same way as `resolve`.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM bookings WHERE id = $1 AND status NOT IN ('returned', 'not_used')",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BusinessRule(
                "Booking has already been resolved".to_string(),
            ));
        }
        Ok(())
    }

    /// Count non-terminal bookings held by a user
    pub async fn count_active_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE user_id = $1 AND status NOT IN ('returned', 'not_used')",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count non-terminal bookings attached to a classroom
    pub async fn count_active_for_classroom(&self, classroom_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE classroom_id = $1 AND status NOT IN ('returned', 'not_used')",
        )
        .bind(classroom_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count non-terminal bookings that include a piece of equipment
    pub async fn count_active_for_equipment(&self, equipment_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE $1 = ANY(equipment_ids) AND status NOT IN ('returned', 'not_used')",
        )
        .bind(equipment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

/// Build a Booking from a joined row (sqlx derives cannot see through the
/// extra joined columns)
fn booking_from_row(row: &sqlx::postgres::PgRow) -> Booking {
    let booking_type: BookingType = row.get("booking_type");
    let status: BookingStatus = row.get("status");

    Booking {
        id: row.get("id"),
        user_id: row.get("user_id"),
        booking_type,
        teacher_name: row.get("teacher_name"),
        program: row.get("program"),
        classroom_id: row.get("classroom_id"),
        period: row.get("period"),
        date: row.get("date"),
        equipment_ids: row.get("equipment_ids"),
        learning_plan: row.get("learning_plan"),
        status,
        created_at: row.get("created_at"),
        returned_at: row.get("returned_at"),
        returned_by: row.get("returned_by"),
    }
}
