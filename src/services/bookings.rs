//! Booking management service

use chrono::Local;
use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingQuery, BookingStatus, CreateBooking},
        period::PeriodSchedule,
    },
    repository::{bookings::NewBooking, Repository},
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    schedule: PeriodSchedule,
}

impl BookingsService {
    pub fn new(repository: Repository, schedule: PeriodSchedule) -> Self {
        Self { repository, schedule }
    }

    /// Create a new booking for the given user.
    ///
    /// Verifies the user, classroom and equipment all exist; the slot
    /// conflict check itself runs atomically in the repository.
    pub async fn create_booking(&self, user_id: i32, request: CreateBooking) -> AppResult<Booking> {
        // Rejects out-of-range periods even if request validation was skipped
        self.schedule.window(request.period)?;

        let user = self.repository.users.get_by_id(user_id).await?;
        self.repository.classrooms.get_by_id(request.classroom_id).await?;

        let mut equipment_ids = request.equipment_ids.clone();
        equipment_ids.sort_unstable();
        equipment_ids.dedup();

        if !equipment_ids.is_empty() {
            let existing = self.repository.equipment.count_existing(&equipment_ids).await?;
            if existing != equipment_ids.len() as i64 {
                return Err(AppError::Validation(
                    "One or more equipment ids do not exist".to_string(),
                ));
            }
        }

        let new_booking = NewBooking {
            user_id,
            booking_type: request.booking_type,
            teacher_name: request.teacher_name.unwrap_or(user.name),
            program: request.program,
            classroom_id: request.classroom_id,
            period: request.period,
            date: request.date,
            equipment_ids,
            learning_plan: request.learning_plan,
        };

        let created = self.repository.bookings.create(&new_booking).await?;

        tracing::info!(
            booking_id = created.id,
            classroom_id = created.classroom_id,
            period = created.period,
            date = %created.date,
            "Booking created"
        );

        Ok(created)
    }

    /// Get booking details with derived status and resolved names
    pub async fn get_booking(&self, id: i32) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(id).await?;
        let classroom = self.repository.classrooms.get_by_id(booking.classroom_id).await?;
        self.to_details(booking, classroom.name).await
    }

    /// List bookings matching the query. Status filtering and pagination
    /// happen after derivation since the effective status is time-dependent.
    pub async fn list_bookings(&self, query: &BookingQuery) -> AppResult<(Vec<BookingDetails>, i64)> {
        let rows = self
            .repository
            .bookings
            .list(
                query.date,
                query.from,
                query.to,
                query.classroom_id,
                query.period,
                query.user_id,
            )
            .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            details.push(self.to_details(row.booking, row.classroom_name).await?);
        }

        if let Some(status) = query.status {
            details.retain(|d| d.status == status);
        }

        let total = details.len() as i64;
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 200);

        Ok((paginate(details, page, per_page), total))
    }

    /// Get bookings for a single user
    pub async fn get_user_bookings(&self, user_id: i32) -> AppResult<Vec<BookingDetails>> {
        self.repository.users.get_by_id(user_id).await?;

        let rows = self
            .repository
            .bookings
            .list(None, None, None, None, None, Some(user_id))
            .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            details.push(self.to_details(row.booking, row.classroom_name).await?);
        }
        Ok(details)
    }

    /// Cancel a booking. Owners can cancel their own; admins anyone's.
    /// Terminal bookings cannot be cancelled.
    pub async fn cancel_booking(&self, id: i32, acting_user: i32, is_admin: bool) -> AppResult<()> {
        let booking = self.repository.bookings.get_by_id(id).await?;

        if booking.user_id != acting_user && !is_admin {
            return Err(AppError::Authorization(
                "Only the booking owner or an administrator can cancel a booking".to_string(),
            ));
        }

        if booking.status.is_terminal() {
            return Err(AppError::BusinessRule(
                "Booking has already been resolved".to_string(),
            ));
        }

        self.repository.bookings.delete(id).await?;

        tracing::info!(booking_id = id, "Booking cancelled");
        Ok(())
    }

    /// Confirm the return of a booking (terminal `returned`)
    pub async fn return_booking(&self, id: i32, admin_id: i32) -> AppResult<BookingDetails> {
        self.resolve(id, BookingStatus::Returned, admin_id).await
    }

    /// Mark a booking as never used (terminal `not_used`)
    pub async fn mark_not_used(&self, id: i32, admin_id: i32) -> AppResult<BookingDetails> {
        self.resolve(id, BookingStatus::NotUsed, admin_id).await
    }

    async fn resolve(
        &self,
        id: i32,
        status: BookingStatus,
        admin_id: i32,
    ) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(id).await?;

        if booking.status.is_terminal() {
            return Err(AppError::BusinessRule(
                "Booking has already been resolved".to_string(),
            ));
        }

        let resolved = self.repository.bookings.resolve(id, status, admin_id).await?;

        tracing::info!(booking_id = id, status = %status, "Booking resolved");

        let classroom = self.repository.classrooms.get_by_id(resolved.classroom_id).await?;
        self.to_details(resolved, classroom.name).await
    }

    /// The effective period table
    pub fn schedule(&self) -> &PeriodSchedule {
        &self.schedule
    }

    async fn to_details(&self, booking: Booking, classroom_name: String) -> AppResult<BookingDetails> {
        let now = Local::now().naive_local();
        let status =
            self.schedule
                .derive_status(booking.status, booking.date, booking.period, now)?;

        let mut equipment = self.repository.equipment.get_refs(&booking.equipment_ids).await?;

        // Referenced equipment may have been deleted since booking; keep the
        // ids visible as placeholders rather than dropping them silently.
        let found: HashSet<i32> = equipment.iter().map(|e| e.id).collect();
        for id in &booking.equipment_ids {
            if !found.contains(id) {
                equipment.push(crate::models::booking::EquipmentRef {
                    id: *id,
                    name: format!("(deleted equipment {})", id),
                    name_local: None,
                });
            }
        }

        Ok(BookingDetails {
            id: booking.id,
            user_id: booking.user_id,
            booking_type: booking.booking_type,
            teacher_name: booking.teacher_name,
            program: booking.program,
            classroom_id: booking.classroom_id,
            classroom_name,
            period: booking.period,
            date: booking.date,
            equipment,
            learning_plan: booking.learning_plan,
            status,
            created_at: booking.created_at,
            returned_at: booking.returned_at,
            returned_by: booking.returned_by,
        })
    }
}

/// Slice one page out of an in-memory result set. `page` is 1-based and
/// may be arbitrarily large; out-of-range pages yield an empty page.
fn paginate<T>(items: Vec<T>, page: i64, per_page: i64) -> Vec<T> {
    let start = (page.max(1) as u64 - 1).saturating_mul(per_page as u64);
    if start >= items.len() as u64 {
        return Vec::new();
    }
    items
        .into_iter()
        .skip(start as usize)
        .take(per_page as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_slice_in_order() {
        let items: Vec<i32> = (1..=5).collect();
        assert_eq!(paginate(items.clone(), 1, 2), vec![1, 2]);
        assert_eq!(paginate(items.clone(), 2, 2), vec![3, 4]);
        assert_eq!(paginate(items, 3, 2), vec![5]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<i32> = (1..=5).collect();
        assert!(paginate(items.clone(), 4, 2).is_empty());
        assert!(paginate(items, i64::MAX, 200).is_empty());
    }
}
