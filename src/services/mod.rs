//! Business logic services

pub mod bookings;
pub mod classrooms;
pub mod equipment;
pub mod reports;
pub mod users;

use crate::{
    config::AuthConfig,
    error::AppResult,
    models::period::PeriodSchedule,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub bookings: bookings::BookingsService,
    pub classrooms: classrooms::ClassroomsService,
    pub equipment: equipment::EquipmentService,
    pub reports: reports::ReportsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and period table
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        schedule: PeriodSchedule,
    ) -> AppResult<Self> {
        Ok(Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            bookings: bookings::BookingsService::new(repository.clone(), schedule.clone()),
            classrooms: classrooms::ClassroomsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            reports: reports::ReportsService::new(repository.clone(), schedule),
            repository,
        })
    }

    /// Verify the database connection is usable
    pub async fn ping_database(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }
}
