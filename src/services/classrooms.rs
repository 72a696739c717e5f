//! Classroom master-data service

use crate::{
    error::{AppError, AppResult},
    models::classroom::{Classroom, CreateClassroom, UpdateClassroom},
    repository::Repository,
};

#[derive(Clone)]
pub struct ClassroomsService {
    repository: Repository,
}

impl ClassroomsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Classroom>> {
        self.repository.classrooms.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Classroom> {
        self.repository.classrooms.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateClassroom) -> AppResult<Classroom> {
        self.repository.classrooms.create(&data).await
    }

    pub async fn update(&self, id: i32, data: UpdateClassroom) -> AppResult<Classroom> {
        self.repository.classrooms.update(id, &data).await
    }

    /// Delete a classroom. Refused while non-terminal bookings reference it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.classrooms.get_by_id(id).await?;

        let active = self.repository.bookings.count_active_for_classroom(id).await?;
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Classroom has {} active bookings",
                active
            )));
        }

        self.repository.classrooms.delete(id).await
    }
}
