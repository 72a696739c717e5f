//! Equipment master-data service

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, UpdateEquipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateEquipment) -> AppResult<Equipment> {
        self.repository.equipment.create(&data).await
    }

    pub async fn update(&self, id: i32, data: UpdateEquipment) -> AppResult<Equipment> {
        self.repository.equipment.update(id, &data).await
    }

    /// Delete equipment. Refused while non-terminal bookings include it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.get_by_id(id).await?;

        let active = self.repository.bookings.count_active_for_equipment(id).await?;
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Equipment is included in {} active bookings",
                active
            )));
        }

        self.repository.equipment.delete(id).await
    }
}
