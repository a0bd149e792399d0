//! Equipment catalog service

use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, UpdateEquipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

fn check_price(price: Option<Decimal>) -> AppResult<()> {
    match price {
        Some(p) if p < Decimal::ZERO => {
            Err(AppError::Validation("Price cannot be negative".to_string()))
        }
        _ => Ok(()),
    }
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

    /// Create equipment. An unknown client id is rejected by the store.
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        if data.name.trim().is_empty() {
            return Err(AppError::Validation("Equipment name is required".to_string()));
        }
        check_price(data.price)?;

        let equipment = self.repository.equipment.create(data).await?;
        tracing::info!(
            "Created equipment {} ({}, {})",
            equipment.id,
            equipment.name,
            equipment.equipment_type
        );
        Ok(equipment)
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        if data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::Validation("Equipment name is required".to_string()));
        }
        check_price(data.price)?;

        let equipment = self.repository.equipment.update(id, data).await?;
        tracing::info!("Updated equipment {}", id);
        Ok(equipment)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.delete(id).await?;
        tracing::info!("Deleted equipment {}", id);
        Ok(())
    }
}
