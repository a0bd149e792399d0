//! Client registry service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        client::{Client, ClientPayload},
        equipment::ClientEquipment,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
}

fn checked_name(payload: &ClientPayload) -> AppResult<&str> {
    payload.validate()?;
    payload
        .normalized_name()
        .ok_or_else(|| AppError::Validation("Client name is required".to_string()))
}

impl ClientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Client>> {
        self.repository.clients.list().await
    }

    pub async fn create(&self, payload: &ClientPayload) -> AppResult<Client> {
        let client = self.repository.clients.create(checked_name(payload)?).await?;
        tracing::info!("Created client {} ({})", client.id, client.name);
        Ok(client)
    }

    pub async fn rename(&self, id: i32, payload: &ClientPayload) -> AppResult<Client> {
        let client = self.repository.clients.rename(id, checked_name(payload)?).await?;
        tracing::info!("Renamed client {} to {}", client.id, client.name);
        Ok(client)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.clients.delete(id).await?;
        tracing::info!("Deleted client {}", id);
        Ok(())
    }

    /// Equipment owned by a client, with stock derived from the ledger
    pub async fn equipment(&self, id: i32) -> AppResult<Vec<ClientEquipment>> {
        self.repository.clients.get_by_id(id).await?;
        self.repository.equipment.list_for_client(id).await
    }
}
