//! Business logic services

pub mod clients;
pub mod equipment;
pub mod movements;
pub mod quotes;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub clients: clients::ClientsService,
    pub equipment: equipment::EquipmentService,
    pub movements: movements::MovementsService,
    pub quotes: quotes::QuotesService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            clients: clients::ClientsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            movements: movements::MovementsService::new(repository.clone()),
            quotes: quotes::QuotesService::new(repository.clone(), config.quotes.clone()),
            repository,
        }
    }

    /// Database readiness
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
