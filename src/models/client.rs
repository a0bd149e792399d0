//! Client model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Client record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Client reference embedded in equipment and movement rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClientRef {
    pub id: i32,
    pub name: String,
}

/// Create or rename client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClientPayload {
    #[validate(length(min = 1, message = "Client name is required"))]
    pub name: String,
}

impl ClientPayload {
    /// Trimmed name; rejects names that are blank once trimmed
    pub fn normalized_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }
}
