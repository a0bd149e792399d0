//! Equipment model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::client::ClientRef;
use super::enums::EquipmentType;

/// Sentinel accepted in place of a client id to clear the assignment
pub const UNASSIGNED_CLIENT: &str = "NULL";

/// Equipment record, with its owning client resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    /// Manufacturer / catalog reference
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub price: Option<Decimal>,
    pub client_id: Option<i32>,
    pub client: Option<ClientRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equipment owned by a client, with its stock derived from the ledger
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientEquipment {
    #[serde(flatten)]
    pub equipment: Equipment,
    /// Sum of entries minus sum of exits
    pub quantity: i64,
}

/// Client assignment in an update request.
///
/// Accepts a numeric id, a numeric string, or the `"NULL"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClientAssignment")]
pub enum ClientAssignment {
    Assign(i32),
    Unassign,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawClientAssignment {
    Id(i32),
    Text(String),
}

impl TryFrom<RawClientAssignment> for ClientAssignment {
    type Error = String;

    fn try_from(raw: RawClientAssignment) -> Result<Self, Self::Error> {
        match raw {
            RawClientAssignment::Id(id) => Ok(ClientAssignment::Assign(id)),
            RawClientAssignment::Text(s)
                if s.trim().is_empty() || s.eq_ignore_ascii_case(UNASSIGNED_CLIENT) =>
            {
                Ok(ClientAssignment::Unassign)
            }
            RawClientAssignment::Text(s) => s
                .trim()
                .parse()
                .map(ClientAssignment::Assign)
                .map_err(|_| format!("Invalid client id: {}", s)),
        }
    }
}

impl ClientAssignment {
    pub fn client_id(self) -> Option<i32> {
        match self {
            ClientAssignment::Assign(id) => Some(id),
            ClientAssignment::Unassign => None,
        }
    }
}

/// Trimmed catalog reference; a blank value stands for "no reference"
pub fn reference_value(reference: &str) -> Option<&str> {
    let reference = reference.trim();
    (!reference.is_empty()).then_some(reference)
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Equipment name is required"))]
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    #[serde(rename = "clientId", alias = "client_id")]
    #[schema(value_type = Option<String>, example = "12")]
    pub client_id: Option<ClientAssignment>,
    pub price: Option<Decimal>,
}

/// Update equipment request; absent fields are left unchanged and a blank
/// `ref` clears the stored reference
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Equipment name is required"))]
    pub name: Option<String>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: Option<EquipmentType>,
    #[serde(rename = "clientId", alias = "client_id")]
    #[schema(value_type = Option<String>, example = "12")]
    pub client_id: Option<ClientAssignment>,
    pub price: Option<Decimal>,
}
