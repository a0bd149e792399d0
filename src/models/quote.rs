//! Quote ("devis") document types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::EquipmentType;
use super::movement::MovementQuery;

/// Quote request: ledger filters plus free-form extra groups
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub client_id: Option<i32>,
    pub equipment_type: Option<EquipmentType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Subject line printed in the header
    #[serde(default)]
    pub objet: String,
    #[serde(default)]
    pub custom_groups: Vec<CustomGroup>,
}

impl QuoteRequest {
    pub fn movement_filter(&self) -> MovementQuery {
        MovementQuery {
            client_id: self.client_id,
            equipment_type: self.equipment_type,
            start_date: self.start_date,
            end_date: self.end_date,
            ..Default::default()
        }
    }
}

/// Group of priced lines that do not come from the ledger
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CustomGroup {
    #[serde(rename = "type")]
    pub label: String,
    #[serde(default)]
    pub items: Vec<CustomItem>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CustomItem {
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QuoteLine {
    pub designation: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QuoteGroup {
    pub label: String,
    pub lines: Vec<QuoteLine>,
    pub subtotal: Decimal,
}

/// Computed quote document
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Quote {
    /// e.g. `DEV123456`
    pub number: String,
    /// Client name when the quote is filtered on one client
    pub project: Option<String>,
    pub objet: String,
    pub issued_on: NaiveDate,
    /// Ledger groups, in equipment type order
    pub groups: Vec<QuoteGroup>,
    pub custom_groups: Vec<QuoteGroup>,
    pub total_ht: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total_ttc: Decimal,
}
