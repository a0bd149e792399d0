//! Movement (stock ledger) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::client::ClientRef;
use super::enums::{EquipmentType, MovementType};
use crate::error::{AppError, AppResult};

/// Ledger row as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Movement {
    pub id: i32,
    pub equipment_id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i32,
    pub technician_id: i32,
    pub agence: String,
    pub created_at: DateTime<Utc>,
}

/// Equipment fields resolved on a ledger row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovementEquipment {
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub price: Option<Decimal>,
    pub client: Option<ClientRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovementTechnician {
    pub username: String,
}

/// Ledger row joined with its equipment, client and technician
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovementDetails {
    pub id: i32,
    pub equipment_id: i32,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub agence: String,
    pub technician_id: i32,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub equipment: MovementEquipment,
    pub technician: MovementTechnician,
}

/// One line of a movement batch
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MovementInput {
    pub equipment_id: i32,
    /// Optional per-line type; must agree with the batch type
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
    pub quantity: i64,
}

/// Record movements request: one ledger row per line
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordMovements {
    pub movements: Vec<MovementInput>,
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
    /// Agency (site) label shared by the batch
    #[serde(default, alias = "agency")]
    pub agence: String,
}

/// A batch that passed screening and is ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenedBatch {
    pub movement_type: MovementType,
    pub agence: String,
    /// `(equipment_id, quantity)` pairs, every quantity strictly positive
    pub lines: Vec<(i32, i32)>,
}

impl RecordMovements {
    /// Drop non-positive lines and settle the batch type.
    ///
    /// Lines with a zero or negative quantity never reach storage. A batch
    /// left empty after screening is rejected.
    pub fn screen(self) -> AppResult<ScreenedBatch> {
        let kept: Vec<MovementInput> = self
            .movements
            .into_iter()
            .filter(|line| line.quantity > 0)
            .collect();

        if kept.is_empty() {
            return Err(AppError::Validation(
                "Select at least one equipment with a positive quantity".to_string(),
            ));
        }

        let movement_type = match self.movement_type {
            Some(batch_type) => batch_type,
            None => kept[0].movement_type.ok_or_else(|| {
                AppError::Validation("Movement type (ENTREE or SORTIE) is required".to_string())
            })?,
        };

        if kept
            .iter()
            .any(|line| line.movement_type.is_some_and(|t| t != movement_type))
        {
            return Err(AppError::Validation(
                "All movements of a batch must share the same type".to_string(),
            ));
        }

        let lines = kept
            .into_iter()
            .map(|line| {
                i32::try_from(line.quantity)
                    .map(|quantity| (line.equipment_id, quantity))
                    .map_err(|_| {
                        AppError::Validation(format!("Quantity {} is too large", line.quantity))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ScreenedBatch {
            movement_type,
            agence: self.agence.trim().to_string(),
            lines,
        })
    }
}

/// Movement filters; every absent field matches all rows
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct MovementQuery {
    /// Case-insensitive match on equipment name, technician username or date (dd/mm/yyyy)
    pub search: Option<String>,
    pub movement_type: Option<MovementType>,
    pub equipment_type: Option<EquipmentType>,
    pub client_id: Option<i32>,
    /// First day included
    pub start_date: Option<NaiveDate>,
    /// Last day included
    pub end_date: Option<NaiveDate>,
}

impl MovementQuery {
    pub fn matches(&self, movement: &MovementDetails) -> bool {
        if let Some(ref search) = self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let date = movement.created_at.format("%d/%m/%Y").to_string();
                let hit = movement.equipment.name.to_lowercase().contains(&needle)
                    || movement.technician.username.to_lowercase().contains(&needle)
                    || date.contains(&needle);
                if !hit {
                    return false;
                }
            }
        }

        if self.movement_type.is_some_and(|t| t != movement.movement_type) {
            return false;
        }

        if self
            .equipment_type
            .is_some_and(|t| t != movement.equipment.equipment_type)
        {
            return false;
        }

        if let Some(client_id) = self.client_id {
            if movement.equipment.client.as_ref().map(|c| c.id) != Some(client_id) {
                return false;
            }
        }

        let day = movement.created_at.date_naive();
        if self.start_date.is_some_and(|start| day < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| day > end) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn line(equipment_id: i32, quantity: i64) -> MovementInput {
        MovementInput {
            equipment_id,
            movement_type: None,
            quantity,
        }
    }

    fn details(client: Option<(i32, &str)>, created_at: DateTime<Utc>) -> MovementDetails {
        MovementDetails {
            id: 1,
            equipment_id: 10,
            movement_type: MovementType::Sortie,
            agence: "Casablanca".to_string(),
            technician_id: 4,
            quantity: 3,
            created_at,
            equipment: MovementEquipment {
                name: "Camera".to_string(),
                equipment_type: EquipmentType::VideoSurveillance,
                price: Some(Decimal::from(1200)),
                client: client.map(|(id, name)| ClientRef {
                    id,
                    name: name.to_string(),
                }),
            },
            technician: MovementTechnician {
                username: "tech.karim".to_string(),
            },
        }
    }

    #[test]
    fn test_screen_drops_non_positive_quantities() {
        let batch = RecordMovements {
            movements: vec![line(1, 3), line(2, 0), line(3, -5), line(4, 1)],
            movement_type: Some(MovementType::Entree),
            agence: " Rabat ".to_string(),
        };

        let screened = batch.screen().unwrap();
        assert_eq!(screened.lines, vec![(1, 3), (4, 1)]);
        assert_eq!(screened.movement_type, MovementType::Entree);
        assert_eq!(screened.agence, "Rabat");
        assert!(screened.lines.iter().all(|(_, q)| *q > 0));
    }

    #[test]
    fn test_screen_rejects_empty_batch() {
        let batch = RecordMovements {
            movements: vec![line(1, 0), line(2, -1)],
            movement_type: Some(MovementType::Sortie),
            agence: String::new(),
        };
        assert!(matches!(batch.screen(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_screen_takes_type_from_lines() {
        let batch: RecordMovements = serde_json::from_value(json!({
            "movements": [
                { "equipment_id": 1, "type": "SORTIE", "quantity": 2 },
                { "equipment_id": 2, "type": "SORTIE", "quantity": 0 }
            ],
            "technician_id": 99,
            "agence": "Casablanca"
        }))
        .unwrap();

        let screened = batch.screen().unwrap();
        assert_eq!(screened.movement_type, MovementType::Sortie);
        assert_eq!(screened.lines, vec![(1, 2)]);
    }

    #[test]
    fn test_screen_rejects_mixed_types() {
        let batch = RecordMovements {
            movements: vec![
                MovementInput {
                    equipment_id: 1,
                    movement_type: Some(MovementType::Entree),
                    quantity: 1,
                },
                MovementInput {
                    equipment_id: 2,
                    movement_type: Some(MovementType::Sortie),
                    quantity: 1,
                },
            ],
            movement_type: None,
            agence: String::new(),
        };
        assert!(batch.screen().is_err());
    }

    #[test]
    fn test_screen_requires_a_type() {
        let batch = RecordMovements {
            movements: vec![line(1, 1)],
            movement_type: None,
            agence: String::new(),
        };
        assert!(batch.screen().is_err());
    }

    #[test]
    fn test_query_matches_everything_by_default() {
        let movement = details(None, Utc::now());
        assert!(MovementQuery::default().matches(&movement));
    }

    #[test]
    fn test_query_client_filter() {
        let movement = details(Some((5, "Acme")), Utc::now());
        let query = MovementQuery {
            client_id: Some(5),
            ..Default::default()
        };
        assert!(query.matches(&movement));

        let query = MovementQuery {
            client_id: Some(6),
            ..Default::default()
        };
        assert!(!query.matches(&movement));

        let unassigned = details(None, Utc::now());
        assert!(!query.matches(&unassigned));
    }

    #[test]
    fn test_query_search_and_types() {
        let movement = details(Some((5, "Acme")), Utc::now());
        let query = MovementQuery {
            search: Some("CAM".to_string()),
            movement_type: Some(MovementType::Sortie),
            equipment_type: Some(EquipmentType::VideoSurveillance),
            ..Default::default()
        };
        assert!(query.matches(&movement));

        let query = MovementQuery {
            search: Some("karim".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&movement));

        let query = MovementQuery {
            movement_type: Some(MovementType::Entree),
            ..Default::default()
        };
        assert!(!query.matches(&movement));
    }

    #[test]
    fn test_query_date_range_is_inclusive() {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 15, 17, 30, 0).unwrap();
        let movement = details(None, created_at);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let query = MovementQuery {
            start_date: Some(day),
            end_date: Some(day),
            ..Default::default()
        };
        assert!(query.matches(&movement));

        let query = MovementQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 16),
            ..Default::default()
        };
        assert!(!query.matches(&movement));

        let query = MovementQuery {
            search: Some("15/03/2024".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&movement));
    }
}
