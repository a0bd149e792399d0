//! Equipment repository for database operations

use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        client::ClientRef,
        equipment::{reference_value, ClientEquipment, CreateEquipment, Equipment, UpdateEquipment},
    },
};

const EQUIPMENT_COLUMNS: &str = r#"
    e.id, e.name, e."ref", e.type, e.price, e.client_id, e.created_at, e.updated_at,
    c.name AS client_name
"#;

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

fn equipment_from_row(row: &PgRow) -> Equipment {
    let client_id: Option<i32> = row.get("client_id");
    let client_name: Option<String> = row.get("client_name");

    Equipment {
        id: row.get("id"),
        name: row.get("name"),
        reference: row.get("ref"),
        equipment_type: row.get("type"),
        price: row.get("price"),
        client_id,
        client: client_id
            .zip(client_name)
            .map(|(id, name)| ClientRef { id, name }),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment with the owning client resolved
    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        let query = format!(
            r#"
            SELECT {}
            FROM equipments e
            LEFT JOIN client c ON c.id = e.client_id
            ORDER BY e.created_at DESC, e.id DESC
            "#,
            EQUIPMENT_COLUMNS
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(equipment_from_row).collect())
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        let query = format!(
            r#"
            SELECT {}
            FROM equipments e
            LEFT JOIN client c ON c.id = e.client_id
            WHERE e.id = $1
            "#,
            EQUIPMENT_COLUMNS
        );

        sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| equipment_from_row(&row))
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Equipment assigned to a client, with stock derived from the ledger
    pub async fn list_for_client(&self, client_id: i32) -> AppResult<Vec<ClientEquipment>> {
        let query = format!(
            r#"
            SELECT {},
                   COALESCE(SUM(CASE WHEN m.type = 'ENTREE' THEN m.quantity ELSE -m.quantity END), 0)::bigint
                       AS quantity
            FROM equipments e
            LEFT JOIN client c ON c.id = e.client_id
            LEFT JOIN movements m ON m.equipment_id = e.id
            WHERE e.client_id = $1
            GROUP BY e.id, c.name
            ORDER BY e.created_at DESC, e.id DESC
            "#,
            EQUIPMENT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| ClientEquipment {
                equipment: equipment_from_row(row),
                quantity: row.get("quantity"),
            })
            .collect())
    }

    /// Create equipment
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO equipments (name, "ref", type, price, client_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(data.name.trim())
        .bind(data.reference.as_deref().and_then(reference_value))
        .bind(data.equipment_type)
        .bind(data.price)
        .bind(data.client_id.and_then(|c| c.client_id()))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update equipment; only fields present in the request are written
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.reference, "\"ref\"");
        add_field!(data.equipment_type, "type");
        add_field!(data.price, "price");
        add_field!(data.client_id, "client_id");

        let query = format!(
            "UPDATE equipments SET {} WHERE id = ${}",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        if let Some(name) = data.name.as_deref() {
            builder = builder.bind(name.trim());
        }
        if let Some(reference) = data.reference.as_deref() {
            builder = builder.bind(reference_value(reference));
        }
        bind_field!(data.equipment_type);
        bind_field!(data.price);
        if let Some(assignment) = data.client_id {
            builder = builder.bind(assignment.client_id());
        }

        let result = builder.bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }

        self.get_by_id(id).await
    }

    /// Delete equipment
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }
}
