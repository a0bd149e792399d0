//! Movements (stock ledger) repository
//!
//! The ledger is append-only: this repository only inserts and reads.

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::AppResult,
    models::{
        client::ClientRef,
        movement::{Movement, MovementDetails, MovementEquipment, MovementTechnician, ScreenedBatch},
    },
};

#[derive(Clone)]
pub struct MovementsRepository {
    pool: Pool<Postgres>,
}

fn details_from_row(row: &PgRow) -> MovementDetails {
    let client_id: Option<i32> = row.get("client_id");
    let client_name: Option<String> = row.get("client_name");

    MovementDetails {
        id: row.get("id"),
        equipment_id: row.get("equipment_id"),
        movement_type: row.get("type"),
        agence: row.get("agence"),
        technician_id: row.get("technician_id"),
        quantity: row.get("quantity"),
        created_at: row.get("created_at"),
        equipment: MovementEquipment {
            name: row.get("equipment_name"),
            equipment_type: row.get("equipment_type"),
            price: row.get("equipment_price"),
            client: client_id
                .zip(client_name)
                .map(|(id, name)| ClientRef { id, name }),
        },
        technician: MovementTechnician {
            username: row.get("technician_username"),
        },
    }
}

impl MovementsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert one ledger row per batch line, all sharing technician, agency,
    /// type and timestamp. The whole batch commits or none of it does.
    pub async fn insert_batch(
        &self,
        technician_id: i32,
        batch: &ScreenedBatch,
        created_at: DateTime<Utc>,
    ) -> AppResult<Vec<Movement>> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(batch.lines.len());

        for (equipment_id, quantity) in &batch.lines {
            let movement = sqlx::query_as::<_, Movement>(
                r#"
                INSERT INTO movements (equipment_id, type, quantity, technician_id, agence, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(equipment_id)
            .bind(batch.movement_type)
            .bind(quantity)
            .bind(technician_id)
            .bind(&batch.agence)
            .bind(created_at)
            .fetch_one(&mut *tx)
            .await?;

            inserted.push(movement);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Ledger rows joined with equipment, client and technician, newest first.
    ///
    /// `technician_id` restricts the result to one technician's rows.
    pub async fn list(&self, technician_id: Option<i32>) -> AppResult<Vec<MovementDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.equipment_id, m.type, m.agence, m.technician_id, m.quantity, m.created_at,
                   e.name AS equipment_name, e.type AS equipment_type, e.price AS equipment_price,
                   c.id AS client_id, c.name AS client_name,
                   u.username AS technician_username
            FROM movements m
            JOIN equipments e ON e.id = m.equipment_id
            LEFT JOIN client c ON c.id = e.client_id
            JOIN users u ON u.id = m.technician_id
            WHERE ($1::int IS NULL OR m.technician_id = $1)
            ORDER BY m.created_at DESC, m.id DESC
            "#,
        )
        .bind(technician_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }
}
