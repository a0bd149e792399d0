//! Movement ledger service

use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        enums::Role,
        movement::{Movement, MovementDetails, MovementQuery, RecordMovements},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MovementsService {
    repository: Repository,
}

impl MovementsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a batch for the given technician.
    ///
    /// Lines with a non-positive quantity are dropped; the rest are written
    /// with one shared timestamp.
    pub async fn record_batch(
        &self,
        technician_id: i32,
        batch: RecordMovements,
    ) -> AppResult<Vec<Movement>> {
        let submitted = batch.movements.len();
        let screened = batch.screen()?;
        let dropped = submitted - screened.lines.len();
        if dropped > 0 {
            tracing::warn!(
                "Dropped {} movement line(s) with non-positive quantity from technician {}",
                dropped,
                technician_id
            );
        }

        let movements = self
            .repository
            .movements
            .insert_batch(technician_id, &screened, Utc::now())
            .await?;

        tracing::info!(
            technician_id,
            movement_type = %screened.movement_type,
            agence = %screened.agence,
            count = movements.len(),
            "Recorded movement batch"
        );
        Ok(movements)
    }

    /// Ledger rows visible to the caller, filtered.
    ///
    /// Technicians only see their own rows.
    pub async fn list(&self, caller: &UserClaims, query: &MovementQuery) -> AppResult<Vec<MovementDetails>> {
        let scope = (caller.role == Role::Technician).then_some(caller.user_id);
        self.filtered(scope, query).await
    }

    /// All ledger rows matching `query`, optionally restricted to one technician
    pub async fn filtered(
        &self,
        technician_id: Option<i32>,
        query: &MovementQuery,
    ) -> AppResult<Vec<MovementDetails>> {
        let rows = self.repository.movements.list(technician_id).await?;
        Ok(rows.into_iter().filter(|m| query.matches(m)).collect())
    }
}
