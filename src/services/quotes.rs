//! Quote ("devis") generation from the movement ledger

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    config::QuotesConfig,
    error::{AppError, AppResult},
    models::{
        enums::EquipmentType,
        movement::MovementDetails,
        quote::{CustomGroup, Quote, QuoteGroup, QuoteLine, QuoteRequest},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct QuotesService {
    repository: Repository,
    config: QuotesConfig,
}

impl QuotesService {
    pub fn new(repository: Repository, config: QuotesConfig) -> Self {
        Self { repository, config }
    }

    /// Build a quote over the ledger rows selected by the request filters
    pub async fn build_quote(&self, request: &QuoteRequest) -> AppResult<Quote> {
        let filter = request.movement_filter();
        let rows: Vec<MovementDetails> = self
            .repository
            .movements
            .list(None)
            .await?
            .into_iter()
            .filter(|m| filter.matches(m))
            .collect();

        let project = match request.client_id {
            Some(id) => Some(self.repository.clients.get_by_id(id).await?.name),
            None => None,
        };

        let now = Utc::now();
        let number = quote_number(&self.config.number_prefix, now.timestamp_millis());
        let quote = assemble(
            number,
            project,
            request,
            &rows,
            now.date_naive(),
            self.config.tax_rate,
        )?;

        tracing::info!(
            "Built quote {} over {} movement(s), total TTC {}",
            quote.number,
            rows.len(),
            quote.total_ttc
        );
        Ok(quote)
    }
}

/// Prefix followed by the last six digits of the millisecond timestamp
pub fn quote_number(prefix: &str, timestamp_millis: i64) -> String {
    format!("{}{:06}", prefix, timestamp_millis.rem_euclid(1_000_000))
}

fn round(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

fn overflow() -> AppError {
    AppError::Validation("Quote amounts are too large".to_string())
}

/// `unit_price × quantity`, rounded; overflow is a client error
fn line_total(unit_price: Decimal, quantity: i64) -> AppResult<Decimal> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .map(round)
        .ok_or_else(overflow)
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> AppResult<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .map(round)
        .ok_or_else(overflow)
}

/// One group per equipment type present in `rows`, in type order
pub fn ledger_groups(rows: &[MovementDetails]) -> AppResult<Vec<QuoteGroup>> {
    let mut by_type: BTreeMap<EquipmentType, Vec<QuoteLine>> = BTreeMap::new();

    for row in rows {
        let unit_price = row.equipment.price.unwrap_or(Decimal::ZERO);
        let quantity = i64::from(row.quantity);
        by_type
            .entry(row.equipment.equipment_type)
            .or_default()
            .push(QuoteLine {
                designation: row.equipment.name.clone(),
                unit_price,
                quantity,
                total: line_total(unit_price, quantity)?,
            });
    }

    by_type
        .into_iter()
        .map(|(equipment_type, lines)| group(equipment_type.to_string(), lines))
        .collect()
}

/// Priced groups for the free-form sections; empty ones are left out
pub fn custom_groups(groups: &[CustomGroup]) -> AppResult<Vec<QuoteGroup>> {
    groups
        .iter()
        .filter(|g| !g.items.is_empty())
        .map(|g| {
            let lines = g
                .items
                .iter()
                .map(|item| {
                    if item.unit_price < Decimal::ZERO || item.quantity < 0 {
                        return Err(AppError::Validation(format!(
                            "Custom item '{}' has a negative price or quantity",
                            item.description
                        )));
                    }
                    Ok(QuoteLine {
                        designation: item.description.clone(),
                        unit_price: item.unit_price,
                        quantity: item.quantity,
                        total: line_total(item.unit_price, item.quantity)?,
                    })
                })
                .collect::<AppResult<Vec<_>>>()?;
            group(g.label.clone(), lines)
        })
        .collect()
}

fn group(label: String, lines: Vec<QuoteLine>) -> AppResult<QuoteGroup> {
    let subtotal = checked_sum(lines.iter().map(|l| l.total))?;
    Ok(QuoteGroup {
        label,
        lines,
        subtotal,
    })
}

/// Assemble the document and its totals
pub fn assemble(
    number: String,
    project: Option<String>,
    request: &QuoteRequest,
    rows: &[MovementDetails],
    issued_on: NaiveDate,
    tax_rate: Decimal,
) -> AppResult<Quote> {
    let groups = ledger_groups(rows)?;
    let custom_groups = custom_groups(&request.custom_groups)?;

    let total_ht = checked_sum(groups.iter().chain(custom_groups.iter()).map(|g| g.subtotal))?;
    let tax = total_ht.checked_mul(tax_rate).map(round).ok_or_else(overflow)?;
    let total_ttc = checked_sum([total_ht, tax])?;

    Ok(Quote {
        number,
        project,
        objet: request.objet.trim().to_string(),
        issued_on,
        groups,
        custom_groups,
        total_ht,
        tax_rate,
        tax,
        total_ttc,
    })
}
