//! # Sale Commands
//!
//! Recording, editing and listing sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sales form          record_sale                                        │
//! │  ──────────          ───────────                                        │
//! │  item  ─────────────► validate_id, item exists in snapshot?            │
//! │  quantity ──────────► validate_quantity                                │
//! │  date ──────────────► parse_date → start_of_day (UTC midnight)         │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                     db.sales().insert(..)                              │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                     invalidate(Sales) → closing stock drops            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A sale may take an item below zero. Closing stock is reported as is and
//! the item is flagged `out`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::{display_date, parse_optional_date};
use crate::error::ApiError;
use crate::state::{DataState, DbState, Snapshot};
use stockbook_core::aggregation::{item_name, sales_in_range};
use stockbook_core::validation::{parse_date, validate_date_range};
use stockbook_core::{
    start_of_day, Collection, CoreError, NewSale, Page, Pagination, Sale, SaleUpdate,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub unit: Option<String>,
    pub quantity: i64,
    pub date: String,
}

impl SaleDto {
    fn build(sale: &Sale, snapshot: &Snapshot) -> Self {
        SaleDto {
            id: sale.id.clone(),
            item_id: sale.item_id.clone(),
            item_name: item_name(&snapshot.items, &sale.item_id).to_string(),
            unit: snapshot.item(&sale.item_id).and_then(|i| i.unit.clone()),
            quantity: sale.quantity,
            date: display_date(sale.date),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleInput {
    pub item_id: String,
    pub quantity: i64,
    pub date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleInput {
    pub item_id: Option<String>,
    pub quantity: Option<i64>,
    pub date: Option<String>,
}

/// Lists sales, newest first, optionally limited to `[from, to]`.
///
/// Both bounds are needed for the filter to apply.
pub async fn list_sales(
    data: &DataState,
    from: Option<&str>,
    to: Option<&str>,
    pagination: Pagination,
) -> Result<Page<SaleDto>, ApiError> {
    let from = parse_optional_date("from", from)?;
    let to = parse_optional_date("to", to)?;
    validate_date_range(from, to)?;

    let snapshot = data.read().await;
    let mut selected = sales_in_range(&snapshot.sales, from, to);
    selected.reverse();

    let rows: Vec<SaleDto> = selected
        .into_iter()
        .map(|s| SaleDto::build(s, &snapshot))
        .collect();

    debug!(count = rows.len(), "list_sales command");
    Ok(pagination.page_of(&rows))
}

/// Records a sale of an existing item.
pub async fn record_sale(
    db: &DbState,
    data: &DataState,
    input: RecordSaleInput,
) -> Result<SaleDto, ApiError> {
    debug!(item_id = %input.item_id, qty = input.quantity, "record_sale command");

    let date = start_of_day(parse_date("date", &input.date)?);
    let new_sale = NewSale::new(&input.item_id, input.quantity, date)?;

    if data.read().await.item(new_sale.item_id()).is_none() {
        return Err(CoreError::ItemNotFound(new_sale.item_id().to_string()).into());
    }

    let id = db.inner().sales().insert(&new_sale).await?;
    data.invalidate(db.inner(), Collection::Sales).await?;

    info!(id = %id, item_id = %new_sale.item_id(), qty = new_sale.quantity(), "Sale recorded");
    sale_dto(data, &id).await
}

/// Edits a recorded sale.
pub async fn update_sale(
    db: &DbState,
    data: &DataState,
    id: &str,
    input: UpdateSaleInput,
) -> Result<SaleDto, ApiError> {
    debug!(id = %id, "update_sale command");

    let mut update = SaleUpdate::default();
    if let Some(item_id) = input.item_id.as_deref() {
        update = update.with_item(item_id)?;
    }
    if let Some(qty) = input.quantity {
        update = update.with_quantity(qty)?;
    }
    if let Some(date) = parse_optional_date("date", input.date.as_deref())? {
        update = update.with_date(start_of_day(date));
    }
    if update.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }

    {
        let snapshot = data.read().await;
        if snapshot.sale(id).is_none() {
            return Err(CoreError::SaleNotFound(id.to_string()).into());
        }
        if let Some(item_id) = update.item_id() {
            if snapshot.item(item_id).is_none() {
                return Err(CoreError::ItemNotFound(item_id.to_string()).into());
            }
        }
    }

    db.inner().sales().update(id, &update).await?;
    data.invalidate(db.inner(), Collection::Sales).await?;

    info!(id = %id, "Sale updated");
    sale_dto(data, id).await
}

pub async fn delete_sale(db: &DbState, data: &DataState, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_sale command");

    db.inner().sales().delete(id).await?;
    data.invalidate(db.inner(), Collection::Sales).await?;

    info!(id = %id, "Sale deleted");
    Ok(())
}

async fn sale_dto(data: &DataState, id: &str) -> Result<SaleDto, ApiError> {
    let snapshot = data.read().await;
    let sale = snapshot
        .sale(id)
        .ok_or_else(|| ApiError::internal("Sale missing after refresh"))?;
    Ok(SaleDto::build(sale, &snapshot))
}
