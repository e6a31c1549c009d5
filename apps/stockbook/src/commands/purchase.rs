//! # Purchase Commands
//!
//! ## Recording a Purchase
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Purchase form                                                          │
//! │                                                                         │
//! │  Category: [ Grains ▾ ]  or  [+ new: "Pulses" ]                         │
//! │  Item:     [ Rice   ▾ ]  or  [+ new: "Red Lentils", unit "kg" ]         │
//! │  Quantity: [ 50 ]   Date: [ 2024-02-10 ]                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate everything (quantity, date, names, selections)            │
//! │  2. New category?  → insert, invalidate(Categories)                    │
//! │  3. New item?      → insert, invalidate(Items)                         │
//! │  4. Insert purchase → invalidate(Purchases)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is written until step 1 passes, so a bad quantity never leaves
//! an orphan category behind.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::{display_date, parse_optional_date};
use crate::error::ApiError;
use crate::state::{DataState, DbState, Snapshot};
use stockbook_core::aggregation::{category_name, item_name};
use stockbook_core::validation::{parse_date, validate_id, validate_name, validate_quantity, validate_unit};
use stockbook_core::{
    start_of_day, Collection, CoreError, Item, NewCategory, NewItem, NewPurchase, Page,
    Pagination, Purchase, PurchaseUpdate,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDto {
    pub id: String,
    pub category_id: String,
    pub category_name: String,
    pub item_id: String,
    pub item_name: String,
    pub unit: Option<String>,
    pub purchase_qty: i64,
    pub purchase_date: String,
}

impl PurchaseDto {
    fn build(purchase: &Purchase, snapshot: &Snapshot) -> Self {
        PurchaseDto {
            id: purchase.id.clone(),
            category_id: purchase.category_id.clone(),
            category_name: category_name(&snapshot.categories, &purchase.category_id).to_string(),
            item_id: purchase.item_id.clone(),
            item_name: item_name(&snapshot.items, &purchase.item_id).to_string(),
            unit: snapshot.item(&purchase.item_id).and_then(|i| i.unit.clone()),
            purchase_qty: purchase.purchase_qty,
            purchase_date: display_date(purchase.purchase_date),
        }
    }
}

/// Purchase form contents. Either pick an existing category/item by id or
/// name a new one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPurchaseInput {
    pub category_id: Option<String>,
    pub new_category: Option<String>,
    pub item_id: Option<String>,
    pub new_item: Option<String>,
    /// Unit for a new item; ignored for an existing one.
    pub unit: Option<String>,
    pub purchase_qty: i64,
    pub purchase_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseInput {
    pub category_id: Option<String>,
    pub item_id: Option<String>,
    pub purchase_qty: Option<i64>,
    pub purchase_date: Option<String>,
}

/// Existing record picked by id, or a name to create.
#[derive(Debug)]
enum Choice {
    Existing(String),
    New(String),
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Lists purchases, newest first, one page at a time.
pub async fn list_purchases(
    data: &DataState,
    pagination: Pagination,
) -> Result<Page<PurchaseDto>, ApiError> {
    let snapshot = data.read().await;

    let rows: Vec<PurchaseDto> = snapshot
        .purchases
        .iter()
        .rev()
        .map(|p| PurchaseDto::build(p, &snapshot))
        .collect();

    Ok(pagination.page_of(&rows))
}

/// Records a purchase, creating its category and item first when asked.
pub async fn record_purchase(
    db: &DbState,
    data: &DataState,
    input: RecordPurchaseInput,
) -> Result<PurchaseDto, ApiError> {
    debug!("record_purchase command");

    // 1. Validate. No writes happen in this block.
    validate_quantity("purchaseQty", input.purchase_qty)?;
    let purchase_date = start_of_day(parse_date("purchaseDate", &input.purchase_date)?);

    let (category, item, unit) = {
        let snapshot = data.read().await;

        let category = match non_blank(&input.new_category) {
            Some(name) => Choice::New(validate_name("newCategory", name)?),
            None => {
                let id = validate_id("categoryId", input.category_id.as_deref().unwrap_or(""))?;
                if snapshot.category(&id).is_none() {
                    return Err(CoreError::CategoryNotFound(id).into());
                }
                Choice::Existing(id)
            }
        };

        let item = match non_blank(&input.new_item) {
            Some(name) => Choice::New(validate_name("newItem", name)?),
            None => {
                let id = validate_id("itemId", input.item_id.as_deref().unwrap_or(""))?;
                let existing = snapshot
                    .item(&id)
                    .ok_or_else(|| CoreError::ItemNotFound(id.clone()))?;
                match &category {
                    Choice::Existing(category_id) => ensure_in_category(existing, category_id)?,
                    Choice::New(name) => {
                        return Err(ApiError::validation(format!(
                            "{} belongs to another category and cannot be filed under new category {}",
                            existing.name, name
                        )));
                    }
                }
                Choice::Existing(id)
            }
        };

        (category, item, validate_unit(input.unit.as_deref())?)
    };

    // 2. New category.
    let category_id = match category {
        Choice::Existing(id) => id,
        Choice::New(name) => {
            let id = db.inner().categories().insert(&NewCategory::new(&name)?).await?;
            data.invalidate(db.inner(), Collection::Categories).await?;
            info!(id = %id, name = %name, "Category created from purchase form");
            id
        }
    };

    // 3. New item.
    let item_id = match item {
        Choice::Existing(id) => id,
        Choice::New(name) => {
            let new_item = NewItem::new(&name, &category_id, unit.as_deref())?;
            let id = db.inner().items().insert(&new_item).await?;
            data.invalidate(db.inner(), Collection::Items).await?;
            info!(id = %id, name = %name, "Item created from purchase form");
            id
        }
    };

    // 4. The purchase itself.
    let new_purchase =
        NewPurchase::new(&category_id, &item_id, input.purchase_qty, purchase_date)?;
    let id = db.inner().purchases().insert(&new_purchase).await?;
    data.invalidate(db.inner(), Collection::Purchases).await?;

    info!(id = %id, item_id = %item_id, qty = input.purchase_qty, "Purchase recorded");
    purchase_dto(data, &id).await
}

/// Edits a recorded purchase.
pub async fn update_purchase(
    db: &DbState,
    data: &DataState,
    id: &str,
    input: UpdatePurchaseInput,
) -> Result<PurchaseDto, ApiError> {
    debug!(id = %id, "update_purchase command");

    let mut update = PurchaseUpdate::default();
    if let Some(category_id) = input.category_id.as_deref() {
        update = update.with_category(category_id)?;
    }
    if let Some(item_id) = input.item_id.as_deref() {
        update = update.with_item(item_id)?;
    }
    if let Some(qty) = input.purchase_qty {
        update = update.with_quantity(qty)?;
    }
    if let Some(date) = parse_optional_date("purchaseDate", input.purchase_date.as_deref())? {
        update = update.with_date(start_of_day(date));
    }
    if update.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }

    {
        let snapshot = data.read().await;
        let current = snapshot
            .purchase(id)
            .ok_or_else(|| CoreError::PurchaseNotFound(id.to_string()))?;
        if let Some(category_id) = update.category_id() {
            if snapshot.category(category_id).is_none() {
                return Err(CoreError::CategoryNotFound(category_id.to_string()).into());
            }
        }

        // A purchase is always filed under its item's category.
        if update.item_id().is_some() || update.category_id().is_some() {
            let item_id = update.item_id().unwrap_or(current.item_id.as_str());
            let category_id = update.category_id().unwrap_or(current.category_id.as_str());
            let item = snapshot
                .item(item_id)
                .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;
            ensure_in_category(item, category_id)?;
        }
    }

    db.inner().purchases().update(id, &update).await?;
    data.invalidate(db.inner(), Collection::Purchases).await?;

    info!(id = %id, "Purchase updated");
    purchase_dto(data, id).await
}

/// Deletes a purchase.
pub async fn delete_purchase(db: &DbState, data: &DataState, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_purchase command");

    db.inner().purchases().delete(id).await?;
    data.invalidate(db.inner(), Collection::Purchases).await?;

    info!(id = %id, "Purchase deleted");
    Ok(())
}

fn ensure_in_category(item: &Item, category_id: &str) -> Result<(), ApiError> {
    if item.category_id != category_id {
        return Err(ApiError::validation(format!(
            "{} is not in the selected category",
            item.name
        )));
    }
    Ok(())
}

async fn purchase_dto(data: &DataState, id: &str) -> Result<PurchaseDto, ApiError> {
    let snapshot = data.read().await;
    let purchase = snapshot
        .purchase(id)
        .ok_or_else(|| ApiError::internal("Purchase missing after refresh"))?;
    Ok(PurchaseDto::build(purchase, &snapshot))
}
