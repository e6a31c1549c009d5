//! # Item Commands
//!
//! Items carry their category's name and their current closing stock so
//! a picker can show "Basmati Rice (Grains) · 60 kg" without a second call.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DataState, DbState, Snapshot};
use stockbook_core::aggregation::{category_name, items_in_category};
use stockbook_core::{Collection, CoreError, Item, ItemUpdate, NewItem, StockLevel, StockRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub category_name: String,
    pub unit: Option<String>,
    pub closing_stock: i64,
    pub level: StockLevel,
}

impl ItemDto {
    pub(crate) fn build(item: &Item, snapshot: &Snapshot) -> Self {
        let row = StockRow::for_item(item, &snapshot.purchases, &snapshot.sales);

        ItemDto {
            id: item.id.clone(),
            name: item.name.clone(),
            category_id: item.category_id.clone(),
            category_name: category_name(&snapshot.categories, &item.category_id).to_string(),
            unit: item.unit.clone(),
            closing_stock: row.closing,
            level: row.level,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemInput {
    pub name: String,
    pub category_id: String,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub unit: Option<String>,
}

/// Lists items, optionally only those in one category.
pub async fn list_items(
    data: &DataState,
    category_id: Option<&str>,
) -> Result<Vec<ItemDto>, ApiError> {
    let snapshot = data.read().await;

    let items: Vec<&Item> = match category_id {
        Some(category_id) => items_in_category(&snapshot.items, category_id),
        None => snapshot.items.iter().collect(),
    };

    Ok(items
        .into_iter()
        .map(|item| ItemDto::build(item, &snapshot))
        .collect())
}

/// Creates an item under an existing category.
pub async fn create_item(
    db: &DbState,
    data: &DataState,
    input: CreateItemInput,
) -> Result<ItemDto, ApiError> {
    debug!(name = %input.name, "create_item command");

    let new_item = NewItem::new(&input.name, &input.category_id, input.unit.as_deref())?;
    if data.read().await.category(new_item.category_id()).is_none() {
        return Err(CoreError::CategoryNotFound(new_item.category_id().to_string()).into());
    }

    let id = db.inner().items().insert(&new_item).await?;
    data.invalidate(db.inner(), Collection::Items).await?;

    info!(id = %id, name = %new_item.name(), "Item created");
    item_dto(data, &id).await
}

/// Applies a partial edit to an item.
pub async fn update_item(
    db: &DbState,
    data: &DataState,
    id: &str,
    input: UpdateItemInput,
) -> Result<ItemDto, ApiError> {
    debug!(id = %id, "update_item command");

    let mut update = ItemUpdate::default();
    if let Some(name) = input.name.as_deref() {
        update = update.with_name(name)?;
    }
    if let Some(category_id) = input.category_id.as_deref() {
        update = update.with_category(category_id)?;
    }
    if let Some(unit) = input.unit.as_deref() {
        update = update.with_unit(unit)?;
    }
    if update.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }

    {
        let snapshot = data.read().await;
        if snapshot.item(id).is_none() {
            return Err(CoreError::ItemNotFound(id.to_string()).into());
        }
        if let Some(category_id) = update.category_id() {
            if snapshot.category(category_id).is_none() {
                return Err(CoreError::CategoryNotFound(category_id.to_string()).into());
            }
        }
    }

    db.inner().items().update(id, &update).await?;
    data.invalidate(db.inner(), Collection::Items).await?;

    info!(id = %id, "Item updated");
    item_dto(data, id).await
}

async fn item_dto(data: &DataState, id: &str) -> Result<ItemDto, ApiError> {
    let snapshot = data.read().await;
    let item = snapshot
        .item(id)
        .ok_or_else(|| ApiError::internal("Item missing after refresh"))?;
    Ok(ItemDto::build(item, &snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::category::create_category;
    use crate::commands::test_support::setup;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_create_and_filter_by_category() {
        let (db, data) = setup().await;
        let grains = create_category(&db, &data, "Grains").await.unwrap();
        let soaps = create_category(&db, &data, "Household").await.unwrap();

        let rice = create_item(
            &db,
            &data,
            CreateItemInput {
                name: "Rice".into(),
                category_id: grains.id.clone(),
                unit: Some("kg".into()),
            },
        )
        .await
        .unwrap();
        create_item(
            &db,
            &data,
            CreateItemInput {
                name: "Soap".into(),
                category_id: soaps.id.clone(),
                unit: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(rice.category_name, "Grains");
        assert_eq!(rice.closing_stock, 0);
        assert_eq!(rice.level, StockLevel::Out);

        let only_grains = list_items(&data, Some(&grains.id)).await.unwrap();
        assert_eq!(only_grains, vec![rice]);
        assert_eq!(list_items(&data, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let (db, data) = setup().await;

        let err = create_item(
            &db,
            &data,
            CreateItemInput {
                name: "Rice".into(),
                category_id: "550e8400-e29b-41d4-a716-446655440000".into(),
                unit: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(db.inner().items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_item() {
        let (db, data) = setup().await;
        let grains = create_category(&db, &data, "Grains").await.unwrap();
        let rice = create_item(
            &db,
            &data,
            CreateItemInput {
                name: "Rice".into(),
                category_id: grains.id,
                unit: Some("kg".into()),
            },
        )
        .await
        .unwrap();

        let updated = update_item(
            &db,
            &data,
            &rice.id,
            UpdateItemInput {
                name: Some("Basmati Rice".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Basmati Rice");
        assert_eq!(updated.unit.as_deref(), Some("kg"));

        let err = update_item(&db, &data, &rice.id, UpdateItemInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
