//! # Category Commands

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DataState, DbState};
use stockbook_core::aggregation::items_in_category;
use stockbook_core::{Category, Collection, Item, NewCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub item_count: usize,
}

impl CategoryDto {
    fn build(category: &Category, items: &[Item]) -> Self {
        CategoryDto {
            id: category.id.clone(),
            name: category.name.clone(),
            item_count: items_in_category(items, &category.id).len(),
        }
    }
}

pub async fn list_categories(data: &DataState) -> Result<Vec<CategoryDto>, ApiError> {
    let snapshot = data.read().await;

    Ok(snapshot
        .categories
        .iter()
        .map(|c| CategoryDto::build(c, &snapshot.items))
        .collect())
}

pub async fn create_category(
    db: &DbState,
    data: &DataState,
    name: &str,
) -> Result<CategoryDto, ApiError> {
    debug!(name = %name, "create_category command");

    let new_category = NewCategory::new(name)?;
    let id = db.inner().categories().insert(&new_category).await?;
    data.invalidate(db.inner(), Collection::Categories).await?;

    info!(id = %id, name = %new_category.name(), "Category created");

    let snapshot = data.read().await;
    let category = snapshot
        .category(&id)
        .ok_or_else(|| ApiError::internal("Created category missing after refresh"))?;
    Ok(CategoryDto::build(category, &snapshot.items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::setup;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_create_and_list() {
        let (db, data) = setup().await;

        let created = create_category(&db, &data, "  Grains ").await.unwrap();
        assert_eq!(created.name, "Grains");
        assert_eq!(created.item_count, 0);

        let all = list_categories(&data).await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn test_blank_name_never_reaches_store() {
        let (db, data) = setup().await;

        let err = create_category(&db, &data, "   ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(db.inner().categories().count().await.unwrap(), 0);
    }
}
