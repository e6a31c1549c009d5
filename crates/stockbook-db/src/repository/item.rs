//! # Item Repository
//!
//! Database operations for items.
//!
//! Items carry no stock column. The closing figure is always derived from
//! purchases and sales (see `stockbook_core::aggregation`), so nothing here
//! touches quantities.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use stockbook_core::{Item, ItemUpdate, NewItem};

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let id = repo.insert(&NewItem::new("Rice", &category_id, Some("kg"))?).await?;
/// let rice = repo.get_by_id(&id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Every item, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category_id, unit, created_at
            FROM items
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Items in one category, ordered by name.
    ///
    /// ## Usage
    /// Feeds the item picker once a category is chosen on the purchase form.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category_id, unit, created_at
            FROM items
            WHERE category_id = ?1
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category_id, unit, created_at
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Inserts a new item and returns its generated id.
    pub async fn insert(&self, item: &NewItem) -> DbResult<String> {
        let id = generate_id();
        debug!(id = %id, name = %item.name(), "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (id, name, category_id, unit, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&id)
        .bind(item.name())
        .bind(item.category_id())
        .bind(item.unit())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Applies a partial update. Fields left as `None` keep their value;
    /// a unit update may also clear the unit.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, id: &str, update: &ItemUpdate) -> DbResult<()> {
        debug!(id = %id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = COALESCE(?2, name),
                category_id = COALESCE(?3, category_id),
                unit = CASE WHEN ?5 THEN ?4 ELSE unit END
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.name())
        .bind(update.category_id())
        .bind(update.unit().flatten())
        .bind(update.unit().is_some())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Deletes an item.
    ///
    /// Purchases and sales that referenced it stay in place and read back
    /// as "Unknown Item".
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Counts items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockbook_core::{ItemUpdate, NewItem};

    const CATEGORY: &str = "550e8400-e29b-41d4-a716-446655440000";
    const OTHER_CATEGORY: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let repo = db.items();

        let id = repo
            .insert(&NewItem::new("Rice", CATEGORY, Some("kg")).unwrap())
            .await
            .unwrap();

        let item = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(item.name, "Rice");
        assert_eq!(item.category_id, CATEGORY);
        assert_eq!(item.unit.as_deref(), Some("kg"));
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let db = db().await;
        let repo = db.items();

        repo.insert(&NewItem::new("Rice", CATEGORY, None).unwrap()).await.unwrap();
        repo.insert(&NewItem::new("Barley", CATEGORY, None).unwrap()).await.unwrap();
        repo.insert(&NewItem::new("Soap", OTHER_CATEGORY, None).unwrap()).await.unwrap();

        let grains = repo.list_by_category(CATEGORY).await.unwrap();
        let names: Vec<&str> = grains.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Barley", "Rice"]);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = db().await;
        let repo = db.items();
        let id = repo
            .insert(&NewItem::new("Rice", CATEGORY, Some("kg")).unwrap())
            .await
            .unwrap();

        let update = ItemUpdate::default().with_name("Basmati").unwrap();
        repo.update(&id, &update).await.unwrap();

        let item = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(item.name, "Basmati");
        assert_eq!(item.unit.as_deref(), Some("kg"));
        assert_eq!(item.category_id, CATEGORY);
    }

    #[tokio::test]
    async fn test_blank_unit_clears_it() {
        let db = db().await;
        let repo = db.items();
        let id = repo
            .insert(&NewItem::new("Sponges", CATEGORY, Some("pack")).unwrap())
            .await
            .unwrap();

        let update = ItemUpdate::default().with_unit("  ").unwrap();
        assert!(!update.is_empty());
        repo.update(&id, &update).await.unwrap();

        let item = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(item.unit, None);
        assert_eq!(item.name, "Sponges");

        let update = ItemUpdate::default().with_unit("box").unwrap();
        repo.update(&id, &update).await.unwrap();
        assert_eq!(repo.get_by_id(&id).await.unwrap().unwrap().unit.as_deref(), Some("box"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = db().await;
        let update = ItemUpdate::default().with_name("Ghost").unwrap();

        let err = db.items().update("missing", &update).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db().await;
        let repo = db.items();
        let id = repo.insert(&NewItem::new("Rice", CATEGORY, None).unwrap()).await.unwrap();

        repo.delete(&id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.delete(&id).await.unwrap_err().is_not_found());
    }
}
