//! # Category Repository
//!
//! Database operations for categories.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use stockbook_core::{Category, CategoryUpdate, NewCategory};

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Every category, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, created_at
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category and returns its generated id.
    pub async fn insert(&self, category: &NewCategory) -> DbResult<String> {
        let id = generate_id();
        debug!(id = %id, name = %category.name(), "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&id)
        .bind(category.name())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Renames a category.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn update(&self, id: &str, update: &CategoryUpdate) -> DbResult<()> {
        debug!(id = %id, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = COALESCE(?2, name)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.name())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Deletes a category. Items that pointed at it keep the dangling id.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts categories (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use stockbook_core::{CategoryUpdate, NewCategory};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list_sorted_by_name() {
        let db = db().await;
        let repo = db.categories();

        repo.insert(&NewCategory::new("Spices").unwrap()).await.unwrap();
        let grains = repo.insert(&NewCategory::new("grains").unwrap()).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, grains);
        assert_eq!(all[0].name, "grains");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = db().await;
        let repo = db.categories();
        let id = repo.insert(&NewCategory::new("Grains").unwrap()).await.unwrap();

        let update = CategoryUpdate::default().with_name("Cereals").unwrap();
        repo.update(&id, &update).await.unwrap();
        assert_eq!(repo.get_by_id(&id).await.unwrap().unwrap().name, "Cereals");

        repo.delete(&id).await.unwrap();
        assert!(repo.get_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let db = db().await;
        let repo = db.categories();

        let update = CategoryUpdate::default().with_name("X").unwrap();
        assert!(matches!(
            repo.update("nope", &update).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete("nope").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
