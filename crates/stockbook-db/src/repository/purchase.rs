//! # Purchase Repository
//!
//! Database operations for purchases (inbound stock).
//!
//! ## Purchase Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Purchase Lifecycle                                │
//! │                                                                         │
//! │  1. RECORD                                                             │
//! │     └── insert(NewPurchase) → id                                       │
//! │         (closing stock of item_id goes up by purchase_qty)             │
//! │                                                                         │
//! │  2. (OPTIONAL) CORRECT                                                 │
//! │     └── update(id, PurchaseUpdate) → quantity/date/item fixed          │
//! │                                                                         │
//! │  3. (OPTIONAL) REMOVE                                                  │
//! │     └── delete(id) → gone; closing stock drops back                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use stockbook_core::{NewPurchase, Purchase, PurchaseUpdate};

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Repository for purchase database operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Every purchase, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, category_id, item_id, purchase_qty, purchase_date, created_at
            FROM purchases
            ORDER BY purchase_date, created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = purchases.len(), "Listed purchases");
        Ok(purchases)
    }

    /// Gets a purchase by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, category_id, item_id, purchase_qty, purchase_date, created_at
            FROM purchases
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    /// Inserts a new purchase and returns its generated id.
    pub async fn insert(&self, purchase: &NewPurchase) -> DbResult<String> {
        let id = generate_id();
        debug!(
            id = %id,
            item_id = %purchase.item_id(),
            qty = purchase.purchase_qty(),
            "Inserting purchase"
        );

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, category_id, item_id, purchase_qty, purchase_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(purchase.category_id())
        .bind(purchase.item_id())
        .bind(purchase.purchase_qty())
        .bind(purchase.purchase_date())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Applies a partial update. Fields left as `None` keep their value.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Purchase doesn't exist
    pub async fn update(&self, id: &str, update: &PurchaseUpdate) -> DbResult<()> {
        debug!(id = %id, "Updating purchase");

        let result = sqlx::query(
            r#"
            UPDATE purchases SET
                category_id = COALESCE(?2, category_id),
                item_id = COALESCE(?3, item_id),
                purchase_qty = COALESCE(?4, purchase_qty),
                purchase_date = COALESCE(?5, purchase_date)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.category_id())
        .bind(update.item_id())
        .bind(update.purchase_qty())
        .bind(update.purchase_date())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Purchase", id));
        }

        Ok(())
    }

    /// Deletes a purchase.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting purchase");

        let result = sqlx::query("DELETE FROM purchases WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Purchase", id));
        }

        Ok(())
    }

    /// Counts purchases (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{Database, DbConfig};
    use stockbook_core::{start_of_day, NewPurchase, PurchaseUpdate};

    const CATEGORY: &str = "550e8400-e29b-41d4-a716-446655440000";
    const ITEM: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    fn day(d: u32) -> chrono::DateTime<chrono::Utc> {
        start_of_day(NaiveDate::from_ymd_opt(2024, 2, d).unwrap())
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_date() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchases();

        let late = repo
            .insert(&NewPurchase::new(CATEGORY, ITEM, 30, day(20)).unwrap())
            .await
            .unwrap();
        let early = repo
            .insert(&NewPurchase::new(CATEGORY, ITEM, 50, day(3)).unwrap())
            .await
            .unwrap();

        let ids: Vec<String> = repo.list_all().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![early, late]);
    }

    #[tokio::test]
    async fn test_round_trip_keeps_date() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchases();

        let id = repo
            .insert(&NewPurchase::new(CATEGORY, ITEM, 50, day(10)).unwrap())
            .await
            .unwrap();

        let stored = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.purchase_qty, 50);
        assert_eq!(stored.purchase_date, day(10));
        assert_eq!(stored.item_id, ITEM);
    }

    #[tokio::test]
    async fn test_update_quantity_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchases();
        let id = repo
            .insert(&NewPurchase::new(CATEGORY, ITEM, 50, day(10)).unwrap())
            .await
            .unwrap();

        let update = PurchaseUpdate::default().with_quantity(45).unwrap();
        repo.update(&id, &update).await.unwrap();

        let stored = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.purchase_qty, 45);
        assert_eq!(stored.purchase_date, day(10));
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.purchases();
        let id = repo
            .insert(&NewPurchase::new(CATEGORY, ITEM, 5, day(1)).unwrap())
            .await
            .unwrap();

        repo.delete(&id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.delete(&id).await.unwrap_err().is_not_found());

        let update = PurchaseUpdate::default().with_date(day(2));
        assert!(repo.update(&id, &update).await.unwrap_err().is_not_found());
    }
}
