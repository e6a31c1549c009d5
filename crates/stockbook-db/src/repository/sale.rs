//! # Sale Repository
//!
//! Database operations for sales (outbound stock).
//!
//! A sale only names the item and the quantity. Whether the item still has
//! enough stock is not checked here: closing stock may go negative and the
//! dashboard shows it as out of stock.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use stockbook_core::{NewSale, Sale, SaleUpdate};

use super::generate_id;
use crate::error::{DbError, DbResult};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Every sale, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, item_id, quantity, date, created_at
            FROM sales
            ORDER BY date, created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, item_id, quantity, date, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Inserts a new sale and returns its generated id.
    pub async fn insert(&self, sale: &NewSale) -> DbResult<String> {
        let id = generate_id();
        debug!(
            id = %id,
            item_id = %sale.item_id(),
            qty = sale.quantity(),
            "Inserting sale"
        );

        sqlx::query(
            r#"
            INSERT INTO sales (id, item_id, quantity, date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&id)
        .bind(sale.item_id())
        .bind(sale.quantity())
        .bind(sale.date())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Applies a partial update. Fields left as `None` keep their value.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Sale doesn't exist
    pub async fn update(&self, id: &str, update: &SaleUpdate) -> DbResult<()> {
        debug!(id = %id, "Updating sale");

        let result = sqlx::query(
            r#"
            UPDATE sales SET
                item_id = COALESCE(?2, item_id),
                quantity = COALESCE(?3, quantity),
                date = COALESCE(?4, date)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.item_id())
        .bind(update.quantity())
        .bind(update.date())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Deletes a sale.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::{Database, DbConfig, DbError};
    use stockbook_core::{NewSale, SaleUpdate};

    const ITEM: &str = "550e8400-e29b-41d4-a716-446655440000";
    const OTHER_ITEM: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    #[tokio::test]
    async fn test_insert_update_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();
        let when = Utc.with_ymd_and_hms(2024, 2, 10, 14, 30, 0).unwrap();

        let id = repo.insert(&NewSale::new(ITEM, 20, when).unwrap()).await.unwrap();
        let stored = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 20);
        assert_eq!(stored.date, when);

        let update = SaleUpdate::default()
            .with_item(OTHER_ITEM)
            .unwrap()
            .with_quantity(7)
            .unwrap();
        repo.update(&id, &update).await.unwrap();

        let stored = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.item_id, OTHER_ITEM);
        assert_eq!(stored.quantity, 7);
        assert_eq!(stored.date, when);

        repo.delete(&id).await.unwrap();
        assert!(repo.get_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_date() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        for d in [20, 5, 10] {
            let date = NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
            repo.insert(&NewSale::new(ITEM, 1, stockbook_core::start_of_day(date)).unwrap())
                .await
                .unwrap();
        }

        let days: Vec<u32> = repo
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|s| chrono::Datelike::day(&s.date))
            .collect();
        assert_eq!(days, vec![5, 10, 20]);
    }

    #[tokio::test]
    async fn test_missing_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let update = SaleUpdate::default().with_quantity(1).unwrap();

        assert!(matches!(
            db.sales().update("missing", &update).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.sales().delete("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
