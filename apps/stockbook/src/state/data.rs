//! # Data State
//!
//! The application's in-memory copy of the four collections.
//!
//! ## Refresh Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Refresh                                     │
//! │                                                                         │
//! │  Page load ──────────► reload_all(db)                                  │
//! │                          └── Database::fetch_all (4 queries, parallel) │
//! │                                                                         │
//! │  record_sale ────────► db.sales().insert(..)                           │
//! │                          └── invalidate(db, Collection::Sales)         │
//! │                                └── db.sales().list_all()               │
//! │                                                                         │
//! │  Queries run with NO lock held. The write lock is taken only to swap   │
//! │  the freshly fetched Vec in. A failed fetch leaves the previous        │
//! │  snapshot untouched: stale but internally consistent.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, error};

use stockbook_core::{Category, Collection, Item, Purchase, Sale};
use stockbook_db::{Database, DbResult};

/// The four collections as last fetched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub items: Vec<Item>,
    pub categories: Vec<Category>,
    pub purchases: Vec<Purchase>,
    pub sales: Vec<Sale>,

    /// When the most recent successful fetch finished; `None` before the first.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn purchase(&self, id: &str) -> Option<&Purchase> {
        self.purchases.iter().find(|p| p.id == id)
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }
}

/// Shared handle to the snapshot. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct DataState {
    snapshot: Arc<RwLock<Snapshot>>,
}

impl DataState {
    /// Creates an empty, not-yet-loaded state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the current snapshot.
    pub async fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().await
    }

    /// Re-fetches every collection.
    ///
    /// On failure the error is logged and returned, and the previous
    /// snapshot stays in place.
    pub async fn reload_all(&self, db: &Database) -> DbResult<()> {
        let fetched = match db.fetch_all().await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!(error = %e, "Error fetching data");
                return Err(e);
            }
        };

        let mut snapshot = self.snapshot.write().await;
        snapshot.items = fetched.items;
        snapshot.categories = fetched.categories;
        snapshot.purchases = fetched.purchases;
        snapshot.sales = fetched.sales;
        snapshot.loaded_at = Some(Utc::now());

        debug!(
            items = snapshot.items.len(),
            categories = snapshot.categories.len(),
            purchases = snapshot.purchases.len(),
            sales = snapshot.sales.len(),
            "Snapshot reloaded"
        );
        Ok(())
    }

    /// Re-fetches one collection after a write touched it.
    pub async fn invalidate(&self, db: &Database, collection: Collection) -> DbResult<()> {
        let result = match collection {
            Collection::Items => db.items().list_all().await.map(Fresh::Items),
            Collection::Categories => db.categories().list_all().await.map(Fresh::Categories),
            Collection::Purchases => db.purchases().list_all().await.map(Fresh::Purchases),
            Collection::Sales => db.sales().list_all().await.map(Fresh::Sales),
        };

        let fresh = match result {
            Ok(fresh) => fresh,
            Err(e) => {
                error!(error = %e, %collection, "Error refreshing collection");
                return Err(e);
            }
        };

        let mut snapshot = self.snapshot.write().await;
        match fresh {
            Fresh::Items(items) => snapshot.items = items,
            Fresh::Categories(categories) => snapshot.categories = categories,
            Fresh::Purchases(purchases) => snapshot.purchases = purchases,
            Fresh::Sales(sales) => snapshot.sales = sales,
        }
        snapshot.loaded_at = Some(Utc::now());

        debug!(%collection, "Collection invalidated");
        Ok(())
    }
}

/// One freshly fetched collection, waiting to be swapped in.
enum Fresh {
    Items(Vec<Item>),
    Categories(Vec<Category>),
    Purchases(Vec<Purchase>),
    Sales(Vec<Sale>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbook_core::{NewCategory, NewSale};
    use stockbook_db::DbConfig;

    const ITEM: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[tokio::test]
    async fn test_reload_all_fills_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.categories()
            .insert(&NewCategory::new("Grains").unwrap())
            .await
            .unwrap();

        let data = DataState::new();
        assert!(data.read().await.loaded_at.is_none());

        data.reload_all(&db).await.unwrap();
        let snapshot = data.read().await;
        assert_eq!(snapshot.categories.len(), 1);
        assert!(snapshot.loaded_at.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_reflects_a_write() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let data = DataState::new();
        data.reload_all(&db).await.unwrap();

        let id = db
            .sales()
            .insert(&NewSale::new(ITEM, 3, Utc::now()).unwrap())
            .await
            .unwrap();
        assert!(data.read().await.sale(&id).is_none());

        data.invalidate(&db, Collection::Sales).await.unwrap();
        assert_eq!(data.read().await.sale(&id).unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.sales()
            .insert(&NewSale::new(ITEM, 3, Utc::now()).unwrap())
            .await
            .unwrap();

        let data = DataState::new();
        data.reload_all(&db).await.unwrap();
        let loaded_at = data.read().await.loaded_at;

        db.close().await;
        assert!(data.reload_all(&db).await.is_err());
        assert!(data.invalidate(&db, Collection::Sales).await.is_err());

        let snapshot = data.read().await;
        assert_eq!(snapshot.sales.len(), 1);
        assert_eq!(snapshot.loaded_at, loaded_at);
    }
}
