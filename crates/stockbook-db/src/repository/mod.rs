//! # Repository Module
//!
//! One repository per stored collection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Surface                                   │
//! │                                                                         │
//! │  Command                                                               │
//! │       │                                                                 │
//! │       │  db.sales().insert(&new_sale)                                  │
//! │       ▼                                                                 │
//! │  SaleRepository                (same shape for every collection)       │
//! │  ├── list_all(&self)           fetchAll, stable order                  │
//! │  ├── get_by_id(&self, id)      Option<record>                          │
//! │  ├── insert(&self, draft)      add → generated id                      │
//! │  ├── update(&self, id, patch)  partial update → NotFound if missing    │
//! │  ├── delete(&self, id)         hard delete → NotFound if missing       │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Partial updates bind every optional field and let `COALESCE(?, column)`
//! keep the stored value for the ones left as `None`.
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`]
//! - [`category::CategoryRepository`]
//! - [`purchase::PurchaseRepository`]
//! - [`sale::SaleRepository`]

use uuid::Uuid;

pub mod category;
pub mod item;
pub mod purchase;
pub mod sale;

/// Fresh record id. Ids are generated here, never by the caller.
pub(crate) fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
