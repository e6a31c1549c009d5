//! # Commands Module
//!
//! The operations a dashboard invokes. Each one is an async fn taking the
//! state it needs and returning a camelCase DTO or an [`ApiError`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports, shared date parsing)
//! ├── item.rs      ◄─── list_items, create_item, update_item
//! ├── category.rs  ◄─── list_categories, create_category
//! ├── purchase.rs  ◄─── list/record/update/delete purchases
//! ├── sale.rs      ◄─── list/record/update/delete sales
//! ├── stock.rs     ◄─── stock_overview (paginated)
//! ├── dashboard.rs ◄─── dashboard
//! └── report.rs    ◄─── stock_report, sales_report
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  READ                              WRITE                                │
//! │  ────                              ─────                                │
//! │  data.read().await                 validate input (no I/O yet)          │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  stockbook_core aggregation        db.inner().<collection>().insert()   │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  DTO                               data.invalidate(<collection>)        │
//! │                                         │                               │
//! │                                         ▼                               │
//! │                                    DTO built from the fresh snapshot    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Reads only need the snapshot
//! async fn list_sales(data: &DataState, ...)
//!
//! // Writes need the database too
//! async fn record_sale(db: &DbState, data: &DataState, input: RecordSaleInput)
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use stockbook_core::validation::parse_date;
use stockbook_core::ValidationError;

pub mod category;
pub mod dashboard;
pub mod item;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod stock;

/// Parses an optional `YYYY-MM-DD` form field. Blank counts as absent.
pub(crate) fn parse_optional_date(
    field: &str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_date(field, v).map(Some),
        None => Ok(None),
    }
}

/// Calendar day shown in tables.
pub(crate) fn display_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use crate::state::{DataState, DbState};
    use stockbook_db::{Database, DbConfig};

    /// Fresh in-memory database with an empty, loaded snapshot.
    pub async fn setup() -> (DbState, DataState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let data = DataState::new();
        data.reload_all(&db).await.unwrap();
        (DbState::new(db), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date("from", None).unwrap(), None);
        assert_eq!(parse_optional_date("from", Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional_date("from", Some("2024-02-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert!(parse_optional_date("from", Some("Feb 1")).is_err());
    }
}
