//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate holds everything Stockbook knows about stock that does not
//! touch a database, a clock or a screen.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Dashboard / CLI (apps/stockbook)                │   │
//! │  │    Stock Overview ──► Purchases ──► Sales ──► Reports          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌────────────┐ ┌────────────┐ ┌────────┐ ┌──────┐ │   │
//! │  │  │  types  │ │aggregation │ │ pagination │ │ report │ │valid.│ │   │
//! │  │  │  Item   │ │closing     │ │ Pagination │ │ Report │ │rules │ │   │
//! │  │  │  Sale   │ │stock, sums │ │ Page<T>    │ │ Table  │ │      │ │   │
//! │  │  └─────────┘ └────────────┘ └────────────┘ └────────┘ └──────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockbook-db (Data-Access Façade)               │   │
//! │  │          items • categories • purchases • sales (SQLite)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Stored records, drafts and partial updates
//! - [`aggregation`] - Closing stock, date-range selection, dashboard figures
//! - [`pagination`] - 1-indexed fixed-size windows
//! - [`report`] - Title/headers/rows tables for export
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules
//!
//! ## Design Principles
//!
//! 1. **Derived, never stored**: closing stock is recomputed from the full
//!    purchase and sale collections on every read
//! 2. **No I/O**: callers fetch the collections and pass "today" in
//! 3. **Explicit Errors**: invalid input is a typed error, never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use stockbook_core::{closing_stock, StockLevel};
//!
//! // No purchases, no sales: nothing in stock.
//! let closing = closing_stock("any-item", &[], &[]);
//! assert_eq!(closing, 0);
//! assert_eq!(StockLevel::classify(closing), StockLevel::Out);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregation;
pub mod error;
pub mod pagination;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockbook_core::Pagination` instead of
// `use stockbook_core::pagination::Pagination`

pub use aggregation::{
    closing_stock, dashboard_figures, sales_in_range, stock_summary, sum_quantity,
    total_purchase_qty, total_sold, DashboardFigures, StockLevel, StockRow,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use pagination::{Page, Pagination};
pub use report::ReportTable;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows per page when the caller doesn't pick a size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest quantity accepted on a single purchase or sale.
///
/// ## Business Reason
/// Catches a slipped keystroke (an extra row of zeros) before it lands in
/// the stock figures.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Longest item or category name.
pub const MAX_NAME_LEN: usize = 200;

/// Longest unit label ("kg", "pcs", "boxes").
pub const MAX_UNIT_LEN: usize = 20;

/// Closing stock above this is healthy; 1 up to this is low.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Shown in place of the name when a sale or purchase points at a
/// missing item.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Shown in place of the name for a missing category.
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";
