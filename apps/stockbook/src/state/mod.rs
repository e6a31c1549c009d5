//! # State Module
//!
//! Application state, split by concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────────┐  ┌──────────────────┐      │
//! │  │   DbState    │  │      DataState       │  │   ConfigState    │      │
//! │  │              │  │                      │  │                  │      │
//! │  │  Database    │  │  Arc<RwLock<         │  │  database_path   │      │
//! │  │  (SQLite     │  │    Snapshot          │  │  page_size       │      │
//! │  │   pool)      │  │  >>                  │  │  log_filter      │      │
//! │  └──────────────┘  └──────────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • DataState: RwLock, held only while swapping, never across a query  │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod data;
mod db;

pub use config::ConfigState;
pub use data::{DataState, Snapshot};
pub use db::DbState;
