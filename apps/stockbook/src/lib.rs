//! # Stockbook Application Library
//!
//! Everything the dashboard (or the CLI in `main.rs`) calls into: state,
//! commands and the error type they return.
//!
//! ## Module Organization
//! ```text
//! stockbook_lib/
//! ├── lib.rs          ◄─── You are here (startup helpers)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── data.rs     ◄─── Collection snapshot + invalidation
//! │   └── config.rs   ◄─── Layered configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports, shared input parsing
//! │   ├── item.rs     ◄─── Items
//! │   ├── category.rs ◄─── Categories
//! │   ├── purchase.rs ◄─── Purchases (record, edit, delete)
//! │   ├── sale.rs     ◄─── Sales (record, edit, delete)
//! │   ├── stock.rs    ◄─── Paginated stock overview
//! │   ├── dashboard.rs◄─── Headline figures
//! │   └── report.rs   ◄─── Export tables
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐ ┌──────────────────────┐ ┌──────────────────┐    │
//! │  │    DbState       │ │     DataState        │ │   ConfigState    │    │
//! │  │                  │ │                      │ │                  │    │
//! │  │  • Database pool │ │  • items             │ │  • database path │    │
//! │  │  • Repositories  │ │  • categories        │ │  • page size     │    │
//! │  │                  │ │  • purchases, sales  │ │  • log filter    │    │
//! │  └──────────────────┘ └──────────────────────┘ └──────────────────┘    │
//! │                                                                         │
//! │  Reads only touch DataState. Writes go through DbState, then           │
//! │  invalidate the one collection they changed.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{ConfigState, DataState, DbState};
use stockbook_db::{Database, DbConfig};

/// Opens the database and performs the page-load fetch.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. ConfigState::load() ───────────────────────────────────────────────►│
/// │     • defaults → stockbook.toml → STOCKBOOK_* env                      │
/// │                                                                         │
/// │  2. init_tracing(&config.log_filter) ──────────────────────────────────►│
/// │                                                                         │
/// │  3. connect(&config) ← THIS FUNCTION ──────────────────────────────────►│
/// │     • SQLite with WAL mode, pending migrations                         │
/// │     • DataState::reload_all: four collections fetched in parallel      │
/// │                                                                         │
/// │  4. Run a command                                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn connect(config: &ConfigState) -> Result<(DbState, DataState), ApiError> {
    info!(path = %config.database_path, "Opening Stockbook database");

    let db_config =
        DbConfig::new(&config.database_path).max_connections(config.max_connections);
    let db = Database::new(db_config).await?;

    let data = DataState::new();
    data.reload_all(&db).await?;

    info!("State initialized");
    Ok((DbState::new(db), data))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set (e.g. `RUST_LOG=stockbook_db=trace`)
/// - Otherwise `default_filter`, normally `info,stockbook=debug,sqlx=warn`
///
/// Safe to call twice; the second call is a no-op.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Logs go to stderr so `--json` output on stdout stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
