//! # Dashboard Command
//!
//! ```text
//! ┌─────────────┬─────────────┬─────────────────┬─────────────────┐
//! │ Total items │ Sales today │ Sales this month│ Closing stock   │
//! │     20      │     14      │      388        │     1,204       │
//! └─────────────┴─────────────┴─────────────────┴─────────────────┘
//!   Low stock: 3   Out of stock: 1
//!   Recent sales: ...
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::sale::SaleDto;
use crate::error::ApiError;
use crate::state::DataState;
use stockbook_core::{dashboard_figures, DashboardFigures, Pagination};

/// Number of sales shown under the headline cards.
const RECENT_SALES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub today: NaiveDate,
    #[serde(flatten)]
    pub figures: DashboardFigures,
    pub recent_sales: Vec<SaleDto>,
}

/// Headline figures as of `today`, plus the latest few sales.
pub async fn dashboard(data: &DataState, today: NaiveDate) -> Result<DashboardDto, ApiError> {
    let figures = {
        let snapshot = data.read().await;
        dashboard_figures(&snapshot.items, &snapshot.purchases, &snapshot.sales, today)
    };

    let recent_sales =
        crate::commands::sale::list_sales(data, None, None, Pagination::new(RECENT_SALES))
            .await?
            .items;

    debug!(?figures, "dashboard command");
    Ok(DashboardDto {
        today,
        figures,
        recent_sales,
    })
}
