//! # Stock Overview
//!
//! Purchased, sold and closing quantity per item, one page at a time.

use tracing::debug;

use crate::error::ApiError;
use crate::state::DataState;
use stockbook_core::{stock_summary, Page, Pagination, StockRow};

/// One page of the stock table. Out-of-range pages come back empty.
pub async fn stock_overview(
    data: &DataState,
    pagination: Pagination,
) -> Result<Page<StockRow>, ApiError> {
    let snapshot = data.read().await;
    let rows = stock_summary(&snapshot.items, &snapshot.purchases, &snapshot.sales);

    debug!(
        items = rows.len(),
        page = pagination.current_page(),
        "stock_overview command"
    );
    Ok(pagination.page_of(&rows))
}
