//! # Aggregation Engine
//!
//! Derives stock and sales figures from collections that were already
//! fetched in full. Nothing here holds state or mutates its inputs, and
//! every sum is order-independent.
//!
//! ## Closing Stock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Closing Stock Derivation                             │
//! │                                                                         │
//! │  purchases ──filter(item_id)──► Σ purchase_qty ──┐                     │
//! │                                                   ├──► purchased − sold │
//! │  sales ─────filter(item_id)──► Σ quantity ───────┘                     │
//! │                                                                         │
//! │  No running balance is stored anywhere: the figure is recomputed from  │
//! │  the full collections every time. Negative results are surfaced as-is. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use stockbook_core::aggregation::closing_stock;
//! # use stockbook_core::{Purchase, Sale};
//! # use chrono::Utc;
//! # let p = |item: &str, qty| Purchase { id: String::new(), category_id: String::new(),
//! #     item_id: item.into(), purchase_qty: qty, purchase_date: Utc::now(), created_at: Utc::now() };
//! # let s = |item: &str, qty| Sale { id: String::new(), item_id: item.into(), quantity: qty,
//! #     date: Utc::now(), created_at: Utc::now() };
//! let purchases = vec![p("A", 50), p("A", 30), p("B", 10)];
//! let sales = vec![s("A", 20)];
//!
//! assert_eq!(closing_stock("A", &purchases, &sales), 60);
//! assert_eq!(closing_stock("B", &purchases, &sales), 10);
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Category, Item, Purchase, Sale};
use crate::{LOW_STOCK_THRESHOLD, UNKNOWN_CATEGORY, UNKNOWN_ITEM};

// =============================================================================
// Per-Item Totals
// =============================================================================

/// Total quantity purchased for one item. 0 when nothing matches.
pub fn total_purchase_qty(item_id: &str, purchases: &[Purchase]) -> i64 {
    purchases
        .iter()
        .filter(|p| p.item_id == item_id)
        .map(|p| p.purchase_qty)
        .sum()
}

/// Total quantity sold for one item. 0 when nothing matches.
pub fn total_sold(item_id: &str, sales: &[Sale]) -> i64 {
    sales
        .iter()
        .filter(|s| s.item_id == item_id)
        .map(|s| s.quantity)
        .sum()
}

/// Purchased minus sold. May be negative; never clamped.
pub fn closing_stock(item_id: &str, purchases: &[Purchase], sales: &[Sale]) -> i64 {
    total_purchase_qty(item_id, purchases) - total_sold(item_id, sales)
}

// =============================================================================
// Sales Selection
// =============================================================================

/// Sales whose calendar date lies in `[start, end]`.
///
/// Both bounds are inclusive and compared by calendar day, so a sale at
/// any time on `end` is kept. When either bound is missing every sale is
/// returned, in input order.
pub fn sales_in_range(
    sales: &[Sale],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<&Sale> {
    match (start, end) {
        (Some(start), Some(end)) => sales
            .iter()
            .filter(|s| {
                let day = s.date.date_naive();
                start <= day && day <= end
            })
            .collect(),
        _ => sales.iter().collect(),
    }
}

/// Sales recorded on `day`.
pub fn sales_on_day(sales: &[Sale], day: NaiveDate) -> Vec<&Sale> {
    sales_in_range(sales, Some(day), Some(day))
}

/// Sales recorded in the calendar month containing `day`.
pub fn sales_in_month(sales: &[Sale], day: NaiveDate) -> Vec<&Sale> {
    sales
        .iter()
        .filter(|s| {
            let d = s.date.date_naive();
            d.year() == day.year() && d.month() == day.month()
        })
        .collect()
}

/// Σ quantity over any sequence of sales.
pub fn sum_quantity<'a, I>(sales: I) -> i64
where
    I: IntoIterator<Item = &'a Sale>,
{
    sales.into_iter().map(|s| s.quantity).sum()
}

// =============================================================================
// Lookups
// =============================================================================

/// Item name, or "Unknown Item" for a dangling reference.
pub fn item_name<'a>(items: &'a [Item], item_id: &str) -> &'a str {
    items
        .iter()
        .find(|i| i.id == item_id)
        .map(|i| i.name.as_str())
        .unwrap_or(UNKNOWN_ITEM)
}

/// Category name, or "Unknown Category" for a dangling reference.
pub fn category_name<'a>(categories: &'a [Category], category_id: &str) -> &'a str {
    categories
        .iter()
        .find(|c| c.id == category_id)
        .map(|c| c.name.as_str())
        .unwrap_or(UNKNOWN_CATEGORY)
}

/// Items belonging to one category (the purchase form's item picker).
pub fn items_in_category<'a>(items: &'a [Item], category_id: &str) -> Vec<&'a Item> {
    items.iter().filter(|i| i.category_id == category_id).collect()
}

// =============================================================================
// Stock Level
// =============================================================================

/// Health of a closing-stock figure.
///
/// ```text
///   closing > 10      → Healthy
///   1 ..= 10          → Low
///   closing <= 0      → Out   (negative stock lands here too)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Healthy,
    Low,
    Out,
}

impl StockLevel {
    pub fn classify(closing: i64) -> Self {
        if closing > LOW_STOCK_THRESHOLD {
            StockLevel::Healthy
        } else if closing > 0 {
            StockLevel::Low
        } else {
            StockLevel::Out
        }
    }
}

// =============================================================================
// Stock Summary
// =============================================================================

/// One row of the stock overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub item_id: String,
    pub name: String,
    pub unit: Option<String>,
    pub purchased: i64,
    pub sold: i64,
    pub closing: i64,
    pub level: StockLevel,
}

impl StockRow {
    /// Builds the row for one item.
    pub fn for_item(item: &Item, purchases: &[Purchase], sales: &[Sale]) -> Self {
        let purchased = total_purchase_qty(&item.id, purchases);
        let sold = total_sold(&item.id, sales);
        let closing = purchased - sold;

        StockRow {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit: item.unit.clone(),
            purchased,
            sold,
            closing,
            level: StockLevel::classify(closing),
        }
    }
}

/// Stock rows for every item, in item order.
pub fn stock_summary(items: &[Item], purchases: &[Purchase], sales: &[Sale]) -> Vec<StockRow> {
    items
        .iter()
        .map(|item| StockRow::for_item(item, purchases, sales))
        .collect()
}

// =============================================================================
// Dashboard
// =============================================================================

/// Headline figures for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFigures {
    pub total_items: usize,
    pub sales_today: i64,
    pub sales_this_month: i64,
    pub total_closing_stock: i64,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
}

/// Computes the dashboard figures. `today` is supplied by the caller.
pub fn dashboard_figures(
    items: &[Item],
    purchases: &[Purchase],
    sales: &[Sale],
    today: NaiveDate,
) -> DashboardFigures {
    let rows = stock_summary(items, purchases, sales);
    let count_level = |level: StockLevel| rows.iter().filter(|r| r.level == level).count();

    DashboardFigures {
        total_items: items.len(),
        sales_today: sum_quantity(sales_on_day(sales, today)),
        sales_this_month: sum_quantity(sales_in_month(sales, today)),
        total_closing_stock: rows.iter().map(|r| r.closing).sum(),
        low_stock_items: count_level(StockLevel::Low),
        out_of_stock_items: count_level(StockLevel::Out),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::start_of_day;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn purchase(item_id: &str, qty: i64) -> Purchase {
        let ts = start_of_day(day(2024, 1, 1));
        Purchase {
            id: format!("p-{item_id}-{qty}"),
            category_id: "c".to_string(),
            item_id: item_id.to_string(),
            purchase_qty: qty,
            purchase_date: ts,
            created_at: ts,
        }
    }

    fn sale_on(item_id: &str, qty: i64, date: NaiveDate) -> Sale {
        Sale {
            id: format!("s-{item_id}-{qty}-{date}"),
            item_id: item_id.to_string(),
            quantity: qty,
            date: start_of_day(date),
            created_at: start_of_day(date),
        }
    }

    fn item(id: &str, name: &str, unit: Option<&str>) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            category_id: "c".to_string(),
            unit: unit.map(str::to_string),
            created_at: start_of_day(day(2024, 1, 1)),
        }
    }

    #[test]
    fn test_closing_stock_example() {
        let purchases = vec![purchase("A", 50), purchase("A", 30), purchase("B", 10)];
        let sales = vec![sale_on("A", 20, day(2024, 1, 2))];

        assert_eq!(total_purchase_qty("A", &purchases), 80);
        assert_eq!(total_sold("A", &sales), 20);
        assert_eq!(closing_stock("A", &purchases, &sales), 60);
        assert_eq!(closing_stock("B", &purchases, &sales), 10);
    }

    #[test]
    fn test_totals_are_zero_without_matches() {
        assert_eq!(total_purchase_qty("A", &[]), 0);
        assert_eq!(total_sold("A", &[]), 0);
        assert_eq!(closing_stock("A", &[], &[]), 0);

        let purchases = vec![purchase("B", 5)];
        assert_eq!(total_purchase_qty("A", &purchases), 0);
    }

    #[test]
    fn test_negative_closing_stock_is_surfaced() {
        let sales = vec![sale_on("A", 7, day(2024, 1, 2))];
        let closing = closing_stock("A", &[purchase("A", 2)], &sales);
        assert_eq!(closing, -5);
        assert_eq!(StockLevel::classify(closing), StockLevel::Out);
    }

    #[test]
    fn test_sales_in_range_example() {
        let sales = vec![
            sale_on("A", 1, day(2024, 1, 5)),
            sale_on("A", 4, day(2024, 2, 10)),
            sale_on("B", 6, day(2024, 2, 20)),
        ];

        let feb = sales_in_range(&sales, Some(day(2024, 2, 1)), Some(day(2024, 2, 28)));
        assert_eq!(feb.len(), 2);
        assert!(feb.iter().all(|s| s.date.date_naive().month() == 2));
        assert_eq!(sum_quantity(feb), 10);
    }

    #[test]
    fn test_sales_in_range_bounds_are_inclusive_by_day() {
        let late = Sale {
            date: Utc.with_ymd_and_hms(2024, 2, 28, 23, 59, 0).unwrap(),
            ..sale_on("A", 3, day(2024, 2, 28))
        };
        let sales = vec![sale_on("A", 1, day(2024, 2, 1)), late];

        let picked = sales_in_range(&sales, Some(day(2024, 2, 1)), Some(day(2024, 2, 28)));
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_sales_in_range_without_bounds_returns_all() {
        let sales = vec![
            sale_on("A", 1, day(2024, 1, 5)),
            sale_on("A", 4, day(2024, 2, 10)),
        ];

        let all: Vec<&Sale> = sales.iter().collect();
        assert_eq!(sales_in_range(&sales, None, None), all);
        assert_eq!(sales_in_range(&sales, Some(day(2030, 1, 1)), None), all);
        assert_eq!(sales_in_range(&sales, None, Some(day(2000, 1, 1))), all);
    }

    #[test]
    fn test_today_and_month_selection() {
        let today = day(2024, 2, 20);
        let sales = vec![
            sale_on("A", 2, day(2024, 2, 20)),
            sale_on("A", 3, day(2024, 2, 1)),
            sale_on("A", 5, day(2024, 1, 20)),
            sale_on("A", 7, day(2023, 2, 20)),
        ];

        assert_eq!(sum_quantity(sales_on_day(&sales, today)), 2);
        assert_eq!(sum_quantity(sales_in_month(&sales, today)), 5);
    }

    #[test]
    fn test_stock_level_thresholds() {
        assert_eq!(StockLevel::classify(11), StockLevel::Healthy);
        assert_eq!(StockLevel::classify(10), StockLevel::Low);
        assert_eq!(StockLevel::classify(1), StockLevel::Low);
        assert_eq!(StockLevel::classify(0), StockLevel::Out);
        assert_eq!(StockLevel::classify(-3), StockLevel::Out);
    }

    #[test]
    fn test_lookups_fall_back_to_sentinels() {
        let items = vec![item("A", "Rice", None)];
        assert_eq!(item_name(&items, "A"), "Rice");
        assert_eq!(item_name(&items, "missing"), "Unknown Item");
        assert_eq!(category_name(&[], "c"), "Unknown Category");
    }

    #[test]
    fn test_stock_summary_and_dashboard() {
        let items = vec![item("A", "Rice", Some("kg")), item("B", "Soap", None), item("C", "Tea", None)];
        let purchases = vec![purchase("A", 50), purchase("A", 30), purchase("B", 10)];
        let sales = vec![
            sale_on("A", 20, day(2024, 2, 20)),
            sale_on("B", 4, day(2024, 2, 3)),
        ];

        let rows = stock_summary(&items, &purchases, &sales);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].closing, 60);
        assert_eq!(rows[0].level, StockLevel::Healthy);
        assert_eq!(rows[1].closing, 6);
        assert_eq!(rows[1].level, StockLevel::Low);
        assert_eq!(rows[2].closing, 0);
        assert_eq!(rows[2].level, StockLevel::Out);

        let figures = dashboard_figures(&items, &purchases, &sales, day(2024, 2, 20));
        assert_eq!(
            figures,
            DashboardFigures {
                total_items: 3,
                sales_today: 20,
                sales_this_month: 24,
                total_closing_stock: 66,
                low_stock_items: 1,
                out_of_stock_items: 1,
            }
        );
    }

    fn arb_sales() -> impl Strategy<Value = Vec<Sale>> {
        prop::collection::vec(
            (prop::sample::select(vec!["A", "B", "C"]), 1i64..1000, 1u32..28),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(id, qty, d)| sale_on(id, qty, day(2024, 3, d)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_sums_ignore_order(mut sales in arb_sales(), purchase_qtys in prop::collection::vec(1i64..500, 0..20)) {
            let purchases: Vec<Purchase> = purchase_qtys.iter().map(|q| purchase("A", *q)).collect();
            let before = (
                total_sold("A", &sales),
                sum_quantity(&sales),
                closing_stock("A", &purchases, &sales),
            );

            sales.reverse();
            let mut purchases = purchases;
            purchases.reverse();

            let after = (
                total_sold("A", &sales),
                sum_quantity(&sales),
                closing_stock("A", &purchases, &sales),
            );
            prop_assert_eq!(before, after);
        }

        #[test]
        fn prop_closing_is_purchased_minus_sold(sales in arb_sales(), purchase_qtys in prop::collection::vec(1i64..500, 0..20)) {
            let purchases: Vec<Purchase> = purchase_qtys.iter().map(|q| purchase("B", *q)).collect();
            prop_assert_eq!(
                closing_stock("B", &purchases, &sales),
                total_purchase_qty("B", &purchases) - total_sold("B", &sales)
            );
        }
    }
}
