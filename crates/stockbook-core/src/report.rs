//! # Report Tables
//!
//! The export boundary. A report is a title, column headers and rows of
//! pre-formatted strings; turning that into a PDF (or anything else) is
//! the renderer's job.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stock Overview Report                                                  │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  Item   │ Purchase Quantity │ Total Sales │ Closing Stock               │
//! │  Rice   │ 80 kg             │ 20 kg       │ 60 kg                       │
//! │  Soap   │ 10                │ 0           │ 10                          │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  Generated on: 2024-02-20                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::aggregation::{item_name, sales_in_range, stock_summary, sum_quantity};
use crate::error::CoreResult;
use crate::types::{Item, Purchase, Sale};
use crate::validation::validate_date_range;

pub const STOCK_REPORT_TITLE: &str = "Stock Overview Report";
pub const SALES_REPORT_TITLE: &str = "Sales Report";

/// Title, headers and string rows handed to an external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
}

impl ReportTable {
    /// Fixed-width plain text, one line per row.
    pub fn render_text(&self) -> String {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };
        let rule = "-".repeat(widths.iter().sum::<usize>() + 3 * columns.saturating_sub(1));

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&line(&self.headers));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        if !self.footer.is_empty() {
            out.push_str(&rule);
            out.push('\n');
            for note in &self.footer {
                out.push_str(note);
                out.push('\n');
            }
        }
        out
    }
}

/// `"60 kg"` with a unit, `"60"` without.
pub fn format_quantity(qty: i64, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{qty} {unit}"),
        None => qty.to_string(),
    }
}

fn generated_on_line(generated_on: NaiveDate) -> String {
    format!("Generated on: {}", generated_on.format("%Y-%m-%d"))
}

/// Purchased, sold and closing stock for every item.
pub fn stock_overview_report(
    items: &[Item],
    purchases: &[Purchase],
    sales: &[Sale],
    generated_on: NaiveDate,
) -> ReportTable {
    let rows = stock_summary(items, purchases, sales)
        .into_iter()
        .map(|row| {
            let unit = row.unit.as_deref();
            vec![
                row.name,
                format_quantity(row.purchased, unit),
                format_quantity(row.sold, unit),
                format_quantity(row.closing, unit),
            ]
        })
        .collect();

    ReportTable {
        title: STOCK_REPORT_TITLE.to_string(),
        headers: ["Item", "Purchase Quantity", "Total Sales", "Closing Stock"]
            .map(String::from)
            .to_vec(),
        rows,
        footer: vec![generated_on_line(generated_on)],
    }
}

/// Sales between `start` and `end`, oldest first, with a quantity total.
///
/// Missing bounds select every sale. An inverted range is rejected.
pub fn sales_report(
    sales: &[Sale],
    items: &[Item],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    generated_on: NaiveDate,
) -> CoreResult<ReportTable> {
    validate_date_range(start, end)?;

    let mut selected = sales_in_range(sales, start, end);
    selected.sort_by_key(|s| s.date);
    let total = sum_quantity(selected.iter().copied());

    let rows = selected
        .iter()
        .map(|sale| {
            let unit = items
                .iter()
                .find(|i| i.id == sale.item_id)
                .and_then(|i| i.unit.as_deref());
            vec![
                sale.date.format("%Y-%m-%d").to_string(),
                item_name(items, &sale.item_id).to_string(),
                format_quantity(sale.quantity, unit),
            ]
        })
        .collect();

    let mut footer = Vec::with_capacity(3);
    if let (Some(start), Some(end)) = (start, end) {
        footer.push(format!("Period: {start} to {end}"));
    }
    footer.push(format!("Total quantity: {total}"));
    footer.push(generated_on_line(generated_on));

    Ok(ReportTable {
        title: SALES_REPORT_TITLE.to_string(),
        headers: ["Date", "Item", "Quantity"].map(String::from).to_vec(),
        rows,
        footer,
    })
}
