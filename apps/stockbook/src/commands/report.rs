//! # Report Commands
//!
//! Build the export tables. Rendering (text, PDF, spreadsheet) belongs to
//! the caller; a [`ReportTable`] is title, headers, string rows and footer.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::commands::parse_optional_date;
use crate::error::ApiError;
use crate::state::DataState;
use stockbook_core::report::{sales_report as build_sales_report, stock_overview_report};
use stockbook_core::ReportTable;

/// Stock overview for every item.
pub async fn stock_report(
    data: &DataState,
    generated_on: NaiveDate,
) -> Result<ReportTable, ApiError> {
    let snapshot = data.read().await;
    let table = stock_overview_report(
        &snapshot.items,
        &snapshot.purchases,
        &snapshot.sales,
        generated_on,
    );

    info!(rows = table.rows.len(), "Stock report built");
    Ok(table)
}

/// Sales report for `[from, to]`. With either bound missing every sale is
/// included.
pub async fn sales_report(
    data: &DataState,
    from: Option<&str>,
    to: Option<&str>,
    generated_on: NaiveDate,
) -> Result<ReportTable, ApiError> {
    let from = parse_optional_date("from", from)?;
    let to = parse_optional_date("to", to)?;
    debug!(?from, ?to, "sales_report command");

    let snapshot = data.read().await;
    let table = build_sales_report(&snapshot.sales, &snapshot.items, from, to, generated_on)?;

    info!(rows = table.rows.len(), "Sales report built");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::purchase::{record_purchase, RecordPurchaseInput};
    use crate::commands::sale::{record_sale, RecordSaleInput};
    use crate::commands::test_support::setup;
    use crate::error::ErrorCode;
    use crate::state::DbState;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    async fn seed(db: &DbState, data: &DataState) {
        let dal = record_purchase(
            db,
            data,
            RecordPurchaseInput {
                new_category: Some("Pulses".into()),
                new_item: Some("Lentils".into()),
                unit: Some("kg".into()),
                purchase_qty: 40,
                purchase_date: "2024-02-01".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        for (qty, date) in [(5, "2024-02-03"), (2, "2024-02-28")] {
            record_sale(
                db,
                data,
                RecordSaleInput {
                    item_id: dal.item_id.clone(),
                    quantity: qty,
                    date: date.into(),
                },
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_stock_report_rows() {
        let (db, data) = setup().await;
        seed(&db, &data).await;

        let table = stock_report(&data, today()).await.unwrap();
        assert_eq!(table.headers.len(), 4);
        assert_eq!(table.rows, vec![vec!["Lentils", "40 kg", "7 kg", "33 kg"]]);
        assert_eq!(table.footer, vec!["Generated on: 2024-03-01"]);
    }

    #[tokio::test]
    async fn test_sales_report_range() {
        let (db, data) = setup().await;
        seed(&db, &data).await;

        let table = sales_report(&data, Some("2024-02-10"), Some("2024-02-28"), today())
            .await
            .unwrap();
        assert_eq!(table.rows, vec![vec!["2024-02-28", "Lentils", "2 kg"]]);
        assert_eq!(table.footer[0], "Period: 2024-02-10 to 2024-02-28");
        assert_eq!(table.footer[1], "Total quantity: 2");

        let everything = sales_report(&data, None, None, today()).await.unwrap();
        assert_eq!(everything.rows.len(), 2);
        assert_eq!(everything.footer[0], "Total quantity: 7");
    }

    #[tokio::test]
    async fn test_sales_report_rejects_inverted_range() {
        let (_db, data) = setup().await;

        let err = sales_report(&data, Some("2024-02-28"), Some("2024-02-01"), today())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }
}
