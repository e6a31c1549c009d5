//! # Stockbook CLI Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook                                        │
//! │                                                                         │
//! │  main.rs ────► parses arguments, loads config, sets up logging         │
//! │                                                                         │
//! │  lib.rs ─────► connect(): database + first snapshot load               │
//! │                                                                         │
//! │  commands/ ──► record_sale, stock_overview, dashboard, sales_report    │
//! │                                                                         │
//! │  state/ ─────► DbState, DataState, ConfigState                         │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  stockbook.db (local file, WAL mode)                             │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Load configuration (defaults → stockbook.toml → STOCKBOOK_* env)
//! 3. Initialize tracing
//! 4. Connect to database, run migrations, load the snapshot
//! 5. Run one command and print the result (text, or JSON with `--json`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use stockbook_lib::commands::{category, dashboard, item, purchase, report, sale, stock};
use stockbook_lib::state::{ConfigState, DataState, DbState};
use stockbook_lib::{connect, init_tracing};
use stockbook_core::{Page, Pagination, ReportTable};

#[derive(Parser)]
#[command(name = "stockbook", about = "Inventory and sales book-keeping", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(long, global = true, help = "Config file; defaults to ./stockbook.toml if present")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Items(ItemsCommands),
    #[command(subcommand)]
    Categories(CategoriesCommands),
    #[command(subcommand)]
    Purchases(PurchasesCommands),
    #[command(subcommand)]
    Sales(SalesCommands),
    /// Purchased, sold and closing stock per item
    Stock(PageArgs),
    /// Headline figures
    Dashboard,
    #[command(subcommand)]
    Report(ReportCommands),
}

#[derive(Subcommand)]
enum ItemsCommands {
    List {
        #[arg(long, help = "Only items in this category")]
        category: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, help = "Category id")]
        category: String,
        #[arg(long, help = "Unit of measure, e.g. kg")]
        unit: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, help = "Unit of measure; an empty value clears it")]
        unit: Option<String>,
    },
}

#[derive(Subcommand)]
enum CategoriesCommands {
    List,
    Add {
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum PurchasesCommands {
    List(PageArgs),
    Add(AddPurchaseArgs),
    Update {
        id: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        item: Option<String>,
        #[arg(long)]
        qty: Option<i64>,
        #[arg(long, help = "YYYY-MM-DD")]
        date: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Args)]
struct AddPurchaseArgs {
    #[arg(long, conflicts_with = "new_category", help = "Existing category id")]
    category: Option<String>,
    #[arg(long, help = "Create this category first")]
    new_category: Option<String>,
    #[arg(long, conflicts_with = "new_item", help = "Existing item id")]
    item: Option<String>,
    #[arg(long, help = "Create this item first")]
    new_item: Option<String>,
    #[arg(long, requires = "new_item", help = "Unit for the new item")]
    unit: Option<String>,
    #[arg(long)]
    qty: i64,
    #[arg(long, help = "YYYY-MM-DD; defaults to today")]
    date: Option<String>,
}

#[derive(Subcommand)]
enum SalesCommands {
    List {
        #[arg(long, help = "YYYY-MM-DD, inclusive")]
        from: Option<String>,
        #[arg(long, help = "YYYY-MM-DD, inclusive")]
        to: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Add {
        #[arg(long, help = "Item id")]
        item: String,
        #[arg(long)]
        qty: i64,
        #[arg(long, help = "YYYY-MM-DD; defaults to today")]
        date: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        item: Option<String>,
        #[arg(long)]
        qty: Option<i64>,
        #[arg(long, help = "YYYY-MM-DD")]
        date: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    Stock,
    Sales {
        #[arg(long, help = "YYYY-MM-DD, inclusive")]
        from: Option<String>,
        #[arg(long, help = "YYYY-MM-DD, inclusive")]
        to: Option<String>,
    },
}

#[derive(Args)]
struct PageArgs {
    #[arg(long, default_value_t = 1, help = "1-indexed page number")]
    page: usize,
    #[arg(long, help = "Rows per page; defaults to the configured page size")]
    page_size: Option<usize>,
}

impl PageArgs {
    fn pagination(&self, config: &ConfigState) -> Pagination {
        Pagination::at(self.page, self.page_size.unwrap_or(config.page_size))
    }
}

struct App {
    config: ConfigState,
    db: DbState,
    data: DataState,
    json: bool,
    today: NaiveDate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigState::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.log_filter);

    let (db, data) = connect(&config)
        .await
        .context("failed to open the stockbook database")?;

    let app = App {
        config,
        db,
        data,
        json: cli.json,
        today: Utc::now().date_naive(),
    };

    run(&app, cli.command).await
}

/// Runs one command. The pool is closed whether or not it succeeds.
async fn run(app: &App, command: Commands) -> Result<()> {
    let result = match command {
        Commands::Items(command) => handle_items_command(app, command).await,
        Commands::Categories(command) => handle_categories_command(app, command).await,
        Commands::Purchases(command) => handle_purchases_command(app, command).await,
        Commands::Sales(command) => handle_sales_command(app, command).await,
        Commands::Stock(args) => handle_stock_command(app, args).await,
        Commands::Dashboard => handle_dashboard_command(app).await,
        Commands::Report(command) => handle_report_command(app, command).await,
    };

    app.db.inner().close().await;
    result
}

impl App {
    /// Prints `value` as JSON under `--json`, otherwise runs the text renderer.
    fn emit<T: Serialize>(&self, value: &T, render: impl FnOnce()) -> Result<()> {
        if self.json {
            print_json(value)
        } else {
            render();
            Ok(())
        }
    }

    fn date_or_today(&self, date: Option<String>) -> String {
        date.unwrap_or_else(|| self.today.format("%Y-%m-%d").to_string())
    }
}

async fn handle_items_command(app: &App, command: ItemsCommands) -> Result<()> {
    match command {
        ItemsCommands::List { category } => {
            let items = item::list_items(&app.data, category.as_deref()).await?;
            app.emit(&items, || items.iter().for_each(render_item))
        }
        ItemsCommands::Add {
            name,
            category,
            unit,
        } => {
            let input = item::CreateItemInput {
                name,
                category_id: category,
                unit,
            };
            let created = item::create_item(&app.db, &app.data, input)
                .await
                .context("failed to add item")?;
            app.emit(&created, || render_item(&created))
        }
        ItemsCommands::Update {
            id,
            name,
            category,
            unit,
        } => {
            let input = item::UpdateItemInput {
                name,
                category_id: category,
                unit,
            };
            let updated = item::update_item(&app.db, &app.data, &id, input)
                .await
                .with_context(|| format!("failed to update item {id}"))?;
            app.emit(&updated, || render_item(&updated))
        }
    }
}

async fn handle_categories_command(app: &App, command: CategoriesCommands) -> Result<()> {
    match command {
        CategoriesCommands::List => {
            let categories = category::list_categories(&app.data).await?;
            app.emit(&categories, || {
                for c in &categories {
                    println!("- {} ({} items) [{}]", c.name, c.item_count, c.id);
                }
            })
        }
        CategoriesCommands::Add { name } => {
            let created = category::create_category(&app.db, &app.data, &name)
                .await
                .context("failed to add category")?;
            app.emit(&created, || println!("Category {} created [{}]", created.name, created.id))
        }
    }
}

async fn handle_purchases_command(app: &App, command: PurchasesCommands) -> Result<()> {
    match command {
        PurchasesCommands::List(args) => {
            let page = purchase::list_purchases(&app.data, args.pagination(&app.config)).await?;
            app.emit(&page, || render_page(&page, purchase_line))
        }
        PurchasesCommands::Add(args) => {
            let input = purchase::RecordPurchaseInput {
                category_id: args.category,
                new_category: args.new_category,
                item_id: args.item,
                new_item: args.new_item,
                unit: args.unit,
                purchase_qty: args.qty,
                purchase_date: app.date_or_today(args.date),
            };
            let recorded = purchase::record_purchase(&app.db, &app.data, input)
                .await
                .context("failed to record purchase")?;
            app.emit(&recorded, || println!("Recorded {}", purchase_line(&recorded)))
        }
        PurchasesCommands::Update {
            id,
            category,
            item,
            qty,
            date,
        } => {
            let input = purchase::UpdatePurchaseInput {
                category_id: category,
                item_id: item,
                purchase_qty: qty,
                purchase_date: date,
            };
            let updated = purchase::update_purchase(&app.db, &app.data, &id, input)
                .await
                .with_context(|| format!("failed to update purchase {id}"))?;
            app.emit(&updated, || println!("Updated {}", purchase_line(&updated)))
        }
        PurchasesCommands::Delete { id } => {
            purchase::delete_purchase(&app.db, &app.data, &id)
                .await
                .with_context(|| format!("failed to delete purchase {id}"))?;
            app.emit(&serde_json::json!({ "deleted": id }), || {
                println!("Purchase {id} deleted")
            })
        }
    }
}

async fn handle_sales_command(app: &App, command: SalesCommands) -> Result<()> {
    match command {
        SalesCommands::List { from, to, page } => {
            let result = sale::list_sales(
                &app.data,
                from.as_deref(),
                to.as_deref(),
                page.pagination(&app.config),
            )
            .await?;
            app.emit(&result, || render_page(&result, sale_line))
        }
        SalesCommands::Add { item, qty, date } => {
            let input = sale::RecordSaleInput {
                item_id: item,
                quantity: qty,
                date: app.date_or_today(date),
            };
            let recorded = sale::record_sale(&app.db, &app.data, input)
                .await
                .context("failed to record sale")?;
            app.emit(&recorded, || println!("Recorded {}", sale_line(&recorded)))
        }
        SalesCommands::Update {
            id,
            item,
            qty,
            date,
        } => {
            let input = sale::UpdateSaleInput {
                item_id: item,
                quantity: qty,
                date,
            };
            let updated = sale::update_sale(&app.db, &app.data, &id, input)
                .await
                .with_context(|| format!("failed to update sale {id}"))?;
            app.emit(&updated, || println!("Updated {}", sale_line(&updated)))
        }
        SalesCommands::Delete { id } => {
            sale::delete_sale(&app.db, &app.data, &id)
                .await
                .with_context(|| format!("failed to delete sale {id}"))?;
            app.emit(&serde_json::json!({ "deleted": id }), || {
                println!("Sale {id} deleted")
            })
        }
    }
}

async fn handle_stock_command(app: &App, args: PageArgs) -> Result<()> {
    let page = stock::stock_overview(&app.data, args.pagination(&app.config)).await?;
    app.emit(&page, || {
        render_page(&page, |r| {
            format!(
                "{:<30} purchased {:>6}  sold {:>6}  closing {:>6}  [{:?}]",
                r.name, r.purchased, r.sold, r.closing, r.level
            )
        })
    })
}

async fn handle_dashboard_command(app: &App) -> Result<()> {
    let dto = dashboard::dashboard(&app.data, app.today).await?;
    app.emit(&dto, || {
        let f = &dto.figures;
        println!("Dashboard for {}", dto.today);
        println!("  Total items:       {}", f.total_items);
        println!("  Sales today:       {}", f.sales_today);
        println!("  Sales this month:  {}", f.sales_this_month);
        println!("  Closing stock:     {}", f.total_closing_stock);
        println!("  Low / out of stock: {} / {}", f.low_stock_items, f.out_of_stock_items);
        if !dto.recent_sales.is_empty() {
            println!("Recent sales:");
            for s in &dto.recent_sales {
                println!("  {} {} x {}", s.date, s.item_name, s.quantity);
            }
        }
    })
}

async fn handle_report_command(app: &App, command: ReportCommands) -> Result<()> {
    let table = match command {
        ReportCommands::Stock => report::stock_report(&app.data, app.today).await?,
        ReportCommands::Sales { from, to } => {
            report::sales_report(&app.data, from.as_deref(), to.as_deref(), app.today).await?
        }
    };
    app.emit(&table, || render_table(&table))
}

// =============================================================================
// Text Rendering
// =============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_page<T>(page: &Page<T>, line: impl Fn(&T) -> String) {
    for row in &page.items {
        println!("{}", line(row));
    }
    println!(
        "Page {} of {} ({} rows)",
        page.current_page,
        page.total_pages.max(1),
        page.total_items
    );
}

fn render_item(i: &item::ItemDto) {
    let unit = i.unit.as_deref().unwrap_or("");
    println!(
        "- {} ({}) • closing {} {} [{:?}] [{}]",
        i.name, i.category_name, i.closing_stock, unit, i.level, i.id
    );
}

fn render_table(table: &ReportTable) {
    print!("{}", table.render_text());
}

fn purchase_line(p: &purchase::PurchaseDto) -> String {
    format!(
        "{} {} / {} + {} {} [{}]",
        p.purchase_date,
        p.category_name,
        p.item_name,
        p.purchase_qty,
        p.unit.as_deref().unwrap_or(""),
        p.id
    )
}

fn sale_line(s: &sale::SaleDto) -> String {
    format!(
        "{} {} - {} {} [{}]",
        s.date,
        s.item_name,
        s.quantity,
        s.unit.as_deref().unwrap_or(""),
        s.id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbook_db::{Database, DbConfig};

    async fn app() -> App {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let data = DataState::new();
        data.reload_all(&db).await.unwrap();

        App {
            config: ConfigState::default(),
            db: DbState::new(db),
            data,
            json: true,
            today: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_run_closes_pool_after_success() {
        let app = app().await;

        run(&app, Commands::Dashboard).await.unwrap();
        assert!(app.db.inner().pool().is_closed());
    }

    #[tokio::test]
    async fn test_run_closes_pool_after_failure() {
        let app = app().await;

        let result = run(
            &app,
            Commands::Sales(SalesCommands::Delete {
                id: "550e8400-e29b-41d4-a716-446655440000".into(),
            }),
        )
        .await;

        assert!(result.is_err());
        assert!(app.db.inner().pool().is_closed());
    }

    #[tokio::test]
    async fn test_stock_command_closes_pool() {
        let app = app().await;

        run(&app, Commands::Stock(PageArgs { page: 1, page_size: None }))
            .await
            .unwrap();
        assert!(app.db.inner().pool().is_closed());
    }
}
