//! # Storage Command Line
//!
//! Runs the alert scheduler or one maintenance operation against the
//! configured store.
//!
//! ```text
//! storage [--db <path>] [--config <path>] <command>
//!
//!   serve                     run periodic alert checks until Ctrl-C
//!   export <file>             write the export document
//!   import <file>             import the collections in a document
//!   restore <file>            replace everything with a backup
//!   check-alerts              run one stock scan
//!   notifications [category]  print the notification log
//!   receipt <sale-id>         print a sale receipt
//!   clear-data                empty every collection
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use storage_app::commands::{alerts, backup, sale};
use storage_app::{init_tracing, ApiError, AppConfig, AppContext};
use storage_core::NotificationCategory;

#[derive(Parser)]
#[command(name = "storage")]
#[command(about = "Storage inventory: alerts, backups and receipts")]
#[command(version)]
struct Cli {
    /// SQLite database file (overrides config and STORAGE_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Config file (default: platform config dir / storage.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the periodic alert check until Ctrl-C
    Serve,

    /// Write every collection to a JSON file
    Export { file: PathBuf },

    /// Import the collections present in a JSON file
    Import { file: PathBuf },

    /// Replace the whole store with a backup file
    Restore { file: PathBuf },

    /// Run one stock scan and print the counts
    CheckAlerts,

    /// Print the notification log, newest first
    Notifications {
        /// info, success, warning or error
        category: Option<String>,
    },

    /// Print the receipt of a stored sale
    Receipt { sale_id: i64 },

    /// Delete every record (settings are kept)
    ClearData,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let mut config = match AppConfig::load(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }

    let mut ctx = match AppContext::new(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error opening store: {}", e);
            process::exit(1);
        }
    };

    let result = run(&mut ctx, cli.command).await;
    ctx.shutdown().await;

    if let Err(e) = result {
        error!(code = ?e.code, "Command failed: {}", e.message);
        eprintln!("Error: {}", e.message);
        process::exit(1);
    }
}

async fn run(ctx: &mut AppContext, command: Commands) -> Result<(), ApiError> {
    match command {
        Commands::Serve => serve(ctx).await,
        Commands::Export { file } => {
            let records = backup::export_to_file(ctx, &file).await?;
            println!("Exported {} records to {}", records, file.display());
            Ok(())
        }
        Commands::Import { file } => {
            let report = backup::import_from_file(ctx, &file).await?;
            println!(
                "Imported {} records into {} collection(s)",
                report.records,
                report.imported.len()
            );
            Ok(())
        }
        Commands::Restore { file } => {
            let report = backup::restore_from_file(ctx, &file).await?;
            println!("Restored {} records", report.records);
            Ok(())
        }
        Commands::CheckAlerts => {
            let status = alerts::check_alerts(ctx).await?;
            println!(
                "Low stock: {}, out of stock: {}, notifications: {}",
                status.low_stock_count, status.out_of_stock_count, status.notification_count
            );
            Ok(())
        }
        Commands::Notifications { category } => {
            let category = category
                .map(|c| c.parse::<NotificationCategory>())
                .transpose()
                .map_err(ApiError::validation)?;
            for n in alerts::get_notifications(ctx, category).await {
                println!(
                    "{}  [{}] {}: {}",
                    n.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    n.category,
                    n.title,
                    n.message
                );
            }
            Ok(())
        }
        Commands::Receipt { sale_id } => {
            println!("{}", sale::receipt_text(ctx, sale_id).await?);
            Ok(())
        }
        Commands::ClearData => {
            backup::clear_all_data(ctx).await?;
            println!("All data cleared");
            Ok(())
        }
    }
}

async fn serve(ctx: &mut AppContext) -> Result<(), ApiError> {
    if !ctx.start_scheduler()? {
        info!("Background alerts disabled; running one check");
        alerts::check_alerts(ctx).await?;
        return Ok(());
    }

    info!(
        interval_secs = ctx.config().alerts.check_interval_secs,
        "Serving; press Ctrl-C to stop"
    );
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received");
    Ok(())
}
