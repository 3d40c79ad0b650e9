pub mod types;
pub mod error;
pub mod config;
pub mod data;
pub mod location;
pub mod selection;
pub mod aggregate;
pub mod views;
pub mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard API
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Load the dataset and print a summary
    Inspect {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;

            // Load the table once; everything downstream reads it immutably.
            println!("Loading dataset from {:?}...", app_config.input.data_csv);
            let table =
                data::IncidentTable::load(&app_config.input.data_csv, &app_config.input.columns)?;
            println!(
                "Loaded {} incidents across {} regions",
                table.len(),
                table.regions().len()
            );

            server::start_server(app_config, table).await?;
        }
        Commands::Inspect { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;

            println!("Loading dataset from {:?}...", app_config.input.data_csv);
            let table =
                data::IncidentTable::load(&app_config.input.data_csv, &app_config.input.columns)?;

            println!("Rows: {}", table.len());
            match table.year_bounds() {
                Some((lo, hi)) => println!("Years: {} to {}", lo, hi),
                None => println!("Years: (empty table)"),
            }
            for region in table.regions() {
                let countries = table.countries_in(region);
                println!("  {} ({} countries)", region, countries.len());
            }
        }
    }

    Ok(())
}
