//! finstocks-seed: print the schema and load synthetic market data.

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use finstocks_api::connect;
use finstocks_api::store::schema::{POSTGRES_SCHEMA, SQLITE_SCHEMA};
use finstocks_common::{init_logging, Config};
use finstocks_seed::{tasks, Loader, StockOptions};

#[derive(Parser, Debug)]
#[command(name = "finstocks-seed")]
#[command(version)]
#[command(about = "Create the FinStocks schema and load synthetic market data", long_about = None)]
struct Cli {
    /// RNG seed for reproducible data (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Dialect {
    Sqlite,
    Postgres,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the table definitions
    Schema {
        /// SQL dialect. Postgres includes the functions the hosted backend calls
        #[arg(long, value_enum, default_value_t = Dialect::Postgres)]
        dialect: Dialect,
    },

    /// Insert a handful of stocks, sectors, prices and fundamentals
    Sample,

    /// Insert the full stock universe with prices, fundamentals and indicators
    Stocks {
        /// Days of daily prices per stock
        #[arg(long, default_value_t = 730)]
        days: u32,

        /// Days of technical indicators
        #[arg(long, default_value_t = 90)]
        technical_days: u32,

        /// Clear stock tables first
        #[arg(long)]
        reset: bool,
    },

    /// Insert the ETF list and daily ETF prices
    Etfs {
        /// Days of daily prices per ETF
        #[arg(long, default_value_t = 730)]
        days: u32,
    },

    /// Insert ETF holdings for the stocks and ETFs already loaded
    Holdings,

    /// Delete all rows from every table
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Schema { dialect } = cli.command {
        let ddl = match dialect {
            Dialect::Sqlite => SQLITE_SCHEMA,
            Dialect::Postgres => POSTGRES_SCHEMA,
        };
        println!("{}", ddl.trim());
        return Ok(());
    }

    let config = Config::load_with_env()?;
    init_logging(&config.observability);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e);
    }

    let store = connect(&config.database)?;
    info!(backend = store.backend(), "Connected to database");
    let loader = Loader::new(store);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = Local::now().date_naive();

    let report = match cli.command {
        Commands::Schema { .. } => unreachable!(),
        Commands::Sample => tasks::seed_sample(&loader).await,
        Commands::Stocks {
            days,
            technical_days,
            reset,
        } => {
            let options = StockOptions {
                days,
                technical_days,
                reset,
            };
            tasks::seed_stocks(&loader, &mut rng, options, today).await
        }
        Commands::Etfs { days } => tasks::seed_etfs(&loader, &mut rng, days, today).await,
        Commands::Holdings => tasks::seed_holdings(&loader, &mut rng).await?,
        Commands::Reset => {
            let failures = tasks::reset(&loader).await;
            if failures > 0 {
                bail!("{} tables could not be cleared", failures);
            }
            info!("All tables cleared");
            return Ok(());
        }
    };

    info!("Done: {}", report);
    if report.failed_batches > 0 {
        bail!("{} batches failed to load", report.failed_batches);
    }
    Ok(())
}
