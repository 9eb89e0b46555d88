#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the Salvador memorial services.
//!
//! ```text
//! memorial stats [--csv data/mortes_violentas_estado.csv] [--year 2024]
//! memorial seed [--db data/victims.duckdb]
//! memorial victims [--db data/victims.duckdb] [--all]
//! memorial serve [--bind 0.0.0.0] [--port 8080]
//! memorial lights [--total 161] [--seed 7]
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use memorial_geography::{FALLBACK_TOTAL_HOMICIDES, neighborhood_stats, scatter_victim_lights};
use memorial_server::ServerConfig;
use memorial_server::config::{DEFAULT_VICTIMS_DB_PATH, DEFAULT_VIOLENCE_CSV_PATH};
use memorial_victims::VictimStore;
use memorial_violence::{StatsOptions, load_report, report::DEFAULT_MUNICIPALITY};
use rand::{RngCore, SeedableRng, rngs::StdRng};

#[derive(Parser)]
#[command(name = "memorial", about = "Salvador violent-death statistics and memorial")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statistics report for a CSV export as JSON
    Stats {
        /// SSP-BA violent-death CSV
        #[arg(long, default_value = DEFAULT_VIOLENCE_CSV_PATH)]
        csv: PathBuf,
        /// Municipality to keep (exact match)
        #[arg(long, default_value = DEFAULT_MUNICIPALITY)]
        municipality: String,
        /// Year treated as current (defaults to the latest year in the data)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Seed the victim database if it is empty
    Seed {
        /// `DuckDB` database file
        #[arg(long, default_value = DEFAULT_VICTIMS_DB_PATH)]
        db: PathBuf,
    },
    /// List tributes, newest first
    Victims {
        /// `DuckDB` database file
        #[arg(long, default_value = DEFAULT_VICTIMS_DB_PATH)]
        db: PathBuf,
        /// Include tributes awaiting approval
        #[arg(long)]
        all: bool,
    },
    /// Start the API server (environment variables apply; flags override)
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print neighborhood stats and victim lights as JSON
    Lights {
        /// City-wide homicide total
        #[arg(long, default_value_t = FALLBACK_TOTAL_HOMICIDES)]
        total: u64,
        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats {
            csv,
            municipality,
            year,
        } => {
            let options = StatsOptions {
                municipality,
                reference_year: year,
                ..StatsOptions::default()
            };
            let report = load_report(&csv, &options)?;
            log::info!(
                "{} lines read, {} dropped, {} records matched",
                report.ingest.lines_read,
                report.ingest.lines_dropped,
                report.ingest.records_matched
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Seed { db } => {
            let store = VictimStore::open(&db)?;
            let seeded = store.seed_if_empty()?;
            if seeded == 0 {
                println!("Database already has {} tribute(s); nothing seeded.", store.count()?);
            } else {
                println!("Seeded {seeded} tribute(s) into {}", db.display());
            }
        }
        Commands::Victims { db, all } => {
            let store = VictimStore::open(&db)?;
            let victims = if all {
                store.list_all()?
            } else {
                store.list_approved()?
            };

            if victims.is_empty() {
                println!("No tributes found.");
                return Ok(());
            }

            println!("{:<38} {:<10} {:<9} {:<24} NAME", "ID", "DATE", "APPROVED", "NEIGHBORHOOD");
            println!("{}", "-".repeat(100));
            for victim in &victims {
                println!(
                    "{:<38} {:<10} {:<9} {:<24} {}",
                    victim.id,
                    victim.date,
                    if victim.is_approved { "yes" } else { "no" },
                    victim.neighborhood,
                    victim.name
                );
            }
            println!("\n{} tribute(s)", victims.len());
        }
        Commands::Serve { bind, port } => {
            let mut config = ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            memorial_server::run_server(config).await?;
        }
        Commands::Lights { total, seed } => {
            let stats = neighborhood_stats(total, &[]);
            let mut rng: Box<dyn RngCore> = match seed {
                Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
                None => Box::new(rand::thread_rng()),
            };
            let lights = scatter_victim_lights(&stats, rng.as_mut());
            let output = serde_json::json!({
                "totalHomicides": total,
                "neighborhoods": stats,
                "lights": lights,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
