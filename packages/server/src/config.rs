//! Server configuration from environment variables.

use std::path::PathBuf;

use memorial_violence::StatsOptions;

/// Default CSV with the state violent-death statistics.
pub const DEFAULT_VIOLENCE_CSV_PATH: &str = "data/mortes_violentas_estado.csv";

/// Default tribute database.
pub const DEFAULT_VICTIMS_DB_PATH: &str = "data/victims.duckdb";

/// Typed server configuration, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `PORT`
    pub port: u16,
    /// `VIOLENCE_CSV_PATH`
    pub violence_csv_path: PathBuf,
    /// `MEMORIAL_MUNICIPALITY` and `MEMORIAL_REFERENCE_YEAR`.
    pub stats: StatsOptions,
    /// `VICTIMS_DB_PATH`
    pub victims_db_path: PathBuf,
    /// `MEMORIAL_AUTO_APPROVE`: publish submitted tributes immediately.
    pub auto_approve: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            violence_csv_path: PathBuf::from(DEFAULT_VIOLENCE_CSV_PATH),
            stats: StatsOptions::default(),
            victims_db_path: PathBuf::from(DEFAULT_VICTIMS_DB_PATH),
            auto_approve: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ServerConfig {
    /// Reads the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unset or unparsable values
    /// keep their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT").map_or(defaults.port, |p| {
            p.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT {p:?}");
                defaults.port
            })
        });

        let reference_year = lookup("MEMORIAL_REFERENCE_YEAR").and_then(|y| {
            let parsed = y.trim().parse().ok();
            if parsed.is_none() {
                log::warn!("Ignoring invalid MEMORIAL_REFERENCE_YEAR {y:?}");
            }
            parsed
        });

        let auto_approve = lookup("MEMORIAL_AUTO_APPROVE").map_or(defaults.auto_approve, |v| {
            parse_bool(&v).unwrap_or_else(|| {
                log::warn!("Ignoring invalid MEMORIAL_AUTO_APPROVE {v:?}");
                defaults.auto_approve
            })
        });

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            violence_csv_path: lookup("VIOLENCE_CSV_PATH")
                .map_or(defaults.violence_csv_path, PathBuf::from),
            stats: StatsOptions {
                municipality: lookup("MEMORIAL_MUNICIPALITY")
                    .unwrap_or(defaults.stats.municipality),
                reference_year,
                ..defaults.stats
            },
            victims_db_path: lookup("VICTIMS_DB_PATH")
                .map_or(defaults.victims_db_path, PathBuf::from),
            auto_approve,
        }
    }
}
