use std::{env, fmt::Display, net::IpAddr, str::FromStr, time::Duration};
use tracing::info;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TABLE: &str = "votingapp-restaurants";
pub const DEFAULT_STORE_TIMEOUT_MS: &str = "5000";
pub const DEFAULT_STRESS_FACTOR: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0} must be set when DEVELOPMENT_MODE is false")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub region: String,
    pub table: String,
    pub database_url: Option<String>,
    pub development_mode: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressConfig {
    pub cpu_factor: u32,
    pub mem_factor: u32,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            cpu_factor: 1,
            mem_factor: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreConfig,
    pub stress: StressConfig,
    pub address: IpAddr,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(env_lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            env_lookup(key).or_else(|| legacy_name(key).and_then(|legacy| env_lookup(legacy)))
        };

        let development_mode = lookup("DEVELOPMENT_MODE")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if !development_mode && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let table: String = try_load(&lookup, "VOTES_TABLE", DEFAULT_TABLE)?;
        validate_table_name(&table)?;

        let timeout_ms: u64 = try_load(&lookup, "VOTES_STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?;

        let config = Self {
            store: StoreConfig {
                region: try_load(&lookup, "VOTES_REGION", DEFAULT_REGION)?,
                table,
                database_url,
                development_mode,
                timeout: Duration::from_millis(timeout_ms),
            },
            stress: StressConfig {
                cpu_factor: try_load(&lookup, "CPUSTRESSFACTOR", DEFAULT_STRESS_FACTOR)?,
                mem_factor: try_load(&lookup, "MEMSTRESSFACTOR", DEFAULT_STRESS_FACTOR)?,
            },
            address: try_load(&lookup, "IP", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "8080")?,
        };

        info!("The cpu stress factor is set to: {}", config.stress.cpu_factor);
        info!("The memory stress factor is set to: {}", config.stress.mem_factor);
        Ok(config)
    }
}

fn legacy_name(key: &str) -> Option<&'static str> {
    match key {
        "VOTES_TABLE" => Some("DDB_TABLE_NAME"),
        "VOTES_REGION" => Some("DDB_AWS_REGION"),
        _ => None,
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn validate_table_name(table: &str) -> Result<(), ConfigError> {
    let reason = if table.trim().is_empty() {
        "table name is empty"
    } else if table.contains('"') || table.contains('\0') {
        "table name contains a quote or NUL character"
    } else {
        return Ok(());
    };

    Err(ConfigError::Invalid {
        key: "VOTES_TABLE",
        value: table.to_string(),
        reason: reason.into(),
    })
}
