use crate::error::{Error, Result};
use dotenvy::dotenv;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Where the PostgreSQL connection comes from: a full `DATABASE_URL`, or the
/// individual `DB_*` variables when no URL is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
    Url(String),
    Parts {
        host: String,
        port: u16,
        name: String,
        user: String,
        password: String,
    },
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        match self {
            DatabaseSettings::Url(url) => PgConnectOptions::from_str(url)
                .map_err(|e| Error::Config(format!("Invalid value for DATABASE_URL: {}", e))),
            DatabaseSettings::Parts {
                host,
                port,
                name,
                user,
                password,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .database(name)
                .username(user)
                .password(password)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database: DatabaseSettings,
    pub auto_migrate: bool,
    pub log_format: LogFormat,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_source(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                    return Err(Error::Config(
                        "Invalid value for DATABASE_URL: expected a postgres:// URL".to_string(),
                    ));
                }
                DatabaseSettings::Url(url)
            }
            None => DatabaseSettings::Parts {
                host: get_or(&lookup, "DB_HOST", "localhost"),
                port: parse_or(&lookup, "DB_PORT", 5432)?,
                name: get_or(&lookup, "DB_NAME", "userservice"),
                user: get_or(&lookup, "DB_USER", "postgres"),
                password: get_or(&lookup, "DB_PASSWORD", ""),
            },
        };

        Ok(Self {
            server_address: get_or(&lookup, "SERVER_ADDRESS", "0.0.0.0:8000"),
            database,
            auto_migrate: parse_bool_or(&lookup, "AUTO_MIGRATE", true)?,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,
        })
    }
}

fn get_or<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).unwrap_or_else(|| default.to_string())
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

fn parse_bool_or<F>(lookup: &F, name: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(raw) => match raw.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(Error::Config(format!(
                "Invalid value for {}: expected true or false",
                name
            ))),
        },
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
