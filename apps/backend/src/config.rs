//! Environment-driven server configuration

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use mastery_core::DEFAULT_EXAM_DAYS;

/// Which persistence adapter backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown STORE_BACKEND: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub sqlite_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Exam horizon for cram reviews when neither the request nor the
    /// user's settings supply one.
    pub default_exam_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreBackend::Memory,
            database_url: None,
            sqlite_path: PathBuf::from("examprep.db"),
            host: "0.0.0.0".to_string(),
            port: 3000,
            default_exam_days: DEFAULT_EXAM_DAYS,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());

        let store = match lookup("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None if database_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Sqlite,
        };

        if store == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set for the postgres store");
        }

        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("invalid PORT: {port}"))?,
            None => 3000,
        };

        let default_exam_days = match lookup("DEFAULT_EXAM_DAYS") {
            Some(days) => days
                .parse()
                .with_context(|| format!("invalid DEFAULT_EXAM_DAYS: {days}"))?,
            None => DEFAULT_EXAM_DAYS,
        };

        Ok(Self {
            store,
            database_url,
            sqlite_path: lookup("SQLITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("examprep.db")),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            default_exam_days,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
