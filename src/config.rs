//! Server configuration.
//!
//! Read from a TOML file named by `SCHOOLDESK_CONFIG` (default `schooldesk.toml`), then
//! overridden by environment variables. A missing file is not an error, every key has a default.

use std::env::var;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub email_domain: String,
    pub storage: StorageKind,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub name: Option<String>,
    pub pass: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:9090".into(),
            email_domain: "school.edu".into(),
            storage: StorageKind::Postgres,
            log_level: "info".into(),
            database: DatabaseConfig::default(),
            tls: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            name: None,
            pass: None,
            max_connections: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, String> {
        let path = var("SCHOOLDESK_CONFIG").unwrap_or_else(|_| "schooldesk.toml".into());

        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text).map_err(|e| format!("Invalid config file {path}: {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(format!("Could not read config file {path}: {e}")),
        };

        config.apply_env(|key| var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Environment variables win over the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("SCHOOLDESK_BIND") {
            self.bind = bind;
        }
        if let Some(domain) = lookup("SCHOOLDESK_DOMAIN") {
            self.email_domain = domain;
        }
        if let Some(host) = lookup("PSQL_HOST") {
            self.database.host = host;
        }
        if let Some(name) = lookup("PSQL_NAME") {
            self.database.name = Some(name);
        }
        if let Some(pass) = lookup("PSQL_PASS") {
            self.database.pass = Some(pass);
        }
        self.email_domain = self.email_domain.trim().to_lowercase();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.email_domain.is_empty() || self.email_domain.contains('@') {
            return Err(format!("Invalid email_domain '{}'", self.email_domain));
        }
        self.bind_addr()?;
        self.level()?;

        if self.storage == StorageKind::Postgres {
            if self.database.name.is_none() {
                return Err("Database name missing: set PSQL_NAME or [database] name".into());
            }
            if self.database.pass.is_none() {
                return Err("Database password missing: set PSQL_PASS or [database] pass".into());
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid bind address '{}': {e}", self.bind))
    }

    pub fn level(&self) -> Result<Level, String> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| format!("Invalid log_level '{}'", self.log_level))
    }

    pub fn database_url(&self) -> Option<String> {
        let db = &self.database;
        match (&db.name, &db.pass) {
            (Some(name), Some(pass)) => Some(format!("postgres://{}:{}@{}", name, pass, db.host)),
            _ => None,
        }
    }
}
