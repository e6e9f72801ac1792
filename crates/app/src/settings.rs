//! Runtime configuration.
//!
//! Values come from an optional `rachafacil.toml` next to the binary plus
//! `RACHAFACIL__`-prefixed environment overrides.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for the env filter (e.g. "info", "debug").
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 3000i64)?
            .set_default("server.database", "memory")?
            .add_source(File::with_name("rachafacil").required(false))
            .add_source(Environment::with_prefix("RACHAFACIL").separator("__"))
            .build()?
            .try_deserialize()
    }
}
