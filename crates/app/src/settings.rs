//! Handles settings for the application.
//!
//! Values are read from an optional `settings.toml` in the working directory
//! and overridden by `GASTOS__*` environment variables, e.g.
//! `GASTOS__SERVER__PORT=8080`.
//!
//! ```toml
//! [app]
//! level = "debug"
//!
//! [server]
//! bind = "0.0.0.0"
//! port = 3000
//! database = { sqlite = "gastos.db" }   # or "memory"
//!
//! [[budgets.defaults]]
//! category = "Comida"
//! amount_minor = 40000
//! ```

use config::{Config, ConfigError, Environment, File};
use engine::{Category, CategoryBudget, ResultEngine};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: default_port(),
            database: Database::default(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

impl Server {
    pub fn address(&self) -> String {
        let bind = self.bind.as_deref().unwrap_or("127.0.0.1");
        format!("{bind}:{}", self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct BudgetDefault {
    pub category: String,
    pub amount_minor: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct Budgets {
    #[serde(default)]
    pub defaults: Vec<BudgetDefault>,
}

impl Budgets {
    /// Parse the configured defaults into engine budgets.
    pub fn category_budgets(&self) -> ResultEngine<Vec<CategoryBudget>> {
        self.defaults
            .iter()
            .map(|entry| {
                CategoryBudget::new(
                    Category::try_from(entry.category.as_str())?,
                    entry.amount_minor,
                )
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub budgets: Budgets,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("GASTOS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
