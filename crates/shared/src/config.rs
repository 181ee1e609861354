//! Application configuration management.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::types::CurrencyScale;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Outgoing e-mail configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Ledger posting configuration.
    #[serde(default)]
    pub posting: PostingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// SMTP configuration for assignee notification e-mails.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether approval e-mails are sent at all.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Base URL used to build links to pending tasks.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025 // mailpit / mailhog
}

fn default_from_email() -> String {
    "noreply@ledgerflow.local".to_string()
}

fn default_from_name() -> String {
    "Ledgerflow".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            frontend_url: default_frontend_url(),
        }
    }
}

/// Ledger posting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// Decimal places of the currency's minor unit.
    #[serde(default = "default_currency_scale")]
    pub currency_scale: u32,
    /// Fiscal year start month used when a company has none configured.
    #[serde(default = "default_fiscal_year_start_month")]
    pub default_fiscal_year_start_month: u32,
    /// IANA timezone used to determine "today" for undated requests.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Module tables that workflow routing may write a status back to.
    #[serde(default)]
    pub document_tables: Vec<String>,
}

fn default_currency_scale() -> u32 {
    2
}

fn default_fiscal_year_start_month() -> u32 {
    1
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            currency_scale: default_currency_scale(),
            default_fiscal_year_start_month: default_fiscal_year_start_month(),
            timezone: default_timezone(),
            document_tables: Vec::new(),
        }
    }
}

impl PostingConfig {
    /// Rejects settings the ledger schema cannot honour.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if the currency scale exceeds the
    /// precision of the amount columns.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.currency_scale > CurrencyScale::MAX {
            return Err(config::ConfigError::Message(format!(
                "posting.currency_scale = {} exceeds the {} decimal places amounts are stored with",
                self.currency_scale,
                CurrencyScale::MAX
            )));
        }
        Ok(())
    }

    /// Returns the minor-unit scale for posted amounts.
    #[must_use]
    pub const fn scale(&self) -> CurrencyScale {
        CurrencyScale::new(self.currency_scale)
    }

    /// Parses the configured timezone, falling back to UTC when unknown.
    #[must_use]
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    /// Returns today's date in the configured timezone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.tz()).date_naive()
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERFLOW").separator("__"))
            .build()?;

        Self::from_config(config)
    }

    /// Deserializes and validates an already-built configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a section is malformed or fails validation.
    pub fn from_config(config: config::Config) -> Result<Self, config::ConfigError> {
        let app: Self = config.try_deserialize()?;
        app.posting.validate()?;
        Ok(app)
    }
}
