//! # Storefront Configuration
//!
//! Configuration loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MARQUEE_API_KEY=...                                                │
//! │     MARQUEE_DB_PATH=/tmp/marquee.db                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/marquee-storefront/storefront.toml (Linux)               │
//! │     ~/Library/Application Support/com.marquee.storefront/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     TMDB v3 API, 60 second payment window, fail_fast pricing           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [catalog]
//! base_url = "https://api.themoviedb.org/3"
//! api_key = "..."
//! image_base_url = "https://image.tmdb.org/t/p/w500"
//! timeout_secs = 10
//!
//! [storage]
//! database_path = "/var/lib/marquee/marquee.db"
//! cart_id = "default"
//!
//! [payment]
//! timeout_secs = 60
//! bank_name = "Blockbuster Bank"
//! account_number = "123-456-7890"
//! account_name = "Blockbuster Movies Co., Ltd."
//! swift_code = "BBMOVTH123"
//!
//! [pricing]
//! price_policy = "fail_fast"  # fail_fast | use_stored_price
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use marquee_catalog::{PricePolicy, TmdbConfig};
use marquee_core::{BankTransferInfo, DEFAULT_CART_ID, DEFAULT_PAYMENT_TIMEOUT_SECS, MAX_ITEM_ID_LENGTH};
use marquee_db::DbConfig;

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Name of the database file inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "marquee.db";

// =============================================================================
// Config Error
// =============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Online mode without an API key.
    #[error("No catalog API key configured (set MARQUEE_API_KEY or [catalog].api_key, or use --offline)")]
    MissingApiKey,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Catalog Settings
// =============================================================================

/// Where movies come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// v3 API key. Never has a default; comes from the file or environment.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Prefix for poster and backdrop paths.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    marquee_catalog::tmdb::DEFAULT_BASE_URL.to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_catalog_timeout() -> u64 {
    10
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            base_url: default_base_url(),
            api_key: None,
            image_base_url: default_image_base_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Key of the persisted cart.
    #[serde(default = "default_cart_id")]
    pub cart_id: String,
}

fn default_cart_id() -> String {
    DEFAULT_CART_ID.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: None,
            cart_id: default_cart_id(),
        }
    }
}

// =============================================================================
// Payment Settings
// =============================================================================

/// Mock payment window and the transfer details shown with the QR code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_payment_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_bank_name")]
    pub bank_name: String,

    #[serde(default = "default_account_number")]
    pub account_number: String,

    #[serde(default = "default_account_name")]
    pub account_name: String,

    #[serde(default = "default_swift_code")]
    pub swift_code: String,
}

fn default_payment_timeout() -> u64 {
    DEFAULT_PAYMENT_TIMEOUT_SECS
}

fn default_bank_name() -> String {
    BankTransferInfo::default().bank_name
}

fn default_account_number() -> String {
    BankTransferInfo::default().account_number
}

fn default_account_name() -> String {
    BankTransferInfo::default().account_name
}

fn default_swift_code() -> String {
    BankTransferInfo::default().swift_code
}

impl Default for PaymentSettings {
    fn default() -> Self {
        let bank = BankTransferInfo::default();
        PaymentSettings {
            timeout_secs: default_payment_timeout(),
            bank_name: bank.bank_name,
            account_number: bank.account_number,
            account_name: bank.account_name,
            swift_code: bank.swift_code,
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingSettings {
    /// What to do when a cart item's price can't be refreshed.
    #[serde(default)]
    pub price_policy: PricePolicy,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub payment: PaymentSettings,

    #[serde(default)]
    pub pricing: PricingSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or `storefront.toml` in the platform
    ///    config directory). An explicit path must exist.
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                info!(?path, "Loading storefront config from file");
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(?path, "Loading storefront config from file");
                    Self::from_file(&path)?
                }
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, url) in [
            ("catalog.base_url", &self.catalog.base_url),
            ("catalog.image_base_url", &self.catalog.image_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "{} must start with http:// or https://, got: {}",
                    name, url
                )));
            }
        }

        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "catalog.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.payment.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "payment.timeout_secs must be greater than 0".into(),
            ));
        }

        let cart_id = self.storage.cart_id.trim();
        if cart_id.is_empty() || cart_id.len() > MAX_ITEM_ID_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "storage.cart_id must be 1 to {} characters",
                MAX_ITEM_ID_LENGTH
            )));
        }

        if let Some(key) = &self.catalog.api_key {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid("catalog.api_key must not be blank".into()));
            }
        }

        Ok(())
    }

    /// Applies `MARQUEE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source. Unparseable values are
    /// logged and ignored.
    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("MARQUEE_API_KEY") {
            debug!("Overriding catalog API key from environment");
            self.catalog.api_key = Some(key);
        }

        if let Some(url) = lookup("MARQUEE_CATALOG_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.base_url = url;
        }

        if let Some(path) = lookup("MARQUEE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(cart_id) = lookup("MARQUEE_CART_ID") {
            self.storage.cart_id = cart_id;
        }

        if let Some(secs) = lookup("MARQUEE_PAYMENT_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.payment.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric MARQUEE_PAYMENT_TIMEOUT_SECS"),
            }
        }

        if let Some(policy) = lookup("MARQUEE_PRICE_POLICY") {
            match policy.parse::<PricePolicy>() {
                Ok(p) => self.pricing.price_policy = p,
                Err(e) => warn!(error = %e, "Ignoring MARQUEE_PRICE_POLICY"),
            }
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "marquee", "storefront")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Derived Settings
    // =========================================================================

    /// The configured database file, or `marquee.db` in the platform data
    /// directory (falling back to the working directory).
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.database_path {
            return path.clone();
        }

        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path())
    }

    /// Builds the TMDB client settings.
    ///
    /// ## Errors
    /// [`ConfigError::MissingApiKey`] when no key was configured.
    pub fn tmdb_config(&self) -> ConfigResult<TmdbConfig> {
        let api_key = self
            .catalog
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(TmdbConfig::new(api_key)
            .base_url(self.catalog.base_url.clone())
            .timeout(Duration::from_secs(self.catalog.timeout_secs)))
    }

    pub fn bank_info(&self) -> BankTransferInfo {
        BankTransferInfo {
            bank_name: self.payment.bank_name.clone(),
            account_number: self.payment.account_number.clone(),
            account_name: self.payment.account_name.clone(),
            swift_code: self.payment.swift_code.clone(),
        }
    }

    pub fn payment_timeout(&self) -> Duration {
        Duration::from_secs(self.payment.timeout_secs)
    }

    pub fn cart_id(&self) -> &str {
        self.storage.cart_id.trim()
    }

    pub fn price_policy(&self) -> PricePolicy {
        self.pricing.price_policy
    }

    /// Full image URL for a poster or backdrop path.
    pub fn image_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.catalog.image_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.catalog.api_key, None);
        assert_eq!(config.payment.timeout_secs, 60);
        assert_eq!(config.cart_id(), "default");
        assert_eq!(config.price_policy(), PricePolicy::FailFast);
        assert_eq!(config.bank_info(), BankTransferInfo::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = StorefrontConfig::from_toml(
            r#"
            [catalog]
            api_key = "abc"

            [payment]
            timeout_secs = 30
            bank_name = "Test Bank"

            [pricing]
            price_policy = "use_stored_price"
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.api_key.as_deref(), Some("abc"));
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(config.payment.timeout_secs, 30);
        assert_eq!(config.bank_info().bank_name, "Test Bank");
        assert_eq!(config.bank_info().swift_code, "BBMOVTH123");
        assert_eq!(config.price_policy(), PricePolicy::UseStoredPrice);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = StorefrontConfig::from_toml("[payment]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = StorefrontConfig::default();
        config.apply_overrides(env(&[
            ("MARQUEE_API_KEY", "from-env"),
            ("MARQUEE_CATALOG_URL", "http://localhost:9000/3"),
            ("MARQUEE_DB_PATH", "/tmp/test.db"),
            ("MARQUEE_CART_ID", "kiosk-2"),
            ("MARQUEE_PAYMENT_TIMEOUT_SECS", "15"),
            ("MARQUEE_PRICE_POLICY", "use-stored-price"),
        ]));

        assert_eq!(config.catalog.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.catalog.base_url, "http://localhost:9000/3");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/test.db"));
        assert_eq!(config.cart_id(), "kiosk-2");
        assert_eq!(config.payment_timeout(), Duration::from_secs(15));
        assert_eq!(config.price_policy(), PricePolicy::UseStoredPrice);
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let mut config = StorefrontConfig::default();
        config.apply_overrides(env(&[
            ("MARQUEE_PAYMENT_TIMEOUT_SECS", "a minute"),
            ("MARQUEE_PRICE_POLICY", "whatever"),
        ]));

        assert_eq!(config.payment.timeout_secs, 60);
        assert_eq!(config.price_policy(), PricePolicy::FailFast);
    }

    #[test]
    fn test_validation() {
        let mut config = StorefrontConfig::default();

        config.catalog.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.catalog.base_url = "http://localhost:8080".to_string();
        assert!(config.validate().is_ok());

        config.payment.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.payment.timeout_secs = 60;
        config.storage.cart_id = "   ".to_string();
        assert!(config.validate().is_err());

        config.storage.cart_id = "default".to_string();
        config.catalog.api_key = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tmdb_config_requires_key() {
        let mut config = StorefrontConfig::default();
        assert!(matches!(config.tmdb_config(), Err(ConfigError::MissingApiKey)));

        config.catalog.api_key = Some("key".to_string());
        config.catalog.timeout_secs = 3;
        let tmdb = config.tmdb_config().unwrap();
        assert_eq!(tmdb.api_key, "key");
        assert_eq!(tmdb.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_image_url() {
        let config = StorefrontConfig::default();
        assert_eq!(
            config.image_url("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"),
            "https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"
        );
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = StorefrontConfig::load(Some(PathBuf::from("/nonexistent/storefront.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
