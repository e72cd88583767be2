use rust_decimal::Decimal;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for a letter run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub paths: PathsConfig,
    pub letters: LettersConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("HOA_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_dir = PathBuf::from(env::var("HOA_BASE_DIR").unwrap_or_else(|_| ".".to_string()));
        let mut paths = PathsConfig::rooted_at(base_dir);
        if let Ok(contacts) = env::var("HOA_CONTACTS_PATH") {
            paths.contacts_path = PathBuf::from(contacts);
        }
        if let Ok(output) = env::var("HOA_OUTPUT_DIR") {
            paths.output_dir = PathBuf::from(output);
        }
        if let Ok(template) = env::var("HOA_TEMPLATE_LETTER1") {
            paths.letter1_template = PathBuf::from(template);
        }
        if let Ok(template) = env::var("HOA_TEMPLATE_LETTER2") {
            paths.letter2_template = PathBuf::from(template);
        }

        let minimum_balance = match env::var("HOA_MIN_BALANCE") {
            Ok(raw) => parse_minimum_balance(&raw)?,
            Err(_) => LettersConfig::default().minimum_balance,
        };

        let log_level = env::var("HOA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            paths,
            letters: LettersConfig { minimum_balance },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_minimum_balance(raw: &str) -> Result<Decimal, ConfigError> {
    let cleaned = raw.trim().replace(['$', ','], "");
    Decimal::from_str(&cleaned).map_err(|_| ConfigError::InvalidMinimumBalance {
        value: raw.to_string(),
    })
}

/// Filesystem locations consumed around the letter pipeline.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Folder scanned for `converted*.csv` ledger exports.
    pub base_dir: PathBuf,
    pub contacts_path: PathBuf,
    pub output_dir: PathBuf,
    pub letter1_template: PathBuf,
    pub letter2_template: PathBuf,
}

impl PathsConfig {
    pub fn rooted_at(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            contacts_path: base_dir.join("emails.csv"),
            output_dir: base_dir.join("output"),
            letter1_template: base_dir.join("template").join("Letter 1.docx"),
            letter2_template: base_dir.join("template").join("Letter 2.docx"),
            base_dir,
        }
    }
}

/// Business thresholds applied by the ledger filter.
#[derive(Debug, Clone)]
pub struct LettersConfig {
    pub minimum_balance: Decimal,
}

impl Default for LettersConfig {
    fn default() -> Self {
        Self {
            minimum_balance: Decimal::new(1000, 2),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidMinimumBalance { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMinimumBalance { value } => {
                write!(f, "HOA_MIN_BALANCE must be a decimal amount, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
