use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow the configured level; everything else logs warnings only.
const LETTER_TARGETS: &[&str] = &["hoa_letters", "hoa_letters_cli"];

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    EnvFilter { value: String, source: ParseError },
    #[error("failed to install subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Expands a bare level such as `debug` into directives scoped to the letter crates.
///
/// Values that already carry directives (`csv=trace,info`) are used as given.
pub fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let mut directives = vec!["warn".to_string()];
    directives.extend(LETTER_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

fn build_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let directives = filter_directives(log_level);
    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter {
        value: directives,
        source,
    })
}

/// Installs the global stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_levels_are_scoped_to_letter_crates() {
        assert_eq!(
            filter_directives(" debug "),
            "warn,hoa_letters=debug,hoa_letters_cli=debug"
        );
    }

    #[test]
    fn explicit_directives_pass_through() {
        assert_eq!(filter_directives("csv=trace,info"), "csv=trace,info");
    }

    #[test]
    fn unparseable_levels_are_reported() {
        let error = build_filter("loud").expect_err("invalid level");
        assert!(matches!(error, TelemetryError::EnvFilter { .. }));
        assert!(error.to_string().contains("hoa_letters=loud"));
    }
}
