//! Structured logging init, trimmed down from a full rotating/file-scrubbed
//! setup to stdout-only: no log rotation, no secret scrubbing layer — this
//! engine has no secrets flowing through its logs to begin with.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::LogFormat;

/// Initialize the global `tracing` subscriber from an `EngineConfig`.
/// Call once, near the start of `main`.
pub fn init(level: &str, format: &LogFormat) -> Result<()> {
    let default_level = parse_log_level(level)?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter)
                .with_target(true)
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(env_filter)
                .with_target(true)
                .init();
        }
    }
    Ok(())
}

fn parse_log_level(level: &str) -> Result<Level> {
    level
        .parse::<Level>()
        .map_err(|_| anyhow::anyhow!("invalid log level {level:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(parse_log_level("verbose").is_err());
    }
}
