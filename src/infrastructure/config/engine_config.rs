//! Ambient, process-level configuration: fan-out and timeout defaults, and
//! log level/format. Distinct from the per-run graph configuration consumed
//! by `domain::models::fromdict` — this is about how the *process* behaves,
//! not what it runs.

use serde::{Deserialize, Serialize};

use crate::domain::models::attributes::DEFAULT_FANOUT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default fan-out when no service in the graph sets one.
    pub default_fanout: u32,
    /// Default per-action timeout in seconds, if the graph leaves it unset.
    pub default_timeout: Option<f64>,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_fanout: DEFAULT_FANOUT,
            default_timeout: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_attributes_default_fanout() {
        assert_eq!(EngineConfig::default().default_fanout, DEFAULT_FANOUT);
    }
}
