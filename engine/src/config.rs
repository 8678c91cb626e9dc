//! Oracle configuration with TOML file support.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use oracle_quantize::QuantizerConfig;
use oracle_types::OracleParams;

use crate::jury::TieBreakRule;
use crate::policy::{AccessRule, RolePolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Who may create, finalize and vote, and how jury ties resolve.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub tie_break: TieBreakRule,
    pub create: AccessRule,
    pub finalize: AccessRule,
    pub jury: AccessRule,
}

impl PolicyConfig {
    pub fn role_policy(&self) -> RolePolicy {
        RolePolicy {
            create: self.create.clone(),
            finalize: self.finalize.clone(),
            jury: self.jury.clone(),
        }
    }
}

/// Configuration for an oracle instance.
///
/// Can be loaded from a TOML file via [`OracleConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Log output format: `"human"` or `"json"`.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter (e.g. `"info"`, `"debug,oracle_engine=trace"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Lifecycle windows and result bounds.
    #[serde(default)]
    pub params: OracleParams,

    #[serde(default)]
    pub quantizer: QuantizerConfig,

    #[serde(default)]
    pub policy: PolicyConfig,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl OracleConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: OracleParams::default(),
            quantizer: QuantizerConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_quantize::ExtremeValuePolicy;
    use oracle_types::Principal;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = OracleConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = OracleConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = OracleConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.params.dispute_window_secs, 86_400);
        assert_eq!(config.params.voting_window_secs, 86_400);
        assert_eq!(config.quantizer.extremes, ExtremeValuePolicy::Reject);
        assert_eq!(config.policy.tie_break, TieBreakRule::UpholdProposal);
        assert_eq!(config.policy.create, AccessRule::Open);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_level = "debug"

            [params]
            dispute_window_secs = 3600

            [quantizer]
            extremes = "allow"

            [policy]
            tie_break = "reject_proposal"
            finalize = { mode = "restricted", members = ["owner"] }
        "#;
        let config = OracleConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.params.dispute_window_secs, 3600);
        assert_eq!(config.params.voting_window_secs, 86_400);
        assert_eq!(config.quantizer.extremes, ExtremeValuePolicy::Allow);
        assert_eq!(config.quantizer.percent_scale, 10_000);
        assert_eq!(config.policy.tie_break, TieBreakRule::RejectProposal);

        let policy = config.policy.role_policy();
        assert!(policy.finalize.allows(&Principal::new("owner")));
        assert!(!policy.finalize.allows(&Principal::new("eve")));
        assert!(policy.create.allows(&Principal::new("eve")));
    }

    #[test]
    fn restricted_policy_round_trips() {
        let mut config = OracleConfig::default();
        config.policy.jury = AccessRule::restricted(["j1", "j2"]);
        let parsed = OracleConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed.policy.jury, config.policy.jury);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[params]\nvoting_window_secs = 60").unwrap();
        let config = OracleConfig::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.params.voting_window_secs, 60);
    }

    #[test]
    fn missing_file_returns_read_error() {
        let result = OracleConfig::from_toml_file("/nonexistent/oracle.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn unknown_enum_value_is_parse_error() {
        let result = OracleConfig::from_toml_str("[policy]\ntie_break = \"coin_flip\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
