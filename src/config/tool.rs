use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::exec::BinaryExecutor;
use crate::utils::error::{DoltError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};

/// TOML tool config for the binary: where the dolt binary lives, how long
/// to let it run, and how loud to log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub dolt: DoltBinConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoltBinConfig {
    pub path: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl ToolConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DoltError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| DoltError::parse("tool config", e.to_string()))
    }

    /// Substitute `${VAR_NAME}` placeholders from the environment; unknown
    /// variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// An executor configured per this config.
    pub fn executor(&self) -> BinaryExecutor {
        let mut exec = BinaryExecutor::new();
        if let Some(path) = &self.dolt.path {
            exec = exec.with_dolt_path(path.clone());
        }
        if let Some(secs) = self.dolt.timeout_seconds {
            exec = exec.with_timeout(Duration::from_secs(secs));
        }
        exec
    }

    /// Env-filter directive for the configured log level, when set.
    pub fn log_directive(&self) -> Option<String> {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .map(|level| format!("doltcli={}", level))
    }
}

impl Validate for ToolConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.dolt.path {
            validate_non_empty_string("dolt.path", path)?;
        }
        if let Some(secs) = self.dolt.timeout_seconds {
            validate_positive_number("dolt.timeout_seconds", secs, 1)?;
        }
        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid = ["trace", "debug", "info", "warn", "error"];
            if !valid.contains(&level) {
                return Err(DoltError::InvalidConfigValue {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid.join(", ")),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_tool_config() {
        let toml_content = r#"
[dolt]
path = "/usr/local/bin/dolt"
timeout_seconds = 120

[logging]
level = "debug"
"#;
        let config = ToolConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.dolt.path.as_deref(), Some("/usr/local/bin/dolt"));
        assert_eq!(config.dolt.timeout_seconds, Some(120));
        assert_eq!(config.log_directive().as_deref(), Some("doltcli=debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = ToolConfig::from_toml_str("").unwrap();
        assert_eq!(config.dolt.path, None);
        assert_eq!(config.dolt.timeout_seconds, None);
        assert_eq!(config.log_directive(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_DOLT_BIN", "/opt/dolt/bin/dolt");

        let toml_content = r#"
[dolt]
path = "${TEST_DOLT_BIN}"
"#;
        let config = ToolConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.dolt.path.as_deref(), Some("/opt/dolt/bin/dolt"));

        std::env::remove_var("TEST_DOLT_BIN");
    }

    #[test]
    fn test_unknown_env_var_left_in_place() {
        let toml_content = r#"
[dolt]
path = "${DOLTCLI_SURELY_UNSET_VAR}"
"#;
        let config = ToolConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.dolt.path.as_deref(),
            Some("${DOLTCLI_SURELY_UNSET_VAR}")
        );
    }

    #[test]
    fn test_config_validation() {
        let config = ToolConfig::from_toml_str(
            r#"
[dolt]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = ToolConfig::from_toml_str(
            r#"
[logging]
level = "loud"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let toml_content = r#"
[dolt]
timeout_seconds = 30
"#;
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ToolConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dolt.timeout_seconds, Some(30));
    }
}
