//! The `omniverse.yaml` configuration: one singularity section and one
//! manifest per alterverse.

use omniverse_core::{CheckFinding, Manifest, SingularityConfig, checker};
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub singularity: SingularityConfig,
    #[serde(default)]
    pub alterverses: BTreeMap<String, Manifest>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("error while reading config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("error while parsing config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("alterverse definitions for '{name}' not found")]
    UnknownAlterverse { name: String },
}

impl Config {
    /// Read and parse the config file, then validate that the placeholder
    /// render rule and the extraction expression are true inverses over every
    /// alterverse. Parse failures are fatal; validation findings are returned
    /// in full so the operator can fix the configuration in one pass.
    pub fn load(path: &str) -> Result<(Self, Vec<CheckFinding>), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.to_string(),
            message: err.to_string(),
        })?;

        let findings =
            checker::expression_template_bijection(&config.singularity, &config.alterverses);
        Ok((config, findings))
    }

    pub fn alterverse(&self, name: &str) -> Result<&Manifest, ConfigError> {
        self.alterverses
            .get(name)
            .ok_or_else(|| ConfigError::UnknownAlterverse {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_with_alterverses() {
        let raw = r#"
singularity:
  expression: '\{\{\s*([a-zA-Z0-9_]+)\s*\}\}'
  expression_template: '{{ {key} }}'
alterverses:
  production:
    url: example.com
    env: production
  integration:
    url: example-int.com
    env: integration
"#;
        let config: Config = serde_yaml::from_str(raw).expect("config should parse");
        assert_eq!(config.alterverses.len(), 2);
        assert_eq!(
            config.alterverse("production").unwrap().get("url"),
            Some("example.com")
        );
        assert!(config.alterverse("staging").is_err());
    }
}
