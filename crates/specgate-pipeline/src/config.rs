//! Gate configuration loading.
//!
//! The YAML file carries policy knobs only. The override token itself is
//! never written in the file; the file names an environment variable and
//! resolution reads the value through an injected lookup function.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use specgate_core::errors::{GateError, GateErrorKind};
use specgate_core::policy::{AggregationMode, PolicyConfig};
use specgate_core_types::Sensitive;
use thiserror::Error;

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl From<ConfigError> for GateError {
    fn from(err: ConfigError) -> Self {
        GateError::new(GateErrorKind::InvalidConfig)
            .with_op("load_config")
            .with_message(err.to_string())
    }
}

fn default_aggregation() -> AggregationMode {
    AggregationMode::Aggregate
}

/// The gate configuration file as written by users.
///
/// Unknown keys are rejected so a typoed knob fails the run instead of
/// silently relaxing the policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfigFile {
    #[serde(default)]
    pub allow_breaking_changes: bool,
    #[serde(default)]
    pub require_override_for_breaking: bool,
    #[serde(default)]
    pub max_breaking_changes: u32,
    /// When non-empty, only HTTP paths under these prefixes are enforced
    #[serde(default)]
    pub public_path_prefixes: BTreeSet<String>,
    /// Operation path prefixes exempt from enforcement
    #[serde(default)]
    pub internal_only_paths: BTreeSet<String>,
    /// Name of the environment variable holding the override token
    #[serde(default)]
    pub override_token_env_var: Option<String>,
    #[serde(default = "default_aggregation")]
    pub aggregation: AggregationMode,
}

impl Default for GateConfigFile {
    fn default() -> Self {
        Self {
            allow_breaking_changes: false,
            require_override_for_breaking: false,
            max_breaking_changes: 0,
            public_path_prefixes: BTreeSet::new(),
            internal_only_paths: BTreeSet::new(),
            override_token_env_var: None,
            aggregation: AggregationMode::Aggregate,
        }
    }
}

impl GateConfigFile {
    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed YAML or unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Resolve into an enforcement config, reading the override token
    /// through `env_lookup`.
    ///
    /// An unset variable means no override was supplied. A set-but-invalid
    /// value is carried through and fails later during enforcement, which
    /// distinguishes "no override" from "broken override".
    pub fn resolve<F>(&self, env_lookup: F) -> PolicyConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let override_token = self
            .override_token_env_var
            .as_deref()
            .and_then(&env_lookup)
            .map(Sensitive::new);

        PolicyConfig {
            allow_breaking: self.allow_breaking_changes,
            require_override: self.require_override_for_breaking,
            max_breaking: self.max_breaking_changes,
            path_exemptions: self.internal_only_paths.clone(),
            public_path_prefixes: self.public_path_prefixes.clone(),
            aggregation: self.aggregation,
            override_token,
        }
    }
}
