// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment snapshots echoed in prediction responses
//!
//! Both the echo filter and the logging switch use plain substring matching
//! on purpose: `MY_CLUSTER_NAME_2` is echoed and `LOG_PREDICTIONS=NOTRUE`
//! enables logging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Variable names containing any of these are echoed back to callers
pub const ECHOED_NAME_PATTERNS: &[&str] = &["CLUSTER_NAME", "CLOUD_PROVIDER", "VERSION"];

/// Logging is enabled when this variable contains [`LOG_ENABLED_MARKER`]
pub const LOG_PREDICTIONS_VAR: &str = "LOG_PREDICTIONS";

/// Path of the prediction log file
pub const LOG_PREDICTIONS_FILE_VAR: &str = "LOG_PREDICTIONS_FILE";

pub const LOG_ENABLED_MARKER: &str = "TRUE";

/// A snapshot entry, not a live reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

/// Source of environment variables, read once per request
pub trait EnvironmentSource: Send + Sync {
    /// All variables, in the source's enumeration order
    fn vars(&self) -> Vec<(String, String)>;

    fn var(&self, name: &str) -> Option<String> {
        self.vars()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// The live process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentSource for ProcessEnvironment {
    fn vars(&self) -> Vec<(String, String)> {
        // vars_os skips entries that are not valid unicode instead of panicking
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    vars: Vec<(String, String)>,
}

impl StaticEnvironment {
    pub fn new<K, V, I>(vars: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl EnvironmentSource for StaticEnvironment {
    fn vars(&self) -> Vec<(String, String)> {
        self.vars.clone()
    }
}

/// Variables whose name contains one of [`ECHOED_NAME_PATTERNS`], in source order
pub fn filter_environment_variables(source: &dyn EnvironmentSource) -> Vec<EnvironmentVariable> {
    source
        .vars()
        .into_iter()
        .filter(|(name, _)| ECHOED_NAME_PATTERNS.iter().any(|p| name.contains(p)))
        .map(|(name, value)| EnvironmentVariable { name, value })
        .collect()
}

/// Log file to append to, when prediction logging is switched on.
///
/// Unset `LOG_PREDICTIONS` or `LOG_PREDICTIONS_FILE` disables logging.
pub fn prediction_logging_target(source: &dyn EnvironmentSource) -> Option<PathBuf> {
    let flag = source.var(LOG_PREDICTIONS_VAR)?;
    if !flag.contains(LOG_ENABLED_MARKER) {
        return None;
    }
    source
        .var(LOG_PREDICTIONS_FILE_VAR)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}
