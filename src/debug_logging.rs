//! Debug logging configuration shared across binaries.

use bevy::log::{Level, LogPlugin};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEBUG_LOG_SETTINGS_FILE: &str = "config/debug_logging.json";

/// Base filter: quiet engine crates, tutorial at info
const BASE_FILTER: &str = "wgpu=error,naga=warn,bevy_render=warn,bevy_app=warn";

#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct DebugLogConfig {
    /// Log every tutorial event and timer at debug level
    pub enabled: bool,
    /// Extra `target=level` directives appended to the filter
    pub extra_filter: Option<String>,
}

impl Default for DebugLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            extra_filter: None,
        }
    }
}

impl DebugLogConfig {
    pub fn load() -> Self {
        let path = Path::new(DEBUG_LOG_SETTINGS_FILE);
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn enabled_from_args(args: &[String]) -> bool {
        args.iter().any(|arg| arg == "--debug-log")
    }

    pub fn load_with_args(args: &[String]) -> Self {
        let mut config = Self::load();
        if Self::enabled_from_args(args) {
            config.enabled = true;
        }
        config
    }

    /// `EnvFilter` directives for the log plugin
    pub fn filter(&self) -> String {
        let crate_level = if self.enabled { "debug" } else { "info" };
        let mut filter = format!("{},arena_tutorial={}", BASE_FILTER, crate_level);
        if let Some(extra) = self.extra_filter.as_deref().filter(|s| !s.trim().is_empty()) {
            filter.push(',');
            filter.push_str(extra.trim());
        }
        filter
    }

    pub fn log_plugin(&self) -> LogPlugin {
        LogPlugin {
            level: if self.enabled { Level::DEBUG } else { Level::INFO },
            filter: self.filter(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_levels() {
        let quiet = DebugLogConfig::default();
        assert!(quiet.filter().ends_with("arena_tutorial=info"));

        let args: Vec<String> = vec!["tutorial-demo".into(), "--debug-log".into()];
        assert!(DebugLogConfig::enabled_from_args(&args));

        let verbose = DebugLogConfig {
            enabled: true,
            extra_filter: Some(" bevy_ui=debug ".into()),
        };
        assert!(verbose.filter().contains("arena_tutorial=debug"));
        assert!(verbose.filter().ends_with(",bevy_ui=debug"));
        assert_eq!(verbose.log_plugin().level, Level::DEBUG);
    }
}
