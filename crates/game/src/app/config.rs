use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use station_engine::tools::Emphasis;
use station_engine::{LoopConfig, SenseConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config json: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("parse config json at {path}: {source}")]
    ParseAt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Tunables for the rocket console.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConsoleConfig {
    pub(crate) max_lines: usize,
    pub(crate) boot_time: f32,
    pub(crate) blink_speed: f32,
    pub(crate) system_colour: String,
    pub(crate) launch_time: f32,
    pub(crate) credit_interval: f32,
    pub(crate) check_time: f32,
    pub(crate) countdown_from: u32,
    pub(crate) credits: Vec<String>,
    pub(crate) welcome_emphasis: Emphasis,
    pub(crate) power_off_on_leave: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_lines: 10,
            boot_time: 3.0,
            blink_speed: 0.7,
            system_colour: "green".to_string(),
            launch_time: 10.0,
            credit_interval: 2.0,
            check_time: 2.0,
            countdown_from: 10,
            credits: Vec::new(),
            welcome_emphasis: Emphasis::System,
            power_off_on_leave: false,
        }
    }
}

impl ConsoleConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lines == 0 {
            return Err(invalid("console.max_lines", "must be at least 1"));
        }
        if !(self.blink_speed > 0.0) {
            return Err(invalid("console.blink_speed", "must be positive"));
        }
        if self.system_colour.trim().is_empty() {
            return Err(invalid("console.system_colour", "cannot be empty"));
        }
        for (field, value) in [
            ("console.boot_time", self.boot_time),
            ("console.launch_time", self.launch_time),
            ("console.check_time", self.check_time),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(field, "cannot be negative"));
            }
        }
        if !(self.credit_interval > 0.0) {
            return Err(invalid("console.credit_interval", "must be positive"));
        }
        Ok(())
    }
}

/// Everything the binary reads from the optional config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LaunchpadConfig {
    #[serde(rename = "loop")]
    pub(crate) loop_config: LoopConfig,
    pub(crate) sense: SenseConfig,
    pub(crate) console: ConsoleConfig,
}

impl LaunchpadConfig {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub(crate) fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: Self = match serde_path_to_error::deserialize(&mut deserializer) {
            Ok(config) => config,
            Err(error) => {
                let path = error.path().to_string();
                let source = error.into_inner();
                return if path.is_empty() || path == "." {
                    Err(ConfigError::Parse { source })
                } else {
                    Err(ConfigError::ParseAt { path, source })
                };
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sense.max_range > 0.0) {
            return Err(invalid("sense.max_range", "must be positive"));
        }
        self.console.validate()
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}
