use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config::{AppError, LaunchpadConfig};

const CONSOLE_CONFIG_ENV_VAR: &str = "LAUNCHPAD_CONSOLE_CONFIG";
const DEMO_SECONDS_ENV_VAR: &str = "LAUNCHPAD_DEMO_SECONDS";
const DEFAULT_DEMO_SECONDS: f32 = 40.0;

pub(crate) struct AppWiring {
    pub(crate) config: LaunchpadConfig,
    pub(crate) demo_seconds: f32,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Launchpad Startup ===");

    let config = match config_path_from_env() {
        Some(path) => {
            info!(path = %path.display(), "loading_console_config");
            LaunchpadConfig::load(&path)?
        }
        None => LaunchpadConfig::default(),
    };

    Ok(AppWiring {
        config,
        demo_seconds: parse_demo_seconds(std::env::var(DEMO_SECONDS_ENV_VAR).ok().as_deref()),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONSOLE_CONFIG_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}

fn parse_demo_seconds(raw: Option<&str>) -> f32 {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return DEFAULT_DEMO_SECONDS;
    };
    match raw.parse::<f32>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
        _ => {
            warn!(
                var = DEMO_SECONDS_ENV_VAR,
                value = raw,
                fallback = DEFAULT_DEMO_SECONDS,
                "invalid_demo_seconds"
            );
            DEFAULT_DEMO_SECONDS
        }
    }
}
