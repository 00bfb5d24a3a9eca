use std::{env, path::PathBuf};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub tiers_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: load_port(),
            data_path: var("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    info!("APP_DATA_PATH not set, using default: {DEFAULT_DATA_PATH}");
                    PathBuf::from(DEFAULT_DATA_PATH)
                }),
            tiers_path: var("APP_TIERS_PATH").map(PathBuf::from),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_port() -> u16 {
    match var("PORT").map(|value| value.parse::<u16>()) {
        Some(Ok(port)) => port,
        Some(Err(err)) => {
            warn!("invalid PORT value ({err}), using default: {DEFAULT_PORT}");
            DEFAULT_PORT
        }
        None => DEFAULT_PORT,
    }
}
