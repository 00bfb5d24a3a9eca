use crate::models::AppData;
use crate::progression::TierTable;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub tiers: Arc<TierTable>,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, tiers: TierTable, data: AppData) -> Self {
        Self {
            data_path,
            tiers: Arc::new(tiers),
            data: Arc::new(Mutex::new(data)),
        }
    }
}
