use crate::errors::AppError;
use crate::models::AppData;
use crate::progression::TierTable;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Loads the tier table from `path`, or the built-in one when unset.
/// A file that fails validation is an error rather than a silent fallback.
pub async fn load_tiers(
    path: Option<&Path>,
) -> Result<TierTable, Box<dyn std::error::Error + Send + Sync>> {
    let Some(path) = path else {
        return Ok(TierTable::standard()?);
    };

    let bytes = fs::read(path).await?;
    let tiers = TierTable::from_json(&bytes)?;
    info!(
        "loaded {} tiers from {}",
        tiers.tiers().len(),
        path.display()
    );
    Ok(tiers)
}
