pub mod app;
pub mod challenges;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod level_up;
pub mod models;
pub mod progression;
pub mod rewards;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use level_up::{LevelUpDetector, LevelUpOutcome, Notification, PriorXp, PriorXpStore};
pub use progression::{Progress, ProgressSnapshot, Tier, TierTable, TierTableError};
pub use state::AppState;
pub use storage::{load_data, load_tiers};
