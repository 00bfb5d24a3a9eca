use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/log/:action", post(handlers::log_action_form))
        .route("/level-up/ack", post(handlers::ack_level_up_form))
        .route("/api/tiers", get(handlers::get_tiers))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/activity", post(handlers::log_activity))
        .route("/api/xp", post(handlers::grant_xp))
        .route("/api/level-up", get(handlers::get_level_up))
        .route("/api/level-up/ack", post(handlers::ack_level_up))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/challenges", get(handlers::get_challenges))
        .route("/api/challenges/:id/claim", post(handlers::claim_challenge))
        .with_state(state)
}
