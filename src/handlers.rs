use crate::challenges::{self, weekly_challenges};
use crate::errors::AppError;
use crate::models::{
    AckResponse, ActivityRequest, AppData, ChallengesResponse, GrantRequest, PendingLevelUp,
    StatsResponse, XpResponse,
};
use crate::progression::{ProgressSnapshot, Tier, TierTable};
use crate::rewards::Action;
use crate::state::AppState;
use crate::stats::{build_stats, date_key};
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let snapshot = state.tiers.snapshot(data.xp);
    let pending = data
        .level_up
        .pending_level()
        .and_then(|level| state.tiers.get(level));
    Html(render_index(&snapshot, pending))
}

pub async fn get_tiers(State(state): State<AppState>) -> Json<Vec<Tier>> {
    Json(state.tiers.tiers().to_vec())
}

pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressSnapshot> {
    let data = state.data.lock().await;
    Json(state.tiers.snapshot(data.xp))
}

pub async fn log_activity(
    State(state): State<AppState>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<XpResponse>, AppError> {
    let response = apply_action(&state, payload.action, payload.all_habits_done).await?;
    Ok(Json(response))
}

pub async fn log_action_form(
    State(state): State<AppState>,
    Path(action): Path<String>,
) -> Result<Redirect, AppError> {
    let action = action.parse::<Action>().map_err(AppError::bad_request)?;
    apply_action(&state, action, false).await?;
    Ok(Redirect::to("/"))
}

pub async fn grant_xp(
    State(state): State<AppState>,
    Json(payload): Json<GrantRequest>,
) -> Result<Json<XpResponse>, AppError> {
    if payload.amount == 0 {
        return Err(AppError::bad_request("amount must be positive"));
    }

    let mut data = state.data.lock().await;
    let response = credit(&state.tiers, &mut data, payload.amount);
    persist_data(&state.data_path, &data).await?;
    Ok(Json(response))
}

pub async fn get_level_up(State(state): State<AppState>) -> Json<Option<PendingLevelUp>> {
    let data = state.data.lock().await;
    let pending = data.level_up.pending_level().map(|level| PendingLevelUp {
        level,
        tier: state.tiers.get(level).cloned(),
    });
    Json(pending)
}

pub async fn ack_level_up(State(state): State<AppState>) -> Result<Json<AckResponse>, AppError> {
    let level = acknowledge(&state).await?;
    Ok(Json(AckResponse { level }))
}

pub async fn ack_level_up_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    acknowledge(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let data = state.data.lock().await;
    Json(build_stats(&data))
}

pub async fn get_challenges(
    State(state): State<AppState>,
) -> Result<Json<ChallengesResponse>, AppError> {
    let mut data = state.data.lock().await;
    let known_weeks = data.weeks.len();
    let response = {
        let mut rng = rand::thread_rng();
        weekly_challenges(&mut data, today(), &mut rng)
    };
    if data.weeks.len() != known_weeks {
        persist_data(&state.data_path, &data).await?;
    }
    Ok(Json(response))
}

pub async fn claim_challenge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<XpResponse>, AppError> {
    let mut data = state.data.lock().await;
    let known_weeks = data.weeks.len();
    let claimed = {
        let mut rng = rand::thread_rng();
        challenges::claim(&mut data, today(), &id, &mut rng)
    };
    let challenge = match claimed {
        Ok(challenge) => challenge,
        Err(err) => {
            // a rejected claim may still have picked this week's challenges
            if data.weeks.len() != known_weeks {
                persist_data(&state.data_path, &data).await?;
            }
            return Err(err.into());
        }
    };
    info!(challenge = challenge.id, xp = challenge.xp_reward, "challenge claimed");

    let response = credit(&state.tiers, &mut data, challenge.xp_reward);
    persist_data(&state.data_path, &data).await?;
    Ok(Json(response))
}

async fn apply_action(
    state: &AppState,
    action: Action,
    all_habits_done: bool,
) -> Result<XpResponse, AppError> {
    let mut data = state.data.lock().await;
    record_activity(&mut data, today(), action, all_habits_done);
    let response = credit(&state.tiers, &mut data, action.xp());

    persist_data(&state.data_path, &data).await?;

    info!(%action, xp = data.xp, "activity logged");
    Ok(response)
}

async fn acknowledge(state: &AppState) -> Result<Option<u32>, AppError> {
    let mut data = state.data.lock().await;
    let level = data.level_up.acknowledge(|level| {
        info!(level, "level up acknowledged");
    });
    if level.is_some() {
        persist_data(&state.data_path, &data).await?;
    }
    Ok(level)
}

pub fn record_activity(data: &mut AppData, date: NaiveDate, action: Action, all_habits_done: bool) {
    let day = data.days.entry(date_key(date)).or_default();
    let count = day.actions.entry(action).or_default();
    *count = count.saturating_add(1);
    day.xp = day.xp.saturating_add(action.xp());
    day.all_habits_done |= all_habits_done;
}

/// Adds XP and runs level-up detection against the stored previous value.
pub fn credit(tiers: &TierTable, data: &mut AppData, amount: u64) -> XpResponse {
    data.xp = data.xp.saturating_add(amount);
    let outcome = data.level_up.evaluate(tiers, data.xp, &mut data.previous_xp);

    XpResponse {
        earned: amount,
        progress: tiers.snapshot(data.xp),
        leveled_up_to: outcome.leveled_up_to,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_up::PriorXpStore;
    use crate::storage::load_data;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("xp_ladder_{name}_{}_{nanos}.json", std::process::id()))
    }

    #[tokio::test]
    async fn rejected_claim_still_persists_week_selection() {
        let path = temp_path("claim");
        let state = AppState::new(path.clone(), TierTable::standard().unwrap(), AppData::default());

        let err = claim_challenge(State(state.clone()), Path("nope".to_string()))
            .await
            .err()
            .expect("unknown challenge is rejected");
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);

        let Json(view) = get_challenges(State(state.clone())).await.unwrap();
        assert_eq!(view.challenges.len(), 3);

        let on_disk = load_data(&path).await;
        assert_eq!(on_disk.weeks.len(), 1);
        let in_memory = state.data.lock().await.weeks.clone();
        assert_eq!(on_disk.weeks, in_memory);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn credit_detects_crossing_after_first_gain() {
        let tiers = TierTable::standard().unwrap();
        let mut data = AppData::default();

        // first evaluation only seeds the stored value
        let first = credit(&tiers, &mut data, 250);
        assert_eq!(first.leveled_up_to, None);
        assert_eq!(data.previous_xp.load(), Some(250));

        let second = credit(&tiers, &mut data, 50);
        assert_eq!(second.leveled_up_to, Some(3));
        assert_eq!(second.progress.tier.name, "Apprentice");
        assert_eq!(data.level_up.pending_level(), Some(3));
        assert_eq!(data.previous_xp.load(), Some(300));
    }

    #[test]
    fn record_activity_accumulates_per_day() {
        let mut data = AppData::default();
        let date = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        record_activity(&mut data, date, Action::CompleteHabit, false);
        record_activity(&mut data, date, Action::CompleteHabit, true);
        record_activity(&mut data, date, Action::JournalEntry, false);

        let day = &data.days["2026-04-02"];
        assert_eq!(day.count(Action::CompleteHabit), 2);
        assert_eq!(day.count(Action::JournalEntry), 1);
        assert_eq!(day.xp, 50);
        assert!(day.all_habits_done);
    }
}
