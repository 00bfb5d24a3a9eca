use crate::level_up::{LevelUpDetector, PriorXp};
use crate::progression::{ProgressSnapshot, Tier};
use crate::rewards::Action;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DayActivity {
    #[serde(default)]
    pub actions: BTreeMap<Action, u32>,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub all_habits_done: bool,
}

impl DayActivity {
    pub fn count(&self, action: Action) -> u32 {
        self.actions.get(&action).copied().unwrap_or(0)
    }

    pub fn is_active(&self) -> bool {
        self.actions.values().any(|count| *count > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WeekChallenges {
    pub selected: Vec<String>,
    #[serde(default)]
    pub claimed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub previous_xp: PriorXp,
    #[serde(default)]
    pub level_up: LevelUpDetector,
    #[serde(default)]
    pub days: BTreeMap<String, DayActivity>,
    #[serde(default)]
    pub weeks: BTreeMap<String, WeekChallenges>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub action: Action,
    #[serde(default)]
    pub all_habits_done: bool,
}

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct XpResponse {
    pub earned: u64,
    pub progress: ProgressSnapshot,
    pub leveled_up_to: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PendingLevelUp {
    pub level: u32,
    pub tier: Option<Tier>,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub level: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub actions: u32,
    pub xp: u64,
}

#[derive(Debug, Serialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct WeekMetrics {
    pub goals_created: u32,
    pub perfect_habit_days: u32,
    pub journal_entries: u32,
    pub exercises_completed: u32,
    pub active_days: u32,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub xp: u64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_7_days: Vec<DailyPoint>,
    pub week: String,
    pub week_metrics: WeekMetrics,
}

#[derive(Debug, Serialize)]
pub struct ChallengeView {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub target: u32,
    pub xp_reward: u64,
    pub progress: u32,
    pub percent: u8,
    pub completed: bool,
    pub claimed: bool,
}

#[derive(Debug, Serialize)]
pub struct ChallengesResponse {
    pub week: String,
    pub days_remaining: u32,
    pub challenges: Vec<ChallengeView>,
}
