use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Things a user can do that earn XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CompleteGoal,
    CreateGoal,
    CompleteHabit,
    #[serde(rename = "maintain_streak_7")]
    MaintainStreak7,
    #[serde(rename = "maintain_streak_30")]
    MaintainStreak30,
    JournalEntry,
    CompleteExercise,
    CompleteRitual,
    AiCoachSession,
    FirstGoal,
    PerfectWeek,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::CompleteGoal,
        Action::CreateGoal,
        Action::CompleteHabit,
        Action::MaintainStreak7,
        Action::MaintainStreak30,
        Action::JournalEntry,
        Action::CompleteExercise,
        Action::CompleteRitual,
        Action::AiCoachSession,
        Action::FirstGoal,
        Action::PerfectWeek,
    ];

    pub fn xp(self) -> u64 {
        match self {
            Action::CompleteGoal => 50,
            Action::CreateGoal => 10,
            Action::CompleteHabit => 15,
            Action::MaintainStreak7 => 100,
            Action::MaintainStreak30 => 500,
            Action::JournalEntry => 20,
            Action::CompleteExercise => 25,
            Action::CompleteRitual => 30,
            Action::AiCoachSession => 10,
            Action::FirstGoal => 50,
            Action::PerfectWeek => 200,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::CompleteGoal => "complete_goal",
            Action::CreateGoal => "create_goal",
            Action::CompleteHabit => "complete_habit",
            Action::MaintainStreak7 => "maintain_streak_7",
            Action::MaintainStreak30 => "maintain_streak_30",
            Action::JournalEntry => "journal_entry",
            Action::CompleteExercise => "complete_exercise",
            Action::CompleteRitual => "complete_ritual",
            Action::AiCoachSession => "ai_coach_session",
            Action::FirstGoal => "first_goal",
            Action::PerfectWeek => "perfect_week",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| format!("unknown action '{value}'"))
    }
}
