//! Weekly challenges: three picks per Monday-based week, progress derived from
//! that week's logged activity, and one-time reward claims.

use crate::models::{AppData, ChallengeView, ChallengesResponse, WeekChallenges, WeekMetrics};
use crate::stats::{date_key, days_remaining, week_metrics, week_start};
use chrono::NaiveDate;
use rand::{seq::SliceRandom, Rng};
use tracing::info;

pub const CHALLENGES_PER_WEEK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    GoalsCreated,
    PerfectHabitDays,
    JournalEntries,
    ExercisesCompleted,
    ActiveDays,
}

impl Metric {
    fn read(self, metrics: &WeekMetrics) -> u32 {
        match self {
            Metric::GoalsCreated => metrics.goals_created,
            Metric::PerfectHabitDays => metrics.perfect_habit_days,
            Metric::JournalEntries => metrics.journal_entries,
            Metric::ExercisesCompleted => metrics.exercises_completed,
            Metric::ActiveDays => metrics.active_days,
        }
    }
}

#[derive(Debug)]
pub struct Challenge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub target: u32,
    pub xp_reward: u64,
    pub metric: Metric,
}

pub static CHALLENGES: &[Challenge] = &[
    Challenge {
        id: "goal_setter",
        name: "Goal Setter",
        description: "Create 3 new goals this week",
        target: 3,
        xp_reward: 150,
        metric: Metric::GoalsCreated,
    },
    Challenge {
        id: "habit_hero",
        name: "Habit Hero",
        description: "Complete all habits for 5 days",
        target: 5,
        xp_reward: 200,
        metric: Metric::PerfectHabitDays,
    },
    Challenge {
        id: "journal_journey",
        name: "Journal Journey",
        description: "Write 4 journal entries",
        target: 4,
        xp_reward: 120,
        metric: Metric::JournalEntries,
    },
    Challenge {
        id: "mind_master",
        name: "Mind Master",
        description: "Complete 5 growth exercises",
        target: 5,
        xp_reward: 175,
        metric: Metric::ExercisesCompleted,
    },
    Challenge {
        id: "consistency_king",
        name: "Consistency King",
        description: "Log in and take action 7 days in a row",
        target: 7,
        xp_reward: 250,
        metric: Metric::ActiveDays,
    },
];

pub fn find(id: &str) -> Option<&'static Challenge> {
    CHALLENGES.iter().find(|challenge| challenge.id == id)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ClaimError {
    NotThisWeek,
    NotCompleted { progress: u32, target: u32 },
    AlreadyClaimed,
}

/// Returns the week's selection, picking and storing one on first access.
pub fn ensure_week<'a, R: Rng + ?Sized>(
    data: &'a mut AppData,
    today: NaiveDate,
    rng: &mut R,
) -> &'a mut WeekChallenges {
    let key = date_key(week_start(today));
    data.weeks.entry(key.clone()).or_insert_with(|| {
        let selected: Vec<String> = CHALLENGES
            .choose_multiple(rng, CHALLENGES_PER_WEEK)
            .map(|challenge| challenge.id.to_string())
            .collect();
        info!(week = %key, ?selected, "selected weekly challenges");
        WeekChallenges {
            selected,
            claimed: Vec::new(),
        }
    })
}

pub fn build_view(challenge: &Challenge, metrics: &WeekMetrics, claimed: bool) -> ChallengeView {
    let progress = challenge.metric.read(metrics);
    let percent = (u64::from(progress) * 100 / u64::from(challenge.target.max(1))).min(100);
    ChallengeView {
        id: challenge.id,
        name: challenge.name,
        description: challenge.description,
        target: challenge.target,
        xp_reward: challenge.xp_reward,
        progress,
        percent: percent as u8,
        completed: progress >= challenge.target,
        claimed,
    }
}

pub fn weekly_challenges<R: Rng + ?Sized>(
    data: &mut AppData,
    today: NaiveDate,
    rng: &mut R,
) -> ChallengesResponse {
    let week = ensure_week(data, today, rng).clone();
    let metrics = week_metrics(today, data);

    let challenges = week
        .selected
        .iter()
        .filter_map(|id| find(id))
        .map(|challenge| {
            let claimed = week.claimed.iter().any(|id| id == challenge.id);
            build_view(challenge, &metrics, claimed)
        })
        .collect();

    ChallengesResponse {
        week: date_key(week_start(today)),
        days_remaining: days_remaining(today),
        challenges,
    }
}

/// Marks a completed challenge as claimed and returns its XP reward. The
/// caller is responsible for crediting the XP.
pub fn claim<R: Rng + ?Sized>(
    data: &mut AppData,
    today: NaiveDate,
    id: &str,
    rng: &mut R,
) -> Result<&'static Challenge, ClaimError> {
    let metrics = week_metrics(today, data);
    let week = ensure_week(data, today, rng);

    let challenge = week
        .selected
        .iter()
        .any(|selected| selected == id)
        .then(|| find(id))
        .flatten()
        .ok_or(ClaimError::NotThisWeek)?;

    if week.claimed.iter().any(|claimed| claimed == id) {
        return Err(ClaimError::AlreadyClaimed);
    }

    let progress = challenge.metric.read(&metrics);
    if progress < challenge.target {
        return Err(ClaimError::NotCompleted {
            progress,
            target: challenge.target,
        });
    }

    week.claimed.push(challenge.id.to_string());
    Ok(challenge)
}
