use crate::models::{AppData, DailyPoint, DayActivity, StatsResponse, WeekMetrics};
use crate::rewards::Action;
use chrono::{Datelike, Duration, Local, NaiveDate};

pub fn build_stats(data: &AppData) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), data)
}

pub fn build_stats_at(today: NaiveDate, data: &AppData) -> StatsResponse {
    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let day = data.days.get(&date_key(date)).cloned().unwrap_or_default();
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            actions: day
                .actions
                .values()
                .fold(0u32, |total, count| total.saturating_add(*count)),
            xp: day.xp,
        });
    }

    StatsResponse {
        xp: data.xp,
        current_streak: current_streak(today, data),
        best_streak: best_streak(data),
        last_7_days,
        week: date_key(week_start(today)),
        week_metrics: week_metrics(today, data),
    }
}

pub fn week_metrics(today: NaiveDate, data: &AppData) -> WeekMetrics {
    let start = week_start(today);
    let mut metrics = WeekMetrics::default();

    for day_offset in 0..7 {
        let date = start + Duration::days(day_offset);
        let Some(day) = data.days.get(&date_key(date)) else {
            continue;
        };

        metrics.goals_created = metrics
            .goals_created
            .saturating_add(day.count(Action::CreateGoal));
        metrics.journal_entries = metrics
            .journal_entries
            .saturating_add(day.count(Action::JournalEntry));
        metrics.exercises_completed = metrics
            .exercises_completed
            .saturating_add(day.count(Action::CompleteExercise));
        if day.all_habits_done {
            metrics.perfect_habit_days += 1;
        }
        if day.is_active() {
            metrics.active_days += 1;
        }
    }

    metrics
}

/// Consecutive active days ending today, or ending yesterday while today is
/// still empty.
pub fn current_streak(today: NaiveDate, data: &AppData) -> u32 {
    let mut date = if is_active(data, today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while is_active(data, date) {
        streak += 1;
        date -= Duration::days(1);
    }
    streak
}

pub fn best_streak(data: &AppData) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut last: Option<NaiveDate> = None;

    for (key, day) in &data.days {
        let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") else {
            continue;
        };
        if !day.is_active() {
            continue;
        }
        run = match last {
            Some(prev) if date - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        last = Some(date);
    }

    best
}

fn is_active(data: &AppData, date: NaiveDate) -> bool {
    data.days
        .get(&date_key(date))
        .is_some_and(DayActivity::is_active)
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Days left in the Monday-based week, counting `today` and Sunday.
pub fn days_remaining(today: NaiveDate) -> u32 {
    7 - today.weekday().num_days_from_monday()
}
