use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How far back the daily streak scan looks, today included.
pub const STREAK_WINDOW_DAYS: u64 = 365;

pub const DEFAULT_COLOR: &str = "orange";
pub const DEFAULT_MONTHLY_TARGET: u32 = 10;

fn default_target() -> u32 {
    DEFAULT_MONTHLY_TARGET
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HabitKind {
    Daily,
    MonthlyGoal {
        #[serde(rename = "targetCount", default = "default_target")]
        target: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub title: String,
    #[serde(flatten)]
    pub kind: HabitKind,
    #[serde(default = "default_color")]
    pub color: String,
    /// Dates the habit was done on. Serialized as `YYYY-MM-DD` strings.
    #[serde(default)]
    pub history: BTreeSet<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Display statistic for a habit card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitStats {
    Streak(u32),
    MonthProgress { count: u32, target: u32 },
}

impl HabitStats {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Streak(_) => "Current Streak",
            Self::MonthProgress { .. } => "This Month",
        }
    }

    /// The leading number of the display value: streak days or completions this month.
    pub fn numeric(&self) -> u32 {
        match self {
            Self::Streak(days) => *days,
            Self::MonthProgress { count, .. } => *count,
        }
    }
}

impl fmt::Display for HabitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Streak(days) => write!(f, "{} Days", days),
            Self::MonthProgress { count, target } => write!(f, "{} / {}", count, target),
        }
    }
}

/// One cell of the recent-days row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMark {
    pub date: NaiveDate,
    pub done: bool,
    pub is_today: bool,
}

impl Habit {
    pub fn new(title: impl Into<String>, kind: HabitKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            kind,
            color: default_color(),
            history: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_done(&self, date: NaiveDate) -> bool {
        self.history.contains(&date)
    }

    /// Flip `date` in or out of the history. Returns whether the date is now marked done.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.history.remove(&date) {
            false
        } else {
            self.history.insert(date);
            true
        }
    }

    pub fn stats(&self, today: NaiveDate) -> HabitStats {
        match self.kind {
            HabitKind::Daily => HabitStats::Streak(self.current_streak(today)),
            HabitKind::MonthlyGoal { target } => HabitStats::MonthProgress {
                count: self.month_count(today),
                target,
            },
        }
    }

    /// Consecutive done days ending at today. A missing today is skipped once so an
    /// unlogged today does not zero the streak.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let mut streak = 0u32;
        for offset in 0..STREAK_WINDOW_DAYS {
            let Some(date) = today.checked_sub_days(Days::new(offset)) else {
                break;
            };
            if self.history.contains(&date) {
                streak += 1;
            } else if offset == 0 {
                continue;
            } else {
                break;
            }
        }
        streak
    }

    /// Number of done dates inside the calendar month containing `today`.
    pub fn month_count(&self, today: NaiveDate) -> u32 {
        self.history
            .iter()
            .filter(|d| d.year() == today.year() && d.month() == today.month())
            .count() as u32
    }

    /// Longest run of consecutive done days anywhere in the history.
    pub fn best_streak(&self) -> u32 {
        let mut best = 0u32;
        let mut current = 0u32;
        let mut prev: Option<NaiveDate> = None;
        for date in &self.history {
            current = match prev {
                Some(p) if (*date - p).num_days() == 1 => current + 1,
                _ => 1,
            };
            best = best.max(current);
            prev = Some(*date);
        }
        best
    }

    /// The last `count` days ending at today, oldest first.
    pub fn recent_days(&self, today: NaiveDate, count: u64) -> Vec<DayMark> {
        (0..count)
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| DayMark {
                date,
                done: self.is_done(date),
                is_today: date == today,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_with(dates: &[NaiveDate]) -> Habit {
        let mut habit = Habit::new("Read", HabitKind::Daily);
        habit.history.extend(dates.iter().copied());
        habit
    }

    #[test]
    fn toggle_twice_restores_history() {
        let mut habit = daily_with(&[date(2026, 10, 1), date(2026, 10, 3)]);
        let before = habit.history.clone();

        assert!(habit.toggle(date(2026, 10, 2)));
        assert!(habit.is_done(date(2026, 10, 2)));
        assert!(!habit.toggle(date(2026, 10, 2)));
        assert_eq!(habit.history, before);

        assert!(!habit.toggle(date(2026, 10, 1)));
        assert!(habit.toggle(date(2026, 10, 1)));
        assert_eq!(habit.history, before);
    }

    #[test]
    fn no_history_no_streak() {
        let habit = daily_with(&[]);
        assert_eq!(habit.current_streak(date(2026, 10, 18)), 0);
        assert_eq!(habit.stats(date(2026, 10, 18)).to_string(), "0 Days");
    }

    #[test]
    fn streak_up_to_yesterday_survives_missing_today() {
        let today = date(2026, 10, 18);
        for n in 1..=5u64 {
            let dates: Vec<_> = (1..=n)
                .map(|i| today.checked_sub_days(Days::new(i)).unwrap())
                .collect();
            let habit = daily_with(&dates);
            assert_eq!(habit.current_streak(today), n as u32);
        }
    }

    #[test]
    fn streak_includes_today_when_done() {
        let today = date(2026, 10, 18);
        let habit = daily_with(&[date(2026, 10, 16), date(2026, 10, 17), today]);
        assert_eq!(habit.current_streak(today), 3);
    }

    #[test]
    fn done_only_today() {
        let today = date(2026, 10, 18);
        let habit = daily_with(&[today]);
        assert_eq!(habit.current_streak(today), 1);
    }

    #[test]
    fn gap_before_yesterday_breaks_streak() {
        let today = date(2026, 10, 18);
        // Yesterday missing and today missing: only one skip is allowed.
        let habit = daily_with(&[date(2026, 10, 15), date(2026, 10, 16)]);
        assert_eq!(habit.current_streak(today), 0);

        // Today done but yesterday missing.
        let habit = daily_with(&[date(2026, 10, 15), date(2026, 10, 16), today]);
        assert_eq!(habit.current_streak(today), 1);
    }

    #[test]
    fn streak_is_capped_by_window() {
        let today = date(2026, 10, 18);
        let dates: Vec<_> = (0..400)
            .map(|i| today.checked_sub_days(Days::new(i)).unwrap())
            .collect();
        let habit = daily_with(&dates);
        assert_eq!(habit.current_streak(today), STREAK_WINDOW_DAYS as u32);
    }

    #[test]
    fn future_dates_do_not_count() {
        let today = date(2026, 10, 18);
        let habit = daily_with(&[date(2026, 10, 19), date(2026, 10, 17)]);
        assert_eq!(habit.current_streak(today), 1);
    }

    #[test]
    fn monthly_goal_counts_current_month_only() {
        let today = date(2026, 10, 18);
        let mut habit = Habit::new("Gym", HabitKind::MonthlyGoal { target: 12 });
        habit.history.extend([
            date(2026, 9, 30),
            date(2026, 10, 1),
            date(2026, 10, 5),
            date(2026, 10, 31),
            date(2026, 11, 1),
            date(2025, 10, 10),
        ]);

        let stats = habit.stats(today);
        assert_eq!(stats, HabitStats::MonthProgress { count: 3, target: 12 });
        assert_eq!(stats.to_string(), "3 / 12");
        assert_eq!(stats.label(), "This Month");
        assert_eq!(stats.numeric(), 3);
    }

    #[test]
    fn best_streak_finds_longest_run() {
        let habit = daily_with(&[
            date(2026, 9, 1),
            date(2026, 9, 2),
            date(2026, 9, 3),
            date(2026, 9, 10),
            date(2026, 9, 11),
        ]);
        assert_eq!(habit.best_streak(), 3);
        assert_eq!(daily_with(&[]).best_streak(), 0);
    }

    #[test]
    fn recent_days_oldest_first() {
        let today = date(2026, 10, 18);
        let habit = daily_with(&[date(2026, 10, 12), today]);
        let days = habit.recent_days(today, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, date(2026, 10, 12));
        assert!(days[0].done);
        assert!(!days[1].done);
        assert!(days[6].is_today && days[6].done);
    }

    #[test]
    fn json_matches_stored_layout() {
        let json = r#"{
            "id": "6f1c1c52-8d7e-4b3f-9a55-0d1b7f2f9c11",
            "title": "Gym",
            "type": "monthly_goal",
            "targetCount": 8,
            "color": "orange",
            "history": ["2026-10-02", "2026-10-01", "2026-10-02"],
            "createdAt": "2026-10-01T08:00:00.000Z"
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.kind, HabitKind::MonthlyGoal { target: 8 });
        assert_eq!(habit.history.len(), 2);

        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(value["type"], "monthly_goal");
        assert_eq!(value["targetCount"], 8);
        assert_eq!(value["history"][0], "2026-10-01");

        let daily = serde_json::to_value(Habit::new("Read", HabitKind::Daily)).unwrap();
        assert_eq!(daily["type"], "daily");
        assert!(daily.get("targetCount").is_none());
    }
}
