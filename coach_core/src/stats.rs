//! Aggregate statistics over persisted session results.
//!
//! Pure functions over an ordered history of [`SessionResult`]s: time-window
//! totals, calendar-day streaks, a per-day breakdown for display, and
//! threshold-based achievements. Achievements are recomputed in full on every
//! call from the current aggregates; nothing here stores unlock flags.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SessionResult;

/// Time window for filtering history
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
    Year,
    AllTime,
}

impl TimeRange {
    /// Inclusive lower bound for session start times; `None` means unbounded
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::Week => Some(now - Duration::days(7)),
            TimeRange::Month => Some(now - Duration::days(30)),
            TimeRange::Year => Some(now - Duration::days(365)),
            TimeRange::AllTime => None,
        }
    }
}

/// Aggregate display statistics for one time window
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub total_minutes: u32,
    pub total_calories: u32,
    /// Mean of per-session averages, ignoring sessions with no recorded scores
    pub average_form_score: f64,
    /// Consecutive-day streak containing the most recent session
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// One calendar day in the 7-day breakdown
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub minutes: u32,
    pub calories: u32,
    pub session_count: usize,
}

/// A threshold achievement, unlocked purely by current aggregates
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Compute window totals and streaks over a session history.
///
/// The window filter applies to totals and the form-score average; streaks
/// are always computed over the full history, since a streak that began
/// before the window is still a streak.
pub fn aggregate(results: &[SessionResult], range: TimeRange, now: DateTime<Utc>) -> SessionStats {
    let cutoff = range.cutoff(now);
    let in_window: Vec<&SessionResult> = results
        .iter()
        .filter(|r| cutoff.map_or(true, |c| r.started_at >= c))
        .collect();

    let total_minutes = in_window
        .iter()
        .map(|r| r.total_duration_seconds / 60)
        .sum();
    let total_calories = in_window.iter().map(|r| r.calories_burned).sum();

    let scored: Vec<f64> = in_window
        .iter()
        .map(|r| r.average_form_score)
        .filter(|&s| s > 0.0)
        .collect();
    let average_form_score = if scored.is_empty() {
        0.0
    } else {
        scored.iter().sum::<f64>() / scored.len() as f64
    };

    let (current_streak, longest_streak) = compute_streaks(results);

    let stats = SessionStats {
        total_sessions: in_window.len(),
        total_minutes,
        total_calories,
        average_form_score,
        current_streak,
        longest_streak,
    };

    tracing::debug!(
        "Aggregated {} sessions in window ({} total), streak {}/{}",
        stats.total_sessions,
        results.len(),
        stats.current_streak,
        stats.longest_streak
    );

    stats
}

/// Walk session days newest-first and measure consecutive-day runs.
///
/// A gap of exactly one calendar day extends a run; a larger gap closes it.
/// Multiple sessions on the same day collapse to one, so at most one streak
/// increment per day. Returns (current, longest): current is the run
/// containing the most recent session.
pub fn compute_streaks(results: &[SessionResult]) -> (u32, u32) {
    let mut days: Vec<NaiveDate> = results.iter().map(|r| r.started_at.date_naive()).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    if days.is_empty() {
        return (0, 0);
    }

    let mut current = 0u32;
    let mut longest = 0u32;
    let mut run = 1u32;

    for pair in days.windows(2) {
        let gap = (pair[0] - pair[1]).num_days();
        if gap == 1 {
            run += 1;
        } else {
            if current == 0 {
                current = run;
            }
            longest = longest.max(run);
            run = 1;
        }
    }

    if current == 0 {
        current = run;
    }
    longest = longest.max(run);

    (current, longest)
}

/// Per-day totals for the last `days` calendar days, oldest first
pub fn daily_breakdown(results: &[SessionResult], now: DateTime<Utc>, days: u32) -> Vec<DailyStats> {
    let today = now.date_naive();

    (0..days)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(i64::from(days_ago));
            let day_sessions: Vec<&SessionResult> = results
                .iter()
                .filter(|r| r.started_at.date_naive() == date)
                .collect();

            DailyStats {
                date,
                minutes: day_sessions
                    .iter()
                    .map(|r| r.total_duration_seconds / 60)
                    .sum(),
                calories: day_sessions.iter().map(|r| r.calories_burned).sum(),
                session_count: day_sessions.len(),
            }
        })
        .collect()
}

/// Evaluate which achievements the current aggregates unlock.
///
/// Deterministic and idempotent: the same stats always yield the same list,
/// in a fixed order.
pub fn evaluate_achievements(stats: &SessionStats) -> Vec<Achievement> {
    let mut unlocked = Vec::new();

    if stats.total_sessions >= 1 {
        unlocked.push(Achievement {
            id: "first_workout",
            name: "First Steps",
            description: "Complete your first workout",
        });
    }

    if stats.current_streak >= 7 {
        unlocked.push(Achievement {
            id: "week_streak",
            name: "Week Warrior",
            description: "7-day workout streak",
        });
    }

    if stats.current_streak >= 30 {
        unlocked.push(Achievement {
            id: "month_streak",
            name: "Monthly Master",
            description: "30-day workout streak",
        });
    }

    if stats.average_form_score >= 0.9 {
        unlocked.push(Achievement {
            id: "perfect_form",
            name: "Perfect Form",
            description: "Average form score above 90%",
        });
    }

    if stats.total_sessions >= 10 {
        unlocked.push(Achievement {
            id: "ten_workouts",
            name: "Getting Serious",
            description: "Complete 10 workouts",
        });
    }

    if stats.total_sessions >= 50 {
        unlocked.push(Achievement {
            id: "fifty_workouts",
            name: "Dedicated",
            description: "Complete 50 workouts",
        });
    }

    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn result_on_day(days_ago: i64) -> SessionResult {
        result_with(days_ago, 600, 0.85)
    }

    fn result_with(days_ago: i64, duration_seconds: u32, form: f64) -> SessionResult {
        let started_at = Utc::now() - Duration::days(days_ago);
        SessionResult {
            id: Uuid::new_v4(),
            target_name: "Squats".into(),
            started_at,
            completed_at: started_at + Duration::seconds(i64::from(duration_seconds)),
            total_duration_seconds: duration_seconds,
            exercises_completed: 1,
            exercises_planned: 1,
            total_reps_completed: 12,
            average_form_score: form,
            calories_burned: SessionResult::estimate_calories(duration_seconds),
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = aggregate(&[], TimeRange::AllTime, Utc::now());
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.average_form_score, 0.0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
    }

    #[test]
    fn test_week_window_excludes_old_sessions() {
        let results = vec![result_on_day(1), result_on_day(3), result_on_day(10)];
        let stats = aggregate(&results, TimeRange::Week, Utc::now());

        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_minutes, 20);

        let all = aggregate(&results, TimeRange::AllTime, Utc::now());
        assert_eq!(all.total_sessions, 3);
    }

    #[test]
    fn test_streak_with_gap() {
        // Sessions on days 1,2,3,5 (counting back from day 5 = most recent).
        // Day 4 skipped: longest run is 3, the run at the latest day is 1.
        let results = vec![
            result_on_day(0), // day 5
            result_on_day(2), // day 3
            result_on_day(3), // day 2
            result_on_day(4), // day 1
        ];

        let (current, longest) = compute_streaks(&results);
        assert_eq!(current, 1);
        assert_eq!(longest, 3);
    }

    #[test]
    fn test_unbroken_streak() {
        let results = vec![result_on_day(0), result_on_day(1), result_on_day(2)];
        let (current, longest) = compute_streaks(&results);
        assert_eq!(current, 3);
        assert_eq!(longest, 3);
    }

    #[test]
    fn test_same_day_sessions_do_not_inflate_streak() {
        let results = vec![
            result_on_day(0),
            result_on_day(0),
            result_on_day(0),
            result_on_day(1),
        ];
        let (current, longest) = compute_streaks(&results);
        assert_eq!(current, 2);
        assert_eq!(longest, 2);
    }

    #[test]
    fn test_average_ignores_unscored_sessions() {
        let results = vec![
            result_with(0, 600, 0.9),
            result_with(1, 600, 0.0), // no reps recorded, by convention 0.0
            result_with(2, 600, 0.7),
        ];
        let stats = aggregate(&results, TimeRange::AllTime, Utc::now());
        assert!((stats.average_form_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_daily_breakdown_covers_requested_days() {
        let results = vec![result_on_day(0), result_on_day(0), result_on_day(2)];
        let breakdown = daily_breakdown(&results, Utc::now(), 7);

        assert_eq!(breakdown.len(), 7);
        // Oldest first; today is the last entry
        assert_eq!(breakdown[6].session_count, 2);
        assert_eq!(breakdown[6].minutes, 20);
        assert_eq!(breakdown[4].session_count, 1);
        assert_eq!(breakdown[5].session_count, 0);
    }

    #[test]
    fn test_first_session_unlocks_first_steps() {
        let stats = aggregate(&[result_on_day(0)], TimeRange::AllTime, Utc::now());
        let unlocked = evaluate_achievements(&stats);

        assert!(unlocked.iter().any(|a| a.id == "first_workout"));
        assert!(!unlocked.iter().any(|a| a.id == "ten_workouts"));
    }

    #[test]
    fn test_streak_and_volume_achievements() {
        let results: Vec<SessionResult> = (0..10).map(result_on_day).collect();
        let stats = aggregate(&results, TimeRange::AllTime, Utc::now());

        assert_eq!(stats.current_streak, 10);
        let unlocked = evaluate_achievements(&stats);
        let ids: Vec<&str> = unlocked.iter().map(|a| a.id).collect();

        assert!(ids.contains(&"first_workout"));
        assert!(ids.contains(&"week_streak"));
        assert!(ids.contains(&"ten_workouts"));
        assert!(!ids.contains(&"month_streak"));
        assert!(!ids.contains(&"fifty_workouts"));
    }

    #[test]
    fn test_achievement_evaluation_is_idempotent() {
        let results = vec![result_on_day(0)];
        let stats = aggregate(&results, TimeRange::AllTime, Utc::now());

        let first = evaluate_achievements(&stats);
        let second = evaluate_achievements(&stats);
        assert_eq!(first, second);
    }
}
