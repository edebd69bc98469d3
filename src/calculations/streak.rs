use crate::goal::{CompletionSet, Goal, TaskCompletion};
use chrono::{Duration, NaiveDate};

pub const DEFAULT_COMPLETION_WINDOW_DAYS: u32 = 30;

/// Consecutive completed active days ending at the most recent active day
/// on or before `today`.
///
/// An inactive `today` is skipped before the first check. Inactive days in
/// the middle of the run are skipped without breaking it. The walk stops at
/// the first active day without a completion and never visits a date before
/// `goal.created_at`.
pub fn current_streak(goal: &Goal, completions: &[TaskCompletion], today: NaiveDate) -> u32 {
    if !goal.recurrence.has_active_days() || today < goal.created_at {
        return 0;
    }

    let completed = CompletionSet::for_goal(&goal.id, completions);
    let mut cursor = Some(today);
    if !goal.is_active_on(today) {
        cursor = today.pred_opt();
    }

    let mut streak = 0;
    while let Some(date) = cursor {
        if date < goal.created_at {
            break;
        }
        if goal.is_active_on(date) {
            if !completed.contains(date) {
                break;
            }
            streak += 1;
        }
        cursor = date.pred_opt();
    }
    streak
}

/// Percentage (0-100, rounded half up) of active days completed in the
/// `window_days` calendar days ending at `today`.
///
/// `goal.created_at` is not consulted: days before creation inside the
/// window count like any other day.
pub fn completion_rate(
    goal: &Goal,
    completions: &[TaskCompletion],
    today: NaiveDate,
    window_days: u32,
) -> u8 {
    let completed = CompletionSet::for_goal(&goal.id, completions);
    let (active_days, completed_days) = window_counts(goal, &completed, today, window_days);
    rounded_percent(completed_days, active_days)
}

/// Active and completed day counts for the trailing window.
pub fn window_counts(
    goal: &Goal,
    completed: &CompletionSet,
    today: NaiveDate,
    window_days: u32,
) -> (u32, u32) {
    let mut active_days = 0;
    let mut completed_days = 0;
    for offset in 0..window_days {
        let Some(date) = today.checked_sub_signed(Duration::days(i64::from(offset))) else {
            break;
        };
        if goal.is_active_on(date) {
            active_days += 1;
            if completed.contains(date) {
                completed_days += 1;
            }
        }
    }
    (active_days, completed_days)
}

/// `part / whole * 100` rounded to the nearest integer, halves rounding up.
/// A zero `whole` yields 0.
pub fn rounded_percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    ((part * 200 + whole) / (whole * 2)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_percent_rounds_half_up() {
        assert_eq!(rounded_percent(1, 8), 13); // 12.5
        assert_eq!(rounded_percent(20, 22), 91);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(5, 5), 100);
        assert_eq!(rounded_percent(0, 0), 0);
    }
}
