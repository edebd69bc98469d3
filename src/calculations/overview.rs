use super::agenda::daily_checklist;
use super::streak::{completion_rate, current_streak, rounded_percent};
use crate::goal::{Goal, TaskCompletion};
use chrono::NaiveDate;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub title: String,
    pub streak: u32,
    pub completion_rate: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_goals: usize,
    pub today_completed: usize,
    pub today_total: usize,
    pub longest_streak: u32,
}

impl OverviewStats {
    /// Share of today's due goals already done, `None` when nothing is due.
    pub fn today_rate(&self) -> Option<u8> {
        if self.today_total == 0 {
            return None;
        }
        Some(rounded_percent(
            self.today_completed as u32,
            self.today_total as u32,
        ))
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("goals={}", self.total_goals));
        parts.push(format!("today={}/{}", self.today_completed, self.today_total));
        parts.push(format!("best_streak={}d", self.longest_streak));
        if let Some(rate) = self.today_rate() {
            parts.push(format!("today_rate={rate}%"));
        }
        parts.join(", ")
    }
}

pub fn goal_progress(
    goal: &Goal,
    completions: &[TaskCompletion],
    today: NaiveDate,
    window_days: u32,
) -> GoalProgress {
    GoalProgress {
        goal_id: goal.id.clone(),
        title: goal.title.clone(),
        streak: current_streak(goal, completions, today),
        completion_rate: completion_rate(goal, completions, today, window_days),
    }
}

/// Progress for every goal, computed in parallel, in input order.
pub fn progress_for_goals(
    goals: &[Goal],
    completions: &[TaskCompletion],
    today: NaiveDate,
    window_days: u32,
) -> Vec<GoalProgress> {
    goals
        .par_iter()
        .map(|goal| goal_progress(goal, completions, today, window_days))
        .collect()
}

/// Dashboard totals over non-archived goals.
pub fn overview(
    goals: &[Goal],
    completions: &[TaskCompletion],
    today: NaiveDate,
) -> OverviewStats {
    let live: Vec<Goal> = goals.iter().filter(|g| !g.archived).cloned().collect();
    let checklist = daily_checklist(&live, completions, today);
    let longest_streak = live
        .par_iter()
        .map(|goal| current_streak(goal, completions, today))
        .max()
        .unwrap_or(0);

    OverviewStats {
        total_goals: live.len(),
        today_completed: checklist.completed_count(),
        today_total: checklist.items.len(),
        longest_streak,
    }
}

/// Tabular view of progress rows for display.
pub fn progress_frame(progress: &[GoalProgress]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = progress.iter().map(|p| p.goal_id.as_str()).collect();
    let titles: Vec<&str> = progress.iter().map(|p| p.title.as_str()).collect();
    let streaks: Vec<u32> = progress.iter().map(|p| p.streak).collect();
    let rates: Vec<u32> = progress
        .iter()
        .map(|p| u32::from(p.completion_rate))
        .collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("goal_id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("title"), titles).into_column(),
        Series::new(PlSmallStr::from_static("streak"), streaks).into_column(),
        Series::new(PlSmallStr::from_static("completion_rate"), rates).into_column(),
    ])
}
