use crate::recurrence::Recurrence;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub archived: bool,
    /// Earliest date that can count toward a streak.
    pub created_at: NaiveDate,
}

impl Goal {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        recurrence: Recurrence,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            recurrence,
            archived: false,
            created_at,
        }
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.recurrence.is_active_on(date)
    }
}

/// Whether a goal's instance on one date was marked done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub goal_id: String,
    pub date: NaiveDate,
    pub completed: bool,
}

impl TaskCompletion {
    pub fn new(goal_id: impl Into<String>, date: NaiveDate, completed: bool) -> Self {
        Self {
            goal_id: goal_id.into(),
            date,
            completed,
        }
    }

    pub fn done(goal_id: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(goal_id, date, true)
    }
}

/// A friend vouching that a goal was done on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub goal_id: String,
    pub date: NaiveDate,
    pub confirmed_by: String,
}

impl Confirmation {
    pub fn new(
        goal_id: impl Into<String>,
        date: NaiveDate,
        confirmed_by: impl Into<String>,
    ) -> Self {
        Self {
            goal_id: goal_id.into(),
            date,
            confirmed_by: confirmed_by.into(),
        }
    }

    pub fn matches(&self, goal_id: &str, date: NaiveDate) -> bool {
        self.goal_id == goal_id && self.date == date
    }
}

/// Dates on which one goal was completed.
///
/// Records for other goals and records with `completed = false` are skipped,
/// so a missing record and an explicit un-check look the same.
#[derive(Debug, Clone, Default)]
pub struct CompletionSet {
    dates: HashSet<NaiveDate>,
}

impl CompletionSet {
    pub fn for_goal(goal_id: &str, completions: &[TaskCompletion]) -> Self {
        let dates = completions
            .iter()
            .filter(|c| c.completed && c.goal_id == goal_id)
            .map(|c| c.date)
            .collect();
        Self { dates }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}
