use crate::calculations::agenda::{self, DailyChecklist, MonthGrid};
use crate::calculations::overview::{self, GoalProgress, OverviewStats};
use crate::calculations::streak;
use crate::config::TrackerConfig;
use crate::goal::{Confirmation, Goal, TaskCompletion};
use crate::goal_validation::{self, GoalValidationError};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("goal {0} not found")]
    GoalNotFound(String),
    #[error("goal {goal_id} is not completed on {date}")]
    NotCompleted { goal_id: String, date: NaiveDate },
    #[error("goal {goal_id} on {date} already confirmed by {confirmed_by}")]
    AlreadyConfirmed {
        goal_id: String,
        date: NaiveDate,
        confirmed_by: String,
    },
    #[error(transparent)]
    Invalid(#[from] GoalValidationError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// In-memory goals and completion records, keyed by goal id and (goal id, date),
/// plus friend confirmations keyed by (goal id, date, confirmer).
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    goals: Vec<Goal>,
    completions: Vec<TaskCompletion>,
    confirmations: Vec<Confirmation>,
    config: TrackerConfig,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builds a tracker from already-stored records, validating them as a whole.
    pub fn from_parts(goals: Vec<Goal>, completions: Vec<TaskCompletion>) -> TrackerResult<Self> {
        goal_validation::validate_goal_collection(&goals)?;
        goal_validation::validate_completions(&goals, &completions)?;
        Ok(Self {
            goals,
            completions,
            confirmations: Vec::new(),
            config: TrackerConfig::default(),
        })
    }

    /// Attaches stored confirmations, validated against the completion records.
    pub fn with_confirmations(mut self, confirmations: Vec<Confirmation>) -> TrackerResult<Self> {
        goal_validation::validate_confirmations(&self.completions, &confirmations)?;
        self.confirmations = confirmations;
        Ok(self)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TrackerConfig) {
        self.config = config;
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn completions(&self) -> &[TaskCompletion] {
        &self.completions
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    fn goal_mut(&mut self, id: &str) -> TrackerResult<&mut Goal> {
        self.goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| TrackerError::GoalNotFound(id.to_string()))
    }

    pub fn active_goals(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|g| !g.archived).collect()
    }

    pub fn archived_goals(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|g| g.archived).collect()
    }

    pub fn completions_for(&self, goal_id: &str) -> Vec<&TaskCompletion> {
        self.completions
            .iter()
            .filter(|c| c.goal_id == goal_id)
            .collect()
    }

    pub fn confirmations(&self) -> &[Confirmation] {
        &self.confirmations
    }

    pub fn confirmations_for(&self, goal_id: &str, date: NaiveDate) -> Vec<&Confirmation> {
        self.confirmations
            .iter()
            .filter(|c| c.matches(goal_id, date))
            .collect()
    }

    /// Inserts a new goal, or edits the title, description and recurrence of
    /// the goal with the same id. An edit keeps `created_at` and `archived`.
    pub fn upsert_goal(&mut self, goal: Goal) -> TrackerResult<()> {
        goal_validation::validate_goal(&goal)?;
        tracing::debug!(goal_id = %goal.id, recurrence = %goal.recurrence, "upsert goal");
        match self.goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => {
                existing.title = goal.title;
                existing.description = goal.description;
                existing.recurrence = goal.recurrence;
            }
            None => self.goals.push(goal),
        }
        Ok(())
    }

    pub fn archive_goal(&mut self, id: &str) -> TrackerResult<()> {
        self.goal_mut(id)?.archived = true;
        tracing::debug!(goal_id = id, "archived goal");
        Ok(())
    }

    pub fn restore_goal(&mut self, id: &str) -> TrackerResult<()> {
        self.goal_mut(id)?.archived = false;
        tracing::debug!(goal_id = id, "restored goal");
        Ok(())
    }

    /// Removes a goal together with its completion and confirmation records.
    pub fn delete_goal(&mut self, id: &str) -> TrackerResult<()> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        if self.goals.len() == before {
            return Err(TrackerError::GoalNotFound(id.to_string()));
        }
        self.completions.retain(|c| c.goal_id != id);
        self.confirmations.retain(|c| c.goal_id != id);
        tracing::debug!(goal_id = id, "deleted goal");
        Ok(())
    }

    /// Checking upserts the (goal, date) record. Unchecking keeps an existing
    /// record with `completed = false` and does nothing when there is none.
    pub fn set_completion(
        &mut self,
        goal_id: &str,
        date: NaiveDate,
        completed: bool,
    ) -> TrackerResult<()> {
        if self.goal(goal_id).is_none() {
            return Err(TrackerError::GoalNotFound(goal_id.to_string()));
        }
        if let Some(record) = self
            .completions
            .iter_mut()
            .find(|c| c.goal_id == goal_id && c.date == date)
        {
            record.completed = completed;
        } else if completed {
            self.completions.push(TaskCompletion::done(goal_id, date));
        }
        tracing::debug!(goal_id, %date, completed, "set completion");
        Ok(())
    }

    /// Records `confirmed_by` vouching for a completed (goal, date).
    pub fn confirm(
        &mut self,
        goal_id: &str,
        date: NaiveDate,
        confirmed_by: &str,
    ) -> TrackerResult<()> {
        if self.goal(goal_id).is_none() {
            return Err(TrackerError::GoalNotFound(goal_id.to_string()));
        }
        let confirmed_by = confirmed_by.trim();
        if confirmed_by.is_empty() {
            return Err(GoalValidationError::EmptyConfirmer {
                goal_id: goal_id.to_string(),
                date,
            }
            .into());
        }
        let completed = self
            .completions
            .iter()
            .any(|c| c.completed && c.goal_id == goal_id && c.date == date);
        if !completed {
            return Err(TrackerError::NotCompleted {
                goal_id: goal_id.to_string(),
                date,
            });
        }
        if self
            .confirmations
            .iter()
            .any(|c| c.matches(goal_id, date) && c.confirmed_by == confirmed_by)
        {
            return Err(TrackerError::AlreadyConfirmed {
                goal_id: goal_id.to_string(),
                date,
                confirmed_by: confirmed_by.to_string(),
            });
        }
        self.confirmations
            .push(Confirmation::new(goal_id, date, confirmed_by));
        tracing::debug!(goal_id, %date, confirmed_by, "confirmed completion");
        Ok(())
    }

    /// Withdraws a confirmation. Returns whether one was removed.
    pub fn unconfirm(
        &mut self,
        goal_id: &str,
        date: NaiveDate,
        confirmed_by: &str,
    ) -> TrackerResult<bool> {
        if self.goal(goal_id).is_none() {
            return Err(TrackerError::GoalNotFound(goal_id.to_string()));
        }
        let confirmed_by = confirmed_by.trim();
        let before = self.confirmations.len();
        self.confirmations
            .retain(|c| !(c.matches(goal_id, date) && c.confirmed_by == confirmed_by));
        let removed = self.confirmations.len() != before;
        tracing::debug!(goal_id, %date, confirmed_by, removed, "unconfirmed completion");
        Ok(removed)
    }

    pub fn current_streak(&self, goal_id: &str, today: NaiveDate) -> TrackerResult<u32> {
        let goal = self
            .goal(goal_id)
            .ok_or_else(|| TrackerError::GoalNotFound(goal_id.to_string()))?;
        Ok(streak::current_streak(goal, &self.completions, today))
    }

    pub fn completion_rate(
        &self,
        goal_id: &str,
        today: NaiveDate,
        window_days: Option<u32>,
    ) -> TrackerResult<u8> {
        let goal = self
            .goal(goal_id)
            .ok_or_else(|| TrackerError::GoalNotFound(goal_id.to_string()))?;
        let window = window_days.unwrap_or(self.config.completion_window_days);
        Ok(streak::completion_rate(
            goal,
            &self.completions,
            today,
            window,
        ))
    }

    /// Progress for every non-archived goal.
    pub fn progress(&self, today: NaiveDate) -> Vec<GoalProgress> {
        let live: Vec<Goal> = self.active_goals().into_iter().cloned().collect();
        overview::progress_for_goals(
            &live,
            &self.completions,
            today,
            self.config.completion_window_days,
        )
    }

    pub fn overview(&self, today: NaiveDate) -> OverviewStats {
        overview::overview(&self.goals, &self.completions, today)
    }

    pub fn checklist(&self, date: NaiveDate) -> DailyChecklist {
        agenda::daily_checklist(&self.goals, &self.completions, date)
    }

    pub fn month_grid(&self, year: i32, month: u32) -> Option<MonthGrid> {
        agenda::month_grid(&self.goals, &self.completions, year, month)
    }
}
