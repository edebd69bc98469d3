use crate::goal::{Confirmation, Goal, TaskCompletion};
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalValidationError {
    #[error("goal id must not be empty")]
    EmptyId,
    #[error("goal {0} requires a title")]
    EmptyTitle(String),
    #[error("goal {id} title is {len} characters (max {max})", max = MAX_TITLE_LEN)]
    TitleTooLong { id: String, len: usize },
    #[error("goal {id} description is {len} characters (max {max})", max = MAX_DESCRIPTION_LEN)]
    DescriptionTooLong { id: String, len: usize },
    #[error("duplicate goal id {0}")]
    DuplicateGoal(String),
    #[error("duplicate completion for goal {goal_id} on {date}")]
    DuplicateCompletion { goal_id: String, date: NaiveDate },
    #[error("completion on {date} references unknown goal {goal_id}")]
    UnknownGoal { goal_id: String, date: NaiveDate },
    #[error("confirmation of goal {goal_id} on {date} has no confirmer")]
    EmptyConfirmer { goal_id: String, date: NaiveDate },
    #[error("confirmation on {date} references no completion of goal {goal_id}")]
    UnknownCompletion { goal_id: String, date: NaiveDate },
    #[error("{confirmed_by} confirmed goal {goal_id} on {date} more than once")]
    DuplicateConfirmation {
        goal_id: String,
        date: NaiveDate,
        confirmed_by: String,
    },
}

pub fn validate_goal(goal: &Goal) -> Result<(), GoalValidationError> {
    if goal.id.trim().is_empty() {
        return Err(GoalValidationError::EmptyId);
    }

    let title_len = goal.title.trim().chars().count();
    if title_len == 0 {
        return Err(GoalValidationError::EmptyTitle(goal.id.clone()));
    }
    if title_len > MAX_TITLE_LEN {
        return Err(GoalValidationError::TitleTooLong {
            id: goal.id.clone(),
            len: title_len,
        });
    }

    if let Some(description) = &goal.description {
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(GoalValidationError::DescriptionTooLong {
                id: goal.id.clone(),
                len,
            });
        }
    }

    Ok(())
}

pub fn validate_goal_collection(goals: &[Goal]) -> Result<(), GoalValidationError> {
    let mut seen_ids = HashSet::with_capacity(goals.len());
    for goal in goals {
        if !seen_ids.insert(goal.id.as_str()) {
            return Err(GoalValidationError::DuplicateGoal(goal.id.clone()));
        }
        validate_goal(goal)?;
    }
    Ok(())
}

/// Checks every record points at a known goal and the (goal, date) key is unique.
pub fn validate_completions(
    goals: &[Goal],
    completions: &[TaskCompletion],
) -> Result<(), GoalValidationError> {
    let goal_ids: HashSet<&str> = goals.iter().map(|g| g.id.as_str()).collect();
    if let Some(orphan) = completions
        .iter()
        .find(|c| !goal_ids.contains(c.goal_id.as_str()))
    {
        return Err(GoalValidationError::UnknownGoal {
            goal_id: orphan.goal_id.clone(),
            date: orphan.date,
        });
    }
    validate_completion_keys(completions)
}

/// Checks no two records share a (goal, date) key.
pub fn validate_completion_keys(
    completions: &[TaskCompletion],
) -> Result<(), GoalValidationError> {
    let mut seen = HashSet::with_capacity(completions.len());
    for completion in completions {
        if !seen.insert((completion.goal_id.as_str(), completion.date)) {
            return Err(GoalValidationError::DuplicateCompletion {
                goal_id: completion.goal_id.clone(),
                date: completion.date,
            });
        }
    }
    Ok(())
}

/// Checks each confirmation names a confirmer, points at a recorded
/// completion, and appears once per (goal, date, confirmer).
pub fn validate_confirmations(
    completions: &[TaskCompletion],
    confirmations: &[Confirmation],
) -> Result<(), GoalValidationError> {
    let recorded: HashSet<(&str, NaiveDate)> = completions
        .iter()
        .map(|c| (c.goal_id.as_str(), c.date))
        .collect();
    let mut seen = HashSet::with_capacity(confirmations.len());
    for confirmation in confirmations {
        if confirmation.confirmed_by.trim().is_empty() {
            return Err(GoalValidationError::EmptyConfirmer {
                goal_id: confirmation.goal_id.clone(),
                date: confirmation.date,
            });
        }
        if !recorded.contains(&(confirmation.goal_id.as_str(), confirmation.date)) {
            return Err(GoalValidationError::UnknownCompletion {
                goal_id: confirmation.goal_id.clone(),
                date: confirmation.date,
            });
        }
        let key = (
            confirmation.goal_id.as_str(),
            confirmation.date,
            confirmation.confirmed_by.as_str(),
        );
        if !seen.insert(key) {
            return Err(GoalValidationError::DuplicateConfirmation {
                goal_id: confirmation.goal_id.clone(),
                date: confirmation.date,
                confirmed_by: confirmation.confirmed_by.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Recurrence;

    fn goal(id: &str, title: &str) -> Goal {
        Goal::new(
            id,
            title,
            Recurrence::Daily,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn rejects_blank_and_long_titles() {
        assert_eq!(
            validate_goal(&goal("g1", "   ")),
            Err(GoalValidationError::EmptyTitle("g1".into()))
        );
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(
            validate_goal(&goal("g1", &long)),
            Err(GoalValidationError::TitleTooLong { len, .. }) if len == MAX_TITLE_LEN + 1
        ));
    }

    #[test]
    fn rejects_long_description() {
        let mut g = goal("g1", "Read");
        g.description = Some("y".repeat(MAX_DESCRIPTION_LEN + 1));
        assert!(matches!(
            validate_goal(&g),
            Err(GoalValidationError::DescriptionTooLong { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_completion_keys() {
        let goals = vec![goal("g1", "Read")];
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let completions = vec![
            TaskCompletion::done("g1", day),
            TaskCompletion::new("g1", day, false),
        ];
        assert!(matches!(
            validate_completions(&goals, &completions),
            Err(GoalValidationError::DuplicateCompletion { .. })
        ));
    }

    #[test]
    fn confirmations_need_a_recorded_completion() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let completions = vec![TaskCompletion::done("g1", day)];

        let ok = vec![
            Confirmation::new("g1", day, "ana"),
            Confirmation::new("g1", day, "ben"),
        ];
        assert_eq!(validate_confirmations(&completions, &ok), Ok(()));

        let orphan = vec![Confirmation::new("g1", day.succ_opt().unwrap(), "ana")];
        assert!(matches!(
            validate_confirmations(&completions, &orphan),
            Err(GoalValidationError::UnknownCompletion { .. })
        ));

        let twice = vec![
            Confirmation::new("g1", day, "ana"),
            Confirmation::new("g1", day, "ana"),
        ];
        assert!(matches!(
            validate_confirmations(&completions, &twice),
            Err(GoalValidationError::DuplicateConfirmation { .. })
        ));

        let blank = vec![Confirmation::new("g1", day, " ")];
        assert!(matches!(
            validate_confirmations(&completions, &blank),
            Err(GoalValidationError::EmptyConfirmer { .. })
        ));
    }
}
