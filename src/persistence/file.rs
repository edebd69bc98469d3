use super::{PersistenceError, PersistenceResult};
use crate::{
    Confirmation, Goal, TaskCompletion, Tracker, TrackerConfig,
    recurrence::Recurrence,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct TrackerSnapshot {
    #[serde(default)]
    config: TrackerConfig,
    goals: Vec<Goal>,
    #[serde(default)]
    completions: Vec<TaskCompletion>,
    #[serde(default)]
    confirmations: Vec<Confirmation>,
}

impl TrackerSnapshot {
    fn from_tracker(tracker: &Tracker) -> Self {
        Self {
            config: *tracker.config(),
            goals: tracker.goals().to_vec(),
            completions: tracker.completions().to_vec(),
            confirmations: tracker.confirmations().to_vec(),
        }
    }

    fn into_tracker(self) -> PersistenceResult<Tracker> {
        self.config
            .validate()
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        let mut tracker = Tracker::from_parts(self.goals, self.completions)?
            .with_confirmations(self.confirmations)?;
        tracker.set_config(self.config);
        Ok(tracker)
    }
}

pub fn save_tracker_to_json<P: AsRef<Path>>(tracker: &Tracker, path: P) -> PersistenceResult<()> {
    let snapshot = TrackerSnapshot::from_tracker(tracker);
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        goals = snapshot.goals.len(),
        completions = snapshot.completions.len(),
        confirmations = snapshot.confirmations.len(),
        "saved tracker json"
    );
    Ok(())
}

pub fn load_tracker_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Tracker> {
    let file = File::open(path.as_ref())?;
    let snapshot: TrackerSnapshot = serde_json::from_reader(file)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        goals = snapshot.goals.len(),
        completions = snapshot.completions.len(),
        confirmations = snapshot.confirmations.len(),
        "loaded tracker json"
    );
    snapshot.into_tracker()
}

#[derive(Serialize, Deserialize)]
struct GoalCsvRecord {
    id: String,
    title: String,
    description: String,
    recurrence: String,
    custom_days: String,
    archived: String,
    created_at: String,
}

impl From<&Goal> for GoalCsvRecord {
    fn from(goal: &Goal) -> Self {
        let custom_days = match goal.recurrence {
            Recurrence::Custom(days) => days
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(","),
            _ => String::new(),
        };
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            description: goal.description.clone().unwrap_or_default(),
            recurrence: goal.recurrence.as_str().to_string(),
            custom_days,
            archived: goal.archived.to_string(),
            created_at: format_date(goal.created_at),
        }
    }
}

impl GoalCsvRecord {
    fn into_goal(self) -> PersistenceResult<Goal> {
        let days = split_i64(&self.custom_days)?;
        let recurrence = Recurrence::parse(&self.recurrence, Some(days.as_slice())).map_err(|err| {
            PersistenceError::InvalidData(format!("goal {}: {err}", self.id))
        })?;
        let mut goal = Goal::new(self.id, self.title, recurrence, parse_date(&self.created_at)?);
        goal.description = parse_string_option(self.description);
        goal.archived = parse_bool(&self.archived)?.unwrap_or(false);
        Ok(goal)
    }
}

#[derive(Serialize, Deserialize)]
struct CompletionCsvRecord {
    goal_id: String,
    date: String,
    completed: String,
}

impl From<&TaskCompletion> for CompletionCsvRecord {
    fn from(completion: &TaskCompletion) -> Self {
        Self {
            goal_id: completion.goal_id.clone(),
            date: format_date(completion.date),
            completed: completion.completed.to_string(),
        }
    }
}

impl CompletionCsvRecord {
    fn into_completion(self) -> PersistenceResult<TaskCompletion> {
        if self.goal_id.trim().is_empty() {
            return Err(PersistenceError::InvalidData(
                "completion row is missing goal_id".into(),
            ));
        }
        let completed = parse_bool(&self.completed)?.unwrap_or(false);
        Ok(TaskCompletion::new(
            self.goal_id.trim(),
            parse_date(&self.date)?,
            completed,
        ))
    }
}

pub fn save_goals_to_csv<P: AsRef<Path>>(goals: &[Goal], path: P) -> PersistenceResult<()> {
    crate::goal_validation::validate_goal_collection(goals)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for goal in goals {
        writer.serialize(GoalCsvRecord::from(goal))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_goals_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Goal>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut goals = Vec::new();
    for record in reader.deserialize::<GoalCsvRecord>() {
        goals.push(record?.into_goal()?);
    }
    crate::goal_validation::validate_goal_collection(&goals)?;
    Ok(goals)
}

pub fn save_completions_to_csv<P: AsRef<Path>>(
    completions: &[TaskCompletion],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for completion in completions {
        writer.serialize(CompletionCsvRecord::from(completion))?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads completion rows, rejecting repeated (goal, date) keys. Matching rows
/// against goals is left to the caller.
pub fn load_completions_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskCompletion>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut completions = Vec::new();
    for record in reader.deserialize::<CompletionCsvRecord>() {
        completions.push(record?.into_completion()?);
    }
    crate::goal_validation::validate_completion_keys(&completions)?;
    Ok(completions)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}

fn split_i64(input: &str) -> PersistenceResult<Vec<i64>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|part| {
            part.trim().parse::<i64>().map_err(|e| {
                PersistenceError::InvalidData(format!("invalid integer '{part}': {e}"))
            })
        })
        .collect()
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
