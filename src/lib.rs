pub mod calculations;
pub mod config;
pub mod goal;
pub(crate) mod goal_validation;
pub mod persistence;
pub mod recurrence;
pub mod tracker;

pub use calculations::agenda::{
    CalendarCell, ChecklistItem, DailyChecklist, DayCompletion, MonthGrid, daily_checklist,
    day_completion, month_grid,
};
pub use calculations::overview::{
    GoalProgress, OverviewStats, goal_progress, overview, progress_for_goals, progress_frame,
};
pub use calculations::streak::{DEFAULT_COMPLETION_WINDOW_DAYS, completion_rate, current_streak};
pub use config::{ConfigError, TrackerConfig};
pub use goal::{CompletionSet, Confirmation, Goal, TaskCompletion};
pub use goal_validation::{
    GoalValidationError, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, validate_completion_keys,
    validate_completions, validate_confirmations, validate_goal, validate_goal_collection,
};
pub use persistence::{
    PersistenceError, load_completions_from_csv, load_goals_from_csv, load_tracker_from_json,
    save_completions_to_csv, save_goals_to_csv, save_tracker_to_json,
};
pub use recurrence::{
    CustomDays, DAY_LABELS, Recurrence, RecurrenceConfig, RecurrenceError, day_of_week,
    is_active_on,
};
pub use tracker::{Tracker, TrackerError};
