use chrono::NaiveDate;
use habit_streaks::{
    Confirmation, Goal, GoalValidationError, Recurrence, TaskCompletion, Tracker, TrackerConfig,
    TrackerError,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tracker_with_read() -> Tracker {
    let mut tracker = Tracker::new();
    tracker
        .upsert_goal(Goal::new("read", "Read", Recurrence::Daily, d(2024, 1, 1)))
        .unwrap();
    tracker
}

#[test]
fn toggling_builds_and_breaks_streaks() {
    let mut tracker = tracker_with_read();
    let today = d(2024, 1, 8);
    for day in 6..=8 {
        tracker.set_completion("read", d(2024, 1, day), true).unwrap();
    }
    assert_eq!(tracker.current_streak("read", today).unwrap(), 3);

    tracker.set_completion("read", d(2024, 1, 7), false).unwrap();
    assert_eq!(tracker.current_streak("read", today).unwrap(), 1);
    // Unchecking keeps the record
    assert_eq!(tracker.completions_for("read").len(), 3);
    assert!(
        tracker
            .completions()
            .iter()
            .any(|c| c.date == d(2024, 1, 7) && !c.completed)
    );
}

#[test]
fn completion_records_stay_unique_per_day() {
    let mut tracker = tracker_with_read();
    let day = d(2024, 1, 3);
    tracker.set_completion("read", day, true).unwrap();
    tracker.set_completion("read", day, true).unwrap();
    tracker.set_completion("read", day, false).unwrap();
    tracker.set_completion("read", day, true).unwrap();
    assert_eq!(tracker.completions_for("read").len(), 1);
    assert!(tracker.completions()[0].completed);

    tracker.set_completion("read", d(2024, 1, 4), false).unwrap();
    assert_eq!(tracker.completions_for("read").len(), 1);
}

#[test]
fn unknown_goal_is_reported() {
    let mut tracker = tracker_with_read();
    assert_eq!(
        tracker.set_completion("nope", d(2024, 1, 1), true),
        Err(TrackerError::GoalNotFound("nope".into()))
    );
    assert!(tracker.current_streak("nope", d(2024, 1, 1)).is_err());
    assert!(tracker.archive_goal("nope").is_err());
    assert!(tracker.delete_goal("nope").is_err());
}

#[test]
fn upsert_validates_and_replaces() {
    let mut tracker = tracker_with_read();
    let err = tracker
        .upsert_goal(Goal::new("blank", "  ", Recurrence::Daily, d(2024, 1, 1)))
        .unwrap_err();
    assert_eq!(
        err,
        TrackerError::Invalid(GoalValidationError::EmptyTitle("blank".into()))
    );

    tracker
        .upsert_goal(Goal::new("read", "Read more", Recurrence::Weekdays, d(2024, 1, 1)))
        .unwrap();
    assert_eq!(tracker.goals().len(), 1);
    assert_eq!(tracker.goal("read").unwrap().title, "Read more");
    assert_eq!(tracker.goal("read").unwrap().recurrence, Recurrence::Weekdays);
}

#[test]
fn archiving_hides_goal_from_views_but_keeps_history() {
    let mut tracker = tracker_with_read();
    tracker
        .upsert_goal(Goal::new("gym", "Gym", Recurrence::Weekdays, d(2024, 1, 1)))
        .unwrap();
    let monday = d(2024, 1, 8);
    tracker.set_completion("read", monday, true).unwrap();

    tracker.archive_goal("read").unwrap();
    assert_eq!(tracker.active_goals().len(), 1);
    assert_eq!(tracker.archived_goals().len(), 1);
    assert_eq!(tracker.checklist(monday).items.len(), 1);
    assert_eq!(tracker.progress(monday).len(), 1);
    assert_eq!(tracker.overview(monday).total_goals, 1);
    // Streaks are still available for archived goals
    assert_eq!(tracker.current_streak("read", monday).unwrap(), 1);

    tracker.restore_goal("read").unwrap();
    assert_eq!(tracker.checklist(monday).items.len(), 2);
}

#[test]
fn deleting_goal_drops_its_completions() {
    let mut tracker = tracker_with_read();
    tracker.set_completion("read", d(2024, 1, 2), true).unwrap();
    tracker.delete_goal("read").unwrap();
    assert!(tracker.goals().is_empty());
    assert!(tracker.completions().is_empty());
}

#[test]
fn rate_uses_configured_window_unless_overridden() {
    let mut tracker = Tracker::with_config(TrackerConfig {
        completion_window_days: 7,
    });
    tracker
        .upsert_goal(Goal::new("read", "Read", Recurrence::Daily, d(2024, 1, 1)))
        .unwrap();
    let today = d(2024, 1, 31);
    tracker.set_completion("read", today, true).unwrap();

    assert_eq!(tracker.completion_rate("read", today, None).unwrap(), 14);
    assert_eq!(tracker.completion_rate("read", today, Some(30)).unwrap(), 3);
    assert_eq!(tracker.progress(today)[0].completion_rate, 14);
}

#[test]
fn from_parts_rejects_inconsistent_records() {
    let goals = vec![
        Goal::new("read", "Read", Recurrence::Daily, d(2024, 1, 1)),
        Goal::new("read", "Read again", Recurrence::Daily, d(2024, 1, 1)),
    ];
    assert_eq!(
        Tracker::from_parts(goals, Vec::new()).unwrap_err(),
        TrackerError::Invalid(GoalValidationError::DuplicateGoal("read".into()))
    );

    let goals = vec![Goal::new("read", "Read", Recurrence::Daily, d(2024, 1, 1))];
    let orphan = vec![TaskCompletion::done("gym", d(2024, 1, 2))];
    assert!(matches!(
        Tracker::from_parts(goals.clone(), orphan),
        Err(TrackerError::Invalid(GoalValidationError::UnknownGoal { .. }))
    ));

    let doubled = vec![
        TaskCompletion::done("read", d(2024, 1, 2)),
        TaskCompletion::new("read", d(2024, 1, 2), false),
    ];
    assert!(matches!(
        Tracker::from_parts(goals, doubled),
        Err(TrackerError::Invalid(GoalValidationError::DuplicateCompletion { .. }))
    ));
}

#[test]
fn month_grid_reflects_tracker_state() {
    let mut tracker = tracker_with_read();
    tracker.set_completion("read", d(2024, 1, 15), true).unwrap();
    let grid = tracker.month_grid(2024, 1).unwrap();
    let cell = grid.cell(d(2024, 1, 15)).unwrap();
    assert!(cell.completion.unwrap().all_done());
    assert!(tracker.month_grid(2024, 13).is_none());
}

#[test]
fn editing_a_goal_keeps_its_creation_date_and_archive_flag() {
    let mut tracker = tracker_with_read();
    let today = d(2024, 2, 29);
    for day in 27..=29 {
        tracker.set_completion("read", d(2024, 2, day), true).unwrap();
    }
    tracker.archive_goal("read").unwrap();
    assert_eq!(tracker.current_streak("read", today).unwrap(), 3);

    let mut edited = Goal::new("read", "Read daily", Recurrence::Daily, d(2024, 3, 1));
    edited.description = Some("Before bed".into());
    tracker.upsert_goal(edited).unwrap();

    let goal = tracker.goal("read").unwrap();
    assert_eq!(goal.title, "Read daily");
    assert_eq!(goal.description.as_deref(), Some("Before bed"));
    assert_eq!(goal.created_at, d(2024, 1, 1));
    assert!(goal.archived);
    assert_eq!(tracker.current_streak("read", today).unwrap(), 3);
}

#[test]
fn friends_confirm_completed_days_once() {
    let mut tracker = tracker_with_read();
    let day = d(2024, 1, 8);
    tracker.set_completion("read", day, true).unwrap();

    tracker.confirm("read", day, "ana").unwrap();
    tracker.confirm("read", day, "ben").unwrap();
    assert_eq!(
        tracker.confirm("read", day, "ana"),
        Err(TrackerError::AlreadyConfirmed {
            goal_id: "read".into(),
            date: day,
            confirmed_by: "ana".into(),
        })
    );
    let confirmers: Vec<&str> = tracker
        .confirmations_for("read", day)
        .into_iter()
        .map(|c| c.confirmed_by.as_str())
        .collect();
    assert_eq!(confirmers, vec!["ana", "ben"]);
}

#[test]
fn only_completed_days_can_be_confirmed() {
    let mut tracker = tracker_with_read();
    let day = d(2024, 1, 8);
    assert_eq!(
        tracker.confirm("read", day, "ana"),
        Err(TrackerError::NotCompleted {
            goal_id: "read".into(),
            date: day,
        })
    );

    tracker.set_completion("read", day, true).unwrap();
    tracker.set_completion("read", day, false).unwrap();
    assert!(matches!(
        tracker.confirm("read", day, "ana"),
        Err(TrackerError::NotCompleted { .. })
    ));
    assert!(matches!(
        tracker.confirm("gym", day, "ana"),
        Err(TrackerError::GoalNotFound(_))
    ));
    assert!(matches!(
        tracker.confirm("read", day, "  "),
        Err(TrackerError::Invalid(GoalValidationError::EmptyConfirmer { .. }))
    ));
}

#[test]
fn unconfirm_removes_only_that_friend() {
    let mut tracker = tracker_with_read();
    let day = d(2024, 1, 8);
    tracker.set_completion("read", day, true).unwrap();
    tracker.confirm("read", day, "ana").unwrap();
    tracker.confirm("read", day, "ben").unwrap();

    assert!(tracker.unconfirm("read", day, "ana").unwrap());
    assert!(!tracker.unconfirm("read", day, "ana").unwrap());
    assert_eq!(tracker.confirmations_for("read", day).len(), 1);
    // A withdrawn confirmation can be given again
    tracker.confirm("read", day, "ana").unwrap();
    assert_eq!(tracker.confirmations().len(), 2);

    tracker.delete_goal("read").unwrap();
    assert!(tracker.confirmations().is_empty());
}

#[test]
fn stored_confirmations_are_validated() {
    let day = d(2024, 1, 8);
    let goals = vec![Goal::new("read", "Read", Recurrence::Daily, d(2024, 1, 1))];
    let completions = vec![TaskCompletion::done("read", day)];

    let tracker = Tracker::from_parts(goals.clone(), completions.clone())
        .unwrap()
        .with_confirmations(vec![Confirmation::new("read", day, "ana")])
        .unwrap();
    assert_eq!(tracker.confirmations().len(), 1);

    let dangling = Tracker::from_parts(goals, completions)
        .unwrap()
        .with_confirmations(vec![Confirmation::new("read", d(2024, 1, 9), "ana")]);
    assert!(matches!(
        dangling,
        Err(TrackerError::Invalid(GoalValidationError::UnknownCompletion { .. }))
    ));
}
