use crate::goal::{CompletionSet, Goal, TaskCompletion};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub goal_id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChecklist {
    pub date: NaiveDate,
    pub items: Vec<ChecklistItem>,
}

impl DailyChecklist {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    pub fn all_done(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCompletion {
    pub completed: usize,
    pub total: usize,
}

impl DayCompletion {
    pub fn all_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    pub fn partially_done(&self) -> bool {
        self.completed > 0 && self.completed < self.total
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub completion: Option<DayCompletion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Sunday-first rows of seven cells.
    pub weeks: Vec<Vec<CalendarCell>>,
}

impl MonthGrid {
    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flatten()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        self.cells().find(|cell| cell.date == date)
    }
}

fn is_completed_on(goal_id: &str, completions: &[TaskCompletion], date: NaiveDate) -> bool {
    completions
        .iter()
        .any(|c| c.completed && c.date == date && c.goal_id == goal_id)
}

/// Goals due on `date`, archived goals excluded, in input order.
pub fn daily_checklist(
    goals: &[Goal],
    completions: &[TaskCompletion],
    date: NaiveDate,
) -> DailyChecklist {
    let items = goals
        .iter()
        .filter(|goal| !goal.archived && goal.is_active_on(date))
        .map(|goal| ChecklistItem {
            goal_id: goal.id.clone(),
            title: goal.title.clone(),
            completed: is_completed_on(&goal.id, completions, date),
        })
        .collect();
    DailyChecklist { date, items }
}

/// Completed/total over the goals due on `date`; `None` when nothing is due.
pub fn day_completion(
    goals: &[Goal],
    completions: &[TaskCompletion],
    date: NaiveDate,
) -> Option<DayCompletion> {
    let checklist = daily_checklist(goals, completions, date);
    if checklist.is_empty() {
        return None;
    }
    Some(DayCompletion {
        completed: checklist.completed_count(),
        total: checklist.items.len(),
    })
}

/// Sunday-first calendar weeks covering `year`/`month`, each day annotated
/// with its completion counts. Returns `None` for an invalid month.
///
/// Weeks hold seven cells except where the grid runs into the first or last
/// date chrono can represent.
pub fn month_grid(
    goals: &[Goal],
    completions: &[TaskCompletion],
    year: i32,
    month: u32,
) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);

    let lead = Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let trail = Duration::days(i64::from(6 - last.weekday().num_days_from_sunday()));
    let grid_start = first.checked_sub_signed(lead).unwrap_or(NaiveDate::MIN);
    let grid_end = last.checked_add_signed(trail).unwrap_or(NaiveDate::MAX);

    let live_goals: Vec<&Goal> = goals.iter().filter(|goal| !goal.archived).collect();
    let sets: Vec<CompletionSet> = live_goals
        .iter()
        .map(|goal| CompletionSet::for_goal(&goal.id, completions))
        .collect();

    let mut weeks = Vec::new();
    let mut week = Vec::with_capacity(7);
    let mut cursor = Some(grid_start);
    while let Some(current) = cursor.filter(|date| *date <= grid_end) {
        let mut total = 0;
        let mut completed = 0;
        for (goal, set) in live_goals.iter().zip(&sets) {
            if goal.is_active_on(current) {
                total += 1;
                if set.contains(current) {
                    completed += 1;
                }
            }
        }
        week.push(CalendarCell {
            date: current,
            in_month: current.month() == month && current.year() == year,
            completion: (total > 0).then_some(DayCompletion { completed, total }),
        });
        if week.len() == 7 {
            weeks.push(std::mem::replace(&mut week, Vec::with_capacity(7)));
        }
        cursor = current.succ_opt();
    }
    if !week.is_empty() {
        weeks.push(week);
    }

    Some(MonthGrid { year, month, weeks })
}
