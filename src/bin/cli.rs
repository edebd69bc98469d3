use chrono::{Local, NaiveDate};
use habit_streaks::{
    DailyChecklist, Goal, MonthGrid, Recurrence, Tracker, TrackerConfig, load_completions_from_csv,
    load_goals_from_csv, load_tracker_from_json, progress_frame, save_completions_to_csv,
    save_goals_to_csv, save_tracker_to_json,
};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .init();
}

fn cell_text(av: &AnyValue<'_>) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(av) = col.get(row_idx) {
                widths[ci] = widths[ci].max(cell_text(&av).len());
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push_str(&format!(" {:<width$} |", name, width = widths[i]));
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let s = col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default();
            out.push_str(&format!(" {:<width$} |", s, width = widths[ci]));
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  today [YYYY-MM-DD]                 Show or pin the date used as today\n  goal add <id> <recurrence> <YYYY-MM-DD> <title...>\n                                     Upsert a goal (recurrence: daily|weekdays|weekends|custom:0,3)\n  goal list                          List goals with their recurrence\n  goal archive <id>                  Archive a goal\n  goal restore <id>                  Restore an archived goal\n  goal delete <id>                   Delete a goal and its completions\n  recurrences                        List recurrence kinds\n  done <id> [YYYY-MM-DD]             Mark a goal completed (default today)\n  undo <id> [YYYY-MM-DD]             Mark a goal not completed (default today)\n  confirm <id> <friend> [YYYY-MM-DD] Record a friend confirming a completed day\n  unconfirm <id> <friend> [YYYY-MM-DD]\n                                     Withdraw a friend's confirmation\n  confirmations <id> [YYYY-MM-DD]    List who confirmed a day\n  streak <id>                        Show current streak\n  rate <id> [window_days]            Show completion rate\n  checklist [YYYY-MM-DD]             Show goals due on a date\n  calendar <YYYY-MM>                 Show a month of completion counts\n  stats                              Show dashboard totals\n  show                               Show progress table\n  config show                        Show tracker config\n  config load <json_path>            Load tracker config from JSON file\n  config save <json_path>            Save tracker config to JSON file\n  save json <path>                   Persist tracker to JSON\n  save csv <goals_path> <completions_path>\n                                     Export goals and completions to CSV\n  load json <path>                   Load tracker from JSON\n  load csv <goals_path> <completions_path>\n                                     Import goals and completions from CSV\n  quit|exit                          Exit"
    );
}

fn print_recurrences() {
    println!("Available recurrences:");
    for (key, description) in Recurrence::variants() {
        println!("  {:<10} {}", key, description);
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn parse_month(input: &str) -> Option<(i32, u32)> {
    let (year, month) = input.split_once('-')?;
    Some((year.parse().ok()?, month.parse().ok()?))
}

fn print_goals(tracker: &Tracker) {
    if tracker.goals().is_empty() {
        println!("No goals yet.");
        return;
    }
    for goal in tracker.goals() {
        let archived = if goal.archived { " [archived]" } else { "" };
        println!(
            "  {:<12} {:<24} {:<24} since {}{}",
            goal.id,
            goal.title,
            goal.recurrence.describe(),
            goal.created_at,
            archived
        );
    }
}

fn print_checklist(checklist: &DailyChecklist) {
    println!("Checklist for {}", checklist.date.format("%A, %B %-d, %Y"));
    if checklist.is_empty() {
        println!("No goals for this day.");
        return;
    }
    if checklist.all_done() {
        println!("All done for today!");
    }
    for item in &checklist.items {
        let mark = if item.completed { "x" } else { " " };
        println!("  [{}] {} ({})", mark, item.title, item.goal_id);
    }
}

fn print_month(grid: &MonthGrid) {
    println!("{:04}-{:02}", grid.year, grid.month);
    println!(
        "{}",
        habit_streaks::DAY_LABELS
            .iter()
            .map(|label| format!("{:>7}", label))
            .collect::<String>()
    );
    for week in &grid.weeks {
        let mut line = String::new();
        for cell in week {
            let text = match (cell.in_month, cell.completion) {
                (false, _) => String::from("."),
                (true, Some(c)) => format!("{}:{}/{}", cell.date.format("%-d"), c.completed, c.total),
                (true, None) => cell.date.format("%-d").to_string(),
            };
            line.push_str(&format!("{:>7}", text));
        }
        println!("{}", line);
    }
}

fn show_progress(tracker: &Tracker, today: NaiveDate) {
    let progress = tracker.progress(today);
    match progress_frame(&progress) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error building progress table: {}", e),
    }
}

fn main() {
    init_tracing();

    let config = match TrackerConfig::default().with_env_overrides() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring invalid config override");
            TrackerConfig::default()
        }
    };
    let mut tracker = Tracker::with_config(config);
    let mut today = Local::now().date_naive();

    println!("Habit Streaks (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "recurrences" => print_recurrences(),
            "today" => match parts.next() {
                Some(date_s) => match parse_date(date_s) {
                    Some(date) => {
                        today = date;
                        println!("Today set to {today}.");
                    }
                    None => println!("Invalid date (YYYY-MM-DD)"),
                },
                None => println!("Today is {today}."),
            },
            "goal" => match parts.next() {
                Some("add") => {
                    let id_s = parts.next();
                    let rec_s = parts.next();
                    let created_s = parts.next();
                    let title = parts.collect::<Vec<_>>().join(" ");
                    match (id_s, rec_s, created_s) {
                        (Some(id), Some(rec_s), Some(created_s)) if !title.is_empty() => {
                            let recurrence: Recurrence = match rec_s.parse() {
                                Ok(r) => r,
                                Err(e) => {
                                    println!("Error: {}", e);
                                    continue;
                                }
                            };
                            let Some(created_at) = parse_date(created_s) else {
                                println!("Invalid date (YYYY-MM-DD)");
                                continue;
                            };
                            let goal = Goal::new(id, title, recurrence, created_at);
                            match tracker.upsert_goal(goal) {
                                Ok(()) => println!("Goal {id} saved."),
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                        _ => println!(
                            "Usage: goal add <id> <recurrence> <YYYY-MM-DD> <title...>"
                        ),
                    }
                }
                Some("list") => print_goals(&tracker),
                Some(action @ ("archive" | "restore" | "delete")) => match parts.next() {
                    Some(id) => {
                        let res = match action {
                            "archive" => tracker.archive_goal(id),
                            "restore" => tracker.restore_goal(id),
                            _ => tracker.delete_goal(id),
                        };
                        match res {
                            Ok(()) => println!("Goal {id} {action}d."),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    None => println!("Usage: goal {action} <id>"),
                },
                _ => println!("Usage: goal <add|list|archive|restore|delete> ..."),
            },
            "done" | "undo" => {
                let Some(id) = parts.next() else {
                    println!("Usage: {cmd} <id> [YYYY-MM-DD]");
                    continue;
                };
                let date = match parts.next() {
                    Some(date_s) => match parse_date(date_s) {
                        Some(date) => date,
                        None => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => today,
                };
                let completed = cmd == "done";
                match tracker.set_completion(id, date, completed) {
                    Ok(()) => {
                        let state = if completed { "completed" } else { "not completed" };
                        println!("Goal {id} marked {state} on {date}.");
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "streak" => match parts.next() {
                Some(id) => match tracker.current_streak(id, today) {
                    Ok(streak) => {
                        let plural = if streak == 1 { "" } else { "s" };
                        println!("Streak for {id}: {streak} day{plural}");
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: streak <id>"),
            },
            "rate" => {
                let Some(id) = parts.next() else {
                    println!("Usage: rate <id> [window_days]");
                    continue;
                };
                let window = match parts.next().map(str::parse::<u32>) {
                    Some(Ok(days)) => Some(days),
                    Some(Err(_)) => {
                        println!("Invalid window_days");
                        continue;
                    }
                    None => None,
                };
                let shown = window.unwrap_or(tracker.config().completion_window_days);
                match tracker.completion_rate(id, today, window) {
                    Ok(rate) => println!("Completion rate for {id}: {rate}% ({shown}d)"),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "checklist" => {
                let date = match parts.next() {
                    Some(date_s) => match parse_date(date_s) {
                        Some(date) => date,
                        None => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => today,
                };
                print_checklist(&tracker.checklist(date));
            }
            "confirm" | "unconfirm" | "confirmations" => {
                let usage = if cmd == "confirmations" {
                    "Usage: confirmations <id> [YYYY-MM-DD]".to_string()
                } else {
                    format!("Usage: {cmd} <id> <friend> [YYYY-MM-DD]")
                };
                let Some(id) = parts.next() else {
                    println!("{usage}");
                    continue;
                };
                let friend = if cmd == "confirmations" {
                    None
                } else {
                    match parts.next() {
                        Some(friend) => Some(friend),
                        None => {
                            println!("{usage}");
                            continue;
                        }
                    }
                };
                let date = match parts.next() {
                    Some(date_s) => match parse_date(date_s) {
                        Some(date) => date,
                        None => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => today,
                };
                match (cmd, friend) {
                    ("confirm", Some(friend)) => match tracker.confirm(id, date, friend) {
                        Ok(()) => println!("Goal {id} on {date} confirmed by {friend}."),
                        Err(e) => println!("Error: {}", e),
                    },
                    ("unconfirm", Some(friend)) => match tracker.unconfirm(id, date, friend) {
                        Ok(true) => println!("Removed {friend}'s confirmation of {id} on {date}."),
                        Ok(false) => println!("{friend} had not confirmed {id} on {date}."),
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => {
                        let confirmers: Vec<&str> = tracker
                            .confirmations_for(id, date)
                            .into_iter()
                            .map(|c| c.confirmed_by.as_str())
                            .collect();
                        if confirmers.is_empty() {
                            println!("No confirmations for {id} on {date}.");
                        } else {
                            println!("Confirmed {id} on {date}: {}", confirmers.join(", "));
                        }
                    }
                }
            }
            "calendar" => {
                let month = parts.next().and_then(parse_month);
                match month.and_then(|(y, m)| tracker.month_grid(y, m)) {
                    Some(grid) => print_month(&grid),
                    None => println!("Usage: calendar <YYYY-MM>"),
                }
            }
            "stats" => println!("Overview ({})", tracker.overview(today).to_cli_summary()),
            "show" => show_progress(&tracker, today),
            "config" => match (parts.next(), parts.next()) {
                (Some("show"), _) => println!(
                    "Completion window  : {} days",
                    tracker.config().completion_window_days
                ),
                (Some("load"), Some(path)) => match TrackerConfig::load_from_json(path) {
                    Ok(config) => {
                        tracker.set_config(config);
                        println!("Config loaded from {path}.");
                    }
                    Err(e) => println!("Error loading config: {}", e),
                },
                (Some("save"), Some(path)) => match tracker.config().save_to_json(path) {
                    Ok(()) => println!("Config saved to {path}."),
                    Err(e) => println!("Error saving config: {}", e),
                },
                _ => println!("Usage: config <show|load <json_path>|save <json_path>>"),
            },
            "save" => match (parts.next(), parts.next(), parts.next()) {
                (Some("json"), Some(path), _) => match save_tracker_to_json(&tracker, path) {
                    Ok(()) => println!("Tracker saved to {path}."),
                    Err(e) => println!("Error saving tracker: {}", e),
                },
                (Some("csv"), Some(goals_path), Some(completions_path)) => {
                    let res = save_goals_to_csv(tracker.goals(), goals_path).and_then(|_| {
                        save_completions_to_csv(tracker.completions(), completions_path)
                    });
                    match res {
                        Ok(()) => println!("Tracker exported to {goals_path} and {completions_path}."),
                        Err(e) => println!("Error exporting tracker: {}", e),
                    }
                }
                _ => println!("Usage: save json <path> | save csv <goals_path> <completions_path>"),
            },
            "load" => match (parts.next(), parts.next(), parts.next()) {
                (Some("json"), Some(path), _) => match load_tracker_from_json(path) {
                    Ok(loaded) => {
                        tracker = loaded;
                        println!("Tracker loaded from {path}.");
                    }
                    Err(e) => println!("Error loading tracker: {}", e),
                },
                (Some("csv"), Some(goals_path), Some(completions_path)) => {
                    let loaded = load_goals_from_csv(goals_path).and_then(|goals| {
                        let completions = load_completions_from_csv(completions_path)?;
                        Ok(Tracker::from_parts(goals, completions)?)
                    });
                    match loaded {
                        Ok(mut loaded) => {
                            loaded.set_config(*tracker.config());
                            tracker = loaded;
                            println!("Tracker imported from {goals_path} and {completions_path}.");
                        }
                        Err(e) => println!("Error importing tracker: {}", e),
                    }
                }
                _ => println!("Usage: load json <path> | load csv <goals_path> <completions_path>"),
            },
            _ => println!("Unknown command '{cmd}'. Type 'help' for commands."),
        }
    }
}
