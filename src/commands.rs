use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::manager::{TaskError, TaskManager};
use crate::models::Task;

/// Adds a new task.
pub fn cmd_add(mgr: &mut TaskManager, title: String, description: Option<String>, silent: bool) {
    match mgr.add(&title, description.as_deref().unwrap_or("")) {
        Ok(t) => {
            if !silent {
                println!("Task added (id = {})", t.id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Marks a task done, or pending again if it was already done.
pub fn cmd_done(mgr: &mut TaskManager, id: u64, silent: bool) {
    match mgr.toggle_done(id) {
        Ok(t) => {
            if !silent {
                if t.done {
                    println!("Task {} marked as done.", id);
                } else {
                    println!("Task {} marked as pending.", id);
                }
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Edits the title and/or description of a task.
///
/// Omitted fields keep their current value.
pub fn cmd_edit(
    mgr: &mut TaskManager,
    id: u64,
    title: Option<String>,
    description: Option<String>,
    silent: bool,
) {
    let Some(current) = mgr.get(id).cloned() else {
        if !silent {
            eprintln!("{}", TaskError::NotFound(id));
        }
        return;
    };
    let title = title.unwrap_or(current.title);
    let description = description.unwrap_or(current.description);
    match mgr.update(id, &title, &description) {
        Ok(_) => {
            if !silent {
                println!("Task {} updated.", id);
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

/// Removes a task by id.
pub fn cmd_remove(mgr: &mut TaskManager, id: u64, silent: bool) {
    let known = mgr.get(id).is_some();
    match mgr.remove(id) {
        Ok(()) => {
            if !silent {
                if known {
                    println!("Task {} removed.", id);
                } else {
                    eprintln!("Task {} not found.", id);
                }
            }
        }
        Err(e) => {
            if !silent {
                eprintln!("{}", e);
            }
        }
    }
}

fn format_ms(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Lists tasks in a formatted table, newest first.
///
/// By default, hides completed tasks unless `all` is true.
pub fn cmd_list(mgr: &TaskManager, all: bool) {
    let mut tasks: Vec<Task> = mgr.list_ordered();
    if !all {
        tasks.retain(|t| !t.done);
    }
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
            Cell::new("Updated").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status = if t.done { "Done" } else { "Pending" };
        let status_color = if t.done { Color::Green } else { Color::Yellow };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(&t.description),
            Cell::new(format_ms(t.created_at)),
            Cell::new(format_ms(t.updated_at)),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Deletes the whole database after confirmation.
pub fn cmd_reset(mgr: &TaskManager, force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return;
        }
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = mgr.store().delete() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
