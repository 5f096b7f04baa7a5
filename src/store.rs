use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::models::Task;

/// File stem for the task database. The version suffix is the only
/// migration mechanism: a future format change gets a new key.
const STORAGE_KEY: &str = "todo.items.v1";

/// Durable key-value slot holding the full task collection as a JSON array.
///
/// The store is an owned value passed to whoever needs persistence, rather
/// than ambient module state, so tests can point it at a scratch directory.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens the store at its default location.
    ///
    /// The path is determined in the following order:
    /// 1. `TODO_DB` environment variable.
    /// 2. `~/.local/share/taskpad/todo.items.v1.json` (on Linux).
    /// 3. `./todo.items.v1.json` (fallback).
    pub fn open_default() -> Store {
        let path = std::env::var("TODO_DB").map(PathBuf::from).unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("taskpad");
            if !p.exists() {
                let _ = fs::create_dir_all(&p);
            }
            p.push(format!("{STORAGE_KEY}.json"));
            p
        });
        Store { path }
    }

    /// Opens a store backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Store {
        Store { path: path.into() }
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all tasks, newest first.
    ///
    /// A missing, unreadable, or unparsable file yields an empty collection:
    /// there is no prior state to reconcile against and no user action to
    /// retry, so read failures degrade to a fresh start instead of erroring.
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task database yet, starting empty");
            return Vec::new();
        }
        let mut f = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "task database unreadable, starting empty");
                return Vec::new();
            }
        };
        let mut s = String::new();
        if f.read_to_string(&mut s).is_err() {
            warn!(path = %self.path.display(), "task database unreadable, starting empty");
            return Vec::new();
        }
        let mut tasks: Vec<Task> = match serde_json::from_str(&s) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "task database corrupt, starting empty");
                return Vec::new();
            }
        };
        // Storage order is insertion order; display order is newest first.
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = tasks.len(), "loaded tasks");
        tasks
    }

    /// Saves the full task collection, replacing any prior content.
    ///
    /// Unlike `load`, write failures propagate: swallowing one would claim a
    /// mutation persisted when it did not.
    pub fn save(&self, tasks: &[Task]) -> std::io::Result<()> {
        let s = serde_json::to_string_pretty(tasks).map_err(std::io::Error::other)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        debug!(count = tasks.len(), path = %self.path.display(), "saved tasks");
        Ok(())
    }

    /// Deletes the database file, if present.
    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
