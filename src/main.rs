//! # taskpad
//!
//! A small terminal to-do list. Quick CLI for scripted use, interactive TUI
//! for everything else.
//!
//! ## Usage
//!
//! ### Interactive mode (TUI)
//!
//! Run the command without arguments to launch the interactive UI:
//!
//! ```bash
//! taskpad
//! # or explicitly
//! taskpad ui
//! ```
//!
//! #### TUI key bindings
//!
//! *   `q`: Quit
//! *   `a`: Add new task (title, then optional description)
//! *   `Space`: Toggle done on the selected task
//! *   `t`: Edit title
//! *   `e`: Edit description
//! *   `d`: Delete selected task
//! *   `c`: Show/hide completed tasks
//!
//! ### Command line interface (CLI)
//!
//! ```bash
//! # Add a task
//! taskpad add "Buy milk" -d "Semi-skimmed, two pints"
//!
//! # List open tasks (newest first); --all includes completed ones
//! taskpad list
//! taskpad list --all
//!
//! # Toggle completion
//! taskpad done <ID>
//!
//! # Edit fields
//! taskpad edit <ID> --title "Buy oat milk"
//!
//! # Remove a task
//! taskpad remove <ID>
//! ```
//!
//! ## Data storage
//!
//! Tasks are saved as a JSON array in your local data directory:
//! *   Linux: `~/.local/share/taskpad/todo.items.v1.json`
//! *   macOS: `~/Library/Application Support/taskpad/todo.items.v1.json`
//! *   Windows: `%APPDATA%\taskpad\todo.items.v1.json`
//!
//! You can override this by setting the `TODO_DB` environment variable.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::EnvFilter;

use taskpad::commands::*;
use taskpad::manager::TaskManager;
use taskpad::store::Store;
use taskpad::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "Simple terminal to-do list", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Optional longer description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List tasks, newest first
    List {
        /// Show completed tasks too
        #[arg(short, long)]
        all: bool,
    },
    /// Toggle a task between done and pending
    Done {
        id: u64,
    },
    /// Edit a task's title and/or description
    Edit {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Reset the database (delete all tasks)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut mgr = TaskManager::new(Store::open_default());
    match cli.command {
        Some(Commands::Add { title, description }) => cmd_add(&mut mgr, title, description, false),
        Some(Commands::List { all }) => cmd_list(&mgr, all),
        Some(Commands::Done { id }) => cmd_done(&mut mgr, id, false),
        Some(Commands::Edit { id, title, description }) => {
            cmd_edit(&mut mgr, id, title, description, false)
        }
        Some(Commands::Remove { id }) => cmd_remove(&mut mgr, id, false),
        Some(Commands::Reset { force }) => cmd_reset(&mgr, force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskpad", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(mgr) {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
