//! Core library for taskpad: the task model, the JSON-backed store, the
//! manager that mediates every mutation, and the CLI command handlers.
//!
//! The binary in `main.rs` (CLI dispatch plus the TUI) is a thin consumer
//! of [`manager::TaskManager`].

pub mod commands;
pub mod manager;
pub mod models;
pub mod store;
pub mod tui;
