#![forbid(unsafe_code)]

//! Terminal frontend for the sortviz engine.
//!
//! # Key Components
//!
//! - [`cli::Opts`] - Command-line and `SORTVIZ_*` environment options
//! - [`session::TerminalSession`] - Raw-mode guard with panic and signal cleanup
//! - [`view`] - Bar chart layout and crossterm rendering
//! - [`app::App`] - Key bindings and cooperative run driving
//! - [`logging`] - File-backed `tracing` subscriber

pub mod app;
pub mod cli;
pub mod logging;
pub mod session;
pub mod view;
