//! lexi: terminal legal Q&A assistant
//!
//! This library provides:
//! - The conversation and citation-modal state machines
//! - Answer backends (simulated canned answer, HTTP JSON endpoint)
//! - A ratatui chat UI with declarative keyboard shortcuts
//! - The headless `ask` command

pub mod backend;
pub mod config;
pub mod core;
pub mod transport;
pub mod tui;

pub use config::Config;
