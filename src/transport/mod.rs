//! Entry points the binary dispatches to

pub mod cli;
