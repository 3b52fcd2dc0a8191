//! Library side of the `hps` command-line tool.
//!
//! The binary in `main.rs` only parses arguments and dispatches; everything
//! here is reusable from tests.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod summary;
pub mod types;
