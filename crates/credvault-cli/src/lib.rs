//! # credvault-cli
//!
//! Command line front-end for credvault-core. Owns the startup step that
//! decides which secret store backs the master key.

pub mod cli;
pub mod commands;
pub mod error;
pub mod wiring;

pub use error::{CliError, Result};
pub use wiring::{build_key_manager, select_store};
