//! `feedctl`: query, browse and inspect a travel video catalog from the
//! terminal.

pub mod commands;
pub mod error;
pub mod render;

pub use error::{CliError, Result};
