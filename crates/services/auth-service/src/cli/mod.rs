//! Command-line interface.
//!
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations

pub mod args;

pub use args::{Cli, Commands};
