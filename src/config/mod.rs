//! Configuration loading and schema.
//!
//! Tally keeps one YAML file at `<home>/config.yml`, where `<home>` is
//! `$TALLY_HOME` or `~/.config/tally`. Missing file means defaults; a file
//! that exists but does not parse is an error, never silently ignored.

pub mod loader;
pub mod schema;

pub use loader::{config_path, tally_home};
pub use schema::Config;
