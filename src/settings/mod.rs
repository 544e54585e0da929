//! CLI arguments, layered settings and the signing secrets.

mod cli;
pub use clap::{Parser, Subcommand};
pub use cli::*;

mod secrets;
pub use secrets::*;

mod settings;
pub use settings::*;
