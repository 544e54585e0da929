use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Issues, refreshes and revokes bearer tokens")]
pub struct Cli {
    /// Settings file; without it `settings/dev.toml` (or `release.toml`) is used when present
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Delete revoked and expired refresh tokens once, then exit
    Sweep,
    /// Print the refresh tokens stored for a user
    Tokens { username: String },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
