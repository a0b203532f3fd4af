//! Command-line entry points.
//!
//! Running `tms` without a subcommand opens the interactive menu.

pub mod init;
pub mod menu;
pub mod migrations;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Open the interactive account and task menu")]
    Menu,
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Inspect the database schema version")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command.unwrap_or(Commands::Menu) {
            Commands::Menu => menu::cmd(),
            Commands::Init(args) => init::cmd(args),
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["tms"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_migrations_subcommands_parse() {
        let cli = Cli::try_parse_from(["tms", "migrations", "history"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Migrations(_))));
        assert!(Cli::try_parse_from(["tms", "migrations"]).is_err());
    }
}
