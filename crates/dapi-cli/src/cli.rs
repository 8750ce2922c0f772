//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dapi::ClassType;

#[derive(Parser)]
#[command(name = "dapi")]
#[command(version, about = "Destiny platform API client")]
pub struct Cli {
    /// Platform API key (falls back to the credentials file, then a prompt)
    #[arg(long, env = "DAPI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// User profile file
    #[arg(long, env = "DAPI_PROFILE", global = true)]
    pub profile: Option<PathBuf>,

    /// Configuration file
    #[arg(long, env = "DAPI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Override the platform endpoint
    #[arg(long, env = "DAPI_BASE_URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search for a player by display name
    Search {
        username: String,
    },

    /// Resolve a player and store it as the local profile
    SetUser {
        username: String,

        /// Replace an existing profile
        #[arg(short, long)]
        force: bool,
    },

    /// Show the stored profile
    Whoami,

    /// Print the account summary
    Account {
        #[arg(long)]
        membership_id: Option<String>,
    },

    /// List the characters of an account
    Characters {
        #[arg(long)]
        membership_id: Option<String>,
    },

    /// Show one character
    Character {
        /// Character id
        #[arg(long, conflicts_with = "class")]
        id: Option<String>,

        /// Character class (titan, hunter, warlock)
        #[arg(long)]
        class: Option<ClassType>,

        #[arg(long)]
        membership_id: Option<String>,
    },

    /// Show inventories (all characters of the profile unless one is given)
    Inventory {
        #[arg(long)]
        character_id: Option<String>,

        #[arg(long)]
        membership_id: Option<String>,

        /// World manifest database used to resolve item names
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// World manifest operations
    #[command(subcommand)]
    Manifest(ManifestCommand),
}

#[derive(Subcommand)]
pub enum ManifestCommand {
    /// Download the world content database
    Fetch {
        /// Content language
        #[arg(short, long)]
        language: Option<String>,

        /// Where to keep the database
        #[arg(short, long, default_value = "world_content.sqlite")]
        output: PathBuf,
    },

    /// List the tables of a world content database
    Tables {
        #[arg(long)]
        db: PathBuf,
    },

    /// Print a table, or one definition of it
    Show {
        #[arg(long)]
        db: PathBuf,

        #[arg(long)]
        table: String,

        /// Unsigned definition hash
        #[arg(long)]
        hash: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_character_class() {
        let cli = Cli::parse_from(["dapi", "character", "--class", "Warlock"]);
        match cli.command {
            Command::Character { class, id, .. } => {
                assert_eq!(class, Some(ClassType::Warlock));
                assert!(id.is_none());
            }
            _ => panic!("expected character command"),
        }
    }

    #[test]
    fn test_id_conflicts_with_class() {
        let result = Cli::try_parse_from(["dapi", "character", "--id", "1", "--class", "titan"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_manifest_show() {
        let cli = Cli::parse_from([
            "dapi",
            "manifest",
            "show",
            "--db",
            "world.content",
            "--table",
            "DestinyClassDefinition",
            "--hash",
            "4294967295",
        ]);
        match cli.command {
            Command::Manifest(ManifestCommand::Show { hash, table, .. }) => {
                assert_eq!(hash, Some(4_294_967_295));
                assert_eq!(table, "DestinyClassDefinition");
            }
            _ => panic!("expected manifest show"),
        }
    }
}
