//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Hoard - persistence tier for bot features
///
/// Inspects and maintains the record files and the artifact cache that
/// bot features share.
#[derive(Parser, Debug)]
#[command(name = "hoard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "HOARD_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Inspect and maintain the artifact cache
    Cache(CacheArgs),

    /// Show or change guild permissions
    Perms(PermsArgs),

    /// Show or change a user's voice preference
    Voice(VoiceArgs),
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached artifacts, least recently used first
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show cache usage against its limit
    Stats,

    /// Evict least recently used artifacts until within the limit
    Prune,

    /// Remove every cached artifact
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the cache file name for a set of inputs
    Name {
        /// File extension of the artifact
        extension: String,

        /// Inputs, in the order the producing feature hashes them
        #[arg(required = true)]
        inputs: Vec<String>,
    },
}

/// Arguments for the perms command
#[derive(Parser, Debug)]
pub struct PermsArgs {
    /// Subcommand for perms
    #[command(subcommand)]
    pub action: PermsAction,
}

/// Perms subcommands
#[derive(Subcommand, Debug)]
pub enum PermsAction {
    /// Show a guild's permissions
    Show {
        /// Guild ID
        gid: u64,
    },

    /// Restrict a guild to admins
    Lock {
        /// Guild ID
        gid: u64,
    },

    /// Lift an admin-only restriction
    Unlock {
        /// Guild ID
        gid: u64,
    },

    /// Grant or revoke admin rights
    Admin {
        /// Guild ID
        gid: u64,
        /// User ID
        uid: u64,
        /// Revoke instead of grant
        #[arg(long)]
        remove: bool,
    },

    /// Add or remove a user from the blacklist
    Blacklist {
        /// Guild ID
        gid: u64,
        /// User ID
        uid: u64,
        /// Remove instead of add
        #[arg(long)]
        remove: bool,
    },
}

/// Arguments for the voice command
#[derive(Parser, Debug)]
pub struct VoiceArgs {
    /// Guild ID
    pub gid: u64,

    /// User ID
    pub uid: u64,

    /// Voice to use
    #[arg(long)]
    pub set_voice: Option<String>,

    /// Playback speed (0.25 to 4.0)
    #[arg(long)]
    pub set_speed: Option<f32>,

    /// Forget the stored preference
    #[arg(long, conflicts_with_all = ["set_voice", "set_speed"])]
    pub reset: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_cache_list_format() {
        let cli = Cli::parse_from(["hoard", "cache", "list", "--format", "json"]);
        match cli.command {
            Commands::Cache(CacheArgs {
                action: CacheAction::List { format },
            }) => assert!(matches!(format, OutputFormat::Json)),
            _ => panic!("expected Cache List command"),
        }
    }

    #[test]
    fn cli_parses_cache_name_inputs() {
        let cli = Cli::parse_from(["hoard", "cache", "name", "mp3", "hello", "en-US"]);
        match cli.command {
            Commands::Cache(CacheArgs {
                action: CacheAction::Name { extension, inputs },
            }) => {
                assert_eq!(extension, "mp3");
                assert_eq!(inputs, vec!["hello", "en-US"]);
            }
            _ => panic!("expected Cache Name command"),
        }
    }

    #[test]
    fn cli_requires_name_inputs() {
        assert!(Cli::try_parse_from(["hoard", "cache", "name", "mp3"]).is_err());
    }

    #[test]
    fn cli_parses_perms_admin_remove() {
        let cli = Cli::parse_from(["hoard", "perms", "admin", "12", "34", "--remove"]);
        match cli.command {
            Commands::Perms(PermsArgs {
                action: PermsAction::Admin { gid, uid, remove },
            }) => {
                assert_eq!((gid, uid), (12, 34));
                assert!(remove);
            }
            _ => panic!("expected Perms Admin command"),
        }
    }

    #[test]
    fn cli_voice_reset_conflicts_with_set() {
        assert!(Cli::try_parse_from(["hoard", "voice", "1", "2", "--reset", "--set-speed", "2"])
            .is_err());
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["hoard", "cache", "stats"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["hoard", "-v", "cache", "stats"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["hoard", "-vv", "cache", "stats"]);
        assert_eq!(cli.verbose, 2);
    }
}
