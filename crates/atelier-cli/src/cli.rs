//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "atelier", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "ATELIER_CONFIG", global = true)]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one load cycle and print the published snapshot as JSON.
    Load {
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Load content, then refresh on change signals read from stdin.
    ///
    /// Each stdin line is a host message: a JSON value such as
    /// `{"type": "NETLIFY_CMS_SAVE"}` or `"focus"`, or a bare word.
    Watch,

    /// Copy markdown from the editing directory into the public content root.
    Sync {
        /// Directory holding one subdirectory per category.
        #[arg(long, default_value = "content")]
        from: String,

        /// Public content root to copy into.
        #[arg(long, default_value = "public")]
        to: String,

        /// Message recorded in the sync marker.
        #[arg(short, long)]
        message: Option<String>,

        /// Keep running and sync again whenever the source directory changes.
        #[arg(short, long)]
        watch: bool,
    },

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "http.timeout_secs").
        key: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
