//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--base-url <url>`: Store base URL, overriding the config file
//! - `--token <token>`: Bearer token, overriding the config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Parser, Subcommand, ValueEnum};

/// nxr - Typed client for organization/domain/schema/instance stores
#[derive(Parser, Debug)]
#[command(name = "nxr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store base URL, including any deployment prefix (e.g. https://host/v0)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read one resource
    #[command(
        name = "get",
        long_about = "Read one resource and print its document.\n\n\
            Resources are addressed by their identifier segments. Pass --rev to \
            read a past revision.",
        after_help = "\
EXAMPLES:
    nxr get organization acme
    nxr get domain acme lab --rev 3
    nxr get schema acme lab sensor v1.0.0
    nxr get instance acme lab sensor v1.0.0 0f9c2a
    nxr get instance-id acme/lab/sensor/v1.0.0/0f9c2a"
    )]
    Get {
        #[command(subcommand)]
        target: GetTarget,
    },

    /// List a collection
    #[command(
        name = "list",
        long_about = "List a collection, optionally filtered.\n\n\
            Prints the total number of matches and the self-link of every hit \
            on the requested page. With --resolve, each hit is read back and \
            its document printed instead.",
        after_help = "\
EXAMPLES:
    # Domains of one organization
    nxr list domain --subpath acme

    # Second page of schemas mentioning 'sensor', including deprecated ones
    nxr list schema --text sensor --from 20 --size 20 --deprecated"
    )]
    List {
        /// Collection to list
        #[arg(value_enum)]
        kind: Kind,

        /// Path below the collection root (e.g. 'acme' or 'acme/lab')
        #[arg(long)]
        subpath: Option<String>,

        /// Full-text search expression
        #[arg(short = 't', long = "text")]
        text: Option<String>,

        /// Structured filter expression
        #[arg(long)]
        filter: Option<String>,

        /// Offset of the first hit
        #[arg(long)]
        from: Option<u64>,

        /// Page size
        #[arg(long)]
        size: Option<u64>,

        /// Include deprecated resources
        #[arg(long)]
        deprecated: bool,

        /// Read back every hit and print its document
        #[arg(long)]
        resolve: bool,
    },

    /// Publish or unpublish a schema
    #[command(
        name = "publish",
        after_help = "\
EXAMPLES:
    nxr publish acme lab sensor v1.0.0
    nxr publish acme lab sensor v1.0.0 --unpublish --rev 4"
    )]
    Publish {
        /// Organization
        organization: String,
        /// Domain
        domain: String,
        /// Schema name
        schema: String,
        /// Schema version
        version: String,

        /// Unpublish instead of publish
        #[arg(long)]
        unpublish: bool,

        /// Revision to write at (defaults to the latest)
        #[arg(long)]
        rev: Option<u64>,
    },

    /// Deprecate a resource
    #[command(
        name = "deprecate",
        after_help = "\
EXAMPLES:
    nxr deprecate domain acme/lab
    nxr deprecate instance acme/lab/sensor/v1.0.0/0f9c2a --rev 2"
    )]
    Deprecate {
        /// Kind of resource
        #[arg(value_enum)]
        kind: Kind,

        /// Slash-joined identifier (e.g. 'acme/lab')
        id: String,

        /// Revision to write at (defaults to the current one)
        #[arg(long)]
        rev: Option<u64>,
    },

    /// Get, set, or list configuration values
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for nxr commands.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    nxr completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    nxr completion zsh >> ~/.zshrc

    # Fish
    nxr completion fish > ~/.config/fish/completions/nxr.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resource to read with `get`.
#[derive(Subcommand, Debug)]
pub enum GetTarget {
    /// Read an organization
    Organization {
        organization: String,
        #[arg(long)]
        rev: Option<u64>,
    },
    /// Read a domain
    Domain {
        organization: String,
        domain: String,
        #[arg(long)]
        rev: Option<u64>,
    },
    /// Read a schema version
    Schema {
        organization: String,
        domain: String,
        schema: String,
        version: String,
        #[arg(long)]
        rev: Option<u64>,
    },
    /// Read an instance by its segments
    Instance {
        organization: String,
        domain: String,
        schema: String,
        version: String,
        uuid: String,
        #[arg(long)]
        rev: Option<u64>,
    },
    /// Read an instance by its full slash-joined id
    #[command(name = "instance-id")]
    InstanceId {
        full_id: String,
        #[arg(long)]
        rev: Option<u64>,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
    /// Print the config file path
    Path,
}

/// Resource collections.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Organization,
    Domain,
    Schema,
    Instance,
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
