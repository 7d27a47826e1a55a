//! CLI argument parsing (spec §6's ambient CLI surface).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Source code cross-referencer: lexes, indexes and queries tagged
/// snapshots of a repository.
#[derive(Parser)]
#[command(name = "elixir-xref", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to a custom elixir-xref.toml file.
    #[arg(short, long, global = true, env = "ELIXIR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter elixir-xref.toml next to the data directory.
    Init {
        /// Overwrite an existing configuration file.
        #[arg(long)]
        force: bool,
    },

    /// Run the updater over every tag the collaborator reports.
    Update {
        /// Override the configured data directory.
        #[arg(long)]
        project_dir: Option<PathBuf>,

        /// Override the configured worker pool size.
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Run a named query and print the result as JSON.
    Query {
        #[command(subcommand)]
        query: QueryCommand,
    },

    /// Print the fully resolved configuration as TOML.
    Config,
}

#[derive(Subcommand)]
pub enum QueryCommand {
    /// Name of the most recently indexed tag.
    Latest,

    /// Tags grouped by major/minor version.
    Versions,

    /// `tree`, `blob`, or absent for a path in a tag.
    Type { tag: String, path: String },

    /// Directory listing for a path in a tag.
    Dir { tag: String, path: String },

    /// Decoded text contents of a blob at a path in a tag.
    File { tag: String, path: String },

    /// The storage family a filename would be dispatched to.
    Family { filename: String },

    /// Whether this project maintains the DT-compatible tables.
    DtsComp,

    /// Ordered keys of a named index table, for autocomplete.
    Keys { table: String },

    /// Definitions, references and doc-comments for an identifier.
    Ident {
        tag: String,
        ident: String,
        /// One of C, K, D, M, B, or A for "all families".
        #[arg(default_value = "A")]
        family: String,
    },
}
