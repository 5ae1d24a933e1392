use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "omni-manifest")]
#[command(about = "Discover @module annotated classes and write the category manifest artifact.")]
#[command(version)]
pub(crate) struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scan the source tree and write the manifest artifact.
    Generate(GenerateArgs),
    /// Load an artifact and list its categories and modules.
    Show {
        /// Artifact to read (default: <root>/vendor/modules.manifest)
        #[arg(long)]
        artifact: Option<PathBuf>,

        /// Only list modules in this category
        #[arg(long)]
        category: Option<String>,

        /// Project root (default: $PRJ_ROOT or the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Print the JSON Schema of the artifact payload.
    Schema,
}

#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Directory to scan (default: $PRJ_ROOT or the current directory)
    #[arg(long)]
    pub(crate) root: Option<PathBuf>,

    /// Artifact path; relative paths resolve against --root
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,

    /// Settings file (default: <root>/omni-manifest.yaml when present)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Source file extension without the dot (default: php)
    #[arg(long)]
    pub(crate) extension: Option<String>,

    /// Extra directory name to skip; repeatable
    #[arg(long = "exclude", value_name = "NAME")]
    pub(crate) exclude: Vec<String>,

    /// Maximum payload line width in bytes; 0 keeps one line
    #[arg(long)]
    pub(crate) chunk_width: Option<usize>,

    /// Parse files on the current thread only
    #[arg(long)]
    pub(crate) sequential: bool,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub(crate) follow_links: bool,
}
