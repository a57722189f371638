use clap::{Parser, Subcommand};
use omniverse_sync::DEFAULT_IGNORE;

#[derive(Parser)]
#[command(
    name = "omniverse",
    about = "Create and maintain copies of a directory tree that differ in a set of named string values",
    version
)]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long, global = true, default_value = "omniverse.yaml")]
    pub config: String,

    /// Omit log output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Path of the singularity
    #[arg(long, global = true, default_value = "singularity")]
    pub singularity: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an alterverse from the singularity
    CreateAlterverse {
        /// Name of the target alterverse
        #[arg(short = 'a', long)]
        alterverse: String,

        /// Destination folder of the alterverse
        #[arg(short = 'd', long)]
        destination: String,

        /// Relative paths matching this regexp are ignored
        #[arg(long, default_value = DEFAULT_IGNORE)]
        ignore: String,

        /// Only in-memory, no write to the filesystem
        #[arg(long)]
        dry_run: bool,
    },

    /// Deduce the singularity from an alterverse
    DeduceSingularity {
        /// Name of the source alterverse
        #[arg(short = 'a', long)]
        alterverse: String,

        /// Path of the source alterverse
        #[arg(short = 's', long)]
        source: String,

        /// Relative paths matching this regexp are ignored
        #[arg(long, default_value = DEFAULT_IGNORE)]
        ignore: String,

        /// Only in-memory, no write to the filesystem
        #[arg(long)]
        dry_run: bool,
    },

    /// Deduce one alterverse directly from another
    DeduceAlterverse {
        /// Name of the source alterverse
        #[arg(short = 'f', long)]
        from: String,

        /// Path of the source alterverse
        #[arg(short = 's', long)]
        source: String,

        /// Name of the destination alterverse
        #[arg(short = 't', long)]
        to: String,

        /// Destination folder of the alterverse
        #[arg(short = 'd', long)]
        destination: String,

        /// Relative paths matching this regexp are ignored
        #[arg(long, default_value = DEFAULT_IGNORE)]
        ignore: String,

        /// Skip the reversibility proof and accept a lossy result
        #[arg(long)]
        no_strict: bool,

        /// In non-strict mode, still report destination values already
        /// present in the source text
        #[arg(long)]
        check_contamination: bool,

        /// Only in-memory, no write to the filesystem
        #[arg(long)]
        dry_run: bool,
    },

    /// Discover and list the keys defined in the singularity
    ListSingularityKeys {
        /// Output as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration as parsed by omniverse
    PrintConfig {
        /// Output as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}
