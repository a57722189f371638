//! Omniverse CLI: the `omniverse` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.quiet);

    let global = support::Global {
        config: cli.config,
        singularity: cli.singularity,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::CreateAlterverse {
            alterverse,
            destination,
            ignore,
            dry_run,
        } => commands::create_alterverse::run(
            &global,
            commands::create_alterverse::Args {
                alterverse,
                destination,
                ignore,
                dry_run,
            },
        ),

        Commands::DeduceSingularity {
            alterverse,
            source,
            ignore,
            dry_run,
        } => commands::deduce_singularity::run(
            &global,
            commands::deduce_singularity::Args {
                alterverse,
                source,
                ignore,
                dry_run,
            },
        ),

        Commands::DeduceAlterverse {
            from,
            source,
            to,
            destination,
            ignore,
            no_strict,
            check_contamination,
            dry_run,
        } => commands::deduce_alterverse::run(
            &global,
            commands::deduce_alterverse::Args {
                from,
                source,
                to,
                destination,
                ignore,
                no_strict,
                check_contamination,
                dry_run,
            },
        ),

        Commands::ListSingularityKeys { json } => commands::list_singularity_keys::run(
            &global,
            commands::list_singularity_keys::Args { json },
        ),

        Commands::PrintConfig { json } => {
            commands::print_config::run(&global, commands::print_config::Args { json })
        }
    }
}
