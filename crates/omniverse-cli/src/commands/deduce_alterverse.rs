//! `deduce-alterverse`: rewrite one variant directly into another variant's
//! vocabulary via the lookup-table transform engine.

use crate::support::{self, Global};
use omniverse_core::Interverse;
use omniverse_sync::diff_files;

pub struct Args {
    pub from: String,
    pub source: String,
    pub to: String,
    pub destination: String,
    pub ignore: String,
    pub no_strict: bool,
    pub check_contamination: bool,
    pub dry_run: bool,
}

pub fn run(global: &Global, args: Args) {
    let config = support::load_config_or_exit(global);
    let from = config.alterverse(&args.from).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });
    let to = config.alterverse(&args.to).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });

    let source = support::syncer_or_exit(&args.source, &args.ignore);
    let files = support::read_corpus_or_exit(&source);

    let interverse = Interverse::new(from, to).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });
    tracing::debug!(table = %interverse.table(), "lookup table");

    let rendered = if args.no_strict {
        let (rendered, findings) = if args.check_contamination {
            interverse.deduce_checked(&files)
        } else {
            (interverse.deduce(&files), Vec::new())
        };
        for finding in &findings {
            eprintln!("warning: {finding}");
        }
        rendered
    } else {
        let (rendered, errors) = interverse.deduce_strict(&files);
        if !errors.is_empty() {
            for error in &errors {
                eprintln!("error: {error}");
            }
            std::process::exit(1);
        }
        rendered
    };

    let current = support::read_destination_or_empty(&args.destination, &args.ignore);
    if !global.quiet {
        support::print_diff(&diff_files(&current, &rendered));
    }

    if args.dry_run {
        println!("--- dry-run, no files will be written");
    } else {
        println!("--- writing files");
        support::ensure_dir_or_exit(&args.destination);
        let destination = support::syncer_or_exit(&args.destination, &args.ignore);
        support::write_or_exit(&destination, &rendered, true);
    }
}
