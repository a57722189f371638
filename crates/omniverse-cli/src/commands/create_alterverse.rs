//! `create-alterverse`: render one variant from the singularity.

use crate::support::{self, Global};
use omniverse_core::{Singularity, checker};
use omniverse_sync::diff_files;

pub struct Args {
    pub alterverse: String,
    pub destination: String,
    pub ignore: String,
    pub dry_run: bool,
}

pub fn run(global: &Global, args: Args) {
    let config = support::load_config_or_exit(global);
    let manifest = config.alterverse(&args.alterverse).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });

    let source = support::syncer_or_exit(&global.singularity, &args.ignore);
    let files = support::read_corpus_or_exit(&source);
    let singularity = Singularity::new(&config.singularity, files).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });

    // Undefined keys make the render lossy; unused definitions are clutter.
    if support::report_findings(&checker::keys_defined(singularity.keys(), manifest)) {
        std::process::exit(1);
    }
    support::report_findings(&checker::obsolete_definitions(manifest, singularity.keys()));

    let rendered = singularity.generate(manifest);

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
