//! `deduce-singularity`: extract the canonical, placeholder-templated form
//! back out of one rendered variant.

use crate::support::{self, Global};
use omniverse_core::{Alterverse, ExpressionTemplate, checker};
use omniverse_sync::diff_files;

pub struct Args {
    pub alterverse: String,
    pub source: String,
    pub ignore: String,
    pub dry_run: bool,
}

pub fn run(global: &Global, args: Args) {
    let config = support::load_config_or_exit(global);
    let manifest = config.alterverse(&args.alterverse).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });

    let source = support::syncer_or_exit(&args.source, &args.ignore);
    let files = support::read_corpus_or_exit(&source);

    // Two keys sharing a value cannot be told apart during extraction, and a
    // variant already containing placeholder-shaped text would mix real
    // placeholders with look-alikes. Both block the run.
    let mut findings = checker::equal_definition_values(manifest);
    findings.extend(checker::expression_matches(
        &config.singularity.expression,
        &files,
    ));
    if support::report_findings(&findings) {
        std::process::exit(1);
    }

    let template =
        ExpressionTemplate::new(&config.singularity.expression_template).unwrap_or_else(|err| {
            eprintln!("error: {err}");
            std::process::exit(1);
        });

    let alterverse = Alterverse::new(manifest.clone(), files);
    let rendered = alterverse.substitute_definitions(&template);

    let current = support::read_destination_or_empty(&global.singularity, &args.ignore);
    if !global.quiet {
        support::print_diff(&diff_files(&current, &rendered));
    }

    if args.dry_run {
        println!("--- dry-run, no files will be written");
    } else {
        println!("--- writing files");
        support::ensure_dir_or_exit(&global.singularity);
        let destination = support::syncer_or_exit(&global.singularity, &args.ignore);
        support::write_or_exit(&destination, &rendered, true);
    }
}
