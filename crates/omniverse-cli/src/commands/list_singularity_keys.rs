//! `list-singularity-keys`: print every placeholder key the singularity
//! defines, with its file/line occurrences.

use crate::support::{self, Global};
use omniverse_core::Singularity;
use omniverse_sync::DEFAULT_IGNORE;

pub struct Args {
    pub json: bool,
}

pub fn run(global: &Global, args: Args) {
    let config = support::load_config_or_exit(global);
    let source = support::syncer_or_exit(&global.singularity, DEFAULT_IGNORE);
    let files = support::read_corpus_or_exit(&source);
    let singularity = Singularity::new(&config.singularity, files).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });

    let rendered = if args.json {
        serde_json::to_string_pretty(singularity.keys())
            .unwrap_or_else(|err| {
                eprintln!("error: failed to serialize key index: {err}");
                std::process::exit(1);
            })
    } else {
        serde_yaml::to_string(singularity.keys()).unwrap_or_else(|err| {
            eprintln!("error: failed to serialize key index: {err}");
            std::process::exit(1);
        })
    };
    println!("{rendered}");
}
