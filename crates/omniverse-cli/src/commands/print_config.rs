//! `print-config`: dump the configuration as omniverse parsed it.

use crate::support::{self, Global};

pub struct Args {
    pub json: bool,
}

pub fn run(global: &Global, args: Args) {
    let config = support::load_config_or_exit(global);
    let rendered = if args.json {
        serde_json::to_string_pretty(&config).unwrap_or_else(|err| {
            eprintln!("error: failed to serialize config: {err}");
            std::process::exit(1);
        })
    } else {
        serde_yaml::to_string(&config).unwrap_or_else(|err| {
            eprintln!("error: failed to serialize config: {err}");
            std::process::exit(1);
        })
    };
    println!("{rendered}");
}
