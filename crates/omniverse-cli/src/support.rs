//! Shared command plumbing: global flags, exit-on-error helpers, finding
//! reports and diff printing.

use crate::config::Config;
use omniverse_core::{CheckFinding, FileCorpus, Severity};
use omniverse_sync::{CorpusDiff, Syncer};
use std::fs;
use std::path::Path;

/// The global CLI flags, threaded explicitly into every command.
pub struct Global {
    pub config: String,
    pub singularity: String,
    pub quiet: bool,
}

pub fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load the config and report its validation findings. Exits when the file
/// is unreadable or the placeholder scheme is broken.
pub fn load_config_or_exit(global: &Global) -> Config {
    match Config::load(&global.config) {
        Ok((config, findings)) => {
            if report_findings(&findings) {
                std::process::exit(1);
            }
            config
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Print every finding with its severity. Returns whether any of them was an
/// error.
pub fn report_findings(findings: &[CheckFinding]) -> bool {
    let mut has_errors = false;
    for finding in findings {
        match finding.severity() {
            Severity::Error => {
                has_errors = true;
                eprintln!("error: {finding}");
            }
            Severity::Warning => eprintln!("warning: {finding}"),
        }
    }
    has_errors
}

pub fn syncer_or_exit(basedir: &str, ignore: &str) -> Syncer {
    Syncer::new(basedir, ignore).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    })
}

pub fn read_corpus_or_exit(syncer: &Syncer) -> FileCorpus {
    syncer.read_files().unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    })
}

/// The current contents of a destination that may not exist yet.
pub fn read_destination_or_empty(path: &str, ignore: &str) -> FileCorpus {
    if !Path::new(path).exists() {
        return FileCorpus::new();
    }
    let syncer = syncer_or_exit(path, ignore);
    read_corpus_or_exit(&syncer)
}

/// Destinations may not exist yet; create the directory before syncing into
/// it.
pub fn ensure_dir_or_exit(path: &str) {
    if !Path::new(path).exists() {
        fs::create_dir_all(path).unwrap_or_else(|err| {
            eprintln!("error: failed to create directory '{path}': {err}");
            std::process::exit(1);
        });
    }
}

pub fn write_or_exit(syncer: &Syncer, files: &FileCorpus, delete_obsolete: bool) {
    syncer
        .write_files(files, delete_obsolete)
        .unwrap_or_else(|err| {
            eprintln!("error: {err}");
            std::process::exit(1);
        });
}

pub fn print_diff(diff: &CorpusDiff) {
    for (file, changes) in &diff.changed {
        println!("--- file '{file}' has changes:");
        print!("{changes}");
    }
    for file in &diff.unchanged {
        println!("--- file '{file}' is unchanged.");
    }
    for file in &diff.obsolete {
        println!("--- file '{file}' will be deleted in destination.");
    }
    for file in &diff.created {
        println!("--- file '{file}' will be created in destination.");
    }
}
