//! Line diffs between the current and the generated corpus.
//!
//! Review output only: the partition into changed/unchanged/obsolete/created
//! plus, per changed file, the runs of lines that differ after trimming the
//! common prefix and suffix. Nothing in the core depends on this.

use omniverse_core::FileCorpus;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The changed line runs of one file: what the old version had in place of
/// what the new version brings, each with 1-indexed line numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineChanges {
    pub old: Vec<(usize, String)>,
    pub new: Vec<(usize, String)>,
}

impl fmt::Display for LineChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (number, line) in &self.old {
            writeln!(f, "  - {number}: {line}")?;
        }
        for (number, line) in &self.new {
            writeln!(f, "  + {number}: {line}")?;
        }
        Ok(())
    }
}

/// How a write-back would change the destination tree.
#[derive(Debug, Clone, Default)]
pub struct CorpusDiff {
    pub changed: BTreeMap<String, LineChanges>,
    pub unchanged: BTreeSet<String>,
    pub obsolete: BTreeSet<String>,
    pub created: BTreeSet<String>,
}

/// Compare the current state of a tree with the corpus about to replace it.
pub fn diff_files(current: &FileCorpus, generated: &FileCorpus) -> CorpusDiff {
    let mut diff = CorpusDiff::default();

    for path in current.keys() {
        if !generated.contains_key(path) {
            diff.obsolete.insert(path.clone());
        }
    }
    for path in generated.keys() {
        if !current.contains_key(path) {
            diff.created.insert(path.clone());
        }
    }

    for (path, old_data) in current {
        let Some(new_data) = generated.get(path) else {
            continue;
        };
        if old_data == new_data {
            diff.unchanged.insert(path.clone());
        } else {
            diff.changed
                .insert(path.clone(), line_changes(old_data, new_data));
        }
    }

    diff
}

fn lines(data: &[u8]) -> Vec<String> {
    omniverse_core::split_lines(data)
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect()
}

/// Trim the common line prefix and suffix; whatever remains in the middle is
/// the changed region of each side.
fn line_changes(old_data: &[u8], new_data: &[u8]) -> LineChanges {
    let old = lines(old_data);
    let new = lines(new_data);

    let mut start = 0;
    while start < old.len() && start < new.len() && old[start] == new[start] {
        start += 1;
    }

    let mut old_end = old.len();
    let mut new_end = new.len();
    while old_end > start && new_end > start && old[old_end - 1] == new[new_end - 1] {
        old_end -= 1;
        new_end -= 1;
    }

    LineChanges {
        old: (start..old_end).map(|i| (i + 1, old[i].clone())).collect(),
        new: (start..new_end).map(|i| (i + 1, new[i].clone())).collect(),
    }
}
