//! Lookup tables: the ordered substitution records for a manifest pair.

use crate::manifest::Manifest;
use std::fmt;

/// One substitution: the value `from` of the source manifest becomes the
/// value `to` of the destination manifest. `name` is the shared key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRecord {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Which of the two manifests a finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSide {
    From,
    To,
}

impl fmt::Display for ManifestSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => write!(f, "from"),
            Self::To => write!(f, "to"),
        }
    }
}

/// A shared key whose value is empty in one of the manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyValue {
    pub key: String,
    pub side: ManifestSide,
}

impl fmt::Display for EmptyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key '{}' in '{}' manifest", self.key, self.side)
    }
}

/// Errors building a lookup table. Both variants carry every offending key so
/// the operator can fix the manifests in one pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("the following keys are missing from the 'to' manifest: {}", .keys.join(", "))]
    MissingKeys { keys: Vec<String> },

    #[error("manifest values must not be empty: {}", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    EmptyValues { violations: Vec<EmptyValue> },
}

/// The ordered list of substitution records for one (source, destination)
/// manifest pair.
///
/// Records are sorted by descending `from` length, ties broken by key name.
/// The ordering is load-bearing: a value that is a substring of another value
/// must be applied after it, otherwise the longer occurrence gets corrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    records: Vec<LookupRecord>,
}

impl LookupTable {
    /// Build the table for a transform from `from`'s vocabulary to `to`'s.
    ///
    /// Every key of `from` must exist in `to` (the reverse is not required:
    /// `to` may carry spare vocabulary), and every shared value must be
    /// non-empty on both sides.
    pub fn build(from: &Manifest, to: &Manifest) -> Result<Self, LookupError> {
        let missing: Vec<String> = from
            .keys()
            .filter(|key| !to.contains_key(key))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(LookupError::MissingKeys { keys: missing });
        }

        let mut violations = Vec::new();
        let mut records = Vec::with_capacity(from.len());
        for (key, from_value) in from.iter() {
            let Some(to_value) = to.get(key) else {
                continue;
            };
            if from_value.is_empty() {
                violations.push(EmptyValue {
                    key: key.clone(),
                    side: ManifestSide::From,
                });
            }
            if to_value.is_empty() {
                violations.push(EmptyValue {
                    key: key.clone(),
                    side: ManifestSide::To,
                });
            }
            records.push(LookupRecord {
                name: key.clone(),
                from: from_value.clone(),
                to: to_value.to_string(),
            });
        }
        if !violations.is_empty() {
            return Err(LookupError::EmptyValues { violations });
        }

        sort_records(&mut records);
        Ok(Self { records })
    }

    pub fn records(&self) -> &[LookupRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The table for the opposite direction: `from` and `to` swapped per
    /// record, re-sorted for the new `from` lengths. Used by the strict
    /// round-trip proof.
    pub fn inverted(&self) -> Self {
        let mut records: Vec<LookupRecord> = self
            .records
            .iter()
            .map(|record| LookupRecord {
                name: record.name.clone(),
                from: record.to.clone(),
                to: record.from.clone(),
            })
            .collect();
        sort_records(&mut records);
        Self { records }
    }
}

fn sort_records(records: &mut [LookupRecord]) {
    records.sort_by(|a, b| {
        b.from
            .len()
            .cmp(&a.from.len())
            .then_with(|| a.name.cmp(&b.name))
    });
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name | from | to")?;
        for record in &self.records {
            writeln!(f, "'{}' | '{}' | '{}'", record.name, record.from, record.to)?;
        }
        Ok(())
    }
}
