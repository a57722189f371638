//! The transform engine: rewriting a file corpus from one alterverse's
//! vocabulary to another's.

use crate::FileCorpus;
use crate::lookup::{LookupError, LookupTable};
use crate::manifest::Manifest;
use crate::token::TokenStream;
use std::collections::BTreeMap;

/// Content-dependent findings of a checked or strict deduction. Collected per
/// file and value across the whole batch, never truncated at the first hit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeduceError {
    /// The rewritten file still contains a destination value outside any
    /// substituted span, so the destination vocabulary appears in the source
    /// text independently of the transform and the operation cannot be
    /// reversed losslessly.
    #[error(
        "file '{file}' contains the string '{value}' which is the value of the manifest key '{key}' of the destination alterverse"
    )]
    DestinationValueCollision {
        file: String,
        key: String,
        value: String,
    },

    /// Applying the inverse table to the output did not reproduce the input.
    #[error("transforming '{file}' back to the source alterverse did not reproduce the original content")]
    RoundtripFailed { file: String },
}

/// Converts file corpora between two alterverses via a lookup table.
///
/// Construction builds and orders the table; a failed table build (missing
/// keys, empty values) is a configuration error and nothing runs. One
/// instance handles one direction; per-file work is independent, so callers
/// may process files of one corpus in parallel as long as each invocation
/// owns its engine.
#[derive(Debug, Clone)]
pub struct Interverse {
    table: LookupTable,
}

impl Interverse {
    pub fn new(from: &Manifest, to: &Manifest) -> Result<Self, LookupError> {
        Ok(Self {
            table: LookupTable::build(from, to)?,
        })
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Best-effort deduction: rewrite every file, no verification. Cannot
    /// fail once the engine exists.
    pub fn deduce(&self, corpus: &FileCorpus) -> FileCorpus {
        corpus
            .iter()
            .map(|(path, data)| (path.clone(), self.stream(data, &self.table).mutate()))
            .collect()
    }

    /// Best-effort deduction plus contamination reporting: the output is
    /// produced exactly as in [`Self::deduce`], and every destination value
    /// still present in the rewritten text is reported — without the cost of
    /// the inverse-transform proof. The caller decides whether the findings
    /// block anything.
    pub fn deduce_checked(&self, corpus: &FileCorpus) -> (FileCorpus, Vec<DeduceError>) {
        let streams = self.streams(corpus);
        let errors = self.contamination(&streams);
        (mutate_streams(&streams), errors)
    }

    /// Verified deduction: rewrite, check the output for destination-value
    /// contamination, and if clean prove reversibility by applying the
    /// inverse table and comparing byte-for-byte with the input.
    ///
    /// On any finding the batch counts as failed and must not be persisted;
    /// the best-effort output is still returned so every problem can be
    /// reported against real content.
    pub fn deduce_strict(&self, corpus: &FileCorpus) -> (FileCorpus, Vec<DeduceError>) {
        let streams = self.streams(corpus);
        let out = mutate_streams(&streams);

        let errors = self.contamination(&streams);
        if !errors.is_empty() {
            return (out, errors);
        }

        let inverse = self.table.inverted();
        let mut errors = Vec::new();
        for (path, data) in &out {
            let reversed = self.stream(data, &inverse).mutate();
            let original = corpus.get(path).map(Vec::as_slice).unwrap_or_default();
            if reversed != original {
                errors.push(DeduceError::RoundtripFailed { file: path.clone() });
            }
        }
        (out, errors)
    }

    fn stream(&self, data: &[u8], table: &LookupTable) -> TokenStream {
        let mut stream = TokenStream::new(data.to_vec());
        for record in table.records() {
            stream.tokenize(record.from.as_bytes(), record.to.as_bytes());
        }
        stream
    }

    fn streams(&self, corpus: &FileCorpus) -> BTreeMap<String, TokenStream> {
        corpus
            .iter()
            .map(|(path, data)| (path.clone(), self.stream(data, &self.table)))
            .collect()
    }

    fn contamination(&self, streams: &BTreeMap<String, TokenStream>) -> Vec<DeduceError> {
        let mut errors = Vec::new();
        for (path, stream) in streams {
            for record in self.table.records() {
                if stream.contains(record.to.as_bytes()) {
                    errors.push(DeduceError::DestinationValueCollision {
                        file: path.clone(),
                        key: record.name.clone(),
                        value: record.to.clone(),
                    });
                }
            }
        }
        errors
    }
}

fn mutate_streams(streams: &BTreeMap<String, TokenStream>) -> FileCorpus {
    streams
        .iter()
        .map(|(path, stream)| (path.clone(), stream.mutate()))
        .collect()
}
