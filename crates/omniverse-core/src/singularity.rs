//! The singularity: the canonical, placeholder-templated corpus.
//!
//! Construction is two-phase: `Singularity::new` compiles the placeholder
//! expression and indexes every file, and the resulting value is immutable —
//! there is no lazy state and nothing to lock. The key index is always a
//! full rebuild; it is a diagnostic artifact, never mutated incrementally.

use crate::FileCorpus;
use crate::lines::{LineBreak, split_lines};
use crate::manifest::Manifest;
use regex::bytes::Regex;
use std::collections::BTreeMap;

/// The marker the expression template substitutes the key into.
pub const KEY_MARKER: &str = "{key}";

/// The two strings configuring the placeholder scheme: a regular expression
/// with exactly one capture group that recognizes placeholders, and a
/// template that renders a key into its literal placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SingularityConfig {
    pub expression: String,
    pub expression_template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SingularityError {
    #[error("placeholder expression '{expression}' does not compile: {message}")]
    InvalidExpression { expression: String, message: String },

    #[error("expression template '{template}' does not contain the '{{key}}' marker")]
    TemplateMissingMarker { template: String },
}

/// A validated placeholder-render rule: a literal template containing the
/// `{key}` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionTemplate {
    template: String,
}

impl ExpressionTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, SingularityError> {
        let template = template.into();
        if !template.contains(KEY_MARKER) {
            return Err(SingularityError::TemplateMissingMarker { template });
        }
        Ok(Self { template })
    }

    /// The literal placeholder text for `key`.
    pub fn render(&self, key: &str) -> String {
        self.template.replace(KEY_MARKER, key)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Placeholder occurrence index: key → file → ordered 1-indexed line numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct KeyIndex {
    by_key: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
}

impl KeyIndex {
    fn insert(&mut self, key: String, file: &str, line: usize) {
        self.by_key
            .entry(key)
            .or_default()
            .entry(file.to_string())
            .or_default()
            .push(line);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Every file/line occurrence of `key`.
    pub fn occurrences(&self, key: &str) -> Option<&BTreeMap<String, Vec<usize>>> {
        self.by_key.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.by_key.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, Vec<usize>>)> {
        self.by_key.iter()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[derive(Debug)]
struct SingularityFile {
    keys: BTreeMap<String, Vec<usize>>,
    data: Vec<u8>,
}

/// The canonical corpus, parsed and indexed.
#[derive(Debug)]
pub struct Singularity {
    expression: Regex,
    files: BTreeMap<String, SingularityFile>,
    index: KeyIndex,
}

impl Singularity {
    /// Compile the expression and index the placeholder keys of every file.
    pub fn new(config: &SingularityConfig, files: FileCorpus) -> Result<Self, SingularityError> {
        let expression =
            Regex::new(&config.expression).map_err(|err| SingularityError::InvalidExpression {
                expression: config.expression.clone(),
                message: err.to_string(),
            })?;

        let mut indexed = BTreeMap::new();
        let mut index = KeyIndex::default();
        for (path, data) in files {
            let keys = index_file(&expression, &data);
            for (key, lines) in &keys {
                for &line in lines {
                    index.insert(key.clone(), &path, line);
                }
            }
            indexed.insert(path, SingularityFile { keys, data });
        }

        Ok(Self {
            expression,
            files: indexed,
            index,
        })
    }

    /// The placeholder occurrence index over the whole corpus.
    pub fn keys(&self) -> &KeyIndex {
        &self.index
    }

    /// The keys occurring in one file, with their line numbers.
    pub fn file_keys(&self, path: &str) -> Option<&BTreeMap<String, Vec<usize>>> {
        self.files.get(path).map(|file| &file.keys)
    }

    /// Render the corpus for one alterverse: every placeholder becomes the
    /// manifest value of its key. Files without placeholders copy through
    /// unchanged; the rest are rebuilt line by line in the file's detected
    /// line-break style. A placeholder whose key has no definition is left
    /// as-is — the keys-defined check reports those before generation runs.
    pub fn generate(&self, definitions: &Manifest) -> FileCorpus {
        let mut rendered = FileCorpus::new();
        for (path, file) in &self.files {
            if file.keys.is_empty() {
                tracing::info!(file = %path, "no placeholder keys, copying through unchanged");
                rendered.insert(path.clone(), file.data.clone());
                continue;
            }

            let lb = LineBreak::detect(&file.data);
            let mut out = Vec::with_capacity(file.data.len());
            for (idx, line) in split_lines(&file.data).enumerate() {
                let new_line = self.replace_line(line, definitions);
                if new_line != line {
                    tracing::info!(
                        file = %path,
                        line = idx + 1,
                        old = %String::from_utf8_lossy(line),
                        new = %String::from_utf8_lossy(&new_line),
                        "rendered placeholders"
                    );
                }
                out.extend_from_slice(&new_line);
                out.extend_from_slice(lb.as_bytes());
            }
            rendered.insert(path.clone(), out);
        }
        rendered
    }

    fn replace_line(&self, line: &[u8], definitions: &Manifest) -> Vec<u8> {
        self.expression
            .replace_all(line, |caps: &regex::bytes::Captures<'_>| {
                let key = caps
                    .get(1)
                    .map(|group| String::from_utf8_lossy(group.as_bytes()).into_owned());
                match key.as_deref().and_then(|k| definitions.get(k)) {
                    Some(value) => value.as_bytes().to_vec(),
                    None => caps
                        .get(0)
                        .map(|whole| whole.as_bytes().to_vec())
                        .unwrap_or_default(),
                }
            })
            .into_owned()
    }
}

fn index_file(expression: &Regex, data: &[u8]) -> BTreeMap<String, Vec<usize>> {
    let mut keys: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, line) in split_lines(data).enumerate() {
        for caps in expression.captures_iter(line) {
            if let Some(group) = caps.get(1) {
                let key = String::from_utf8_lossy(group.as_bytes()).into_owned();
                keys.entry(key).or_default().push(idx + 1);
            }
        }
    }
    keys
}
