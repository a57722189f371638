//! One concrete variant of the corpus, and the extraction back to the
//! singularity's placeholder form.

use crate::FileCorpus;
use crate::lines::{LineBreak, split_lines};
use crate::manifest::Manifest;
use crate::singularity::ExpressionTemplate;
use crate::token::TokenStream;

/// An alterverse: a manifest plus the variant's file corpus.
pub struct Alterverse {
    definitions: Manifest,
    files: FileCorpus,
}

impl Alterverse {
    pub fn new(definitions: Manifest, files: FileCorpus) -> Self {
        Self { definitions, files }
    }

    pub fn definitions(&self) -> &Manifest {
        &self.definitions
    }

    pub fn files(&self) -> &FileCorpus {
        &self.files
    }

    /// Replace every occurrence of every definition value with the rendered
    /// placeholder of its key, producing the singularity's form of this
    /// variant.
    ///
    /// Values are applied longest-first through the token stream, so a value
    /// that is a substring of another value (or of a rendered placeholder)
    /// can never corrupt the longer one. Ambiguous manifests — two keys
    /// sharing one value — must be rejected by the checker before this runs.
    pub fn substitute_definitions(&self, template: &ExpressionTemplate) -> FileCorpus {
        let mut pairs: Vec<(&str, String)> = self
            .definitions
            .iter()
            .map(|(key, value)| (value.as_str(), template.render(key)))
            .collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

        let mut rendered = FileCorpus::new();
        for (path, data) in &self.files {
            let lb = LineBreak::detect(data);
            let mut out = Vec::with_capacity(data.len());
            for (idx, line) in split_lines(data).enumerate() {
                let mut stream = TokenStream::new(line.to_vec());
                for (value, placeholder) in &pairs {
                    stream.tokenize(value.as_bytes(), placeholder.as_bytes());
                }
                let new_line = stream.mutate();
                if new_line != line {
                    tracing::info!(
                        file = %path,
                        line = idx + 1,
                        old = %String::from_utf8_lossy(line),
                        new = %String::from_utf8_lossy(&new_line),
                        "substituted definition values"
                    );
                }
                out.extend_from_slice(&new_line);
                out.extend_from_slice(lb.as_bytes());
            }
            rendered.insert(path.clone(), out);
        }
        rendered
    }
}
