//! Consistency validations run before any generation or extraction.
//!
//! Each check is an independent pure function returning every finding it can
//! see instead of failing on the first — batch diagnostics are part of the
//! contract. Severity decides what blocks an operation: errors are fatal for
//! the requested run, warnings are reported and ignored.

use crate::FileCorpus;
use crate::manifest::Manifest;
use crate::singularity::{ExpressionTemplate, KeyIndex, SingularityConfig};
use regex::bytes::Regex;
use std::collections::BTreeMap;

/// How bad a finding is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckFinding {
    /// A key occurs in the singularity but the manifest does not define it,
    /// so its placeholders could not be rendered.
    #[error(
        "key '{key}' present in singularity ({}) but not defined in the manifest",
        format_occurrences(.occurrences)
    )]
    UndefinedKey {
        key: String,
        occurrences: Vec<(String, Vec<usize>)>,
    },

    /// A definition exists but its key never occurs in the singularity.
    /// Harmless, just clutter.
    #[error("definition of key '{key}' present but the key does not occur in the singularity")]
    ObsoleteDefinition { key: String },

    #[error("expression '{expression}' does not compile: {message}")]
    InvalidExpression { expression: String, message: String },

    #[error("expression template '{template}' does not contain the '{{key}}' marker")]
    InvalidTemplate { template: String },

    #[error("expression '{expression}' does not contain the required capture group")]
    MissingCaptureGroup { expression: String },

    #[error("expression '{expression}' has more than one capture group")]
    ExtraCaptureGroups { expression: String },

    #[error(
        "expression '{expression}' matches more than once against generated placeholder '{placeholder}' for key '{key}' in alterverse '{alterverse}'"
    )]
    MultipleMatches {
        expression: String,
        placeholder: String,
        key: String,
        alterverse: String,
    },

    #[error(
        "expression '{expression}' does not match generated placeholder '{placeholder}' for key '{key}' in alterverse '{alterverse}'"
    )]
    NoMatch {
        expression: String,
        placeholder: String,
        key: String,
        alterverse: String,
    },

    #[error(
        "expression '{expression}' matches only a substring of generated placeholder '{placeholder}' for key '{key}' in alterverse '{alterverse}'"
    )]
    PartialMatch {
        expression: String,
        placeholder: String,
        key: String,
        alterverse: String,
    },

    #[error(
        "the capture group of expression '{expression}' yields '{captured}' instead of key '{key}' in alterverse '{alterverse}'"
    )]
    CaptureMismatch {
        expression: String,
        captured: String,
        key: String,
        alterverse: String,
    },

    /// Two keys of one manifest share a value, so value→key extraction
    /// cannot disambiguate them.
    #[error(
        "the keys {} have the same value '{value}' which makes it impossible to deduce the singularity properly",
        .keys.join(", ")
    )]
    AmbiguousValue { keys: Vec<String>, value: String },

    /// A variant file already contains text matching the placeholder
    /// expression; extracting over it would mix real placeholders with
    /// pre-existing look-alikes.
    #[error("file '{file}' contains strings that match the expression '{expression}'")]
    ExpressionMatchesContent { file: String, expression: String },
}

impl CheckFinding {
    pub fn severity(&self) -> Severity {
        match self {
            Self::ObsoleteDefinition { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

fn format_occurrences(occurrences: &[(String, Vec<usize>)]) -> String {
    occurrences
        .iter()
        .map(|(file, lines)| format!("{file} {lines:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every key the extractor found must be defined in the manifest. Hard error
/// per missing key, naming every occurrence.
pub fn keys_defined(index: &KeyIndex, definitions: &Manifest) -> Vec<CheckFinding> {
    index
        .iter()
        .filter(|(key, _)| !definitions.contains_key(key))
        .map(|(key, occurrences)| CheckFinding::UndefinedKey {
            key: key.clone(),
            occurrences: occurrences
                .iter()
                .map(|(file, lines)| (file.clone(), lines.clone()))
                .collect(),
        })
        .collect()
}

/// Every defined key should occur in the singularity. Warning per unused
/// definition.
pub fn obsolete_definitions(definitions: &Manifest, index: &KeyIndex) -> Vec<CheckFinding> {
    definitions
        .keys()
        .filter(|key| !index.contains_key(key))
        .map(|key| CheckFinding::ObsoleteDefinition { key: key.clone() })
        .collect()
}

/// The render rule and the extraction expression must be true inverses: for
/// every key of every manifest, rendering the placeholder and extracting it
/// back must produce exactly one full-span match whose single capture group
/// is the key. Anything else would corrupt every future generate/extract
/// round trip.
pub fn expression_template_bijection(
    config: &SingularityConfig,
    alterverses: &BTreeMap<String, Manifest>,
) -> Vec<CheckFinding> {
    let mut findings = Vec::new();

    let template = match ExpressionTemplate::new(&config.expression_template) {
        Ok(template) => template,
        Err(_) => {
            findings.push(CheckFinding::InvalidTemplate {
                template: config.expression_template.clone(),
            });
            return findings;
        }
    };

    let expression = match Regex::new(&config.expression) {
        Ok(expression) => expression,
        Err(err) => {
            findings.push(CheckFinding::InvalidExpression {
                expression: config.expression.clone(),
                message: err.to_string(),
            });
            return findings;
        }
    };

    // captures_len counts the implicit whole-match group.
    if expression.captures_len() < 2 {
        findings.push(CheckFinding::MissingCaptureGroup {
            expression: config.expression.clone(),
        });
        return findings;
    }
    if expression.captures_len() > 2 {
        findings.push(CheckFinding::ExtraCaptureGroups {
            expression: config.expression.clone(),
        });
        return findings;
    }

    for (name, manifest) in alterverses {
        for (key, _) in manifest.iter() {
            let placeholder = template.render(key);
            let rendered = placeholder.as_bytes();

            let matches = expression.find_iter(rendered).count();
            if matches > 1 {
                findings.push(CheckFinding::MultipleMatches {
                    expression: config.expression.clone(),
                    placeholder: placeholder.clone(),
                    key: key.clone(),
                    alterverse: name.clone(),
                });
                continue;
            }
            let Some(caps) = expression.captures(rendered) else {
                findings.push(CheckFinding::NoMatch {
                    expression: config.expression.clone(),
                    placeholder: placeholder.clone(),
                    key: key.clone(),
                    alterverse: name.clone(),
                });
                continue;
            };

            let Some(whole) = caps.get(0) else { continue };
            if whole.as_bytes() != rendered {
                findings.push(CheckFinding::PartialMatch {
                    expression: config.expression.clone(),
                    placeholder: placeholder.clone(),
                    key: key.clone(),
                    alterverse: name.clone(),
                });
                continue;
            }

            let captured = caps
                .get(1)
                .map(|group| String::from_utf8_lossy(group.as_bytes()).into_owned())
                .unwrap_or_default();
            if captured != *key {
                findings.push(CheckFinding::CaptureMismatch {
                    expression: config.expression.clone(),
                    captured,
                    key: key.clone(),
                    alterverse: name.clone(),
                });
            }
        }
    }

    findings
}

/// No two keys of one manifest may share a value. Hard error per shared
/// value, keys listed sorted.
pub fn equal_definition_values(definitions: &Manifest) -> Vec<CheckFinding> {
    definitions
        .invert()
        .into_iter()
        .filter(|(_, keys)| keys.len() > 1)
        .map(|(value, keys)| CheckFinding::AmbiguousValue {
            keys: keys.into_iter().map(str::to_string).collect(),
            value: value.to_string(),
        })
        .collect()
}

/// A variant corpus about to be extracted must not already contain text the
/// placeholder expression matches. Hard error per contaminated file.
pub fn expression_matches(expression: &str, files: &FileCorpus) -> Vec<CheckFinding> {
    let compiled = match Regex::new(expression) {
        Ok(compiled) => compiled,
        Err(err) => {
            return vec![CheckFinding::InvalidExpression {
                expression: expression.to_string(),
                message: err.to_string(),
            }];
        }
    };

    files
        .iter()
        .filter(|(_, data)| compiled.is_match(data))
        .map(|(file, _)| CheckFinding::ExpressionMatchesContent {
            file: file.clone(),
            expression: expression.to_string(),
        })
        .collect()
}
