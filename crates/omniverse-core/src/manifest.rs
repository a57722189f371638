//! Manifests: one alterverse's key→value vocabulary.

use std::collections::BTreeMap;

/// The key→value table defining one alterverse's vocabulary.
///
/// Keys are identifiers, unique within a manifest; values are arbitrary
/// strings. Backed by a `BTreeMap` so every iteration order is deterministic.
/// Two manifests are related by matching on keys, never on values.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, String>);

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Invert the manifest into value → keys. A value mapped by more than one
    /// key makes value→key extraction ambiguous; the checker reports those.
    /// Key lists come out sorted because iteration is key-ordered.
    pub fn invert(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut out: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (key, value) in &self.0 {
            out.entry(value.as_str()).or_default().push(key.as_str());
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for Manifest {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_groups_keys_by_value() {
        let manifest = Manifest::from_iter([("foo", "test"), ("bar", "bla"), ("foobar", "bla")]);
        let inverted = manifest.invert();
        assert_eq!(inverted["test"], vec!["foo"]);
        assert_eq!(inverted["bla"], vec!["bar", "foobar"]);
    }

    #[test]
    fn iteration_is_key_ordered() {
        let manifest = Manifest::from_iter([("b", "2"), ("a", "1"), ("c", "3")]);
        let keys: Vec<_> = manifest.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
