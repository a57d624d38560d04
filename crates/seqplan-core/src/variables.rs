//! Variable bag: the ordered name/value map carried by plans and steps.
//!
//! Step inputs and plan parameters are both [`VariableBag`]s. Names are
//! matched ASCII case-insensitively (`Input` and `input` are the same
//! variable) while the spelling used on first insertion is preserved for
//! display and serialization.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// An insertion-ordered, case-insensitive map from variable name to value.
///
/// Two bags are equal when they hold the same variables in the same order.
#[derive(Debug, Clone, Default)]
pub struct VariableBag {
    /// Keyed by the lowercased name; the entry keeps the original spelling.
    entries: IndexMap<String, Variable>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Variable {
    name: String,
    value: String,
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl VariableBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, returning the previous value if one existed.
    ///
    /// Overwriting keeps the variable's original position and spelling.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.get_mut(&normalize(&name)) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value)),
            None => {
                self.entries.insert(normalize(&name), Variable { name, value });
                None
            }
        }
    }

    /// Look up a variable's value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&normalize(name))
            .map(|variable| variable.value.as_str())
    }

    /// Return `true` if a variable with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    /// Remove a variable, preserving the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries
            .shift_remove(&normalize(name))
            .map(|variable| variable.value)
    }

    /// Number of variables in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if the bag holds no variables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|variable| (variable.name.as_str(), variable.value.as_str()))
    }

    /// Iterate variable names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|variable| variable.name.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for VariableBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}

impl<K, V> Extend<(K, V)> for VariableBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl PartialEq for VariableBag {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for VariableBag {}

impl fmt::Display for VariableBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}='{value}'")?;
        }
        Ok(())
    }
}

impl Serialize for VariableBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for VariableBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = IndexMap::<String, String>::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut bag = VariableBag::new();
        assert!(bag.set("input", "hello").is_none());
        assert_eq!(bag.get("input"), Some("hello"));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut bag = VariableBag::new();
        bag.set("Input", "hello");
        assert_eq!(bag.get("input"), Some("hello"));
        assert_eq!(bag.get("INPUT"), Some("hello"));
        assert!(bag.contains("iNpUt"));
    }

    #[test]
    fn overwrite_keeps_position_and_spelling() {
        let mut bag: VariableBag = [("first", "1"), ("Second", "2"), ("third", "3")]
            .into_iter()
            .collect();

        let previous = bag.set("SECOND", "two");
        assert_eq!(previous.as_deref(), Some("2"));

        let pairs: Vec<(&str, &str)> = bag.iter().collect();
        assert_eq!(pairs, vec![("first", "1"), ("Second", "two"), ("third", "3")]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut bag: VariableBag = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(bag.remove("B").as_deref(), Some("2"));
        assert_eq!(bag.names().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(bag.remove("missing").is_none());
    }

    #[test]
    fn equality_respects_insertion_order() {
        let forward: VariableBag = [("input", "x"), ("style", "fable")].into_iter().collect();
        let reversed: VariableBag = [("style", "fable"), ("input", "x")].into_iter().collect();
        let same: VariableBag = [("input", "x"), ("style", "fable")].into_iter().collect();

        assert_ne!(forward, reversed);
        assert_eq!(forward, same);
    }

    #[test]
    fn display_lists_pairs_in_order() {
        let bag: VariableBag = [("input", "x"), ("language", "French")].into_iter().collect();
        assert_eq!(bag.to_string(), "input='x' language='French'");
        assert_eq!(VariableBag::new().to_string(), "");
    }

    #[test]
    fn serializes_as_ordered_map() {
        let bag: VariableBag = [("zeta", "1"), ("alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&bag).expect("should serialize");
        assert_eq!(json, r#"{"zeta":"1","alpha":"2"}"#);

        let back: VariableBag = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, bag);
    }
}
