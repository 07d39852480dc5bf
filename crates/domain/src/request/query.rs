//! Query parameter types

use serde::{Deserialize, Serialize};

/// A query parameter key-value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value
    pub value: String,
}

impl QueryParam {
    /// Creates a new query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered query parameter map.
///
/// Keys are unique: setting an existing key replaces its value in place, so the
/// original insertion order is what ends up on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.items.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.value = value,
            None => self.items.push(QueryParam { key, value }),
        }
    }

    /// Builder form of [`QueryParams::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.items.iter().position(|p| p.key == key)?;
        Some(self.items.remove(index).value)
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Self) {
        for param in &other.items {
            self.set(param.key.clone(), &param.value);
        }
    }

    /// Returns an iterator over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &QueryParam> {
        self.items.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        let mut params = Self::new();
        for param in iter {
            params.set(param.key, param.value);
        }
        params
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = QueryParams::new().with("page", 1).with("limit", 10);
        params.set("page", 2);

        let keys: Vec<_> = params.iter().map(|p| (p.key.as_str(), p.value.as_str())).collect();
        assert_eq!(keys, vec![("page", "2"), ("limit", "10")]);
    }

    #[test]
    fn test_merge_overrides_existing_keys() {
        let mut base = QueryParams::new().with("page", 1).with("limit", 10);
        let overrides = QueryParams::new().with("limit", 25).with("search", "rust");
        base.merge(&overrides);

        assert_eq!(base.get("page"), Some("1"));
        assert_eq!(base.get("limit"), Some("25"));
        assert_eq!(base.get("search"), Some("rust"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn test_collect_from_pairs() {
        let mut params: QueryParams = [("sortBy", "name"), ("sortOrder", "asc")].into_iter().collect();
        assert_eq!(params.get("sortOrder"), Some("asc"));
        assert_eq!(params.remove("sortBy"), Some("name".to_string()));
        assert!(params.get("sortBy").is_none());
    }
}
