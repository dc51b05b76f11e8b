//! Identity Registries
//!
//! Append-only interning tables backing property identities. Each table hands
//! out indices in first-seen order and never forgets a value, which keeps an
//! identity stable once it has been assigned.

use std::collections::HashMap;

use crate::property::{Identity, Property};

/// A single append-only interning table
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Map from value to its index
    indices: HashMap<String, usize>,
    /// Values in index order
    values: Vec<String>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the index of `value`, interning it at the end if unseen
    pub fn get_or_create(&mut self, value: &str) -> usize {
        if let Some(&index) = self.indices.get(value) {
            return index;
        }

        let index = self.values.len();
        self.values.push(value.to_string());
        self.indices.insert(value.to_string(), index);
        index
    }

    /// Get the index of `value` without interning it
    pub fn get(&self, value: &str) -> Option<usize> {
        self.indices.get(value).copied()
    }

    /// Get the value stored at `index`
    pub fn resolve(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// All values, in index order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The three independent registries an identity is composed from
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistries {
    /// Owning type names
    types: Registry,
    /// Field names
    fields: Registry,
    /// Field type names
    kinds: Registry,
}

impl IdentityRegistries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose the identity of `property`, interning any unseen part
    pub fn assign(&mut self, property: &Property) -> Identity {
        Identity::new(
            self.types.get_or_create(&property.owning_type),
            self.fields.get_or_create(&property.field_name),
            self.kinds.get_or_create(&property.field_type),
        )
    }

    pub fn types(&self) -> &Registry {
        &self.types
    }

    pub fn fields(&self) -> &Registry {
        &self.fields
    }

    pub fn kinds(&self) -> &Registry {
        &self.kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut registry = Registry::new();
        assert_eq!(registry.get_or_create("str"), 0);
        assert_eq!(registry.get_or_create("int"), 1);
        assert_eq!(registry.get_or_create("str"), 0);
        assert_eq!(registry.get_or_create("Person"), 2);
        assert_eq!(registry.values(), &["str", "int", "Person"]);
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let mut registry = Registry::new();
        registry.get_or_create("name");
        assert_eq!(registry.get("name"), Some(0));
        assert_eq!(registry.get("surname"), None);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve(0), Some("name"));
        assert_eq!(registry.resolve(1), None);
    }

    #[test]
    fn test_registries_are_independent() {
        let mut registries = IdentityRegistries::new();

        // "Person" is both an owning type and, later, a field type
        let name = registries.assign(&Property::new("Person", "name", "str"));
        let person = registries.assign(&Property::new("Root", "person", "Person"));

        assert_eq!(name, Identity::new(0, 0, 0));
        assert_eq!(person, Identity::new(1, 1, 1));
        assert_eq!(registries.types().values(), &["Person", "Root"]);
        assert_eq!(registries.kinds().values(), &["str", "Person"]);
    }
}
