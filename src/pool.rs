//! Property Pool
//!
//! Canonical, append-only set of every property seen across all versions,
//! together with the identities assigned to them.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::property::{Identity, Property};
use crate::registry::IdentityRegistries;

/// Canonical set of known properties and their identities.
///
/// The forward (property -> identity) and inverse (identity -> property)
/// collections are only touched by [`PropertyPool::add`], so they always hold
/// the same entries.
#[derive(Debug, Default)]
pub struct PropertyPool {
    /// Interning tables the identities are composed from
    registries: IdentityRegistries,
    /// Property -> identity, in canonical insertion order
    forward: IndexMap<Property, Identity>,
    /// Identity -> property
    inverse: HashMap<Identity, Property>,
}

impl PropertyPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add properties to the pool.
    ///
    /// Returns the properties that were not yet pooled, in input order and with
    /// their identity attached. A triple repeated within `properties` is only
    /// returned once.
    pub fn add<I>(&mut self, properties: I) -> Vec<Property>
    where
        I: IntoIterator<Item = Property>,
    {
        let mut added = Vec::new();

        for mut property in properties {
            if self.forward.contains_key(&property) {
                continue;
            }

            let identity = self.registries.assign(&property);
            property.identity = Some(identity);

            tracing::debug!(%property, "pooled new property");

            self.forward.insert(property.clone(), identity);
            self.inverse.insert(identity, property.clone());
            added.push(property);
        }

        added
    }

    /// Whether a property with the same triple is pooled
    pub fn contains(&self, property: &Property) -> bool {
        self.forward.contains_key(property)
    }

    /// Identity assigned to the pooled property matching `property`
    pub fn identity_of(&self, property: &Property) -> Option<Identity> {
        self.forward.get(property).copied()
    }

    /// Pooled property carrying `identity`
    pub fn property(&self, identity: Identity) -> Option<&Property> {
        self.inverse.get(&identity)
    }

    /// All pooled properties, in canonical insertion order
    pub fn properties(&self) -> impl Iterator<Item = &Property> + '_ {
        self.forward.keys()
    }

    /// All assigned identities, in canonical insertion order
    pub fn identities(&self) -> impl Iterator<Item = Identity> + '_ {
        self.forward.values().copied()
    }

    /// Registries the identities were composed from
    pub fn registries(&self) -> &IdentityRegistries {
        &self.registries
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Rebuilds the pool by replaying the canonical property list through fresh
/// registries. Replay reproduces every identity, since each registry entry was
/// first seen on some pooled property and pooled properties are kept in order.
impl Clone for PropertyPool {
    fn clone(&self) -> Self {
        let mut pool = PropertyPool::new();
        pool.add(self.properties().cloned());
        pool
    }
}
