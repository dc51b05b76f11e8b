//! Mapping resolution
//!
//! Merges exact-match identities with explicit caller overrides and checks
//! that the result accounts for every pooled property consistently.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{LineageError, Result};
use crate::path::Path;
use crate::pool::PropertyPool;
use crate::property::{Identity, Property};

/// Resolved location of every known identity for one version
pub type IdentityMap = BTreeMap<Identity, Path>;

impl PropertyPool {
    /// Identities of the given properties that are already pooled.
    ///
    /// These fields kept their exact shape and resolve to themselves without
    /// explicit instruction.
    pub fn auto_mapped(&self, properties: &[Property]) -> BTreeSet<Identity> {
        properties
            .iter()
            .filter_map(|property| self.identity_of(property))
            .collect()
    }

    /// Pooled properties that neither auto-map nor appear in `explicit`.
    ///
    /// Covers the whole pool history, not only the properties of the current
    /// version. Ordered by identity.
    pub fn unresolved(&self, properties: &[Property], explicit: &IdentityMap) -> Vec<Property> {
        let mut resolved = self.auto_mapped(properties);
        resolved.extend(explicit.keys().copied());

        let missing: BTreeSet<Identity> = self
            .identities()
            .filter(|identity| !resolved.contains(identity))
            .collect();

        missing
            .into_iter()
            .filter_map(|identity| self.property(identity).cloned())
            .collect()
    }

    /// Trivial paths for auto-mapped identities, overlaid with `explicit`
    pub fn merged_mapping(&self, properties: &[Property], explicit: &IdentityMap) -> IdentityMap {
        let mut mapping: IdentityMap = self
            .auto_mapped(properties)
            .into_iter()
            .map(|identity| (identity, Path::trivial(identity)))
            .collect();

        mapping.extend(explicit.iter().map(|(id, path)| (*id, path.clone())));
        mapping
    }

    /// Check that every entry maps a field onto a field of the same record.
    ///
    /// The source and the first segment of the destination must share an
    /// owning type, and every identity the mapping mentions must be pooled.
    pub fn validate(&self, mapping: &IdentityMap) -> Result<()> {
        for (source_id, destination) in mapping {
            let source = self
                .property(*source_id)
                .ok_or(LineageError::UnknownIdentity(*source_id))?;

            if let Some(unknown) = destination
                .segments()
                .iter()
                .find(|segment| self.property(**segment).is_none())
            {
                return Err(LineageError::UnknownIdentity(*unknown));
            }

            let target = self
                .property(destination.first())
                .ok_or(LineageError::UnknownIdentity(destination.first()))?;

            if source.owning_type != target.owning_type {
                return Err(LineageError::Validation {
                    source_id: *source_id,
                    destination: destination.to_string(),
                    source_type: source.owning_type.clone(),
                    destination_type: target.owning_type.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Parse an explicit mapping from its string form, e.g. `("0-1-0", "0-4-0")`.
///
/// Destinations may be a bare identity or a dotted chain of identities. Two
/// entries for the same source identity are rejected.
pub fn parse_mapping<I, K, V>(entries: I) -> Result<IdentityMap>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut mapping = IdentityMap::new();

    for (raw_source, destination) in entries {
        let source: Identity = raw_source.as_ref().parse()?;
        let destination: Path = destination.as_ref().parse()?;

        if mapping.insert(source, destination).is_some() {
            return Err(LineageError::InvalidIdentity(format!(
                "{} maps {} more than once",
                raw_source.as_ref(),
                source
            )));
        }
    }

    Ok(mapping)
}
