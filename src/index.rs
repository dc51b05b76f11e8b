//! Index Builder
//!
//! Owns the canonical property pool and the append-only record of committed
//! versions. A version is committed only when every property ever pooled is
//! accounted for, either by exact match or by an explicit mapping entry.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use similar::TextDiff;

use crate::config::{CommitPolicy, LineageConfig, PreviewConfig};
use crate::describer::SchemaDescriber;
use crate::error::{LineageError, Result};
use crate::manifest::VersionManifest;
use crate::pool::PropertyPool;
use crate::property::Property;
use crate::resolver::IdentityMap;

/// Append-only record of committed versions, in commit order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Index {
    versions: IndexMap<String, VersionManifest>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved mapping of a committed version
    pub fn lookup(&self, version: &str) -> Option<&IdentityMap> {
        self.versions.get(version).map(|manifest| &manifest.mapping)
    }

    /// Full record of a committed version
    pub fn manifest(&self, version: &str) -> Option<&VersionManifest> {
        self.versions.get(version)
    }

    pub fn contains(&self, version: &str) -> bool {
        self.versions.contains_key(version)
    }

    /// Committed version labels, oldest first
    pub fn versions(&self) -> impl Iterator<Item = &str> + '_ {
        self.versions.keys().map(String::as_str)
    }

    /// Latest committed version
    pub fn latest(&self) -> Option<&VersionManifest> {
        self.versions.values().last()
    }

    /// Verify the checksum of a committed version
    pub fn verify(&self, version: &str) -> Result<bool> {
        self.versions
            .get(version)
            .ok_or_else(|| LineageError::VersionNotFound(version.to_string()))?
            .verify_checksum()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    fn insert(&mut self, manifest: VersionManifest) -> &VersionManifest {
        let (index, _) = self.versions.insert_full(manifest.version.clone(), manifest);
        &self.versions[index]
    }
}

/// A pooled property the previewed version leaves unresolved
#[derive(Debug, Clone, Serialize)]
pub struct UnmappedProperty {
    pub property: Property,
    /// Properties new in this version declared on the same record
    pub suggested: Vec<Property>,
}

/// Outcome of previewing a version without committing it
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    /// Properties that would block a commit, ordered by identity
    pub not_mapped: Vec<UnmappedProperty>,
    /// Properties the version would add to the pool
    pub all_added: Vec<Property>,
    /// Every property the pool would hold afterwards
    pub all: Vec<Property>,
}

impl PreviewReport {
    /// Whether committing the previewed version would succeed the
    /// completeness check
    pub fn is_complete(&self) -> bool {
        self.not_mapped.is_empty()
    }
}

/// Builds the lineage index one version at a time
#[derive(Debug, Default)]
pub struct IndexBuilder {
    pool: PropertyPool,
    index: Index,
    policy: CommitPolicy,
    preview: PreviewConfig,
}

impl IndexBuilder {
    /// Create an empty builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder from configuration
    pub fn with_config(config: &LineageConfig) -> Self {
        Self {
            policy: config.commit.policy,
            preview: config.preview.clone(),
            ..Self::default()
        }
    }

    /// Commit `properties` as `version`.
    ///
    /// `explicit` maps identities that no longer match exactly onto their new
    /// location. Fails with [`LineageError::IncompleteMapping`] if any pooled
    /// property is left unresolved and with [`LineageError::Validation`] if an
    /// entry moves a field to a different record. The index is untouched on
    /// failure; whether the pool keeps properties added by a failed commit
    /// depends on the [`CommitPolicy`].
    pub fn commit(
        &mut self,
        version: impl Into<String>,
        properties: Vec<Property>,
        explicit: IdentityMap,
    ) -> Result<&VersionManifest> {
        let version = version.into();

        if self.index.contains(&version) {
            return Err(LineageError::ImmutabilityViolation { version });
        }

        let manifest = match self.policy {
            CommitPolicy::Transactional => {
                let mut staged = self.pool.clone();
                let manifest = stage(&mut staged, &version, &properties, &explicit);
                if manifest.is_ok() {
                    self.pool = staged;
                }
                manifest
            }
            CommitPolicy::RetainGrowth => stage(&mut self.pool, &version, &properties, &explicit),
        };

        let manifest = match manifest {
            Ok(manifest) => manifest,
            Err(err) => {
                tracing::warn!(%version, error = %err, "rejected commit");
                return Err(err);
            }
        };

        tracing::info!(
            %version,
            total = manifest.stats.total,
            explicit = manifest.stats.explicit,
            added = manifest.added.len(),
            "committed version"
        );

        Ok(self.index.insert(manifest))
    }

    /// Commit the properties a describer produces
    pub fn commit_schema<D>(
        &mut self,
        version: impl Into<String>,
        schema: &D,
        explicit: IdentityMap,
    ) -> Result<&VersionManifest>
    where
        D: SchemaDescriber + ?Sized,
    {
        self.commit(version, schema.describe(), explicit)
    }

    /// Report what committing `properties` would leave unresolved.
    ///
    /// Works on a copy of the pool; nothing observable changes.
    pub fn preview(&self, properties: &[Property], explicit: &IdentityMap) -> PreviewReport {
        preview_on(self.pool.clone(), &self.preview, properties, explicit)
    }

    /// Resolved mapping of a committed version
    pub fn lookup(&self, version: &str) -> Option<&IdentityMap> {
        self.index.lookup(version)
    }

    /// Full record of a committed version
    pub fn manifest(&self, version: &str) -> Option<&VersionManifest> {
        self.index.manifest(version)
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn pool(&self) -> &PropertyPool {
        &self.pool
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }
}

/// Grow `pool` with `properties` and resolve the mapping for `version`
fn stage(
    pool: &mut PropertyPool,
    version: &str,
    properties: &[Property],
    explicit: &IdentityMap,
) -> Result<VersionManifest> {
    let added = pool.add(properties.iter().cloned());
    tracing::debug!(%version, added = added.len(), pooled = pool.len(), "staged version");

    let unresolved = pool.unresolved(properties, explicit);
    if !unresolved.is_empty() {
        return Err(LineageError::IncompleteMapping {
            version: version.to_string(),
            unresolved,
        });
    }

    let mapping = pool.merged_mapping(properties, explicit);
    pool.validate(&mapping)?;

    VersionManifest::new(version, mapping, added, explicit.len())
}

fn preview_on(
    mut scratch: PropertyPool,
    settings: &PreviewConfig,
    properties: &[Property],
    explicit: &IdentityMap,
) -> PreviewReport {
    let added = scratch.add(properties.iter().cloned());

    let not_mapped = scratch
        .unresolved(properties, explicit)
        .into_iter()
        .map(|property| {
            let suggested = if settings.suggest_siblings {
                suggest(&property, &added, settings.rank_by_name)
            } else {
                Vec::new()
            };
            UnmappedProperty {
                property,
                suggested,
            }
        })
        .collect();

    PreviewReport {
        not_mapped,
        all: scratch.properties().cloned().collect(),
        all_added: added,
    }
}

/// Newly added properties on the same record as `property`
fn suggest(property: &Property, added: &[Property], rank_by_name: bool) -> Vec<Property> {
    let mut siblings: Vec<Property> = added
        .iter()
        .filter(|candidate| candidate.owning_type == property.owning_type)
        .cloned()
        .collect();

    if rank_by_name {
        // Stable sort keeps declaration order between equally similar names
        siblings.sort_by(|a, b| {
            let a = name_similarity(&property.field_name, &a.field_name);
            let b = name_similarity(&property.field_name, &b.field_name);
            b.total_cmp(&a)
        });
    }

    siblings
}

fn name_similarity(old: &str, new: &str) -> f32 {
    TextDiff::from_chars(old, new).ratio()
}

/// An [`IndexBuilder`] shared between threads.
///
/// Commits are serialized behind the write lock, since identity assignment
/// depends on the order properties are first seen. Previews clone the pool
/// under the read lock and do the rest of their work unlocked.
#[derive(Debug, Clone, Default)]
pub struct SharedIndexBuilder {
    inner: Arc<RwLock<IndexBuilder>>,
}

impl SharedIndexBuilder {
    pub fn new(builder: IndexBuilder) -> Self {
        Self {
            inner: Arc::new(RwLock::new(builder)),
        }
    }

    /// Commit under the write lock, returning a copy of the manifest
    pub fn commit(
        &self,
        version: impl Into<String>,
        properties: Vec<Property>,
        explicit: IdentityMap,
    ) -> Result<VersionManifest> {
        let mut builder = self.inner.write();
        builder.commit(version, properties, explicit).cloned()
    }

    /// Preview against a consistent snapshot of the pool
    pub fn preview(&self, properties: &[Property], explicit: &IdentityMap) -> PreviewReport {
        let (snapshot, settings) = {
            let builder = self.inner.read();
            (builder.pool.clone(), builder.preview.clone())
        };
        preview_on(snapshot, &settings, properties, explicit)
    }

    /// Copy of the resolved mapping of a committed version
    pub fn lookup(&self, version: &str) -> Option<IdentityMap> {
        self.inner.read().lookup(version).cloned()
    }

    /// Copy of the index as it stands
    pub fn index(&self) -> Index {
        self.inner.read().index.clone()
    }
}
