//! Committed version records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::error::Result;
use crate::property::Property;
use crate::resolver::IdentityMap;

/// Everything recorded when a version is committed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionManifest {
    /// Caller-supplied version label
    pub version: String,
    /// Resolved location of every identity known at commit time
    pub mapping: IdentityMap,
    /// Properties first pooled by this version
    pub added: Vec<Property>,
    /// When this version was committed
    pub created_at: DateTime<Utc>,
    /// SHA256 checksum of the mapping
    pub checksum: Checksum,
    /// Statistics
    pub stats: ManifestStats,
}

/// Statistics about a committed mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestStats {
    /// Entries in the mapping
    pub total: usize,
    /// Entries resolved by exact match
    pub auto_mapped: usize,
    /// Entries supplied by the caller
    pub explicit: usize,
    /// Entries whose path is not the identity's own
    pub relocated: usize,
    /// Entries pointing into a nested structure
    pub nested: usize,
}

impl VersionManifest {
    /// Record a resolved mapping for `version`.
    ///
    /// `explicit` is the number of caller-supplied entries that went into the
    /// mapping.
    pub fn new(
        version: impl Into<String>,
        mapping: IdentityMap,
        added: Vec<Property>,
        explicit: usize,
    ) -> Result<Self> {
        let stats = ManifestStats {
            total: mapping.len(),
            auto_mapped: mapping.len().saturating_sub(explicit),
            explicit,
            relocated: mapping
                .iter()
                .filter(|(identity, path)| !path.is_trivial_for(**identity))
                .count(),
            nested: mapping.values().filter(|path| path.is_nested()).count(),
        };

        let checksum = Checksum::of(&mapping)?;

        Ok(Self {
            version: version.into(),
            mapping,
            added,
            created_at: Utc::now(),
            checksum,
            stats,
        })
    }

    /// Verify the checksum matches the mapping
    pub fn verify_checksum(&self) -> Result<bool> {
        Ok(self.checksum.verify(&self.mapping)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::parse_mapping;

    #[test]
    fn test_manifest_stats() {
        let mapping = parse_mapping([
            ("0-0-0", "0-0-0"),
            ("0-1-0", "0-1-0"),
            ("0-4-0", "0-1-0"),
            ("0-5-1", "0-5-3.2-6-1"),
        ])
        .unwrap();

        let manifest = VersionManifest::new("v5", mapping, Vec::new(), 2).unwrap();
        assert_eq!(
            manifest.stats,
            ManifestStats {
                total: 4,
                auto_mapped: 2,
                explicit: 2,
                relocated: 2,
                nested: 1,
            }
        );
        assert!(manifest.verify_checksum().unwrap());
    }

    #[test]
    fn test_tampered_manifest_fails_verification() {
        let mapping = parse_mapping([("0-0-0", "0-0-0")]).unwrap();
        let mut manifest = VersionManifest::new("v1", mapping, Vec::new(), 0).unwrap();
        manifest.mapping = parse_mapping([("0-0-0", "0-1-0")]).unwrap();
        assert!(!manifest.verify_checksum().unwrap());
    }
}
