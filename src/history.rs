//! Version histories
//!
//! A history lists schema versions in the order they were released, each with
//! its type definitions and the explicit mapping for fields that moved.
//!
//! ```json
//! {
//!   "versions": [
//!     { "label": "v1", "types": [{ "name": "Person", "fields": [{ "name": "surname", "type": "str" }] }] },
//!     { "label": "v2", "types": [...], "mapping": { "0-0-0": "0-1-0" } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use crate::describer::{SchemaDescriber, TypeDefinition};
use crate::error::Result;
use crate::index::IndexBuilder;
use crate::property::Property;
use crate::resolver::{parse_mapping, IdentityMap};

/// One schema version as released
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDefinition {
    pub label: String,
    pub types: Vec<TypeDefinition>,
    /// Source identity -> destination path, both in string form
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
}

impl VersionDefinition {
    /// Properties of this version, in declaration order
    pub fn properties(&self) -> Vec<Property> {
        self.types.describe()
    }

    /// Explicit mapping with every destination normalized to a path
    pub fn explicit_mapping(&self) -> Result<IdentityMap> {
        parse_mapping(&self.mapping)
    }
}

/// Ordered list of released schema versions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    pub versions: Vec<VersionDefinition>,
}

impl History {
    /// Load a history from a JSON file
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Commit every version in order, stopping at the first failure
    pub fn replay(&self, builder: &mut IndexBuilder) -> Result<()> {
        for version in &self.versions {
            let explicit = version.explicit_mapping()?;
            builder.commit(version.label.clone(), version.properties(), explicit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineageError;
    use crate::property::Identity;

    const HISTORY: &str = r#"{
        "versions": [
            {
                "label": "v1",
                "types": [
                    {"name": "Person", "fields": [
                        {"name": "name", "type": "str"},
                        {"name": "surname", "type": "str"}
                    ]}
                ]
            },
            {
                "label": "v2",
                "types": [
                    {"name": "Person", "fields": [
                        {"name": "name", "type": "str"},
                        {"name": "last_name", "type": "str"}
                    ]}
                ],
                "mapping": {"0-1-0": "0-2-0"}
            }
        ]
    }"#;

    #[test]
    fn test_load_and_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, HISTORY).unwrap();

        let history = History::load(&path).unwrap();
        let mut builder = IndexBuilder::new();
        history.replay(&mut builder).unwrap();

        let v2 = builder.lookup("v2").unwrap();
        assert_eq!(v2.len(), 3);
        assert_eq!(v2[&"0-1-0".parse::<Identity>().unwrap()].to_string(), "0-2-0");
    }

    #[test]
    fn test_replay_stops_at_first_failure() {
        let mut history: History = serde_json::from_str(HISTORY).unwrap();
        history.versions[1].mapping.clear();

        let mut builder = IndexBuilder::new();
        let result = history.replay(&mut builder);

        assert!(matches!(result, Err(LineageError::IncompleteMapping { .. })));
        assert!(builder.lookup("v1").is_some());
        assert!(builder.lookup("v2").is_none());
    }

    #[test]
    fn test_malformed_mapping_is_rejected() {
        let mut history: History = serde_json::from_str(HISTORY).unwrap();
        history.versions[1]
            .mapping
            .insert("0-1-0".to_string(), "0-2".to_string());

        let mut builder = IndexBuilder::new();
        assert!(matches!(
            history.replay(&mut builder),
            Err(LineageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            History::load(dir.path().join("absent.json")),
            Err(LineageError::Io(_))
        ));
    }
}
