//! Properties and their composite identities

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LineageError;

/// Composite identifier of a property: one index from each identity registry.
///
/// Rendered as `"{type_index}-{field_index}-{kind_index}"`, e.g. `"0-1-0"`.
/// Ordering follows the three indices in turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Identity {
    /// Index of the owning type name
    pub type_index: usize,
    /// Index of the field name
    pub field_index: usize,
    /// Index of the field type name
    pub kind_index: usize,
}

impl Identity {
    pub fn new(type_index: usize, field_index: usize, kind_index: usize) -> Self {
        Self {
            type_index,
            field_index,
            kind_index,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.type_index, self.field_index, self.kind_index)
    }
}

impl FromStr for Identity {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LineageError::InvalidIdentity(s.to_string());
        let mut parts = s.trim().split('-');
        let mut next = || -> Result<usize, LineageError> {
            parts
                .next()
                .filter(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|part| part.parse().ok())
                .ok_or_else(invalid)
        };
        let identity = Identity::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(identity)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_string()
    }
}

impl TryFrom<String> for Identity {
    type Error = LineageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One field occurrence: a field declared on an owning type with a field type.
///
/// Equality, hashing and ordering only look at the
/// `(owning_type, field_name, field_type)` triple, so a freshly described
/// property matches its pooled counterpart regardless of `identity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub owning_type: String,
    pub field_name: String,
    pub field_type: String,
    /// Assigned once by the property pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

impl Property {
    /// Create a property without an identity
    pub fn new(
        owning_type: impl Into<String>,
        field_name: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            owning_type: owning_type.into(),
            field_name: field_name.into(),
            field_type: field_type.into(),
            identity: None,
        }
    }

    fn triple(&self) -> (&str, &str, &str) {
        (&self.owning_type, &self.field_name, &self.field_type)
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triple().hash(state);
    }
}

impl PartialOrd for Property {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Property {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owning_type, self.field_name, self.field_type)?;
        if let Some(identity) = self.identity {
            write!(f, " ({})", identity)?;
        }
        Ok(())
    }
}
