//! Destination paths for mapped properties

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LineageError, Result};
use crate::property::Identity;

/// Separator between path segments in the rendered form
pub const SEGMENT_SEPARATOR: char = '.';

/// Where a property's value lives now: a non-empty chain of identities.
///
/// A single segment means the field did not move. Longer chains address a
/// field nested inside other fields, outermost first, so `0-5-3.2-6-1` reads
/// as "field `2-6-1` inside field `0-5-3`".
///
/// Parsing normalizes a bare identity string into a one-segment path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Path(Vec<Identity>);

impl Path {
    /// Build a path from its segments, outermost first
    pub fn new(segments: Vec<Identity>) -> Result<Self> {
        if segments.is_empty() {
            return Err(LineageError::InvalidPath("path has no segments".to_string()));
        }
        Ok(Self(segments))
    }

    /// The path of a property that stayed where it was
    pub fn trivial(identity: Identity) -> Self {
        Self(vec![identity])
    }

    /// Outermost segment, which names the field on the mapped-to record
    pub fn first(&self) -> Identity {
        self.0[0]
    }

    pub fn segments(&self) -> &[Identity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path points into a nested structure
    pub fn is_nested(&self) -> bool {
        self.0.len() > 1
    }

    /// Whether this path is the trivial path of `identity`
    pub fn is_trivial_for(&self, identity: Identity) -> bool {
        self.0 == [identity]
    }
}

impl From<Identity> for Path {
    fn from(identity: Identity) -> Self {
        Self::trivial(identity)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEGMENT_SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self> {
        let segments = s
            .trim()
            .split(SEGMENT_SEPARATOR)
            .map(|segment| {
                segment
                    .parse::<Identity>()
                    .map_err(|_| LineageError::InvalidPath(s.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(segments)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for Path {
    type Error = LineageError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
