//! Error types for the lineage index

use thiserror::Error;

use crate::property::{Identity, Property};

/// Result type for lineage operations
pub type Result<T> = std::result::Result<T, LineageError>;

/// Lineage index errors
#[derive(Error, Debug)]
pub enum LineageError {
    #[error("Incomplete mapping for version {version}: {} unresolved ({})", unresolved.len(), describe(unresolved))]
    IncompleteMapping {
        version: String,
        unresolved: Vec<Property>,
    },

    #[error("Invalid mapping {source_id} -> {destination}: owning type {source_type} does not match {destination_type}")]
    Validation {
        source_id: Identity,
        destination: String,
        source_type: String,
        destination_type: String,
    },

    #[error("Unknown identity: {0}")]
    UnknownIdentity(Identity),

    #[error("Version immutability violation: {version} is already committed")]
    ImmutabilityViolation { version: String },

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe(properties: &[Property]) -> String {
    properties
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
