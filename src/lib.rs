//! Familiar Property Lineage
//!
//! An append-only index that keeps track of where every field of a schema
//! lives as the schema evolves through renames, type changes and nesting.
//!
//! ## Features
//!
//! - **Durable Identities**: Each `(owning type, field, field type)` triple gets
//!   a composite identity that never changes once assigned
//! - **Exact-Match Resolution**: Fields whose shape is unchanged map to
//!   themselves without instruction
//! - **Explicit Moves**: Renamed, retyped or nested fields are mapped by the
//!   caller onto their new location
//! - **Completeness Checking**: A version only commits once every field ever
//!   seen is accounted for
//! - **Immutable Versions**: Committed versions are checksummed and never
//!   overwritten
//!
//! ## Identities and paths
//!
//! ```text
//! Person.surname: str   ->  0-1-0   (type 0, field 1, kind 0)
//! Person.salary: int    ->  0-5-1
//!
//! v5 mapping
//! 0-1-0 -> 0-1-0           unchanged
//! 0-5-1 -> 0-5-3.2-6-1     now Person.salary: Salary, inside Salary.amount
//! ```

pub mod checksum;
pub mod config;
pub mod describer;
pub mod error;
pub mod history;
pub mod index;
pub mod manifest;
pub mod path;
pub mod pool;
pub mod property;
pub mod registry;
pub mod resolver;

pub use checksum::Checksum;
pub use config::{CommitPolicy, LineageConfig};
pub use describer::{FieldDefinition, SchemaDescriber, TypeDefinition};
pub use error::{LineageError, Result};
pub use history::{History, VersionDefinition};
pub use index::{Index, IndexBuilder, PreviewReport, SharedIndexBuilder, UnmappedProperty};
pub use manifest::{ManifestStats, VersionManifest};
pub use path::Path;
pub use pool::PropertyPool;
pub use property::{Identity, Property};
pub use registry::{IdentityRegistries, Registry};
pub use resolver::{parse_mapping, IdentityMap};
