//! Ordered IR-to-IR passes run between building and emission.
//!
//! Passes, in order:
//! - `RemoveCompilerGeneratedField`: drop synthesized backing fields
//! - `RemoveLicenseMethod`: drop constructors containing the license marker
//! - `MakeIndexerToMember`: indexers → `get<Name>`/`set<Name>` methods
//! - `MakePropertyToMember`: properties → `get<Name>`/`set<Name>` methods
//! - `RenameTransform`: identifier normalization hook, runs last

pub mod generated;
pub mod indexer;
pub mod license;
pub mod pipeline;
pub mod property;
pub mod rename;

pub use generated::RemoveCompilerGeneratedField;
pub use indexer::MakeIndexerToMember;
pub use license::RemoveLicenseMethod;
pub use pipeline::{PassError, Pipeline, PipelineConfig, Transform};
pub use property::MakePropertyToMember;
pub use rename::RenameTransform;

use tk_ir::Namespace;

/// Run the standard pipeline over one namespace.
pub fn apply(ns: &mut Namespace, config: &PipelineConfig) -> Result<(), PassError> {
    Pipeline::standard(config).apply(ns)
}
