//! Builds the transkit IR from an already-decompiled syntax tree.
//!
//! The syntax tree itself is supplied by an external provider through the
//! [`SyntaxNode`] trait. The builder:
//!
//! - collects every type declaration per namespace (classes first, then enums)
//! - extracts fields, properties, indexers, methods and constructors
//! - resolves base types and member-access declaring types through
//!   [`resolve_type`] / [`resolve_target_type`]
//! - records every member access in a body as an `Invoke`
//!
//! Units can be built in parallel with [`build_parallel`]; the resulting
//! fragments are combined with [`merge`] before the transform pipeline runs.

pub mod build;
pub mod error;
pub mod merge;
pub mod parallel;
pub mod resolve;
pub mod split;
pub mod syntax;
pub mod tree;

pub use build::ModelBuilder;
pub use error::BuildError;
pub use merge::{merge, MergeConflict, Merged};
pub use parallel::{build_parallel, default_jobs, CancellationToken};
pub use resolve::{resolve_target_type, resolve_type, resolve_with_source, type_string, TypeSource};
pub use syntax::{Annotation, ByRef, Modifier, NodeKind, Role, SyntaxNode, TypeRef};
pub use tree::TreeNode;
