//! Serializes the IR to target-syntax source text.
//!
//! Output is deterministic: classes in declaration order, then enums. Body
//! text is passed through exactly as captured.

pub mod writer;

use rayon::prelude::*;
use tk_ir::{Namespace, TypeDecl};

pub use writer::Emitter;

/// Text for one type, rendered independently of its namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedUnit {
    pub name: String,
    pub text: String,
}

/// Render a whole namespace block.
pub fn emit(ns: &Namespace) -> String {
    let mut emitter = Emitter::new();
    emitter.write_namespace(ns);
    emitter.finish()
}

/// Render one class or enum without the surrounding namespace.
pub fn emit_type(decl: &TypeDecl) -> String {
    let mut emitter = Emitter::new();
    emitter.write_type(decl);
    emitter.finish()
}

/// Render every type on the rayon pool, one unit per type, in namespace
/// order (classes, then enums).
pub fn emit_types_parallel(ns: &Namespace) -> Vec<EmittedUnit> {
    let ordered: Vec<&TypeDecl> = ns
        .types
        .iter()
        .filter(|t| !t.is_enum())
        .chain(ns.types.iter().filter(|t| t.is_enum()))
        .collect();

    ordered
        .par_iter()
        .map(|decl| EmittedUnit {
            name: decl.name().to_string(),
            text: emit_type(decl),
        })
        .collect()
}
