use tk_ir::Namespace;

use crate::pipeline::{PassError, Transform};

/// Hook for target-language identifier normalization.
///
/// No renaming policy is defined yet, so the pass only checks that it runs
/// after all accessor lowering.
pub struct RenameTransform;

impl Transform for RenameTransform {
    fn name(&self) -> &'static str {
        "RenameTransform"
    }

    fn run(&self, ns: &mut Namespace) -> Result<(), PassError> {
        if let Some(class) = ns.classes().find(|c| c.has_accessor_members()) {
            return Err(PassError::OutOfOrder {
                pass: self.name(),
                class: class.name.clone(),
            });
        }
        Ok(())
    }
}
