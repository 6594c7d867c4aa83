//! The ordered pass list and its configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tk_ir::Namespace;
use tracing::debug;

use crate::generated::RemoveCompilerGeneratedField;
use crate::indexer::MakeIndexerToMember;
use crate::license::RemoveLicenseMethod;
use crate::property::MakePropertyToMember;
use crate::rename::RenameTransform;

/// A pipeline invariant was violated; aborts the whole run.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("pass `{pass}` requires lowered accessors, but class `{class}` still has properties or indexers")]
    OutOfOrder { pass: &'static str, class: String },
}

/// One in-place rewrite of a namespace.
///
/// Passes must be no-ops on their own output so that applying the pipeline
/// twice gives the same result as applying it once.
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, ns: &mut Namespace) -> Result<(), PassError>;
}

/// Knobs for the heuristic cleanup passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Constructors whose body text contains this are dropped.
    pub license_marker: String,
    /// Fields carrying this attribute are dropped.
    pub compiler_generated_attribute: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            license_marker: "LicenseManager".to_string(),
            compiler_generated_attribute: "CompilerGenerated".to_string(),
        }
    }
}

/// Passes applied in a fixed order. Later passes observe what earlier ones
/// wrote, so the order is part of the contract.
pub struct Pipeline {
    passes: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// The standard lowering order:
    /// 1. RemoveCompilerGeneratedField
    /// 2. RemoveLicenseMethod
    /// 3. MakeIndexerToMember
    /// 4. MakePropertyToMember
    /// 5. RenameTransform
    pub fn standard(config: &PipelineConfig) -> Self {
        Self {
            passes: vec![
                Box::new(RemoveCompilerGeneratedField::new(
                    &config.compiler_generated_attribute,
                )),
                Box::new(RemoveLicenseMethod::new(&config.license_marker)),
                Box::new(MakeIndexerToMember),
                Box::new(MakePropertyToMember),
                Box::new(RenameTransform),
            ],
        }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn apply(&self, ns: &mut Namespace) -> Result<(), PassError> {
        for pass in &self.passes {
            debug!(pass = pass.name(), namespace = ns.display_name(), "running pass");
            pass.run(ns)?;
        }
        Ok(())
    }
}
