//! Fork/join building of independent units.
//!
//! Each unit (typically the types of one output file) is built by its own
//! builder invocation into a private fragment. Nothing is shared while the
//! workers run; the caller merges the fragments afterwards on one thread.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tk_ir::Namespace;
use tracing::info;

use crate::build::ModelBuilder;
use crate::error::BuildError;
use crate::syntax::SyntaxNode;

/// Cooperative cancellation shared between a caller and running builds.
///
/// Checked between type declarations, never in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Worker count used when the caller does not choose one.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Build every unit on a pool of at most `jobs` threads.
///
/// Fragments come back in unit order so a later merge is deterministic.
/// The first failing unit aborts the whole call.
pub fn build_parallel<N>(
    builder: &ModelBuilder,
    units: &[N],
    jobs: usize,
) -> Result<Vec<Namespace>, BuildError>
where
    N: SyntaxNode + Sync,
{
    let jobs = jobs.max(1);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let per_unit: Vec<Vec<Namespace>> = pool.install(|| {
        units
            .par_iter()
            .map(|unit| builder.build_fragments(unit))
            .collect::<Result<_, _>>()
    })?;

    let fragments: Vec<Namespace> = per_unit.into_iter().flatten().collect();
    info!(
        units = units.len(),
        fragments = fragments.len(),
        jobs,
        "built syntax units"
    );
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::NodeKind;
    use crate::tree::TreeNode;

    fn unit(ns: &str, class: &str) -> TreeNode {
        TreeNode::new(NodeKind::Namespace)
            .named(ns)
            .with_child(TreeNode::new(NodeKind::Class).named(class))
    }

    #[test]
    fn fragments_keep_unit_order() {
        let units: Vec<_> = (0..16).map(|i| unit("N", &format!("C{i}"))).collect();
        let fragments = build_parallel(&ModelBuilder::new(), &units, 4).unwrap();

        let names: Vec<_> = fragments
            .iter()
            .map(|ns| ns.types[0].name().to_string())
            .collect();
        let expected: Vec<_> = (0..16).map(|i| format!("C{i}")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn one_failing_unit_fails_the_build() {
        let bad = TreeNode::new(NodeKind::Namespace).named("N").with_child(
            TreeNode::new(NodeKind::Class).named("Bad").with_child(
                TreeNode::new(NodeKind::Field)
                    .with_child(
                        TreeNode::new(NodeKind::Variable)
                            .with_role(crate::syntax::Role::Variable)
                            .with_text("a"),
                    )
                    .with_child(
                        TreeNode::new(NodeKind::Variable)
                            .with_role(crate::syntax::Role::Variable)
                            .with_text("b"),
                    ),
            ),
        );
        let units = vec![unit("N", "Good"), bad];
        let err = build_parallel(&ModelBuilder::new(), &units, 2).unwrap_err();
        assert!(matches!(err, BuildError::Precondition { .. }));
    }

    #[test]
    fn cancellation_is_visible_across_clones() {
        let token = CancellationToken::new();
        let shared = token.clone();
        assert!(!shared.is_cancelled());
        token.cancel();
        assert!(shared.is_cancelled());

        let builder = ModelBuilder::new().with_cancellation(token);
        let err = build_parallel(&builder, &[unit("N", "A")], 1).unwrap_err();
        assert!(matches!(err, BuildError::Cancelled { .. }));
    }

    #[test]
    fn default_jobs_is_positive() {
        assert!(default_jobs() >= 1);
    }
}
