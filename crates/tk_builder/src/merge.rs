//! Merging of builder fragments by namespace name.

use std::collections::HashMap;

use indexmap::IndexMap;
use tk_ir::Namespace;
use tracing::warn;

/// Two fragments declared a type with the same name in one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub namespace: Option<String>,
    pub type_name: String,
}

/// Merged namespaces in first-seen order, plus any conflicts on the way.
#[derive(Debug, Default)]
pub struct Merged {
    pub namespaces: Vec<Namespace>,
    pub conflicts: Vec<MergeConflict>,
}

impl Merged {
    pub fn get(&self, name: Option<&str>) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name.as_deref() == name)
    }

    /// Remove one namespace from the result.
    pub fn take(&mut self, name: Option<&str>) -> Option<Namespace> {
        let index = self
            .namespaces
            .iter()
            .position(|ns| ns.name.as_deref() == name)?;
        Some(self.namespaces.remove(index))
    }
}

/// Union fragments by namespace name.
///
/// Types keep fragment order. When a type name repeats within a namespace
/// the later declaration replaces the earlier one in place and the clash is
/// recorded.
pub fn merge(fragments: impl IntoIterator<Item = Namespace>) -> Merged {
    let mut buckets: IndexMap<Option<String>, (Namespace, HashMap<String, usize>)> =
        IndexMap::new();
    let mut conflicts = Vec::new();

    for fragment in fragments {
        let Namespace { name, types } = fragment;
        let (ns, index) = buckets
            .entry(name.clone())
            .or_insert_with(|| (Namespace::new(name), HashMap::new()));

        for decl in types {
            match index.get(decl.name()) {
                Some(&at) => {
                    warn!(
                        namespace = ns.display_name(),
                        type_name = decl.name(),
                        "type declared by more than one fragment; keeping the last"
                    );
                    conflicts.push(MergeConflict {
                        namespace: ns.name.clone(),
                        type_name: decl.name().to_string(),
                    });
                    ns.types[at] = decl;
                }
                None => {
                    index.insert(decl.name().to_string(), ns.types.len());
                    ns.types.push(decl);
                }
            }
        }
    }

    Merged {
        namespaces: buckets.into_values().map(|(ns, _)| ns).collect(),
        conflicts,
    }
}
