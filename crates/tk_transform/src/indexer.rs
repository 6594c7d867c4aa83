//! Indexer lowering: `this[...]` accessors become `get<Name>`/`set<Name>`.

use tk_ir::{Accessor, Class, Entity, Method, Namespace, Parameter, VOID_TYPE};
use tracing::debug;

use crate::pipeline::{PassError, Transform};

/// Turn one accessor into an ordinary method.
///
/// An accessor without its own visibility takes the owning member's. Private
/// or internal lowers to private, anything else to public. The owner's
/// `static` and `override` flags are carried over. The body moves across
/// unchanged, text and invokes alike.
pub(crate) fn lower_accessor(
    name: String,
    owner: &Entity,
    accessor: Accessor,
    ty: &str,
    parameters: Vec<Parameter>,
) -> Method {
    let visibility = if accessor.entity.modifiers.visibility_count() > 0 {
        &accessor.entity.modifiers
    } else {
        &owner.modifiers
    };
    let restricted = visibility.is_private || visibility.is_internal;

    let mut entity = Entity::new(name, ty);
    entity.modifiers.is_public = !restricted;
    entity.modifiers.is_private = restricted;
    entity.modifiers.is_static = owner.modifiers.is_static;
    entity.modifiers.is_override = owner.modifiers.is_override;

    Method {
        entity,
        parameters,
        body: accessor.body,
    }
}

pub struct MakeIndexerToMember;

impl MakeIndexerToMember {
    fn lower(class: &mut Class) {
        let indexers = std::mem::take(&mut class.indexers);
        if indexers.is_empty() {
            return;
        }
        debug!(class = %class.name, count = indexers.len(), "lowering indexers");

        for indexer in indexers {
            let entity = indexer.entity;
            if let Some(getter) = indexer.getter {
                class.methods.push(lower_accessor(
                    format!("get{}", entity.name),
                    &entity,
                    getter,
                    &entity.ty,
                    indexer.parameters.clone(),
                ));
            }
            if let Some(setter) = indexer.setter {
                class.methods.push(lower_accessor(
                    format!("set{}", entity.name),
                    &entity,
                    setter,
                    VOID_TYPE,
                    indexer.parameters,
                ));
            }
        }
    }
}

impl Transform for MakeIndexerToMember {
    fn name(&self) -> &'static str {
        "MakeIndexerToMember"
    }

    fn run(&self, ns: &mut Namespace) -> Result<(), PassError> {
        ns.classes_mut().for_each(Self::lower);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_ir::{Body, Indexer, Invoke};

    fn accessor(text: &str, member: &str) -> Accessor {
        Accessor {
            body: Body {
                text: text.into(),
                invokes: vec![Invoke {
                    target: "items".into(),
                    member: member.into(),
                    ty: "System.Collections.Generic.List<int>".into(),
                }],
            },
            ..Default::default()
        }
    }

    fn indexed_class() -> Class {
        let mut class = Class::new("Bag");
        class.indexers.push(Indexer {
            entity: Entity::new("Item", "int"),
            parameters: vec![Parameter::new("i", "int")],
            getter: Some(accessor("{ return items.Get(i); }", "Get")),
            setter: Some(accessor("{ items.Set(i, value); }", "Set")),
        });
        class
    }

    fn run(class: Class) -> Class {
        let mut ns = Namespace::new(None);
        ns.types.push(class.into());
        MakeIndexerToMember.run(&mut ns).unwrap();
        let class = ns.classes().next().unwrap().clone();
        class
    }

    #[test]
    fn getter_and_setter_become_methods() {
        let class = run(indexed_class());
        assert!(class.indexers.is_empty());

        let get = class.method("getItem").unwrap();
        assert_eq!(get.entity.ty, "int");
        assert_eq!(get.parameters, [Parameter::new("i", "int")]);
        assert!(get.entity.modifiers.is_public);

        let set = class.method("setItem").unwrap();
        assert_eq!(set.entity.ty, VOID_TYPE);
        assert_eq!(set.parameters, [Parameter::new("i", "int")]);
        assert_eq!(set.body.text, "{ items.Set(i, value); }");
    }

    #[test]
    fn setter_method_keeps_the_setters_own_invokes() {
        let source = indexed_class();
        let setter_invokes = source.indexers[0].setter.as_ref().unwrap().body.invokes.clone();
        let getter_invokes = source.indexers[0].getter.as_ref().unwrap().body.invokes.clone();

        let class = run(source);
        assert_eq!(class.method("setItem").unwrap().body.invokes, setter_invokes);
        assert_eq!(class.method("getItem").unwrap().body.invokes, getter_invokes);
        assert_ne!(setter_invokes, getter_invokes);
    }

    #[test]
    fn restricted_setter_lowers_to_private_method() {
        let mut source = indexed_class();
        let setter = source.indexers[0].setter.as_mut().unwrap();
        setter.entity.modifiers.is_internal = true;
        source.indexers[0].entity.modifiers.is_static = true;

        let class = run(source);
        let set = class.method("setItem").unwrap();
        assert!(set.entity.modifiers.is_private);
        assert!(!set.entity.modifiers.is_public);
        assert!(set.entity.modifiers.is_static);
    }

    #[test]
    fn internal_indexer_lowers_both_accessors_private() {
        let mut source = indexed_class();
        source.indexers[0].entity.modifiers.is_internal = true;

        let class = run(source);
        for name in ["getItem", "setItem"] {
            let m = class.method(name).unwrap().entity.modifiers;
            assert!(m.is_private, "{name}");
            assert!(!m.is_public, "{name}");
            assert!(!m.is_internal, "{name}");
        }
    }

    #[test]
    fn missing_accessor_synthesizes_nothing() {
        let mut source = indexed_class();
        source.indexers[0].setter = None;

        let class = run(source);
        assert_eq!(class.methods.len(), 1);
        assert!(class.method("setItem").is_none());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let once = run(indexed_class());
        let twice = run(once.clone());
        assert_eq!(once, twice);
    }
}
