//! Property lowering.
//!
//! `T Name { get; set; }` becomes `T getName()` and `void setName(T value)`.

use tk_ir::{Class, Namespace, Parameter, VOID_TYPE};
use tracing::debug;

use crate::indexer::lower_accessor;
use crate::pipeline::{PassError, Transform};

pub struct MakePropertyToMember;

impl MakePropertyToMember {
    fn lower(class: &mut Class) {
        let properties = std::mem::take(&mut class.properties);
        if properties.is_empty() {
            return;
        }
        debug!(class = %class.name, count = properties.len(), "lowering properties");

        for property in properties {
            let entity = property.entity;
            if let Some(getter) = property.getter {
                class.methods.push(lower_accessor(
                    format!("get{}", entity.name),
                    &entity,
                    getter,
                    &entity.ty,
                    Vec::new(),
                ));
            }
            if let Some(setter) = property.setter {
                class.methods.push(lower_accessor(
                    format!("set{}", entity.name),
                    &entity,
                    setter,
                    VOID_TYPE,
                    vec![Parameter::new("value", entity.ty.as_str())],
                ));
            }
        }
    }
}

impl Transform for MakePropertyToMember {
    fn name(&self) -> &'static str {
        "MakePropertyToMember"
    }

    fn run(&self, ns: &mut Namespace) -> Result<(), PassError> {
        ns.classes_mut().for_each(Self::lower);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_ir::{Accessor, Body, Entity, Method, Property};

    fn property(name: &str, ty: &str, getter: bool, setter: bool) -> Property {
        Property {
            entity: Entity::new(name, ty),
            parameters: Vec::new(),
            getter: getter.then(|| Accessor {
                body: Body::new(format!("{{ return _{}; }}", name.to_lowercase())),
                ..Default::default()
            }),
            setter: setter.then(|| Accessor {
                body: Body::new(format!("{{ _{} = value; }}", name.to_lowercase())),
                ..Default::default()
            }),
        }
    }

    fn run(class: Class) -> Class {
        let mut ns = Namespace::new(Some("N".into()));
        ns.types.push(class.into());
        MakePropertyToMember.run(&mut ns).unwrap();
        let class = ns.classes().next().unwrap().clone();
        class
    }

    #[test]
    fn method_count_matches_present_accessors() {
        let mut class = Class::new("C");
        class.methods.push(Method::default());
        class.properties.push(property("A", "int", true, true));
        class.properties.push(property("B", "string", true, false));
        class.properties.push(property("W", "bool", false, true));

        let lowered = run(class);
        assert!(lowered.properties.is_empty());
        assert_eq!(lowered.methods.len(), 1 + 4);

        let names: Vec<_> = lowered.methods[1..]
            .iter()
            .map(|m| m.entity.name.as_str())
            .collect();
        assert_eq!(names, ["getA", "setA", "getB", "setW"]);
    }

    #[test]
    fn setter_takes_value_of_the_property_type() {
        let mut class = Class::new("C");
        class.properties.push(property("Name", "string", false, true));

        let lowered = run(class);
        let set = lowered.method("setName").unwrap();
        assert_eq!(set.entity.ty, VOID_TYPE);
        assert_eq!(set.parameters, [Parameter::new("value", "string")]);
        assert_eq!(set.body.text, "{ _name = value; }");
    }

    #[test]
    fn getter_has_no_parameters_and_property_type() {
        let mut class = Class::new("C");
        class.properties.push(property("Count", "int", true, false));

        let get = run(class).method("getCount").cloned().unwrap();
        assert!(get.parameters.is_empty());
        assert_eq!(get.entity.ty, "int");
        assert!(get.entity.modifiers.is_public);
    }

    #[test]
    fn private_getter_lowers_private() {
        let mut prop = property("Secret", "int", true, false);
        prop.getter.as_mut().unwrap().entity.modifiers.is_private = true;
        let mut class = Class::new("C");
        class.properties.push(prop);

        let get = run(class).method("getSecret").cloned().unwrap();
        assert!(get.entity.modifiers.is_private);
        assert!(!get.entity.modifiers.is_public);
    }

    #[test]
    fn unmarked_getter_takes_the_property_visibility() {
        let mut prop = property("Secret", "int", true, true);
        prop.entity.modifiers.is_private = true;
        prop.setter.as_mut().unwrap().entity.modifiers.is_public = true;
        let mut class = Class::new("C");
        class.properties.push(prop);

        let lowered = run(class);
        let get = lowered.method("getSecret").unwrap().entity.modifiers;
        assert!(get.is_private);
        assert!(!get.is_public);

        // An accessor's own visibility still wins over the property's.
        let set = lowered.method("setSecret").unwrap().entity.modifiers;
        assert!(set.is_public);
        assert!(!set.is_private);
    }

    #[test]
    fn override_and_static_are_carried_over() {
        let mut prop = property("Name", "string", true, false);
        prop.entity.modifiers.is_public = true;
        prop.entity.modifiers.is_override = true;
        prop.entity.modifiers.is_static = true;
        let mut class = Class::new("C");
        class.properties.push(prop);

        let get = run(class).method("getName").unwrap().entity.modifiers;
        assert!(get.is_override);
        assert!(get.is_static);
        assert!(get.is_public);
    }

    #[test]
    fn enums_are_left_alone() {
        let mut ns = Namespace::new(None);
        ns.types.push(tk_ir::Enum::new("E").into());
        let before = ns.clone();
        MakePropertyToMember.run(&mut ns).unwrap();
        assert_eq!(ns, before);
    }
}
