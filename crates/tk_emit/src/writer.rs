//! Text writer for the IR.

use tk_ir::{
    Accessor, Body, Class, Entity, Enum, Field, Modifiers, Namespace, Parameter, TypeDecl,
};

const INDENT: &str = "    ";

/// Accumulates emitted text for one namespace or type.
pub struct Emitter {
    output: String,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn write_namespace(&mut self, ns: &Namespace) {
        match &ns.name {
            Some(name) => self.line(0, &format!("namespace {name} {{")),
            None => self.line(0, "namespace {"),
        }
        for class in ns.classes() {
            self.write_class(class);
        }
        for e in ns.enums() {
            self.write_enum(e);
        }
        match &ns.name {
            Some(name) => self.line(0, &format!("}} // namespace {name}")),
            None => self.line(0, "} // namespace"),
        }
    }

    pub fn write_type(&mut self, decl: &TypeDecl) {
        match decl {
            TypeDecl::Class(class) => self.write_class(class),
            TypeDecl::Enum(e) => self.write_enum(e),
        }
    }

    fn write_class(&mut self, class: &Class) {
        self.line(0, &format!("class {}{} {{", class.name, bases(&class.bases)));

        self.line(1, "// fields");
        for field in &class.fields {
            self.write_field(field);
        }

        self.line(1, "// properties");
        for property in &class.properties {
            self.line(1, &signature(&property.entity, &property.entity.name));
            self.write_accessors(property.getter.as_ref(), property.setter.as_ref());
        }

        self.line(1, "// indexers");
        for indexer in &class.indexers {
            let decl = format!(
                "{}[{}]",
                indexer.entity.name,
                parameters(&indexer.parameters)
            );
            self.line(1, &signature(&indexer.entity, &decl));
            self.write_accessors(indexer.getter.as_ref(), indexer.setter.as_ref());
        }

        self.line(1, "// constructors");
        for ctor in &class.constructors {
            self.write_callable(&ctor.entity, &ctor.parameters, &ctor.body);
        }

        self.line(1, "// methods");
        for method in &class.methods {
            self.write_callable(&method.entity, &method.parameters, &method.body);
        }

        self.line(0, &format!("}}; // class {}", class.name));
    }

    fn write_enum(&mut self, e: &Enum) {
        self.line(0, &format!("enum {}{} {{", e.name, bases(&e.bases)));
        for member in &e.members {
            match &member.init {
                Some(init) => self.line(1, &format!("{} = {init}", member.name)),
                None => self.line(1, &member.name),
            }
        }
        self.line(0, &format!("}}; // enum {}", e.name));
    }

    fn write_field(&mut self, field: &Field) {
        let decl = match &field.init {
            Some(init) => format!("{} = {init}", field.entity.name),
            None => field.entity.name.clone(),
        };
        self.line(1, &format!("{};", signature(&field.entity, &decl)));
    }

    fn write_callable(&mut self, entity: &Entity, params: &[Parameter], body: &Body) {
        let decl = format!("{}({})", entity.name, parameters(params));
        let sig = signature(entity, &decl);
        self.write_with_body(&sig, &body.text);
    }

    fn write_accessors(&mut self, getter: Option<&Accessor>, setter: Option<&Accessor>) {
        for (label, accessor) in [("getter", getter), ("setter", setter)] {
            if let Some(accessor) = accessor {
                let head = format!("{}{label}:", modifiers(&accessor.entity.modifiers));
                self.write_with_body(&head, &accessor.body.text);
            }
        }
    }

    /// Body text goes out exactly as captured, starting on its own line.
    fn write_with_body(&mut self, head: &str, body: &str) {
        if body.trim().is_empty() {
            self.line(1, &format!("{head};"));
            return;
        }
        self.line(1, head);
        self.output.push_str(body);
        if !body.ends_with('\n') {
            self.output.push('\n');
        }
    }

    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Modifier keywords, each followed by a space, in the order
/// static, public, private, internal, override.
pub fn modifiers(m: &Modifiers) -> String {
    [
        (m.is_static, "static"),
        (m.is_public, "public"),
        (m.is_private, "private"),
        (m.is_internal, "internal"),
        (m.is_override, "override"),
    ]
    .into_iter()
    .filter(|(set, _)| *set)
    .map(|(_, keyword)| format!("{keyword} "))
    .collect()
}

/// `type name [= default]`, comma-joined.
pub fn parameters(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| match &p.option_value {
            Some(default) => format!("{} {} = {default}", p.ty, p.name),
            None => format!("{} {}", p.ty, p.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn signature(entity: &Entity, decl: &str) -> String {
    let prefix = modifiers(&entity.modifiers);
    if entity.ty.is_empty() {
        format!("{prefix}{decl}")
    } else {
        format!("{prefix}{} {decl}", entity.ty)
    }
}

fn bases(bases: &[String]) -> String {
    if bases.is_empty() {
        String::new()
    } else {
        format!(" : {}", bases.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_order_is_fixed() {
        let m = Modifiers {
            is_override: true,
            is_public: true,
            is_static: true,
            is_private: true,
            is_internal: true,
        };
        assert_eq!(modifiers(&m), "static public private internal override ");
        assert_eq!(modifiers(&Modifiers::default()), "");
    }

    #[test]
    fn parameters_render_defaults() {
        let mut b = Parameter::new("b", "string");
        b.option_value = Some("\"x\"".into());
        let out = parameters(&[Parameter::new("a", "int"), b]);
        assert_eq!(out, "int a, string b = \"x\"");
        assert_eq!(parameters(&[]), "");
    }

    #[test]
    fn empty_body_closes_the_signature() {
        let mut emitter = Emitter::new();
        emitter.write_callable(&Entity::new("Run", "void"), &[], &Body::default());
        assert_eq!(emitter.finish(), "    void Run();\n");
    }

    #[test]
    fn multi_line_body_is_not_reindented() {
        let body = Body::new("{\n  a();\n\tb();\n}");
        let mut emitter = Emitter::new();
        emitter.write_callable(&Entity::new("Run", "void"), &[], &body);
        assert_eq!(emitter.finish(), "    void Run()\n{\n  a();\n\tb();\n}\n");
    }

    #[test]
    fn unnamed_namespace_has_bare_header() {
        let mut emitter = Emitter::new();
        emitter.write_namespace(&Namespace::new(None));
        assert_eq!(emitter.finish(), "namespace {\n} // namespace\n");
    }
}
