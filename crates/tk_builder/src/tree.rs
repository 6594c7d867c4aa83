//! JSON-backed syntax tree.
//!
//! Decompiler front ends that run out of process dump their tree in this
//! shape. Every field defaults when absent, so a dump only spells out what a
//! node actually carries:
//!
//! ```json
//! { "kind": "field", "modifiers": ["private"], "children": [
//!     { "kind": "type_reference", "role": "type", "text": "int" },
//!     { "kind": "variable", "role": "variable", "text": "x = 0" } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::syntax::{Annotation, Modifier, NodeKind, Role, SyntaxNode};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeNode {
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "is_default_role")]
    pub role: Role,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

fn is_default_role(role: &Role) -> bool {
    *role == Role::None
}

impl TreeNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_attribute(mut self, text: impl Into<String>) -> Self {
        self.attributes.push(text.into());
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.extend(children);
        self
    }
}

impl SyntaxNode for TreeNode {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn role(&self) -> Role {
        self.role
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }

    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TypeRef;

    #[test]
    fn terse_json_fills_defaults() {
        let node = TreeNode::from_json(
            r#"{ "kind": "field", "modifiers": ["private", "static"], "children": [
                { "kind": "type_reference", "role": "type", "text": "int" },
                { "kind": "variable", "role": "variable", "text": "x = 0" } ] }"#,
        )
        .unwrap();

        assert_eq!(node.kind, NodeKind::Field);
        assert_eq!(node.role, Role::None);
        assert!(node.has_modifier(Modifier::Static));
        assert!(!node.has_modifier(Modifier::Public));
        let ty = node.child(Role::Type).unwrap();
        assert_eq!(ty.text, "int");
    }

    #[test]
    fn annotations_deserialize_by_tag() {
        let node = TreeNode::from_json(
            r#"{ "kind": "member_reference", "name": "Count", "annotations": [
                { "property": {
                    "name": "Count",
                    "property_type": { "namespace": "System", "name": "Int32" },
                    "declaring_type": { "namespace": "SmartQuant", "name": "BarSeries" } } } ] }"#,
        )
        .unwrap();

        match &node.annotations[0] {
            Annotation::Property { declaring_type, .. } => {
                assert_eq!(declaring_type, &TypeRef::new("SmartQuant", "BarSeries"));
            }
            other => panic!("unexpected annotation {other:?}"),
        }
    }

    #[test]
    fn serialization_skips_empty_fields() {
        let node = TreeNode::new(NodeKind::Parameter).named("x");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"kind":"parameter","name":"x"}"#);
    }
}
