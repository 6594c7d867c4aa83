//! The boundary with the syntax-tree provider.
//!
//! The builder never sees a concrete parser. Anything that can enumerate
//! children, return verbatim text, expose type annotations and answer kind,
//! role and modifier queries can be built into the IR by implementing
//! [`SyntaxNode`]. [`crate::tree::TreeNode`] is the built-in implementation
//! backed by a JSON dump.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a node is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    CompilationUnit,
    Namespace,
    Class,
    Struct,
    Interface,
    Enum,
    Field,
    /// One variable bound by a field declaration, text `name [= init]`.
    Variable,
    Property,
    Indexer,
    Method,
    Constructor,
    Accessor,
    Parameter,
    EnumMember,
    Block,
    MemberReference,
    IndexerExpression,
    TypeReference,
    #[default]
    Other,
}

impl NodeKind {
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::Class | NodeKind::Struct | NodeKind::Interface | NodeKind::Enum
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::CompilationUnit => "compilation unit",
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::Struct => "struct",
            NodeKind::Interface => "interface",
            NodeKind::Enum => "enum",
            NodeKind::Field => "field",
            NodeKind::Variable => "variable",
            NodeKind::Property => "property",
            NodeKind::Indexer => "indexer",
            NodeKind::Method => "method",
            NodeKind::Constructor => "constructor",
            NodeKind::Accessor => "accessor",
            NodeKind::Parameter => "parameter",
            NodeKind::EnumMember => "enum member",
            NodeKind::Block => "block",
            NodeKind::MemberReference => "member reference",
            NodeKind::IndexerExpression => "indexer expression",
            NodeKind::TypeReference => "type reference",
            NodeKind::Other => "node",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slot a child occupies in its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    None,
    /// Declared type of a field/property/parameter, return type of a method.
    Type,
    BaseType,
    Variable,
    Parameter,
    Body,
    Getter,
    Setter,
    /// Receiver of a member access or indexing expression.
    Target,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Private,
    Internal,
    Protected,
    Static,
    Override,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByRef {
    Ref,
    Out,
}

impl ByRef {
    pub fn keyword(self) -> &'static str {
        match self {
            ByRef::Ref => "ref",
            ByRef::Out => "out",
        }
    }
}

/// A semantic type as attached to nodes by the upstream decompiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<TypeRef>,
    /// Element type when this is an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<TypeRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_ref: Option<ByRef>,
}

impl TypeRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn array_of(element: TypeRef) -> Self {
        Self {
            element: Some(Box::new(element)),
            ..Default::default()
        }
    }

    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.type_args = args;
        self
    }

    pub fn is_array(&self) -> bool {
        self.element.is_some()
    }

    /// Fully qualified display form, e.g. `System.Collections.Generic.List<int>`.
    pub fn to_type_string(&self) -> String {
        let mut out = String::new();
        if let Some(by_ref) = self.by_ref {
            out.push_str(by_ref.keyword());
            out.push(' ');
        }
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        if let Some(element) = &self.element {
            element.write_plain(out);
            out.push_str("[]");
            return;
        }
        if let Some(alias) = self.keyword_alias() {
            out.push_str(alias);
            return;
        }
        if let Some(ns) = self.namespace.as_deref().filter(|ns| !ns.is_empty()) {
            out.push_str(ns);
            out.push('.');
        }
        // Metadata names carry a generic arity suffix (`List`1`).
        out.push_str(self.name.split('`').next().unwrap_or_default());
        if !self.type_args.is_empty() {
            out.push('<');
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                arg.write_plain(out);
            }
            out.push('>');
        }
    }

    fn keyword_alias(&self) -> Option<&'static str> {
        if self.namespace.as_deref() != Some("System") || !self.type_args.is_empty() {
            return None;
        }
        let alias = match self.name.as_str() {
            "Void" => "void",
            "Object" => "object",
            "String" => "string",
            "Boolean" => "bool",
            "Char" => "char",
            "SByte" => "sbyte",
            "Byte" => "byte",
            "Int16" => "short",
            "UInt16" => "ushort",
            "Int32" => "int",
            "UInt32" => "uint",
            "Int64" => "long",
            "UInt64" => "ulong",
            "Single" => "float",
            "Double" => "double",
            "Decimal" => "decimal",
            _ => return None,
        };
        Some(alias)
    }
}

/// Typed metadata attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// The node's own declared type.
    TypeDefinition(TypeRef),
    TypeReference(TypeRef),
    /// Produced by upstream type inference.
    InferredType(TypeRef),
    /// A local or temporary binding.
    Variable {
        name: String,
        #[serde(rename = "type")]
        ty: TypeRef,
    },
    /// Backlink to the field a node accesses.
    Field {
        name: String,
        field_type: TypeRef,
        declaring_type: TypeRef,
    },
    /// Backlink to the property a node accesses.
    Property {
        name: String,
        property_type: TypeRef,
        declaring_type: TypeRef,
    },
}

/// A node of an already-decompiled syntax tree.
pub trait SyntaxNode: Sized {
    fn kind(&self) -> NodeKind;

    fn role(&self) -> Role;

    /// Declared name, or the accessed member name for member references.
    fn name(&self) -> &str;

    /// Verbatim source text of the node.
    fn text(&self) -> &str;

    fn children(&self) -> impl Iterator<Item = &Self>;

    fn annotations(&self) -> &[Annotation];

    fn has_modifier(&self, modifier: Modifier) -> bool;

    /// Text of each attribute section, e.g. `[CompilerGenerated]`.
    fn attributes(&self) -> &[String];

    /// First child occupying `role`.
    fn child(&self, role: Role) -> Option<&Self> {
        self.children().find(|c| c.role() == role)
    }

    fn children_with_role(&self, role: Role) -> impl Iterator<Item = &Self> {
        self.children().filter(move |c| c.role() == role)
    }
}
