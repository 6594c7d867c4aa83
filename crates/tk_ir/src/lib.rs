//! Language-neutral object-oriented program IR for transkit.
//!
//! The model is plain data: a [`Namespace`] owns its type declarations, a
//! [`Class`] owns its members, and every executable member owns its [`Body`].
//! Nothing is shared or referenced cyclically, so passes can rewrite a
//! namespace in place and the emitter can read it from several threads.
//!
//! Lifecycle:
//! - `tk_builder` creates every node while walking one syntax subtree.
//! - `tk_transform` drains properties/indexers into methods and removes
//!   generated fields and license-check constructors.
//! - `tk_emit` only reads.

pub mod member;

pub use member::{
    Accessor, Body, Constructor, Entity, Field, Indexer, Invoke, Member, Method, Modifiers,
    Parameter, Property,
};

use serde::{Deserialize, Serialize};

/// Placeholder rendered wherever a type could not be resolved.
pub const UNRESOLVED_TYPE: &str = "NULL TYPE";

/// Return type given to synthesized setter methods.
pub const VOID_TYPE: &str = "void";

/// A namespace and the classes/enums declared in it, in encounter order.
///
/// `name` is `None` for declarations outside any namespace; all such
/// fragments share one default bucket when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: Option<String>,
    pub types: Vec<TypeDecl>,
}

impl Namespace {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            types: Vec::new(),
        }
    }

    /// The namespace name, or an empty string for the default bucket.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.types.iter().filter_map(|t| match t {
            TypeDecl::Class(c) => Some(c),
            TypeDecl::Enum(_) => None,
        })
    }

    pub fn classes_mut(&mut self) -> impl Iterator<Item = &mut Class> {
        self.types.iter_mut().filter_map(|t| match t {
            TypeDecl::Class(c) => Some(c),
            TypeDecl::Enum(_) => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.types.iter().filter_map(|t| match t {
            TypeDecl::Enum(e) => Some(e),
            TypeDecl::Class(_) => None,
        })
    }

    pub fn find(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name() == name)
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes().find(|c| c.name == name)
    }
}

/// A class or enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDecl {
    Class(Class),
    Enum(Enum),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Class(c) => &c.name,
            TypeDecl::Enum(e) => &e.name,
        }
    }

    pub fn bases(&self) -> &[String] {
        match self {
            TypeDecl::Class(c) => &c.bases,
            TypeDecl::Enum(e) => &e.bases,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, TypeDecl::Enum(_))
    }
}

impl From<Class> for TypeDecl {
    fn from(class: Class) -> Self {
        TypeDecl::Class(class)
    }
}

impl From<Enum> for TypeDecl {
    fn from(e: Enum) -> Self {
        TypeDecl::Enum(e)
    }
}

/// A class (or struct/interface) with its members grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    /// Fully qualified base-type names, in declaration order.
    pub bases: Vec<String>,
    pub fields: Vec<Field>,
    pub properties: Vec<Property>,
    pub constructors: Vec<Constructor>,
    pub methods: Vec<Method>,
    pub indexers: Vec<Indexer>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether properties or indexers are still waiting to be lowered.
    pub fn has_accessor_members(&self) -> bool {
        !self.properties.is_empty() || !self.indexers.is_empty()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.entity.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.entity.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub bases: Vec<String>,
    pub members: Vec<EnumMember>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    /// Literal initializer text, without the `=`.
    pub init: Option<String>,
}
