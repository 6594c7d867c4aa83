//! Class members and executable bodies.
//!
//! Every member kind embeds an [`Entity`] carrying the attributes shared by
//! all of them. The [`Member`] trait exposes that entity uniformly so the
//! builder fills it the same way for every kind.

use serde::{Deserialize, Serialize};

/// Independent modifier flags.
///
/// These are deliberately not collapsed into a single visibility: the source
/// tree can mark a member both public and private, and that is preserved
/// rather than silently resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub is_public: bool,
    pub is_private: bool,
    pub is_internal: bool,
    pub is_override: bool,
    pub is_static: bool,
}

impl Modifiers {
    /// Number of visibility flags set (public, private, internal).
    pub fn visibility_count(&self) -> usize {
        [self.is_public, self.is_private, self.is_internal]
            .into_iter()
            .filter(|&set| set)
            .count()
    }

    /// More than one visibility flag is set.
    pub fn is_ambiguous(&self) -> bool {
        self.visibility_count() > 1
    }
}

/// Attributes common to every member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Declared or return type text; empty when the member has none.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(flatten)]
    pub modifiers: Modifiers,
    /// Concatenated attribute-section text, e.g. `[CompilerGenerated]`.
    pub attributes: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }
}

/// Uniform access to the embedded [`Entity`].
pub trait Member {
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;

    fn name(&self) -> &str {
        &self.entity().name
    }
}

macro_rules! impl_member {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Member for $ty {
                fn entity(&self) -> &Entity {
                    &self.entity
                }

                fn entity_mut(&mut self) -> &mut Entity {
                    &mut self.entity
                }
            }
        )*
    };
}

impl_member!(Field, Method, Constructor, Property, Indexer, Accessor);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(flatten)]
    pub entity: Entity,
    pub init: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    #[serde(flatten)]
    pub entity: Entity,
    pub parameters: Vec<Parameter>,
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(flatten)]
    pub entity: Entity,
    pub parameters: Vec<Parameter>,
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    #[serde(flatten)]
    pub entity: Entity,
    /// Only populated for parameterized (indexed) properties.
    pub parameters: Vec<Parameter>,
    pub getter: Option<Accessor>,
    pub setter: Option<Accessor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indexer {
    #[serde(flatten)]
    pub entity: Entity,
    pub parameters: Vec<Parameter>,
    pub getter: Option<Accessor>,
    pub setter: Option<Accessor>,
}

/// A getter or setter with its own modifiers and body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    #[serde(flatten)]
    pub entity: Entity,
    pub body: Body,
}

impl Accessor {
    /// Private or internal accessors lower to private methods.
    pub fn is_restricted(&self) -> bool {
        let m = &self.entity.modifiers;
        m.is_private || m.is_internal
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Default-value literal text, without the `=`.
    pub option_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            option_value: None,
        }
    }
}

/// Verbatim statement-block text plus every member access found inside it.
///
/// `invokes` is metadata only; it never changes how `text` is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub text: String,
    pub invokes: Vec<Invoke>,
}

impl Body {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            invokes: Vec::new(),
        }
    }
}

/// One member-access expression: `target.member`, with the resolved
/// declaring type of the access (or the unresolved placeholder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoke {
    pub target: String,
    pub member: String,
    #[serde(rename = "type")]
    pub ty: String,
}
