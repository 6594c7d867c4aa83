//! Walks a syntax tree and builds [`Namespace`] fragments.
//!
//! Processing order per namespace:
//! 1. every non-enum type declaration, in tree order
//! 2. every enum, in tree order
//!
//! Later passes and the emitter rely on enums following classes.

use tk_ir::{
    Accessor, Body, Class, Constructor, Entity, Enum, EnumMember, Field, Indexer, Invoke, Method,
    Namespace, Parameter, Property, TypeDecl,
};
use tracing::{debug, warn};

use crate::error::BuildError;
use crate::parallel::CancellationToken;
use crate::resolve::{resolve_target_type, resolve_type, type_string};
use crate::split::{split_first_assign, split_last_assign};
use crate::syntax::{Modifier, NodeKind, Role, SyntaxNode};

/// Builds IR fragments from syntax trees.
///
/// A builder holds no per-build state, so one instance can be shared by
/// every worker of a parallel build.
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    cancel: Option<CancellationToken>,
}

/// The type declarations owned by one namespace scope.
struct Scope<'a, N> {
    name: Option<String>,
    types: Vec<&'a N>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `token` before each type declaration.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Build the single namespace described by `root`.
    pub fn build<N: SyntaxNode>(&self, root: &N) -> Result<Namespace, BuildError> {
        let mut fragments = self.build_fragments(root)?;
        match fragments.len() {
            1 => Ok(fragments.remove(0)),
            found => Err(BuildError::AmbiguousRoot { found }),
        }
    }

    /// Build one fragment per namespace at or under `root`.
    ///
    /// Type declarations outside any namespace land in an unnamed fragment,
    /// which is dropped when empty unless it is the only one.
    pub fn build_fragments<N: SyntaxNode>(&self, root: &N) -> Result<Vec<Namespace>, BuildError> {
        let mut scopes = Vec::new();
        if root.kind() == NodeKind::Namespace {
            scopes.push(Scope {
                name: Some(root.name().to_string()),
                types: Vec::new(),
            });
        } else {
            scopes.push(Scope {
                name: None,
                types: Vec::new(),
            });
            if root.kind().is_type_declaration() {
                scopes[0].types.push(root);
            }
        }
        collect_scopes(root, 0, &mut scopes);

        if scopes.len() > 1 && scopes[0].name.is_none() && scopes[0].types.is_empty() {
            scopes.remove(0);
        }

        scopes
            .into_iter()
            .map(|scope| self.build_scope(scope))
            .collect()
    }

    fn build_scope<N: SyntaxNode>(&self, scope: Scope<'_, N>) -> Result<Namespace, BuildError> {
        let mut ns = Namespace::new(scope.name);
        let (enums, others): (Vec<&N>, Vec<&N>) = scope
            .types
            .into_iter()
            .partition(|t| t.kind() == NodeKind::Enum);

        for decl in others {
            self.check_cancelled(decl)?;
            ns.types.push(TypeDecl::Class(self.build_class(decl)?));
        }
        for decl in enums {
            self.check_cancelled(decl)?;
            ns.types.push(TypeDecl::Enum(build_enum(decl)));
        }

        debug!(
            namespace = ns.display_name(),
            types = ns.types.len(),
            "built namespace fragment"
        );
        Ok(ns)
    }

    fn check_cancelled<N: SyntaxNode>(&self, next: &N) -> Result<(), BuildError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(BuildError::Cancelled {
                next_type: next.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn build_class<N: SyntaxNode>(&self, decl: &N) -> Result<Class, BuildError> {
        let mut class = Class::new(decl.name());
        class.bases = decl
            .children_with_role(Role::BaseType)
            .map(|base| type_string(resolve_type(base)))
            .collect();

        for member in decl.children() {
            match member.kind() {
                NodeKind::Field => class.fields.push(build_field(member)?),
                NodeKind::Property => class.properties.push(build_property(member)),
                NodeKind::Indexer => class.indexers.push(build_indexer(member)),
                NodeKind::Method => class.methods.push(build_method(member)),
                NodeKind::Constructor => class.constructors.push(build_constructor(member)),
                _ => {}
            }
        }

        debug!(
            class = %class.name,
            fields = class.fields.len(),
            properties = class.properties.len(),
            indexers = class.indexers.len(),
            methods = class.methods.len(),
            constructors = class.constructors.len(),
            "built class"
        );
        Ok(class)
    }
}

/// Register every type declaration under `node` with the innermost scope.
fn collect_scopes<'a, N: SyntaxNode>(node: &'a N, current: usize, scopes: &mut Vec<Scope<'a, N>>) {
    for child in node.children() {
        let kind = child.kind();
        if kind == NodeKind::Namespace {
            let name = match scopes[current].name.as_deref() {
                Some(outer) if !outer.is_empty() => format!("{outer}.{}", child.name()),
                _ => child.name().to_string(),
            };
            scopes.push(Scope {
                name: Some(name),
                types: Vec::new(),
            });
            let nested = scopes.len() - 1;
            collect_scopes(child, nested, scopes);
        } else {
            if kind.is_type_declaration() {
                scopes[current].types.push(child);
            }
            collect_scopes(child, current, scopes);
        }
    }
}

/// Fill the attributes shared by every member kind.
fn apply_entity<N: SyntaxNode>(node: &N, entity: &mut Entity) {
    entity.name = node.name().to_string();
    entity.ty = node
        .child(Role::Type)
        .map(|ty| ty.text().to_string())
        .unwrap_or_default();
    entity.attributes = node.attributes().concat();

    let modifiers = &mut entity.modifiers;
    modifiers.is_public = node.has_modifier(Modifier::Public);
    modifiers.is_private = node.has_modifier(Modifier::Private);
    modifiers.is_internal = node.has_modifier(Modifier::Internal);
    modifiers.is_override = node.has_modifier(Modifier::Override);
    modifiers.is_static = node.has_modifier(Modifier::Static);

    if modifiers.is_ambiguous() {
        warn!(
            member = %entity.name,
            kind = %node.kind(),
            "member carries conflicting visibility modifiers; keeping all of them"
        );
    }
}

/// Verbatim text, falling back to the name for nodes dumped without text.
fn source_text<N: SyntaxNode>(node: &N) -> &str {
    if node.text().is_empty() {
        node.name()
    } else {
        node.text()
    }
}

fn build_field<N: SyntaxNode>(node: &N) -> Result<Field, BuildError> {
    let mut field = Field::default();
    apply_entity(node, &mut field.entity);

    let variables: Vec<&N> = node.children_with_role(Role::Variable).collect();
    let [variable] = variables.as_slice() else {
        let name = variables
            .iter()
            .map(|v| split_first_assign(source_text(*v)).0)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(BuildError::precondition(
            NodeKind::Field,
            &name,
            format!(
                "field declaration binds {} variables, expected exactly one",
                variables.len()
            ),
        ));
    };

    let (name, init) = split_first_assign(source_text(*variable));
    field.entity.name = name;
    field.init = init;
    Ok(field)
}

fn build_property<N: SyntaxNode>(node: &N) -> Property {
    let mut property = Property::default();
    apply_entity(node, &mut property.entity);
    property.parameters = build_parameters(node);
    property.getter = node.child(Role::Getter).map(build_accessor);
    property.setter = node.child(Role::Setter).map(build_accessor);
    property
}

fn build_indexer<N: SyntaxNode>(node: &N) -> Indexer {
    let mut indexer = Indexer::default();
    apply_entity(node, &mut indexer.entity);
    indexer.parameters = build_parameters(node);
    indexer.getter = node.child(Role::Getter).map(build_accessor);
    indexer.setter = node.child(Role::Setter).map(build_accessor);
    indexer
}

fn build_accessor<N: SyntaxNode>(node: &N) -> Accessor {
    let mut accessor = Accessor::default();
    apply_entity(node, &mut accessor.entity);
    accessor.body = build_body(node.child(Role::Body));
    accessor
}

fn build_method<N: SyntaxNode>(node: &N) -> Method {
    let mut method = Method::default();
    apply_entity(node, &mut method.entity);
    method.parameters = build_parameters(node);
    method.body = build_body(node.child(Role::Body));
    method
}

fn build_constructor<N: SyntaxNode>(node: &N) -> Constructor {
    let mut ctor = Constructor::default();
    apply_entity(node, &mut ctor.entity);
    ctor.parameters = build_parameters(node);
    ctor.body = build_body(node.child(Role::Body));
    ctor
}

fn build_parameters<N: SyntaxNode>(node: &N) -> Vec<Parameter> {
    node.children_with_role(Role::Parameter)
        .map(|param| Parameter {
            name: param.name().to_string(),
            ty: param
                .child(Role::Type)
                .map(|ty| ty.text().to_string())
                .unwrap_or_default(),
            option_value: split_last_assign(param.text()).1,
        })
        .collect()
}

/// Capture the block text and an [`Invoke`] for every member access in it.
fn build_body<N: SyntaxNode>(block: Option<&N>) -> Body {
    let Some(block) = block else {
        return Body::default();
    };

    let mut accesses = Vec::new();
    collect_member_accesses(block, &mut accesses);

    Body {
        text: block.text().to_string(),
        invokes: accesses
            .into_iter()
            .map(|access| Invoke {
                target: access
                    .child(Role::Target)
                    .map(|target| target.text().to_string())
                    .unwrap_or_default(),
                member: access.name().to_string(),
                ty: type_string(resolve_target_type(access)),
            })
            .collect(),
    }
}

/// Post-order, so `a.b` is recorded before `a.b.c`.
fn collect_member_accesses<'a, N: SyntaxNode>(node: &'a N, out: &mut Vec<&'a N>) {
    for child in node.children() {
        collect_member_accesses(child, out);
        if child.kind() == NodeKind::MemberReference {
            out.push(child);
        }
    }
}

fn build_enum<N: SyntaxNode>(decl: &N) -> Enum {
    let mut e = Enum::new(decl.name());
    e.bases = decl
        .children_with_role(Role::BaseType)
        .map(|base| base.text().to_string())
        .collect();
    e.members = decl
        .children()
        .filter(|member| member.kind() == NodeKind::EnumMember)
        .map(|member| {
            let (name, init) = split_first_assign(source_text(member));
            EnumMember { name, init }
        })
        .collect();
    e
}
