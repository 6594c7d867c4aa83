//! Type resolution over heterogeneous annotations.
//!
//! A node may carry several annotations that each imply a type. They are
//! tried in a fixed precedence order, most specific first; the first one
//! that yields a type wins. Failure is not an error: callers render
//! [`UNRESOLVED_TYPE`] instead.

use tk_ir::UNRESOLVED_TYPE;

use crate::syntax::{Annotation, NodeKind, Role, SyntaxNode, TypeRef};

/// Where a resolved type came from, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSource {
    DeclaredType,
    TypeReference,
    InferredType,
    VariableType,
    FieldType,
    PropertyType,
    /// Element type of the array being indexed.
    IndexerElement,
}

impl TypeSource {
    pub const PRECEDENCE: [TypeSource; 7] = [
        TypeSource::DeclaredType,
        TypeSource::TypeReference,
        TypeSource::InferredType,
        TypeSource::VariableType,
        TypeSource::FieldType,
        TypeSource::PropertyType,
        TypeSource::IndexerElement,
    ];

    /// Try this one source against `node`.
    pub fn lookup<N: SyntaxNode>(self, node: &N) -> Option<&TypeRef> {
        let mut annotations = node.annotations().iter();
        match self {
            TypeSource::DeclaredType => annotations.find_map(|a| match a {
                Annotation::TypeDefinition(ty) => Some(ty),
                _ => None,
            }),
            TypeSource::TypeReference => annotations.find_map(|a| match a {
                Annotation::TypeReference(ty) => Some(ty),
                _ => None,
            }),
            TypeSource::InferredType => annotations.find_map(|a| match a {
                Annotation::InferredType(ty) => Some(ty),
                _ => None,
            }),
            TypeSource::VariableType => annotations.find_map(|a| match a {
                Annotation::Variable { ty, .. } => Some(ty),
                _ => None,
            }),
            TypeSource::FieldType => annotations.find_map(|a| match a {
                Annotation::Field { field_type, .. } => Some(field_type),
                _ => None,
            }),
            TypeSource::PropertyType => annotations.find_map(|a| match a {
                Annotation::Property { property_type, .. } => Some(property_type),
                _ => None,
            }),
            TypeSource::IndexerElement => {
                if node.kind() != NodeKind::IndexerExpression {
                    return None;
                }
                let target = node.child(Role::Target)?;
                resolve_type(target)?.element.as_deref()
            }
        }
    }
}

/// A type together with the source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub ty: &'a TypeRef,
    pub source: TypeSource,
}

/// Resolve the semantic type of an arbitrary node.
pub fn resolve_type<N: SyntaxNode>(node: &N) -> Option<&TypeRef> {
    resolve_with_source(node).map(|r| r.ty)
}

pub fn resolve_with_source<N: SyntaxNode>(node: &N) -> Option<Resolution<'_>> {
    TypeSource::PRECEDENCE
        .iter()
        .find_map(|&source| source.lookup(node).map(|ty| Resolution { ty, source }))
}

/// Resolve the type that declares the member accessed by `access`.
///
/// A property or field backlink on the access names its declaring type
/// directly; otherwise the receiver expression's type is used.
pub fn resolve_target_type<N: SyntaxNode>(access: &N) -> Option<&TypeRef> {
    let annotations = access.annotations();
    let property = annotations.iter().find_map(|a| match a {
        Annotation::Property { declaring_type, .. } => Some(declaring_type),
        _ => None,
    });
    let field = || {
        annotations.iter().find_map(|a| match a {
            Annotation::Field { declaring_type, .. } => Some(declaring_type),
            _ => None,
        })
    };
    property
        .or_else(field)
        .or_else(|| access.child(Role::Target).and_then(resolve_type))
}

/// Display form of a resolved type, or the unresolved placeholder.
pub fn type_string(ty: Option<&TypeRef>) -> String {
    ty.map_or_else(|| UNRESOLVED_TYPE.to_string(), TypeRef::to_type_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeNode;

    fn int() -> TypeRef {
        TypeRef::new("System", "Int32")
    }

    fn double() -> TypeRef {
        TypeRef::new("System", "Double")
    }

    #[test]
    fn declared_type_wins_over_inferred_type() {
        let node = TreeNode::new(NodeKind::Other)
            .with_annotation(Annotation::InferredType(double()))
            .with_annotation(Annotation::TypeDefinition(int()));

        let resolved = resolve_with_source(&node).unwrap();
        assert_eq!(resolved.ty, &int());
        assert_eq!(resolved.source, TypeSource::DeclaredType);
    }

    #[test]
    fn each_source_is_tried_in_order() {
        let variable = TreeNode::new(NodeKind::Other)
            .with_annotation(Annotation::Field {
                name: "f".into(),
                field_type: double(),
                declaring_type: TypeRef::named("Owner"),
            })
            .with_annotation(Annotation::Variable {
                name: "v".into(),
                ty: int(),
            });
        let resolved = resolve_with_source(&variable).unwrap();
        assert_eq!(resolved.source, TypeSource::VariableType);
        assert_eq!(resolved.ty, &int());

        let property = TreeNode::new(NodeKind::Other).with_annotation(Annotation::Property {
            name: "P".into(),
            property_type: double(),
            declaring_type: TypeRef::named("Owner"),
        });
        assert_eq!(
            resolve_with_source(&property).unwrap().source,
            TypeSource::PropertyType
        );
    }

    #[test]
    fn indexing_an_array_yields_its_element_type() {
        let node = TreeNode::new(NodeKind::IndexerExpression).with_child(
            TreeNode::new(NodeKind::Other)
                .with_role(Role::Target)
                .with_annotation(Annotation::Variable {
                    name: "prices".into(),
                    ty: TypeRef::array_of(double()),
                }),
        );

        let resolved = resolve_with_source(&node).unwrap();
        assert_eq!(resolved.source, TypeSource::IndexerElement);
        assert_eq!(resolved.ty.to_type_string(), "double");
    }

    #[test]
    fn indexing_a_non_array_is_unresolved() {
        let node = TreeNode::new(NodeKind::IndexerExpression).with_child(
            TreeNode::new(NodeKind::Other)
                .with_role(Role::Target)
                .with_annotation(Annotation::TypeReference(TypeRef::named("Dictionary"))),
        );
        assert!(resolve_type(&node).is_none());
        assert_eq!(type_string(resolve_type(&node)), UNRESOLVED_TYPE);
    }

    #[test]
    fn target_type_prefers_declaring_type_backlinks() {
        let access = TreeNode::new(NodeKind::MemberReference)
            .named("Count")
            .with_annotation(Annotation::Field {
                name: "Count".into(),
                field_type: int(),
                declaring_type: TypeRef::new("SmartQuant", "Fields"),
            })
            .with_annotation(Annotation::Property {
                name: "Count".into(),
                property_type: int(),
                declaring_type: TypeRef::new("SmartQuant", "BarSeries"),
            })
            .with_child(
                TreeNode::new(NodeKind::Other)
                    .with_role(Role::Target)
                    .with_annotation(Annotation::TypeReference(TypeRef::named("Other"))),
            );

        assert_eq!(
            type_string(resolve_target_type(&access)),
            "SmartQuant.BarSeries"
        );
    }

    #[test]
    fn target_type_falls_back_to_receiver() {
        let access = TreeNode::new(NodeKind::MemberReference)
            .named("Length")
            .with_child(
                TreeNode::new(NodeKind::Other)
                    .with_role(Role::Target)
                    .with_text("name")
                    .with_annotation(Annotation::InferredType(TypeRef::new(
                        "System", "String",
                    ))),
            );
        assert_eq!(type_string(resolve_target_type(&access)), "string");

        let bare = TreeNode::new(NodeKind::MemberReference).named("Length");
        assert_eq!(type_string(resolve_target_type(&bare)), UNRESOLVED_TYPE);
    }
}
