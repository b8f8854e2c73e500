//! Child slots of AST nodes and copy-on-write reconstruction of edited nodes.
//!
//! Every node kind lists its children in a fixed order, which is both the order in which the
//! visitor traverses them and the order in which [rebuild] consumes their edited versions.

use super::path::{Path, PathSegment};
use crate::ast::*;
use crate::error::{Error, ErrorType, Result};
use bumpalo::collections::Vec as BumpVec;

/// A child node and its key within its parent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Child<'a> {
    field: Option<PathSegment>,
    index: Option<usize>,
    pub(crate) node: Node<'a>,
}

impl<'a> Child<'a> {
    /// Pushes this child's key onto the `path` and returns how many segments were pushed.
    #[inline]
    pub(crate) fn push_key(&self, path: &mut Path) -> usize {
        let mut pushed = 0;
        if let Some(field) = self.field {
            path.push(field);
            pushed += 1;
        }
        if let Some(index) = self.index {
            path.push(PathSegment::Index(index));
            pushed += 1;
        }
        pushed
    }
}

#[derive(Default)]
struct Children<'a> {
    children: Vec<Child<'a>>,
}

impl<'a> Children<'a> {
    #[inline]
    fn single(&mut self, field: PathSegment, node: Node<'a>) {
        self.children.push(Child {
            field: Some(field),
            index: None,
            node,
        });
    }

    #[inline]
    fn optional(&mut self, field: PathSegment, node: Option<Node<'a>>) {
        if let Some(node) = node {
            self.single(field, node);
        }
    }

    #[inline]
    fn list(&mut self, field: Option<PathSegment>, nodes: impl Iterator<Item = Node<'a>>) {
        for (index, node) in nodes.enumerate() {
            self.children.push(Child {
                field,
                index: Some(index),
                node,
            });
        }
    }
}

/// Lists the children of a node in traversal order.
pub(crate) fn children(node: Node<'_>) -> Vec<Child<'_>> {
    let mut out = Children::default();
    match node {
        Node::Document(document) => {
            out.list(None, document.definitions.iter().map(|d| Node::from(*d)));
        }
        Node::OperationDefinition(operation) => {
            out.optional(PathSegment::Name, operation.name.as_ref().map(Node::Name));
            out.list(
                Some(PathSegment::VariableDefinitions),
                operation
                    .variable_definitions
                    .iter()
                    .map(|d| Node::VariableDefinition(*d)),
            );
            out.list(
                Some(PathSegment::Directives),
                operation.directives.iter().map(|d| Node::Directive(*d)),
            );
            out.single(
                PathSegment::SelectionSet,
                Node::SelectionSet(operation.selection_set),
            );
        }
        Node::FragmentDefinition(fragment) => {
            out.single(PathSegment::Name, Node::Name(&fragment.name));
            out.single(
                PathSegment::TypeCondition,
                Node::NamedType(&fragment.type_condition),
            );
            out.list(
                Some(PathSegment::Directives),
                fragment.directives.iter().map(|d| Node::Directive(*d)),
            );
            out.single(
                PathSegment::SelectionSet,
                Node::SelectionSet(fragment.selection_set),
            );
        }
        Node::VariableDefinition(definition) => {
            out.single(PathSegment::Variable, Node::Variable(&definition.variable));
            out.single(PathSegment::Type, Node::from(&definition.of_type));
            out.optional(
                PathSegment::DefaultValue,
                definition.default_value.as_ref().map(Node::from),
            );
            out.list(
                Some(PathSegment::Directives),
                definition.directives.iter().map(|d| Node::Directive(*d)),
            );
        }
        Node::SelectionSet(selection_set) => {
            out.list(None, selection_set.selections.iter().map(|s| Node::from(*s)));
        }
        Node::Field(field) => {
            out.optional(PathSegment::Alias, field.alias.as_ref().map(Node::Name));
            out.single(PathSegment::Name, Node::Name(&field.name));
            out.list(
                Some(PathSegment::Arguments),
                field.arguments.iter().map(Node::Argument),
            );
            out.list(
                Some(PathSegment::Directives),
                field.directives.iter().map(|d| Node::Directive(*d)),
            );
            out.optional(
                PathSegment::SelectionSet,
                field.selection_set.map(Node::SelectionSet),
            );
        }
        Node::FragmentSpread(spread) => {
            out.single(PathSegment::Name, Node::Name(&spread.name));
            out.list(
                Some(PathSegment::Directives),
                spread.directives.iter().map(|d| Node::Directive(*d)),
            );
        }
        Node::InlineFragment(fragment) => {
            out.optional(
                PathSegment::TypeCondition,
                fragment.type_condition.as_ref().map(Node::NamedType),
            );
            out.list(
                Some(PathSegment::Directives),
                fragment.directives.iter().map(|d| Node::Directive(*d)),
            );
            out.single(
                PathSegment::SelectionSet,
                Node::SelectionSet(fragment.selection_set),
            );
        }
        Node::Argument(argument) => {
            out.single(PathSegment::Name, Node::Name(&argument.name));
            out.single(PathSegment::Value, Node::from(&argument.value));
        }
        Node::Directive(directive) => {
            out.single(PathSegment::Name, Node::Name(&directive.name));
            out.list(
                Some(PathSegment::Arguments),
                directive.arguments.iter().map(Node::Argument),
            );
        }
        Node::Variable(variable) => {
            out.single(PathSegment::Name, Node::Name(&variable.name));
        }
        Node::NamedType(named_type) => {
            out.single(PathSegment::Name, Node::Name(&named_type.name));
        }
        Node::Type(of_type) => match of_type {
            Type::NamedType(named_type) => {
                out.single(PathSegment::Name, Node::Name(&named_type.name))
            }
            Type::ListType(inner) => out.single(PathSegment::Type, Node::from(*inner)),
            Type::NonNullType(inner) => out.single(PathSegment::Type, Node::from(*inner)),
        },
        Node::Value(value) => match value {
            Value::List(list) => out.list(None, list.values.iter().map(Node::from)),
            Value::Object(object) => out.list(None, object.fields.iter().map(Node::ObjectField)),
            _ => {}
        },
        Node::ObjectField(field) => {
            out.single(PathSegment::Name, Node::Name(&field.name));
            out.single(PathSegment::Value, Node::from(&field.value));
        }
        Node::Name(_) => {}
    }
    out.children
}

/// The edited children of a node, in the order in which [children] listed them. A deleted child
/// is represented as `None`.
struct Edited<'a> {
    parent: ASTKind,
    results: std::vec::IntoIter<Option<Node<'a>>>,
}

impl<'a> Edited<'a> {
    fn required<T: TryFrom<Node<'a>, Error = Error>>(&mut self, slot: PathSegment) -> Result<T> {
        match self.results.next().flatten() {
            Some(node) => T::try_from(node),
            None => Err(Error::new(
                format!("Cannot delete the {} of a {}", slot, self.parent),
                Some(ErrorType::GraphQL),
            )),
        }
    }

    fn optional<T: TryFrom<Node<'a>, Error = Error>>(
        &mut self,
        present: bool,
    ) -> Result<Option<T>> {
        if present {
            self.results.next().flatten().map(T::try_from).transpose()
        } else {
            Ok(None)
        }
    }

    fn list<T: TryFrom<Node<'a>, Error = Error>>(
        &mut self,
        arena: &'a bumpalo::Bump,
        len: usize,
    ) -> Result<BumpVec<'a, T>> {
        let mut list = BumpVec::with_capacity_in(len, arena);
        for _ in 0..len {
            if let Some(node) = self.results.next().flatten() {
                list.push(T::try_from(node)?);
            }
        }
        Ok(list)
    }
}

/// Creates a shallow copy of `node` with its children replaced by their `results`.
///
/// Children that weren't edited are shared by reference with the original node. An edit that
/// doesn't fit its slot, or a deletion of a required child, is an error.
pub(crate) fn rebuild<'a>(
    ctx: &'a ASTContext,
    node: Node<'a>,
    results: Vec<Option<Node<'a>>>,
) -> Result<Node<'a>> {
    let arena = &ctx.arena;
    let mut edited = Edited {
        parent: node.kind(),
        results: results.into_iter(),
    };
    let node = match node {
        Node::Document(document) => Node::Document(ctx.alloc(Document {
            definitions: edited.list(arena, document.definitions.len())?,
        })),
        Node::OperationDefinition(operation) => {
            let name = edited.optional(operation.name.is_some())?;
            let variable_definitions = edited.list(arena, operation.variable_definitions.len())?;
            let directives = edited.list(arena, operation.directives.len())?;
            let selection_set = edited.required(PathSegment::SelectionSet)?;
            Node::OperationDefinition(ctx.alloc(OperationDefinition {
                operation: operation.operation,
                name,
                variable_definitions,
                directives,
                selection_set,
            }))
        }
        Node::FragmentDefinition(fragment) => {
            let name = edited.required(PathSegment::Name)?;
            let type_condition = edited.required(PathSegment::TypeCondition)?;
            let directives = edited.list(arena, fragment.directives.len())?;
            let selection_set = edited.required(PathSegment::SelectionSet)?;
            Node::FragmentDefinition(ctx.alloc(FragmentDefinition {
                name,
                type_condition,
                directives,
                selection_set,
            }))
        }
        Node::VariableDefinition(definition) => {
            let variable = edited.required(PathSegment::Variable)?;
            let of_type = edited.required(PathSegment::Type)?;
            let default_value = edited.optional(definition.default_value.is_some())?;
            let directives = edited.list(arena, definition.directives.len())?;
            Node::VariableDefinition(ctx.alloc(VariableDefinition {
                variable,
                of_type,
                default_value,
                directives,
            }))
        }
        Node::SelectionSet(selection_set) => {
            let selections = edited.list(arena, selection_set.selections.len())?;
            if selections.is_empty() {
                return Err(Error::new(
                    "Selection Set cannot be empty after its selections were deleted",
                    Some(ErrorType::GraphQL),
                ));
            }
            Node::SelectionSet(ctx.alloc(SelectionSet { selections }))
        }
        Node::Field(field) => {
            let alias = edited.optional(field.alias.is_some())?;
            let name = edited.required(PathSegment::Name)?;
            let arguments = edited.list(arena, field.arguments.len())?;
            let directives = edited.list(arena, field.directives.len())?;
            let selection_set = edited.optional(field.selection_set.is_some())?;
            Node::Field(ctx.alloc(Field {
                alias,
                name,
                arguments,
                directives,
                selection_set,
            }))
        }
        Node::FragmentSpread(spread) => {
            let name = edited.required(PathSegment::Name)?;
            let directives = edited.list(arena, spread.directives.len())?;
            Node::FragmentSpread(ctx.alloc(FragmentSpread { name, directives }))
        }
        Node::InlineFragment(fragment) => {
            let type_condition = edited.optional(fragment.type_condition.is_some())?;
            let directives = edited.list(arena, fragment.directives.len())?;
            let selection_set = edited.required(PathSegment::SelectionSet)?;
            Node::InlineFragment(ctx.alloc(InlineFragment {
                type_condition,
                directives,
                selection_set,
            }))
        }
        Node::Argument(_) => {
            let name = edited.required(PathSegment::Name)?;
            let value = edited.required(PathSegment::Value)?;
            Node::Argument(ctx.alloc(Argument { name, value }))
        }
        Node::Directive(directive) => {
            let name = edited.required(PathSegment::Name)?;
            let arguments = edited.list(arena, directive.arguments.len())?;
            Node::Directive(ctx.alloc(Directive { name, arguments }))
        }
        Node::Variable(_) => {
            let name = edited.required(PathSegment::Name)?;
            Node::Variable(ctx.alloc(Variable { name }))
        }
        Node::NamedType(_) => {
            let name = edited.required(PathSegment::Name)?;
            Node::NamedType(ctx.alloc(NamedType { name }))
        }
        Node::Type(of_type) => {
            let of_type = match of_type {
                Type::NamedType(_) => Type::NamedType(NamedType {
                    name: edited.required(PathSegment::Name)?,
                }),
                Type::ListType(_) => {
                    let inner: Type = edited.required(PathSegment::Type)?;
                    Type::ListType(ctx.alloc(inner))
                }
                Type::NonNullType(_) => match edited.required(PathSegment::Type)? {
                    Type::NonNullType(_) => {
                        return Err(Error::new(
                            "Non-null Type cannot wrap another Non-null Type",
                            Some(ErrorType::GraphQL),
                        ))
                    }
                    inner => Type::NonNullType(ctx.alloc(inner)),
                },
            };
            Node::Type(ctx.alloc(of_type))
        }
        Node::Value(value) => {
            let value = match value {
                Value::List(list) => Value::List(ctx.alloc(ListValue {
                    values: edited.list(arena, list.values.len())?,
                })),
                Value::Object(object) => Value::Object(ctx.alloc(ObjectValue {
                    fields: edited.list(arena, object.fields.len())?,
                })),
                other => *other,
            };
            Node::Value(ctx.alloc(value))
        }
        Node::ObjectField(_) => {
            let name = edited.required(PathSegment::Name)?;
            let value = edited.required(PathSegment::Value)?;
            Node::ObjectField(ctx.alloc(ObjectField { name, value }))
        }
        Node::Name(name) => Node::Name(name),
    };
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_children() {
        let ctx = ASTContext::new();
        let field = Field::parse(&ctx, "alias: field(a: 1) @skip { child }").unwrap();
        let children = children(Node::Field(field));
        let kinds: Vec<ASTKind> = children.iter().map(|child| child.node.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ASTKind::Name,
                ASTKind::Name,
                ASTKind::Argument,
                ASTKind::Directive,
                ASTKind::SelectionSet
            ]
        );

        let mut path = Path::default();
        assert_eq!(children[2].push_key(&mut path), 2);
        assert_eq!(path.to_string(), "arguments.0");
    }

    #[test]
    fn unchanged_rebuild() {
        let ctx = ASTContext::new();
        let document =
            Document::parse(&ctx, "query Q($a: [Int!]) { a(x: {y: [1]}) ...B }").unwrap();
        let node = Node::Document(document);
        let results = children(node).iter().map(|child| Some(child.node)).collect();
        let copy = rebuild(&ctx, node, results).unwrap();
        assert!(!copy.ptr_eq(&node));
        assert_eq!(copy, node);
    }

    #[test]
    fn invalid_rebuilds() {
        let ctx = ASTContext::new();
        let field = Field::parse(&ctx, "field").unwrap();
        assert_eq!(
            rebuild(&ctx, Node::Field(field), vec![None])
                .unwrap_err()
                .message(),
            "Cannot delete the name of a Field"
        );

        let of_type = Type::parse(&ctx, "Int!").unwrap();
        let inner = ctx.alloc(*Type::parse(&ctx, "String!").unwrap());
        assert!(rebuild(&ctx, Node::from(of_type), vec![Some(Node::Type(inner))]).is_err());
    }
}
