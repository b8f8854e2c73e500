use super::ast::*;
use super::ast_kind::ASTKind;
use crate::error::{Error, ErrorType, Result};

/// A reference to any AST Node that may be visited.
///
/// The `Node` enum erases the type of a node so that the [visitor](crate::visit) and
/// [printer](crate::ast::PrintNode) may handle all kinds of AST Nodes uniformly. It's a cheap
/// `Copy` handle, since every variant only holds a reference into an [`ASTContext`]'s arena.
///
/// Some AST types are represented by more specific variants. A [`Value::Variable`] is always
/// represented as a [`Node::Variable`], and a [`Type::NamedType`] is always represented as a
/// [`Node::NamedType`]. This means that `Node::Value` holds any other literal value and
/// `Node::Type` only holds list and non-null types, when they're created using [`From`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Node<'a> {
    Document(&'a Document<'a>),
    OperationDefinition(&'a OperationDefinition<'a>),
    FragmentDefinition(&'a FragmentDefinition<'a>),
    VariableDefinition(&'a VariableDefinition<'a>),
    SelectionSet(&'a SelectionSet<'a>),
    Field(&'a Field<'a>),
    FragmentSpread(&'a FragmentSpread<'a>),
    InlineFragment(&'a InlineFragment<'a>),
    Argument(&'a Argument<'a>),
    Directive(&'a Directive<'a>),
    Variable(&'a Variable<'a>),
    Name(&'a Name<'a>),
    NamedType(&'a NamedType<'a>),
    Type(&'a Type<'a>),
    Value(&'a Value<'a>),
    ObjectField(&'a ObjectField<'a>),
}

impl<'a> Node<'a> {
    /// Returns the precise kind of this node, e.g. [`ASTKind::IntValue`] for an integer value
    /// or [`ASTKind::ListType`] for a list type.
    pub fn kind(&self) -> ASTKind {
        match self {
            Node::Document(_) => ASTKind::Document,
            Node::OperationDefinition(_) => ASTKind::OperationDefinition,
            Node::FragmentDefinition(_) => ASTKind::FragmentDefinition,
            Node::VariableDefinition(_) => ASTKind::VariableDefinition,
            Node::SelectionSet(_) => ASTKind::SelectionSet,
            Node::Field(_) => ASTKind::Field,
            Node::FragmentSpread(_) => ASTKind::FragmentSpread,
            Node::InlineFragment(_) => ASTKind::InlineFragment,
            Node::Argument(_) => ASTKind::Argument,
            Node::Directive(_) => ASTKind::Directive,
            Node::Variable(_) => ASTKind::Variable,
            Node::Name(_) => ASTKind::Name,
            Node::NamedType(_) => ASTKind::NamedType,
            Node::Type(Type::NamedType(_)) => ASTKind::NamedType,
            Node::Type(Type::ListType(_)) => ASTKind::ListType,
            Node::Type(Type::NonNullType(_)) => ASTKind::NonNullType,
            Node::Value(value) => match value {
                Value::Variable(_) => ASTKind::Variable,
                Value::String(_) => ASTKind::StringValue,
                Value::Float(_) => ASTKind::FloatValue,
                Value::Int(_) => ASTKind::IntValue,
                Value::Boolean(_) => ASTKind::BooleanValue,
                Value::Enum(_) => ASTKind::EnumValue,
                Value::List(_) => ASTKind::ListValue,
                Value::Object(_) => ASTKind::ObjectValue,
                Value::Null => ASTKind::NullValue,
            },
            Node::ObjectField(_) => ASTKind::ObjectField,
        }
    }

    /// Checks whether two handles point at the same node in memory, rather than at two equal
    /// nodes.
    pub fn ptr_eq(&self, other: &Node<'a>) -> bool {
        #[inline]
        fn same<T>(a: &T, b: &T) -> bool {
            std::ptr::eq(a, b)
        }

        match (self, other) {
            (Node::Document(a), Node::Document(b)) => same(*a, *b),
            (Node::OperationDefinition(a), Node::OperationDefinition(b)) => same(*a, *b),
            (Node::FragmentDefinition(a), Node::FragmentDefinition(b)) => same(*a, *b),
            (Node::VariableDefinition(a), Node::VariableDefinition(b)) => same(*a, *b),
            (Node::SelectionSet(a), Node::SelectionSet(b)) => same(*a, *b),
            (Node::Field(a), Node::Field(b)) => same(*a, *b),
            (Node::FragmentSpread(a), Node::FragmentSpread(b)) => same(*a, *b),
            (Node::InlineFragment(a), Node::InlineFragment(b)) => same(*a, *b),
            (Node::Argument(a), Node::Argument(b)) => same(*a, *b),
            (Node::Directive(a), Node::Directive(b)) => same(*a, *b),
            (Node::Variable(a), Node::Variable(b)) => same(*a, *b),
            (Node::Name(a), Node::Name(b)) => same(*a, *b),
            (Node::NamedType(a), Node::NamedType(b)) => same(*a, *b),
            (Node::Type(a), Node::Type(b)) => same(*a, *b),
            (Node::Value(a), Node::Value(b)) => same(*a, *b),
            (Node::ObjectField(a), Node::ObjectField(b)) => same(*a, *b),
            _ => false,
        }
    }
}

impl<'a> From<&'a Value<'a>> for Node<'a> {
    #[inline]
    fn from(value: &'a Value<'a>) -> Self {
        match value {
            Value::Variable(variable) => Node::Variable(variable),
            _ => Node::Value(value),
        }
    }
}

impl<'a> From<&'a Type<'a>> for Node<'a> {
    #[inline]
    fn from(of_type: &'a Type<'a>) -> Self {
        match of_type {
            Type::NamedType(named_type) => Node::NamedType(named_type),
            _ => Node::Type(of_type),
        }
    }
}

impl<'a> From<Selection<'a>> for Node<'a> {
    #[inline]
    fn from(selection: Selection<'a>) -> Self {
        match selection {
            Selection::Field(field) => Node::Field(field),
            Selection::FragmentSpread(spread) => Node::FragmentSpread(spread),
            Selection::InlineFragment(fragment) => Node::InlineFragment(fragment),
        }
    }
}

impl<'a> From<Definition<'a>> for Node<'a> {
    #[inline]
    fn from(definition: Definition<'a>) -> Self {
        match definition {
            Definition::Operation(operation) => Node::OperationDefinition(operation),
            Definition::Fragment(fragment) => Node::FragmentDefinition(fragment),
        }
    }
}

macro_rules! node_from_ref {
    ($($variant:ident),+) => {
        $(
            impl<'a> From<&'a $variant<'a>> for Node<'a> {
                #[inline]
                fn from(node: &'a $variant<'a>) -> Self {
                    Node::$variant(node)
                }
            }
        )+
    };
}

node_from_ref!(
    Document,
    OperationDefinition,
    FragmentDefinition,
    VariableDefinition,
    SelectionSet,
    Field,
    FragmentSpread,
    InlineFragment,
    Argument,
    Directive,
    Variable,
    Name,
    NamedType,
    ObjectField
);

/// Creates the error for a node that's converted into a slot of a different kind.
#[inline]
fn mismatch(expected: ASTKind, node: &Node) -> Error {
    Error::new(
        format!("Expected {} but got {}", expected, node.kind()),
        Some(ErrorType::GraphQL),
    )
}

macro_rules! ref_from_node {
    ($($variant:ident),+) => {
        $(
            impl<'a> TryFrom<Node<'a>> for &'a $variant<'a> {
                type Error = Error;

                #[inline]
                fn try_from(node: Node<'a>) -> Result<Self> {
                    match node {
                        Node::$variant(inner) => Ok(inner),
                        _ => Err(mismatch(ASTKind::$variant, &node)),
                    }
                }
            }
        )+
    };
}

ref_from_node!(
    Document,
    OperationDefinition,
    FragmentDefinition,
    VariableDefinition,
    SelectionSet,
    Field,
    FragmentSpread,
    InlineFragment,
    Directive
);

impl<'a> TryFrom<Node<'a>> for Argument<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::Argument(argument) => Ok(*argument),
            _ => Err(mismatch(ASTKind::Argument, &node)),
        }
    }
}

impl<'a> TryFrom<Node<'a>> for ObjectField<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::ObjectField(field) => Ok(*field),
            _ => Err(mismatch(ASTKind::ObjectField, &node)),
        }
    }
}

impl<'a> TryFrom<Node<'a>> for Name<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::Name(name) => Ok(*name),
            _ => Err(mismatch(ASTKind::Name, &node)),
        }
    }
}

impl<'a> TryFrom<Node<'a>> for Variable<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::Variable(variable) => Ok(*variable),
            Node::Value(Value::Variable(variable)) => Ok(*variable),
            _ => Err(mismatch(ASTKind::Variable, &node)),
        }
    }
}

impl<'a> TryFrom<Node<'a>> for NamedType<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::NamedType(named_type) => Ok(*named_type),
            Node::Type(Type::NamedType(named_type)) => Ok(*named_type),
            _ => Err(mismatch(ASTKind::NamedType, &node)),
        }
    }
}

impl<'a> TryFrom<Node<'a>> for Type<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::Type(of_type) => Ok(*of_type),
            Node::NamedType(named_type) => Ok(Type::NamedType(*named_type)),
            _ => Err(mismatch(ASTKind::Type, &node)),
        }
    }
}

impl<'a> TryFrom<Node<'a>> for Value<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::Value(value) => Ok(*value),
            Node::Variable(variable) => Ok(Value::Variable(*variable)),
            _ => Err(mismatch(ASTKind::Value, &node)),
        }
    }
}

impl<'a> TryFrom<Node<'a>> for Selection<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::Field(field) => Ok(Selection::Field(field)),
            Node::FragmentSpread(spread) => Ok(Selection::FragmentSpread(spread)),
            Node::InlineFragment(fragment) => Ok(Selection::InlineFragment(fragment)),
            _ => Err(mismatch(ASTKind::Selection, &node)),
        }
    }
}

impl<'a> TryFrom<Node<'a>> for Definition<'a> {
    type Error = Error;

    #[inline]
    fn try_from(node: Node<'a>) -> Result<Self> {
        match node {
            Node::OperationDefinition(operation) => Ok(Definition::Operation(operation)),
            Node::FragmentDefinition(fragment) => Ok(Definition::Fragment(fragment)),
            _ => Err(mismatch(ASTKind::Definition, &node)),
        }
    }
}
