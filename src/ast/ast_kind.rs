use std::fmt;

/// An enum of identifiers representing AST nodes.
///
/// This enum can be printed using the [`fmt::Display`] trait.
/// When parsing this enum is used to indicate what AST node encountered a parsing error, and
/// [`Node::kind`](crate::ast::Node::kind) uses it to identify a visited node. Kinds that only
/// describe a part of the grammar, like [`ASTKind::Arguments`], never identify a node.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum ASTKind {
    /// See: [crate::ast::Document]
    Document,
    /// See: [crate::ast::Definition]
    Definition,
    /// See: [crate::ast::OperationDefinition]
    OperationDefinition,
    /// See: [crate::ast::OperationKind]
    OperationKind,
    /// See: [crate::ast::FragmentDefinition]
    FragmentDefinition,
    /// A list of [crate::ast::VariableDefinition] nodes on an operation
    VariableDefinitions,
    /// See: [crate::ast::VariableDefinition]
    VariableDefinition,
    /// See: [crate::ast::Type]
    Type,
    /// See: [crate::ast::NamedType]
    NamedType,
    /// See: `ListType` on [crate::ast::Type]
    ListType,
    /// See: `NonNullType` on [crate::ast::Type]
    NonNullType,
    /// See: [crate::ast::SelectionSet]
    SelectionSet,
    /// See: [crate::ast::Selection]
    Selection,
    /// See: [crate::ast::Field]
    Field,
    /// See: [crate::ast::FragmentSpread]
    FragmentSpread,
    /// See: [crate::ast::InlineFragment]
    InlineFragment,
    /// A list of [crate::ast::Directive] nodes
    Directives,
    /// See: [crate::ast::Directive]
    Directive,
    /// A parenthesized list of [crate::ast::Argument] nodes
    Arguments,
    /// See: [crate::ast::Argument]
    Argument,
    /// See: [crate::ast::Name]
    Name,
    /// See: [crate::ast::Variable]
    Variable,
    /// See: [crate::ast::Value]
    Value,
    /// See: `Null` on [crate::ast::Value]
    NullValue,
    /// See: [crate::ast::BooleanValue]
    BooleanValue,
    /// See: [crate::ast::IntValue]
    IntValue,
    /// See: [crate::ast::FloatValue]
    FloatValue,
    /// See: [crate::ast::StringValue]
    StringValue,
    /// See: [crate::ast::EnumValue]
    EnumValue,
    /// See: [crate::ast::ListValue]
    ListValue,
    /// See: [crate::ast::ObjectValue]
    ObjectValue,
    /// See: [crate::ast::ObjectField]
    ObjectField,
}

impl ASTKind {
    /// Returns the identifier of this kind as it's used by other GraphQL tooling, e.g.
    /// `"OperationDefinition"` or `"IntValue"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ASTKind::Document => "Document",
            ASTKind::Definition => "Definition",
            ASTKind::OperationDefinition => "OperationDefinition",
            ASTKind::OperationKind => "OperationKind",
            ASTKind::FragmentDefinition => "FragmentDefinition",
            ASTKind::VariableDefinitions => "VariableDefinitions",
            ASTKind::VariableDefinition => "VariableDefinition",
            ASTKind::Type => "Type",
            ASTKind::NamedType => "NamedType",
            ASTKind::ListType => "ListType",
            ASTKind::NonNullType => "NonNullType",
            ASTKind::SelectionSet => "SelectionSet",
            ASTKind::Selection => "Selection",
            ASTKind::Field => "Field",
            ASTKind::FragmentSpread => "FragmentSpread",
            ASTKind::InlineFragment => "InlineFragment",
            ASTKind::Directives => "Directives",
            ASTKind::Directive => "Directive",
            ASTKind::Arguments => "Arguments",
            ASTKind::Argument => "Argument",
            ASTKind::Name => "Name",
            ASTKind::Variable => "Variable",
            ASTKind::Value => "Value",
            ASTKind::NullValue => "NullValue",
            ASTKind::BooleanValue => "BooleanValue",
            ASTKind::IntValue => "IntValue",
            ASTKind::FloatValue => "FloatValue",
            ASTKind::StringValue => "StringValue",
            ASTKind::EnumValue => "EnumValue",
            ASTKind::ListValue => "ListValue",
            ASTKind::ObjectValue => "ObjectValue",
            ASTKind::ObjectField => "ObjectField",
        }
    }
}

impl fmt::Display for ASTKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ASTKind::Document => f.write_str("Document"),
            ASTKind::Definition => f.write_str("Definition"),
            ASTKind::OperationDefinition => f.write_str("Operation Definition"),
            ASTKind::OperationKind => f.write_str("Operation Kind"),
            ASTKind::FragmentDefinition => f.write_str("Fragment Definition"),
            ASTKind::VariableDefinitions => f.write_str("Variable Definitions"),
            ASTKind::VariableDefinition => f.write_str("Variable Definition"),
            ASTKind::Type => f.write_str("Type"),
            ASTKind::NamedType => f.write_str("Type Name"),
            ASTKind::ListType => f.write_str("List Type"),
            ASTKind::NonNullType => f.write_str("Non-null Type"),
            ASTKind::SelectionSet => f.write_str("Selection Set"),
            ASTKind::Selection => f.write_str("Selection"),
            ASTKind::Field => f.write_str("Field"),
            ASTKind::FragmentSpread => f.write_str("Fragment Spread"),
            ASTKind::InlineFragment => f.write_str("Inline Fragment"),
            ASTKind::Directives => f.write_str("Directives"),
            ASTKind::Directive => f.write_str("Directive"),
            ASTKind::Arguments => f.write_str("Arguments"),
            ASTKind::Argument => f.write_str("Argument"),
            ASTKind::Name => f.write_str("Name"),
            ASTKind::Variable => f.write_str("Variable"),
            ASTKind::Value => f.write_str("Value"),
            ASTKind::NullValue => f.write_str("Null"),
            ASTKind::BooleanValue => f.write_str("Boolean"),
            ASTKind::IntValue => f.write_str("Integer"),
            ASTKind::FloatValue => f.write_str("Float"),
            ASTKind::StringValue => f.write_str("String"),
            ASTKind::EnumValue => f.write_str("Enum"),
            ASTKind::ListValue => f.write_str("List"),
            ASTKind::ObjectValue => f.write_str("Object"),
            ASTKind::ObjectField => f.write_str("Object Field"),
        }
    }
}
