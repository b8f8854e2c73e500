use crate::ast::*;
use serde_json::{json, Value as JSValue};

/// Trait for rendering AST Nodes as JSON objects in the shape that JavaScript GraphQL tooling
/// uses for its ASTs.
///
/// Every node is an object with a `kind` key, e.g. `{"kind": "Name", "value": "field"}`. Absent
/// optional children are rendered as `null`, and lists of children as arrays.
pub trait ToJson {
    fn to_json(&self) -> JSValue;
}

impl<'a> ToJson for Node<'a> {
    fn to_json(&self) -> JSValue {
        let kind = self.kind().as_str();
        match *self {
            Node::Document(document) => json!({
                "kind": kind,
                "definitions": list(document.definitions.iter().map(|d| Node::from(*d))),
            }),
            Node::OperationDefinition(operation) => json!({
                "kind": kind,
                "operation": operation.operation.as_str(),
                "name": optional(operation.name.as_ref().map(Node::Name)),
                "variableDefinitions": list(
                    operation.variable_definitions.iter().map(|d| Node::VariableDefinition(*d))
                ),
                "directives": directives(&operation.directives),
                "selectionSet": Node::SelectionSet(operation.selection_set).to_json(),
            }),
            Node::FragmentDefinition(fragment) => json!({
                "kind": kind,
                "name": Node::Name(&fragment.name).to_json(),
                "typeCondition": Node::NamedType(&fragment.type_condition).to_json(),
                "directives": directives(&fragment.directives),
                "selectionSet": Node::SelectionSet(fragment.selection_set).to_json(),
            }),
            Node::VariableDefinition(definition) => json!({
                "kind": kind,
                "variable": Node::Variable(&definition.variable).to_json(),
                "type": Node::from(&definition.of_type).to_json(),
                "defaultValue": optional(definition.default_value.as_ref().map(Node::from)),
                "directives": directives(&definition.directives),
            }),
            Node::SelectionSet(selection_set) => json!({
                "kind": kind,
                "selections": list(selection_set.selections.iter().map(|s| Node::from(*s))),
            }),
            Node::Field(field) => json!({
                "kind": kind,
                "alias": optional(field.alias.as_ref().map(Node::Name)),
                "name": Node::Name(&field.name).to_json(),
                "arguments": list(field.arguments.iter().map(Node::Argument)),
                "directives": directives(&field.directives),
                "selectionSet": optional(field.selection_set.map(Node::SelectionSet)),
            }),
            Node::FragmentSpread(spread) => json!({
                "kind": kind,
                "name": Node::Name(&spread.name).to_json(),
                "directives": directives(&spread.directives),
            }),
            Node::InlineFragment(fragment) => json!({
                "kind": kind,
                "typeCondition": optional(fragment.type_condition.as_ref().map(Node::NamedType)),
                "directives": directives(&fragment.directives),
                "selectionSet": Node::SelectionSet(fragment.selection_set).to_json(),
            }),
            Node::Argument(argument) => json!({
                "kind": kind,
                "name": Node::Name(&argument.name).to_json(),
                "value": Node::from(&argument.value).to_json(),
            }),
            Node::ObjectField(field) => json!({
                "kind": kind,
                "name": Node::Name(&field.name).to_json(),
                "value": Node::from(&field.value).to_json(),
            }),
            Node::Directive(directive) => json!({
                "kind": kind,
                "name": Node::Name(&directive.name).to_json(),
                "arguments": list(directive.arguments.iter().map(Node::Argument)),
            }),
            Node::Variable(variable) => json!({
                "kind": kind,
                "name": Node::Name(&variable.name).to_json(),
            }),
            Node::Name(name) => json!({ "kind": kind, "value": name.value }),
            Node::NamedType(named_type) => json!({
                "kind": kind,
                "name": Node::Name(&named_type.name).to_json(),
            }),
            Node::Type(of_type) => match of_type {
                Type::NamedType(named_type) => Node::NamedType(named_type).to_json(),
                Type::ListType(inner) | Type::NonNullType(inner) => json!({
                    "kind": kind,
                    "type": Node::from(*inner).to_json(),
                }),
            },
            Node::Value(value) => match value {
                Value::Variable(variable) => Node::Variable(variable).to_json(),
                Value::Int(IntValue { value }) | Value::Float(FloatValue { value }) => {
                    json!({ "kind": kind, "value": value })
                }
                Value::Enum(EnumValue { value }) => json!({ "kind": kind, "value": value }),
                Value::String(string) => json!({
                    "kind": kind,
                    "value": string.value,
                    "block": string.block,
                }),
                Value::Boolean(boolean) => json!({ "kind": kind, "value": boolean.value }),
                Value::Null => json!({ "kind": kind }),
                Value::List(list_value) => json!({
                    "kind": kind,
                    "values": list(list_value.values.iter().map(Node::from)),
                }),
                Value::Object(object) => json!({
                    "kind": kind,
                    "fields": list(object.fields.iter().map(Node::ObjectField)),
                }),
            },
        }
    }
}

#[inline]
fn list<'a>(nodes: impl Iterator<Item = Node<'a>>) -> JSValue {
    JSValue::Array(nodes.map(|node| node.to_json()).collect())
}

#[inline]
fn optional(node: Option<Node<'_>>) -> JSValue {
    node.map_or(JSValue::Null, |node| node.to_json())
}

#[inline]
fn directives(directives: &[&Directive<'_>]) -> JSValue {
    list(directives.iter().map(|d| Node::Directive(*d)))
}
