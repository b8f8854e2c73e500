use crate::ast::*;
use serde_json::{Map as JSMap, Value as JSValue};

/// A map of variable names to JSON values, as they're typically sent alongside a GraphQL request.
pub type JSVariables = JSMap<String, JSValue>;

/// Trait for converting AST Value Nodes of a GraphQL language document to [serde_json::Value]s.
///
/// Variables are replaced with the values of the given variables map, or `null` when they're
/// missing.
pub trait ValueFromNode<'a> {
    /// Convert current AST Value Node to a [serde_json::Value] with given variables.
    fn to_json(&self, variables: Option<&JSVariables>) -> JSValue;
}

impl<'a> ValueFromNode<'a> for Value<'a> {
    #[inline]
    fn to_json(&self, variables: Option<&JSVariables>) -> JSValue {
        match self {
            Value::Variable(var) => var.to_json(variables),
            Value::List(list) => list.to_json(variables),
            Value::Object(obj) => obj.to_json(variables),
            Value::Int(node) => node.to_json(variables),
            Value::Float(node) => node.to_json(variables),
            Value::Boolean(node) => node.to_json(variables),
            Value::String(node) => node.to_json(variables),
            Value::Enum(node) => node.to_json(variables),
            Value::Null => JSValue::Null,
        }
    }
}

impl<'a> ValueFromNode<'a> for IntValue<'a> {
    /// Convert current IntValue Node to a [serde_json::Value].
    ///
    /// Integers that don't fit into an `i64` are kept as strings.
    #[inline]
    fn to_json(&self, _variables: Option<&JSVariables>) -> JSValue {
        match self.value.parse::<i64>() {
            Ok(value) => value.into(),
            Err(_) => self.value.into(),
        }
    }
}

impl<'a> ValueFromNode<'a> for FloatValue<'a> {
    /// Convert current FloatValue Node to a [serde_json::Value].
    #[inline]
    fn to_json(&self, _variables: Option<&JSVariables>) -> JSValue {
        match self.value.parse::<f64>() {
            Ok(value) => value.into(),
            Err(_) => self.value.into(),
        }
    }
}

impl<'a> ValueFromNode<'a> for BooleanValue {
    #[inline]
    fn to_json(&self, _variables: Option<&JSVariables>) -> JSValue {
        self.value.into()
    }
}

impl<'a> ValueFromNode<'a> for StringValue<'a> {
    #[inline]
    fn to_json(&self, _variables: Option<&JSVariables>) -> JSValue {
        self.value.into()
    }
}

impl<'a> ValueFromNode<'a> for EnumValue<'a> {
    #[inline]
    fn to_json(&self, _variables: Option<&JSVariables>) -> JSValue {
        self.value.into()
    }
}

impl<'a> ValueFromNode<'a> for Variable<'a> {
    /// Convert current Variable Node to the [serde_json::Value] it refers to in the given
    /// variables.
    #[inline]
    fn to_json(&self, variables: Option<&JSVariables>) -> JSValue {
        variables
            .and_then(|vars| vars.get(self.name.value))
            .cloned()
            .unwrap_or(JSValue::Null)
    }
}

impl<'a> ValueFromNode<'a> for ListValue<'a> {
    #[inline]
    fn to_json(&self, variables: Option<&JSVariables>) -> JSValue {
        self.values
            .iter()
            .map(|value| value.to_json(variables))
            .collect::<Vec<JSValue>>()
            .into()
    }
}

impl<'a> ValueFromNode<'a> for ObjectValue<'a> {
    #[inline]
    fn to_json(&self, variables: Option<&JSVariables>) -> JSValue {
        self.fields
            .iter()
            .map(|field| (field.name.value.to_string(), field.value.to_json(variables)))
            .collect::<JSMap<String, JSValue>>()
            .into()
    }
}

/// Convert AST Value Node to a [serde_json::Value] with given variables.
pub fn value_from_ast_untyped(value: &Value<'_>, variables: Option<&JSVariables>) -> JSValue {
    value.to_json(variables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values() {
        let ctx = ASTContext::new();
        let value = Value::parse(
            &ctx,
            r#"{ int: 007, float: 1.5, big: 99999999999999999999, str: "x", enum: RED, list: [true, null], var: $var, missing: $missing }"#,
        )
        .unwrap();
        let mut variables = JSVariables::new();
        variables.insert("var".to_string(), json!({ "nested": [1] }));
        assert_eq!(
            value_from_ast_untyped(value, Some(&variables)),
            json!({
                "int": 7,
                "float": 1.5,
                "big": "99999999999999999999",
                "str": "x",
                "enum": "RED",
                "list": [true, null],
                "var": { "nested": [1] },
                "missing": null
            })
        );
    }
}
