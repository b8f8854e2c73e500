use bumpalo::collections::Vec;
use serde_json::Value as JSValue;

use crate::ast::*;
use crate::error::{Error, ErrorType, Result};

#[inline]
fn named<'a>(of_type: &Type<'a>) -> Option<&'a str> {
    match of_type {
        Type::NamedType(named_type) => Some(named_type.name.value),
        _ => None,
    }
}

/// Convert [serde_json::Value] to an AST Value Node given a [Type] definition.
///
/// Built-in scalars are cast to their AST literals. Other named types are converted without
/// casting, as with [ast_from_value_untyped]. A single value given for a list type is wrapped in
/// a list.
pub fn ast_from_value<'a>(
    ctx: &'a ASTContext,
    value: &JSValue,
    of_type: &Type<'a>,
) -> Result<Value<'a>> {
    match (of_type, value) {
        (Type::NonNullType(_), JSValue::Null) => Err(Error::new(
            "Received null for non-nullable type",
            Some(ErrorType::GraphQL),
        )),
        (_, JSValue::Null) => Ok(Value::Null),
        (Type::NonNullType(of_type), value) => ast_from_value(ctx, value, of_type),

        (Type::ListType(of_type), JSValue::Array(list)) => {
            let mut values = Vec::with_capacity_in(list.len(), &ctx.arena);
            for item in list.iter() {
                values.push(ast_from_value(ctx, item, of_type)?);
            }
            Ok(Value::List(ctx.alloc(ListValue { values })))
        }
        (Type::ListType(of_type), value) => {
            let mut values = Vec::new_in(&ctx.arena);
            values.push(ast_from_value(ctx, value, of_type)?);
            Ok(Value::List(ctx.alloc(ListValue { values })))
        }

        (Type::NamedType(_), value) => match (named(of_type), value) {
            (Some("Boolean"), JSValue::Bool(value)) => Ok(Value::Boolean(BooleanValue {
                value: *value,
            })),
            (Some("Int"), JSValue::Number(num)) => num
                .as_i64()
                .filter(|int| i32::try_from(*int).is_ok())
                .map(|int| {
                    Value::Int(IntValue {
                        value: ctx.alloc_string(int.to_string()),
                    })
                })
                .ok_or_else(|| {
                    Error::new(
                        format!("Int cannot represent non 32-bit signed integer value {num}"),
                        Some(ErrorType::GraphQL),
                    )
                }),
            (Some("Float"), JSValue::Number(num)) => match num.as_f64() {
                Some(float) if float.is_finite() => Ok(Value::Float(FloatValue {
                    value: ctx.alloc_string(num.to_string()),
                })),
                _ => Err(Error::new(
                    format!("Float cannot represent non numeric value {num}"),
                    Some(ErrorType::GraphQL),
                )),
            },
            (Some("ID" | "String"), JSValue::String(str)) => {
                Ok(Value::String(StringValue::new(ctx, str)))
            }
            (Some("ID"), JSValue::Number(num)) if num.is_i64() || num.is_u64() => {
                Ok(Value::String(StringValue::new(ctx, num.to_string())))
            }
            (Some(name @ ("Boolean" | "Int" | "Float" | "ID" | "String")), value) => {
                Err(Error::new(
                    format!("{name} cannot represent value {value}"),
                    Some(ErrorType::GraphQL),
                ))
            }
            (_, value) => Ok(ast_from_value_untyped(ctx, value)),
        },
    }
}

/// Convert [serde_json::Value] to an AST Value Node without casting the JSON value to a type.
pub fn ast_from_value_untyped<'a>(ctx: &'a ASTContext, value: &JSValue) -> Value<'a> {
    match value {
        JSValue::Array(list) => {
            let mut values = Vec::with_capacity_in(list.len(), &ctx.arena);
            for item in list.iter() {
                values.push(ast_from_value_untyped(ctx, item));
            }
            Value::List(ctx.alloc(ListValue { values }))
        }
        JSValue::Object(map) => {
            let mut fields = Vec::with_capacity_in(map.len(), &ctx.arena);
            for (key, value) in map.iter() {
                fields.push(ObjectField {
                    name: Name::new(ctx.alloc_str(key)),
                    value: ast_from_value_untyped(ctx, value),
                });
            }
            Value::Object(ctx.alloc(ObjectValue { fields }))
        }
        JSValue::Number(num) => {
            let value = ctx.alloc_string(num.to_string());
            if num.is_f64() {
                Value::Float(FloatValue { value })
            } else {
                Value::Int(IntValue { value })
            }
        }
        JSValue::Bool(value) => Value::Boolean(BooleanValue { value: *value }),
        JSValue::String(str) => Value::String(StringValue::new(ctx, str)),
        JSValue::Null => Value::Null,
    }
}
