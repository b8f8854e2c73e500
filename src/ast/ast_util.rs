//! Utilities to validate identifiers before they're used to build AST nodes by hand.
//!
//! The parser only ever produces valid names, but nodes that are created explicitly, e.g. as a
//! replacement while visiting an AST, may be passed arbitrary strings.

use super::lexer::{lexeme_at, Lexeme};
use crate::error::{Error, ErrorType, Result};

/// Checks that `name` is a valid GraphQL name matching `[_A-Za-z][_0-9A-Za-z]*` and returns it.
///
/// [Reference](https://spec.graphql.org/October2021/#Name)
pub fn assert_name(name: &str) -> Result<&str> {
    match lexeme_at(name) {
        Some((Lexeme::Name, len)) if len == name.len() => Ok(name),
        _ => Err(Error::new(
            format!("Expected name to match [_A-Za-z][_0-9A-Za-z]*, got \"{name}\""),
            Some(ErrorType::GraphQL),
        )),
    }
}

/// Checks that `name` is a valid name for an enum value, which also can't be `true`, `false`, or
/// `null`, and returns it.
///
/// [Reference](https://spec.graphql.org/October2021/#EnumValue)
pub fn assert_enum_value_name(name: &str) -> Result<&str> {
    match name {
        "true" | "false" | "null" => Err(Error::new(
            format!("Enum values cannot be named: {name}"),
            Some(ErrorType::GraphQL),
        )),
        _ => assert_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(assert_name("_typename2"), Ok("_typename2"));
        assert_eq!(assert_name("Query"), Ok("Query"));
        assert!(assert_name("").is_err());
        assert!(assert_name("2a").is_err());
        assert!(assert_name("a-b").is_err());
        assert_eq!(
            assert_name("a b").unwrap_err().message(),
            "Expected name to match [_A-Za-z][_0-9A-Za-z]*, got \"a b\""
        );
    }

    #[test]
    fn enum_value_names() {
        assert_eq!(assert_enum_value_name("MOBILE_WEB"), Ok("MOBILE_WEB"));
        assert_eq!(
            assert_enum_value_name("null").unwrap_err().message(),
            "Enum values cannot be named: null"
        );
        assert!(assert_enum_value_name("true").is_err());
        assert!(assert_enum_value_name("$var").is_err());
    }
}
