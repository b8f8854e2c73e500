//! # JSON Conversion
//!
//! The `graphql_query_lite::json` module contains utilities to convert from and to `serde_json`
//! values. It's only available with the `json` feature, which is enabled by default.
//!
//! The [ToJson] trait renders any [Node](crate::ast::Node) as a JSON AST object, in the shape that
//! JavaScript GraphQL tooling uses, e.g. to pass an AST on to other tools.
//!
//! The [ValueFromNode] trait allows conversion of AST values to `serde_json` values using a
//! `to_json` method on any given value. This methods converts without using any type information.
//!
//! The module otherwise only contains a handful of utility functions:
//!
//! - [ast_from_value] is used to convert any given JSON value to AST values while casting it.
//! - [ast_from_value_untyped] is used to convert any given JSON value to AST values without casting.
//! - [value_from_ast_untyped] is used to convert a given AST value to a JSON value while filling in
//!   variables.

mod conversion;
mod node;
mod values;

pub use conversion::*;
pub use node::ToJson;
pub use values::*;
