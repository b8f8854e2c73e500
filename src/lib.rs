//! `graphql_query_lite`
//! =========
//!
//! _A compact GraphQL Query Language parser, printer, and visitor._
//!
//! The **`graphql_query_lite`** library handles the client-side GraphQL Query Language, which is
//! the part of GraphQL that clients send to a GraphQL service as requests. It doesn't aim to
//! support server-side GraphQL execution or the GraphQL Schema Language.
//!
//! It consists of:
//!
//! - An arena allocated AST, which is parsed from source text using the [`ParseNode`](ast::ParseNode)
//!   trait, and printed back into source text using the [`PrintNode`](ast::PrintNode) trait.
//! - A [visitor](visit) that traverses ASTs without recursion and may transform them into
//!   new ASTs, while the original AST stays untouched.
//! - Optional [JSON conversion](json) utilities behind the `json` feature.
//!
//! Parse errors are reported as [`Error`](error::Error)s with a location and a snippet of the
//! source text. The crate logs through the [`log`](https://docs.rs/log) facade and leaves
//! installing a logger to its users.
//!
//! [A good place to start learning more about this crate is the `ast` module...](ast)

pub mod ast;
pub mod error;
pub mod visit;

pub use bumpalo;

#[cfg(feature = "json")]
pub mod json;
