//! # Visiting and Transforming GraphQL ASTs
//!
//! The `graphql_query_lite::visit` module contains utilities to traverse and transform GraphQL
//! ASTs. Mainly, this module exposes the [Visitor] trait, whose callbacks are called while the
//! [visit] function, or the [`VisitNode`] trait that all AST nodes implement, traverses an AST.
//!
//! Typically, a visitor is used in GraphQL to gain information about the AST and inspect it for
//! certain features. Its callbacks may also return [`VisitFlow`] signals that replace or delete
//! nodes, in which case a transformed copy of the AST is returned, while the original AST stays
//! untouched.
//!
//! In this example we'll define a visitor that counts all operations in a document and removes
//! all `__typename` fields:
//!
//! ```
//! use graphql_query_lite::{ast::*, visit::*};
//!
//! #[derive(Default)]
//! struct CountOperations {
//!    operations: usize,
//! }
//!
//! impl<'a> Visitor<'a> for CountOperations {
//!     fn enter_fragment(
//!         &mut self,
//!         _ctx: &mut (),
//!         _fragment: &'a FragmentDefinition<'a>,
//!         _info: &VisitInfo<'a>
//!     ) -> VisitResult<'a> {
//!         // We can skip over fragment nodes and never traverse its children,
//!         // since we're only interested in counting operations
//!         Ok(VisitFlow::Skip)
//!     }
//!
//!     fn enter_operation(
//!         &mut self,
//!         _ctx: &mut (),
//!         _operation: &'a OperationDefinition<'a>,
//!         _info: &VisitInfo<'a>
//!     ) -> VisitResult<'a> {
//!         self.operations += 1;
//!         Ok(VisitFlow::Next)
//!     }
//!
//!     fn enter_field(
//!         &mut self,
//!         _ctx: &mut (),
//!         field: &'a Field<'a>,
//!         _info: &VisitInfo<'a>
//!     ) -> VisitResult<'a> {
//!         if field.name.value == "__typename" {
//!             Ok(VisitFlow::Delete)
//!         } else {
//!             Ok(VisitFlow::Next)
//!         }
//!     }
//! }
//!
//! let ctx = ASTContext::new();
//! let source = "query Q { __typename field } fragment F on T { a }";
//! let document = Document::parse(&ctx, source).unwrap();
//!
//! let mut visitor = CountOperations::default();
//! let output = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
//! assert_eq!(visitor.operations, 1);
//! assert_eq!(output.print(), "query Q {\n  field\n}\n\nfragment F on T {\n  a\n}\n");
//! ```
//!
//! Of course, it's often necessary to ensure that while the context is mutated inside the visitor,
//! its results should still later on be made accessible. Visitors may also be combined using
//! [`Visitor::compose`], which runs them in a single traversal.
//!
//! [More information on the Visitor trait](Visitor)

mod children;
mod compose;
mod path;
mod visitor;

pub use compose::ComposedVisitor;
pub use path::*;
pub use visitor::*;
