use super::visitor::*;
use crate::ast::*;
use crate::error::Result;

/// The state of a visitor inside of a [`ComposedVisitor`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum HookState {
    /// The visitor receives callbacks as usual.
    Visiting,
    /// The visitor skipped the node at the given depth and is paused until the traversal leaves
    /// that node.
    SkippedUntil(usize),
    /// The visitor stopped and doesn't receive any more callbacks.
    Broken,
}

/// The edits that the visitors of a [`ComposedVisitor`] made to a single node.
struct Pass<'a> {
    node: Node<'a>,
    edited: bool,
    deleted: bool,
}

impl<'a> Pass<'a> {
    #[inline]
    fn new(node: Node<'a>) -> Self {
        Pass {
            node,
            edited: false,
            deleted: false,
        }
    }

    /// Applies a visitor's signal to the pass and to the visitor's state. Only the first edit of a
    /// pass is accepted.
    fn apply(&mut self, flow: VisitFlow<'a>, state: &mut HookState, skip_depth: Option<usize>) {
        match flow {
            VisitFlow::Next => {}
            VisitFlow::Skip => {
                if let Some(depth) = skip_depth {
                    *state = HookState::SkippedUntil(depth);
                }
            }
            VisitFlow::Break => *state = HookState::Broken,
            VisitFlow::Replace(node) if !self.edited => {
                self.edited = true;
                self.node = node;
            }
            VisitFlow::Delete if !self.edited => {
                self.edited = true;
                self.deleted = true;
            }
            VisitFlow::Replace(_) | VisitFlow::Delete => {}
        }
    }

    fn into_flow(self, states: [HookState; 2]) -> VisitFlow<'a> {
        if self.deleted {
            VisitFlow::Delete
        } else if states.iter().all(|state| *state == HookState::Broken) {
            VisitFlow::Break
        } else if self.edited {
            VisitFlow::Replace(self.node)
        } else if states.iter().all(|state| *state != HookState::Visiting) {
            VisitFlow::Skip
        } else {
            VisitFlow::Next
        }
    }
}

/// This structure implements the `Visitor` trait and runs two child Visitors in parallel,
/// executing and calling callbacks on them both.
///
/// During traversal the Composed Visitor will keep track of each visitor's [`VisitFlow`] signals
/// and will avoid calling callbacks on them appropriately, while letting the other visitor
/// continue as usual. A visitor that skips a node is paused until that node is left, and
/// receives its `leave_` callback. A visitor that breaks is paused for the rest of the traversal,
/// and resumes when the Composed Visitor is used for another traversal.
///
/// The first visitor that edits a node wins. The second visitor is then called with the edited
/// node and its own edits are ignored. When the first visitor deletes a node the second visitor
/// isn't called for it.
///
/// Visitors may be composed indefinitely since a Composed Visitor can be passed into another
/// Composed Visitor, as long as all visitors accept the same `Context` type.
pub struct ComposedVisitor<'a, Context, A: Visitor<'a, Context>, B: Visitor<'a, Context>> {
    _marker: std::marker::PhantomData<&'a Context>,
    depth: usize,
    state_a: HookState,
    state_b: HookState,
    pub a: A,
    pub b: B,
}

impl<'a, C, A: Visitor<'a, C>, B: Visitor<'a, C>> ComposedVisitor<'a, C, A, B> {
    /// Composes two input visitors into one Composed Visitor.
    #[inline]
    pub fn new(a: A, b: B) -> ComposedVisitor<'a, C, A, B> {
        ComposedVisitor {
            _marker: std::marker::PhantomData,
            depth: 0,
            state_a: HookState::Visiting,
            state_b: HookState::Visiting,
            a,
            b,
        }
    }

    /// Resumes visitors that skipped the node at the current depth.
    #[inline]
    fn resume(&mut self) {
        let depth = self.depth;
        for state in [&mut self.state_a, &mut self.state_b] {
            if *state == HookState::SkippedUntil(depth) {
                *state = HookState::Visiting;
            }
        }
    }
}

impl<'a, C, A: Visitor<'a, C>, B: Visitor<'a, C>> Visitor<'a, C> for ComposedVisitor<'a, C, A, B> {
    fn enter(&mut self, ctx: &mut C, node: Node<'a>, info: &VisitInfo<'a>) -> VisitResult<'a> {
        if info.ancestors.is_empty() {
            // A new traversal starts at its root node
            self.depth = 0;
            self.state_a = HookState::Visiting;
            self.state_b = HookState::Visiting;
        }
        self.depth += 1;
        let depth = Some(self.depth);
        let mut pass = Pass::new(node);
        if self.state_a == HookState::Visiting {
            let flow = self.a.enter(ctx, pass.node, info)?;
            pass.apply(flow, &mut self.state_a, depth);
        }
        if !pass.deleted && self.state_b == HookState::Visiting {
            let flow = self.b.enter(ctx, pass.node, info)?;
            pass.apply(flow, &mut self.state_b, depth);
        }
        let flow = pass.into_flow([self.state_a, self.state_b]);
        if matches!(flow, VisitFlow::Delete | VisitFlow::Break) {
            // The node won't be left, so visitors that skipped it resume immediately
            self.resume();
            self.depth -= 1;
        }
        Ok(flow)
    }

    fn leave(&mut self, ctx: &mut C, node: Node<'a>, info: &VisitInfo<'a>) -> VisitResult<'a> {
        let mut pass = Pass::new(node);
        let result = self.leave_pass(ctx, &mut pass, info);
        self.resume();
        self.depth -= 1;
        result?;
        Ok(pass.into_flow([self.state_a, self.state_b]))
    }
}

impl<'a, C, A: Visitor<'a, C>, B: Visitor<'a, C>> ComposedVisitor<'a, C, A, B> {
    fn leave_pass(&mut self, ctx: &mut C, pass: &mut Pass<'a>, info: &VisitInfo<'a>) -> Result<()> {
        let depth = self.depth;
        if self.state_a == HookState::SkippedUntil(depth) {
            self.state_a = HookState::Visiting;
        }
        if self.state_a == HookState::Visiting {
            let flow = self.a.leave(ctx, pass.node, info)?;
            pass.apply(flow, &mut self.state_a, None);
        }
        if pass.deleted {
            return Ok(());
        }
        if self.state_b == HookState::SkippedUntil(depth) {
            self.state_b = HookState::Visiting;
        }
        if self.state_b == HookState::Visiting {
            let flow = self.b.leave(ctx, pass.node, info)?;
            pass.apply(flow, &mut self.state_b, None);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visit::VisitNode;

    /// Counts fields and skips or breaks on fields with given names.
    #[derive(Default)]
    struct FieldCounter<'a> {
        skip: &'static str,
        stop: &'static str,
        entered: Vec<&'a str>,
        left: Vec<&'a str>,
    }

    impl<'a> FieldCounter<'a> {
        fn new(skip: &'static str, stop: &'static str) -> Self {
            FieldCounter {
                skip,
                stop,
                ..Default::default()
            }
        }
    }

    impl<'a> Visitor<'a, usize> for FieldCounter<'a> {
        fn enter_field(
            &mut self,
            count: &mut usize,
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            *count += 1;
            self.entered.push(field.name.value);
            if field.name.value == self.skip {
                Ok(VisitFlow::Skip)
            } else if field.name.value == self.stop {
                Ok(VisitFlow::Break)
            } else {
                Ok(VisitFlow::Next)
            }
        }

        fn leave_field(
            &mut self,
            _: &mut usize,
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            self.left.push(field.name.value);
            Ok(VisitFlow::Next)
        }
    }

    #[test]
    fn skip_pauses_one_visitor() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a { b } c }").unwrap();
        let mut visitor = FieldCounter::new("a", "").compose(FieldCounter::new("", ""));
        let mut count = 0;
        visit(&ctx, Node::Document(document), &mut count, &mut visitor).unwrap();
        assert_eq!(visitor.a.entered, vec!["a", "c"]);
        assert_eq!(visitor.a.left, vec!["a", "c"]);
        assert_eq!(visitor.b.entered, vec!["a", "b", "c"]);
        assert_eq!(visitor.b.left, vec!["b", "a", "c"]);
        assert_eq!(count, 5);
    }

    #[test]
    fn skip_by_all_visitors() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a { b } c }").unwrap();
        let mut visitor = FieldCounter::new("a", "").compose(FieldCounter::new("a", ""));
        let mut count = 0;
        visit(&ctx, Node::Document(document), &mut count, &mut visitor).unwrap();
        assert_eq!(visitor.a.entered, vec!["a", "c"]);
        assert_eq!(visitor.b.entered, vec!["a", "c"]);
        assert_eq!(visitor.b.left, vec!["a", "c"]);
    }

    #[test]
    fn break_pauses_one_visitor() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a { b } c }").unwrap();
        let mut visitor = FieldCounter::new("", "b").compose(FieldCounter::new("", ""));
        let mut count = 0;
        visit(&ctx, Node::Document(document), &mut count, &mut visitor).unwrap();
        assert_eq!(visitor.a.entered, vec!["a", "b"]);
        assert_eq!(visitor.a.left, Vec::<&str>::new());
        assert_eq!(visitor.b.entered, vec!["a", "b", "c"]);
        assert_eq!(visitor.b.left, vec!["b", "a", "c"]);
    }

    #[test]
    fn break_by_all_visitors() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a { b } c }").unwrap();
        let mut visitor = FieldCounter::new("", "a")
            .compose(FieldCounter::new("", "b"))
            .compose(FieldCounter::new("", "a"));
        let mut count = 0;
        let result = visit(&ctx, Node::Document(document), &mut count, &mut visitor).unwrap();
        assert!(result.unwrap().ptr_eq(&Node::Document(document)));
        assert_eq!(visitor.a.a.entered, vec!["a"]);
        assert_eq!(visitor.a.b.entered, vec!["a", "b"]);
        assert_eq!(visitor.b.entered, vec!["a"]);
        assert_eq!(count, 4);
    }

    /// Replaces fields named `from` with a leaf field named `to` and records the fields it sees.
    struct Rename<'a> {
        ctx: &'a ASTContext,
        from: &'static str,
        to: &'static str,
        delete: bool,
        seen: Vec<&'a str>,
    }

    impl<'a> Rename<'a> {
        fn new(ctx: &'a ASTContext, from: &'static str, to: &'static str) -> Self {
            Rename {
                ctx,
                from,
                to,
                delete: false,
                seen: Vec::new(),
            }
        }
    }

    impl<'a> Visitor<'a> for Rename<'a> {
        fn enter_field(
            &mut self,
            _: &mut (),
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            self.seen.push(field.name.value);
            if field.name.value != self.from {
                Ok(VisitFlow::Next)
            } else if self.delete {
                Ok(VisitFlow::Delete)
            } else {
                let field = self.ctx.alloc(Field::new_leaf(self.ctx, self.to));
                Ok(VisitFlow::Replace(Node::Field(field)))
            }
        }
    }

    #[test]
    fn first_edit_wins() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a b }").unwrap();
        let mut deleting = Rename::new(&ctx, "x", "");
        deleting.delete = true;
        let mut visitor = Rename::new(&ctx, "a", "x").compose(deleting);
        let result = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
        assert_eq!(result.print(), "{\n  x\n  b\n}\n");
        assert_eq!(visitor.b.seen, vec!["x", "b"]);
    }

    #[test]
    fn delete_ends_pass() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a b }").unwrap();
        let mut deleting = Rename::new(&ctx, "a", "");
        deleting.delete = true;
        let mut visitor = deleting.compose(Rename::new(&ctx, "a", "x"));
        let result = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
        assert_eq!(result.print(), "{\n  b\n}\n");
        assert_eq!(visitor.b.seen, vec!["b"]);
    }

    #[test]
    fn break_lasts_one_traversal() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a b }").unwrap();
        let mut visitor = FieldCounter::new("", "a").compose(FieldCounter::new("", ""));
        let mut count = 0;
        visit(&ctx, Node::Document(document), &mut count, &mut visitor).unwrap();
        assert_eq!(visitor.a.entered, vec!["a"]);
        visit(&ctx, Node::Document(document), &mut count, &mut visitor).unwrap();
        assert_eq!(visitor.a.entered, vec!["a", "a"]);
        assert_eq!(visitor.b.entered, vec!["a", "b", "a", "b"]);
        assert_eq!(count, 6);
    }

    /// Replaces fields named `from` with a leaf field named `to` when they're left.
    struct LeaveRename<'a> {
        ctx: &'a ASTContext,
        from: &'static str,
        to: &'static str,
        left: Vec<&'a str>,
    }

    impl<'a> LeaveRename<'a> {
        fn new(ctx: &'a ASTContext, from: &'static str, to: &'static str) -> Self {
            LeaveRename {
                ctx,
                from,
                to,
                left: Vec::new(),
            }
        }
    }

    impl<'a, C> Visitor<'a, C> for LeaveRename<'a> {
        fn leave_field(
            &mut self,
            _: &mut C,
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            self.left.push(field.name.value);
            if field.name.value == self.from {
                let field = self.ctx.alloc(Field::new_leaf(self.ctx, self.to));
                Ok(VisitFlow::Replace(Node::Field(field)))
            } else {
                Ok(VisitFlow::Next)
            }
        }
    }

    #[test]
    fn first_leave_edit_wins() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a b }").unwrap();
        let renaming = LeaveRename::new(&ctx, "x", "y");
        let mut visitor = LeaveRename::new(&ctx, "a", "x").compose(renaming);
        let result = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
        assert_eq!(result.print(), "{\n  x\n  b\n}\n");
        assert_eq!(visitor.a.left, vec!["a", "b"]);
        assert_eq!(visitor.b.left, vec!["x", "b"]);
    }

    #[test]
    fn skipped_visitor_leaves_node() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a { b } c }").unwrap();
        let renaming = LeaveRename::new(&ctx, "a", "x");
        let mut visitor = FieldCounter::new("a", "").compose(renaming);
        let mut count = 0;
        let result = visit(&ctx, Node::Document(document), &mut count, &mut visitor)
            .unwrap()
            .unwrap();
        assert_eq!(result.print(), "{\n  x\n  c\n}\n");
        assert_eq!(visitor.a.entered, vec!["a", "c"]);
        assert_eq!(visitor.a.left, vec!["a", "c"]);
        assert_eq!(visitor.b.left, vec!["b", "a", "c"]);
    }
}
