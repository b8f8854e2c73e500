use super::children::{children, rebuild, Child};
use super::compose::ComposedVisitor;
use super::path::{Path, PathSegment};
use crate::ast::*;
use crate::error::Result;

/// A visitor signal that is returned from [Visitor] callbacks to alter the flow of traversal or
/// to edit the AST.
///
/// The default callbacks all return `VisitFlow::Next`, which continues the depth-first traversal.
/// The other signals may be used to replace or delete the current node, to skip over a node's
/// children, or to abort traversal entirely without visiting any more AST Nodes.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum VisitFlow<'a> {
    /// Continue visiting nodes as usual.
    Next,
    /// Replace the current node with another node.
    ///
    /// When returned from an `enter_` callback, the traversal continues into the replacement's
    /// children instead of the original node's children.
    Replace(Node<'a>),
    /// Skip over the current node's children. The node's `leave_` callback is still called.
    /// (Only applies to `enter_` callbacks, and is the same as `Next` otherwise)
    Skip,
    /// Remove the current node from its parent. No other callbacks are called for the node.
    Delete,
    /// Abort the traversal without performing any subsequent visits. The AST is returned with the
    /// edits that were made until then.
    Break,
}

/// The result of a [Visitor] callback, which may also abort the traversal with an error.
pub type VisitResult<'a> = Result<VisitFlow<'a>>;

/// Information about the position of the currently visited node in the AST.
#[derive(Debug, Default, Clone)]
pub struct VisitInfo<'a> {
    /// The path of keys from the root node to the current node.
    pub path: Path,
    /// The ancestors of the current node, starting at the root node and ending at its parent.
    pub ancestors: Vec<Node<'a>>,
}

impl<'a> VisitInfo<'a> {
    /// Returns the key of the current node within its parent. This is an index for nodes in lists.
    #[inline]
    pub fn key(&self) -> Option<&PathSegment> {
        self.path.last()
    }

    /// Returns the parent of the current node, unless it's the root node.
    #[inline]
    pub fn parent(&self) -> Option<Node<'a>> {
        self.ancestors.last().copied()
    }
}

/// Trait for a visitor that carries methods that are called as callback while AST nodes
/// are traversed.
///
/// While the AST is traversed in depth-first order, callbacks that are prefixed with `enter_` are
/// called from top-to-bottom while the traversal is descending, while callbacks that are prefixed
/// with `leave_` are called from bottom-to-top while the traversal is returning.
///
/// All node specific callbacks default to calling [`Visitor::enter_node`] or
/// [`Visitor::leave_node`], which themselves default to returning `VisitFlow::Next`. The
/// [`VisitFlow`] signals are returned from callbacks to alter the traversal and either continue it
/// (`Next`), edit the AST (`Replace` and `Delete`), skip over a node's children during an `enter_`
/// callback (`Skip`), or abort traversal entirely (`Break`).
///
/// The visitor may also define a custom context structure that's passed to [visit]. By default
/// the context is an empty unit `()`.
pub trait Visitor<'a, Context = ()>: Sized {
    /// Combines two visitors into one that will run both the original and passed visitor
    /// in parallel.
    ///
    /// Both visitors must accept the same `Context` type.
    #[inline]
    fn compose<V: Visitor<'a, Context>>(self, other: V) -> ComposedVisitor<'a, Context, Self, V> {
        ComposedVisitor::new(self, other)
    }

    /// Called when any node is visited and before its child nodes are visited, unless a more
    /// specific `enter_` callback is implemented.
    fn enter_node(
        &mut self,
        _ctx: &mut Context,
        _node: Node<'a>,
        _info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        Ok(VisitFlow::Next)
    }
    /// Called after any node and its child nodes were visited, unless a more specific `leave_`
    /// callback is implemented.
    fn leave_node(
        &mut self,
        _ctx: &mut Context,
        _node: Node<'a>,
        _info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        Ok(VisitFlow::Next)
    }

    /// Called when a [Document] is visited and before its child nodes are visited.
    fn enter_document(
        &mut self,
        ctx: &mut Context,
        document: &'a Document<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::Document(document), info)
    }
    /// Called after a [Document] and its child nodes were visited.
    fn leave_document(
        &mut self,
        ctx: &mut Context,
        document: &'a Document<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::Document(document), info)
    }

    /// Called when an [`OperationDefinition`] node is visited and before its child nodes are visited.
    fn enter_operation(
        &mut self,
        ctx: &mut Context,
        operation: &'a OperationDefinition<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::OperationDefinition(operation), info)
    }
    /// Called after an [`OperationDefinition`] and its child node were visited.
    fn leave_operation(
        &mut self,
        ctx: &mut Context,
        operation: &'a OperationDefinition<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::OperationDefinition(operation), info)
    }

    /// Called when a [`FragmentDefinition`] node is visited and before its child nodes are visited.
    fn enter_fragment(
        &mut self,
        ctx: &mut Context,
        fragment: &'a FragmentDefinition<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::FragmentDefinition(fragment), info)
    }
    /// Called after a [`FragmentDefinition`] node and its child nodes were visited.
    fn leave_fragment(
        &mut self,
        ctx: &mut Context,
        fragment: &'a FragmentDefinition<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::FragmentDefinition(fragment), info)
    }

    /// Called when a [`VariableDefinition`] node is visited and before its child nodes are visited.
    fn enter_variable_definition(
        &mut self,
        ctx: &mut Context,
        var_def: &'a VariableDefinition<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::VariableDefinition(var_def), info)
    }
    /// Called after a [`VariableDefinition`] node and its child nodes were visited.
    fn leave_variable_definition(
        &mut self,
        ctx: &mut Context,
        var_def: &'a VariableDefinition<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::VariableDefinition(var_def), info)
    }

    /// Called when a [`SelectionSet`] node is visited and before its child nodes are visited.
    fn enter_selection_set(
        &mut self,
        ctx: &mut Context,
        selection_set: &'a SelectionSet<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::SelectionSet(selection_set), info)
    }
    /// Called after a [`SelectionSet`] node and its child nodes were visited.
    fn leave_selection_set(
        &mut self,
        ctx: &mut Context,
        selection_set: &'a SelectionSet<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::SelectionSet(selection_set), info)
    }

    /// Called when a [`FragmentSpread`] node is visited and before its child nodes are visited.
    fn enter_fragment_spread(
        &mut self,
        ctx: &mut Context,
        fragment_spread: &'a FragmentSpread<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::FragmentSpread(fragment_spread), info)
    }
    /// Called after a [`FragmentSpread`] node and its child nodes were visited.
    fn leave_fragment_spread(
        &mut self,
        ctx: &mut Context,
        fragment_spread: &'a FragmentSpread<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::FragmentSpread(fragment_spread), info)
    }

    /// Called when an [`InlineFragment`] node is visited and before its child nodes are visited.
    fn enter_inline_fragment(
        &mut self,
        ctx: &mut Context,
        inline_fragment: &'a InlineFragment<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::InlineFragment(inline_fragment), info)
    }
    /// Called after an [`InlineFragment`] node and its child nodes were visited.
    fn leave_inline_fragment(
        &mut self,
        ctx: &mut Context,
        inline_fragment: &'a InlineFragment<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::InlineFragment(inline_fragment), info)
    }

    /// Called when a [Field] node is visited and before its child nodes are visited.
    fn enter_field(
        &mut self,
        ctx: &mut Context,
        field: &'a Field<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::Field(field), info)
    }
    /// Called after a [Field] node and its child nodes were visited.
    fn leave_field(
        &mut self,
        ctx: &mut Context,
        field: &'a Field<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::Field(field), info)
    }

    /// Called when an [Argument] node is visited and before its child nodes are visited.
    fn enter_argument(
        &mut self,
        ctx: &mut Context,
        argument: &'a Argument<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::Argument(argument), info)
    }
    /// Called after an [Argument] node and its child nodes were visited.
    fn leave_argument(
        &mut self,
        ctx: &mut Context,
        argument: &'a Argument<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::Argument(argument), info)
    }

    /// Called when a [Directive] node is visited and before its child nodes are visited.
    fn enter_directive(
        &mut self,
        ctx: &mut Context,
        directive: &'a Directive<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::Directive(directive), info)
    }
    /// Called after a [Directive] node and its child nodes were visited.
    fn leave_directive(
        &mut self,
        ctx: &mut Context,
        directive: &'a Directive<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::Directive(directive), info)
    }

    /// Called when a [Variable] node is visited, both in values and in variable definitions.
    fn enter_variable(
        &mut self,
        ctx: &mut Context,
        var: &'a Variable<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::Variable(var), info)
    }
    /// Called after a [Variable] node was visited.
    fn leave_variable(
        &mut self,
        ctx: &mut Context,
        var: &'a Variable<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::Variable(var), info)
    }

    /// Called when a [Name] node is visited.
    fn enter_name(
        &mut self,
        ctx: &mut Context,
        name: &'a Name<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::Name(name), info)
    }
    /// Called after a [Name] node was visited.
    fn leave_name(
        &mut self,
        ctx: &mut Context,
        name: &'a Name<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::Name(name), info)
    }

    /// Called when a [`NamedType`] node is visited, e.g. a type condition or a variable's type.
    fn enter_named_type(
        &mut self,
        ctx: &mut Context,
        named_type: &'a NamedType<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::NamedType(named_type), info)
    }
    /// Called after a [`NamedType`] node was visited.
    fn leave_named_type(
        &mut self,
        ctx: &mut Context,
        named_type: &'a NamedType<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::NamedType(named_type), info)
    }

    /// Called when a list or non-null [Type] is visited and before its inner type is visited.
    fn enter_type(
        &mut self,
        ctx: &mut Context,
        of_type: &'a Type<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::Type(of_type), info)
    }
    /// Called after a list or non-null [Type] and its inner type were visited.
    fn leave_type(
        &mut self,
        ctx: &mut Context,
        of_type: &'a Type<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::Type(of_type), info)
    }

    /// Called when a [Value] other than a variable is visited and before its child nodes are
    /// visited.
    fn enter_value(
        &mut self,
        ctx: &mut Context,
        value: &'a Value<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::Value(value), info)
    }
    /// Called after a [Value] and its child nodes were visited.
    fn leave_value(
        &mut self,
        ctx: &mut Context,
        value: &'a Value<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::Value(value), info)
    }

    /// Called when an [`ObjectField`] node is visited and before its child nodes are visited.
    fn enter_object_field(
        &mut self,
        ctx: &mut Context,
        field: &'a ObjectField<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.enter_node(ctx, Node::ObjectField(field), info)
    }
    /// Called after an [`ObjectField`] node and its child nodes were visited.
    fn leave_object_field(
        &mut self,
        ctx: &mut Context,
        field: &'a ObjectField<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        self.leave_node(ctx, Node::ObjectField(field), info)
    }

    /// Dispatches to the `enter_` callback for the given node's kind.
    fn enter(
        &mut self,
        ctx: &mut Context,
        node: Node<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        match node {
            Node::Document(document) => self.enter_document(ctx, document, info),
            Node::OperationDefinition(operation) => self.enter_operation(ctx, operation, info),
            Node::FragmentDefinition(fragment) => self.enter_fragment(ctx, fragment, info),
            Node::VariableDefinition(var_def) => self.enter_variable_definition(ctx, var_def, info),
            Node::SelectionSet(selection_set) => self.enter_selection_set(ctx, selection_set, info),
            Node::Field(field) => self.enter_field(ctx, field, info),
            Node::FragmentSpread(spread) => self.enter_fragment_spread(ctx, spread, info),
            Node::InlineFragment(fragment) => self.enter_inline_fragment(ctx, fragment, info),
            Node::Argument(argument) => self.enter_argument(ctx, argument, info),
            Node::Directive(directive) => self.enter_directive(ctx, directive, info),
            Node::Variable(var) => self.enter_variable(ctx, var, info),
            Node::Value(Value::Variable(var)) => self.enter_variable(ctx, var, info),
            Node::Value(value) => self.enter_value(ctx, value, info),
            Node::Name(name) => self.enter_name(ctx, name, info),
            Node::NamedType(named_type) => self.enter_named_type(ctx, named_type, info),
            Node::Type(Type::NamedType(named_type)) => {
                self.enter_named_type(ctx, named_type, info)
            }
            Node::Type(of_type) => self.enter_type(ctx, of_type, info),
            Node::ObjectField(field) => self.enter_object_field(ctx, field, info),
        }
    }

    /// Dispatches to the `leave_` callback for the given node's kind.
    fn leave(
        &mut self,
        ctx: &mut Context,
        node: Node<'a>,
        info: &VisitInfo<'a>,
    ) -> VisitResult<'a> {
        match node {
            Node::Document(document) => self.leave_document(ctx, document, info),
            Node::OperationDefinition(operation) => self.leave_operation(ctx, operation, info),
            Node::FragmentDefinition(fragment) => self.leave_fragment(ctx, fragment, info),
            Node::VariableDefinition(var_def) => self.leave_variable_definition(ctx, var_def, info),
            Node::SelectionSet(selection_set) => self.leave_selection_set(ctx, selection_set, info),
            Node::Field(field) => self.leave_field(ctx, field, info),
            Node::FragmentSpread(spread) => self.leave_fragment_spread(ctx, spread, info),
            Node::InlineFragment(fragment) => self.leave_inline_fragment(ctx, fragment, info),
            Node::Argument(argument) => self.leave_argument(ctx, argument, info),
            Node::Directive(directive) => self.leave_directive(ctx, directive, info),
            Node::Variable(var) => self.leave_variable(ctx, var, info),
            Node::Value(Value::Variable(var)) => self.leave_variable(ctx, var, info),
            Node::Value(value) => self.leave_value(ctx, value, info),
            Node::Name(name) => self.leave_name(ctx, name, info),
            Node::NamedType(named_type) => self.leave_named_type(ctx, named_type, info),
            Node::Type(Type::NamedType(named_type)) => {
                self.leave_named_type(ctx, named_type, info)
            }
            Node::Type(of_type) => self.leave_type(ctx, of_type, info),
            Node::ObjectField(field) => self.leave_object_field(ctx, field, info),
        }
    }
}

/// A node that's being visited, along with its children and their edited versions.
struct Frame<'a> {
    /// The node as it was found in its parent.
    original: Node<'a>,
    /// The node whose children are traversed, which differs from `original` after a replacement.
    node: Node<'a>,
    children: Vec<Child<'a>>,
    next: usize,
    results: Vec<Option<Node<'a>>>,
    dirty: bool,
    /// How many path segments the node's key occupies.
    key_len: usize,
}

impl<'a> Frame<'a> {
    fn new(original: Node<'a>, node: Node<'a>, children: Vec<Child<'a>>, key_len: usize) -> Self {
        Frame {
            original,
            node,
            results: Vec::with_capacity(children.len()),
            children,
            next: 0,
            dirty: false,
            key_len,
        }
    }

    #[inline]
    fn deliver(&mut self, original: Node<'a>, result: Option<Node<'a>>) {
        let unchanged = matches!(result, Some(node) if node.ptr_eq(&original));
        self.dirty = self.dirty || !unchanged;
        self.results.push(result);
    }

    /// Returns the node with its edited children, which is only copied when any child changed.
    fn finish(mut self, ctx: &'a ASTContext) -> Result<Node<'a>> {
        if !self.dirty {
            return Ok(self.node);
        }
        for child in &self.children[self.results.len()..] {
            self.results.push(Some(child.node));
        }
        rebuild(ctx, self.node, self.results)
    }
}

enum Entered<'a> {
    Descend(Frame<'a>),
    Delete,
    Break,
}

fn enter<'a, C, V: Visitor<'a, C>>(
    node: Node<'a>,
    key_len: usize,
    context: &mut C,
    visitor: &mut V,
    info: &VisitInfo<'a>,
) -> Result<Entered<'a>> {
    let entered = match visitor.enter(context, node, info)? {
        VisitFlow::Next => Entered::Descend(Frame::new(node, node, children(node), key_len)),
        VisitFlow::Replace(replacement) => Entered::Descend(Frame::new(
            node,
            replacement,
            children(replacement),
            key_len,
        )),
        VisitFlow::Skip => Entered::Descend(Frame::new(node, node, Vec::new(), key_len)),
        VisitFlow::Delete => Entered::Delete,
        VisitFlow::Break => Entered::Break,
    };
    Ok(entered)
}

/// Rebuilds the remaining frames after a traversal was aborted, without calling any more
/// callbacks.
fn unwind<'a>(ctx: &'a ASTContext, mut stack: Vec<Frame<'a>>) -> Result<Option<Node<'a>>> {
    log::trace!("Visitor stopped at a depth of {}", stack.len());
    let mut result = None;
    while let Some(frame) = stack.pop() {
        let original = frame.original;
        let node = frame.finish(ctx)?;
        match stack.last_mut() {
            Some(parent) => parent.deliver(original, Some(node)),
            None => result = Some(node),
        }
    }
    Ok(result)
}

/// Traverses the given `node` depth-first and calls the `visitor`'s callbacks for it and all of
/// its descendants.
///
/// The AST isn't mutated. Instead, edits that the visitor makes are applied to shallow copies of
/// the edited nodes' ancestors, which are allocated in `ctx`. Nodes that haven't been edited are
/// shared with the original AST, and when no edits were made the original `node` is returned.
/// `None` is returned when the root node itself was deleted.
///
/// The traversal uses an explicit stack rather than recursion, so deeply nested ASTs don't
/// overflow the call stack.
pub fn visit<'a, C, V: Visitor<'a, C>>(
    ctx: &'a ASTContext,
    node: Node<'a>,
    context: &mut C,
    visitor: &mut V,
) -> Result<Option<Node<'a>>> {
    let mut info = VisitInfo::default();
    let mut stack: Vec<Frame<'a>> = Vec::new();

    match enter(node, 0, context, visitor, &info)? {
        Entered::Descend(frame) => {
            info.ancestors.push(frame.node);
            stack.push(frame);
        }
        Entered::Delete => return Ok(None),
        Entered::Break => return Ok(Some(node)),
    }

    while let Some(frame) = stack.last_mut() {
        if let Some(child) = frame.children.get(frame.next).copied() {
            frame.next += 1;
            let key_len = child.push_key(&mut info.path);
            match enter(child.node, key_len, context, visitor, &info)? {
                Entered::Descend(frame) => {
                    info.ancestors.push(frame.node);
                    stack.push(frame);
                }
                Entered::Delete => {
                    info.path.pop_many(key_len);
                    frame.deliver(child.node, None);
                }
                Entered::Break => {
                    frame.deliver(child.node, Some(child.node));
                    return unwind(ctx, stack);
                }
            }
        } else if let Some(frame) = stack.pop() {
            info.ancestors.pop();
            let original = frame.original;
            let key_len = frame.key_len;
            let node = frame.finish(ctx)?;
            let flow = visitor.leave(context, node, &info)?;
            info.path.pop_many(key_len);
            let result = match flow {
                VisitFlow::Next | VisitFlow::Skip | VisitFlow::Break => Some(node),
                VisitFlow::Replace(replacement) => Some(replacement),
                VisitFlow::Delete => None,
            };
            match stack.last_mut() {
                Some(parent) => parent.deliver(original, result),
                None => return Ok(result),
            }
            if flow == VisitFlow::Break {
                return unwind(ctx, stack);
            }
        }
    }

    Ok(Some(node))
}

/// Trait for nodes that can be traversed by a [Visitor].
///
/// This is implemented for every AST Node that can be converted into a [Node].
pub trait VisitNode<'a> {
    /// Visit this node and its descendants, see [visit].
    ///
    /// The `context` is passed to all of the visitor's callbacks.
    fn visit<C, V: Visitor<'a, C>>(
        &'a self,
        ctx: &'a ASTContext,
        context: &mut C,
        visitor: &mut V,
    ) -> Result<Option<Node<'a>>>;
}

impl<'a, T: 'a> VisitNode<'a> for T
where
    &'a T: Into<Node<'a>>,
{
    #[inline]
    fn visit<C, V: Visitor<'a, C>>(
        &'a self,
        ctx: &'a ASTContext,
        context: &mut C,
        visitor: &mut V,
    ) -> Result<Option<Node<'a>>> {
        visit(ctx, self.into(), context, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorType};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl<'a> Visitor<'a> for Recorder {
        fn enter_node(&mut self, _: &mut (), node: Node<'a>, _: &VisitInfo<'a>) -> VisitResult<'a> {
            self.events.push(format!("enter {}", node.kind().as_str()));
            Ok(VisitFlow::Next)
        }

        fn leave_node(&mut self, _: &mut (), node: Node<'a>, _: &VisitInfo<'a>) -> VisitResult<'a> {
            self.events.push(format!("leave {}", node.kind().as_str()));
            Ok(VisitFlow::Next)
        }
    }

    struct Noop;

    impl<'a> Visitor<'a> for Noop {}

    /// Deletes every field with the given name.
    struct DeleteField(&'static str);

    impl<'a> Visitor<'a> for DeleteField {
        fn enter_field(
            &mut self,
            _: &mut (),
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            if field.name.value == self.0 {
                Ok(VisitFlow::Delete)
            } else {
                Ok(VisitFlow::Next)
            }
        }
    }

    #[test]
    fn enter_and_leave_order() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a(x: 1) }").unwrap();
        let mut recorder = Recorder::default();
        document.visit(&ctx, &mut (), &mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "enter Document",
                "enter OperationDefinition",
                "enter SelectionSet",
                "enter Field",
                "enter Name",
                "leave Name",
                "enter Argument",
                "enter Name",
                "leave Name",
                "enter IntValue",
                "leave IntValue",
                "leave Argument",
                "leave Field",
                "leave SelectionSet",
                "leave OperationDefinition",
                "leave Document",
            ]
        );
    }

    #[test]
    fn variables_and_types() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "query ($v: [Int]!) { a(x: $v) }").unwrap();
        let mut recorder = Recorder::default();
        document.visit(&ctx, &mut (), &mut recorder).unwrap();
        let entered: Vec<&str> = recorder
            .events
            .iter()
            .filter_map(|event| event.strip_prefix("enter "))
            .collect();
        assert_eq!(
            entered,
            vec![
                "Document",
                "OperationDefinition",
                "VariableDefinition",
                "Variable",
                "Name",
                "NonNullType",
                "ListType",
                "NamedType",
                "Name",
                "SelectionSet",
                "Field",
                "Name",
                "Argument",
                "Name",
                "Variable",
                "Name",
            ]
        );
    }

    #[test]
    fn noop_returns_original() {
        let ctx = ASTContext::new();
        let query = include_str!("../../fixture/kitchen_sink.graphql");
        let document = Document::parse(&ctx, query).unwrap();
        let result = document.visit(&ctx, &mut (), &mut Noop).unwrap().unwrap();
        assert!(result.ptr_eq(&Node::Document(document)));
    }

    #[test]
    fn delete_field() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a b { c d } e }").unwrap();
        let result = document
            .visit(&ctx, &mut (), &mut DeleteField("d"))
            .unwrap()
            .unwrap();
        assert_eq!(result.print(), "{\n  a\n  b {\n    c\n  }\n  e\n}\n");
        assert_eq!(document.print(), "{\n  a\n  b {\n    c\n    d\n  }\n  e\n}\n");

        // Only the ancestors of the deleted field are copied
        let operation = document.definitions[0].operation().unwrap();
        let copy = <&Document>::try_from(result).unwrap().definitions[0]
            .operation()
            .unwrap();
        assert!(!std::ptr::eq(operation, copy));
        assert!(std::ptr::eq(
            operation.selection_set.selections[0].field().unwrap(),
            copy.selection_set.selections[0].field().unwrap()
        ));
        assert!(std::ptr::eq(
            operation.selection_set.selections[2].field().unwrap(),
            copy.selection_set.selections[2].field().unwrap()
        ));
    }

    #[test]
    fn delete_root() {
        let ctx = ASTContext::new();
        let field = Field::parse(&ctx, "a").unwrap();
        assert_eq!(field.visit(&ctx, &mut (), &mut DeleteField("a")).unwrap(), None);
    }

    #[test]
    fn deleting_all_selections() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a { b } }").unwrap();
        let error = document
            .visit(&ctx, &mut (), &mut DeleteField("b"))
            .unwrap_err();
        assert_eq!(error.error_type(), ErrorType::GraphQL);
    }

    /// Deletes all names of the given parent kind.
    struct DeleteNames(ASTKind);

    impl<'a> Visitor<'a> for DeleteNames {
        fn enter_name(
            &mut self,
            _: &mut (),
            _: &'a Name<'a>,
            info: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            match info.parent() {
                Some(parent) if parent.kind() == self.0 => Ok(VisitFlow::Delete),
                _ => Ok(VisitFlow::Next),
            }
        }
    }

    #[test]
    fn deleting_required_nodes() {
        let ctx = ASTContext::new();
        let field = Field::parse(&ctx, "a").unwrap();
        let mut visitor = DeleteNames(ASTKind::Field);
        assert_eq!(
            field.visit(&ctx, &mut (), &mut visitor).unwrap_err().message(),
            "Cannot delete the name of a Field"
        );
    }

    #[test]
    fn deleting_optional_nodes() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "query Name { a }").unwrap();
        let mut visitor = DeleteNames(ASTKind::OperationDefinition);
        let result = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
        assert_eq!(result.print(), "{\n  a\n}\n");
    }

    /// Renames fields by replacing their names with uppercase names.
    struct Uppercase<'a> {
        ctx: &'a ASTContext,
    }

    impl<'a> Visitor<'a> for Uppercase<'a> {
        fn enter_field(
            &mut self,
            _: &mut (),
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            let name = self.ctx.alloc_string(field.name.value.to_uppercase());
            let field = self.ctx.alloc(Field {
                name: Name::new(name),
                ..field.clone()
            });
            Ok(VisitFlow::Replace(Node::Field(field)))
        }

        fn enter_value(
            &mut self,
            _: &mut (),
            value: &'a Value<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            match value {
                Value::Int(_) => {
                    let value = self.ctx.alloc(Value::Int(IntValue { value: "2" }));
                    Ok(VisitFlow::Replace(Node::Value(value)))
                }
                _ => Ok(VisitFlow::Next),
            }
        }
    }

    #[test]
    fn replace_and_descend() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a { b(x: 1) } }").unwrap();
        let result = document
            .visit(&ctx, &mut (), &mut Uppercase { ctx: &ctx })
            .unwrap()
            .unwrap();
        assert_eq!(result.print(), "{\n  A {\n    B(x: 2)\n  }\n}\n");
    }

    struct Misplace<'a> {
        ctx: &'a ASTContext,
    }

    impl<'a> Visitor<'a> for Misplace<'a> {
        fn enter_field(
            &mut self,
            _: &mut (),
            _: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            let name = self.ctx.alloc(Name::new("a"));
            Ok(VisitFlow::Replace(Node::Name(name)))
        }
    }

    #[test]
    fn replacement_must_fit() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a }").unwrap();
        let error = document
            .visit(&ctx, &mut (), &mut Misplace { ctx: &ctx })
            .unwrap_err();
        assert_eq!(error.message(), "Expected Selection but got Name");
    }

    /// Skips the children of fields named `a` and counts all callbacks on fields.
    #[derive(Default)]
    struct SkipA {
        enter: usize,
        leave: usize,
        names: usize,
    }

    impl<'a> Visitor<'a> for SkipA {
        fn enter_field(
            &mut self,
            _: &mut (),
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            self.enter += 1;
            if field.name.value == "a" {
                Ok(VisitFlow::Skip)
            } else {
                Ok(VisitFlow::Next)
            }
        }

        fn leave_field(
            &mut self,
            _: &mut (),
            _: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            self.leave += 1;
            Ok(VisitFlow::Next)
        }

        fn enter_name(
            &mut self,
            _: &mut (),
            _: &'a Name<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            self.names += 1;
            Ok(VisitFlow::Next)
        }
    }

    #[test]
    fn skip_still_leaves() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a { b c } d }").unwrap();
        let mut visitor = SkipA::default();
        let result = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
        assert!(result.ptr_eq(&Node::Document(document)));
        assert_eq!(visitor.enter, 2);
        assert_eq!(visitor.leave, 2);
        assert_eq!(visitor.names, 1);
    }

    /// Deletes field `a` and stops at field `b`.
    #[derive(Default)]
    struct DeleteThenBreak {
        leaves: usize,
    }

    impl<'a> Visitor<'a> for DeleteThenBreak {
        fn enter_field(
            &mut self,
            _: &mut (),
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            match field.name.value {
                "a" => Ok(VisitFlow::Delete),
                "b" => Ok(VisitFlow::Break),
                _ => Ok(VisitFlow::Delete),
            }
        }

        fn leave_node(&mut self, _: &mut (), _: Node<'a>, _: &VisitInfo<'a>) -> VisitResult<'a> {
            self.leaves += 1;
            Ok(VisitFlow::Next)
        }
    }

    #[test]
    fn break_keeps_edits() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a b { x } c }").unwrap();
        let mut visitor = DeleteThenBreak::default();
        let result = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
        assert_eq!(result.print(), "{\n  b {\n    x\n  }\n  c\n}\n");
        assert_eq!(visitor.leaves, 0);

        let copy = <&Document>::try_from(result).unwrap().definitions[0]
            .operation()
            .unwrap();
        let original = document.definitions[0].operation().unwrap();
        assert!(std::ptr::eq(
            original.selection_set.selections[1].field().unwrap(),
            copy.selection_set.selections[0].field().unwrap()
        ));
    }

    #[test]
    fn break_without_edits() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ b c }").unwrap();
        let mut visitor = DeleteThenBreak::default();
        let result = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
        assert!(result.ptr_eq(&Node::Document(document)));
    }

    /// Deletes field `a`, uppercases field `b`, and stops at field `c` when they're left.
    struct LeaveEdits<'a> {
        ctx: &'a ASTContext,
        entered: Vec<&'a str>,
        left: Vec<&'a str>,
    }

    impl<'a> Visitor<'a> for LeaveEdits<'a> {
        fn enter_field(
            &mut self,
            _: &mut (),
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            self.entered.push(field.name.value);
            Ok(VisitFlow::Next)
        }

        fn leave_field(
            &mut self,
            _: &mut (),
            field: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            self.left.push(field.name.value);
            match field.name.value {
                "a" => Ok(VisitFlow::Delete),
                "b" => {
                    let field = self.ctx.alloc(Field {
                        name: Name::new("B"),
                        ..field.clone()
                    });
                    Ok(VisitFlow::Replace(Node::Field(field)))
                }
                "c" => Ok(VisitFlow::Break),
                _ => Ok(VisitFlow::Next),
            }
        }
    }

    #[test]
    fn leave_edits() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a b { x } c d }").unwrap();
        let mut visitor = LeaveEdits {
            ctx: &ctx,
            entered: Vec::new(),
            left: Vec::new(),
        };
        let result = document.visit(&ctx, &mut (), &mut visitor).unwrap().unwrap();
        assert_eq!(result.print(), "{\n  B {\n    x\n  }\n  c\n  d\n}\n");
        assert_eq!(visitor.entered, vec!["a", "b", "x", "c"]);
        assert_eq!(visitor.left, vec!["a", "x", "b", "c"]);
        assert_eq!(
            document.print(),
            "{\n  a\n  b {\n    x\n  }\n  c\n  d\n}\n"
        );

        // Fields after the break are shared with the original
        let original = document.definitions[0].operation().unwrap();
        let copy = <&Document>::try_from(result).unwrap().definitions[0]
            .operation()
            .unwrap();
        assert!(std::ptr::eq(
            original.selection_set.selections[3].field().unwrap(),
            copy.selection_set.selections[2].field().unwrap()
        ));
    }

    struct Fail;

    impl<'a> Visitor<'a> for Fail {
        fn leave_field(
            &mut self,
            _: &mut (),
            _: &'a Field<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            Err(Error::new("Failed", None))
        }
    }

    #[test]
    fn errors_propagate() {
        let ctx = ASTContext::new();
        let document = Document::parse(&ctx, "{ a }").unwrap();
        let error = document.visit(&ctx, &mut (), &mut Fail).unwrap_err();
        assert_eq!(error.message(), "Failed");
    }

    #[derive(Default)]
    struct SpreadInfo {
        path: Option<String>,
        ancestors: Vec<ASTKind>,
        parent: Option<ASTKind>,
        key: Option<PathSegment>,
    }

    impl<'a> Visitor<'a, usize> for SpreadInfo {
        fn enter_fragment_spread(
            &mut self,
            spreads: &mut usize,
            _: &'a FragmentSpread<'a>,
            info: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            *spreads += 1;
            self.path = Some(info.path.to_string());
            self.ancestors = info.ancestors.iter().map(|node| node.kind()).collect();
            self.parent = info.parent().map(|node| node.kind());
            self.key = info.key().copied();
            Ok(VisitFlow::Next)
        }

        fn enter_document(
            &mut self,
            _: &mut usize,
            _: &'a Document<'a>,
            info: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            assert!(info.path.is_empty());
            assert_eq!(info.parent(), None);
            Ok(VisitFlow::Next)
        }
    }

    #[test]
    fn kitchen_sink_info() {
        let ctx = ASTContext::new();
        let query = include_str!("../../fixture/kitchen_sink.graphql");
        let document = Document::parse(&ctx, query).unwrap();
        let mut visitor = SpreadInfo::default();
        let mut spreads = 0;
        document.visit(&ctx, &mut spreads, &mut visitor).unwrap();
        assert_eq!(spreads, 1);
        assert_eq!(
            visitor.path.unwrap(),
            "0.selectionSet.0.selectionSet.1.selectionSet.0.selectionSet.1.selectionSet.1"
        );
        assert_eq!(visitor.ancestors.len(), 11);
        assert_eq!(visitor.ancestors[0], ASTKind::Document);
        assert_eq!(visitor.ancestors[5], ASTKind::InlineFragment);
        assert_eq!(visitor.parent, Some(ASTKind::SelectionSet));
        assert_eq!(visitor.key, Some(PathSegment::Index(1)));
    }

    struct ReplaceInnermost<'a> {
        ctx: &'a ASTContext,
    }

    impl<'a> Visitor<'a> for ReplaceInnermost<'a> {
        fn enter_value(
            &mut self,
            _: &mut (),
            value: &'a Value<'a>,
            _: &VisitInfo<'a>,
        ) -> VisitResult<'a> {
            match value {
                Value::Int(_) => Ok(VisitFlow::Replace(Node::Value(self.ctx.alloc(Value::Null)))),
                _ => Ok(VisitFlow::Next),
            }
        }
    }

    #[test]
    fn deep_nesting() {
        let ctx = ASTContext::new();
        let mut value = Value::Int(IntValue { value: "1" });
        for _ in 0..50_000 {
            let mut values = bumpalo::collections::Vec::new_in(&ctx.arena);
            values.push(value);
            value = Value::List(ctx.alloc(ListValue { values }));
        }
        let value = ctx.alloc(value);
        let result = value.visit(&ctx, &mut (), &mut Noop).unwrap().unwrap();
        assert!(result.ptr_eq(&Node::Value(value)));

        let result = value
            .visit(&ctx, &mut (), &mut ReplaceInnermost { ctx: &ctx })
            .unwrap()
            .unwrap();
        let mut depth = 0;
        let mut inner = Value::try_from(result).unwrap();
        while let Value::List(list) = inner {
            depth += 1;
            inner = list.values[0];
        }
        assert_eq!(depth, 50_000);
        assert_eq!(inner, Value::Null);
    }
}
