use super::ast::*;
use super::node::Node;
use std::{fmt, fmt::Write};

/// Options for printing AST Nodes that change the layout of the output.
///
/// By default the printer never wraps lines.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct PrintOptions {
    /// When set, a field whose alias, name, and arguments don't fit into this many characters
    /// prints each of its arguments on a separate line instead.
    pub max_line_width: Option<usize>,
}

impl PrintOptions {
    /// Creates options that wrap the arguments of fields that are wider than `max_line_width`.
    pub fn with_max_line_width(max_line_width: usize) -> Self {
        PrintOptions {
            max_line_width: Some(max_line_width),
        }
    }
}

/// Trait for printing AST Nodes to a new String allocated on the heap.
/// This is implemented by all AST Nodes and can hence be used to granularly print GraphQL language.
/// However, mostly this will be used via `Document::print`.
///
/// This typically is the last operation that's done in a given AST context and is hence outside
/// of its lifetime and arena.
///
/// For convience when debugging, AST Nodes that implement `PrintNode` also implement the
/// [`fmt::Display`] trait.
pub trait PrintNode {
    /// Write an AST node to a buffer implementing the [Write] trait, using the given
    /// [PrintOptions].
    ///
    /// The `level` indicates the level of nesting, which increases with each [`SelectionSet`]
    /// and is typically initialized as zero (`0`).
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result;

    /// Write an AST node to a buffer implementing the [Write] trait using the default options.
    #[inline]
    fn write_to_buffer(&self, level: usize, buffer: &mut dyn Write) -> fmt::Result {
        self.write_with_options(&PrintOptions::default(), level, buffer)
    }

    /// Print an AST Node to source text as a String allocated on the heap.
    ///
    /// Printing can't fail for any valid AST. Should the buffer still report an error, an empty
    /// String is returned.
    fn print(&self) -> String {
        self.print_with_options(&PrintOptions::default())
    }

    /// Print an AST Node to source text as a String, using the given [PrintOptions].
    fn print_with_options(&self, options: &PrintOptions) -> String {
        let mut buf = String::new();
        match self.write_with_options(options, 0, &mut buf) {
            Ok(()) => buf,
            _ => "".to_string(),
        }
    }
}

/// Prints any AST Node to its canonical source text.
pub fn print(node: Node) -> String {
    node.print()
}

impl fmt::Display for dyn PrintNode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to_buffer(0, f)
    }
}

macro_rules! display_via_printer {
    ($($node:ident),+ $(,)?) => {
        $(
            impl<'a> fmt::Display for $node<'a> {
                #[inline]
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.write_to_buffer(0, f)
                }
            }
        )+
    };
}

display_via_printer!(
    Name,
    NamedType,
    Variable,
    EnumValue,
    FloatValue,
    IntValue,
    StringValue,
    Value,
    ObjectField,
    ObjectValue,
    ListValue,
    Argument,
    Directive,
    SelectionSet,
    Field,
    FragmentSpread,
    InlineFragment,
    Selection,
    Type,
    VariableDefinition,
    FragmentDefinition,
    OperationDefinition,
    Definition,
    Document,
    Node,
);

impl fmt::Display for BooleanValue {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to_buffer(0, f)
    }
}

impl<'a> PrintNode for Name<'a> {
    #[inline]
    fn write_with_options(
        &self,
        _: &PrintOptions,
        _: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        buffer.write_str(self.value)
    }
}

impl<'a> PrintNode for NamedType<'a> {
    #[inline]
    fn write_with_options(
        &self,
        _: &PrintOptions,
        _: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        buffer.write_str(self.name.value)
    }
}

impl<'a> PrintNode for Variable<'a> {
    #[inline]
    fn write_with_options(
        &self,
        _: &PrintOptions,
        _: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        write!(buffer, "${}", self.name.value)
    }
}

impl PrintNode for BooleanValue {
    #[inline]
    fn write_with_options(
        &self,
        _: &PrintOptions,
        _: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        match self.value {
            true => buffer.write_str("true"),
            false => buffer.write_str("false"),
        }
    }
}

impl<'a> PrintNode for EnumValue<'a> {
    #[inline]
    fn write_with_options(
        &self,
        _: &PrintOptions,
        _: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        buffer.write_str(self.value)
    }
}

impl<'a> PrintNode for FloatValue<'a> {
    #[inline]
    fn write_with_options(
        &self,
        _: &PrintOptions,
        _: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        buffer.write_str(self.value)
    }
}

impl<'a> PrintNode for IntValue<'a> {
    #[inline]
    fn write_with_options(
        &self,
        _: &PrintOptions,
        _: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        buffer.write_str(self.value)
    }
}

/// Writes a string's value as a quoted, single-line string with all control characters escaped.
fn write_escaped(value: &str, buffer: &mut dyn Write) -> fmt::Result {
    use lexical_core::{FormattedSize, NumberFormatBuilder, WriteIntegerOptions};
    const FORMAT: u128 = NumberFormatBuilder::hexadecimal();
    const OPTIONS: WriteIntegerOptions = WriteIntegerOptions::new();
    let mut buf = [b'0'; u32::FORMATTED_SIZE];

    // See: https://github.com/graphql-rust/graphql-parser/blob/ff34bae/src/format.rs#L127-L167
    buffer.write_char('"')?;
    for c in value.chars() {
        match c {
            '\r' => buffer.write_str(r"\r")?,
            '\n' => buffer.write_str(r"\n")?,
            '\t' => buffer.write_str(r"\t")?,
            '\u{0008}' => buffer.write_str(r"\b")?,
            '\u{000C}' => buffer.write_str(r"\f")?,
            '"' => buffer.write_str("\\\"")?,
            '\\' => buffer.write_str(r"\\")?,
            '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}' => {
                let hex =
                    lexical_core::write_with_options::<_, FORMAT>(c as u32, &mut buf, &OPTIONS);
                let hex = std::str::from_utf8(hex).map_err(|_| fmt::Error)?;
                write!(buffer, "\\u{:0>4}", hex)?;
            }
            _ => buffer.write_char(c)?,
        };
    }
    buffer.write_char('"')
}

impl<'a> PrintNode for StringValue<'a> {
    #[inline]
    fn write_with_options(
        &self,
        _: &PrintOptions,
        _: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        // a block string can't end on a quote or backslash without changing its meaning
        if self.block && !self.value.ends_with(['"', '\\']) {
            buffer.write_str(r#"""""#)?;
            buffer.write_str(&self.value.replace(r#"""""#, r#"\""""#))?;
            buffer.write_str(r#"""""#)
        } else {
            write_escaped(self.value, buffer)
        }
    }
}

impl<'a> PrintNode for Value<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        match self {
            Value::Boolean(value) => value.write_with_options(options, level, buffer),
            Value::Enum(value) => value.write_with_options(options, level, buffer),
            Value::Float(value) => value.write_with_options(options, level, buffer),
            Value::Int(value) => value.write_with_options(options, level, buffer),
            Value::String(value) => value.write_with_options(options, level, buffer),
            Value::Variable(value) => value.write_with_options(options, level, buffer),
            Value::Object(value) => value.write_with_options(options, level, buffer),
            Value::List(value) => value.write_with_options(options, level, buffer),
            Value::Null => buffer.write_str("null"),
        }
    }
}

/// Writes a list of nodes separated by commas.
#[inline]
fn write_joined<T: PrintNode>(
    items: &[T],
    options: &PrintOptions,
    level: usize,
    buffer: &mut dyn Write,
) -> fmt::Result {
    let mut first = true;
    for item in items.iter() {
        if first {
            first = false;
        } else {
            buffer.write_str(", ")?;
        }
        item.write_with_options(options, level, buffer)?;
    }
    Ok(())
}

impl<T: PrintNode> PrintNode for &T {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        (**self).write_with_options(options, level, buffer)
    }
}

impl<'a> PrintNode for ObjectField<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        write!(buffer, "{}: ", self.name.value)?;
        self.value.write_with_options(options, level, buffer)
    }
}

impl<'a> PrintNode for ObjectValue<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        buffer.write_str("{")?;
        write_joined(&self.fields, options, level, buffer)?;
        buffer.write_str("}")
    }
}

impl<'a> PrintNode for ListValue<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        buffer.write_str("[")?;
        write_joined(&self.values, options, level, buffer)?;
        buffer.write_str("]")
    }
}

impl<'a> PrintNode for Argument<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        write!(buffer, "{}: ", self.name.value)?;
        self.value.write_with_options(options, level, buffer)
    }
}

#[inline]
fn write_arguments(
    arguments: &[Argument],
    options: &PrintOptions,
    level: usize,
    buffer: &mut dyn Write,
) -> fmt::Result {
    if !arguments.is_empty() {
        buffer.write_str("(")?;
        write_joined(arguments, options, level, buffer)?;
        buffer.write_str(")")
    } else {
        Ok(())
    }
}

#[inline]
fn write_directives(
    directives: &[&Directive],
    options: &PrintOptions,
    level: usize,
    buffer: &mut dyn Write,
) -> fmt::Result {
    for directive in directives.iter() {
        buffer.write_str(" ")?;
        directive.write_with_options(options, level, buffer)?;
    }
    Ok(())
}

impl<'a> PrintNode for Directive<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        write!(buffer, "@{}", self.name.value)?;
        write_arguments(&self.arguments, options, level, buffer)
    }
}

impl<'a> PrintNode for SelectionSet<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        if !self.selections.is_empty() {
            let level = level + 1;
            buffer.write_str("{")?;
            for selection in self.selections.iter() {
                buffer.write_char('\n')?;
                write_indent(level, buffer)?;
                selection.write_with_options(options, level, buffer)?;
            }
            buffer.write_char('\n')?;
            write_indent(level - 1, buffer)?;
            buffer.write_char('}')
        } else {
            Ok(())
        }
    }
}

impl<'a> PrintNode for Field<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        let mut head = String::new();
        if let Some(alias) = self.alias {
            write!(head, "{}: {}", alias.value, self.name.value)?;
        } else {
            head.push_str(self.name.value);
        };
        let prefix_len = head.len();
        write_arguments(&self.arguments, options, level, &mut head)?;
        match options.max_line_width {
            Some(width) if head.len() > width && !self.arguments.is_empty() => {
                buffer.write_str(&head[..prefix_len])?;
                buffer.write_str("(")?;
                for argument in self.arguments.iter() {
                    buffer.write_char('\n')?;
                    write_indent(level + 1, buffer)?;
                    argument.write_with_options(options, level + 1, buffer)?;
                }
                buffer.write_char('\n')?;
                write_indent(level, buffer)?;
                buffer.write_str(")")?;
            }
            _ => buffer.write_str(&head)?,
        }
        write_directives(&self.directives, options, level, buffer)?;
        if let Some(selection_set) = self.selection_set {
            if !selection_set.selections.is_empty() {
                buffer.write_str(" ")?;
                selection_set.write_with_options(options, level, buffer)?;
            }
        }
        Ok(())
    }
}

impl<'a> PrintNode for FragmentSpread<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        write!(buffer, "...{}", self.name.value)?;
        write_directives(&self.directives, options, level, buffer)
    }
}

impl<'a> PrintNode for InlineFragment<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        buffer.write_str("...")?;
        if let Some(type_condition) = &self.type_condition {
            buffer.write_str(" on ")?;
            type_condition.write_with_options(options, level, buffer)?;
        };
        write_directives(&self.directives, options, level, buffer)?;
        buffer.write_str(" ")?;
        self.selection_set.write_with_options(options, level, buffer)
    }
}

impl<'a> PrintNode for Selection<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        match self {
            Selection::Field(field) => field.write_with_options(options, level, buffer),
            Selection::FragmentSpread(spread) => spread.write_with_options(options, level, buffer),
            Selection::InlineFragment(fragment) => {
                fragment.write_with_options(options, level, buffer)
            }
        }
    }
}

impl<'a> PrintNode for Type<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        match self {
            Type::NamedType(name) => name.write_with_options(options, level, buffer),
            Type::ListType(inner) => {
                buffer.write_str("[")?;
                inner.write_with_options(options, level, buffer)?;
                buffer.write_str("]")
            }
            Type::NonNullType(inner) => {
                inner.write_with_options(options, level, buffer)?;
                buffer.write_str("!")
            }
        }
    }
}

impl<'a> PrintNode for VariableDefinition<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        self.variable.write_with_options(options, level, buffer)?;
        buffer.write_str(": ")?;
        self.of_type.write_with_options(options, level, buffer)?;
        if let Some(default_value) = &self.default_value {
            buffer.write_str(" = ")?;
            default_value.write_with_options(options, level, buffer)?;
        }
        write_directives(&self.directives, options, level, buffer)
    }
}

impl<'a> PrintNode for FragmentDefinition<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        write!(buffer, "fragment {} on ", self.name.value)?;
        self.type_condition.write_with_options(options, level, buffer)?;
        write_directives(&self.directives, options, level, buffer)?;
        buffer.write_str(" ")?;
        self.selection_set.write_with_options(options, level, buffer)
    }
}

impl<'a> PrintNode for OperationDefinition<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        if self.is_shorthand() {
            self.selection_set.write_with_options(options, level, buffer)
        } else {
            buffer.write_str(self.operation.as_str())?;
            if let Some(name) = &self.name {
                buffer.write_str(" ")?;
                name.write_with_options(options, level, buffer)?;
            };
            if !self.variable_definitions.is_empty() {
                if self.name.is_none() {
                    buffer.write_str(" ")?;
                }
                buffer.write_str("(")?;
                write_joined(&self.variable_definitions, options, level, buffer)?;
                buffer.write_str(")")?;
            }
            write_directives(&self.directives, options, level, buffer)?;
            buffer.write_str(" ")?;
            self.selection_set.write_with_options(options, level, buffer)
        }
    }
}

impl<'a> PrintNode for Definition<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        match self {
            Definition::Operation(operation) => {
                operation.write_with_options(options, level, buffer)
            }
            Definition::Fragment(fragment) => fragment.write_with_options(options, level, buffer),
        }
    }
}

impl<'a> PrintNode for Document<'a> {
    /// Definitions are separated by a blank line and the document always ends on a newline.
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        let mut first = true;
        for definition in self.definitions.iter() {
            if first {
                first = false;
            } else {
                buffer.write_str("\n\n")?;
            }
            definition.write_with_options(options, level, buffer)?;
        }
        buffer.write_char('\n')
    }
}

impl<'a> PrintNode for Node<'a> {
    #[inline]
    fn write_with_options(
        &self,
        options: &PrintOptions,
        level: usize,
        buffer: &mut dyn Write,
    ) -> fmt::Result {
        match self {
            Node::Document(node) => node.write_with_options(options, level, buffer),
            Node::OperationDefinition(node) => node.write_with_options(options, level, buffer),
            Node::FragmentDefinition(node) => node.write_with_options(options, level, buffer),
            Node::VariableDefinition(node) => node.write_with_options(options, level, buffer),
            Node::SelectionSet(node) => node.write_with_options(options, level, buffer),
            Node::Field(node) => node.write_with_options(options, level, buffer),
            Node::FragmentSpread(node) => node.write_with_options(options, level, buffer),
            Node::InlineFragment(node) => node.write_with_options(options, level, buffer),
            Node::Argument(node) => node.write_with_options(options, level, buffer),
            Node::Directive(node) => node.write_with_options(options, level, buffer),
            Node::Variable(node) => node.write_with_options(options, level, buffer),
            Node::Name(node) => node.write_with_options(options, level, buffer),
            Node::NamedType(node) => node.write_with_options(options, level, buffer),
            Node::Type(node) => node.write_with_options(options, level, buffer),
            Node::Value(node) => node.write_with_options(options, level, buffer),
            Node::ObjectField(node) => node.write_with_options(options, level, buffer),
        }
    }
}

#[inline(always)]
fn write_indent(level: usize, buffer: &mut dyn Write) -> fmt::Result {
    for _ in 0..level {
        buffer.write_str("  ")?
    }
    Ok(())
}
