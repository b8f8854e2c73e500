use super::ast::*;
use super::ast_kind::ASTKind;
use super::grammar::{Cursor, GrammarResult};
use super::lexer::Lexeme;
use crate::error::{get_location, print_span, span_at, Error, ErrorType, Result};
use bumpalo::collections::{String, Vec};
use private::ParseNode as _;

type ParseResult<T> = GrammarResult<T>;

pub(crate) mod private {
    use super::{ASTKind, Cursor, ParseResult};

    /// (Private) Trait for parsing AST Nodes from a grammar [Cursor].
    /// The [`super::ParseNode`] trait implements the public `parse` method instead.
    ///
    /// Implementors consume any ignored input that trails them, but never ignored input that
    /// leads them.
    pub trait ParseNode<'a>: Sized {
        /// The kind of node that's reported when no more specific node failed to match.
        const KIND: ASTKind;

        fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Self>;
    }
}

/// Trait for parsing AST Nodes from source texts using a backtracking grammar.
///
/// This trait is implemented by all AST Nodes and can hence be used to granularly parse GraphQL language.
/// However, mostly this will be used via `Document::parse` or [`parse_document`].
pub trait ParseNode<'a>: private::ParseNode<'a> {
    /// Parse an input source text into the implementor's AST Node structure and allocate the
    /// resulting AST into the current AST Context's arena.
    ///
    /// The entire source text must match the node, apart from leading and trailing ignored
    /// input, like whitespace, commas, and comments.
    fn parse<T: ToString>(ctx: &'a ASTContext, source: T) -> Result<&'a Self> {
        let source = ctx.alloc_string(source.to_string());
        let mut cursor = Cursor::new(ctx, source);
        cursor.ignored();
        let result = cursor.attempt(|cursor| {
            let node = Self::new_with_ctx(cursor)?;
            cursor.end(Self::KIND)?;
            Ok(node)
        });
        match result {
            Ok(node) => Ok(ctx.alloc(node)),
            Err(_) => Err(syntax_error(&cursor, Self::KIND)),
        }
    }
}

impl<'a, T: private::ParseNode<'a>> ParseNode<'a> for T {}

/// Converts the furthest failure of a cursor into a syntax [Error] pointing at its location.
fn syntax_error(cursor: &Cursor, fallback: ASTKind) -> Error {
    let (offset, expected) = cursor.failure();
    let kind = expected.unwrap_or(fallback);
    let source = cursor.source();
    let location = get_location(source, offset);
    log::debug!(
        "failed to parse {} at {}:{}, expected {}",
        fallback,
        location.line,
        location.column,
        kind
    );
    Error::new_with_context(
        format!("Invalid {}", kind),
        Some(location),
        print_span(source, span_at(source, offset)),
        Some(ErrorType::Syntax),
    )
}

/// Parses a GraphQL query language document.
///
/// A document either consists of a single bare selection set, as a query shorthand, or of one or
/// more operation and fragment definitions.
pub fn parse_document<'a>(ctx: &'a ASTContext, source: &str) -> Result<&'a Document<'a>> {
    Document::parse(ctx, source)
}

/// Parses a single value literal, which may contain variables.
pub fn parse_value<'a>(ctx: &'a ASTContext, source: &str) -> Result<&'a Value<'a>> {
    Value::parse(ctx, source)
}

/// Parses a type reference, as it's used in variable definitions.
pub fn parse_type<'a>(ctx: &'a ASTContext, source: &str) -> Result<&'a Type<'a>> {
    Type::parse(ctx, source)
}

impl<'a> private::ParseNode<'a> for Name<'a> {
    const KIND: ASTKind = ASTKind::Name;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Name<'a>> {
        let value = ctx.lexeme(Lexeme::Name, ASTKind::Name)?;
        ctx.ignored();
        Ok(Name { value })
    }
}

impl<'a> private::ParseNode<'a> for BooleanValue {
    const KIND: ASTKind = ASTKind::BooleanValue;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<BooleanValue> {
        if ctx.keyword("true", ASTKind::BooleanValue).is_ok() {
            Ok(BooleanValue { value: true })
        } else {
            ctx.keyword("false", ASTKind::BooleanValue)?;
            Ok(BooleanValue { value: false })
        }
    }
}

impl<'a> private::ParseNode<'a> for EnumValue<'a> {
    const KIND: ASTKind = ASTKind::EnumValue;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<EnumValue<'a>> {
        ctx.not(ASTKind::EnumValue, |ctx| {
            let value = ctx.lexeme(Lexeme::Name, ASTKind::EnumValue)?;
            match value {
                "true" | "false" | "null" => Ok(()),
                _ => Err(ASTKind::EnumValue),
            }
        })?;
        let value = ctx.lexeme(Lexeme::Name, ASTKind::EnumValue)?;
        ctx.ignored();
        Ok(EnumValue { value })
    }
}

/// Parses a number, which is a float when it has a fractional part or an exponent and is an
/// integer otherwise. Its text is kept as is.
#[inline]
fn number<'a>(ctx: &mut Cursor<'a>) -> ParseResult<Value<'a>> {
    let value = ctx.lexeme(Lexeme::Number, ASTKind::IntValue)?;
    ctx.ignored();
    if value.contains(['.', 'e', 'E']) {
        Ok(Value::Float(FloatValue { value }))
    } else {
        Ok(Value::Int(IntValue { value }))
    }
}

impl<'a> private::ParseNode<'a> for FloatValue<'a> {
    const KIND: ASTKind = ASTKind::FloatValue;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<FloatValue<'a>> {
        ctx.attempt(|ctx| match number(ctx)? {
            Value::Float(float) => Ok(float),
            _ => Err(ASTKind::FloatValue),
        })
    }
}

impl<'a> private::ParseNode<'a> for IntValue<'a> {
    const KIND: ASTKind = ASTKind::IntValue;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<IntValue<'a>> {
        ctx.attempt(|ctx| match number(ctx)? {
            Value::Int(int) => Ok(int),
            _ => Err(ASTKind::IntValue),
        })
    }
}

/// Decodes the escape sequences of a single-line string's contents.
///
/// Decoding is lenient: an unknown escape sequence, or a `\u` escape that isn't followed by four
/// hex digits of a valid character, is kept verbatim. The contents are only copied when they
/// contain a backslash.
fn unescape<'a>(arena: &'a bumpalo::Bump, raw: &'a str) -> &'a str {
    if !raw.contains('\\') {
        return raw;
    }

    fn hex_at(raw: &str, index: usize) -> Option<u32> {
        let hex = raw.get(index..index + 4)?;
        if hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            u32::from_str_radix(hex, 16).ok()
        } else {
            None
        }
    }

    let mut out = String::with_capacity_in(raw.len(), arena);
    let mut index = 0;
    while let Some(offset) = raw[index..].find('\\') {
        out.push_str(&raw[index..index + offset]);
        index += offset;
        let escape = raw[index + 1..].chars().next();
        let (decoded, len) = match escape {
            Some('"') => (Some('"'), 2),
            Some('\\') => (Some('\\'), 2),
            Some('/') => (Some('/'), 2),
            Some('b') => (Some('\u{0008}'), 2),
            Some('f') => (Some('\u{000C}'), 2),
            Some('n') => (Some('\n'), 2),
            Some('r') => (Some('\r'), 2),
            Some('t') => (Some('\t'), 2),
            Some('u') => match hex_at(raw, index + 2) {
                // a surrogate pair is written as two consecutive escapes
                Some(high @ 0xD800..=0xDBFF) => match raw
                    .get(index + 6..index + 8)
                    .filter(|lead| *lead == "\\u")
                    .and_then(|_| hex_at(raw, index + 8))
                {
                    Some(low @ 0xDC00..=0xDFFF) => (
                        char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)),
                        12,
                    ),
                    _ => (None, 0),
                },
                Some(code) => (char::from_u32(code), 6),
                None => (None, 0),
            },
            _ => (None, 0),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                index += len;
            }
            None => {
                out.push('\\');
                index += 1;
            }
        }
    }
    out.push_str(&raw[index..]);
    out.into_bump_str()
}

impl<'a> private::ParseNode<'a> for StringValue<'a> {
    const KIND: ASTKind = ASTKind::StringValue;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<StringValue<'a>> {
        if let Ok(raw) = ctx.lexeme(Lexeme::BlockString, ASTKind::StringValue) {
            ctx.ignored();
            let inner = &raw[3..raw.len() - 3];
            let value = if inner.contains(r#"\""""#) {
                &*ctx.arena().alloc_str(&inner.replace(r#"\""""#, r#"""""#))
            } else {
                inner
            };
            Ok(StringValue { value, block: true })
        } else {
            let raw = ctx.lexeme(Lexeme::String, ASTKind::StringValue)?;
            ctx.ignored();
            let value = unescape(ctx.arena(), &raw[1..raw.len() - 1]);
            Ok(StringValue {
                value,
                block: false,
            })
        }
    }
}

impl<'a> private::ParseNode<'a> for Variable<'a> {
    const KIND: ASTKind = ASTKind::Variable;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Variable<'a>> {
        ctx.literal("$", ASTKind::Variable)?;
        let name = Name::new_with_ctx(ctx)?;
        Ok(Variable { name })
    }
}

impl<'a> private::ParseNode<'a> for Value<'a> {
    const KIND: ASTKind = ASTKind::Value;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Value<'a>> {
        if ctx.keyword("null", ASTKind::NullValue).is_ok() {
            return Ok(Value::Null);
        }
        if let Ok(boolean) = BooleanValue::new_with_ctx(ctx) {
            return Ok(Value::Boolean(boolean));
        }
        if let Ok(variable) = ctx.attempt(Variable::new_with_ctx) {
            return Ok(Value::Variable(variable));
        }
        if let Ok(string) = StringValue::new_with_ctx(ctx) {
            return Ok(Value::String(string));
        }
        if let Ok(number) = number(ctx) {
            return Ok(number);
        }
        if let Ok(value) = EnumValue::new_with_ctx(ctx) {
            return Ok(Value::Enum(value));
        }
        if let Ok(list) = ctx.attempt(ListValue::new_with_ctx) {
            return Ok(Value::List(ctx.alloc(list)));
        }
        match ctx.attempt(ObjectValue::new_with_ctx) {
            Ok(object) => Ok(Value::Object(ctx.alloc(object))),
            Err(_) => Err(ASTKind::Value),
        }
    }
}

impl<'a> private::ParseNode<'a> for ListValue<'a> {
    const KIND: ASTKind = ASTKind::ListValue;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<ListValue<'a>> {
        ctx.token("[", ASTKind::ListValue)?;
        let values = ctx.many(Value::new_with_ctx);
        ctx.token("]", ASTKind::ListValue)?;
        Ok(ListValue { values })
    }
}

impl<'a> private::ParseNode<'a> for ObjectField<'a> {
    const KIND: ASTKind = ASTKind::ObjectField;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<ObjectField<'a>> {
        let name = Name::new_with_ctx(ctx)?;
        ctx.token(":", ASTKind::ObjectField)?;
        let value = Value::new_with_ctx(ctx)?;
        Ok(ObjectField { name, value })
    }
}

impl<'a> private::ParseNode<'a> for ObjectValue<'a> {
    const KIND: ASTKind = ASTKind::ObjectValue;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<ObjectValue<'a>> {
        ctx.token("{", ASTKind::ObjectValue)?;
        let fields = ctx.many(ObjectField::new_with_ctx);
        ctx.token("}", ASTKind::ObjectValue)?;
        Ok(ObjectValue { fields })
    }
}

impl<'a> private::ParseNode<'a> for Argument<'a> {
    const KIND: ASTKind = ASTKind::Argument;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Argument<'a>> {
        let name = Name::new_with_ctx(ctx)?;
        ctx.token(":", ASTKind::Argument)?;
        let value = Value::new_with_ctx(ctx)?;
        Ok(Argument { name, value })
    }
}

/// Parses an optional, parenthesized list of one or more arguments. Empty parentheses never
/// match.
#[inline]
fn arguments<'a>(ctx: &mut Cursor<'a>) -> Vec<'a, Argument<'a>> {
    ctx.optional(|ctx| {
        ctx.token("(", ASTKind::Arguments)?;
        let arguments = ctx.many1(Argument::new_with_ctx)?;
        ctx.token(")", ASTKind::Arguments)?;
        Ok(arguments)
    })
    .unwrap_or_else(|| Vec::new_in(ctx.arena()))
}

impl<'a> private::ParseNode<'a> for Directive<'a> {
    const KIND: ASTKind = ASTKind::Directive;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Directive<'a>> {
        ctx.literal("@", ASTKind::Directive)?;
        let name = Name::new_with_ctx(ctx)?;
        let arguments = arguments(ctx);
        Ok(Directive { name, arguments })
    }
}

#[inline]
fn directives<'a>(ctx: &mut Cursor<'a>) -> Vec<'a, &'a Directive<'a>> {
    ctx.many(|ctx| Directive::new_with_ctx(ctx).map(|directive| ctx.alloc(directive)))
}

impl<'a> private::ParseNode<'a> for NamedType<'a> {
    const KIND: ASTKind = ASTKind::NamedType;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<NamedType<'a>> {
        let name = Name::new_with_ctx(ctx)?;
        Ok(NamedType { name })
    }
}

impl<'a> private::ParseNode<'a> for Type<'a> {
    const KIND: ASTKind = ASTKind::Type;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Type<'a>> {
        let of_type = if ctx.token("[", ASTKind::ListType).is_ok() {
            let inner = Type::new_with_ctx(ctx)?;
            ctx.token("]", ASTKind::ListType)?;
            Type::ListType(ctx.alloc(inner))
        } else {
            Type::NamedType(NamedType::new_with_ctx(ctx)?)
        };
        if ctx.token("!", ASTKind::NonNullType).is_ok() {
            Ok(Type::NonNullType(ctx.alloc(of_type)))
        } else {
            Ok(of_type)
        }
    }
}

impl<'a> private::ParseNode<'a> for Field<'a> {
    const KIND: ASTKind = ASTKind::Field;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Field<'a>> {
        let first = Name::new_with_ctx(ctx)?;
        let aliased = ctx.optional(|ctx| {
            ctx.token(":", ASTKind::Field)?;
            Name::new_with_ctx(ctx)
        });
        let (alias, name) = match aliased {
            Some(name) => (Some(first), name),
            None => (None, first),
        };
        let arguments = arguments(ctx);
        let directives = directives(ctx);
        let selection_set = ctx
            .optional(SelectionSet::new_with_ctx)
            .map(|selection_set| ctx.alloc(selection_set));
        Ok(Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        })
    }
}

impl<'a> private::ParseNode<'a> for FragmentSpread<'a> {
    const KIND: ASTKind = ASTKind::FragmentSpread;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<FragmentSpread<'a>> {
        ctx.token("...", ASTKind::FragmentSpread)?;
        ctx.not(ASTKind::FragmentSpread, |ctx| {
            ctx.keyword("on", ASTKind::FragmentSpread)
        })?;
        let name = Name::new_with_ctx(ctx)?;
        let directives = directives(ctx);
        Ok(FragmentSpread { name, directives })
    }
}

impl<'a> private::ParseNode<'a> for InlineFragment<'a> {
    const KIND: ASTKind = ASTKind::InlineFragment;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<InlineFragment<'a>> {
        ctx.token("...", ASTKind::InlineFragment)?;
        let type_condition = ctx.optional(|ctx| {
            ctx.keyword("on", ASTKind::InlineFragment)?;
            NamedType::new_with_ctx(ctx)
        });
        let directives = directives(ctx);
        let selection_set = SelectionSet::new_with_ctx(ctx)?;
        Ok(InlineFragment {
            type_condition,
            directives,
            selection_set: ctx.alloc(selection_set),
        })
    }
}

impl<'a> private::ParseNode<'a> for Selection<'a> {
    const KIND: ASTKind = ASTKind::Selection;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Selection<'a>> {
        if let Ok(spread) = ctx.attempt(FragmentSpread::new_with_ctx) {
            return Ok(Selection::FragmentSpread(ctx.alloc(spread)));
        }
        if let Ok(fragment) = ctx.attempt(InlineFragment::new_with_ctx) {
            return Ok(Selection::InlineFragment(ctx.alloc(fragment)));
        }
        match ctx.attempt(Field::new_with_ctx) {
            Ok(field) => Ok(Selection::Field(ctx.alloc(field))),
            Err(_) => Err(ASTKind::Selection),
        }
    }
}

impl<'a> private::ParseNode<'a> for SelectionSet<'a> {
    const KIND: ASTKind = ASTKind::SelectionSet;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<SelectionSet<'a>> {
        ctx.token("{", ASTKind::SelectionSet)?;
        let selections = ctx.many1(Selection::new_with_ctx)?;
        ctx.token("}", ASTKind::SelectionSet)?;
        Ok(SelectionSet { selections })
    }
}

impl<'a> private::ParseNode<'a> for VariableDefinition<'a> {
    const KIND: ASTKind = ASTKind::VariableDefinition;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<VariableDefinition<'a>> {
        let variable = Variable::new_with_ctx(ctx)?;
        ctx.token(":", ASTKind::VariableDefinition)?;
        let of_type = Type::new_with_ctx(ctx)?;
        let default_value = ctx.optional(|ctx| {
            ctx.token("=", ASTKind::VariableDefinition)?;
            Value::new_with_ctx(ctx)
        });
        let directives = directives(ctx);
        Ok(VariableDefinition {
            variable,
            of_type,
            default_value,
            directives,
        })
    }
}

impl<'a> private::ParseNode<'a> for FragmentDefinition<'a> {
    const KIND: ASTKind = ASTKind::FragmentDefinition;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<FragmentDefinition<'a>> {
        ctx.keyword("fragment", ASTKind::FragmentDefinition)?;
        ctx.not(ASTKind::FragmentDefinition, |ctx| {
            ctx.keyword("on", ASTKind::FragmentDefinition)
        })?;
        let name = Name::new_with_ctx(ctx)?;
        ctx.keyword("on", ASTKind::FragmentDefinition)?;
        let type_condition = NamedType::new_with_ctx(ctx)?;
        let directives = directives(ctx);
        let selection_set = SelectionSet::new_with_ctx(ctx)?;
        Ok(FragmentDefinition {
            name,
            type_condition,
            directives,
            selection_set: ctx.alloc(selection_set),
        })
    }
}

impl<'a> private::ParseNode<'a> for OperationKind {
    const KIND: ASTKind = ASTKind::OperationKind;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<OperationKind> {
        if ctx.keyword("query", ASTKind::OperationKind).is_ok() {
            Ok(OperationKind::Query)
        } else if ctx.keyword("mutation", ASTKind::OperationKind).is_ok() {
            Ok(OperationKind::Mutation)
        } else {
            ctx.keyword("subscription", ASTKind::OperationKind)?;
            Ok(OperationKind::Subscription)
        }
    }
}

impl<'a> private::ParseNode<'a> for OperationDefinition<'a> {
    const KIND: ASTKind = ASTKind::OperationDefinition;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<OperationDefinition<'a>> {
        let operation = OperationKind::new_with_ctx(ctx)?;
        let name = ctx.optional(Name::new_with_ctx);
        let variable_definitions = ctx
            .optional(|ctx| {
                ctx.token("(", ASTKind::VariableDefinitions)?;
                let definitions = ctx.many1(|ctx| {
                    VariableDefinition::new_with_ctx(ctx).map(|definition| ctx.alloc(definition))
                })?;
                ctx.token(")", ASTKind::VariableDefinitions)?;
                Ok(definitions)
            })
            .unwrap_or_else(|| Vec::new_in(ctx.arena()));
        let directives = directives(ctx);
        let selection_set = SelectionSet::new_with_ctx(ctx)?;
        Ok(OperationDefinition {
            operation,
            name,
            variable_definitions,
            directives,
            selection_set: ctx.alloc(selection_set),
        })
    }
}

impl<'a> private::ParseNode<'a> for Definition<'a> {
    const KIND: ASTKind = ASTKind::Definition;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Definition<'a>> {
        if let Ok(operation) = ctx.attempt(OperationDefinition::new_with_ctx) {
            return Ok(Definition::Operation(ctx.alloc(operation)));
        }
        match ctx.attempt(FragmentDefinition::new_with_ctx) {
            Ok(fragment) => Ok(Definition::Fragment(ctx.alloc(fragment))),
            Err(_) => Err(ASTKind::Definition),
        }
    }
}

/// Parses a bare selection set as an anonymous query operation.
#[inline]
fn query_shorthand<'a>(ctx: &mut Cursor<'a>) -> ParseResult<OperationDefinition<'a>> {
    let selection_set = SelectionSet::new_with_ctx(ctx)?;
    Ok(OperationDefinition {
        operation: OperationKind::Query,
        name: None,
        variable_definitions: Vec::new_in(ctx.arena()),
        directives: Vec::new_in(ctx.arena()),
        selection_set: ctx.alloc(selection_set),
    })
}

impl<'a> private::ParseNode<'a> for Document<'a> {
    const KIND: ASTKind = ASTKind::Document;

    #[inline]
    fn new_with_ctx(ctx: &mut Cursor<'a>) -> ParseResult<Document<'a>> {
        let definitions = match ctx.attempt(query_shorthand) {
            Ok(operation) => {
                let mut definitions = Vec::with_capacity_in(1, ctx.arena());
                definitions.push(Definition::Operation(ctx.alloc(operation)));
                definitions
            }
            // a document without any definition is reported as a whole
            Err(_) => ctx
                .many1(Definition::new_with_ctx)
                .map_err(|_| ASTKind::Document)?,
        };
        Ok(Document { definitions })
    }
}
