use crate::error::{Error, ErrorType, Result};
use bumpalo::collections::Vec;
use hashbrown::{hash_map::DefaultHashBuilder, HashMap};

/// A context for a GraphQL document which holds an arena allocator.
///
/// For the duration of parsing, storing, traversing, and printing an AST its performant and
/// convenient to allocate memory in one chunk for the AST's operations. This context represents
/// the lifetime of an AST and its derivatives.
///
/// An AST Context in other words represents the memory a query and the operations you perform on
/// it take up. This is efficient since once you're done with the query this entire allocated
/// memory can be dropped all at once. Hence however, it's inadvisable to reuse the AST Context
/// across multiple incoming GraphQL requests.
pub struct ASTContext {
    /// An arena allocator that holds the memory allocated for the AST Context's lifetime
    pub arena: bumpalo::Bump,
}

impl ASTContext {
    /// Create a new AST context with a preallocated arena.
    pub fn new() -> Self {
        let arena = bumpalo::Bump::new();
        ASTContext { arena }
    }

    /// Put the value of `item` onto the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, item: T) -> &T {
        self.arena.alloc(item)
    }

    /// Allocate an `&str` slice onto the arena and return a reference to it.
    ///
    /// This is useful when the original slice has an undefined lifetime.
    /// This is typically unnecessary for static slices (`&'static str`) whose lifetimes are as
    /// long as the running program and don't need to be allocated dynamically.
    #[inline]
    pub fn alloc_str(&self, str: &str) -> &str {
        self.arena.alloc_str(str)
    }

    /// Puts a `String` onto the arena and returns a reference to it to tie the `String`'s lifetime
    /// to this AST context without reallocating or copying it.
    #[inline]
    pub fn alloc_string(&self, str: String) -> &str {
        self.arena.alloc(str)
    }
}

impl Default for ASTContext {
    fn default() -> Self {
        Self::new()
    }
}

/// AST Node of a name, which identifies fields, arguments, types, variables, and directives.
///
/// A valid name matches `[_A-Za-z][_0-9A-Za-z]*`.
/// [Reference](https://spec.graphql.org/October2021/#Name)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Name<'a> {
    pub value: &'a str,
}

impl<'a> Name<'a> {
    #[inline]
    pub fn new(value: &'a str) -> Self {
        Name { value }
    }
}

/// AST Node of a boolean value
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Boolean-Value)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct BooleanValue {
    pub value: bool,
}

/// AST Node of a variable identifier value.
///
/// These are identifiers prefixed with a `$` sign, typically in variable definitions.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Variables)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Variable<'a> {
    pub name: Name<'a>,
}

/// AST Node of an enum value.
///
/// These are typically written in all caps and snake case, e.g. "`MOBILE_WEB`".
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Enum-Value)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct EnumValue<'a> {
    pub value: &'a str,
}

/// AST Node of an integer value.
///
/// The value is kept as it was written in the source text, including any leading zeros.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Int)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct IntValue<'a> {
    pub value: &'a str,
}

/// AST Node of a floating point value.
///
/// The value is kept as it was written in the source text and is never normalized.
/// [Reference](https://spec.graphql.org/October2021/#sec-Float)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct FloatValue<'a> {
    pub value: &'a str,
}

/// AST Node of a string value.
///
/// GraphQL has a number of escaped characters that are normalised away when parsing and
/// hence this `value` is expected to not contain escaped characters.
/// Block strings are kept verbatim and remember that they were written as a block string, so that
/// they're printed as one again.
/// [Reference](https://spec.graphql.org/October2021/#sec-String)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct StringValue<'a> {
    pub value: &'a str,
    pub block: bool,
}

impl<'a> StringValue<'a> {
    pub fn new<S: AsRef<str>>(ctx: &'a ASTContext, str: S) -> Self {
        StringValue {
            value: ctx.alloc_str(str.as_ref()),
            block: false,
        }
    }

    pub fn new_block<S: AsRef<str>>(ctx: &'a ASTContext, str: S) -> Self {
        StringValue {
            value: ctx.alloc_str(str.as_ref()),
            block: true,
        }
    }
}

/// AST Node of possible input values in GraphQL.
///
/// Fields and Directives accept input values as arguments.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Values)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Value<'a> {
    Variable(Variable<'a>),
    String(StringValue<'a>),
    Float(FloatValue<'a>),
    Int(IntValue<'a>),
    Boolean(BooleanValue),
    Enum(EnumValue<'a>),
    List(&'a ListValue<'a>),
    Object(&'a ObjectValue<'a>),
    /// Representing JSON-like `null` values or the absence of a value
    Null,
}

/// AST Node for a List of values.
///
/// Lists in GraphQL are ordered sequences and serialize to JSON arrays. Its
/// contents may be any arbitrary value literal or variable.
/// [Reference](https://spec.graphql.org/October2021/#sec-List-Value)
#[derive(Debug, PartialEq, Clone)]
pub struct ListValue<'a> {
    pub values: Vec<'a, Value<'a>>,
}

impl<'a> ListValue<'a> {
    /// Checks whether this List contains any values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// AST Node for a field of an Object value.
///
/// Objects in GraphQL are unordered lists of keyed input values and serialize to JSON objects.
/// An Object literal's contents may be any arbitrary value literal or variable.
/// [Reference](https://spec.graphql.org/October2021/#ObjectField)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ObjectField<'a> {
    pub name: Name<'a>,
    pub value: Value<'a>,
}

/// AST Node for an Object value, which is a list of Object fields.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Input-Object-Values)
#[derive(Debug, PartialEq, Clone)]
pub struct ObjectValue<'a> {
    pub fields: Vec<'a, ObjectField<'a>>,
}

impl<'a> ObjectValue<'a> {
    /// Checks whether this Object contains any fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a `Map` keyed by all object field's names mapped to their values.
    pub fn as_map(
        &'a self,
        ctx: &'a ASTContext,
    ) -> HashMap<&'a str, &'a Value<'a>, DefaultHashBuilder, &'a bumpalo::Bump> {
        let mut map = HashMap::new_in(&ctx.arena);
        for field in self.fields.iter() {
            map.insert(field.name.value, &field.value);
        }
        map
    }
}

/// AST Node for an Argument, which carries a name and a value.
///
/// Arguments in GraphQL are unordered lists of inputs to a field's or directive's arguments.
/// [Reference](https://spec.graphql.org/October2021/#Argument)
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Argument<'a> {
    pub name: Name<'a>,
    pub value: Value<'a>,
}

/// AST Node for GraphQL Directives, which provide a way to describe alternate behavior in GraphQL.
///
/// Typical directives that occur in queries are for example `@skip`, @include`, and `@defer`.
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Directives)
#[derive(Debug, PartialEq, Clone)]
pub struct Directive<'a> {
    pub name: Name<'a>,
    /// Arguments that are passed to a Directive, which may be empty.
    pub arguments: Vec<'a, Argument<'a>>,
}

/// AST Node for Selection Sets, which provide a way to select more information on a given parent.
///
/// A Selection Set always contains at least one selection.
/// [Reference](https://spec.graphql.org/October2021/#sec-Selection-Sets)
#[derive(Debug, PartialEq, Clone)]
pub struct SelectionSet<'a> {
    pub selections: Vec<'a, Selection<'a>>,
}

/// AST Node for Fields, which can be likened to functions or properties on a parent object.
///
/// In JSON this would represent a property in a JSON object.
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fields)
#[derive(Debug, PartialEq, Clone)]
pub struct Field<'a> {
    /// A Field's `alias`, which is used to request information under a different name than the
    /// Field's `name`.
    /// [Reference](https://spec.graphql.org/October2021/#sec-Field-Alias)
    pub alias: Option<Name<'a>>,
    /// A Field's `name`, which represents a resolver on a GraphQL schema's object type.
    pub name: Name<'a>,
    /// Arguments that are passed to a Field.
    pub arguments: Vec<'a, Argument<'a>>,
    /// Directives that are annotating this Field.
    pub directives: Vec<'a, &'a Directive<'a>>,
    /// A sub-Selection Set that is passed below this field to add selections to this field's
    /// returned GraphQL object type. Leaf fields don't have a Selection Set.
    pub selection_set: Option<&'a SelectionSet<'a>>,
}

impl<'a> Field<'a> {
    /// Get the alias of the field, if present, otherwise get the name.
    #[inline]
    pub fn alias_or_name(&self) -> &'a str {
        self.alias.unwrap_or(self.name).value
    }

    /// Creates a new leaf field with the given `name`.
    ///
    /// The `arguments` and `directives` lists will be created as empty defaults.
    #[inline]
    pub fn new_leaf(ctx: &'a ASTContext, name: &'a str) -> Self {
        Field {
            alias: None,
            name: Name::new(name),
            arguments: Vec::new_in(&ctx.arena),
            directives: Vec::new_in(&ctx.arena),
            selection_set: None,
        }
    }

    /// Creates a new leaf field with the given `name` and `alias`.
    #[inline]
    pub fn new_aliased_leaf(ctx: &'a ASTContext, alias: &'a str, name: &'a str) -> Self {
        Field {
            alias: Some(Name::new(alias)),
            ..Field::new_leaf(ctx, name)
        }
    }
}

/// AST Node for a Fragment Spread, which refers to a [`FragmentDefinition`] by its name.
///
/// The name of a Fragment Spread is never `on`.
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone)]
pub struct FragmentSpread<'a> {
    /// A given name of the [FragmentDefinition] that must be spread in place of this Fragment
    /// Spread on a GraphQL API.
    pub name: Name<'a>,
    /// Directives that are annotating this Fragment Spread.
    pub directives: Vec<'a, &'a Directive<'a>>,
}

/// AST Node for an inline Fragment definition with an additional [`SelectionSet`].
/// This may only be applied when the type condition matches or when no type condition is present.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone)]
pub struct InlineFragment<'a> {
    /// A given type condition's type name that must match before this fragment is applied on a
    /// GraphQL API. On inline fragments this is optional and no type condition has to be passed.
    pub type_condition: Option<NamedType<'a>>,
    /// Directives that are annotating this Inline Fragment.
    pub directives: Vec<'a, &'a Directive<'a>>,
    /// A sub-Selection Set that is applied when this Fragment is applied to the parent
    /// Selection Set.
    pub selection_set: &'a SelectionSet<'a>,
}

/// AST Node of a selection as contained inside a [`SelectionSet`].
///
/// Any given Selection Set may contain fields, fragment spread, and inline fragments.
/// [Reference](https://spec.graphql.org/October2021/#Selection)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Selection<'a> {
    Field(&'a Field<'a>),
    FragmentSpread(&'a FragmentSpread<'a>),
    InlineFragment(&'a InlineFragment<'a>),
}

impl<'a> Selection<'a> {
    /// Helper method to return the [`Field`] if the Selection is a `Field`.
    #[inline]
    pub fn field(&self) -> Option<&'a Field<'a>> {
        match *self {
            Selection::Field(field) => Some(field),
            Selection::FragmentSpread(_) => None,
            Selection::InlineFragment(_) => None,
        }
    }

    /// Helper method to return the [`FragmentSpread`] if the Selection is a `FragmentSpread`.
    #[inline]
    pub fn fragment_spread(&self) -> Option<&'a FragmentSpread<'a>> {
        match *self {
            Selection::FragmentSpread(spread) => Some(spread),
            Selection::Field(_) => None,
            Selection::InlineFragment(_) => None,
        }
    }

    /// Helper method to return the [`InlineFragment`] if the Selection is an `InlineFragment`.
    #[inline]
    pub fn inline_fragment(&self) -> Option<&'a InlineFragment<'a>> {
        match *self {
            Selection::InlineFragment(fragment) => Some(fragment),
            Selection::FragmentSpread(_) => None,
            Selection::Field(_) => None,
        }
    }

    /// Helper method to get all Directives for a given selection directly.
    #[inline]
    pub fn directives(&self) -> &'a [&'a Directive<'a>] {
        match *self {
            Selection::Field(field) => &field.directives,
            Selection::FragmentSpread(spread) => &spread.directives,
            Selection::InlineFragment(fragment) => &fragment.directives,
        }
    }
}

/// AST Node for a type name.
///
/// This AST uses this reference whenever the AST refers to a concrete object type or input type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct NamedType<'a> {
    pub name: Name<'a>,
}

impl<'a> NamedType<'a> {
    #[inline]
    pub fn new(name: &'a str) -> Self {
        NamedType {
            name: Name::new(name),
        }
    }
}

/// AST Node for a type reference.
///
/// [`VariableDefinition`]s must describe their type when they're defined, including whether they
/// expect lists, non-null values, or a type reference, which is a recursive type definition.
/// A `NonNullType` never directly wraps another `NonNullType`.
/// [Reference](https://spec.graphql.org/October2021/#sec-Type-References)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Type<'a> {
    /// A reference to a named input type, which is a leaf node of a [Type].
    NamedType(NamedType<'a>),
    /// A list node wrapper for a Type, which indicates that a GraphQL API will always pass a list of the
    /// contained type in place.
    ListType(&'a Type<'a>),
    /// A non-null node wrapper for a Type, which indicates that a GraphQL API may not pass `null` instead
    /// of the conained type.
    NonNullType(&'a Type<'a>),
}

impl<'a> Type<'a> {
    /// Wraps this type in a list, indicating that it expects the current Type to be a list of
    /// itself instead.
    #[inline]
    pub fn into_list(self, ctx: &'a ASTContext) -> Type<'a> {
        Type::ListType(ctx.alloc(self))
    }

    /// Wraps this type in a non-null wrapper, unless it's already non-null.
    #[inline]
    pub fn into_nonnull(self, ctx: &'a ASTContext) -> Type<'a> {
        match self {
            Type::NonNullType(_) => self,
            _ => Type::NonNullType(ctx.alloc(self)),
        }
    }

    /// Unwraps a Type recursively and returns the `NamedType` that is contained within its
    /// wrappers.
    #[inline]
    pub fn of_type(&self) -> NamedType<'a> {
        match self {
            Type::NamedType(of_type) => *of_type,
            Type::ListType(inner) => inner.of_type(),
            Type::NonNullType(inner) => inner.of_type(),
        }
    }
}

/// AST Node for a variable definition.
///
/// A variable definition defines a [Variable] identifier that can be used in place of any other
/// non-static [Value] throughout the operation.
///
/// [Reference](https://spec.graphql.org/October2021/#VariableDefinition)
#[derive(Debug, PartialEq, Clone)]
pub struct VariableDefinition<'a> {
    /// The variable's name, as in, its identifier, which is prefixed with a `$` sign in the
    /// document.
    pub variable: Variable<'a>,
    /// Annotation of the type of a given variable, which ultimately leads to a type reference of
    /// an input type, as defined on a GraphQL schema.
    pub of_type: Type<'a>,
    /// A GraphQL variable may be replaced by a default value, when it's not passed.
    pub default_value: Option<Value<'a>>,
    /// Directives that are annotating this Variable Definition.
    pub directives: Vec<'a, &'a Directive<'a>>,
}

/// AST Node for a Fragment definition with an additional Selection Set.
///
/// This may only be applied when the type condition matches and extends a Selection Set by being
/// applied using a [`FragmentSpread`] selection.
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Fragments)
#[derive(Debug, PartialEq, Clone)]
pub struct FragmentDefinition<'a> {
    /// A given name of the Fragment Definition that is used by [FragmentSpread] selections to
    /// refer to this definition.
    pub name: Name<'a>,
    /// A given type condition's type name that must match before this fragment is applied on a
    /// GraphQL API.
    pub type_condition: NamedType<'a>,
    /// Directives that are annotating this Fragment.
    pub directives: Vec<'a, &'a Directive<'a>>,
    /// A sub-Selection Set that is applied when this Fragment is applied to the parent
    /// Selection Set.
    pub selection_set: &'a SelectionSet<'a>,
}

/// AST Node for a kind of operation, as referred to by an [`OperationDefinition`].
///
/// In GraphQL there are three different operations, with each having a unique identifier on
/// Operation Definitions.
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Operations)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Returns the keyword that introduces an operation of this kind.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

/// AST Node for an Operation Definition, which defines the entrypoint for GraphQL's execution.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Language.Operations)
#[derive(Debug, PartialEq, Clone)]
pub struct OperationDefinition<'a> {
    /// The kind of operation that this definition specifies
    pub operation: OperationKind,
    /// An optional name, as given to the operation definition.
    ///
    /// A [Document] may contain multiple Operation Definitions from which a single one can be
    /// selected during execution. When a Document contains only a single operation, it doesn't
    /// have to have a name.
    pub name: Option<Name<'a>>,
    /// A list of variables that the operation defines and accepts during execution.
    pub variable_definitions: Vec<'a, &'a VariableDefinition<'a>>,
    /// Directives that are annotating this Operation Definition.
    pub directives: Vec<'a, &'a Directive<'a>>,
    /// A sub-Selection Set that is applied when this Operation Definition is executed to the root
    /// type of the specified kind of operation.
    pub selection_set: &'a SelectionSet<'a>,
}

impl<'a> OperationDefinition<'a> {
    /// Checks whether this operation may be printed as a query shorthand, which is a bare
    /// Selection Set.
    #[inline]
    pub fn is_shorthand(&self) -> bool {
        self.operation == OperationKind::Query
            && self.name.is_none()
            && self.variable_definitions.is_empty()
            && self.directives.is_empty()
    }
}

/// AST Root Node for a GraphQL query language document. This contains one or more definitions of
/// fragments or operations.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Document)
#[derive(Debug, PartialEq, Clone)]
pub struct Document<'a> {
    pub definitions: Vec<'a, Definition<'a>>,
}

impl<'a, 'b> Document<'a> {
    /// Checks whether this document contains any definitions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns a `Map` keyed by all fragment names mapped to their fragment definitions.
    /// This is useful for manually traversing the document and resolving [`FragmentSpread`] nodes to
    /// their definitions.
    pub fn fragments(
        &self,
        ctx: &'a ASTContext,
    ) -> HashMap<&'a str, &'a FragmentDefinition<'a>, DefaultHashBuilder, &'a bumpalo::Bump> {
        let mut map = HashMap::new_in(&ctx.arena);
        for definition in self.definitions.iter() {
            if let Definition::Fragment(fragment) = definition {
                map.insert(fragment.name.value, *fragment);
            }
        }
        map
    }

    /// Finds an operation definition by name or the single operation contained in the document
    /// when `None` is passed.
    ///
    /// [Reference](https://spec.graphql.org/October2021/#GetOperation())
    pub fn operation(&self, by_name: Option<&'b str>) -> Result<&'a OperationDefinition<'a>> {
        if let Some(by_name) = by_name {
            self.definitions
                .iter()
                .find_map(|definition| match definition.operation() {
                    Some(operation) if operation.name.map(|name| name.value) == Some(by_name) => {
                        Some(operation)
                    }
                    _ => None,
                })
                .ok_or_else(|| {
                    Error::new(
                        format!("Operation with name {by_name} does not exist"),
                        Some(ErrorType::GraphQL),
                    )
                })
        } else {
            let mut operations = self
                .definitions
                .iter()
                .filter_map(|definition| definition.operation());
            match (operations.next(), operations.next()) {
                (None, _) => Err(Error::new(
                    "Document does not contain any operations",
                    Some(ErrorType::GraphQL),
                )),
                (Some(operation), None) => Ok(operation),
                (Some(_), Some(_)) => Err(Error::new(
                    "Document contains more than one operation, missing operation name",
                    Some(ErrorType::GraphQL),
                )),
            }
        }
    }
}

/// AST Node for a Definition inside a query language document, which may either be an Operation
/// Definition or a Fragment Definition.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Document)
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Definition<'a> {
    Operation(&'a OperationDefinition<'a>),
    Fragment(&'a FragmentDefinition<'a>),
}

impl<'a> Definition<'a> {
    /// Helper method to return the [`OperationDefinition`] if the Definition is an `OperationDefinition`.
    #[inline]
    pub fn operation(&self) -> Option<&'a OperationDefinition<'a>> {
        match *self {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        }
    }

    /// Helper method to return the [`FragmentDefinition`] if the Definition is a `FragmentDefinition`.
    #[inline]
    pub fn fragment(&self) -> Option<&'a FragmentDefinition<'a>> {
        match *self {
            Definition::Fragment(fragment) => Some(fragment),
            Definition::Operation(_) => None,
        }
    }

    /// Helper method to get all Directives for a given definition directly.
    #[inline]
    pub fn directives(&self) -> &'a [&'a Directive<'a>] {
        match *self {
            Definition::Operation(operation) => &operation.directives,
            Definition::Fragment(fragment) => &fragment.directives,
        }
    }
}
