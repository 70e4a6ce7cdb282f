//! Executable-document AST.

use crate::error::ParseError;
use crate::parser;
use crate::print;

/// A parsed executable document: one or more operations plus fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Top-level definitions in source order.
    pub definitions: Vec<Definition>,
}

impl Document {
    /// Parse a document from source text.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parser::parse_document(source)
    }

    /// Render the canonical, whitespace-normalized query text.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        print::print(self)
    }

    /// Kind of the first operation in the document.
    ///
    /// An anonymous shorthand document is a query. Documents holding only
    /// fragments classify as queries as well.
    #[must_use]
    pub fn operation_kind(&self) -> OperationKind {
        self.definitions
            .iter()
            .find_map(|definition| match definition {
                Definition::Operation(operation) => Some(operation.kind),
                Definition::Fragment(_) => None,
            })
            .unwrap_or(OperationKind::Query)
    }
}

/// Top-level definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// An operation definition (query/mutation/subscription).
    Operation(OperationDefinition),
    /// A named fragment definition.
    Fragment(FragmentDefinition),
}

/// Operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Read operation.
    Query,
    /// Write operation.
    Mutation,
    /// Streaming operation.
    Subscription,
}

impl OperationKind {
    /// Keyword form of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query, mutation, or subscription definition.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinition {
    /// Operation kind.
    pub kind: OperationKind,
    /// Optional operation name.
    pub name: Option<String>,
    /// Declared variables.
    pub variable_definitions: Vec<VariableDefinition>,
    /// Directives on the operation itself.
    pub directives: Vec<Directive>,
    /// Root selection set.
    pub selection_set: SelectionSet,
}

/// A named fragment definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDefinition {
    /// Fragment name.
    pub name: String,
    /// Type the fragment applies to.
    pub type_condition: String,
    /// Directives on the fragment.
    pub directives: Vec<Directive>,
    /// Fragment selection set.
    pub selection_set: SelectionSet,
}

/// A set of selections. Empty on leaf fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionSet {
    /// Selections in source order.
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    /// Returns `true` when the set has no selections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// One entry in a selection set.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A field selection.
    Field(Field),
    /// A named fragment spread (`...Name`).
    FragmentSpread(FragmentSpread),
    /// An inline fragment (`... on Type { ... }`).
    InlineFragment(InlineFragment),
}

impl Selection {
    /// Directives attached to this selection.
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        match self {
            Self::Field(field) => &field.directives,
            Self::FragmentSpread(spread) => &spread.directives,
            Self::InlineFragment(fragment) => &fragment.directives,
        }
    }
}

/// A field selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Optional response alias.
    pub alias: Option<String>,
    /// Field name.
    pub name: String,
    /// Field arguments.
    pub arguments: Vec<Argument>,
    /// Directives on the field.
    pub directives: Vec<Directive>,
    /// Child selections; empty for leaf fields.
    pub selection_set: SelectionSet,
}

impl Field {
    /// Create a leaf field with no alias, arguments, or directives.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: SelectionSet::default(),
        }
    }
}

/// A named fragment spread.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSpread {
    /// Target fragment name.
    pub name: String,
    /// Directives on the spread.
    pub directives: Vec<Directive>,
}

/// An inline fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    /// Optional type condition.
    pub type_condition: Option<String>,
    /// Directives on the fragment.
    pub directives: Vec<Directive>,
    /// Fragment selections.
    pub selection_set: SelectionSet,
}

/// A directive application, e.g. `@client` or `@connection(key: "feed")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Directive name without the `@`.
    pub name: String,
    /// Directive arguments.
    pub arguments: Vec<Argument>,
}

/// A named argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Argument value.
    pub value: Value,
}

/// An input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A variable reference (`$name`).
    Variable(String),
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Boolean literal.
    Boolean(bool),
    /// `null` literal.
    Null,
    /// Enum value.
    Enum(String),
    /// List literal.
    List(Vec<Value>),
    /// Input object literal, field order preserved.
    Object(Vec<(String, Value)>),
}

/// A declared operation variable, e.g. `$id: ID! = "0"`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    /// Variable name without the `$`.
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Optional default value.
    pub default_value: Option<Value>,
}

/// A type reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Named type.
    Named(String),
    /// List type.
    List(Box<Type>),
    /// Non-null wrapper.
    NonNull(Box<Type>),
}
