//! Minimal GraphQL executable-document support for the mock link.
//!
//! This crate provides:
//! - A small AST for operations, fragments, and selections.
//! - A lexer and recursive-descent parser for executable documents.
//! - A canonical, whitespace-normalized printer (fingerprint source).
//! - Transforms: `__typename` injection, `@client` selection stripping,
//!   and `@connection` directive removal.
//!
//! It intentionally models executable documents only; schema definitions
//! are out of scope for a request/response test double.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::too_many_lines)]

mod ast;
mod error;
mod lexer;
mod parser;
mod print;
mod transform;

pub use ast::{
    Argument, Definition, Directive, Document, Field, FragmentDefinition, FragmentSpread,
    InlineFragment, OperationDefinition, OperationKind, Selection, SelectionSet, Type, Value,
    VariableDefinition,
};
pub use error::ParseError;
pub use print::print;
pub use transform::{strip_client_selections, strip_connection_directive, with_typename};
