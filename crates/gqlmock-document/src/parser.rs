//! Recursive-descent parser for executable documents.

use crate::ast::{
    Argument, Definition, Directive, Document, Field, FragmentDefinition, FragmentSpread,
    InlineFragment, OperationDefinition, OperationKind, Selection, SelectionSet, Type, Value,
    VariableDefinition,
};
use crate::error::ParseError;
use crate::lexer::{self, Spanned, Token};

/// Parse a full document.
pub(crate) fn parse_document(source: &str) -> Result<Document, ParseError> {
    let tokens = lexer::tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let document = parser.document()?;
    if document.definitions.is_empty() {
        return Err(ParseError::EmptyDocument);
    }
    Ok(document)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Spanned {
        // tokenize always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Spanned {
        let spanned = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        spanned
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        let spanned = self.peek();
        ParseError::syntax(message, spanned.line, spanned.column)
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        if &self.peek().token == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(format!(
                "expected {}, found {}",
                expected.describe(),
                self.peek().token.describe()
            )))
        }
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if &self.peek().token == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn name(&mut self) -> Result<String, ParseError> {
        match &self.peek().token {
            Token::Name(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.error_here(format!("expected a name, found {}", other.describe()))),
        }
    }

    fn document(&mut self) -> Result<Document, ParseError> {
        let mut definitions = Vec::new();
        while self.peek().token != Token::Eof {
            definitions.push(self.definition()?);
        }
        Ok(Document { definitions })
    }

    fn definition(&mut self) -> Result<Definition, ParseError> {
        match &self.peek().token {
            Token::BraceL => {
                // Anonymous query shorthand.
                let selection_set = self.selection_set()?;
                Ok(Definition::Operation(OperationDefinition {
                    kind: OperationKind::Query,
                    name: None,
                    variable_definitions: Vec::new(),
                    directives: Vec::new(),
                    selection_set,
                }))
            }
            Token::Name(keyword) if keyword == "fragment" => {
                self.advance();
                let name = self.name()?;
                if name == "on" {
                    return Err(self.error_here("fragment name must not be `on`"));
                }
                let on = self.name()?;
                if on != "on" {
                    return Err(self.error_here("expected `on` in fragment definition"));
                }
                let type_condition = self.name()?;
                let directives = self.directives()?;
                let selection_set = self.selection_set()?;
                Ok(Definition::Fragment(FragmentDefinition {
                    name,
                    type_condition,
                    directives,
                    selection_set,
                }))
            }
            Token::Name(keyword) => {
                let kind = match keyword.as_str() {
                    "query" => OperationKind::Query,
                    "mutation" => OperationKind::Mutation,
                    "subscription" => OperationKind::Subscription,
                    other => {
                        return Err(
                            self.error_here(format!("unexpected definition keyword `{other}`"))
                        );
                    }
                };
                self.advance();
                let name = match &self.peek().token {
                    Token::Name(_) => Some(self.name()?),
                    _ => None,
                };
                let variable_definitions = self.variable_definitions()?;
                let directives = self.directives()?;
                let selection_set = self.selection_set()?;
                Ok(Definition::Operation(OperationDefinition {
                    kind,
                    name,
                    variable_definitions,
                    directives,
                    selection_set,
                }))
            }
            other => Err(self.error_here(format!(
                "expected an operation or fragment, found {}",
                other.describe()
            ))),
        }
    }

    fn variable_definitions(&mut self) -> Result<Vec<VariableDefinition>, ParseError> {
        let mut definitions = Vec::new();
        if !self.eat(&Token::ParenL) {
            return Ok(definitions);
        }
        while !self.eat(&Token::ParenR) {
            self.expect(&Token::Dollar)?;
            let name = self.name()?;
            self.expect(&Token::Colon)?;
            let ty = self.type_reference()?;
            let default_value = if self.eat(&Token::Equals) {
                Some(self.value()?)
            } else {
                None
            };
            definitions.push(VariableDefinition {
                name,
                ty,
                default_value,
            });
        }
        Ok(definitions)
    }

    fn type_reference(&mut self) -> Result<Type, ParseError> {
        let inner = if self.eat(&Token::BracketL) {
            let element = self.type_reference()?;
            self.expect(&Token::BracketR)?;
            Type::List(Box::new(element))
        } else {
            Type::Named(self.name()?)
        };
        if self.eat(&Token::Bang) {
            Ok(Type::NonNull(Box::new(inner)))
        } else {
            Ok(inner)
        }
    }

    fn selection_set(&mut self) -> Result<SelectionSet, ParseError> {
        self.expect(&Token::BraceL)?;
        let mut selections = Vec::new();
        while !self.eat(&Token::BraceR) {
            selections.push(self.selection()?);
        }
        if selections.is_empty() {
            return Err(self.error_here("selection set must not be empty"));
        }
        Ok(SelectionSet { selections })
    }

    fn selection(&mut self) -> Result<Selection, ParseError> {
        if self.eat(&Token::Spread) {
            match &self.peek().token {
                Token::Name(name) if name != "on" => {
                    let name = self.name()?;
                    let directives = self.directives()?;
                    return Ok(Selection::FragmentSpread(FragmentSpread {
                        name,
                        directives,
                    }));
                }
                _ => {
                    let type_condition = if matches!(&self.peek().token, Token::Name(n) if n == "on")
                    {
                        self.advance();
                        Some(self.name()?)
                    } else {
                        None
                    };
                    let directives = self.directives()?;
                    let selection_set = self.selection_set()?;
                    return Ok(Selection::InlineFragment(InlineFragment {
                        type_condition,
                        directives,
                        selection_set,
                    }));
                }
            }
        }

        let first = self.name()?;
        let (alias, name) = if self.eat(&Token::Colon) {
            (Some(first), self.name()?)
        } else {
            (None, first)
        };
        let arguments = self.arguments()?;
        let directives = self.directives()?;
        let selection_set = if self.peek().token == Token::BraceL {
            self.selection_set()?
        } else {
            SelectionSet::default()
        };
        Ok(Selection::Field(Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        }))
    }

    fn arguments(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut arguments = Vec::new();
        if !self.eat(&Token::ParenL) {
            return Ok(arguments);
        }
        while !self.eat(&Token::ParenR) {
            let name = self.name()?;
            self.expect(&Token::Colon)?;
            let value = self.value()?;
            arguments.push(Argument { name, value });
        }
        if arguments.is_empty() {
            return Err(self.error_here("argument list must not be empty"));
        }
        Ok(arguments)
    }

    fn directives(&mut self) -> Result<Vec<Directive>, ParseError> {
        let mut directives = Vec::new();
        while self.eat(&Token::At) {
            let name = self.name()?;
            let arguments = self.arguments()?;
            directives.push(Directive { name, arguments });
        }
        Ok(directives)
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        match self.peek().token.clone() {
            Token::Dollar => {
                self.advance();
                Ok(Value::Variable(self.name()?))
            }
            Token::Int(value) => {
                self.advance();
                Ok(Value::Int(value))
            }
            Token::Float(value) => {
                self.advance();
                Ok(Value::Float(value))
            }
            Token::Str(value) => {
                self.advance();
                Ok(Value::String(value))
            }
            Token::Name(name) => {
                self.advance();
                Ok(match name.as_str() {
                    "true" => Value::Boolean(true),
                    "false" => Value::Boolean(false),
                    "null" => Value::Null,
                    _ => Value::Enum(name),
                })
            }
            Token::BracketL => {
                self.advance();
                let mut values = Vec::new();
                while !self.eat(&Token::BracketR) {
                    values.push(self.value()?);
                }
                Ok(Value::List(values))
            }
            Token::BraceL => {
                self.advance();
                let mut fields = Vec::new();
                while !self.eat(&Token::BraceR) {
                    let name = self.name()?;
                    self.expect(&Token::Colon)?;
                    fields.push((name, self.value()?));
                }
                Ok(Value::Object(fields))
            }
            other => Err(self.error_here(format!("expected a value, found {}", other.describe()))),
        }
    }
}
