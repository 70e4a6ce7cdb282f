//! Tokenizer for executable documents.
//!
//! Commas, whitespace, and `#` comments are ignored per the GraphQL
//! lexical grammar. Block strings are not supported; plain string
//! literals cover the documents a mock link sees.

use crate::error::ParseError;

/// One lexical token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Name(String),
    Int(i64),
    Float(f64),
    Str(String),
    Bang,
    Dollar,
    ParenL,
    ParenR,
    Spread,
    Colon,
    Equals,
    At,
    BracketL,
    BracketR,
    BraceL,
    BraceR,
    Pipe,
    Eof,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Name(name) => format!("name `{name}`"),
            Self::Int(value) => format!("int `{value}`"),
            Self::Float(value) => format!("float `{value}`"),
            Self::Str(_) => "string".to_string(),
            Self::Bang => "`!`".to_string(),
            Self::Dollar => "`$`".to_string(),
            Self::ParenL => "`(`".to_string(),
            Self::ParenR => "`)`".to_string(),
            Self::Spread => "`...`".to_string(),
            Self::Colon => "`:`".to_string(),
            Self::Equals => "`=`".to_string(),
            Self::At => "`@`".to_string(),
            Self::BracketL => "`[`".to_string(),
            Self::BracketR => "`]`".to_string(),
            Self::BraceL => "`{`".to_string(),
            Self::BraceR => "`}`".to_string(),
            Self::Pipe => "`|`".to_string(),
            Self::Eof => "end of document".to_string(),
        }
    }
}

/// A token with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub(crate) token: Token,
    pub(crate) line: u32,
    pub(crate) column: u32,
}

/// Tokenize the whole source up front.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line: u32 = 1;
    let mut column: u32 = 1;

    macro_rules! bump {
        () => {{
            let ch = chars.next();
            if ch == Some('\n') {
                line += 1;
                column = 1;
            } else if ch.is_some() {
                column += 1;
            }
            ch
        }};
    }

    loop {
        // Skip ignored characters.
        while let Some(&ch) = chars.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' | ',' | '\u{feff}' => {
                    bump!();
                }
                '#' => {
                    while let Some(&ch) = chars.peek() {
                        if ch == '\n' {
                            break;
                        }
                        bump!();
                    }
                }
                _ => break,
            }
        }

        let (start_line, start_column) = (line, column);
        let Some(&ch) = chars.peek() else {
            tokens.push(Spanned {
                token: Token::Eof,
                line: start_line,
                column: start_column,
            });
            return Ok(tokens);
        };

        let token = match ch {
            '!' => {
                bump!();
                Token::Bang
            }
            '$' => {
                bump!();
                Token::Dollar
            }
            '(' => {
                bump!();
                Token::ParenL
            }
            ')' => {
                bump!();
                Token::ParenR
            }
            ':' => {
                bump!();
                Token::Colon
            }
            '=' => {
                bump!();
                Token::Equals
            }
            '@' => {
                bump!();
                Token::At
            }
            '[' => {
                bump!();
                Token::BracketL
            }
            ']' => {
                bump!();
                Token::BracketR
            }
            '{' => {
                bump!();
                Token::BraceL
            }
            '}' => {
                bump!();
                Token::BraceR
            }
            '|' => {
                bump!();
                Token::Pipe
            }
            '.' => {
                for _ in 0..3 {
                    if chars.peek() != Some(&'.') {
                        return Err(ParseError::syntax(
                            "expected `...`",
                            start_line,
                            start_column,
                        ));
                    }
                    bump!();
                }
                Token::Spread
            }
            '"' => {
                bump!();
                let mut value = String::new();
                loop {
                    match bump!() {
                        Some('"') => break,
                        Some('\\') => {
                            let escaped = bump!().ok_or_else(|| {
                                ParseError::syntax("unterminated string", start_line, start_column)
                            })?;
                            match escaped {
                                '"' => value.push('"'),
                                '\\' => value.push('\\'),
                                '/' => value.push('/'),
                                'b' => value.push('\u{8}'),
                                'f' => value.push('\u{c}'),
                                'n' => value.push('\n'),
                                'r' => value.push('\r'),
                                't' => value.push('\t'),
                                'u' => {
                                    let mut code = 0_u32;
                                    for _ in 0..4 {
                                        let digit = bump!()
                                            .and_then(|c| c.to_digit(16))
                                            .ok_or_else(|| {
                                                ParseError::syntax(
                                                    "invalid unicode escape",
                                                    start_line,
                                                    start_column,
                                                )
                                            })?;
                                        code = code * 16 + digit;
                                    }
                                    value.push(char::from_u32(code).ok_or_else(|| {
                                        ParseError::syntax(
                                            "invalid unicode escape",
                                            start_line,
                                            start_column,
                                        )
                                    })?);
                                }
                                other => {
                                    return Err(ParseError::syntax(
                                        format!("invalid escape `\\{other}`"),
                                        start_line,
                                        start_column,
                                    ));
                                }
                            }
                        }
                        Some('\n') | None => {
                            return Err(ParseError::syntax(
                                "unterminated string",
                                start_line,
                                start_column,
                            ));
                        }
                        Some(other) => value.push(other),
                    }
                }
                Token::Str(value)
            }
            '-' | '0'..='9' => {
                let mut literal = String::new();
                if ch == '-' {
                    literal.push('-');
                    bump!();
                }
                while let Some(&digit) = chars.peek() {
                    if digit.is_ascii_digit() {
                        literal.push(digit);
                        bump!();
                    } else {
                        break;
                    }
                }
                let mut is_float = false;
                if chars.peek() == Some(&'.') {
                    is_float = true;
                    literal.push('.');
                    bump!();
                    while let Some(&digit) = chars.peek() {
                        if digit.is_ascii_digit() {
                            literal.push(digit);
                            bump!();
                        } else {
                            break;
                        }
                    }
                }
                if matches!(chars.peek(), Some('e' | 'E')) {
                    is_float = true;
                    literal.push('e');
                    bump!();
                    if matches!(chars.peek(), Some('+' | '-')) {
                        literal.push(bump!().unwrap_or('+'));
                    }
                    while let Some(&digit) = chars.peek() {
                        if digit.is_ascii_digit() {
                            literal.push(digit);
                            bump!();
                        } else {
                            break;
                        }
                    }
                }
                if is_float {
                    let value = literal.parse::<f64>().map_err(|_| {
                        ParseError::syntax(
                            format!("invalid float literal `{literal}`"),
                            start_line,
                            start_column,
                        )
                    })?;
                    Token::Float(value)
                } else {
                    let value = literal.parse::<i64>().map_err(|_| {
                        ParseError::syntax(
                            format!("invalid int literal `{literal}`"),
                            start_line,
                            start_column,
                        )
                    })?;
                    Token::Int(value)
                }
            }
            'A'..='Z' | 'a'..='z' | '_' => {
                let mut name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        name.push(ch);
                        bump!();
                    } else {
                        break;
                    }
                }
                Token::Name(name)
            }
            other => {
                return Err(ParseError::syntax(
                    format!("unexpected character `{other}`"),
                    start_line,
                    start_column,
                ));
            }
        };

        tokens.push(Spanned {
            token,
            line: start_line,
            column: start_column,
        });
    }
}
