//! Tokenizer for math-mode markup.

use std::fmt;

use crate::error::ParseError;

/// Token kinds produced by [`tokenize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tok {
    /// A run of digits with at most one decimal point.
    Number(String),
    /// A single letter, which is a symbol name.
    Letter(char),
    /// A control sequence without its backslash.
    Command(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Underscore,
    Bang,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Pipe,
    Eq,
    Lt,
    Gt,
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Number(n) => write!(f, "number {n}"),
            Tok::Letter(c) => write!(f, "`{c}`"),
            Tok::Command(name) => write!(f, "`\\{name}`"),
            Tok::Plus => f.write_str("`+`"),
            Tok::Minus => f.write_str("`-`"),
            Tok::Star => f.write_str("`*`"),
            Tok::Slash => f.write_str("`/`"),
            Tok::Caret => f.write_str("`^`"),
            Tok::Underscore => f.write_str("`_`"),
            Tok::Bang => f.write_str("`!`"),
            Tok::Comma => f.write_str("`,`"),
            Tok::LParen => f.write_str("`(`"),
            Tok::RParen => f.write_str("`)`"),
            Tok::LBrace => f.write_str("`{`"),
            Tok::RBrace => f.write_str("`}`"),
            Tok::LBracket => f.write_str("`[`"),
            Tok::RBracket => f.write_str("`]`"),
            Tok::Pipe => f.write_str("`|`"),
            Tok::Eq => f.write_str("`=`"),
            Tok::Lt => f.write_str("`<`"),
            Tok::Gt => f.write_str("`>`"),
        }
    }
}

/// A token and its byte offset in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) tok: Tok,
    pub(crate) offset: usize,
}

/// Spacing commands carry no meaning for the parser.
const SPACING: &[&str] = &[",", ";", ":", "!", " ", "quad", "qquad"];

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let tok = match ch {
            c if c.is_whitespace() => continue,
            '0'..='9' | '.' => {
                let mut text = String::from(ch);
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        text.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if text.matches('.').count() > 1 || text == "." {
                    return Err(ParseError::InvalidNumber(text));
                }
                Tok::Number(text)
            }
            c if c.is_ascii_alphabetic() => Tok::Letter(c),
            '\\' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    // Single-character commands such as `\,` or `\{`.
                    match chars.next() {
                        Some((_, c)) => name.push(c),
                        None => return Err(ParseError::UnexpectedEnd),
                    }
                }
                if SPACING.contains(&name.as_str()) {
                    continue;
                }
                match name.as_str() {
                    "{" => Tok::LBrace,
                    "}" => Tok::RBrace,
                    "|" => Tok::Pipe,
                    _ => Tok::Command(name),
                }
            }
            '+' => Tok::Plus,
            '-' => Tok::Minus,
            '*' => Tok::Star,
            '/' => Tok::Slash,
            '^' => Tok::Caret,
            '_' => Tok::Underscore,
            '!' => Tok::Bang,
            ',' => Tok::Comma,
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '{' => Tok::LBrace,
            '}' => Tok::RBrace,
            '[' => Tok::LBracket,
            ']' => Tok::RBracket,
            '|' => Tok::Pipe,
            '=' => Tok::Eq,
            '<' => Tok::Lt,
            '>' => Tok::Gt,
            _ => return Err(ParseError::UnexpectedCharacter { ch, offset }),
        };
        tokens.push(Token { tok, offset });
    }

    Ok(tokens)
}
