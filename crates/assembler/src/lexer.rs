//! Tokenizer for Ember IR text.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use ember_common::decimal::parse_decimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::error::AsmError;

/// A single token from an IR line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Mnemonics, names, keys, labels and type names (`int[]`).
    Ident(String),
    /// `%n`
    Slot(u32),
    Int(i64),
    Float(f64),
    /// A literal with the `d` suffix: `3.25d`, `1/3d`.
    Decimal(BigRational),
    Str(String),
    LParen,
    RParen,
    Comma,
    Equals,
    Arrow,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => f.write_str(s),
            Token::Slot(n) => write!(f, "%{n}"),
            Token::Int(n) => write!(f, "{n}"),
            Token::Float(n) => write!(f, "{n}"),
            Token::Decimal(n) => write!(f, "{n}d"),
            Token::Str(s) => write!(f, "{s:?}"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Equals => f.write_str("="),
            Token::Arrow => f.write_str("->"),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | ':' | '[' | ']')
}

/// Tokenize a single line of IR text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` outside a string and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            ';' => break,
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' | '=' => {
                chars.next();
                tokens.push(match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    _ => Token::Equals,
                });
            }
            '%' => {
                chars.next();
                let digits = take_while(&mut chars, line, |c| c.is_ascii_digit());
                let slot = digits.parse().map_err(|_| AsmError::InvalidNumber {
                    line: line_num,
                    token: format!("%{digits}"),
                })?;
                tokens.push(Token::Slot(slot));
            }
            '"' => {
                chars.next();
                tokens.push(Token::Str(string_literal(&mut chars, line_num)?));
            }
            '-' if line[start..].starts_with("->") => {
                chars.next();
                chars.next();
                tokens.push(Token::Arrow);
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                tokens.push(number(&mut chars, line, line_num)?);
            }
            c if is_ident_start(c) => {
                let word = take_while(&mut chars, line, is_ident_char);
                tokens.push(Token::Ident(word.to_string()));
            }
            other => {
                return Err(AsmError::UnexpectedToken {
                    line: line_num,
                    token: other.to_string(),
                })
            }
        }
    }

    Ok(tokens)
}

fn take_while<'a>(
    chars: &mut Peekable<CharIndices<'a>>,
    line: &'a str,
    keep: impl Fn(char) -> bool,
) -> &'a str {
    let start = chars.peek().map_or(line.len(), |&(i, _)| i);
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if !keep(c) {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    &line[start..end]
}

fn string_literal(
    chars: &mut Peekable<CharIndices<'_>>,
    line_num: usize,
) -> Result<String, AsmError> {
    let mut text = String::new();
    loop {
        match chars.next().map(|(_, c)| c) {
            None => return Err(AsmError::UnterminatedString { line: line_num }),
            Some('"') => return Ok(text),
            Some('\\') => {
                let escaped = match chars.next().map(|(_, c)| c) {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('0') => '\0',
                    Some('\\') => '\\',
                    Some('"') => '"',
                    Some(other) => {
                        return Err(AsmError::UnexpectedToken {
                            line: line_num,
                            token: format!("\\{other}"),
                        })
                    }
                    None => return Err(AsmError::UnterminatedString { line: line_num }),
                };
                text.push(escaped);
            }
            Some(c) => text.push(c),
        }
    }
}

/// Lex an Int, Float or Decimal literal.
///
/// A `d` suffix makes a decimal; a `.` or exponent makes a float; `inf`
/// after a sign is a float infinity.
fn number(
    chars: &mut Peekable<CharIndices<'_>>,
    line: &str,
    line_num: usize,
) -> Result<Token, AsmError> {
    let start = chars.peek().map_or(line.len(), |&(i, _)| i);
    let mut end = start;
    let mut prev = None;
    while let Some(&(i, c)) = chars.peek() {
        let signed_exponent = matches!(c, '+' | '-') && (i == start || matches!(prev, Some('e' | 'E')));
        if !(c.is_ascii_alphanumeric() || matches!(c, '.' | '/') || signed_exponent) {
            break;
        }
        prev = Some(c);
        end = i + c.len_utf8();
        chars.next();
    }
    let text = &line[start..end];
    let invalid = || AsmError::InvalidNumber {
        line: line_num,
        token: text.to_string(),
    };

    if let Some(body) = text.strip_suffix('d') {
        let value = match body.split_once('/') {
            Some((numer, denom)) => {
                let numer: BigInt = numer.parse().map_err(|_| invalid())?;
                let denom: BigInt = denom.parse().map_err(|_| invalid())?;
                if denom == BigInt::from(0) {
                    return Err(invalid());
                }
                BigRational::new(numer, denom)
            }
            None => parse_decimal(body).map_err(|_| invalid())?,
        };
        return Ok(Token::Decimal(value));
    }

    match text {
        "inf" | "+inf" => return Ok(Token::Float(f64::INFINITY)),
        "-inf" => return Ok(Token::Float(f64::NEG_INFINITY)),
        _ => {}
    }

    if text.contains(['.', 'e', 'E']) {
        text.parse().map(Token::Float).map_err(|_| invalid())
    } else {
        text.parse().map(Token::Int).map_err(|_| invalid())
    }
}
