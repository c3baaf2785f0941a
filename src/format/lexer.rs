//! Format Lexer
//!
//! Tokenizes an output format string. The byte right after `]` is read as a
//! guard suffix (`*`, `N`, `=N`, `<N`, `>N`, `!N`); everywhere else those
//! characters are literal text.

use super::action::Field;
use crate::error::{FormatResult, FormatSpecError};

/// Guard written after a closing bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    /// No suffix: bare test
    None,
    /// `*`
    Always,
    /// `N` or `=N`
    Equal(usize),
    /// `<N`
    Less(usize),
    /// `>N`
    Greater(usize),
    /// `!N`
    NotEqual(usize),
}

/// Format tokens. Offsets point at the token's first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of literal bytes, escapes resolved
    Literal(Vec<u8>),
    /// `$x`
    Field { field: Field, offset: usize },
    /// `#x`
    Count { field: Field, offset: usize },
    /// `[`
    Open { offset: usize },
    /// `]` and its suffix
    Close { suffix: Suffix, offset: usize },
    Eof,
}

/// Format lexer
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Get the next token
    pub fn next_token(&mut self) -> FormatResult<Token> {
        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };
        let offset = self.pos;
        match c {
            b'$' | b'#' => {
                self.pos += 1;
                let Some(letter) = self.peek() else {
                    return Err(FormatSpecError::DanglingMarker {
                        marker: c as char,
                        offset,
                    });
                };
                let field = Field::from_letter(letter).ok_or(FormatSpecError::UnknownField {
                    letter: letter as char,
                    offset: self.pos,
                })?;
                self.pos += 1;
                if c == b'$' {
                    Ok(Token::Field { field, offset })
                } else if field.is_countable() {
                    Ok(Token::Count { field, offset })
                } else {
                    Err(FormatSpecError::UncountableField {
                        letter: field.letter(),
                        offset,
                    })
                }
            }
            b'[' => {
                self.pos += 1;
                Ok(Token::Open { offset })
            }
            b']' => {
                self.pos += 1;
                let suffix = self.read_suffix()?;
                Ok(Token::Close { suffix, offset })
            }
            _ => self.read_literal(),
        }
    }

    /// Literal bytes up to the next special character
    fn read_literal(&mut self) -> FormatResult<Token> {
        let mut bytes = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                b'$' | b'#' | b'[' | b']' => break,
                b'\\' => {
                    let offset = self.pos;
                    self.pos += 1;
                    let escaped = self
                        .peek()
                        .ok_or(FormatSpecError::DanglingEscape { offset })?;
                    bytes.push(match escaped {
                        b't' => b'\t',
                        b'n' => b'\n',
                        other => other,
                    });
                }
                _ => bytes.push(c),
            }
            self.pos += 1;
        }
        Ok(Token::Literal(bytes))
    }

    fn read_suffix(&mut self) -> FormatResult<Suffix> {
        let Some(c) = self.peek() else {
            return Ok(Suffix::None);
        };
        let offset = self.pos;
        let op: fn(usize) -> Suffix = match c {
            b'*' => {
                self.pos += 1;
                return Ok(Suffix::Always);
            }
            b'0'..=b'9' => return Ok(Suffix::Equal(self.read_number(offset)?)),
            b'=' => Suffix::Equal,
            b'<' => Suffix::Less,
            b'>' => Suffix::Greater,
            b'!' => Suffix::NotEqual,
            _ => return Ok(Suffix::None),
        };
        self.pos += 1;
        match self.peek() {
            Some(b'0'..=b'9') => Ok(op(self.read_number(offset)?)),
            _ => Err(FormatSpecError::MissingOperand { offset }),
        }
    }

    fn read_number(&mut self, offset: usize) -> FormatResult<usize> {
        let mut value: usize = 0;
        while let Some(digit @ b'0'..=b'9') = self.peek() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(digit - b'0')))
                .ok_or(FormatSpecError::NumberOverflow { offset })?;
            self.pos += 1;
        }
        Ok(value)
    }

    /// Tokenize entire input
    pub fn tokenize(&mut self) -> FormatResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }
}
