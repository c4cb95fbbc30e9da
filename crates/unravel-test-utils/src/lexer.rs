//! Tokenizer for the JavaScript test subset.

use unravel_parser::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Identifiers and keywords.
    Name(String),
    Number { value: f64, raw: String },
    Str { value: String, raw: String },
    Punct(&'static str),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    /// A line terminator appeared between the previous token and this one.
    pub newline_before: bool,
}

const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "=>", "==", "!=", "<=", ">=", "&&", "||",
    "??", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "**", "<<", ">>", "{", "}", "(",
    ")", "[", "]", ";", ",", "<", ">", "+", "-", "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=",
    ".",
];

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    loop {
        let newline_before = lexer.skip_trivia()?;
        let offset = lexer.pos;
        let kind = lexer.next_kind()?;
        let done = kind == TokenKind::Eof;
        tokens.push(Token {
            kind,
            offset,
            newline_before,
        });
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            message: message.into(),
            offset: self.pos,
        }
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    /// Skip whitespace and comments; report whether a newline was crossed.
    fn skip_trivia(&mut self) -> Result<bool, ParseError> {
        let mut newline = false;
        while let Some(byte) = self.peek_byte(0) {
            match byte {
                b'\n' | b'\r' => {
                    newline = true;
                    self.pos += 1;
                }
                b' ' | b'\t' => self.pos += 1,
                b'/' if self.peek_byte(1) == Some(b'/') => {
                    while let Some(b) = self.peek_byte(0) {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                b'/' if self.peek_byte(1) == Some(b'*') => {
                    let Some(end) = self.source[self.pos + 2..].find("*/") else {
                        return Err(self.error("unterminated comment"));
                    };
                    if self.source[self.pos..self.pos + 2 + end].contains('\n') {
                        newline = true;
                    }
                    self.pos += end + 4;
                }
                _ => break,
            }
        }
        Ok(newline)
    }

    fn next_kind(&mut self) -> Result<TokenKind, ParseError> {
        let Some(byte) = self.peek_byte(0) else {
            return Ok(TokenKind::Eof);
        };
        if byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$' {
            return Ok(self.name());
        }
        if byte.is_ascii_digit() || (byte == b'.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit())) {
            return self.number();
        }
        if byte == b'"' || byte == b'\'' {
            return self.string(byte);
        }
        let rest = &self.source[self.pos..];
        for &punct in PUNCTUATORS {
            if rest.starts_with(punct) {
                self.pos += punct.len();
                return Ok(TokenKind::Punct(punct));
            }
        }
        Err(self.error(format!("unexpected character {:?}", byte as char)))
    }

    fn name(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek_byte(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        {
            self.pos += 1;
        }
        TokenKind::Name(self.source[start..self.pos].to_string())
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        if self.peek_byte(0) == Some(b'0') && matches!(self.peek_byte(1), Some(b'x' | b'X')) {
            self.pos += 2;
            while self.peek_byte(0).is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let raw = &self.source[start..self.pos];
            let value = u64::from_str_radix(&raw[2..], 16).map_err(|_| self.error("invalid hex literal"))?;
            return Ok(TokenKind::Number {
                value: value as f64,
                raw: raw.to_string(),
            });
        }
        while self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek_byte(0) == Some(b'.') {
            self.pos += 1;
            while self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek_byte(0), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek_byte(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            while self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let raw = &self.source[start..self.pos];
        let value: f64 = raw.parse().map_err(|_| self.error("invalid number literal"))?;
        Ok(TokenKind::Number {
            value,
            raw: raw.to_string(),
        })
    }

    fn string(&mut self, quote: u8) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.source[self.pos..].chars().next() else {
                return Err(self.error("unterminated string literal"));
            };
            self.pos += ch.len_utf8();
            match ch {
                c if c as u32 == u32::from(quote) => break,
                '\n' => return Err(self.error("unterminated string literal")),
                '\\' => {
                    let Some(escaped) = self.source[self.pos..].chars().next() else {
                        return Err(self.error("unterminated string literal"));
                    };
                    self.pos += escaped.len_utf8();
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        'b' => value.push('\u{8}'),
                        'f' => value.push('\u{c}'),
                        'v' => value.push('\u{b}'),
                        '0' => value.push('\0'),
                        'x' => value.push(self.hex_escape(2)?),
                        'u' => value.push(self.hex_escape(4)?),
                        '\n' => {}
                        other => value.push(other),
                    }
                }
                other => value.push(other),
            }
        }
        Ok(TokenKind::Str {
            value,
            raw: self.source[start..self.pos].to_string(),
        })
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, ParseError> {
        let text = self
            .source
            .get(self.pos..self.pos + digits)
            .ok_or_else(|| self.error("truncated escape sequence"))?;
        let code = u32::from_str_radix(text, 16).map_err(|_| self.error("invalid escape sequence"))?;
        self.pos += digits;
        char::from_u32(code).ok_or_else(|| self.error("invalid escape sequence"))
    }
}
