//! Scanner for test expressions.
//!
//! ASCII characters are classified through a lookup table; anything above
//! U+007F is either an NCName character or an error.

use smallvec::SmallVec;

use super::tokens::{Token, TokenKind, TokenStream};
use crate::runtime::Error;
use crate::xml_chars::{is_ncname_char, is_ncname_start_char, is_xml_char};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    /// No token role (control characters, `$`, `,`, `+`, `;`, `/`, ...).
    Invalid,
    Whitespace,
    LParen,
    RParen,
    At,
    Question,
    Star,
    Equals,
    Bang,
    Less,
    Greater,
    Quote,
    Digit,
    Period,
    Colon,
    NameStart,
    /// Name character that cannot start a name (`-`).
    NamePart,
}

const fn build_class_table() -> [CharClass; 128] {
    let mut table = [CharClass::Invalid; 128];
    let mut i = 0;
    while i < 128 {
        let b = i as u8;
        table[i] = match b {
            b' ' | b'\t' | b'\n' | b'\r' => CharClass::Whitespace,
            b'(' => CharClass::LParen,
            b')' => CharClass::RParen,
            b'@' => CharClass::At,
            b'?' => CharClass::Question,
            b'*' => CharClass::Star,
            b'=' => CharClass::Equals,
            b'!' => CharClass::Bang,
            b'<' => CharClass::Less,
            b'>' => CharClass::Greater,
            b'\'' | b'"' => CharClass::Quote,
            b'0'..=b'9' => CharClass::Digit,
            b'.' => CharClass::Period,
            b':' => CharClass::Colon,
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => CharClass::NameStart,
            b'-' => CharClass::NamePart,
            _ => CharClass::Invalid,
        };
        i += 1;
    }
    table
}

static CHAR_CLASSES: [CharClass; 128] = build_class_table();

fn classify(ch: char) -> CharClass {
    if ch.is_ascii() {
        CHAR_CLASSES[ch as usize]
    } else if is_ncname_start_char(ch) {
        CharClass::NameStart
    } else if is_ncname_char(ch) {
        CharClass::NamePart
    } else {
        CharClass::Invalid
    }
}

/// Splits `input` into tokens. Fails on the first character that cannot
/// begin or continue a token.
pub fn scan(input: &str) -> Result<TokenStream, Error> {
    let mut scanner = Scanner {
        src: input,
        pos: 0,
        tokens: SmallVec::new(),
    };
    scanner.run()?;
    Ok(TokenStream::new(scanner.tokens.into_vec(), input.len()))
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    tokens: SmallVec<[Token; 16]>,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut it = self.src[self.pos..].chars();
        it.next();
        it.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, start));
    }

    fn run(&mut self) -> Result<(), Error> {
        while let Some(ch) = self.peek() {
            let start = self.pos;
            match classify(ch) {
                CharClass::Whitespace => {
                    self.bump();
                }
                CharClass::LParen => self.single(TokenKind::LParen, start),
                CharClass::RParen => self.single(TokenKind::RParen, start),
                CharClass::At => self.single(TokenKind::At, start),
                CharClass::Question => self.single(TokenKind::Question, start),
                CharClass::Star => self.single(TokenKind::Star, start),
                CharClass::Equals => self.single(TokenKind::Eq, start),
                CharClass::Bang => {
                    self.bump();
                    if self.peek() != Some('=') {
                        return Err(Error::lexical(start, "'!' must be followed by '='"));
                    }
                    self.bump();
                    self.push(TokenKind::Ne, start);
                }
                CharClass::Less => self.relational(TokenKind::Lt, TokenKind::Le, start),
                CharClass::Greater => self.relational(TokenKind::Gt, TokenKind::Ge, start),
                CharClass::Quote => self.string_literal(ch, start)?,
                CharClass::Digit => self.number(start)?,
                CharClass::NameStart => self.name(start)?,
                CharClass::Period => {
                    return Err(Error::lexical(start, "numeric literal must start with a digit"));
                }
                CharClass::Colon => return Err(Error::lexical(start, "unexpected ':'")),
                CharClass::NamePart | CharClass::Invalid => {
                    let message = if is_xml_char(ch) {
                        format!("unexpected character '{ch}'")
                    } else {
                        format!("invalid XML character U+{:04X}", u32::from(ch))
                    };
                    return Err(Error::lexical(start, message));
                }
            }
        }
        Ok(())
    }

    fn single(&mut self, kind: TokenKind, start: usize) {
        self.bump();
        self.push(kind, start);
    }

    fn relational(&mut self, bare: TokenKind, with_eq: TokenKind, start: usize) {
        self.bump();
        if self.peek() == Some('=') {
            self.bump();
            self.push(with_eq, start);
        } else {
            self.push(bare, start);
        }
    }

    fn string_literal(&mut self, delim: char, start: usize) -> Result<(), Error> {
        self.bump();
        let body_start = self.pos;
        loop {
            match self.bump() {
                None => return Err(Error::lexical(start, "unterminated string literal")),
                Some(c) if c == delim => break,
                Some(c) if !is_xml_char(c) => {
                    return Err(Error::lexical(
                        self.pos - c.len_utf8(),
                        format!("invalid XML character U+{:04X}", u32::from(c)),
                    ));
                }
                Some(_) => {}
            }
        }
        let body = &self.src[body_start..self.pos - delim.len_utf8()];
        self.tokens.push(Token::with_text(TokenKind::String, body, start));
        Ok(())
    }

    fn digits(&mut self) -> usize {
        let from = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.pos - from
    }

    fn number(&mut self, start: usize) -> Result<(), Error> {
        self.digits();
        if self.peek() == Some('.') {
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.digits() == 0 {
                return Err(Error::lexical(start, "malformed exponent in numeric literal"));
            }
        }
        // `1.2.3`, `12abc` and the like
        if let Some(next) = self.peek()
            && (next == '.' || matches!(classify(next), CharClass::NameStart | CharClass::NamePart))
        {
            return Err(Error::lexical(start, "malformed numeric literal"));
        }
        let text = &self.src[start..self.pos];
        self.tokens.push(Token::with_text(TokenKind::Number, text, start));
        Ok(())
    }

    fn skip_ncname(&mut self) {
        while self.peek().is_some_and(is_ncname_char) {
            self.bump();
        }
    }

    fn name(&mut self, start: usize) -> Result<(), Error> {
        self.skip_ncname();
        let prefix_end = self.pos;
        if self.peek() != Some(':') {
            let word = &self.src[start..prefix_end];
            let token = match word {
                "and" => Token::new(TokenKind::And, start),
                "or" => Token::new(TokenKind::Or, start),
                "cast" => Token::new(TokenKind::Cast, start),
                "as" => Token::new(TokenKind::As, start),
                _ => Token::with_text(TokenKind::NCName, word, start),
            };
            self.tokens.push(token);
            return Ok(());
        }
        match self.peek_second() {
            Some('*') => {
                self.bump();
                self.bump();
                let prefix = &self.src[start..prefix_end];
                self.tokens.push(Token::with_text(TokenKind::NsWildcard, prefix, start));
                Ok(())
            }
            Some(c) if is_ncname_start_char(c) => {
                self.bump();
                self.skip_ncname();
                let qname = &self.src[start..self.pos];
                self.tokens.push(Token::with_text(TokenKind::QName, qname, start));
                Ok(())
            }
            _ => Err(Error::lexical(
                prefix_end,
                "':' must be followed by a local name or '*'",
            )),
        }
    }
}
