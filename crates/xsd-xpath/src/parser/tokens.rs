//! Tokens produced by the scanner and the lookahead cursor the parser reads
//! them through.

use compact_str::CompactString;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LParen,
    RParen,
    And,
    Or,
    Cast,
    As,
    At,
    Question,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Numeric literal; text holds the digits as written.
    Number,
    /// String literal; text holds the content without delimiters.
    String,
    NCName,
    /// `prefix:local`; text holds the whole lexical QName.
    QName,
    /// `*`
    Star,
    /// `prefix:*`; text holds the prefix.
    NsWildcard,
}

impl TokenKind {
    pub fn is_comparator(self) -> bool {
        matches!(self, Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    /// Keywords double as names after `@` and `cast as`.
    pub fn is_keyword(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Cast | Self::As)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::And => "'and'",
            Self::Or => "'or'",
            Self::Cast => "'cast'",
            Self::As => "'as'",
            Self::At => "'@'",
            Self::Question => "'?'",
            Self::Eq => "'='",
            Self::Ne => "'!='",
            Self::Lt => "'<'",
            Self::Le => "'<='",
            Self::Gt => "'>'",
            Self::Ge => "'>='",
            Self::Number => "numeric literal",
            Self::String => "string literal",
            Self::NCName => "name",
            Self::QName => "qualified name",
            Self::Star => "'*'",
            Self::NsWildcard => "namespace wildcard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<CompactString>,
    /// Byte offset of the first character.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Self {
            kind,
            text: None,
            offset,
        }
    }

    pub fn with_text(kind: TokenKind, text: impl Into<CompactString>, offset: usize) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            offset,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.text) {
            (TokenKind::String, Some(t)) => write!(f, "'{t}'"),
            (TokenKind::NsWildcard, Some(t)) => write!(f, "{t}:*"),
            (_, Some(t)) => f.write_str(t),
            (k, None) => f.write_str(k.describe().trim_matches('\'')),
        }
    }
}

/// Forward-only cursor over scanned tokens with arbitrary lookahead.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    /// Length of the source text; the offset reported at end of input.
    end: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>, end: usize) -> Self {
        Self { tokens, pos: 0, end }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Kind of the token `n` positions ahead of the current one.
    pub fn peek_nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token when it has kind `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind() == Some(kind) {
            self.next_token()
        } else {
            None
        }
    }

    /// Offset of the current token, or the end of the source.
    pub fn offset(&self) -> usize {
        self.peek().map_or(self.end, |t| t.offset)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookahead_and_eat() {
        let mut ts = TokenStream::new(
            vec![
                Token::new(TokenKind::At, 0),
                Token::with_text(TokenKind::NCName, "a", 1),
            ],
            2,
        );
        assert_eq!(ts.peek_nth_kind(1), Some(TokenKind::NCName));
        assert!(ts.eat(TokenKind::NCName).is_none());
        assert!(ts.eat(TokenKind::At).is_some());
        assert_eq!(ts.next_token().unwrap().text(), "a");
        assert!(ts.is_at_end());
        assert_eq!(ts.offset(), 2);
    }
}
