use std::collections::HashMap;

use crate::consts::{FN, XML, XS};
use crate::model::Atom;

/// XPath static error codes raised while compiling a test expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    XPST0003, // grammar or lexical error, nesting too deep
    XPST0017, // unknown function
    XPST0051, // unknown cast target type
    XPST0080, // cast target is abstract, NOTATION or a list type
    XPST0081, // unbound namespace prefix
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::XPST0003 => "err:XPST0003",
            ErrorCode::XPST0017 => "err:XPST0017",
            ErrorCode::XPST0051 => "err:XPST0051",
            ErrorCode::XPST0080 => "err:XPST0080",
            ErrorCode::XPST0081 => "err:XPST0081",
        }
    }

    /// Parses `err:XPST0003` or the bare local part.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.strip_prefix("err:").unwrap_or(s) {
            "XPST0003" => Some(ErrorCode::XPST0003),
            "XPST0017" => Some(ErrorCode::XPST0017),
            "XPST0051" => Some(ErrorCode::XPST0051),
            "XPST0080" => Some(ErrorCode::XPST0080),
            "XPST0081" => Some(ErrorCode::XPST0081),
            _ => None,
        }
    }
}

/// Compile-time failure. Evaluation never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed token, unterminated string literal or invalid character.
    #[error("lexical error at offset {offset}: {message} ({})", .code.as_str())]
    Lexical {
        code: ErrorCode,
        offset: usize,
        message: String,
    },
    /// Grammar violation, unknown function, unbound prefix or bad cast target.
    #[error("syntax error at offset {offset}: {message} ({})", .code.as_str())]
    Syntax {
        code: ErrorCode,
        offset: usize,
        message: String,
    },
}

impl Error {
    pub fn lexical(offset: usize, msg: impl Into<String>) -> Self {
        Error::Lexical {
            code: ErrorCode::XPST0003,
            offset,
            message: msg.into(),
        }
    }

    pub fn syntax(code: ErrorCode, offset: usize, msg: impl Into<String>) -> Self {
        Error::Syntax {
            code,
            offset,
            message: msg.into(),
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, Error::Lexical { .. })
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Lexical { code, .. } | Error::Syntax { code, .. } => *code,
        }
    }

    /// Byte offset into the expression text.
    pub fn offset(&self) -> usize {
        match self {
            Error::Lexical { offset, .. } | Error::Syntax { offset, .. } => *offset,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::Lexical { message, .. } | Error::Syntax { message, .. } => message,
        }
    }
}

/// Maps namespace prefixes to URIs while parsing.
pub trait NamespaceResolver {
    fn resolve_prefix(&self, prefix: &str) -> Option<Atom>;
}

impl<T: NamespaceResolver + ?Sized> NamespaceResolver for &T {
    fn resolve_prefix(&self, prefix: &str) -> Option<Atom> {
        (**self).resolve_prefix(prefix)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceBindings {
    pub by_prefix: HashMap<String, Atom>,
}

impl NamespaceResolver for NamespaceBindings {
    fn resolve_prefix(&self, prefix: &str) -> Option<Atom> {
        self.by_prefix.get(prefix).cloned()
    }
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Maximum nesting of parentheses and `not(...)` calls.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Namespace environment and limits for compiling test expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticContext {
    pub namespaces: NamespaceBindings,
    pub default_function_namespace: Option<Atom>,
    /// Namespace for unprefixed `cast as` targets.
    pub default_type_namespace: Option<Atom>,
    pub options: CompileOptions,
}

impl Default for StaticContext {
    fn default() -> Self {
        let mut ns = NamespaceBindings::default();
        ns.by_prefix.insert("xml".to_string(), Atom::from(XML));
        ns.by_prefix.insert("xs".to_string(), Atom::from(XS));
        ns.by_prefix.insert("fn".to_string(), Atom::from(FN));
        Self {
            namespaces: ns,
            default_function_namespace: Some(Atom::from(FN)),
            default_type_namespace: None,
            options: CompileOptions::default(),
        }
    }
}

impl NamespaceResolver for StaticContext {
    fn resolve_prefix(&self, prefix: &str) -> Option<Atom> {
        self.namespaces.resolve_prefix(prefix)
    }
}

/// Builder for `StaticContext`. The `xml` binding is fixed; `xs` and `fn` are
/// bound by default but may be rebound.
pub struct StaticContextBuilder {
    ctx: StaticContext,
}

impl Default for StaticContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticContextBuilder {
    pub fn new() -> Self {
        Self {
            ctx: StaticContext::default(),
        }
    }

    /// Register a prefix → URI mapping. Attempts to rebind `xml` are ignored.
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: &str) -> Self {
        let p = prefix.into();
        if p == "xml" {
            return self;
        }
        self.ctx.namespaces.by_prefix.insert(p, Atom::from(uri));
        self
    }

    pub fn with_default_function_namespace(mut self, uri: &str) -> Self {
        self.ctx.default_function_namespace = Some(Atom::from(uri));
        self
    }

    pub fn with_default_type_namespace(mut self, uri: &str) -> Self {
        self.ctx.default_type_namespace = Some(Atom::from(uri));
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.ctx.options.max_depth = depth;
        self
    }

    pub fn build(self) -> StaticContext {
        self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_code_and_offset() {
        let e = Error::syntax(ErrorCode::XPST0017, 3, "unknown function 'count'");
        assert_eq!(
            e.to_string(),
            "syntax error at offset 3: unknown function 'count' (err:XPST0017)"
        );
        assert!(!e.is_lexical());
        assert_eq!(e.code(), ErrorCode::XPST0017);
        assert!(Error::lexical(0, "x").is_lexical());
    }

    #[test]
    fn xml_prefix_cannot_be_rebound() {
        let ctx = StaticContextBuilder::new()
            .with_namespace("xml", "urn:evil")
            .with_namespace("xs", "urn:other")
            .build();
        assert_eq!(ctx.resolve_prefix("xml").as_deref(), Some(XML));
        assert_eq!(ctx.resolve_prefix("xs").as_deref(), Some("urn:other"));
    }
}
