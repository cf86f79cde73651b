//! Recursive-descent parser for test expressions.
//!
//! ```text
//! Expr        := OrExpr
//! OrExpr      := AndExpr ( 'or' AndExpr )*
//! AndExpr     := BoolTerm ( 'and' BoolTerm )*
//! BoolTerm    := '(' OrExpr ')' | NotCall | Comparison | Operand
//! NotCall     := QName '(' OrExpr ')'
//! Comparison  := Operand Comparator Operand
//! Operand     := CastExpr | AttrRef | Literal
//! CastExpr    := (AttrRef | Literal) 'cast' 'as' QName '?'?
//! AttrRef     := '@' QName
//! ```

pub mod ast;
pub mod lexer;
pub mod tokens;

use crate::consts::FN;
use crate::datatypes::{AtomicValue, BuiltinKind, BuiltinTypes, TypeResolver, Variety, lexical};
use crate::model::{Atom, ExpandedName};
use crate::runtime::{CompileOptions, Error, ErrorCode, NamespaceResolver};
use ast::{BoolOp, Cast, CastSource, CompOp, Expr, Literal, LiteralKind, Operand, QName};
pub use lexer::scan;
use tokens::{Token, TokenKind, TokenStream};

/// Everything the parser needs besides the tokens.
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub namespaces: &'a dyn NamespaceResolver,
    pub types: &'a dyn TypeResolver,
    /// Namespace of unprefixed function names.
    pub default_function_namespace: Option<&'a Atom>,
    /// Namespace of unprefixed `cast as` targets.
    pub default_type_namespace: Option<&'a Atom>,
    pub options: CompileOptions,
}

/// Scans and parses `input` into a syntax tree.
pub fn parse_expression(input: &str, ctx: &ParseContext<'_>) -> Result<Expr, Error> {
    parse(scan(input)?, ctx)
}

/// Parses a scanned token stream. The whole stream must form one expression.
pub fn parse(tokens: TokenStream, ctx: &ParseContext<'_>) -> Result<Expr, Error> {
    if tokens.is_empty() {
        return Err(Error::syntax(ErrorCode::XPST0003, 0, "empty expression"));
    }
    let mut parser = Parser {
        tokens,
        ctx,
        depth: 0,
    };
    let expr = parser.parse_or_expr()?;
    if let Some(tok) = parser.tokens.peek() {
        return Err(Error::syntax(
            ErrorCode::XPST0003,
            tok.offset,
            format!("unexpected {} after end of expression", tok.kind.describe()),
        ));
    }
    Ok(expr)
}

struct Parser<'c, 'a> {
    tokens: TokenStream,
    ctx: &'c ParseContext<'a>,
    depth: usize,
}

impl Parser<'_, '_> {
    fn error(&self, msg: impl Into<String>) -> Error {
        Error::syntax(ErrorCode::XPST0003, self.tokens.offset(), msg)
    }

    fn found(&self) -> &'static str {
        self.tokens.peek_kind().map_or("end of expression", TokenKind::describe)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        match self.tokens.eat(kind) {
            Some(tok) => Ok(tok),
            None => Err(self.error(format!("expected {}, found {}", kind.describe(), self.found()))),
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.ctx.options.max_depth {
            return Err(self.error(format!(
                "expression nesting exceeds the limit of {}",
                self.ctx.options.max_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_or_expr(&mut self) -> Result<Expr, Error> {
        let mut terms = vec![self.parse_and_expr()?];
        while self.tokens.eat(TokenKind::Or).is_some() {
            terms.push(self.parse_and_expr()?);
        }
        Ok(conjunction(BoolOp::Or, terms))
    }

    fn parse_and_expr(&mut self) -> Result<Expr, Error> {
        let mut terms = vec![self.parse_bool_term()?];
        while self.tokens.eat(TokenKind::And).is_some() {
            terms.push(self.parse_bool_term()?);
        }
        Ok(conjunction(BoolOp::And, terms))
    }

    fn parse_bool_term(&mut self) -> Result<Expr, Error> {
        match self.tokens.peek_kind() {
            Some(TokenKind::LParen) => {
                let open = self.tokens.offset();
                self.enter()?;
                self.tokens.next_token();
                let inner = self.parse_or_expr()?;
                self.expect(TokenKind::RParen)?;
                self.leave();
                if self.tokens.peek_kind().is_some_and(TokenKind::is_comparator) {
                    return Err(Error::syntax(
                        ErrorCode::XPST0003,
                        open,
                        "a parenthesized expression cannot be an operand of a comparison",
                    ));
                }
                Ok(inner)
            }
            Some(TokenKind::NCName | TokenKind::QName)
                if self.tokens.peek_nth_kind(1) == Some(TokenKind::LParen) =>
            {
                self.parse_not_call()
            }
            Some(TokenKind::At | TokenKind::Number | TokenKind::String) => {
                let left = self.parse_operand()?;
                let Some(op) = self.comparator() else {
                    return Ok(Expr::Operand(left));
                };
                let right = self.parse_operand()?;
                Ok(Expr::Comparison { op, left, right })
            }
            Some(TokenKind::NCName | TokenKind::QName) => {
                Err(self.error("path expressions are not supported; use '@name' to refer to an attribute"))
            }
            Some(TokenKind::Star | TokenKind::NsWildcard) => Err(self.error("wildcards are not supported here")),
            _ => Err(self.error(format!("expected an expression, found {}", self.found()))),
        }
    }

    fn parse_not_call(&mut self) -> Result<Expr, Error> {
        let offset = self.tokens.offset();
        self.enter()?;
        let Some(tok) = self.tokens.next_token() else {
            return Err(self.error("expected a function name"));
        };
        let name = self.resolve_name(&tok, self.ctx.default_function_namespace)?;
        if name.name.ns_uri.as_deref() != Some(FN) || &*name.name.local != "not" {
            return Err(Error::syntax(
                ErrorCode::XPST0017,
                offset,
                format!("unknown function '{name}'; only fn:not is available"),
            ));
        }
        self.expect(TokenKind::LParen)?;
        let inner = self.parse_or_expr()?;
        self.expect(TokenKind::RParen)?;
        self.leave();
        Ok(Expr::Not(Box::new(inner)))
    }

    fn comparator(&mut self) -> Option<CompOp> {
        let op = match self.tokens.peek_kind()? {
            TokenKind::Eq => CompOp::Eq,
            TokenKind::Ne => CompOp::Ne,
            TokenKind::Lt => CompOp::Lt,
            TokenKind::Le => CompOp::Le,
            TokenKind::Gt => CompOp::Gt,
            TokenKind::Ge => CompOp::Ge,
            _ => return None,
        };
        self.tokens.next_token();
        Some(op)
    }

    fn parse_operand(&mut self) -> Result<Operand, Error> {
        let source = match self.tokens.peek_kind() {
            Some(TokenKind::At) => {
                self.tokens.next_token();
                CastSource::Attribute(self.parse_attribute_name()?)
            }
            Some(TokenKind::Number | TokenKind::String) => match self.tokens.next_token() {
                Some(tok) => CastSource::Literal(literal(&tok)?),
                None => return Err(self.error("expected a literal")),
            },
            _ => return Err(self.error(format!("expected an operand, found {}", self.found()))),
        };
        if self.tokens.eat(TokenKind::Cast).is_none() {
            return Ok(match source {
                CastSource::Attribute(name) => Operand::Attribute(name),
                CastSource::Literal(lit) => Operand::Literal(lit),
            });
        }
        self.expect(TokenKind::As)?;
        let offset = self.tokens.offset();
        let Some(tok) = self.name_token() else {
            return Err(self.error(format!("expected a type name after 'cast as', found {}", self.found())));
        };
        let target_name = self.resolve_name(&tok, self.ctx.default_type_namespace)?;
        let target = self.ctx.types.resolve_type(&target_name.name).ok_or_else(|| {
            Error::syntax(ErrorCode::XPST0051, offset, format!("unknown type '{target_name}'"))
        })?;
        if target.variety() == Variety::List || (target.is_builtin() && !target.built_in_kind().is_castable_target()) {
            return Err(Error::syntax(
                ErrorCode::XPST0080,
                offset,
                format!("'{target_name}' cannot be the target of a cast"),
            ));
        }
        if !target.is_builtin() || target.variety() != Variety::Atomic {
            return Err(Error::syntax(
                ErrorCode::XPST0051,
                offset,
                format!("'{target_name}' is not a built-in atomic type"),
            ));
        }
        let optional = self.tokens.eat(TokenKind::Question).is_some();
        Ok(Operand::Cast(Box::new(Cast {
            inner: source,
            target_name,
            target,
            optional,
        })))
    }

    fn parse_attribute_name(&mut self) -> Result<QName, Error> {
        match self.tokens.peek_kind() {
            Some(TokenKind::Star | TokenKind::NsWildcard) => Err(self.error("attribute wildcards are not supported")),
            _ => match self.name_token() {
                // unprefixed attribute names are in no namespace
                Some(tok) => self.resolve_name(&tok, None),
                None => Err(self.error(format!("expected an attribute name after '@', found {}", self.found()))),
            },
        }
    }

    /// Takes a name where the grammar requires one; keywords count as names.
    fn name_token(&mut self) -> Option<Token> {
        let kind = self.tokens.peek_kind()?;
        if kind == TokenKind::NCName || kind == TokenKind::QName || kind.is_keyword() {
            self.tokens.next_token()
        } else {
            None
        }
    }

    fn resolve_name(&self, tok: &Token, default_ns: Option<&Atom>) -> Result<QName, Error> {
        let lexical = match tok.kind {
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Cast => "cast",
            TokenKind::As => "as",
            _ => tok.text(),
        };
        match lexical.split_once(':') {
            Some((prefix, local)) => {
                let uri = self.ctx.namespaces.resolve_prefix(prefix).ok_or_else(|| {
                    Error::syntax(
                        ErrorCode::XPST0081,
                        tok.offset,
                        format!("namespace prefix '{prefix}' is not bound"),
                    )
                })?;
                Ok(QName {
                    prefix: Some(Atom::from(prefix)),
                    name: ExpandedName {
                        ns_uri: Some(uri),
                        local: Atom::from(local),
                    },
                })
            }
            None => Ok(QName {
                prefix: None,
                name: ExpandedName {
                    ns_uri: default_ns.cloned(),
                    local: Atom::from(lexical),
                },
            }),
        }
    }
}

/// Wraps two or more terms in one flat node; a single term stands alone.
fn conjunction(op: BoolOp, terms: Vec<Expr>) -> Expr {
    match <[Expr; 1]>::try_from(terms) {
        Ok([only]) => only,
        Err(terms) => Expr::Conjunction { op, terms },
    }
}

fn literal(tok: &Token) -> Result<Literal, Error> {
    let text = tok.text.clone().unwrap_or_default();
    if tok.kind == TokenKind::String {
        let value = AtomicValue::String(text.clone()).into();
        return Ok(Literal {
            text,
            kind: LiteralKind::String,
            value,
            type_def: BuiltinTypes::get(BuiltinKind::String),
        });
    }
    let out_of_range = || {
        Error::syntax(
            ErrorCode::XPST0003,
            tok.offset,
            format!("numeric literal '{text}' is out of range"),
        )
    };
    let (kind, value, type_kind) = if text.contains(['e', 'E']) {
        let value = lexical::parse_floating(&text).ok_or_else(out_of_range)?;
        (LiteralKind::Double, AtomicValue::Double(value), BuiltinKind::Double)
    } else {
        let value = lexical::parse_decimal(&text).ok_or_else(out_of_range)?;
        (LiteralKind::Decimal, AtomicValue::Decimal(value), BuiltinKind::Decimal)
    };
    Ok(Literal {
        text,
        kind,
        value: value.into(),
        type_def: BuiltinTypes::get(type_kind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::TypedValue;
    use crate::runtime::StaticContext;
    use rust_decimal::Decimal;

    fn parse_str(input: &str) -> Result<Expr, Error> {
        let sc = StaticContext::default();
        let ctx = ParseContext {
            namespaces: &sc,
            types: &BuiltinTypes,
            default_function_namespace: sc.default_function_namespace.as_ref(),
            default_type_namespace: None,
            options: CompileOptions::default(),
        };
        parse_expression(input, &ctx)
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse_str("@a = 1 or @b = 2 and @c = 3").unwrap();
        let Expr::Conjunction { op: BoolOp::Or, terms } = expr else {
            panic!("expected or at the root");
        };
        assert_eq!(terms.len(), 2);
        assert!(matches!(terms[1], Expr::Conjunction { op: BoolOp::And, .. }));
    }

    #[test]
    fn chains_are_flat() {
        let expr = parse_str("@a = 1 and @b = 2 and @c = 3 and @d = 4").unwrap();
        let Expr::Conjunction { op: BoolOp::And, terms } = &expr else {
            panic!("expected and at the root");
        };
        assert_eq!(terms.len(), 4);
        assert!(terms.iter().all(|t| matches!(t, Expr::Comparison { .. })));
        assert_eq!(expr.node_count(), 13);
    }

    #[test]
    fn keywords_as_names() {
        let expr = parse_str("@and cast as xs:boolean").unwrap();
        assert_eq!(expr.to_string(), "@and cast as xs:boolean");
    }

    #[test]
    fn exponent_literal_is_double() {
        let Expr::Comparison { right: Operand::Literal(lit), .. } = parse_str("@x = 1e2").unwrap() else {
            panic!("expected a comparison with a literal");
        };
        assert_eq!(lit.kind, LiteralKind::Double);
        assert_eq!(lit.value, TypedValue::Atomic(AtomicValue::Double(100.0)));
    }

    #[test]
    fn dangling_dot_literal_is_decimal() {
        let Expr::Operand(Operand::Literal(lit)) = parse_str("5.").unwrap() else {
            panic!("expected a literal");
        };
        assert_eq!(lit.value, TypedValue::Atomic(AtomicValue::Decimal(Decimal::from(5))));
    }
}
