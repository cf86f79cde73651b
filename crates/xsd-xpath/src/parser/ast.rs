//! Syntax tree of a compiled test expression. Parentheses are not retained;
//! grouping is carried by the tree shape.

use compact_str::CompactString;
use core::fmt;

use crate::datatypes::{TypeRef, TypedValue};
use crate::model::{Atom, ExpandedName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompOp::Eq => "=",
            CompOp::Ne => "!=",
            CompOp::Lt => "<",
            CompOp::Le => "<=",
            CompOp::Gt => ">",
            CompOp::Ge => ">=",
        }
    }
}

/// A resolved name together with the prefix it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub prefix: Option<Atom>,
    pub name: ExpandedName,
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(p) => write!(f, "{p}:{}", self.name.local),
            None => f.write_str(&self.name.local),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    /// Numeric literal without exponent, typed `xs:decimal`.
    Decimal,
    /// Numeric literal with exponent, typed `xs:double`.
    Double,
}

#[derive(Debug, Clone)]
pub struct Literal {
    /// Source text; string literals without their delimiters.
    pub text: CompactString,
    pub kind: LiteralKind,
    pub value: TypedValue,
    /// `xs:string`, `xs:decimal` or `xs:double`.
    pub type_def: TypeRef,
}

impl Literal {
    pub fn is_numeric(&self) -> bool {
        self.kind != LiteralKind::String
    }
}

#[derive(Debug, Clone)]
pub enum CastSource {
    Attribute(QName),
    Literal(Literal),
}

#[derive(Debug, Clone)]
pub struct Cast {
    pub inner: CastSource,
    pub target_name: QName,
    /// Resolved at compile time; always an atomic built-in.
    pub target: TypeRef,
    /// Written with a trailing `?`.
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub enum Operand {
    Cast(Box<Cast>),
    Attribute(QName),
    Literal(Literal),
}

#[derive(Debug, Clone)]
pub enum Expr {
    /// Two or more terms joined by the same operator, in source order. Chains
    /// are flat, so tree depth only grows with parentheses and `not(...)`.
    Conjunction {
        op: BoolOp,
        terms: Vec<Expr>,
    },
    Comparison {
        op: CompOp,
        left: Operand,
        right: Operand,
    },
    Not(Box<Expr>),
    /// An operand used on its own as an existence test.
    Operand(Operand),
}

impl Expr {
    /// Number of nodes in the tree, operands included.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Conjunction { terms, .. } => 1 + terms.iter().map(Expr::node_count).sum::<usize>(),
            Expr::Comparison { .. } => 3,
            Expr::Not(inner) => 1 + inner.node_count(),
            Expr::Operand(_) => 1,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LiteralKind::String if self.text.contains('\'') => write!(f, "\"{}\"", self.text),
            LiteralKind::String => write!(f, "'{}'", self.text),
            LiteralKind::Decimal | LiteralKind::Double => f.write_str(&self.text),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Attribute(name) => write!(f, "@{name}"),
            Operand::Literal(lit) => write!(f, "{lit}"),
            Operand::Cast(cast) => {
                match &cast.inner {
                    CastSource::Attribute(name) => write!(f, "@{name}")?,
                    CastSource::Literal(lit) => write!(f, "{lit}")?,
                }
                write!(f, " cast as {}", cast.target_name)?;
                if cast.optional {
                    f.write_str("?")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Conjunction { op, terms } => {
                let word = match op {
                    BoolOp::And => " and ",
                    BoolOp::Or => " or ",
                };
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(word)?;
                    }
                    write_side(f, term, *op)?;
                }
                Ok(())
            }
            Expr::Comparison { op, left, right } => write!(f, "{left} {} {right}", op.as_str()),
            Expr::Not(inner) => write!(f, "not({inner})"),
            Expr::Operand(operand) => write!(f, "{operand}"),
        }
    }
}

/// Parenthesizes a conjunction child whose operator differs from its parent's.
fn write_side(f: &mut fmt::Formatter<'_>, side: &Expr, parent: BoolOp) -> fmt::Result {
    match side {
        Expr::Conjunction { op, .. } if *op != parent => write!(f, "({side})"),
        _ => write!(f, "{side}"),
    }
}
