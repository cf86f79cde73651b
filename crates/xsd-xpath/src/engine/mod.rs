//! Evaluation of compiled test expressions against an element's attributes.

mod casting;
pub mod comparison;

use compact_str::CompactString;
use core::fmt;
use std::borrow::Cow;
use tracing::{Level, trace};

use crate::datatypes::{AtomicValue, BuiltinKind, TypeDescriptor, TypedValue};
use crate::model::{AttributeView, ExpandedName};
use crate::parser::ast::{BoolOp, Cast, Expr, Operand};
use casting::{cast_value, trace_failure};

/// A compiled test expression. Immutable once built and shareable across
/// threads; evaluation only reads it.
#[derive(Debug, Clone)]
pub struct Expression {
    source: CompactString,
    root: Expr,
}

/// An operand reduced to a value and the type governing it.
pub(crate) struct Resolved<'a> {
    pub value: Cow<'a, TypedValue>,
    /// Effective type: the validating member of a union, else `declared`.
    pub type_def: &'a dyn TypeDescriptor,
    pub declared: &'a dyn TypeDescriptor,
}

impl Expression {
    pub(crate) fn new(source: &str, root: Expr) -> Self {
        Self {
            source: source.into(),
            root,
        }
    }

    /// The expression text as compiled.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Evaluates the expression for one element. Absent attributes,
    /// incomparable types and failed casts make the smallest enclosing test
    /// `false`; evaluation itself never fails.
    pub fn evaluate<A: AttributeView + ?Sized>(&self, element: &ExpandedName, attrs: &A) -> bool {
        let result = Evaluator { element, attrs }.eval(&self.root);
        trace!(element = %element, expression = %self.source, result, "evaluated test expression");
        result
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

struct Evaluator<'a, A: ?Sized> {
    element: &'a ExpandedName,
    attrs: &'a A,
}

impl<'a, A: AttributeView + ?Sized> Evaluator<'a, A> {
    fn eval(&self, expr: &'a Expr) -> bool {
        match expr {
            Expr::Conjunction { op: BoolOp::And, terms } => terms.iter().all(|t| self.eval(t)),
            Expr::Conjunction { op: BoolOp::Or, terms } => terms.iter().any(|t| self.eval(t)),
            Expr::Not(inner) => !self.eval(inner),
            Expr::Comparison { op, left, right } => {
                let (Some(l), Some(r)) = (self.resolve(left), self.resolve(right)) else {
                    return false;
                };
                let result = comparison::compare(*op, &l, &r);
                if !result && tracing::enabled!(Level::TRACE) && !comparison::comparable(l.type_def, r.type_def) {
                    trace!(
                        element = %self.element,
                        left = %left,
                        right = %right,
                        "operand types are not comparable"
                    );
                }
                result
            }
            Expr::Operand(operand) => self.exists(operand),
        }
    }

    /// Reduces an operand to a typed value; `None` when an attribute is
    /// absent or a cast fails.
    fn resolve(&self, operand: &'a Operand) -> Option<Resolved<'a>> {
        match operand {
            Operand::Literal(lit) => Some(Resolved {
                value: Cow::Borrowed(&lit.value),
                type_def: lit.type_def.as_ref(),
                declared: lit.type_def.as_ref(),
            }),
            Operand::Attribute(name) => match self.attrs.get(&name.name) {
                Some(attr) => Some(Resolved {
                    value: Cow::Borrowed(attr.value),
                    type_def: attr.effective_type(),
                    declared: attr.type_def,
                }),
                None => {
                    trace!(element = %self.element, attribute = %name, "attribute absent");
                    None
                }
            },
            Operand::Cast(cast) => self.cast(cast).map(|value| Resolved {
                value: Cow::Owned(value),
                type_def: cast.target.as_ref(),
                declared: cast.target.as_ref(),
            }),
        }
    }

    fn cast(&self, cast: &'a Cast) -> Option<TypedValue> {
        match cast_value(cast, self.attrs) {
            Ok(value) => Some(value),
            Err(failure) => {
                trace_failure(self.element, cast, &failure);
                None
            }
        }
    }

    /// An operand standing alone as a test: present and, when numeric,
    /// nonzero. A cast to `xs:boolean` yields the cast value.
    fn exists(&self, operand: &'a Operand) -> bool {
        if let Operand::Cast(cast) = operand {
            let Some(value) = self.cast(cast) else {
                return false;
            };
            return match (cast.target.built_in_kind(), value.as_atomic()) {
                (BuiltinKind::Boolean, Some(AtomicValue::Boolean(b))) => *b,
                (_, Some(atomic)) if cast.target.is_numeric() => !atomic.is_zero_like(),
                _ => true,
            };
        }
        let Some(resolved) = self.resolve(operand) else {
            return false;
        };
        if !resolved.type_def.is_numeric() {
            return true;
        }
        resolved.value.as_atomic().is_none_or(|a| !a.is_zero_like())
    }
}
