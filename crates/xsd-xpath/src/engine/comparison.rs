//! Type comparability and the six comparators.

use core::cmp::Ordering;
use itertools::Itertools;
use smallvec::SmallVec;

use super::Resolved;
use crate::datatypes::{Ordered, PrimitiveKind, TypeDescriptor, TypeRef, Variety};
use crate::parser::ast::CompOp;

/// Item types of a list, or of every member of a union of lists. `None` for
/// anything else.
fn list_item_types(t: &dyn TypeDescriptor) -> Option<SmallVec<[&TypeRef; 2]>> {
    match t.variety() {
        Variety::Atomic => None,
        Variety::List => Some(t.item_or_member_types().iter().collect()),
        Variety::Union => {
            let members = t.item_or_member_types();
            if members.is_empty() || members.iter().any(|m| m.variety() != Variety::List) {
                return None;
            }
            Some(members.iter().flat_map(|m| m.item_or_member_types()).collect())
        }
    }
}

fn primitives_comparable(a: PrimitiveKind, b: PrimitiveKind) -> bool {
    a == b
        || matches!(
            (a, b),
            (PrimitiveKind::AnySimpleType, PrimitiveKind::String) | (PrimitiveKind::String, PrimitiveKind::AnySimpleType)
        )
}

/// Whether values of `a` and `b` may be compared at all.
pub fn comparable(a: &dyn TypeDescriptor, b: &dyn TypeDescriptor) -> bool {
    match (list_item_types(a), list_item_types(b)) {
        (Some(xs), Some(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip_eq(ys.iter())
                    .all(|(x, y)| comparable(&***x, &***y))
        }
        (None, None) => primitives_comparable(a.primitive_kind(), b.primitive_kind()),
        _ => false,
    }
}

/// Applies `op` to two resolved operands. Incomparable types, comparators
/// other than `=`/`!=` on unordered types and indeterminate pairs all give
/// `false`. Comparability and equality follow the effective types; a union
/// declaration keeps the operand unordered.
pub(crate) fn compare(op: CompOp, left: &Resolved<'_>, right: &Resolved<'_>) -> bool {
    if !comparable(left.type_def, right.type_def) {
        return false;
    }
    let lt = left.type_def;
    match op {
        CompOp::Eq => lt.is_equal(&left.value, &right.value),
        CompOp::Ne => !lt.is_equal(&left.value, &right.value),
        CompOp::Lt | CompOp::Le | CompOp::Gt | CompOp::Ge => {
            let unordered = [left.declared, left.type_def, right.declared, right.type_def]
                .iter()
                .any(|t| t.ordered() == Ordered::Unordered);
            if unordered {
                return false;
            }
            let Some(ord) = lt.compare(&left.value, &right.value) else {
                return false;
            };
            match op {
                CompOp::Lt => ord == Ordering::Less,
                CompOp::Le => ord != Ordering::Greater,
                CompOp::Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{BuiltinKind, SimpleType};

    fn t(kind: BuiltinKind) -> TypeRef {
        SimpleType::builtin(kind)
    }

    #[test]
    fn same_primitive_is_comparable() {
        assert!(comparable(t(BuiltinKind::Byte).as_ref(), t(BuiltinKind::Decimal).as_ref()));
        assert!(comparable(t(BuiltinKind::AnySimpleType).as_ref(), t(BuiltinKind::Token).as_ref()));
        assert!(!comparable(t(BuiltinKind::Boolean).as_ref(), t(BuiltinKind::Date).as_ref()));
        assert!(!comparable(t(BuiltinKind::Float).as_ref(), t(BuiltinKind::Double).as_ref()));
    }

    #[test]
    fn lists_compare_by_item_types() {
        let ints = SimpleType::list(None, t(BuiltinKind::Int));
        let decimals = SimpleType::list(None, t(BuiltinKind::Decimal));
        let dates = SimpleType::list(None, t(BuiltinKind::Date));
        assert!(comparable(&ints, &decimals));
        assert!(!comparable(&ints, &dates));
        assert!(!comparable(&ints, t(BuiltinKind::Int).as_ref()));

        let union_of_lists = SimpleType::union(None, [ints.clone().into_ref(), dates.clone().into_ref()]);
        let other = SimpleType::union(None, [decimals.into_ref(), dates.into_ref()]);
        assert!(comparable(&union_of_lists, &other));
        assert!(!comparable(&union_of_lists, &ints));
    }
}
