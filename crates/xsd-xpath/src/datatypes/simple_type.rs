//! Stock [`TypeDescriptor`] implementation for built-in and user-derived
//! simple types.

use core::cmp::Ordering;
use smallvec::SmallVec;
use std::sync::Arc;

use super::builtin::{BuiltinKind, PrimitiveKind, WhiteSpace};
use super::lexical::parse_atomic;
use super::value::{AtomicValue, TypedValue, atomic_compare, typed_equal};
use super::{InvalidLexical, Ordered, TypeDescriptor, TypeRef, Variety};
use crate::consts::XS;
use crate::model::ExpandedName;
use crate::xml_chars::{collapse_whitespace, replace_whitespace};

/// A simple type definition: a built-in, a list of an item type, a union of
/// member types, or a restriction of any of those.
#[derive(Debug, Clone)]
pub struct SimpleType {
    name: Option<ExpandedName>,
    kind: BuiltinKind,
    builtin: bool,
    variety: Variety,
    members: SmallVec<[TypeRef; 2]>,
}

impl SimpleType {
    pub(crate) fn atomic_builtin(kind: BuiltinKind) -> Self {
        Self {
            name: Some(ExpandedName::new(Some(XS), kind.local_name())),
            kind,
            builtin: true,
            variety: Variety::Atomic,
            members: SmallVec::new(),
        }
    }

    pub(crate) fn list_builtin(kind: BuiltinKind, item: TypeRef) -> Self {
        Self {
            name: Some(ExpandedName::new(Some(XS), kind.local_name())),
            kind,
            builtin: true,
            variety: Variety::List,
            members: SmallVec::from_elem(item, 1),
        }
    }

    /// The shared built-in definition for `kind`.
    pub fn builtin(kind: BuiltinKind) -> TypeRef {
        super::BuiltinTypes::get(kind)
    }

    /// A list type whose items are values of `item`.
    pub fn list(name: Option<ExpandedName>, item: TypeRef) -> Self {
        Self {
            name,
            kind: BuiltinKind::AnySimpleType,
            builtin: false,
            variety: Variety::List,
            members: SmallVec::from_elem(item, 1),
        }
    }

    /// A union type; a lexical value takes the first member that accepts it.
    pub fn union(name: Option<ExpandedName>, members: impl IntoIterator<Item = TypeRef>) -> Self {
        Self {
            name,
            kind: BuiltinKind::AnySimpleType,
            builtin: false,
            variety: Variety::Union,
            members: members.into_iter().collect(),
        }
    }

    /// A named restriction of `base` with the same value space.
    pub fn restriction(name: Option<ExpandedName>, base: &dyn TypeDescriptor) -> Self {
        Self {
            name,
            kind: base.built_in_kind(),
            builtin: false,
            variety: base.variety(),
            members: base.item_or_member_types().iter().cloned().collect(),
        }
    }

    /// Wraps the definition in a [`TypeRef`].
    pub fn into_ref(self) -> TypeRef {
        Arc::new(self)
    }

    fn invalid(&self, lexical: &str) -> InvalidLexical {
        let type_name = match &self.name {
            Some(n) => n.to_string().into(),
            None => format!("anonymous type derived from {}", self.kind).into(),
        };
        InvalidLexical {
            type_name,
            lexical: lexical.into(),
        }
    }

    /// The primitive shared by every union member, if there is one.
    fn common_member_primitive(&self) -> Option<PrimitiveKind> {
        let mut kinds = self
            .members
            .iter()
            .map(|m| (m.variety() == Variety::Atomic).then(|| m.primitive_kind()));
        let first = kinds.next()??;
        kinds.all(|k| k == Some(first)).then_some(first)
    }

    fn validate_atomic(&self, lexical: &str) -> Result<TypedValue, InvalidLexical> {
        let parsed = match self.kind.whitespace() {
            WhiteSpace::Preserve => parse_atomic(self.kind, lexical),
            WhiteSpace::Replace => parse_atomic(self.kind, &replace_whitespace(lexical)),
            WhiteSpace::Collapse => parse_atomic(self.kind, &collapse_whitespace(lexical)),
        };
        parsed.map(TypedValue::Atomic).ok_or_else(|| self.invalid(lexical))
    }

    fn validate_list(&self, lexical: &str) -> Result<TypedValue, InvalidLexical> {
        let Some(item) = self.members.first() else {
            return Err(self.invalid(lexical));
        };
        let collapsed = collapse_whitespace(lexical);
        let mut items: Vec<AtomicValue> = Vec::new();
        for token in collapsed.split(' ').filter(|t| !t.is_empty()) {
            match item.validate(token) {
                Ok(TypedValue::Atomic(v)) => items.push(v),
                Ok(TypedValue::List(_)) | Err(_) => return Err(self.invalid(lexical)),
            }
        }
        // built-in lists carry minLength 1
        if self.builtin && items.is_empty() {
            return Err(self.invalid(lexical));
        }
        Ok(TypedValue::List(items))
    }

    /// The value and the innermost member that accepted it; members of a
    /// nested union are searched in place.
    fn validate_union(&self, lexical: &str) -> Result<(TypedValue, TypeRef), InvalidLexical> {
        self.members
            .iter()
            .find_map(|m| {
                let (value, inner) = m.validate_member(lexical).ok()?;
                Some((value, inner.unwrap_or_else(|| Arc::clone(m))))
            })
            .ok_or_else(|| self.invalid(lexical))
    }
}

impl TypeDescriptor for SimpleType {
    fn name(&self) -> Option<&ExpandedName> {
        self.name.as_ref()
    }

    fn built_in_kind(&self) -> BuiltinKind {
        self.kind
    }

    fn is_builtin(&self) -> bool {
        self.builtin
    }

    fn primitive_kind(&self) -> PrimitiveKind {
        match self.variety {
            Variety::Union => self.common_member_primitive().unwrap_or(PrimitiveKind::AnySimpleType),
            Variety::Atomic | Variety::List => self.kind.primitive(),
        }
    }

    fn ordered(&self) -> Ordered {
        match self.variety {
            Variety::List | Variety::Union => Ordered::Unordered,
            Variety::Atomic => match self.kind.primitive() {
                PrimitiveKind::Decimal => Ordered::Total,
                PrimitiveKind::Float
                | PrimitiveKind::Double
                | PrimitiveKind::Duration
                | PrimitiveKind::DateTime
                | PrimitiveKind::Time
                | PrimitiveKind::Date
                | PrimitiveKind::GYearMonth
                | PrimitiveKind::GYear
                | PrimitiveKind::GMonthDay
                | PrimitiveKind::GDay
                | PrimitiveKind::GMonth => Ordered::Partial,
                _ => Ordered::Unordered,
            },
        }
    }

    fn variety(&self) -> Variety {
        self.variety
    }

    fn item_or_member_types(&self) -> &[TypeRef] {
        &self.members
    }

    fn validate(&self, lexical: &str) -> Result<TypedValue, InvalidLexical> {
        match self.variety {
            Variety::Atomic => self.validate_atomic(lexical),
            Variety::List => self.validate_list(lexical),
            Variety::Union => self.validate_union(lexical).map(|(value, _)| value),
        }
    }

    fn validate_member(&self, lexical: &str) -> Result<(TypedValue, Option<TypeRef>), InvalidLexical> {
        match self.variety {
            Variety::Union => self.validate_union(lexical).map(|(value, member)| (value, Some(member))),
            Variety::Atomic | Variety::List => self.validate(lexical).map(|value| (value, None)),
        }
    }

    fn is_equal(&self, a: &TypedValue, b: &TypedValue) -> bool {
        typed_equal(a, b)
    }

    fn compare(&self, a: &TypedValue, b: &TypedValue) -> Option<Ordering> {
        if self.ordered() == Ordered::Unordered {
            return None;
        }
        atomic_compare(a.as_atomic()?, b.as_atomic()?)
    }
}
