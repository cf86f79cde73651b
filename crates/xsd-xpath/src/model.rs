//! Names and the attribute view an expression is evaluated against.
//!
//! Example:
//! ```
//! use xsd_xpath::model::{AttributeMap, AttributeView, ExpandedName};
//! use xsd_xpath::datatypes::{BuiltinKind, SimpleType};
//!
//! let attrs = AttributeMap::new()
//!     .with("code", SimpleType::builtin(BuiltinKind::Token), " A ")
//!     .unwrap();
//! let code = attrs.get(&ExpandedName::local("code")).unwrap();
//! assert_eq!(code.lexical, "A");
//! ```

use compact_str::CompactString;
use core::fmt;
use std::collections::HashMap;
use string_cache::DefaultAtom;

use crate::consts::XS;
use crate::datatypes::{BuiltinKind, InvalidLexical, SimpleType, TypeDescriptor, TypeRef, TypedValue};
use crate::xml_chars::{collapse_whitespace, replace_whitespace};

/// Interned name or namespace URI.
pub type Atom = DefaultAtom;

/// A namespace URI plus local name. Attribute names without a prefix have no
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName {
    pub ns_uri: Option<Atom>,
    pub local: Atom,
}

impl ExpandedName {
    pub fn new(ns_uri: Option<&str>, local: &str) -> Self {
        Self {
            ns_uri: ns_uri.map(Atom::from),
            local: Atom::from(local),
        }
    }

    /// A name in no namespace.
    pub fn local(local: &str) -> Self {
        Self::new(None, local)
    }
}

impl fmt::Display for ExpandedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ns_uri.as_deref() {
            Some(XS) => write!(f, "xs:{}", self.local),
            Some(ns) => write!(f, "Q{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// A typed attribute as seen by the evaluator: its normalized lexical form,
/// its value and the governing type.
#[derive(Debug, Clone, Copy)]
pub struct TypedAttribute<'a> {
    pub lexical: &'a str,
    pub value: &'a TypedValue,
    /// The declared type.
    pub type_def: &'a dyn TypeDescriptor,
    /// The union member that validated the value, when `type_def` is a union.
    pub member_type: Option<&'a dyn TypeDescriptor>,
}

impl<'a> TypedAttribute<'a> {
    /// The member type if there is one, otherwise the declared type.
    pub fn effective_type(&self) -> &'a dyn TypeDescriptor {
        self.member_type.unwrap_or(self.type_def)
    }
}

/// By-name access to the attributes of the element under test.
pub trait AttributeView {
    fn get(&self, name: &ExpandedName) -> Option<TypedAttribute<'_>>;
}

impl<T: AttributeView + ?Sized> AttributeView for &T {
    fn get(&self, name: &ExpandedName) -> Option<TypedAttribute<'_>> {
        (**self).get(name)
    }
}

#[derive(Debug, Clone)]
struct StoredAttribute {
    lexical: CompactString,
    value: TypedValue,
    type_def: TypeRef,
    member_type: Option<TypeRef>,
}

/// An owned [`AttributeView`] filled from lexical values, validating each one
/// against its declared type the way a schema processor produces typed
/// attributes.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    attrs: HashMap<ExpandedName, StoredAttribute>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `lexical` against `type_def` and stores the result, replacing
    /// any previous attribute of that name.
    pub fn insert(&mut self, name: ExpandedName, type_def: TypeRef, lexical: &str) -> Result<(), InvalidLexical> {
        let (value, member_type) = type_def.validate_member(lexical)?;
        let lexical = normalize(type_def.as_ref(), lexical);
        self.attrs.insert(
            name,
            StoredAttribute {
                lexical,
                value,
                type_def,
                member_type,
            },
        );
        Ok(())
    }

    /// Stores `lexical` as an `xs:anySimpleType` value.
    pub fn insert_untyped(&mut self, name: ExpandedName, lexical: &str) {
        let type_def = SimpleType::builtin(BuiltinKind::AnySimpleType);
        let value = TypedValue::Atomic(crate::datatypes::AtomicValue::String(lexical.into()));
        self.attrs.insert(
            name,
            StoredAttribute {
                lexical: lexical.into(),
                value,
                type_def,
                member_type: None,
            },
        );
    }

    /// Builder form of [`insert`](Self::insert) for an unqualified name.
    pub fn with(mut self, local: &str, type_def: TypeRef, lexical: &str) -> Result<Self, InvalidLexical> {
        self.insert(ExpandedName::local(local), type_def, lexical)?;
        Ok(self)
    }

    pub fn remove(&mut self, name: &ExpandedName) -> bool {
        self.attrs.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl AttributeView for AttributeMap {
    fn get(&self, name: &ExpandedName) -> Option<TypedAttribute<'_>> {
        self.attrs.get(name).map(|a| TypedAttribute {
            lexical: &a.lexical,
            value: &a.value,
            type_def: a.type_def.as_ref(),
            member_type: a.member_type.as_deref(),
        })
    }
}

/// Schema-normalized value: the `whiteSpace` facet of atomic types, collapse
/// for lists and unions.
fn normalize(type_def: &dyn TypeDescriptor, lexical: &str) -> CompactString {
    use crate::datatypes::Variety;
    if type_def.variety() != Variety::Atomic {
        return collapse_whitespace(lexical).into();
    }
    match type_def.built_in_kind() {
        BuiltinKind::String | BuiltinKind::AnySimpleType | BuiltinKind::AnyAtomicType | BuiltinKind::UntypedAtomic => {
            lexical.into()
        }
        BuiltinKind::NormalizedString => replace_whitespace(lexical).into(),
        _ => collapse_whitespace(lexical).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::AtomicValue;
    use rust_decimal::Decimal;

    #[test]
    fn display_forms() {
        assert_eq!(ExpandedName::new(Some(XS), "int").to_string(), "xs:int");
        assert_eq!(ExpandedName::new(Some("urn:a"), "b").to_string(), "Q{urn:a}b");
        assert_eq!(ExpandedName::local("c").to_string(), "c");
    }

    #[test]
    fn insert_validates_and_normalizes() {
        let mut map = AttributeMap::new();
        map.insert(ExpandedName::local("n"), SimpleType::builtin(BuiltinKind::Integer), " 007 ")
            .unwrap();
        let n = map.get(&ExpandedName::local("n")).unwrap();
        assert_eq!(n.lexical, "007");
        assert_eq!(n.value, &TypedValue::Atomic(AtomicValue::Decimal(Decimal::from(7))));
        assert!(map
            .insert(ExpandedName::local("m"), SimpleType::builtin(BuiltinKind::Integer), "seven")
            .is_err());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn union_attributes_remember_their_member() {
        let union = SimpleType::union(
            None,
            [SimpleType::builtin(BuiltinKind::Int), SimpleType::builtin(BuiltinKind::Boolean)],
        )
        .into_ref();
        let map = AttributeMap::new()
            .with("u", union.clone(), "1")
            .and_then(|m| m.with("v", union, " true "))
            .and_then(|m| m.with("i", SimpleType::builtin(BuiltinKind::Int), "1"))
            .unwrap();
        let u = map.get(&ExpandedName::local("u")).unwrap();
        assert_eq!(u.type_def.variety(), crate::datatypes::Variety::Union);
        assert_eq!(u.effective_type().built_in_kind(), BuiltinKind::Int);
        let v = map.get(&ExpandedName::local("v")).unwrap();
        assert_eq!(v.effective_type().built_in_kind(), BuiltinKind::Boolean);
        assert_eq!(v.lexical, "true");
        let i = map.get(&ExpandedName::local("i")).unwrap();
        assert!(i.member_type.is_none());
        assert_eq!(i.effective_type().built_in_kind(), BuiltinKind::Int);
    }

    #[test]
    fn namespaced_names_are_distinct() {
        let mut map = AttributeMap::new();
        map.insert_untyped(ExpandedName::new(Some("urn:a"), "x"), "1");
        assert!(map.get(&ExpandedName::local("x")).is_none());
        assert!(map.get(&ExpandedName::new(Some("urn:a"), "x")).is_some());
        assert!(map.remove(&ExpandedName::new(Some("urn:a"), "x")));
        assert!(map.is_empty());
    }
}
