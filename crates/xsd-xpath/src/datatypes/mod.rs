//! Datatype layer consumed by the evaluator.
//!
//! The evaluator only talks to [`TypeDescriptor`]; a schema processor with its
//! own datatype validators implements that trait. [`SimpleType`] is the stock
//! implementation covering every XML Schema 1.1 built-in plus list and union
//! derivation, and [`BuiltinTypes`] resolves `xs:*` names to it.

use compact_str::CompactString;
use core::cmp::Ordering;
use core::fmt;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

mod builtin;
pub(crate) mod lexical;
mod simple_type;
mod value;

pub use builtin::{BuiltinKind, PrimitiveKind};
pub use simple_type::SimpleType;
pub use value::{AtomicValue, TypedValue};

use crate::consts::XS;
use crate::model::ExpandedName;

/// Shared handle to a type definition.
pub type TypeRef = Arc<dyn TypeDescriptor>;

/// Closed set of simple-type varieties, fixed when a type is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variety {
    Atomic,
    List,
    Union,
}

/// The `ordered` fundamental facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordered {
    Unordered,
    /// Some pairs of values are incomparable (NaN, timezone-less instants,
    /// durations mixing months and days).
    Partial,
    Total,
}

/// A lexical value that is not in the lexical space of its type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{lexical}' is not a valid lexical form of {type_name}")]
pub struct InvalidLexical {
    pub type_name: CompactString,
    pub lexical: CompactString,
}

/// A simple type definition as seen by the evaluator.
pub trait TypeDescriptor: fmt::Debug + Send + Sync {
    /// Qualified name; `None` for anonymous types.
    fn name(&self) -> Option<&ExpandedName>;

    /// The built-in this type is or is derived from.
    fn built_in_kind(&self) -> BuiltinKind;

    /// `true` only for the built-in definitions themselves.
    fn is_builtin(&self) -> bool;

    fn primitive_kind(&self) -> PrimitiveKind {
        self.built_in_kind().primitive()
    }

    fn ordered(&self) -> Ordered;

    fn variety(&self) -> Variety;

    /// The item type of a list (one entry) or the member types of a union.
    /// Empty for atomic types.
    fn item_or_member_types(&self) -> &[TypeRef];

    /// Maps a lexical form to a value, applying the `whiteSpace` facet first.
    fn validate(&self, lexical: &str) -> Result<TypedValue, InvalidLexical>;

    /// [`validate`](Self::validate), also reporting which union member
    /// accepted the value. The member is `None` unless this is a union.
    fn validate_member(&self, lexical: &str) -> Result<(TypedValue, Option<TypeRef>), InvalidLexical> {
        self.validate(lexical).map(|value| (value, None))
    }

    /// Equality in the value space.
    fn is_equal(&self, a: &TypedValue, b: &TypedValue) -> bool;

    /// Order in the value space; `None` when the pair is incomparable.
    fn compare(&self, a: &TypedValue, b: &TypedValue) -> Option<Ordering>;

    fn is_numeric(&self) -> bool {
        self.variety() == Variety::Atomic && self.primitive_kind().is_numeric()
    }
}

/// Resolves a `cast as` target name to a type definition.
pub trait TypeResolver {
    fn resolve_type(&self, name: &ExpandedName) -> Option<TypeRef>;
}

/// The built-in XML Schema types, shared process-wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTypes;

static BUILTINS: OnceLock<HashMap<BuiltinKind, TypeRef>> = OnceLock::new();

fn builtin_table() -> &'static HashMap<BuiltinKind, TypeRef> {
    BUILTINS.get_or_init(|| {
        let mut table: HashMap<BuiltinKind, TypeRef> = HashMap::new();
        for kind in BuiltinKind::all().filter(|k| k.list_item().is_none()) {
            table.insert(kind, Arc::new(SimpleType::atomic_builtin(kind)));
        }
        for kind in BuiltinKind::all() {
            if let Some(item) = kind.list_item().and_then(|k| table.get(&k).cloned()) {
                table.insert(kind, Arc::new(SimpleType::list_builtin(kind, item)));
            }
        }
        table
    })
}

impl BuiltinTypes {
    /// Shared definition of a built-in type.
    pub fn get(kind: BuiltinKind) -> TypeRef {
        match builtin_table().get(&kind) {
            Some(t) => Arc::clone(t),
            // every kind is inserted by `builtin_table`
            None => Arc::new(SimpleType::atomic_builtin(kind)),
        }
    }
}

impl TypeResolver for BuiltinTypes {
    fn resolve_type(&self, name: &ExpandedName) -> Option<TypeRef> {
        if name.ns_uri.as_deref() != Some(XS) {
            return None;
        }
        BuiltinKind::from_local_name(&name.local).map(Self::get)
    }
}

impl<T: TypeResolver + ?Sized> TypeResolver for &T {
    fn resolve_type(&self, name: &ExpandedName) -> Option<TypeRef> {
        (**self).resolve_type(name)
    }
}
