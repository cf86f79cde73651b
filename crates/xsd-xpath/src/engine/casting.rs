//! `cast as` evaluation. A cast re-validates the operand's lexical form
//! against the target type; it never converts between value spaces.

use tracing::trace;

use crate::datatypes::{InvalidLexical, TypedValue};
use crate::model::{AttributeView, ExpandedName};
use crate::parser::ast::{Cast, CastSource};

/// Why a cast produced no value.
#[derive(Debug)]
pub(crate) enum CastFailure<'n> {
    Absent(&'n ExpandedName),
    Invalid(InvalidLexical),
}

pub(crate) fn cast_value<'e, A: AttributeView + ?Sized>(
    cast: &'e Cast,
    attrs: &A,
) -> Result<TypedValue, CastFailure<'e>> {
    let result = match &cast.inner {
        CastSource::Attribute(name) => {
            let attr = attrs.get(&name.name).ok_or(CastFailure::Absent(&name.name))?;
            cast.target.validate(attr.lexical)
        }
        CastSource::Literal(lit) => cast.target.validate(&lit.text),
    };
    result.map_err(CastFailure::Invalid)
}

/// Logs a failed cast on behalf of the enclosing test.
pub(crate) fn trace_failure(element: &ExpandedName, cast: &Cast, failure: &CastFailure<'_>) {
    match failure {
        CastFailure::Absent(name) => {
            trace!(element = %element, attribute = %name, target = %cast.target_name, "cast of absent attribute");
        }
        CastFailure::Invalid(err) => {
            trace!(element = %element, target = %cast.target_name, error = %err, "cast failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{AtomicValue, BuiltinKind, SimpleType};
    use crate::model::AttributeMap;
    use crate::parser::ast::QName;

    fn cast_attr(local: &str, target: BuiltinKind) -> Cast {
        Cast {
            inner: CastSource::Attribute(QName {
                prefix: None,
                name: ExpandedName::local(local),
            }),
            target_name: QName {
                prefix: None,
                name: ExpandedName::local(target.local_name()),
            },
            target: SimpleType::builtin(target),
            optional: false,
        }
    }

    #[test]
    fn casts_use_the_lexical_form() {
        let mut attrs = AttributeMap::new();
        attrs.insert_untyped(ExpandedName::local("flag"), " 1 ");
        let cast = cast_attr("flag", BuiltinKind::Boolean);
        assert_eq!(
            cast_value(&cast, &attrs).unwrap(),
            TypedValue::Atomic(AtomicValue::Boolean(true))
        );
    }

    #[test]
    fn absent_and_invalid_are_distinguished() {
        let mut attrs = AttributeMap::new();
        attrs.insert_untyped(ExpandedName::local("n"), "ten");
        assert!(matches!(
            cast_value(&cast_attr("n", BuiltinKind::Integer), &attrs),
            Err(CastFailure::Invalid(_))
        ));
        assert!(matches!(
            cast_value(&cast_attr("m", BuiltinKind::Integer), &attrs),
            Err(CastFailure::Absent(_))
        ));
    }
}
