//! The closed set of XML Schema 1.1 built-in simple types.

use core::fmt;

/// Every built-in simple type of XML Schema 1.1 Part 2, plus
/// `xs:untypedAtomic` from the XPath data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    AnySimpleType,
    AnyAtomicType,
    UntypedAtomic,
    // string family
    String,
    NormalizedString,
    Token,
    Language,
    Name,
    NCName,
    NMTOKEN,
    NMTOKENS,
    ID,
    IDREF,
    IDREFS,
    ENTITY,
    ENTITIES,
    Boolean,
    // decimal family
    Decimal,
    Integer,
    NonPositiveInteger,
    NegativeInteger,
    Long,
    Int,
    Short,
    Byte,
    NonNegativeInteger,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    PositiveInteger,
    Float,
    Double,
    // durations
    Duration,
    DayTimeDuration,
    YearMonthDuration,
    // date/time
    DateTime,
    DateTimeStamp,
    Date,
    Time,
    GYearMonth,
    GYear,
    GMonthDay,
    GDay,
    GMonth,
    HexBinary,
    Base64Binary,
    AnyURI,
    QName,
    NOTATION,
}

/// The primitive type a built-in derives from. Two values are comparable only
/// when their types share a primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `xs:anySimpleType`, `xs:anyAtomicType` and `xs:untypedAtomic`.
    AnySimpleType,
    String,
    Boolean,
    Decimal,
    Float,
    Double,
    Duration,
    DateTime,
    Time,
    Date,
    GYearMonth,
    GYear,
    GMonthDay,
    GDay,
    GMonth,
    HexBinary,
    Base64Binary,
    AnyURI,
    QName,
    NOTATION,
}

impl PrimitiveKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Decimal | Self::Float | Self::Double)
    }
}

/// The `whiteSpace` facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WhiteSpace {
    Preserve,
    Replace,
    Collapse,
}

const NAMES: &[(BuiltinKind, &str)] = &[
    (BuiltinKind::AnySimpleType, "anySimpleType"),
    (BuiltinKind::AnyAtomicType, "anyAtomicType"),
    (BuiltinKind::UntypedAtomic, "untypedAtomic"),
    (BuiltinKind::String, "string"),
    (BuiltinKind::NormalizedString, "normalizedString"),
    (BuiltinKind::Token, "token"),
    (BuiltinKind::Language, "language"),
    (BuiltinKind::Name, "Name"),
    (BuiltinKind::NCName, "NCName"),
    (BuiltinKind::NMTOKEN, "NMTOKEN"),
    (BuiltinKind::NMTOKENS, "NMTOKENS"),
    (BuiltinKind::ID, "ID"),
    (BuiltinKind::IDREF, "IDREF"),
    (BuiltinKind::IDREFS, "IDREFS"),
    (BuiltinKind::ENTITY, "ENTITY"),
    (BuiltinKind::ENTITIES, "ENTITIES"),
    (BuiltinKind::Boolean, "boolean"),
    (BuiltinKind::Decimal, "decimal"),
    (BuiltinKind::Integer, "integer"),
    (BuiltinKind::NonPositiveInteger, "nonPositiveInteger"),
    (BuiltinKind::NegativeInteger, "negativeInteger"),
    (BuiltinKind::Long, "long"),
    (BuiltinKind::Int, "int"),
    (BuiltinKind::Short, "short"),
    (BuiltinKind::Byte, "byte"),
    (BuiltinKind::NonNegativeInteger, "nonNegativeInteger"),
    (BuiltinKind::UnsignedLong, "unsignedLong"),
    (BuiltinKind::UnsignedInt, "unsignedInt"),
    (BuiltinKind::UnsignedShort, "unsignedShort"),
    (BuiltinKind::UnsignedByte, "unsignedByte"),
    (BuiltinKind::PositiveInteger, "positiveInteger"),
    (BuiltinKind::Float, "float"),
    (BuiltinKind::Double, "double"),
    (BuiltinKind::Duration, "duration"),
    (BuiltinKind::DayTimeDuration, "dayTimeDuration"),
    (BuiltinKind::YearMonthDuration, "yearMonthDuration"),
    (BuiltinKind::DateTime, "dateTime"),
    (BuiltinKind::DateTimeStamp, "dateTimeStamp"),
    (BuiltinKind::Date, "date"),
    (BuiltinKind::Time, "time"),
    (BuiltinKind::GYearMonth, "gYearMonth"),
    (BuiltinKind::GYear, "gYear"),
    (BuiltinKind::GMonthDay, "gMonthDay"),
    (BuiltinKind::GDay, "gDay"),
    (BuiltinKind::GMonth, "gMonth"),
    (BuiltinKind::HexBinary, "hexBinary"),
    (BuiltinKind::Base64Binary, "base64Binary"),
    (BuiltinKind::AnyURI, "anyURI"),
    (BuiltinKind::QName, "QName"),
    (BuiltinKind::NOTATION, "NOTATION"),
];

impl BuiltinKind {
    pub fn all() -> impl Iterator<Item = BuiltinKind> {
        NAMES.iter().map(|(k, _)| *k)
    }

    /// Local name in the `xs` namespace.
    pub fn local_name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(k, _)| *k == self)
            .map_or("anySimpleType", |(_, n)| n)
    }

    pub fn from_local_name(local: &str) -> Option<Self> {
        NAMES.iter().find(|(_, n)| *n == local).map(|(k, _)| *k)
    }

    pub fn primitive(self) -> PrimitiveKind {
        use BuiltinKind as B;
        match self {
            B::AnySimpleType | B::AnyAtomicType | B::UntypedAtomic => PrimitiveKind::AnySimpleType,
            B::String
            | B::NormalizedString
            | B::Token
            | B::Language
            | B::Name
            | B::NCName
            | B::NMTOKEN
            | B::NMTOKENS
            | B::ID
            | B::IDREF
            | B::IDREFS
            | B::ENTITY
            | B::ENTITIES => PrimitiveKind::String,
            B::Boolean => PrimitiveKind::Boolean,
            B::Decimal
            | B::Integer
            | B::NonPositiveInteger
            | B::NegativeInteger
            | B::Long
            | B::Int
            | B::Short
            | B::Byte
            | B::NonNegativeInteger
            | B::UnsignedLong
            | B::UnsignedInt
            | B::UnsignedShort
            | B::UnsignedByte
            | B::PositiveInteger => PrimitiveKind::Decimal,
            B::Float => PrimitiveKind::Float,
            B::Double => PrimitiveKind::Double,
            B::Duration | B::DayTimeDuration | B::YearMonthDuration => PrimitiveKind::Duration,
            B::DateTime | B::DateTimeStamp => PrimitiveKind::DateTime,
            B::Date => PrimitiveKind::Date,
            B::Time => PrimitiveKind::Time,
            B::GYearMonth => PrimitiveKind::GYearMonth,
            B::GYear => PrimitiveKind::GYear,
            B::GMonthDay => PrimitiveKind::GMonthDay,
            B::GDay => PrimitiveKind::GDay,
            B::GMonth => PrimitiveKind::GMonth,
            B::HexBinary => PrimitiveKind::HexBinary,
            B::Base64Binary => PrimitiveKind::Base64Binary,
            B::AnyURI => PrimitiveKind::AnyURI,
            B::QName => PrimitiveKind::QName,
            B::NOTATION => PrimitiveKind::NOTATION,
        }
    }

    /// Item type of the three built-in list types.
    pub fn list_item(self) -> Option<BuiltinKind> {
        match self {
            Self::NMTOKENS => Some(Self::NMTOKEN),
            Self::IDREFS => Some(Self::IDREF),
            Self::ENTITIES => Some(Self::ENTITY),
            _ => None,
        }
    }

    /// Types that cannot be the target of `cast as`: the abstract ones and
    /// the built-in lists.
    pub fn is_castable_target(self) -> bool {
        !matches!(self, Self::AnySimpleType | Self::AnyAtomicType | Self::NOTATION) && self.list_item().is_none()
    }

    pub(crate) fn whitespace(self) -> WhiteSpace {
        match self {
            Self::String | Self::AnySimpleType | Self::AnyAtomicType | Self::UntypedAtomic => WhiteSpace::Preserve,
            Self::NormalizedString => WhiteSpace::Replace,
            _ => WhiteSpace::Collapse,
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xs:{}", self.local_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_for_every_kind() {
        for kind in BuiltinKind::all() {
            assert_eq!(BuiltinKind::from_local_name(kind.local_name()), Some(kind));
        }
        assert_eq!(BuiltinKind::all().count(), 50);
    }

    #[test]
    fn derived_integers_share_the_decimal_primitive() {
        assert_eq!(BuiltinKind::UnsignedByte.primitive(), PrimitiveKind::Decimal);
        assert_eq!(BuiltinKind::DateTimeStamp.primitive(), PrimitiveKind::DateTime);
        assert!(!BuiltinKind::NMTOKENS.is_castable_target());
        assert!(BuiltinKind::UntypedAtomic.is_castable_target());
    }
}
