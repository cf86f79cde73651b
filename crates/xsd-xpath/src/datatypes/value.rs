//! Typed values produced by datatype validation and the orderings defined on
//! them.

use chrono::{Duration as ChronoDuration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use compact_str::CompactString;
use core::cmp::Ordering;
use core::fmt;
use rust_decimal::Decimal;

/// A value in the value space of an atomic type. Derived types share the
/// representation of their primitive (every integer type is a `Decimal`).
#[derive(Debug, Clone, PartialEq)]
pub enum AtomicValue {
    String(CompactString),
    Boolean(bool),
    Decimal(Decimal),
    Float(f32),
    Double(f64),
    Duration {
        months: i64,
        seconds: Decimal,
    },
    DateTime {
        value: NaiveDateTime,
        tz: Option<FixedOffset>,
    },
    Date {
        value: NaiveDate,
        tz: Option<FixedOffset>,
    },
    Time {
        value: NaiveTime,
        tz: Option<FixedOffset>,
    },
    /// Any of the five `g*` types; absent fields are not part of the type.
    Gregorian {
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
        tz: Option<FixedOffset>,
    },
    HexBinary(Vec<u8>),
    Base64Binary(Vec<u8>),
    AnyUri(CompactString),
    /// Lexical `prefix:local`; resolving the prefix needs a namespace context
    /// the datatype layer does not have.
    QName(CompactString),
    Notation(CompactString),
}

/// The value of an attribute or of a cast operand: atomic, or a list of atomic
/// items for list types.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Atomic(AtomicValue),
    List(Vec<AtomicValue>),
}

impl TypedValue {
    pub fn as_atomic(&self) -> Option<&AtomicValue> {
        match self {
            Self::Atomic(a) => Some(a),
            Self::List(_) => None,
        }
    }
}

impl From<AtomicValue> for TypedValue {
    fn from(value: AtomicValue) -> Self {
        Self::Atomic(value)
    }
}

impl AtomicValue {
    /// `true` when the value is a number equal to zero or NaN.
    pub fn is_zero_like(&self) -> bool {
        match self {
            Self::Decimal(d) => d.is_zero(),
            Self::Float(f) => *f == 0.0 || f.is_nan(),
            Self::Double(d) => *d == 0.0 || d.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for AtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::AnyUri(s) | Self::QName(s) | Self::Notation(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Decimal(d) => write!(f, "{}", d.normalize()),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Duration { months, seconds } => write!(f, "P{months}M{seconds}S"),
            Self::DateTime { value, .. } => write!(f, "{value}"),
            Self::Date { value, .. } => write!(f, "{value}"),
            Self::Time { value, .. } => write!(f, "{value}"),
            Self::Gregorian { year, month, day, .. } => write!(f, "{year:?}-{month:?}-{day:?}"),
            Self::HexBinary(b) | Self::Base64Binary(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Equality in the value space. Values from different primitives are never
/// equal.
pub(crate) fn atomic_equal(a: &AtomicValue, b: &AtomicValue) -> bool {
    use AtomicValue as V;
    match (a, b) {
        (V::String(x), V::String(y))
        | (V::AnyUri(x), V::AnyUri(y))
        | (V::QName(x), V::QName(y))
        | (V::Notation(x), V::Notation(y)) => x == y,
        (V::Boolean(x), V::Boolean(y)) => x == y,
        (V::Decimal(x), V::Decimal(y)) => x == y,
        (V::Float(x), V::Float(y)) => x == y,
        (V::Double(x), V::Double(y)) => x == y,
        (V::Duration { months: ma, seconds: sa }, V::Duration { months: mb, seconds: sb }) => ma == mb && sa == sb,
        (V::HexBinary(x), V::HexBinary(y)) | (V::Base64Binary(x), V::Base64Binary(y)) => x == y,
        (V::Gregorian { .. }, V::Gregorian { .. })
        | (V::DateTime { .. }, V::DateTime { .. })
        | (V::Date { .. }, V::Date { .. })
        | (V::Time { .. }, V::Time { .. }) => atomic_compare(a, b) == Some(Ordering::Equal),
        _ => false,
    }
}

/// Order in the value space; `None` for unordered primitives, values of
/// different primitives and indeterminate pairs of a partial order.
pub(crate) fn atomic_compare(a: &AtomicValue, b: &AtomicValue) -> Option<Ordering> {
    use AtomicValue as V;
    match (a, b) {
        (V::Decimal(x), V::Decimal(y)) => Some(x.cmp(y)),
        (V::Float(x), V::Float(y)) => x.partial_cmp(y),
        (V::Double(x), V::Double(y)) => x.partial_cmp(y),
        (V::Duration { months: ma, seconds: sa }, V::Duration { months: mb, seconds: sb }) => {
            compare_durations(ma.checked_sub(*mb)?, sa.checked_sub(*sb)?)
        }
        (V::DateTime { value: x, tz: tx }, V::DateTime { value: y, tz: ty }) => {
            compare_timeline(*x, *tx, *y, *ty)
        }
        (V::Date { value: x, tz: tx }, V::Date { value: y, tz: ty }) => {
            compare_timeline(x.and_hms_opt(0, 0, 0)?, *tx, y.and_hms_opt(0, 0, 0)?, *ty)
        }
        (V::Time { value: x, tz: tx }, V::Time { value: y, tz: ty }) => {
            let base = reference_date(None, None, None)?;
            compare_timeline(base.and_time(*x), *tx, base.and_time(*y), *ty)
        }
        (
            V::Gregorian { year: ya, month: ma, day: da, tz: ta },
            V::Gregorian { year: yb, month: mb, day: db, tz: tb },
        ) => {
            // shapes must match, a gYear never meets a gMonth
            if ya.is_some() != yb.is_some() || ma.is_some() != mb.is_some() || da.is_some() != db.is_some() {
                return None;
            }
            let x = reference_date(*ya, *ma, *da)?;
            let y = reference_date(*yb, *mb, *db)?;
            compare_timeline(x.and_hms_opt(0, 0, 0)?, *ta, y.and_hms_opt(0, 0, 0)?, *tb)
        }
        _ => None,
    }
}

/// Anchor for partial date/time values: 1972 is a leap year and December
/// has 31 days, so every valid month/day combination lands on a real date.
fn reference_date(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Option<NaiveDate> {
    let month = month.unwrap_or(if day.is_some() { 12 } else { 1 });
    NaiveDate::from_ymd_opt(year.unwrap_or(1972), month, day.unwrap_or(1))
}

/// Compares two points on the timeline. A value without timezone is treated
/// as the whole interval -14:00..+14:00 around its local time; the result is
/// indeterminate when the other point falls inside that interval.
fn compare_timeline(
    a: NaiveDateTime,
    tz_a: Option<FixedOffset>,
    b: NaiveDateTime,
    tz_b: Option<FixedOffset>,
) -> Option<Ordering> {
    let to_utc = |local: NaiveDateTime, tz: Option<FixedOffset>| {
        local.checked_sub_signed(ChronoDuration::seconds(i64::from(tz.map_or(0, |o| o.local_minus_utc()))))
    };
    let window = ChronoDuration::hours(14);
    match (tz_a, tz_b) {
        (Some(_), Some(_)) | (None, None) => Some(to_utc(a, tz_a)?.cmp(&to_utc(b, tz_b)?)),
        (Some(_), None) => {
            let ua = to_utc(a, tz_a)?;
            if ua < b.checked_sub_signed(window)? {
                Some(Ordering::Less)
            } else if ua > b.checked_add_signed(window)? {
                Some(Ordering::Greater)
            } else {
                None
            }
        }
        (None, Some(_)) => compare_timeline(b, tz_b, a, tz_a).map(Ordering::reverse),
    }
}

// Cumulative day counts for 0..=11 consecutive months, shortest and longest.
const MIN_DAYS: [i64; 12] = [0, 28, 59, 89, 120, 150, 181, 212, 242, 273, 303, 334];
const MAX_DAYS: [i64; 12] = [0, 31, 62, 92, 123, 153, 184, 215, 245, 276, 306, 337];

/// Partial order of durations from the month and second differences. The
/// month part is bounded by the shortest and longest calendar spans it can
/// cover; when the bounds straddle zero the pair is incomparable.
fn compare_durations(month_diff: i64, second_diff: Decimal) -> Option<Ordering> {
    if month_diff == 0 {
        return Some(second_diff.cmp(&Decimal::ZERO));
    }
    let sign = month_diff.signum();
    let months = month_diff.unsigned_abs();
    let years = i64::try_from(months / 12).ok()?;
    let rest = usize::try_from(months % 12).ok()?;
    let min_days = years.checked_mul(365)?.checked_add(MIN_DAYS[rest])?;
    let max_days = years.checked_mul(366)?.checked_add(MAX_DAYS[rest])?;
    let (lo, hi) = if sign > 0 { (min_days, max_days) } else { (-max_days, -min_days) };
    let day = Decimal::from(86_400);
    let lo = Decimal::from(lo).checked_mul(day)?.checked_add(second_diff)?;
    let hi = Decimal::from(hi).checked_mul(day)?.checked_add(second_diff)?;
    if lo > Decimal::ZERO {
        Some(Ordering::Greater)
    } else if hi < Decimal::ZERO {
        Some(Ordering::Less)
    } else {
        None
    }
}

/// Equality of whole typed values; lists compare item by item.
pub(crate) fn typed_equal(a: &TypedValue, b: &TypedValue) -> bool {
    match (a, b) {
        (TypedValue::Atomic(x), TypedValue::Atomic(y)) => atomic_equal(x, y),
        (TypedValue::List(xs), TypedValue::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| atomic_equal(x, y))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn decimals_compare_by_value_not_scale() {
        let a = AtomicValue::Decimal(Decimal::new(10, 1));
        let b = AtomicValue::Decimal(Decimal::ONE);
        assert!(atomic_equal(&a, &b));
        assert_eq!(atomic_compare(&a, &b), Some(Ordering::Equal));
    }

    #[test]
    fn nan_is_unordered_and_unequal() {
        let nan = AtomicValue::Double(f64::NAN);
        assert!(!atomic_equal(&nan, &nan));
        assert_eq!(atomic_compare(&nan, &AtomicValue::Double(1.0)), None);
    }

    #[test]
    fn timezone_window_makes_close_values_indeterminate() {
        let utc = FixedOffset::east_opt(0);
        let a = (dt("2020-01-01T12:00:00"), utc);
        let near = (dt("2020-01-01T13:00:00"), None);
        let far = (dt("2020-01-03T12:00:00"), None);
        assert_eq!(compare_timeline(a.0, a.1, near.0, near.1), None);
        assert_eq!(compare_timeline(a.0, a.1, far.0, far.1), Some(Ordering::Less));
        assert_eq!(compare_timeline(far.0, far.1, a.0, a.1), Some(Ordering::Greater));
    }

    #[test]
    fn equal_instants_in_different_zones() {
        let a = AtomicValue::DateTime { value: dt("2020-01-01T12:00:00"), tz: FixedOffset::east_opt(0) };
        let b = AtomicValue::DateTime { value: dt("2020-01-01T13:00:00"), tz: FixedOffset::east_opt(3600) };
        assert!(atomic_equal(&a, &b));
    }

    #[test]
    fn one_month_versus_days() {
        assert_eq!(compare_durations(1, Decimal::from(-27 * 86_400)), Some(Ordering::Greater));
        assert_eq!(compare_durations(1, Decimal::from(-30 * 86_400)), None);
        assert_eq!(compare_durations(-1, Decimal::from(32 * 86_400)), Some(Ordering::Greater));
        assert_eq!(compare_durations(12, Decimal::from(-367 * 86_400)), Some(Ordering::Less));
    }

    #[test]
    fn lists_compare_itemwise() {
        let a = TypedValue::List(vec![AtomicValue::Decimal(Decimal::ONE), AtomicValue::Decimal(Decimal::from(2))]);
        let b = TypedValue::List(vec![AtomicValue::Decimal(Decimal::new(10, 1)), AtomicValue::Decimal(Decimal::from(2))]);
        let c = TypedValue::List(vec![AtomicValue::Decimal(Decimal::ONE)]);
        assert!(typed_equal(&a, &b));
        assert!(!typed_equal(&a, &c));
    }
}
