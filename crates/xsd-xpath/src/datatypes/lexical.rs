//! Lexical-space parsers for the atomic built-in types. Inputs have already
//! been whitespace-normalized according to the type's `whiteSpace` facet.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use compact_str::CompactString;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::builtin::BuiltinKind;
use super::value::AtomicValue;
use crate::xml_chars::{is_name, is_ncname, is_nmtoken, is_qname};

/// Parses `text` as a value of the atomic built-in `kind`. List kinds are
/// handled by the caller.
pub(crate) fn parse_atomic(kind: BuiltinKind, text: &str) -> Option<AtomicValue> {
    use BuiltinKind as B;
    match kind {
        B::AnySimpleType
        | B::AnyAtomicType
        | B::UntypedAtomic
        | B::String
        | B::NormalizedString
        | B::Token => Some(AtomicValue::String(text.into())),
        B::Language => is_valid_language(text).then(|| AtomicValue::String(text.into())),
        B::Name => is_name(text).then(|| AtomicValue::String(text.into())),
        B::NCName | B::ID | B::IDREF | B::ENTITY => is_ncname(text).then(|| AtomicValue::String(text.into())),
        B::NMTOKEN => is_nmtoken(text).then(|| AtomicValue::String(text.into())),
        B::NMTOKENS | B::IDREFS | B::ENTITIES => None,
        B::Boolean => match text {
            "true" | "1" => Some(AtomicValue::Boolean(true)),
            "false" | "0" => Some(AtomicValue::Boolean(false)),
            _ => None,
        },
        B::Decimal => parse_decimal(text).map(AtomicValue::Decimal),
        B::Integer
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
        | B::PositiveInteger => parse_integer(kind, text).map(AtomicValue::Decimal),
        B::Float => parse_floating(text).map(|v| AtomicValue::Float(v as f32)),
        B::Double => parse_floating(text).map(AtomicValue::Double),
        B::Duration | B::DayTimeDuration | B::YearMonthDuration => parse_duration(kind, text),
        B::DateTime | B::DateTimeStamp => {
            let (body, tz) = split_timezone(text)?;
            if kind == B::DateTimeStamp && tz.is_none() {
                return None;
            }
            parse_date_time(body).map(|value| AtomicValue::DateTime { value, tz })
        }
        B::Date => {
            let (body, tz) = split_timezone(text)?;
            let (year, month, day) = parse_ymd(body)?;
            NaiveDate::from_ymd_opt(year, month, day).map(|value| AtomicValue::Date { value, tz })
        }
        B::Time => {
            let (body, tz) = split_timezone(text)?;
            let (value, _) = parse_time(body)?;
            Some(AtomicValue::Time { value, tz })
        }
        B::GYearMonth | B::GYear | B::GMonthDay | B::GDay | B::GMonth => parse_gregorian(kind, text),
        B::HexBinary => decode_hex(text).map(AtomicValue::HexBinary),
        B::Base64Binary => {
            let compact: String = text.chars().filter(|c| *c != ' ').collect();
            BASE64_STANDARD.decode(compact).ok().map(AtomicValue::Base64Binary)
        }
        B::AnyURI => Some(AtomicValue::AnyUri(text.into())),
        B::QName => is_qname(text).then(|| AtomicValue::QName(text.into())),
        B::NOTATION => is_qname(text).then(|| AtomicValue::Notation(text.into())),
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text.strip_prefix('+').unwrap_or(text))
    }
}

/// `(+|-)? (digits ('.' digits?)? | '.' digits)`
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    let (negative, body) = split_sign(text);
    let (int, frac) = body.split_once('.').unwrap_or((body, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !(int.is_empty() || all_digits(int)) || !(frac.is_empty() || all_digits(frac)) {
        return None;
    }
    let normalized: CompactString = match (int.is_empty(), frac.is_empty()) {
        (_, true) => int.into(),
        (true, false) => compact_str::format_compact!("0.{frac}"),
        (false, false) => compact_str::format_compact!("{int}.{frac}"),
    };
    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

fn integer_bounds(kind: BuiltinKind) -> (Option<Decimal>, Option<Decimal>) {
    use BuiltinKind as B;
    match kind {
        B::NonPositiveInteger => (None, Some(Decimal::ZERO)),
        B::NegativeInteger => (None, Some(Decimal::NEGATIVE_ONE)),
        B::Long => (Some(Decimal::from(i64::MIN)), Some(Decimal::from(i64::MAX))),
        B::Int => (Some(Decimal::from(i32::MIN)), Some(Decimal::from(i32::MAX))),
        B::Short => (Some(Decimal::from(i16::MIN)), Some(Decimal::from(i16::MAX))),
        B::Byte => (Some(Decimal::from(i8::MIN)), Some(Decimal::from(i8::MAX))),
        B::NonNegativeInteger => (Some(Decimal::ZERO), None),
        B::UnsignedLong => (Some(Decimal::ZERO), Some(Decimal::from(u64::MAX))),
        B::UnsignedInt => (Some(Decimal::ZERO), Some(Decimal::from(u32::MAX))),
        B::UnsignedShort => (Some(Decimal::ZERO), Some(Decimal::from(u16::MAX))),
        B::UnsignedByte => (Some(Decimal::ZERO), Some(Decimal::from(u8::MAX))),
        B::PositiveInteger => (Some(Decimal::ONE), None),
        _ => (None, None),
    }
}

fn parse_integer(kind: BuiltinKind, text: &str) -> Option<Decimal> {
    let (_, body) = split_sign(text);
    if !all_digits(body) {
        return None;
    }
    let value = parse_decimal(text)?;
    let (min, max) = integer_bounds(kind);
    if min.is_some_and(|m| value < m) || max.is_some_and(|m| value > m) {
        return None;
    }
    Some(value)
}

/// `xs:float`/`xs:double` lexical space. Rust's float parser also accepts
/// spellings like `inf` or `infinity`, so the shape is checked first.
pub(crate) fn parse_floating(text: &str) -> Option<f64> {
    match text {
        "INF" | "+INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    let (_, body) = split_sign(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mantissa_ok = (all_digits(int) && (frac.is_empty() || all_digits(frac))) || (int.is_empty() && all_digits(frac));
    if !mantissa_ok {
        return None;
    }
    if let Some(exp) = exponent {
        let (_, digits) = split_sign(exp);
        if !all_digits(digits) {
            return None;
        }
    }
    text.parse::<f64>().ok()
}

fn parse_duration(kind: BuiltinKind, text: &str) -> Option<AtomicValue> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let body = body.strip_prefix('P')?;
    let (date_part, time_part) = match body.split_once('T') {
        Some((d, t)) => {
            if t.is_empty() {
                return None;
            }
            (d, Some(t))
        }
        None => (body, None),
    };

    let mut months: i64 = 0;
    let mut seconds = Decimal::ZERO;
    let mut seen_year_month = false;
    let mut seen_day_time = false;
    let mut any = false;

    for (number, designator) in designated_numbers(date_part, &['Y', 'M', 'D'])? {
        any = true;
        match designator {
            'Y' | 'M' => {
                seen_year_month = true;
                let n = i64::try_from(integer_component(number)?).ok()?;
                let n = if designator == 'Y' { n.checked_mul(12)? } else { n };
                months = months.checked_add(n)?;
            }
            _ => {
                seen_day_time = true;
                let n = Decimal::from(integer_component(number)?);
                seconds = seconds.checked_add(n.checked_mul(Decimal::from(86_400))?)?;
            }
        }
    }
    if let Some(time) = time_part {
        for (number, designator) in designated_numbers(time, &['H', 'M', 'S'])? {
            any = true;
            seen_day_time = true;
            let n = if designator == 'S' {
                let (int, _) = number.split_once('.').unwrap_or((number, ""));
                if !all_digits(int) {
                    return None;
                }
                parse_decimal(number)?
            } else {
                Decimal::from(integer_component(number)?)
            };
            let unit = match designator {
                'H' => 3_600,
                'M' => 60,
                _ => 1,
            };
            seconds = seconds.checked_add(n.checked_mul(Decimal::from(unit))?)?;
        }
    }
    if !any {
        return None;
    }
    match kind {
        BuiltinKind::DayTimeDuration if seen_year_month => return None,
        BuiltinKind::YearMonthDuration if seen_day_time => return None,
        _ => {}
    }
    if negative {
        months = -months;
        seconds = -seconds;
    }
    Some(AtomicValue::Duration { months, seconds })
}

/// Splits `12Y3M` into `[("12", 'Y'), ("3", 'M')]`, enforcing that
/// designators appear at most once and in the given order.
fn designated_numbers<'a>(text: &'a str, order: &[char]) -> Option<Vec<(&'a str, char)>> {
    let mut out = Vec::new();
    let mut rest = text;
    let mut next_allowed = 0usize;
    while !rest.is_empty() {
        let pos = rest.find(|c: char| c.is_ascii_alphabetic())?;
        let designator = rest[pos..].chars().next()?;
        let index = order.iter().position(|d| *d == designator)?;
        if index < next_allowed || pos == 0 {
            return None;
        }
        out.push((&rest[..pos], designator));
        next_allowed = index + 1;
        rest = &rest[pos + designator.len_utf8()..];
    }
    Some(out)
}

fn integer_component(text: &str) -> Option<u64> {
    if !all_digits(text) {
        return None;
    }
    text.parse().ok()
}

/// Strips a trailing `Z` or `(+|-)hh:mm` timezone.
fn split_timezone(text: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(body) = text.strip_suffix('Z') {
        return Some((body, Some(FixedOffset::east_opt(0)?)));
    }
    let bytes = text.as_bytes();
    let n = bytes.len();
    if n >= 6 && matches!(bytes[n - 6], b'+' | b'-') && bytes[n - 3] == b':' {
        let hours: i32 = two_digits(&text[n - 5..n - 3])?.try_into().ok()?;
        let minutes: i32 = two_digits(&text[n - 2..])?.try_into().ok()?;
        if minutes > 59 || hours * 60 + minutes > 14 * 60 {
            return None;
        }
        let secs = (hours * 60 + minutes) * 60;
        let offset = if bytes[n - 6] == b'-' { FixedOffset::west_opt(secs)? } else { FixedOffset::east_opt(secs)? };
        return Some((&text[..n - 6], Some(offset)));
    }
    Some((text, None))
}

fn two_digits(text: &str) -> Option<u32> {
    (text.len() == 2 && all_digits(text)).then(|| text.parse().ok()).flatten()
}

/// `-?YYYY` with at least four digits and no superfluous leading zero.
fn parse_year(text: &str) -> Option<i32> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if digits.len() < 4 || !all_digits(digits) || (digits.len() > 4 && digits.starts_with('0')) {
        return None;
    }
    let year: i32 = digits.parse().ok()?;
    Some(if negative { -year } else { year })
}

fn parse_ymd(text: &str) -> Option<(i32, u32, u32)> {
    let (rest, day) = text.rsplit_once('-')?;
    let (year, month) = rest.rsplit_once('-')?;
    Some((parse_year(year)?, two_digits(month)?, two_digits(day)?))
}

/// `hh:mm:ss(.s+)?`; the flag reports the end-of-day form `24:00:00`.
fn parse_time(text: &str) -> Option<(NaiveTime, bool)> {
    let mut parts = text.splitn(3, ':');
    let hour = two_digits(parts.next()?)?;
    let minute = two_digits(parts.next()?)?;
    let sec_text = parts.next()?;
    let (whole, frac) = sec_text.split_once('.').unwrap_or((sec_text, ""));
    let second = two_digits(whole)?;
    if sec_text.contains('.') && !all_digits(frac) {
        return None;
    }
    let nanos: u32 = if frac.is_empty() {
        0
    } else {
        let mut padded: String = frac.chars().take(9).collect();
        while padded.len() < 9 {
            padded.push('0');
        }
        padded.parse().ok()?
    };
    if hour == 24 {
        if minute != 0 || second != 0 || !frac.bytes().all(|b| b == b'0') {
            return None;
        }
        return NaiveTime::from_hms_opt(0, 0, 0).map(|t| (t, true));
    }
    // leap seconds are not part of the XSD lexical space
    if second > 59 {
        return None;
    }
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).map(|t| (t, false))
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let (date, time) = text.split_once('T')?;
    let (year, month, day) = parse_ymd(date)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let (time, end_of_day) = parse_time(time)?;
    let value = date.and_time(time);
    if end_of_day { value.checked_add_signed(chrono::Duration::days(1)) } else { Some(value) }
}

fn parse_gregorian(kind: BuiltinKind, text: &str) -> Option<AtomicValue> {
    let (body, tz) = split_timezone(text)?;
    let (year, month, day) = match kind {
        BuiltinKind::GYear => (Some(parse_year(body)?), None, None),
        BuiltinKind::GYearMonth => {
            let (y, m) = body.rsplit_once('-')?;
            (Some(parse_year(y)?), Some(two_digits(m)?), None)
        }
        BuiltinKind::GMonth => (None, Some(two_digits(body.strip_prefix("--")?)?), None),
        BuiltinKind::GMonthDay => {
            let (m, d) = body.strip_prefix("--")?.split_once('-')?;
            (None, Some(two_digits(m)?), Some(two_digits(d)?))
        }
        BuiltinKind::GDay => (None, None, Some(two_digits(body.strip_prefix("---")?)?)),
        _ => return None,
    };
    if month.is_some_and(|m| !(1..=12).contains(&m)) {
        return None;
    }
    // a leap year admits every month/day pair a gMonthDay may carry
    if let Some(d) = day {
        NaiveDate::from_ymd_opt(2000, month.unwrap_or(1), d)?;
    }
    Some(AtomicValue::Gregorian { year, month, day, tz })
}

pub(crate) fn decode_hex(input: &str) -> Option<Vec<u8>> {
    // pairs are taken by byte, so any non-ASCII input fails on its lead byte
    if !input.len().is_multiple_of(2) {
        return None;
    }
    input
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let high = char::from(pair[0]).to_digit(16)?;
            let low = char::from(pair[1]).to_digit(16)?;
            u8::try_from((high << 4) | low).ok()
        })
        .collect()
}

pub(crate) fn is_valid_language(s: &str) -> bool {
    let mut parts = s.split('-');
    match parts.next() {
        Some(first) if (1..=8).contains(&first.len()) && first.chars().all(|c| c.is_ascii_alphabetic()) => {}
        _ => return false,
    }
    parts.all(|part| (1..=8).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", true)]
    #[case("-1.50", true)]
    #[case("+.5", true)]
    #[case("5.", true)]
    #[case(".", false)]
    #[case("1e3", false)]
    #[case("", false)]
    #[case("1.2.3", false)]
    fn decimal_lexical_space(#[case] text: &str, #[case] ok: bool) {
        assert_eq!(parse_decimal(text).is_some(), ok);
    }

    #[rstest]
    #[case(BuiltinKind::Byte, "127", true)]
    #[case(BuiltinKind::Byte, "128", false)]
    #[case(BuiltinKind::UnsignedShort, "-1", false)]
    #[case(BuiltinKind::PositiveInteger, "0", false)]
    #[case(BuiltinKind::NegativeInteger, "-1", true)]
    #[case(BuiltinKind::Integer, "1.0", false)]
    #[case(BuiltinKind::UnsignedLong, "18446744073709551615", true)]
    fn integer_ranges(#[case] kind: BuiltinKind, #[case] text: &str, #[case] ok: bool) {
        assert_eq!(parse_integer(kind, text).is_some(), ok);
    }

    #[rstest]
    #[case("1.5e3", Some(1500.0))]
    #[case("-INF", Some(f64::NEG_INFINITY))]
    #[case("inf", None)]
    #[case("infinity", None)]
    #[case("1e", None)]
    #[case(".5E-1", Some(0.05))]
    fn floating_lexical_space(#[case] text: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_floating(text), expected);
    }

    #[test]
    fn durations_fold_into_months_and_seconds() {
        let value = parse_duration(BuiltinKind::Duration, "-P1Y2M3DT4H5M6.5S").unwrap();
        let AtomicValue::Duration { months, seconds } = value else { panic!("not a duration") };
        assert_eq!(months, -14);
        assert_eq!(seconds, -Decimal::from_str("273906.5").unwrap());
        assert!(parse_duration(BuiltinKind::Duration, "P").is_none());
        assert!(parse_duration(BuiltinKind::Duration, "P1DT").is_none());
        assert!(parse_duration(BuiltinKind::Duration, "P1M1Y").is_none());
        assert!(parse_duration(BuiltinKind::DayTimeDuration, "P1Y").is_none());
        assert!(parse_duration(BuiltinKind::YearMonthDuration, "P1Y6M").is_some());
    }

    #[test]
    fn date_time_with_timezone_and_end_of_day() {
        let value = parse_atomic(BuiltinKind::DateTime, "2020-02-29T24:00:00+01:00").unwrap();
        let AtomicValue::DateTime { value, tz } = value else { panic!("not a dateTime") };
        assert_eq!(value.to_string(), "2020-03-01 00:00:00");
        assert_eq!(tz, FixedOffset::east_opt(3600));
        assert!(parse_atomic(BuiltinKind::DateTime, "2021-02-29T00:00:00").is_none());
        assert!(parse_atomic(BuiltinKind::DateTimeStamp, "2020-01-01T00:00:00").is_none());
        assert!(parse_atomic(BuiltinKind::Date, "2020-01-01+15:00").is_none());
    }

    #[test]
    fn gregorian_shapes() {
        assert!(parse_atomic(BuiltinKind::GMonthDay, "--02-29").is_some());
        assert!(parse_atomic(BuiltinKind::GMonthDay, "--02-30").is_none());
        assert!(parse_atomic(BuiltinKind::GDay, "---31Z").is_some());
        assert!(parse_atomic(BuiltinKind::GMonth, "--13").is_none());
        assert!(parse_atomic(BuiltinKind::GYear, "0999").is_some());
        assert!(parse_atomic(BuiltinKind::GYear, "999").is_none());
    }

    #[rstest]
    #[case("", Some(vec![]))]
    #[case("0aFf", Some(vec![0x0a, 0xff]))]
    #[case("0aF", None)]
    #[case("é", None)]
    #[case("0é", None)]
    #[case("\u{1D11E}", None)]
    #[case("0g", None)]
    fn hex_digits_are_ascii_only(#[case] input: &str, #[case] expected: Option<Vec<u8>>) {
        assert_eq!(decode_hex(input), expected, "{input:?}");
    }

    #[test]
    fn binary_and_names() {
        assert_eq!(parse_atomic(BuiltinKind::HexBinary, "0aFF"), Some(AtomicValue::HexBinary(vec![0x0a, 0xff])));
        assert!(parse_atomic(BuiltinKind::HexBinary, "abc").is_none());
        assert_eq!(parse_atomic(BuiltinKind::Base64Binary, "aGk="), Some(AtomicValue::Base64Binary(b"hi".to_vec())));
        assert!(parse_atomic(BuiltinKind::Language, "en-US").is_some());
        assert!(parse_atomic(BuiltinKind::Language, "toolonglang").is_none());
        assert!(parse_atomic(BuiltinKind::NCName, "a:b").is_none());
        assert!(parse_atomic(BuiltinKind::QName, "a:b").is_some());
    }
}
