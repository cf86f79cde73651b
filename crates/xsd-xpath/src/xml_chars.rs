//! XML character and name predicates (XML 1.0 fifth edition).

/// `Char` production: the characters allowed anywhere in an XML document.
pub(crate) fn is_xml_char(ch: char) -> bool {
    matches!(ch,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// `NameStartChar` without the colon.
pub(crate) fn is_ncname_start_char(ch: char) -> bool {
    matches!(ch,
        'A'..='Z' | 'a'..='z' | '_'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// `NameChar` without the colon.
pub(crate) fn is_ncname_char(ch: char) -> bool {
    is_ncname_start_char(ch)
        || matches!(ch,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

pub(crate) fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_ncname_start_char(first) => chars.all(is_ncname_char),
        _ => false,
    }
}

/// `Name`: like an NCName but colons are allowed anywhere.
pub(crate) fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first == ':' || is_ncname_start_char(first) => {
            chars.all(|c| c == ':' || is_ncname_char(c))
        }
        _ => false,
    }
}

pub(crate) fn is_nmtoken(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == ':' || is_ncname_char(c))
}

/// Lexical `QName`: `NCName (':' NCName)?`.
pub(crate) fn is_qname(s: &str) -> bool {
    match s.split_once(':') {
        Some((prefix, local)) => is_ncname(prefix) && is_ncname(local),
        None => is_ncname(s),
    }
}

pub(crate) fn is_xml_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// `whiteSpace="replace"`: every tab, LF and CR becomes a space.
pub(crate) fn replace_whitespace(input: &str) -> String {
    input
        .chars()
        .map(|ch| if is_xml_whitespace(ch) { ' ' } else { ch })
        .collect()
}

/// `whiteSpace="collapse"`: replace, squeeze runs of spaces, trim.
pub(crate) fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for part in input.split(is_xml_whitespace).filter(|p| !p.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ncname_accepts_non_ascii_letters() {
        assert!(is_ncname("größe"));
        assert!(is_ncname("_x.y-z"));
        assert!(!is_ncname("1abc"));
        assert!(!is_ncname("a:b"));
    }

    #[test]
    fn qname_needs_two_ncnames() {
        assert!(is_qname("xs:int"));
        assert!(!is_qname("xs:"));
        assert!(!is_qname(":a"));
        assert!(!is_qname("a:b:c"));
    }

    #[test]
    fn collapse_squeezes_and_trims() {
        assert_eq!(collapse_whitespace("  a \t\n b  "), "a b");
        assert_eq!(replace_whitespace("a\tb\n"), "a b ");
    }
}
