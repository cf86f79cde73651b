use rstest::rstest;
use xsd_xpath::parser::scan;
use xsd_xpath::parser::tokens::TokenKind;

fn kinds(input: &str) -> Vec<TokenKind> {
    scan(input)
        .expect("scan")
        .tokens()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[rstest]
fn attribute_comparison_tokens() {
    let ts = scan("@code = 'A'").unwrap();
    let toks = ts.tokens();
    assert_eq!(
        toks.iter().map(|t| t.kind).collect::<Vec<_>>(),
        vec![TokenKind::At, TokenKind::NCName, TokenKind::Eq, TokenKind::String]
    );
    assert_eq!(toks[1].text(), "code");
    assert_eq!(toks[3].text(), "A");
}

#[rstest]
fn offsets_are_byte_positions() {
    let ts = scan("@a  >= 10").unwrap();
    let offsets: Vec<usize> = ts.tokens().iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 1, 4, 7]);
}

#[rstest]
#[case("12")]
#[case("1.5")]
#[case("3.")]
#[case("1e10")]
#[case("2.5E-3")]
#[case("7e+2")]
fn numeric_literals_keep_their_text(#[case] input: &str) {
    let ts = scan(input).unwrap();
    assert_eq!(ts.len(), 1);
    assert_eq!(ts.tokens()[0].kind, TokenKind::Number);
    assert_eq!(ts.tokens()[0].text(), input);
}

#[rstest]
#[case("'  a \t b '", "  a \t b ")]
#[case("\"say 'hi'\"", "say 'hi'")]
#[case("''", "")]
fn string_literals_are_taken_verbatim(#[case] input: &str, #[case] expected: &str) {
    let ts = scan(input).unwrap();
    assert_eq!(ts.tokens()[0].kind, TokenKind::String);
    assert_eq!(ts.tokens()[0].text(), expected);
}

#[rstest]
fn doubled_quotes_are_two_literals() {
    assert_eq!(kinds("'it''s'"), vec![TokenKind::String, TokenKind::String]);
}

#[rstest]
fn keywords_only_for_bare_names() {
    assert_eq!(
        kinds("@a cast as xs:int"),
        vec![TokenKind::At, TokenKind::NCName, TokenKind::Cast, TokenKind::As, TokenKind::QName]
    );
    assert_eq!(kinds("order"), vec![TokenKind::NCName]);
    assert_eq!(kinds("p:or"), vec![TokenKind::QName]);
}

#[rstest]
fn wildcards() {
    let ts = scan("@* @ns:*").unwrap();
    let toks = ts.tokens();
    assert_eq!(toks[1].kind, TokenKind::Star);
    assert_eq!(toks[3].kind, TokenKind::NsWildcard);
    assert_eq!(toks[3].text(), "ns");
}

#[rstest]
fn whitespace_is_insignificant() {
    assert_eq!(kinds("\t@a\r\n=\n1 "), kinds("@a=1"));
}

#[rstest]
#[case("'abc", 0)]
#[case("@a = \"x", 5)]
#[case("1e", 0)]
#[case("1e+", 0)]
#[case("12abc", 0)]
#[case("1.2.3", 0)]
#[case("@a ! @b", 3)]
#[case("$x", 0)]
#[case("@a, @b", 2)]
#[case("a/b", 1)]
#[case("@a + 1", 3)]
#[case("[1]", 0)]
#[case("@a | @b", 3)]
#[case("@a;", 2)]
#[case(".5", 0)]
#[case("-1", 0)]
#[case("p:1", 1)]
#[case(":a", 0)]
fn lexical_errors(#[case] input: &str, #[case] offset: usize) {
    let err = scan(input).unwrap_err();
    assert!(err.is_lexical(), "{input}: {err}");
    assert_eq!(err.offset(), offset, "{input}");
}

#[rstest]
fn characters_outside_xml_char_are_rejected() {
    let err = scan("@a = '\u{1}'").unwrap_err();
    assert!(err.is_lexical());
    assert!(err.message().contains("U+0001"), "{err}");

    let err = scan("@a \u{B} = 1").unwrap_err();
    assert_eq!(err.offset(), 3);
}

#[rstest]
fn non_ascii_names() {
    let ts = scan("@prix§").unwrap_err();
    assert!(ts.is_lexical());
    let ts = scan("@名前 = 'x'").unwrap();
    assert_eq!(ts.tokens()[1].text(), "名前");
}

#[rstest]
fn empty_input_has_no_tokens() {
    assert!(scan("").unwrap().is_empty());
    assert!(scan("  \n").unwrap().is_empty());
}
