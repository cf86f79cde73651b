use rstest::rstest;
use xsd_xpath::datatypes::{BuiltinKind, SimpleType};
use xsd_xpath::{AttributeMap, ExpandedName, compile_default};

fn element() -> ExpandedName {
    ExpandedName::local("item")
}

fn attrs(kind: BuiltinKind, values: &[(&str, &str)]) -> AttributeMap {
    values.iter().fold(AttributeMap::new(), |map, (name, value)| {
        map.with(name, SimpleType::builtin(kind), value).expect("valid attribute")
    })
}

fn untyped(values: &[(&str, &str)]) -> AttributeMap {
    let mut map = AttributeMap::new();
    for (name, value) in values {
        map.insert_untyped(ExpandedName::local(name), value);
    }
    map
}

fn eval(expr: &str, attrs: &AttributeMap) -> bool {
    compile_default(expr).expect("compile").evaluate(&element(), attrs)
}

#[rstest]
#[case(&[("code", "A")], true)]
#[case(&[("code", "B")], false)]
#[case(&[], false)]
fn string_equality(#[case] values: &[(&str, &str)], #[case] expected: bool) {
    assert_eq!(eval("@code = 'A'", &attrs(BuiltinKind::String, values)), expected);
    assert_eq!(eval("@code = 'A'", &untyped(values)), expected);
}

#[rstest]
#[case(&[("x", "5")], true)]
#[case(&[("x", "15")], false)]
#[case(&[("x", "0")], false)]
#[case(&[("x", "9")], true)]
#[case(&[], false)]
fn integer_range(#[case] values: &[(&str, &str)], #[case] expected: bool) {
    assert_eq!(eval("@x > 0 and @x < 10", &attrs(BuiltinKind::Integer, values)), expected);
}

#[rstest]
#[case(&[("flag", "true")], true)]
#[case(&[("flag", "1")], true)]
#[case(&[("flag", "false")], false)]
#[case(&[("flag", "0")], false)]
#[case(&[("flag", "notabool")], false)]
#[case(&[], false)]
fn optional_boolean_cast(#[case] values: &[(&str, &str)], #[case] expected: bool) {
    assert_eq!(eval("@flag cast as xs:boolean ?", &untyped(values)), expected);
}

#[rstest]
#[case(&[("x", "0")], false)]
#[case(&[("x", "3")], true)]
#[case(&[], true)]
fn negated_comparison(#[case] values: &[(&str, &str)], #[case] expected: bool) {
    assert_eq!(eval("not(@x = 0)", &attrs(BuiltinKind::Integer, values)), expected);
}

#[rstest]
#[case(&[("a", "1"), ("b", "9"), ("c", "3")], true)]
#[case(&[("a", "9"), ("b", "2"), ("c", "3")], true)]
#[case(&[("a", "9"), ("b", "9"), ("c", "3")], false)]
#[case(&[("a", "1"), ("b", "2"), ("c", "4")], false)]
#[case(&[("a", "1")], false)]
fn grouped_disjunction(#[case] values: &[(&str, &str)], #[case] expected: bool) {
    assert_eq!(
        eval("(@a = 1 or @b = 2) and @c = 3", &attrs(BuiltinKind::Int, values)),
        expected
    );
}

#[rstest]
fn one_expression_many_elements() {
    let expr = compile_default("@kind = 'book' and @pages >= 100").unwrap();
    let mut long_book = AttributeMap::new()
        .with("pages", SimpleType::builtin(BuiltinKind::PositiveInteger), "350")
        .unwrap();
    long_book.insert_untyped(ExpandedName::local("kind"), "book");
    let mut pamphlet = AttributeMap::new()
        .with("pages", SimpleType::builtin(BuiltinKind::PositiveInteger), "12")
        .unwrap();
    pamphlet.insert_untyped(ExpandedName::local("kind"), "book");

    assert!(expr.evaluate(&ExpandedName::local("book"), &long_book));
    assert!(!expr.evaluate(&ExpandedName::local("book"), &pamphlet));
    assert!(!expr.evaluate(&ExpandedName::local("book"), &AttributeMap::new()));
}
