use xsd_xpath::compiler::compile_with_context;
use xsd_xpath::consts::{FN, XML, XS};
use xsd_xpath::runtime::{DEFAULT_MAX_DEPTH, ErrorCode, NamespaceResolver, StaticContext, StaticContextBuilder};
use xsd_xpath::{default_static_context, CompileOptions};

#[test]
fn default_context_binds_standard_prefixes() {
    let ctx = StaticContext::default();
    assert_eq!(ctx.resolve_prefix("xml").as_deref(), Some(XML));
    assert_eq!(ctx.resolve_prefix("xs").as_deref(), Some(XS));
    assert_eq!(ctx.resolve_prefix("fn").as_deref(), Some(FN));
    assert_eq!(ctx.resolve_prefix("xsi"), None);
    assert_eq!(ctx.default_function_namespace.as_deref(), Some(FN));
    assert_eq!(ctx.default_type_namespace, None);
    assert_eq!(ctx.options.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(default_static_context(), &ctx);
}

#[test]
fn unbound_prefix_raises_static_error() {
    let err = compile_with_context("@shop:id = 1", &StaticContext::default()).expect_err("expected static error");
    assert_eq!(err.code(), ErrorCode::XPST0081);
}

#[test]
fn builder_can_add_namespace() {
    let ctx = StaticContextBuilder::new()
        .with_namespace("shop", "urn:example:shop")
        .build();
    assert_eq!(ctx.resolve_prefix("shop").as_deref(), Some("urn:example:shop"));
    assert!(compile_with_context("@shop:id = 1", &ctx).is_ok());
}

#[test]
fn builder_cannot_rebind_xml() {
    let ctx = StaticContextBuilder::new()
        .with_namespace("xml", "urn:example:other")
        .build();
    assert_eq!(ctx.resolve_prefix("xml").as_deref(), Some(XML));
}

#[test]
fn rebinding_xs_changes_cast_resolution() {
    let ctx = StaticContextBuilder::new()
        .with_namespace("xs", "urn:example:types")
        .build();
    let err = compile_with_context("@a cast as xs:int", &ctx).expect_err("expected static error");
    assert_eq!(err.code(), ErrorCode::XPST0051);
}

#[test]
fn contexts_compare_by_value() {
    let a = StaticContextBuilder::new().with_max_depth(8).build();
    let b = StaticContext {
        options: CompileOptions { max_depth: 8 },
        ..StaticContext::default()
    };
    assert_eq!(a, b);
    assert_ne!(a, StaticContext::default());
}
