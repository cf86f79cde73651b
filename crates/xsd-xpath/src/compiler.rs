use std::sync::OnceLock;
use tracing::debug;

use crate::datatypes::{BuiltinTypes, TypeResolver};
use crate::engine::Expression;
use crate::model::Atom;
use crate::parser::{ParseContext, parse, scan};
use crate::runtime::{CompileOptions, Error, NamespaceResolver, StaticContext};

static DEFAULT_STATIC_CONTEXT: OnceLock<StaticContext> = OnceLock::new();

/// The context used by [`compile_default`]: `xml`, `xs` and `fn` bound, unprefixed
/// functions in the XPath functions namespace.
pub fn default_static_context() -> &'static StaticContext {
    DEFAULT_STATIC_CONTEXT.get_or_init(StaticContext::default)
}

fn fn_namespace() -> &'static Atom {
    static FN_NS: OnceLock<Atom> = OnceLock::new();
    FN_NS.get_or_init(|| Atom::from(crate::consts::FN))
}

/// Compiles `expr` with prefixes resolved by `namespaces` and cast targets by
/// `types`, using the default limits.
pub fn compile(
    expr: &str,
    namespaces: &dyn NamespaceResolver,
    types: &dyn TypeResolver,
) -> Result<Expression, Error> {
    compile_with_options(expr, namespaces, types, &CompileOptions::default())
}

pub fn compile_with_options(
    expr: &str,
    namespaces: &dyn NamespaceResolver,
    types: &dyn TypeResolver,
    options: &CompileOptions,
) -> Result<Expression, Error> {
    let ctx = ParseContext {
        namespaces,
        types,
        default_function_namespace: Some(fn_namespace()),
        default_type_namespace: None,
        options: *options,
    };
    compile_in(expr, &ctx)
}

/// Compiles against a static context; cast targets resolve to the built-in
/// types.
pub fn compile_with_context(expr: &str, static_ctx: &StaticContext) -> Result<Expression, Error> {
    let ctx = ParseContext {
        namespaces: static_ctx,
        types: &BuiltinTypes,
        default_function_namespace: static_ctx.default_function_namespace.as_ref(),
        default_type_namespace: static_ctx.default_type_namespace.as_ref(),
        options: static_ctx.options,
    };
    compile_in(expr, &ctx)
}

/// Compiles against [`default_static_context`].
pub fn compile_default(expr: &str) -> Result<Expression, Error> {
    compile_with_context(expr, default_static_context())
}

fn compile_in(expr: &str, ctx: &ParseContext<'_>) -> Result<Expression, Error> {
    let result = scan(expr).and_then(|tokens| {
        let token_count = tokens.len();
        let root = parse(tokens, ctx)?;
        debug!(expression = expr, tokens = token_count, nodes = root.node_count(), "compiled test expression");
        Ok(Expression::new(expr, root))
    });
    if let Err(err) = &result {
        debug!(expression = expr, code = err.code().as_str(), offset = err.offset(), error = %err, "test expression rejected");
    }
    result
}
