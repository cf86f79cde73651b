//! Bounded cache of compiled expressions.
//!
//! Schemas repeat the same test expressions across many declarations; the
//! cache hands out one shared [`Expression`] per distinct text and static
//! context.

use compact_str::CompactString;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

use crate::compiler::compile_with_context;
use crate::engine::Expression;
use crate::model::Atom;
use crate::runtime::{Error, StaticContext};

pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    expr: CompactString,
    namespaces: Vec<(String, Atom)>,
    default_function_namespace: Option<Atom>,
    default_type_namespace: Option<Atom>,
    max_depth: usize,
}

impl CacheKey {
    fn new(expr: &str, ctx: &StaticContext) -> Self {
        let mut namespaces: Vec<(String, Atom)> = ctx
            .namespaces
            .by_prefix
            .iter()
            .map(|(p, u)| (p.clone(), u.clone()))
            .collect();
        namespaces.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Self {
            expr: expr.into(),
            namespaces,
            default_function_namespace: ctx.default_function_namespace.clone(),
            default_type_namespace: ctx.default_type_namespace.clone(),
            max_depth: ctx.options.max_depth,
        }
    }
}

/// Thread-safe LRU cache of compiled expressions. Compile errors are not
/// cached.
pub struct ExpressionCache {
    inner: Mutex<LruCache<CacheKey, Arc<Expression>>>,
}

impl Default for ExpressionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ExpressionCache {
    /// A cache holding at most `capacity` expressions (at least one).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn get_or_compile(&self, expr: &str, ctx: &StaticContext) -> Result<Arc<Expression>, Error> {
        let key = CacheKey::new(expr, ctx);
        if let Some(hit) = self.lock().get(&key) {
            trace!(expression = expr, "expression cache hit");
            return Ok(Arc::clone(hit));
        }
        // compile outside the lock; a concurrent miss on the same key compiles twice
        let compiled = Arc::new(compile_with_context(expr, ctx)?);
        self.lock().put(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, Arc<Expression>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
