//! Restricted XPath 2.0 test expressions for XML Schema 1.1 type alternatives
//! and assertions.
//!
//! An expression is compiled once against a namespace context and then
//! evaluated against the typed attributes of any number of elements:
//!
//! ```
//! use xsd_xpath::{compile_default, AttributeMap, ExpandedName};
//! use xsd_xpath::datatypes::{BuiltinKind, SimpleType};
//!
//! let expr = compile_default("@x > 0 and @x < 10").unwrap();
//! let attrs = AttributeMap::new()
//!     .with("x", SimpleType::builtin(BuiltinKind::Integer), "5")
//!     .unwrap();
//! assert!(expr.evaluate(&ExpandedName::local("item"), &attrs));
//! ```

pub mod cache;
pub mod compiler;
pub mod consts;
pub mod datatypes;
pub mod engine;
pub mod model;
pub mod parser;
pub mod runtime;
mod xml_chars;

pub use cache::ExpressionCache;
pub use compiler::{compile, compile_default, compile_with_context, compile_with_options, default_static_context};
pub use datatypes::{BuiltinTypes, TypeDescriptor, TypeRef, TypeResolver};
pub use engine::Expression;
pub use model::{AttributeMap, AttributeView, ExpandedName, TypedAttribute};
pub use runtime::{CompileOptions, Error, ErrorCode, NamespaceResolver, StaticContext, StaticContextBuilder};
