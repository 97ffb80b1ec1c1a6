//! The XPath compiler is external (spec §1, §6): the core stores only the
//! opaque handle it returns for `must`/`when` and never evaluates it.

use std::fmt::Debug;

/// An opaque, compiled `must`/`when` expression.
///
/// The core treats this as inert data: it is attached to nodes, copied
/// around, and eventually dropped, but never interpreted.
pub trait XPathExpr: Debug {
    /// The original source text, kept only for error messages.
    fn source(&self) -> &str;
}

/// `compile(expression) -> opaque` (spec §6).
pub trait XPathCompiler {
    fn compile(&self, expression: &str) -> Box<dyn XPathExpr>;
}

/// Reference implementation: wraps the source string verbatim without any
/// real parsing, since the core never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueExpr(String);

impl XPathExpr for OpaqueExpr {
    fn source(&self) -> &str {
        &self.0
    }
}

#[derive(Default)]
pub struct PassthroughXPathCompiler;

impl XPathCompiler for PassthroughXPathCompiler {
    fn compile(&self, expression: &str) -> Box<dyn XPathExpr> {
        Box::new(OpaqueExpr(expression.to_string()))
    }
}
