//! The regex engine that actually matches strings against a compiled
//! pattern is external (spec §1, §6): the core only holds the translated
//! PCRE source and the opaque handle the engine hands back.

use std::fmt::Debug;

/// A compiled PCRE pattern, opaque to the core.
pub trait CompiledRegex: Debug {
    /// The PCRE source this was compiled from, kept for diagnostics.
    fn pcre_source(&self) -> &str;
}

/// `compile(pcre_source) -> opaque` with the flags from spec §4.5 step 4
/// (UTF-8, anchored, dollar-end-only, no-auto-capture, optionally studied)
/// implied by the engine, not re-specified per call.
pub trait PatternEngine {
    fn compile(&self, pcre_source: &str) -> Box<dyn CompiledRegex>;
}

/// Reference implementation: keeps the PCRE text verbatim without invoking
/// any real regex engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueRegex(String);

impl CompiledRegex for OpaqueRegex {
    fn pcre_source(&self) -> &str {
        &self.0
    }
}

#[derive(Default)]
pub struct PassthroughPatternEngine;

impl PatternEngine for PassthroughPatternEngine {
    fn compile(&self, pcre_source: &str) -> Box<dyn CompiledRegex> {
        Box::new(OpaqueRegex(pcre_source.to_string()))
    }
}
