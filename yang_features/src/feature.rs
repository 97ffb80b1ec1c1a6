use crate::expr::FeatureExpr;
use yang_diagnostic::{Error, Result};
use yang_ir::{FeatureId, ModuleId, SchemaPath, StringId};

/// Module-qualified reference to a feature: features live in per-module
/// arenas (spec §9), so any cross-module reference — `depfeatures`
/// back-links, or a `prefix:name` in another module's `if-feature` — needs
/// both halves.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FeatureRef(pub ModuleId, pub FeatureId);

/// A compiled feature (spec §3).
#[derive(Clone, Debug)]
pub struct Feature {
    pub name: StringId,
    /// All `if-feature` expressions guarding this feature's own
    /// declaration. Enabled iff `enabled` is set AND every expression here
    /// evaluates true.
    pub iffeatures: Vec<FeatureExpr>,
    /// Features whose `if-feature` mentions this one (non-owning back-link,
    /// spec §3, §9).
    pub depfeatures: Vec<FeatureRef>,
    /// The explicit enable/disable bit; re-enabling after an automatic
    /// clear requires an explicit `set` call (spec §4.2: "not automatic").
    pub enabled: bool,
}

impl Feature {
    pub fn new(name: StringId) -> Self {
        Feature {
            name,
            iffeatures: Vec::new(),
            depfeatures: Vec::new(),
            enabled: false,
        }
    }
}

/// The set of all loaded features, addressable by [`FeatureRef`] across
/// module boundaries. Implemented by the context (spec §9: identity
/// `derived`/feature `depfeatures` back-links are non-owning references
/// that stay valid because everything lives in the same context).
pub trait FeatureUniverse {
    fn feature(&self, r: FeatureRef) -> &Feature;
    fn feature_mut(&mut self, r: FeatureRef) -> &mut Feature;
}

/// Evaluate a compiled expression's postfix bytecode (spec §4.2:
/// "recursive descent over the postfix using two running indices").
///
/// Expressed as an explicit-stack scan: the opcode index and the
/// feature-array index are the "two running indices"; since `if-feature`
/// expressions are shallow (a handful of terms at most), an explicit stack
/// is simpler than true call recursion and carries the same complexity.
pub fn evaluate(expr: &FeatureExpr, universe: &impl FeatureUniverse) -> Result<bool> {
    let mut stack: Vec<bool> = Vec::with_capacity(expr.feature_count());
    let mut fi = 0usize;
    for op in expr.ops() {
        match op {
            crate::expr::Op::Feature => {
                let v = value(universe, expr.features()[fi])?;
                fi += 1;
                stack.push(v);
            }
            crate::expr::Op::Not => {
                let a = pop_operand(&mut stack)?;
                stack.push(!a);
            }
            crate::expr::Op::And => {
                let b = pop_operand(&mut stack)?;
                let a = pop_operand(&mut stack)?;
                stack.push(a && b);
            }
            crate::expr::Op::Or => {
                let b = pop_operand(&mut stack)?;
                let a = pop_operand(&mut stack)?;
                stack.push(a || b);
            }
        }
    }
    // An empty expression list (no if-feature at all) is vacuously true.
    Ok(stack.pop().unwrap_or(true))
}

/// Every `evaluate` caller only ever hands it a [`FeatureExpr`] this crate's
/// own compiler produced, so an empty stack here means the postfix bytecode
/// itself is malformed — a bug in the compiler, not bad input, hence
/// `Internal` rather than any user-facing error kind.
fn pop_operand(stack: &mut Vec<bool>) -> Result<bool> {
    stack
        .pop()
        .ok_or_else(|| Error::internal(SchemaPath::new(), "malformed postfix if-feature expression: operand stack underflow"))
}

/// `value(feature)` (spec §4.2): enabled bit set AND every guarding
/// expression currently evaluates true.
pub fn value(universe: &impl FeatureUniverse, r: FeatureRef) -> Result<bool> {
    let f = universe.feature(r);
    if !f.enabled {
        return Ok(false);
    }
    for e in &f.iffeatures {
        if !evaluate(e, universe)? {
            return Ok(false);
        }
    }
    Ok(true)
}
