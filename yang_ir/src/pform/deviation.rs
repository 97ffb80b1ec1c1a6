use crate::StringId;

/// Declared divergence from a standard schema (spec §3, SPEC_FULL §C).
#[derive(Clone, Debug)]
pub struct DeviationP {
    pub target_path: StringId,
    pub description: Option<StringId>,
    pub deviates: Vec<DeviateP>,
}

/// One `deviate` substatement (RFC 7950 §7.20.3).
#[derive(Clone, Debug)]
pub enum DeviateP {
    NotSupported,
    Add(DeviatePropsP),
    Replace(DeviatePropsP),
    Delete(DeviatePropsP),
}

/// Properties a `deviate add/replace/delete` may touch. Bounded to what the
/// core already models (SPEC_FULL §C); anything else is rejected rather
/// than silently ignored.
#[derive(Clone, Debug, Default)]
pub struct DeviatePropsP {
    pub config: Option<bool>,
    pub mandatory: Option<bool>,
    pub min_elements: Option<u32>,
    pub max_elements: Option<u32>,
    pub default: Vec<StringId>,
    pub units: Option<StringId>,
    /// Statements named in the deviate that this core doesn't model
    /// (e.g. `unique`, `must`) — kept so the node compiler can reject them
    /// with `Validation` instead of pretending to apply them.
    pub unsupported_statements: Vec<StringId>,
}
