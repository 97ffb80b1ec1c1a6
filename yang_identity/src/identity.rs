use yang_features::FeatureExpr;
use yang_ir::{IdentityRef, Status, StringId};

/// A compiled identity (spec §3): "name, `iffeatures`, `derived`
/// back-links ... flags. Forms a DAG; multiple inheritance via multiple
/// bases is allowed."
#[derive(Clone, Debug)]
pub struct Identity {
    pub name: StringId,
    pub status: Status,
    pub iffeatures: Vec<FeatureExpr>,
    /// Resolved bases, filled in by the linker's second pass.
    pub bases: Vec<IdentityRef>,
    /// Identities whose `base` points here (non-owning back-link, spec §3,
    /// §9), appended by the linker as it resolves each base.
    pub derived: Vec<IdentityRef>,
}

impl Identity {
    pub fn new(name: StringId, status: Status) -> Self {
        Identity {
            name,
            status,
            iffeatures: Vec::new(),
            bases: Vec::new(),
            derived: Vec::new(),
        }
    }
}

/// The set of all loaded identities, addressable by [`IdentityRef`] across
/// module boundaries (mirrors [`yang_features::FeatureUniverse`]; spec §9:
/// "derived"/"depfeatures" back-links stay valid because everything lives
/// in the same context).
pub trait IdentityUniverse {
    fn identity(&self, r: IdentityRef) -> &Identity;
    fn identity_mut(&mut self, r: IdentityRef) -> &mut Identity;
}
