use crate::pform::{
    AugmentP, DeviationP, ExtensionInstanceP, FeatureP, GroupingP, IdentityP, NodeCommonP, NodeP,
    TypedefP,
};
use crate::StringId;

/// YANG language version a module was written against (spec §4.1: "require
/// YANG version 1.1" for `if-feature` parentheses/operators).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum YangVersion {
    #[default]
    V1_0,
    V1_1,
}

#[derive(Copy, Clone, Debug)]
pub struct RevisionP {
    pub date: StringId,
    pub description: Option<StringId>,
}

#[derive(Copy, Clone, Debug)]
pub struct ImportP {
    pub module: StringId,
    pub prefix: StringId,
    pub revision: Option<StringId>,
}

#[derive(Copy, Clone, Debug)]
pub struct IncludeP {
    pub submodule: StringId,
    pub revision: Option<StringId>,
}

#[derive(Clone, Debug)]
pub struct RpcP {
    pub common: NodeCommonP,
    pub typedefs: Vec<TypedefP>,
    pub groupings: Vec<GroupingP>,
    pub input: Vec<NodeP>,
    pub output: Vec<NodeP>,
}

#[derive(Clone, Debug)]
pub struct NotificationP {
    pub common: NodeCommonP,
    pub typedefs: Vec<TypedefP>,
    pub groupings: Vec<GroupingP>,
    pub children: Vec<NodeP>,
}

/// Top-level parsed module or submodule (spec §3).
#[derive(Clone, Debug)]
pub struct ModuleP {
    pub name: StringId,
    pub namespace: StringId,
    pub prefix: StringId,
    /// Submodule's owning main module, if this is a submodule.
    pub belongs_to: Option<StringId>,
    pub yang_version: YangVersion,
    /// Not necessarily sorted yet; the module pipeline sorts newest-first
    /// (spec §4.8 step 2).
    pub revisions: Vec<RevisionP>,
    pub imports: Vec<ImportP>,
    pub includes: Vec<IncludeP>,
    pub features: Vec<FeatureP>,
    pub identities: Vec<IdentityP>,
    pub typedefs: Vec<TypedefP>,
    pub groupings: Vec<GroupingP>,
    pub data: Vec<NodeP>,
    pub augments: Vec<AugmentP>,
    pub rpcs: Vec<RpcP>,
    pub notifications: Vec<NotificationP>,
    pub deviations: Vec<DeviationP>,
    pub extensions: Vec<ExtensionInstanceP>,
}

impl ModuleP {
    pub fn is_submodule(&self) -> bool {
        self.belongs_to.is_some()
    }

    /// Latest revision date, if any were declared.
    pub fn latest_revision(&self) -> Option<StringId> {
        self.revisions.first().map(|r| r.date)
    }

    /// Sort revisions newest-first by lexicographic date comparison (spec
    /// §4.8 step 2; dates are `YYYY-MM-DD` so lexicographic order is
    /// chronological order).
    pub fn sort_revisions(&mut self, dict: &dyn crate::StringDictionary) {
        self.revisions
            .sort_by(|a, b| dict.resolve(b.date).cmp(&dict.resolve(a.date)));
    }
}
