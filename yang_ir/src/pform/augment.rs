use crate::pform::NodeP;
use crate::StringId;

/// Cross-module schema extension by path (spec §3, SPEC_FULL §C).
///
/// `target_path` is an absolute schema node id: slash-separated, first
/// component `prefix:name`, remaining components `name` resolved within
/// whatever module the previous component landed in.
#[derive(Clone, Debug)]
pub struct AugmentP {
    pub target_path: StringId,
    pub when: Option<StringId>,
    pub iffeatures: Vec<StringId>,
    pub children: Vec<NodeP>,
}

/// A `uses`-site `refine` substatement (spec §3: "uses holds refines").
#[derive(Clone, Debug, Default)]
pub struct RefineP {
    pub target: StringId,
    pub new_config: Option<bool>,
    pub new_default: Vec<StringId>,
    pub new_mandatory: Option<bool>,
    pub new_presence: Option<bool>,
    pub new_description: Option<StringId>,
    pub new_min_elements: Option<u32>,
    pub new_max_elements: Option<u32>,
}
