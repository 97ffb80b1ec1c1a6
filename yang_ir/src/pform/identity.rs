use crate::{StringId, Status};

/// A possibly-prefixed reference to an identity, feature, typedef, or
/// grouping (spec §4.1, §4.3, §4.6: "feature references which may be
/// prefixed").
#[derive(Clone, Copy, Debug)]
pub struct IdentityRefP {
    pub prefix: Option<StringId>,
    pub name: StringId,
}

#[derive(Clone, Debug)]
pub struct IdentityP {
    pub name: StringId,
    pub bases: Vec<IdentityRefP>,
    pub iffeatures: Vec<StringId>,
    pub status: Option<Status>,
    pub description: Option<StringId>,
}
