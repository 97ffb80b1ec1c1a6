use crate::{StringId, Status};

/// A parsed `type` statement, before the type compiler (§4.3) walks it.
#[derive(Clone, Debug, Default)]
pub struct TypeRefP {
    pub prefix: Option<StringId>,
    pub name: StringId,
    pub range: Option<StringId>,
    pub length: Option<StringId>,
    pub patterns: Vec<PatternP>,
    pub enums: Vec<EnumItemP>,
    pub bits: Vec<BitItemP>,
    pub fraction_digits: Option<u8>,
    pub path: Option<StringId>,
    pub require_instance: Option<bool>,
    /// `base` substatements of an `identityref` type.
    pub bases: Vec<crate::pform::IdentityRefP>,
    /// Member types of a `union` type.
    pub members: Vec<TypeRefP>,
}

/// A parsed `pattern` substatement.
///
/// `inverted` mirrors the P-form encoding spec §4.5 mentions (a leading
/// `0x15` byte in the source implementation signals a YANG 1.1
/// `modifier "invert-match"`); here it's just a plain flag.
#[derive(Clone, Debug)]
pub struct PatternP {
    pub pattern: StringId,
    pub inverted: bool,
    pub error_message: Option<StringId>,
    pub error_app_tag: Option<StringId>,
}

#[derive(Clone, Debug)]
pub struct EnumItemP {
    pub name: StringId,
    pub value: Option<i64>,
    pub status: Option<Status>,
    pub iffeatures: Vec<StringId>,
}

#[derive(Clone, Debug)]
pub struct BitItemP {
    pub name: StringId,
    pub position: Option<u32>,
    pub status: Option<Status>,
    pub iffeatures: Vec<StringId>,
}
