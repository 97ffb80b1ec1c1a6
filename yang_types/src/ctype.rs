//! Compiled type descriptor (spec §3: "reference-counted sum over the 20
//! YANG base types").

use std::rc::Rc;
use yang_features::FeatureExpr;
use yang_ir::{BaseType, IdentityRef, PatternId, RangeId, Status, StringId, XPathExpr};

#[derive(Clone, Debug)]
pub struct EnumItem {
    pub name: StringId,
    pub value: i64,
    pub status: Status,
    pub iffeatures: Vec<FeatureExpr>,
}

#[derive(Clone, Debug)]
pub struct BitItem {
    pub name: StringId,
    pub position: u32,
    pub status: Status,
    pub iffeatures: Vec<FeatureExpr>,
}

/// A compiled type. Unlike patterns/ranges (spec §3: "separately
/// refcounted" via dedicated handles), compiled types are shared through a
/// plain `Rc` — sharing a type needs no stable small-integer id the way a
/// wire format would, just a cheap clone of the handle (spec §4.3:
/// "aliased to base — no allocation").
#[derive(Debug)]
pub struct CType {
    pub base: BaseType,
    pub range: Option<RangeId>,
    pub length: Option<RangeId>,
    pub patterns: Vec<PatternId>,
    pub enums: Vec<EnumItem>,
    pub bits: Vec<BitItem>,
    pub fraction_digits: u8,
    pub bases: Vec<IdentityRef>,
    pub path: Option<Box<dyn XPathExpr>>,
    pub require_instance: bool,
    pub members: Vec<TypeHandle>,
}

pub type TypeHandle = Rc<CType>;

impl CType {
    /// A bare type with no restrictions, the starting point for the
    /// built-in end of a typedef chain.
    pub fn builtin(base: BaseType) -> Self {
        CType {
            base,
            range: None,
            length: None,
            patterns: Vec::new(),
            enums: Vec::new(),
            bits: Vec::new(),
            fraction_digits: 0,
            bases: Vec::new(),
            path: None,
            require_instance: false,
            members: Vec::new(),
        }
    }
}
