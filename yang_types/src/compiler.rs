//! Typedef-chain type compiler (spec §4.3).

use std::collections::HashSet;
use std::rc::Rc;

use yang_diagnostic::{Error, Result};
use yang_features::{compile_iffeature, FeatureNameResolver};
use yang_ir::{
    pform::{BitItemP, EnumItemP, TypeRefP, YangVersion},
    BaseType, IdentityRef, SchemaPath, Status, StringDictionary, StringId, XPathCompiler,
};

use crate::ctype::{BitItem, CType, EnumItem, TypeHandle};
use crate::range::{compile_range, narrows, RangeDomain, RangePool};
use yang_patterns::{PatternEngine, PatternPool};

/// One step down the typedef chain: either another typedef to keep walking
/// through, or the built-in base the walk bottoms out at (spec §4.3).
pub enum ChainStep {
    Typedef {
        type_ref: TypeRefP,
        status: Status,
        /// Already-compiled form, if this typedef was compiled before
        /// (spec §4.3: "if a typedef's compiled form is already cached,
        /// adopt it as base and stop walking").
        cached: Option<TypeHandle>,
    },
    Builtin(BaseType),
}

/// Resolves a (possibly-prefixed) type name to its next chain step. An
/// external collaborator (like [`StringDictionary`]): the actual typedef
/// tables live in modules the core doesn't enumerate on its own.
pub trait TypedefResolver {
    fn resolve(&self, prefix: Option<StringId>, name: StringId) -> Result<ChainStep>;
}

/// Resolves an `identityref` `base` to the identity it names.
pub trait IdentityNameResolver {
    fn resolve(&self, prefix: Option<StringId>, name: StringId) -> Result<IdentityRef>;
}

/// Collaborators the type compiler needs but doesn't own (spec §1: "OUT OF
/// SCOPE... specified only at their interface with the core").
pub struct TypeCompileCtx<'a> {
    pub dict: &'a dyn StringDictionary,
    pub typedefs: &'a dyn TypedefResolver,
    pub features: &'a dyn FeatureNameResolver,
    pub identities: &'a dyn IdentityNameResolver,
    pub xpath: &'a dyn XPathCompiler,
    pub patterns: &'a dyn PatternEngine,
    pub version: YangVersion,
}

fn base_bounds(base: BaseType) -> (i128, i128) {
    if base == BaseType::Decimal64 {
        return (i128::from(i64::MIN), i128::from(i64::MAX));
    }
    if base.is_signed() {
        return (
            i128::from(base.min_i64().unwrap_or(i64::MIN)),
            i128::from(base.max_i64().unwrap_or(i64::MAX)),
        );
    }
    (
        i128::from(base.min_u64().unwrap_or(0)),
        i128::from(base.max_u64().unwrap_or(u64::MAX)),
    )
}

fn range_domain(base: BaseType) -> RangeDomain {
    if base.is_signed() {
        RangeDomain::Signed
    } else {
        RangeDomain::Unsigned
    }
}

/// Status compatibility enforcement (spec §4.3): a `current` node may not
/// reference a `deprecated` typedef; a non-`obsolete` node may not
/// reference an `obsolete` typedef.
fn check_status_compatible(referencing: Status, referenced: Status, path: &SchemaPath) -> Result<()> {
    let violates = match referencing {
        Status::Current => referenced != Status::Current,
        Status::Deprecated => referenced == Status::Obsolete,
        Status::Obsolete => false,
    };
    if violates {
        return Err(Error::validation(
            path.clone(),
            format!("a {referencing:?} definition may not reference a {referenced:?} typedef"),
        ));
    }
    Ok(())
}

struct WalkResult {
    base_handle: TypeHandle,
    /// Levels from leaf to the base/cached point, inclusive, leaf-first.
    /// `levels.last()` is always the level whose own reference resolved
    /// straight to `base_handle` — the root typedef, or the leaf itself
    /// when it types directly against a built-in.
    levels: Vec<(TypeRefP, Status)>,
}

fn walk_chain(
    start: &TypeRefP,
    referencing_status: Status,
    resolver: &dyn TypedefResolver,
    path: &SchemaPath,
) -> Result<WalkResult> {
    let mut levels = Vec::new();
    let mut current = start.clone();
    let mut current_status = referencing_status;
    loop {
        // Every level visited, including the last one (whether it bottoms
        // out at a built-in or a cache hit), carries its own possible
        // restrictions and must be kept for the top-down merge pass below.
        levels.push((current.clone(), current_status));
        match resolver.resolve(current.prefix, current.name)? {
            ChainStep::Builtin(base) => {
                return Ok(WalkResult {
                    base_handle: Rc::new(CType::builtin(base)),
                    levels,
                });
            }
            ChainStep::Typedef {
                type_ref,
                status,
                cached,
            } => {
                check_status_compatible(current_status, status, path)?;
                if let Some(handle) = cached {
                    return Ok(WalkResult {
                        base_handle: handle,
                        levels,
                    });
                }
                current_status = status;
                current = type_ref;
            }
        }
    }
}

fn compile_iffeatures(
    sources: &[StringId],
    ctx: &TypeCompileCtx<'_>,
    path: &SchemaPath,
) -> Result<Vec<yang_features::FeatureExpr>> {
    sources
        .iter()
        .map(|&id| {
            let text = ctx.dict.resolve(id);
            compile_iffeature(&text, ctx.version, path, ctx.features)
        })
        .collect()
}

fn assign_enum_values(items: &[EnumItemP], ctx: &TypeCompileCtx<'_>, path: &SchemaPath) -> Result<Vec<EnumItem>> {
    if items.is_empty() {
        return Err(Error::validation(
            path.clone(),
            "enumeration type must declare at least one enum at its root typedef",
        ));
    }
    let mut out = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();
    let mut next = 0i64;
    for item in items {
        let value = item.value.unwrap_or(next);
        if !seen.insert(value) {
            return Err(Error::exists(path.clone(), format!("duplicate enum value {value}")));
        }
        // Spec §8: an auto-assigned value (no explicit `value` statement)
        // must fit an int32, the same range every enum value is bound to
        // (RFC 7950 §9.6.4.2) — checking this only at `i64::MAX` would let
        // an implicit run silently produce a value no enumeration can
        // legally hold.
        if item.value.is_none() && value > i64::from(i32::MAX) {
            return Err(Error::syntax(path.clone(), "auto-assigned enum value exceeds int32 range"));
        }
        next = value
            .checked_add(1)
            .ok_or_else(|| Error::denied(path.clone(), "enum value overflow"))?;
        out.push(EnumItem {
            name: item.name,
            value,
            status: item.status.unwrap_or_default(),
            iffeatures: compile_iffeatures(&item.iffeatures, ctx, path)?,
        });
    }
    Ok(out)
}

fn assign_bit_positions(items: &[BitItemP], ctx: &TypeCompileCtx<'_>, path: &SchemaPath) -> Result<Vec<BitItem>> {
    if items.is_empty() {
        return Err(Error::validation(
            path.clone(),
            "bits type must declare at least one bit at its root typedef",
        ));
    }
    let mut out = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();
    let mut next = 0u32;
    for item in items {
        let position = item.position.unwrap_or(next);
        if !seen.insert(position) {
            return Err(Error::exists(path.clone(), format!("duplicate bit position {position}")));
        }
        next = position
            .checked_add(1)
            .ok_or_else(|| Error::denied(path.clone(), "bit position overflow"))?;
        out.push(BitItem {
            name: item.name,
            position,
            status: item.status.unwrap_or_default(),
            iffeatures: compile_iffeatures(&item.iffeatures, ctx, path)?,
        });
    }
    Ok(out)
}

/// A derived enumeration/bits type may only *restrict* its base's item set
/// (RFC 7950 §9.6.4/§9.7.4: every name the derived level lists must already
/// be present in `base`, with the same value/position) — never add a name
/// the base doesn't have. Returns the restricted item list in the derived
/// level's own declared order.
fn restrict_enums(items: &[EnumItemP], base: &[EnumItem], ctx: &TypeCompileCtx<'_>, path: &SchemaPath) -> Result<Vec<EnumItem>> {
    let mut out = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();
    for item in items {
        let name = ctx.dict.resolve(item.name);
        let parent = base
            .iter()
            .find(|e| ctx.dict.resolve(e.name) == name)
            .ok_or_else(|| Error::validation(path.clone(), format!("enum '{name}' adds new item not present in the base type")))?;
        if let Some(explicit) = item.value {
            if explicit != parent.value {
                return Err(Error::validation(path.clone(), format!("enum '{name}' must not reassign its base type's value")));
            }
        }
        if !seen.insert(item.name) {
            return Err(Error::exists(path.clone(), format!("duplicate enum '{name}' in restriction")));
        }
        out.push(EnumItem {
            name: item.name,
            value: parent.value,
            status: item.status.unwrap_or(parent.status),
            iffeatures: compile_iffeatures(&item.iffeatures, ctx, path)?,
        });
    }
    Ok(out)
}

/// Same restriction rule as [`restrict_enums`], for `bits`.
fn restrict_bits(items: &[BitItemP], base: &[BitItem], ctx: &TypeCompileCtx<'_>, path: &SchemaPath) -> Result<Vec<BitItem>> {
    let mut out = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();
    for item in items {
        let name = ctx.dict.resolve(item.name);
        let parent = base
            .iter()
            .find(|b| ctx.dict.resolve(b.name) == name)
            .ok_or_else(|| Error::validation(path.clone(), format!("bit '{name}' adds new item not present in the base type")))?;
        if let Some(explicit) = item.position {
            if explicit != parent.position {
                return Err(Error::validation(path.clone(), format!("bit '{name}' must not reassign its base type's position")));
            }
        }
        if !seen.insert(item.name) {
            return Err(Error::exists(path.clone(), format!("duplicate bit '{name}' in restriction")));
        }
        out.push(BitItem {
            name: item.name,
            position: parent.position,
            status: item.status.unwrap_or(parent.status),
            iffeatures: compile_iffeatures(&item.iffeatures, ctx, path)?,
        });
    }
    Ok(out)
}

/// Sub-statements not legal on `base`'s variant are a `Syntax` error (spec
/// §4.3: "reject restrictions not applicable to this base type").
fn reject_inapplicable(base: BaseType, type_ref: &TypeRefP, path: &SchemaPath) -> Result<()> {
    let reject = |ok: bool, what: &str| -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(Error::syntax(path.clone(), format!("'{what}' is not valid on base type {base:?}")))
        }
    };
    reject(type_ref.range.is_none() || base.is_numeric(), "range")?;
    reject(
        type_ref.length.is_none() || matches!(base, BaseType::String | BaseType::Binary),
        "length",
    )?;
    reject(type_ref.patterns.is_empty() || base == BaseType::String, "pattern")?;
    reject(type_ref.enums.is_empty() || base == BaseType::Enumeration, "enum")?;
    reject(type_ref.bits.is_empty() || base == BaseType::Bits, "bit")?;
    reject(
        type_ref.fraction_digits.is_none() || base == BaseType::Decimal64,
        "fraction-digits",
    )?;
    reject(type_ref.path.is_none() || base == BaseType::Leafref, "path")?;
    reject(
        type_ref.require_instance.is_none() || matches!(base, BaseType::Leafref | BaseType::InstanceIdentifier),
        "require-instance",
    )?;
    reject(type_ref.bases.is_empty() || base == BaseType::Identityref, "base")?;
    reject(type_ref.members.is_empty() || base == BaseType::Union, "type (union member)")?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn apply_level(
    base: &TypeHandle,
    type_ref: &TypeRefP,
    ctx: &TypeCompileCtx<'_>,
    range_pool: &mut RangePool,
    pattern_pool: &mut PatternPool,
    path: &SchemaPath,
) -> Result<TypeHandle> {
    reject_inapplicable(base.base, type_ref, path)?;

    let has_changes = type_ref.range.is_some()
        || type_ref.length.is_some()
        || !type_ref.patterns.is_empty()
        || type_ref.fraction_digits.is_some()
        || type_ref.path.is_some()
        || type_ref.require_instance.is_some()
        || !type_ref.bases.is_empty()
        || !type_ref.members.is_empty()
        || !type_ref.enums.is_empty()
        || !type_ref.bits.is_empty();

    if !has_changes {
        // Spec §4.3: "the level's compiled type is aliased to base — no
        // allocation."
        return Ok(Rc::clone(base));
    }

    let range = match &type_ref.range {
        Some(id) => {
            let text = ctx.dict.resolve(*id);
            let (lo, hi) = base_bounds(base.base);
            let compiled = compile_range(&text, range_domain(base.base), type_ref.fraction_digits.unwrap_or(0), lo, hi, path)?;
            if let Some(parent_id) = base.range {
                if !narrows(&range_pool.get(parent_id)?.parts, &compiled.parts) {
                    return Err(Error::denied(path.clone(), "range is not equally or more limiting than its base type"));
                }
            }
            Some(range_pool.insert(compiled))
        }
        None => {
            if let Some(parent_id) = base.range {
                range_pool.retain(parent_id);
            }
            base.range
        }
    };

    let length = match &type_ref.length {
        Some(id) => {
            let text = ctx.dict.resolve(*id);
            let compiled = compile_range(&text, RangeDomain::Unsigned, 0, 0, i128::from(u64::MAX), path)?;
            if let Some(parent_id) = base.length {
                if !narrows(&range_pool.get(parent_id)?.parts, &compiled.parts) {
                    return Err(Error::denied(path.clone(), "length is not equally or more limiting than its base type"));
                }
            }
            Some(range_pool.insert(compiled))
        }
        None => {
            if let Some(parent_id) = base.length {
                range_pool.retain(parent_id);
            }
            base.length
        }
    };

    let own_patterns: Vec<_> = type_ref
        .patterns
        .iter()
        .map(|p| {
            let text = ctx.dict.resolve(p.pattern);
            pattern_pool.compile(&text, p.inverted, p.pattern, ctx.patterns)
        })
        .collect();
    let patterns = yang_patterns::inherit(pattern_pool, &base.patterns, own_patterns);

    let path_expr = match &type_ref.path {
        Some(id) => {
            let text = ctx.dict.resolve(*id);
            Some(ctx.xpath.compile(&text))
        }
        None => None,
    };

    let bases = if type_ref.bases.is_empty() {
        base.bases.clone()
    } else {
        type_ref
            .bases
            .iter()
            .map(|b| ctx.identities.resolve(b.prefix, b.name))
            .collect::<Result<Vec<_>>>()?
    };

    let members = if type_ref.members.is_empty() {
        base.members.clone()
    } else {
        type_ref
            .members
            .iter()
            .map(|m| compile_type_ref(m, Status::Current, ctx, range_pool, pattern_pool, path))
            .collect::<Result<Vec<_>>>()?
    };

    let enums = if type_ref.enums.is_empty() {
        base.enums.clone()
    } else {
        restrict_enums(&type_ref.enums, &base.enums, ctx, path)?
    };
    let bits = if type_ref.bits.is_empty() {
        base.bits.clone()
    } else {
        restrict_bits(&type_ref.bits, &base.bits, ctx, path)?
    };

    Ok(Rc::new(CType {
        base: base.base,
        range,
        length,
        patterns,
        enums,
        bits,
        fraction_digits: type_ref.fraction_digits.unwrap_or(base.fraction_digits),
        bases,
        path: path_expr,
        require_instance: type_ref.require_instance.unwrap_or(base.require_instance),
        members,
    }))
}

/// Compile one `type` reference, walking its typedef chain and merging
/// restrictions built-in-toward-leaf (spec §4.3).
pub fn compile_type_ref(
    type_ref: &TypeRefP,
    referencing_status: Status,
    ctx: &TypeCompileCtx<'_>,
    range_pool: &mut RangePool,
    pattern_pool: &mut PatternPool,
    path: &SchemaPath,
) -> Result<TypeHandle> {
    let walk = walk_chain(type_ref, referencing_status, ctx.typedefs, path)?;
    let mut handle = walk.base_handle;

    // Root-level enum/bits are only legal at the level closest to the
    // built-in (spec §4.3: "must have >= 1 ... at the root typedef, not at
    // further derivations"), so apply them once, to the base, before
    // walking the rest of the chain.
    if handle.base == BaseType::Enumeration && handle.enums.is_empty() {
        if let Some((root_ref, _)) = walk.levels.last() {
            if !root_ref.enums.is_empty() {
                let enums = assign_enum_values(&root_ref.enums, ctx, path)?;
                handle = Rc::new(CType { enums, ..clone_ctype(&handle) });
            }
        }
    }
    if handle.base == BaseType::Bits && handle.bits.is_empty() {
        if let Some((root_ref, _)) = walk.levels.last() {
            if !root_ref.bits.is_empty() {
                let bits = assign_bit_positions(&root_ref.bits, ctx, path)?;
                handle = Rc::new(CType { bits, ..clone_ctype(&handle) });
            }
        }
    }

    for (type_ref, _status) in walk.levels.iter().rev() {
        handle = apply_level(&handle, type_ref, ctx, range_pool, pattern_pool, path)?;
    }
    Ok(handle)
}

fn clone_ctype(t: &CType) -> CType {
    CType {
        base: t.base,
        range: t.range,
        length: t.length,
        patterns: t.patterns.clone(),
        enums: t.enums.clone(),
        bits: t.bits.clone(),
        fraction_digits: t.fraction_digits,
        bases: t.bases.clone(),
        path: None,
        require_instance: t.require_instance,
        members: t.members.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yang_ir::dictionary::SimpleDictionary;
    use yang_ir::pform::EnumItemP;
    use yang_ir::xpath::PassthroughXPathCompiler;
    use yang_ir::{FeatureId, IdentityId, ModuleId};
    use yang_patterns::PassthroughPatternEngine;

    use crate::range::RangePart;

    struct StubFeatures;
    impl FeatureNameResolver for StubFeatures {
        fn resolve(&self, _prefix: Option<&str>, _name: &str) -> Option<yang_features::FeatureRef> {
            None
        }
    }

    struct StubIdentities;
    impl IdentityNameResolver for StubIdentities {
        fn resolve(&self, _prefix: Option<StringId>, _name: StringId) -> Result<IdentityRef> {
            Ok(IdentityRef(ModuleId::new(0), IdentityId::new(0)))
        }
    }

    fn path() -> SchemaPath {
        SchemaPath::root("m")
    }

    /// Resolver for a leaf typed straight against a built-in, no typedef
    /// indirection at all.
    struct DirectBuiltin(BaseType);
    impl TypedefResolver for DirectBuiltin {
        fn resolve(&self, _prefix: Option<StringId>, _name: StringId) -> Result<ChainStep> {
            Ok(ChainStep::Builtin(self.0))
        }
    }

    /// Resolver driven by the dictionary text of the referenced name, so a
    /// single table can model a whole chain of typedefs.
    struct NamedChain<'a> {
        dict: &'a SimpleDictionary,
    }

    impl TypedefResolver for NamedChain<'_> {
        fn resolve(&self, _prefix: Option<StringId>, name: StringId) -> Result<ChainStep> {
            match self.dict.resolve(name).as_str() {
                "octet" => Ok(ChainStep::Typedef {
                    type_ref: TypeRefP {
                        name: self.dict.intern("uint8"),
                        range: Some(self.dict.intern("0..200")),
                        ..Default::default()
                    },
                    status: Status::Current,
                    cached: None,
                }),
                "old" => Ok(ChainStep::Typedef {
                    type_ref: TypeRefP {
                        name: self.dict.intern("string"),
                        ..Default::default()
                    },
                    status: Status::Deprecated,
                    cached: None,
                }),
                "alias" => Ok(ChainStep::Typedef {
                    type_ref: TypeRefP {
                        name: self.dict.intern("string"),
                        ..Default::default()
                    },
                    status: Status::Current,
                    cached: None,
                }),
                "uint8" => Ok(ChainStep::Builtin(BaseType::Uint8)),
                "string" => Ok(ChainStep::Builtin(BaseType::String)),
                "choice" => Ok(ChainStep::Builtin(BaseType::Union)),
                other => panic!("unexpected typedef name in test: {other}"),
            }
        }
    }

    #[test]
    fn leaf_typed_directly_against_builtin_keeps_its_own_length() {
        let dict = SimpleDictionary::new();
        let resolver = DirectBuiltin(BaseType::String);
        let features = StubFeatures;
        let identities = StubIdentities;
        let xpath = PassthroughXPathCompiler;
        let patterns = PassthroughPatternEngine;
        let ctx = TypeCompileCtx {
            dict: &dict,
            typedefs: &resolver,
            features: &features,
            identities: &identities,
            xpath: &xpath,
            patterns: &patterns,
            version: yang_ir::pform::YangVersion::V1_1,
        };
        let mut range_pool = RangePool::new();
        let mut pattern_pool = PatternPool::new();
        let type_ref = TypeRefP {
            name: dict.intern("string"),
            length: Some(dict.intern("1..10")),
            ..Default::default()
        };
        let handle = compile_type_ref(&type_ref, Status::Current, &ctx, &mut range_pool, &mut pattern_pool, &path())
            .unwrap();
        let length_id = handle.length.expect("length restriction was applied");
        assert_eq!(range_pool.get(length_id).unwrap().parts, vec![RangePart { min: 1, max: 10 }]);
    }

    #[test]
    fn typedef_chain_narrows_range_down_to_the_leaf() {
        let dict = SimpleDictionary::new();
        let resolver = NamedChain { dict: &dict };
        let features = StubFeatures;
        let identities = StubIdentities;
        let xpath = PassthroughXPathCompiler;
        let patterns = PassthroughPatternEngine;
        let ctx = TypeCompileCtx {
            dict: &dict,
            typedefs: &resolver,
            features: &features,
            identities: &identities,
            xpath: &xpath,
            patterns: &patterns,
            version: yang_ir::pform::YangVersion::V1_1,
        };
        let mut range_pool = RangePool::new();
        let mut pattern_pool = PatternPool::new();
        let type_ref = TypeRefP {
            name: dict.intern("octet"),
            range: Some(dict.intern("10..20")),
            ..Default::default()
        };
        let handle = compile_type_ref(&type_ref, Status::Current, &ctx, &mut range_pool, &mut pattern_pool, &path())
            .unwrap();
        assert_eq!(handle.base, BaseType::Uint8);
        let range_id = handle.range.expect("range restriction was applied");
        assert_eq!(range_pool.get(range_id).unwrap().parts, vec![RangePart { min: 10, max: 20 }]);
    }

    #[test]
    fn typedef_chain_rejects_widening_range() {
        let dict = SimpleDictionary::new();
        let resolver = NamedChain { dict: &dict };
        let features = StubFeatures;
        let identities = StubIdentities;
        let xpath = PassthroughXPathCompiler;
        let patterns = PassthroughPatternEngine;
        let ctx = TypeCompileCtx {
            dict: &dict,
            typedefs: &resolver,
            features: &features,
            identities: &identities,
            xpath: &xpath,
            patterns: &patterns,
            version: yang_ir::pform::YangVersion::V1_1,
        };
        let mut range_pool = RangePool::new();
        let mut pattern_pool = PatternPool::new();
        let type_ref = TypeRefP {
            name: dict.intern("octet"),
            range: Some(dict.intern("0..500")),
            ..Default::default()
        };
        let err = compile_type_ref(&type_ref, Status::Current, &ctx, &mut range_pool, &mut pattern_pool, &path())
            .unwrap_err();
        assert_eq!(err.kind, yang_diagnostic::ErrorKind::Denied);
    }

    #[test]
    fn current_leaf_cannot_reference_a_deprecated_typedef() {
        let dict = SimpleDictionary::new();
        let resolver = NamedChain { dict: &dict };
        let features = StubFeatures;
        let identities = StubIdentities;
        let xpath = PassthroughXPathCompiler;
        let patterns = PassthroughPatternEngine;
        let ctx = TypeCompileCtx {
            dict: &dict,
            typedefs: &resolver,
            features: &features,
            identities: &identities,
            xpath: &xpath,
            patterns: &patterns,
            version: yang_ir::pform::YangVersion::V1_1,
        };
        let mut range_pool = RangePool::new();
        let mut pattern_pool = PatternPool::new();
        let type_ref = TypeRefP {
            name: dict.intern("old"),
            ..Default::default()
        };
        let err = compile_type_ref(&type_ref, Status::Current, &ctx, &mut range_pool, &mut pattern_pool, &path())
            .unwrap_err();
        assert_eq!(err.kind, yang_diagnostic::ErrorKind::Validation);
    }

    #[test]
    fn unrestricted_derivation_is_aliased_without_its_own_restrictions() {
        let dict = SimpleDictionary::new();
        let resolver = NamedChain { dict: &dict };
        let features = StubFeatures;
        let identities = StubIdentities;
        let xpath = PassthroughXPathCompiler;
        let patterns = PassthroughPatternEngine;
        let ctx = TypeCompileCtx {
            dict: &dict,
            typedefs: &resolver,
            features: &features,
            identities: &identities,
            xpath: &xpath,
            patterns: &patterns,
            version: yang_ir::pform::YangVersion::V1_1,
        };
        let mut range_pool = RangePool::new();
        let mut pattern_pool = PatternPool::new();
        let type_ref = TypeRefP {
            name: dict.intern("alias"),
            ..Default::default()
        };
        let handle = compile_type_ref(&type_ref, Status::Current, &ctx, &mut range_pool, &mut pattern_pool, &path())
            .unwrap();
        assert_eq!(handle.base, BaseType::String);
        assert!(handle.range.is_none());
        assert!(handle.length.is_none());
        assert!(handle.patterns.is_empty());
    }

    #[test]
    fn enum_values_are_auto_assigned_at_the_root_typedef() {
        let dict = SimpleDictionary::new();
        let resolver = DirectBuiltin(BaseType::Enumeration);
        let features = StubFeatures;
        let identities = StubIdentities;
        let xpath = PassthroughXPathCompiler;
        let patterns = PassthroughPatternEngine;
        let ctx = TypeCompileCtx {
            dict: &dict,
            typedefs: &resolver,
            features: &features,
            identities: &identities,
            xpath: &xpath,
            patterns: &patterns,
            version: yang_ir::pform::YangVersion::V1_1,
        };
        let mut range_pool = RangePool::new();
        let mut pattern_pool = PatternPool::new();
        let type_ref = TypeRefP {
            name: dict.intern("enumeration"),
            enums: vec![
                EnumItemP {
                    name: dict.intern("up"),
                    value: None,
                    status: None,
                    iffeatures: Vec::new(),
                },
                EnumItemP {
                    name: dict.intern("down"),
                    value: Some(5),
                    status: None,
                    iffeatures: Vec::new(),
                },
                EnumItemP {
                    name: dict.intern("dormant"),
                    value: None,
                    status: None,
                    iffeatures: Vec::new(),
                },
            ],
            ..Default::default()
        };
        let handle = compile_type_ref(&type_ref, Status::Current, &ctx, &mut range_pool, &mut pattern_pool, &path())
            .unwrap();
        let values: Vec<i64> = handle.enums.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![0, 5, 6]);
    }

    #[test]
    fn enumeration_with_no_enums_anywhere_in_the_chain_is_rejected() {
        let dict = SimpleDictionary::new();
        let resolver = DirectBuiltin(BaseType::Enumeration);
        let features = StubFeatures;
        let identities = StubIdentities;
        let xpath = PassthroughXPathCompiler;
        let patterns = PassthroughPatternEngine;
        let ctx = TypeCompileCtx {
            dict: &dict,
            typedefs: &resolver,
            features: &features,
            identities: &identities,
            xpath: &xpath,
            patterns: &patterns,
            version: yang_ir::pform::YangVersion::V1_1,
        };
        let mut range_pool = RangePool::new();
        let mut pattern_pool = PatternPool::new();
        let type_ref = TypeRefP {
            name: dict.intern("enumeration"),
            ..Default::default()
        };
        let err = compile_type_ref(&type_ref, Status::Current, &ctx, &mut range_pool, &mut pattern_pool, &path())
            .unwrap_err();
        assert_eq!(err.kind, yang_diagnostic::ErrorKind::Validation);
    }

    #[test]
    fn union_members_are_compiled_independently() {
        let dict = SimpleDictionary::new();
        let resolver = NamedChain { dict: &dict };
        let features = StubFeatures;
        let identities = StubIdentities;
        let xpath = PassthroughXPathCompiler;
        let patterns = PassthroughPatternEngine;
        let ctx = TypeCompileCtx {
            dict: &dict,
            typedefs: &resolver,
            features: &features,
            identities: &identities,
            xpath: &xpath,
            patterns: &patterns,
            version: yang_ir::pform::YangVersion::V1_1,
        };
        let mut range_pool = RangePool::new();
        let mut pattern_pool = PatternPool::new();
        let type_ref = TypeRefP {
            name: dict.intern("choice"),
            members: vec![
                TypeRefP {
                    name: dict.intern("string"),
                    ..Default::default()
                },
                TypeRefP {
                    name: dict.intern("uint8"),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let handle = compile_type_ref(&type_ref, Status::Current, &ctx, &mut range_pool, &mut pattern_pool, &path())
            .unwrap();
        assert_eq!(handle.members.len(), 2);
        assert_eq!(handle.members[0].base, BaseType::String);
        assert_eq!(handle.members[1].base, BaseType::Uint8);
    }
}
