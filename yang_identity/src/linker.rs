//! Two-pass identity linker (spec §4.6) plus cycle detection over the
//! derivation DAG, which the source explicitly defers ("TODO in source")
//! but which this workspace implements rather than leaving unchecked.

use rustc_hash::FxHashMap;
use yang_diagnostic::{Error, Result};
use yang_features::{compile_iffeature, FeatureExpr, FeatureNameResolver};
use yang_ir::pform::{IdentityP, YangVersion};
use yang_ir::{IdentityId, IdentityRef, ModuleId, SchemaPath, StringDictionary, StringId};

use crate::identity::{Identity, IdentityUniverse};

fn compile_iffeatures(
    sources: &[StringId],
    dict: &dyn StringDictionary,
    version: YangVersion,
    features: &dyn FeatureNameResolver,
    path: &SchemaPath,
) -> Result<Vec<FeatureExpr>> {
    sources
        .iter()
        .map(|&id| {
            let text = dict.resolve(id);
            compile_iffeature(&text, version, path, features)
        })
        .collect()
}

/// Resolves a (possibly-prefixed) `base` reference to the identity it
/// names. An external collaborator: locating the target module via the
/// current module's import table is context-level bookkeeping the linker
/// itself doesn't own.
pub trait IdentityBaseResolver {
    fn resolve(&self, prefix: Option<StringId>, name: StringId) -> Result<IdentityRef>;
}

/// Pass 1 (spec §4.6): "Compile each identity's properties (`iffeatures`,
/// extensions)." Produces values the caller inserts into its own
/// per-module arena; base derivation is resolved separately in
/// [`link_bases`] once every module's identities exist to be pointed at.
pub fn compile_properties(
    items: &[IdentityP],
    dict: &dyn StringDictionary,
    features: &dyn FeatureNameResolver,
    version: YangVersion,
    path: &SchemaPath,
) -> Result<Vec<Identity>> {
    items
        .iter()
        .map(|item| {
            let mut identity = Identity::new(item.name, item.status.unwrap_or_default());
            identity.iffeatures = compile_iffeatures(&item.iffeatures, dict, version, features, path)?;
            Ok(identity)
        })
        .collect()
}

/// Pass 2 (spec §4.6): resolve each identity's declared `base`s and append
/// this identity to each base's `derived` list. Fails with `Reference` if
/// a base cannot be resolved.
pub fn link_bases(
    module: ModuleId,
    parsed: &[IdentityP],
    self_ids: &[IdentityId],
    universe: &mut dyn IdentityUniverse,
    resolver: &dyn IdentityBaseResolver,
    path: &SchemaPath,
) -> Result<()> {
    for (item, &own_id) in parsed.iter().zip(self_ids) {
        let own_ref = IdentityRef(module, own_id);
        for base in &item.bases {
            let target = resolver.resolve(base.prefix, base.name).map_err(|_| {
                Error::reference(path.clone(), "identity base does not resolve to a known identity")
            })?;
            universe.identity_mut(own_ref).bases.push(target);
            universe.identity_mut(target).derived.push(own_ref);
        }
    }
    Ok(())
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Visit {
    InProgress,
    Done,
}

/// Walk the full `base` DAG looking for a cycle. Not required by spec §4.6
/// (which defers it), but carried here per this workspace's expanded
/// scope: an identity that derives from itself, directly or transitively,
/// is rejected with `Validation` rather than left to loop forever the
/// first time something walks `derived`.
pub fn check_no_cycles(all: &[IdentityRef], universe: &dyn IdentityUniverse, path: &SchemaPath) -> Result<()> {
    let mut state: FxHashMap<IdentityRef, Visit> = FxHashMap::default();
    for &r in all {
        visit(r, universe, &mut state, path)?;
    }
    Ok(())
}

fn visit(
    r: IdentityRef,
    universe: &dyn IdentityUniverse,
    state: &mut FxHashMap<IdentityRef, Visit>,
    path: &SchemaPath,
) -> Result<()> {
    yang_stack::ensure_sufficient_stack(|| {
        match state.get(&r) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                return Err(Error::validation(
                    path.clone(),
                    "circular identity derivation",
                ));
            }
            None => {}
        }
        state.insert(r, Visit::InProgress);
        for &base in &universe.identity(r).bases {
            visit(base, universe, state, path)?;
        }
        state.insert(r, Visit::Done);
        Ok(())
    })
}
