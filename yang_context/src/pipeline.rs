//! Free functions backing the module pipeline (spec §4.8). [`crate::Context`]
//! owns the orchestration (it alone has both the parser and the module
//! table in scope); what lives here is the part of each step that's pure
//! bookkeeping over already-available data.

use rustc_hash::FxHashMap;
use yang_diagnostic::{Error, Result};
use yang_features::{compile_iffeature, Feature, FeatureNameResolver};
use yang_ir::pform::{FeatureP, ModuleP, YangVersion};
use yang_ir::{FeatureId, ModuleId, SchemaPath, StringDictionary, StringId};

use crate::module::LoadedModule;

/// Pass 1 of compiling a module's own features (spec §4.8 compile step 3,
/// first clause): every feature gets its `FeatureId` up front so same-module
/// `if-feature` references — forward or backward — always resolve, then
/// each feature's guarding expressions are compiled and the same-module
/// `depfeatures` back-links are filled in.
///
/// Cross-module `depfeatures` back-links are out of scope: a prefixed
/// `if-feature` still evaluates correctly through [`yang_features::FeatureUniverse`],
/// it just never registers on the referenced module's own feature, so
/// [`yang_features::runtime`]'s automatic-disable propagation only chains
/// within one module.
pub fn compile_module_features(
    items: &[FeatureP],
    dict: &dyn StringDictionary,
    version: YangVersion,
    features: &dyn FeatureNameResolver,
    home: ModuleId,
    path: &SchemaPath,
) -> Result<(Vec<Feature>, FxHashMap<StringId, FeatureId>)> {
    let mut compiled: Vec<Feature> = items.iter().map(|item| Feature::new(item.name)).collect();
    let mut names = FxHashMap::default();
    for (i, item) in items.iter().enumerate() {
        names.insert(item.name, FeatureId::new(i as u32));
    }

    for (i, item) in items.iter().enumerate() {
        let exprs = item
            .iffeatures
            .iter()
            .map(|&s| {
                let text = dict.resolve(s);
                compile_iffeature(&text, version, path, features)
            })
            .collect::<Result<Vec<_>>>()?;
        compiled[i].iffeatures = exprs;
    }

    for i in 0..items.len() {
        let this_ref = yang_features::FeatureRef(home, FeatureId::new(i as u32));
        let exprs = compiled[i].iffeatures.clone();
        for expr in &exprs {
            for r in expr.features() {
                if r.0 == home {
                    compiled[r.1.index()].depfeatures.push(this_ref);
                }
            }
        }
    }

    Ok((compiled, names))
}

/// Step 6 (spec §4.8): "if no prior module of that name, mark latest; else
/// compare revision strings lexicographically and transfer the latest flag
/// to the newer one." Returns whether the module being loaded is the new
/// latest.
pub fn determine_latest(
    modules: &mut [LoadedModule],
    name: StringId,
    revision: Option<StringId>,
    dict: &dyn StringDictionary,
) -> bool {
    let prior_latest = modules.iter_mut().find(|m| m.name == name && m.latest);
    match prior_latest {
        None => true,
        Some(prior) => {
            let is_newer = match (revision, prior.revision) {
                (Some(new), Some(old)) => dict.resolve(new) > dict.resolve(old),
                (Some(_), None) => true,
                (None, _) => false,
            };
            if is_newer {
                prior.latest = false;
                true
            } else {
                false
            }
        }
    }
}

/// Step 9 (spec §4.8): top-level typedefs and groupings share one
/// identifier namespace (RFC 7950 §6.2.1) and must not collide. Nested
/// typedefs/groupings inside a container or grouping body are not checked,
/// the same scope limitation [`LoadedModule::typedefs`](crate::module::LoadedModule::typedefs)
/// already carries.
pub fn check_typedef_grouping_collisions(parsed: &ModuleP, dict: &dyn StringDictionary, path: &SchemaPath) -> Result<()> {
    let mut seen = FxHashMap::default();
    for name in parsed.typedefs.iter().map(|t| t.name).chain(parsed.groupings.iter().map(|g| g.name)) {
        let text = dict.resolve(name);
        if seen.insert(text.clone(), ()).is_some() {
            return Err(Error::exists(path.clone(), format!("duplicate typedef/grouping name '{text}'")));
        }
    }
    Ok(())
}

/// Step 8, second clause (spec §4.8): "Reject importing the same target
/// twice."
pub fn check_no_duplicate_imports(parsed: &ModuleP, dict: &dyn StringDictionary, path: &SchemaPath) -> Result<()> {
    let mut seen = FxHashMap::default();
    for import in &parsed.imports {
        let text = dict.resolve(import.module);
        if seen.insert(text.clone(), ()).is_some() {
            return Err(Error::exists(path.clone(), format!("module '{text}' imported more than once")));
        }
    }
    Ok(())
}
