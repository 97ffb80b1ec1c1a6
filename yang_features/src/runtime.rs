use crate::feature::{evaluate, FeatureRef, FeatureUniverse};
use yang_diagnostic::{Error, Result};
use yang_ir::SchemaPath;

/// What a `set` call targets (spec §4.2: `name = "*"` means all features in
/// the module).
pub enum FeatureTarget {
    Named(FeatureRef),
    All,
}

/// `set(module, name, value)` (spec §4.2).
///
/// `module_features` lists every feature declared in the target module, in
/// declaration order; it is the caller's (module compiler's) job to resolve
/// a name to a [`FeatureRef`] and to supply this list for `"*"`.
pub fn set_feature(
    universe: &mut impl FeatureUniverse,
    module_features: &[FeatureRef],
    target: &FeatureTarget,
    enable: bool,
    path: &SchemaPath,
) -> Result<()> {
    match target {
        FeatureTarget::Named(r) => set_single(universe, *r, enable, path),
        FeatureTarget::All if enable => enable_all(universe, module_features, path),
        FeatureTarget::All => disable_all(universe, module_features),
    }
}

fn precondition_true(universe: &impl FeatureUniverse, r: FeatureRef) -> Result<bool> {
    let exprs = universe.feature(r).iffeatures.clone();
    for e in &exprs {
        if !evaluate(e, universe)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn set_single(
    universe: &mut impl FeatureUniverse,
    r: FeatureRef,
    enable: bool,
    path: &SchemaPath,
) -> Result<()> {
    if universe.feature(r).enabled == enable {
        // Idempotent: spec §8 "no side effects".
        return Ok(());
    }
    if enable {
        if !precondition_true(universe, r)? {
            return Err(Error::denied(
                path.clone(),
                "feature cannot be enabled: if-feature precondition is false",
            ));
        }
        universe.feature_mut(r).enabled = true;
    } else {
        universe.feature_mut(r).enabled = false;
    }
    propagate(universe, &[r])
}

fn enable_all(
    universe: &mut impl FeatureUniverse,
    module_features: &[FeatureRef],
    path: &SchemaPath,
) -> Result<()> {
    let mut changed = Vec::new();
    loop {
        let mut progressed = false;
        for &r in module_features {
            if universe.feature(r).enabled {
                continue;
            }
            if precondition_true(universe, r)? {
                universe.feature_mut(r).enabled = true;
                changed.push(r);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    let all_enabled = module_features.iter().all(|&r| universe.feature(r).enabled);
    if !all_enabled {
        for r in changed {
            universe.feature_mut(r).enabled = false;
        }
        return Err(Error::denied(
            path.clone(),
            "enable-all aborted: one or more features' if-feature preconditions never became true",
        ));
    }
    propagate(universe, &changed)
}

fn disable_all(universe: &mut impl FeatureUniverse, module_features: &[FeatureRef]) -> Result<()> {
    let mut changed = Vec::new();
    for &r in module_features {
        if universe.feature(r).enabled {
            universe.feature_mut(r).enabled = false;
            changed.push(r);
        }
    }
    propagate(universe, &changed)
}

/// Clear any enabled dependent feature whose `if-feature` no longer holds,
/// transitively (spec §4.2). Re-enabling is never automatic.
fn propagate(universe: &mut impl FeatureUniverse, changed: &[FeatureRef]) -> Result<()> {
    let mut worklist: Vec<FeatureRef> = changed.to_vec();
    while let Some(r) = worklist.pop() {
        let deps = universe.feature(r).depfeatures.clone();
        for df in deps {
            if universe.feature(df).enabled && !precondition_true(universe, df)? {
                universe.feature_mut(df).enabled = false;
                worklist.push(df);
            }
        }
    }
    Ok(())
}
