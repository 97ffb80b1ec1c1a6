//! Per-module state the context owns (spec §3, §4.8): the parsed tree and,
//! once it exists, the compiled arena.

use rustc_hash::FxHashMap;
use yang_features::Feature;
use yang_identity::Identity;
use yang_ir::pform::{ModuleP, TypedefP};
use yang_ir::{FeatureId, IdentityId, ModuleId, NodeId, StringId};
use yang_node::{ExtensionInstance, NodeArena};
use yang_types::TypeHandle;

/// Everything compiled out of one module's P-form (spec §4.8 step 1:
/// "allocate C-form, copy metadata").
pub struct CompiledModule {
    pub features: Vec<Feature>,
    pub feature_names: FxHashMap<StringId, FeatureId>,
    pub identities: Vec<Identity>,
    pub identity_names: FxHashMap<StringId, IdentityId>,
    /// Typedef chains already walked to a stable handle, keyed by name.
    /// Purely a lookup-avoidance cache this crate happens to keep — unlike
    /// the typedef resolver's own `cached` field (spec §4.3), which this
    /// workspace never populates, this one costs nothing to maintain
    /// because the module, not the resolver trait, owns it.
    pub typedef_cache: FxHashMap<StringId, TypeHandle>,
    pub nodes: NodeArena,
    pub top: Option<NodeId>,
    /// Module-level extension instances (SPEC_FULL §C). Per-node extension
    /// instances live on the node itself; these are the ones that appear
    /// directly under the module statement.
    pub extensions: Vec<ExtensionInstance>,
}

impl CompiledModule {
    pub fn new() -> Self {
        CompiledModule {
            features: Vec::new(),
            feature_names: FxHashMap::default(),
            identities: Vec::new(),
            identity_names: FxHashMap::default(),
            typedef_cache: FxHashMap::default(),
            nodes: NodeArena::new(),
            top: None,
            extensions: Vec::new(),
        }
    }
}

impl Default for CompiledModule {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded module and the bookkeeping the module pipeline (spec §4.8)
/// threads through its parse and compile passes.
pub struct LoadedModule {
    pub parsed: Option<ModuleP>,
    pub name: StringId,
    pub revision: Option<StringId>,
    /// Only one module of a given name may be "implemented" (spec §4.8
    /// step 3: "implement conflict check") — the others are load-bearing
    /// only for imports/typedefs/identities, never for their own top-level
    /// data tree.
    pub implemented: bool,
    /// Whether this is the newest-loaded revision of its name (spec §4.8
    /// step 6: "latest-revision transfer").
    pub latest: bool,
    /// Resolved prefix -> target module table (spec §4.8 step 7).
    pub imports: Vec<(StringId, ModuleId)>,
    /// Own top-level typedefs, by name (spec §4.3: "typedef tables live
    /// in modules the core doesn't enumerate on its own"). Typedefs
    /// nested inside a grouping are out of scope here the same way
    /// `uses` expansion itself is (see [`yang_node::NodePayload::Pending`]
    /// on `NodeKind::Uses`): nothing in this workspace ever looks a
    /// grouping-scoped typedef up.
    pub typedefs: FxHashMap<StringId, TypedefP>,
    pub compiled: Option<CompiledModule>,
    /// Set for the duration of [`crate::Context::compile`]'s own call on
    /// this module; lets a circular import be reported as `Validation`
    /// instead of recursing forever.
    pub compiling: bool,
}

impl LoadedModule {
    pub fn new(parsed: ModuleP, name: StringId, revision: Option<StringId>) -> Self {
        let typedefs = parsed.typedefs.iter().map(|t| (t.name, t.clone())).collect();
        LoadedModule {
            parsed: Some(parsed),
            name,
            revision,
            implemented: false,
            latest: false,
            imports: Vec::new(),
            typedefs,
            compiled: None,
            compiling: false,
        }
    }
}
