//! The context (spec §3, §4.8): owns every loaded module, the external
//! collaborators the core crates only see through a trait object, and the
//! two shared refcounted pools (ranges, patterns) those collaborators feed.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use yang_diagnostic::{Error, ErrorKind, Result};
use yang_features::{FeatureRef, FeatureTarget, FeatureUniverse};
use yang_identity::{Identity, IdentityUniverse};
use yang_ir::pform::ModuleP;
use yang_ir::{IdentityRef, ModuleId, SchemaPath, SourceFormat, StringDictionary, StringId, XPathCompiler};
use yang_node::{ModuleLookup, NodeCompileCtx};
use yang_patterns::PatternPool;
use yang_types::RangePool;

use crate::module::{CompiledModule, LoadedModule};
use crate::options::ContextOptions;
use crate::pipeline;
use crate::resolvers::{BootstrapFeatureResolver, ModuleResolvers};
use crate::search::{self, FoundSchema};

/// A view over (a subset of) the module table that only ever mutates
/// [`LoadedModule::compiled`] fields already populated — used where a
/// resolver and a `&mut dyn IdentityUniverse` would otherwise need to
/// borrow the same module table at once (see [`crate::Context::compile`]).
struct ModulesUniverse<'a> {
    modules: &'a mut [LoadedModule],
}

fn compiled_ref(modules: &[LoadedModule], m: ModuleId) -> &CompiledModule {
    match &modules[m.index()].compiled {
        Some(c) => c,
        None => panic!("module {} has not compiled its identities/features yet", m.index()),
    }
}

fn compiled_mut_ref(modules: &mut [LoadedModule], m: ModuleId) -> &mut CompiledModule {
    match &mut modules[m.index()].compiled {
        Some(c) => c,
        None => panic!("module {} has not compiled its identities/features yet", m.index()),
    }
}

impl IdentityUniverse for ModulesUniverse<'_> {
    fn identity(&self, r: IdentityRef) -> &Identity {
        &compiled_ref(self.modules, r.0).identities[r.1.index()]
    }

    fn identity_mut(&mut self, r: IdentityRef) -> &mut Identity {
        &mut compiled_mut_ref(self.modules, r.0).identities[r.1.index()]
    }
}

/// A `base` resolver built from owned snapshots of the name tables it needs
/// (spec §4.6), taken before [`ModulesUniverse`] starts mutably borrowing
/// the module table. Borrowing `&self.modules` for the resolver and
/// `&mut self.modules` for the universe in the same call would alias; a
/// resolver that owns its data instead of a live borrow sidesteps that
/// without changing either trait's shape.
struct OwnedIdentityResolver<'a> {
    dict: &'a dyn StringDictionary,
    home: ModuleId,
    imports: &'a [(StringId, ModuleId)],
    tables: FxHashMap<ModuleId, FxHashMap<StringId, yang_ir::IdentityId>>,
    path: SchemaPath,
}

impl yang_identity::IdentityBaseResolver for OwnedIdentityResolver<'_> {
    fn resolve(&self, prefix: Option<StringId>, name: StringId) -> Result<IdentityRef> {
        let module_id = crate::resolvers::resolve_prefix(self.home, self.imports, prefix, &self.path)?;
        let table = self
            .tables
            .get(&module_id)
            .ok_or_else(|| Error::internal(self.path.clone(), "identity base resolved to a module with no snapshot taken"))?;
        let id = table
            .get(&name)
            .copied()
            .ok_or_else(|| Error::reference(self.path.clone(), format!("identity '{}' not found", self.dict.resolve(name))))?;
        Ok(IdentityRef(module_id, id))
    }
}

/// The context (spec §3): every module it has loaded, the pools shared
/// across all of them, and the external collaborators (parser, string
/// dictionary, `when`/`must` compiler, pattern engine) every compile pass
/// needs but none of the core crates own.
pub struct Context<PB: yang_ir::ParseBackend> {
    parser: PB,
    dict: Box<dyn StringDictionary>,
    xpath: Box<dyn XPathCompiler>,
    pattern_engine: Box<dyn yang_patterns::PatternEngine>,
    modules: Vec<LoadedModule>,
    range_pool: RangePool,
    pattern_pool: PatternPool,
    search_paths: Vec<PathBuf>,
    include_cwd: bool,
    options: ContextOptions,
}

impl<PB: yang_ir::ParseBackend> Context<PB> {
    pub fn new(
        parser: PB,
        dict: Box<dyn StringDictionary>,
        xpath: Box<dyn XPathCompiler>,
        pattern_engine: Box<dyn yang_patterns::PatternEngine>,
        options: ContextOptions,
    ) -> Self {
        Context {
            parser,
            dict,
            xpath,
            pattern_engine,
            modules: Vec::new(),
            range_pool: RangePool::new(),
            pattern_pool: PatternPool::new(),
            search_paths: Vec::new(),
            include_cwd: false,
            options,
        }
    }

    pub fn add_search_path(&mut self, path: PathBuf) {
        self.search_paths.push(path);
    }

    pub fn set_search_cwd(&mut self, include: bool) {
        self.include_cwd = include;
    }

    pub fn search_localfile(&self, name: &str, revision: Option<&str>) -> Result<FoundSchema> {
        search::search_localfile(&self.search_paths, self.include_cwd, name, revision)
    }

    pub fn module_name(&self, id: ModuleId) -> String {
        self.dict.resolve(self.modules[id.index()].name)
    }

    /// The compiled form of a module, once [`Context::compile`] has run on
    /// it; `None` before that (or for a module whose P-form was only ever
    /// loaded as an import target, never itself compiled — can't happen
    /// today since compiling a module always compiles its imports first).
    pub fn module_compiled(&self, id: ModuleId) -> Option<&CompiledModule> {
        self.modules[id.index()].compiled.as_ref()
    }

    /// The string dictionary backing every handle this context hands out.
    pub fn dict(&self) -> &dyn StringDictionary {
        self.dict.as_ref()
    }

    fn compiled(&self, m: ModuleId) -> &CompiledModule {
        compiled_ref(&self.modules, m)
    }

    fn compiled_mut(&mut self, m: ModuleId) -> &mut CompiledModule {
        compiled_mut_ref(&mut self.modules, m)
    }

    // ---- Parse pipeline (spec §4.8, 9 steps) -----------------------------

    pub fn parse_mem(&mut self, data: &[u8], format: SourceFormat, implement: bool) -> Result<ModuleId> {
        self.parse_bytes(data, format, implement, false)
    }

    pub fn parse_fd(&mut self, reader: &mut dyn std::io::Read, format: SourceFormat, implement: bool) -> Result<ModuleId> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::new(ErrorKind::System, SchemaPath::new(), e.to_string()).with_source(e))?;
        self.parse_bytes(&data, format, implement, false)
    }

    pub fn parse_path(&mut self, file: &Path, implement: bool) -> Result<ModuleId> {
        let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("");
        let format = SourceFormat::from_extension(ext)
            .ok_or_else(|| Error::invalid_arg(SchemaPath::root(file.display().to_string()), "unrecognized schema file extension"))?;
        let data = std::fs::read(file)
            .map_err(|e| Error::new(ErrorKind::System, SchemaPath::root(file.display().to_string()), e.to_string()).with_source(e))?;
        let expected_revision = file
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.split_once('@'))
            .map(|(_, rev)| rev.to_string());

        let id = self.parse_bytes(&data, format, implement, false)?;

        if let Some(expected) = expected_revision {
            let actual = self.modules[id.index()].revision.map(|r| self.dict.resolve(r));
            if actual.as_deref() != Some(expected.as_str()) {
                tracing::warn!(
                    path = %file.display(),
                    expected = %expected,
                    actual = ?actual,
                    "schema filename's revision does not match the module's own declared revision",
                );
            }
        }
        Ok(id)
    }

    /// Locate (on disk, via [`search::search_localfile`]) and load a module
    /// by name, or return the one already loaded (spec §4.8 step 7: load
    /// imports/includes, never reload an already-known name+revision).
    fn load_by_name(&mut self, name: StringId, revision: Option<StringId>, via_include: bool, path: &SchemaPath) -> Result<ModuleId> {
        if let Some(existing) = self
            .modules
            .iter()
            .position(|m| m.name == name && (revision.is_none() || m.revision == revision))
        {
            return Ok(ModuleId::new(existing as u32));
        }

        let name_text = self.dict.resolve(name);
        let revision_text = revision.map(|r| self.dict.resolve(r));
        let found = self.search_localfile(&name_text, revision_text.as_deref()).map_err(|_| {
            Error::not_found(path.clone(), format!("module '{name_text}' could not be located in any search path"))
        })?;
        let bytes = std::fs::read(&found.path)
            .map_err(|e| Error::new(ErrorKind::System, path.clone(), e.to_string()).with_source(e))?;
        self.parse_bytes_via(&bytes, found.format, false, via_include)
    }

    fn parse_bytes(&mut self, data: &[u8], format: SourceFormat, implement: bool, via_include: bool) -> Result<ModuleId> {
        self.parse_bytes_via(data, format, implement, via_include)
    }

    /// The 9-step parse pipeline (spec §4.8).
    fn parse_bytes_via(&mut self, data: &[u8], format: SourceFormat, implement: bool, via_include: bool) -> Result<ModuleId> {
        let mut parsed: ModuleP = self
            .parser
            .parse(data, format, self.dict.as_ref())
            .map_err(|e| Error::new(ErrorKind::Syntax, SchemaPath::new(), e.to_string()))?;
        parsed.sort_revisions(self.dict.as_ref());

        let name_text = self.dict.resolve(parsed.name);
        let path = SchemaPath::root(name_text.clone());

        if implement && self.modules.iter().any(|m| m.name == parsed.name && m.implemented) {
            return Err(Error::exists(path, format!("another implemented revision of module '{name_text}' already exists")));
        }
        if parsed.is_submodule() && !via_include {
            return Err(Error::invalid_arg(path, "a submodule cannot be loaded as a top-level module"));
        }
        pipeline::check_no_duplicate_imports(&parsed, self.dict.as_ref(), &path)?;
        pipeline::check_typedef_grouping_collisions(&parsed, self.dict.as_ref(), &path)?;

        let imports_list = parsed.imports.clone();
        let includes_list = parsed.includes.clone();
        let name = parsed.name;
        let revision = parsed.latest_revision();
        let latest = pipeline::determine_latest(&mut self.modules, name, revision, self.dict.as_ref());

        let mut module = LoadedModule::new(parsed, name, revision);
        module.implemented = implement;
        module.latest = latest;
        let id = ModuleId::new(self.modules.len() as u32);
        self.modules.push(module);

        for imp in &imports_list {
            self.load_by_name(imp.module, imp.revision, false, &path)?;
        }
        for inc in &includes_list {
            self.load_by_name(inc.submodule, inc.revision, true, &path)?;
        }

        Ok(id)
    }

    // ---- Compile pipeline (spec §4.8, 4 steps) ----------------------------

    pub fn compile(&mut self, id: ModuleId) -> Result<()> {
        if self.modules[id.index()].compiled.is_some() {
            return Ok(());
        }
        if self.modules[id.index()].compiling {
            let name = self.dict.resolve(self.modules[id.index()].name);
            return Err(Error::validation(SchemaPath::root(name.clone()), format!("circular import involving module '{name}'")));
        }
        self.modules[id.index()].compiling = true;
        let result = self.compile_inner(id);
        self.modules[id.index()].compiling = false;
        result
    }

    fn compile_inner(&mut self, id: ModuleId) -> Result<()> {
        let parsed = match &self.modules[id.index()].parsed {
            Some(p) => p.clone(),
            None => return Err(Error::internal(SchemaPath::new(), "module has no parsed form left to compile (already freed)")),
        };
        let name_text = self.dict.resolve(parsed.name);
        let path = SchemaPath::root(name_text);
        let version = parsed.yang_version;

        // Step 2: compile imports recursively, then resolve this module's
        // own prefix -> module table from them.
        let mut imports = Vec::with_capacity(parsed.imports.len());
        for imp in &parsed.imports {
            let target = self.load_by_name(imp.module, imp.revision, false, &path)?;
            self.compile(target)?;
            imports.push((imp.prefix, target));
        }
        self.modules[id.index()].imports = imports.clone();
        self.modules[id.index()].compiled = Some(CompiledModule::new());

        // `compiled` is populated above because the three steps below write
        // into it incrementally via `compiled_mut`, not because a partial
        // result is ever meant to survive a failed compile: on error the
        // in-flight C-form is discarded and the pointer cleared (spec §7),
        // so a retried `compile()` call sees `compiled.is_none()` again
        // rather than short-circuiting on a corrupt result.
        if let Err(e) = self.compile_body(id, &parsed, version, &imports, &path) {
            self.modules[id.index()].compiled = None;
            return Err(e);
        }

        if self.options.contains(ContextOptions::FREE_PARSED_ON_COMPILE) {
            self.modules[id.index()].parsed = None;
        }
        Ok(())
    }

    fn compile_body(
        &mut self,
        id: ModuleId,
        parsed: &ModuleP,
        version: yang_ir::pform::YangVersion,
        imports: &[(StringId, ModuleId)],
        path: &SchemaPath,
    ) -> Result<()> {
        self.compile_features(id, parsed, version, imports, path)?;
        self.compile_identities(id, parsed, version, imports, path)?;
        self.compile_nodes(id, parsed, version, imports, path)?;
        Ok(())
    }

    fn compile_features(
        &mut self,
        id: ModuleId,
        parsed: &ModuleP,
        version: yang_ir::pform::YangVersion,
        imports: &[(StringId, ModuleId)],
        path: &SchemaPath,
    ) -> Result<()> {
        let own_names: FxHashMap<StringId, yang_ir::FeatureId> = parsed
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name, yang_ir::FeatureId::new(i as u32)))
            .collect();
        let general = ModuleResolvers {
            dict: self.dict.as_ref(),
            modules: &self.modules,
            home: id,
            imports,
            path: path.clone(),
        };
        let bootstrap = BootstrapFeatureResolver {
            dict: self.dict.as_ref(),
            module: id,
            own_names: &own_names,
            general: &general,
        };
        let (features, feature_names) = pipeline::compile_module_features(&parsed.features, self.dict.as_ref(), version, &bootstrap, id, path)?;

        let compiled = self.compiled_mut(id);
        compiled.features = features;
        compiled.feature_names = feature_names;
        Ok(())
    }

    fn compile_identities(
        &mut self,
        id: ModuleId,
        parsed: &ModuleP,
        version: yang_ir::pform::YangVersion,
        imports: &[(StringId, ModuleId)],
        path: &SchemaPath,
    ) -> Result<()> {
        // Pass 1: properties only, no base resolution yet (spec §4.6).
        let identities = {
            let general = ModuleResolvers {
                dict: self.dict.as_ref(),
                modules: &self.modules,
                home: id,
                imports,
                path: path.clone(),
            };
            yang_identity::compile_properties(&parsed.identities, self.dict.as_ref(), &general, version, path)?
        };
        let identity_names: FxHashMap<StringId, yang_ir::IdentityId> = parsed
            .identities
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name, yang_ir::IdentityId::new(i as u32)))
            .collect();

        let compiled = self.compiled_mut(id);
        compiled.identities = identities;
        compiled.identity_names = identity_names;

        // Pass 2: resolve `base`s (spec §4.6). Snapshot the name tables this
        // module needs first so the resolver doesn't alias the universe's
        // `&mut self.modules` borrow (see `OwnedIdentityResolver`).
        let mut tables = FxHashMap::default();
        tables.insert(id, self.compiled(id).identity_names.clone());
        for &(_, m) in imports {
            tables.insert(m, self.compiled(m).identity_names.clone());
        }
        let resolver = OwnedIdentityResolver {
            dict: self.dict.as_ref(),
            home: id,
            imports,
            tables,
            path: path.clone(),
        };
        let self_ids: Vec<yang_ir::IdentityId> = (0..parsed.identities.len()).map(|i| yang_ir::IdentityId::new(i as u32)).collect();
        {
            let mut universe = ModulesUniverse { modules: &mut self.modules };
            yang_identity::link_bases(id, &parsed.identities, &self_ids, &mut universe, &resolver, path)?;
            let all: Vec<IdentityRef> = self_ids.iter().map(|&i| IdentityRef(id, i)).collect();
            yang_identity::check_no_cycles(&all, &universe, path)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn compile_nodes(
        &mut self,
        id: ModuleId,
        parsed: &ModuleP,
        version: yang_ir::pform::YangVersion,
        imports: &[(StringId, ModuleId)],
        path: &SchemaPath,
    ) -> Result<()> {
        let (top, arena, extensions) = {
            let general = ModuleResolvers {
                dict: self.dict.as_ref(),
                modules: &self.modules,
                home: id,
                imports,
                path: path.clone(),
            };
            let ctx = NodeCompileCtx {
                dict: self.dict.as_ref(),
                features: &general,
                xpath: self.xpath.as_ref(),
                typedefs: &general,
                identities: &general,
                patterns: self.pattern_engine.as_ref(),
                modules: &general,
                version,
                module: id,
            };

            let mut arena = yang_node::NodeArena::new();
            let mut top = yang_node::compile_children(&parsed.data, None, None, None, &mut arena, &ctx, &mut self.range_pool, &mut self.pattern_pool, path)?;

            // Augments and deviations are only applied within this module's
            // own tree (SPEC_FULL §C): resolving and mutating *another*
            // module's already-compiled arena in the same pass would need
            // mutable access to two module slots at once, which this
            // workspace's single-module-at-a-time compile loop doesn't
            // attempt. Cross-module augment/deviation is a known gap, not
            // an oversight — see DESIGN.md.
            for aug in &parsed.augments {
                let target_path = self.dict.resolve(aug.target_path);
                let target = yang_node::resolve_augment_target(&target_path, top, &arena, self.dict.as_ref(), path)?;
                yang_node::apply_augment(aug, target, &mut arena, &ctx, &mut self.range_pool, &mut self.pattern_pool, path)?;
            }
            for dev in &parsed.deviations {
                let target_path = self.dict.resolve(dev.target_path);
                let target = yang_node::resolve_augment_target(&target_path, top, &arena, self.dict.as_ref(), path)?;
                yang_node::apply_deviation(dev, target, &mut top, &mut arena, self.dict.as_ref(), path)?;
            }

            let extensions = parsed
                .extensions
                .iter()
                .map(|e| {
                    let module = general.resolve(e.prefix)?;
                    Ok(yang_node::ExtensionInstance {
                        module,
                        name: e.name,
                        argument: e.argument,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            (top, arena, extensions)
        };

        let compiled = self.compiled_mut(id);
        compiled.top = top;
        compiled.nodes = arena;
        compiled.extensions = extensions;
        Ok(())
    }

    // ---- Feature runtime (spec §4.2) --------------------------------------

    fn lookup_feature(&self, module: ModuleId, name: &str, path: &SchemaPath) -> Result<FeatureRef> {
        self.compiled(module)
            .feature_names
            .iter()
            .find(|(n, _)| self.dict.resolve(**n) == name)
            .map(|(_, &fid)| FeatureRef(module, fid))
            .ok_or_else(|| Error::reference(path.clone(), format!("unknown feature '{name}'")))
    }

    pub fn feature_enable(&mut self, module: ModuleId, name: &str) -> Result<()> {
        self.set_feature_by_name(module, name, true)
    }

    pub fn feature_disable(&mut self, module: ModuleId, name: &str) -> Result<()> {
        self.set_feature_by_name(module, name, false)
    }

    fn set_feature_by_name(&mut self, module: ModuleId, name: &str, enable: bool) -> Result<()> {
        let path = SchemaPath::root(self.module_name(module));
        let module_features: Vec<FeatureRef> = self
            .compiled(module)
            .feature_names
            .values()
            .map(|&fid| FeatureRef(module, fid))
            .collect();
        let target = if name == "*" {
            FeatureTarget::All
        } else {
            FeatureTarget::Named(self.lookup_feature(module, name, &path)?)
        };
        yang_features::set_feature(self, &module_features, &target, enable, &path)
    }

    pub fn feature_value(&self, module: ModuleId, name: &str) -> Result<bool> {
        let path = SchemaPath::root(self.module_name(module));
        let r = self.lookup_feature(module, name, &path)?;
        yang_features::value(self, r)
    }
}

impl<PB: yang_ir::ParseBackend> FeatureUniverse for Context<PB> {
    fn feature(&self, r: FeatureRef) -> &yang_features::Feature {
        &self.compiled(r.0).features[r.1.index()]
    }

    fn feature_mut(&mut self, r: FeatureRef) -> &mut yang_features::Feature {
        &mut self.compiled_mut(r.0).features[r.1.index()]
    }
}

impl<PB: yang_ir::ParseBackend> IdentityUniverse for Context<PB> {
    fn identity(&self, r: IdentityRef) -> &Identity {
        &self.compiled(r.0).identities[r.1.index()]
    }

    fn identity_mut(&mut self, r: IdentityRef) -> &mut Identity {
        &mut self.compiled_mut(r.0).identities[r.1.index()]
    }
}
