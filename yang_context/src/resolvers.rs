//! Cross-module lookups the type compiler, identity linker, node compiler,
//! and `if-feature` compiler all need but don't own themselves (spec §1:
//! "specified only at their interface with the core"). Every resolver here
//! is a thin view over [`LoadedModule`]s the context already owns.

use rustc_hash::FxHashMap;
use yang_diagnostic::{Error, Result};
use yang_features::{FeatureNameResolver, FeatureRef};
use yang_ir::{BaseType, IdentityRef, ModuleId, SchemaPath, StringDictionary, StringId};
use yang_node::ModuleLookup;
use yang_types::{ChainStep, IdentityNameResolver, TypedefResolver};

use crate::module::LoadedModule;

/// Resolve a (possibly-absent) prefix to the module it names (spec §4.8
/// step 7): `None` is always the home module itself; `Some(prefix)` is
/// looked up in that module's own resolved import table.
pub fn resolve_prefix(
    home: ModuleId,
    imports: &[(StringId, ModuleId)],
    prefix: Option<StringId>,
    path: &SchemaPath,
) -> Result<ModuleId> {
    match prefix {
        None => Ok(home),
        Some(p) => imports
            .iter()
            .find(|(ip, _)| *ip == p)
            .map(|&(_, m)| m)
            .ok_or_else(|| Error::reference(path.clone(), "unresolved import prefix")),
    }
}

/// The 20 YANG built-in type names (spec §3), checked before falling back
/// to a typedef lookup.
fn builtin_from_name(name: &str) -> Option<BaseType> {
    Some(match name {
        "binary" => BaseType::Binary,
        "bits" => BaseType::Bits,
        "boolean" => BaseType::Boolean,
        "decimal64" => BaseType::Decimal64,
        "empty" => BaseType::Empty,
        "enumeration" => BaseType::Enumeration,
        "identityref" => BaseType::Identityref,
        "instance-identifier" => BaseType::InstanceIdentifier,
        "leafref" => BaseType::Leafref,
        "string" => BaseType::String,
        "union" => BaseType::Union,
        "int8" => BaseType::Int8,
        "int16" => BaseType::Int16,
        "int32" => BaseType::Int32,
        "int64" => BaseType::Int64,
        "uint8" => BaseType::Uint8,
        "uint16" => BaseType::Uint16,
        "uint32" => BaseType::Uint32,
        "uint64" => BaseType::Uint64,
        _ => return None,
    })
}

/// Collaborators for compiling identities, types, and nodes of one module
/// once its imports are fully compiled (spec §4.8 step 4: "compile
/// imports recursively" runs before everything that needs this).
pub struct ModuleResolvers<'a> {
    pub dict: &'a dyn StringDictionary,
    pub modules: &'a [LoadedModule],
    pub home: ModuleId,
    pub imports: &'a [(StringId, ModuleId)],
    pub path: SchemaPath,
}

impl TypedefResolver for ModuleResolvers<'_> {
    fn resolve(&self, prefix: Option<StringId>, name: StringId) -> Result<ChainStep> {
        if prefix.is_none() {
            if let Some(base) = builtin_from_name(&self.dict.resolve(name)) {
                return Ok(ChainStep::Builtin(base));
            }
        }
        let module_id = resolve_prefix(self.home, self.imports, prefix, &self.path)?;
        let module = &self.modules[module_id.index()];
        let typedef = module.typedefs.get(&name).ok_or_else(|| {
            Error::reference(self.path.clone(), format!("typedef '{}' not found", self.dict.resolve(name)))
        })?;
        Ok(ChainStep::Typedef {
            type_ref: typedef.type_ref.clone(),
            status: typedef.status.unwrap_or_default(),
            cached: None,
        })
    }
}

impl IdentityNameResolver for ModuleResolvers<'_> {
    fn resolve(&self, prefix: Option<StringId>, name: StringId) -> Result<IdentityRef> {
        resolve_identity(self, prefix, name)
    }
}

impl yang_identity::IdentityBaseResolver for ModuleResolvers<'_> {
    fn resolve(&self, prefix: Option<StringId>, name: StringId) -> Result<IdentityRef> {
        resolve_identity(self, prefix, name)
    }
}

fn resolve_identity(resolvers: &ModuleResolvers<'_>, prefix: Option<StringId>, name: StringId) -> Result<IdentityRef> {
    let module_id = resolve_prefix(resolvers.home, resolvers.imports, prefix, &resolvers.path)?;
    let module = &resolvers.modules[module_id.index()];
    let compiled = module
        .compiled
        .as_ref()
        .ok_or_else(|| Error::internal(resolvers.path.clone(), "identity lookup on a module that hasn't compiled its identities yet"))?;
    let id = compiled.identity_names.get(&name).copied().ok_or_else(|| {
        Error::reference(resolvers.path.clone(), format!("identity '{}' not found", resolvers.dict.resolve(name)))
    })?;
    Ok(IdentityRef(module_id, id))
}

impl FeatureNameResolver for ModuleResolvers<'_> {
    fn resolve(&self, prefix: Option<&str>, name: &str) -> Option<FeatureRef> {
        let module_id = match prefix {
            None => self.home,
            Some(p) => self
                .imports
                .iter()
                .find(|(ip, _)| self.dict.resolve(*ip) == p)
                .map(|&(_, m)| m)?,
        };
        let module = self.modules.get(module_id.index())?;
        let compiled = module.compiled.as_ref()?;
        compiled
            .feature_names
            .iter()
            .find(|(n, _)| self.dict.resolve(**n) == name)
            .map(|(_, &id)| FeatureRef(module_id, id))
    }
}

impl ModuleLookup for ModuleResolvers<'_> {
    fn resolve(&self, prefix: Option<StringId>) -> Result<ModuleId> {
        resolve_prefix(self.home, self.imports, prefix, &self.path)
    }
}

/// Resolves `if-feature` references while a module's *own* features are
/// being compiled (spec §4.8 step 4: features compile before this module's
/// `CompiledModule` exists, so [`ModuleResolvers`] alone can't see them
/// yet). Same-module references are looked up in `own_names`; anything
/// prefixed falls through to `general`, since every imported module is
/// already fully compiled by this point.
pub struct BootstrapFeatureResolver<'a> {
    pub dict: &'a dyn StringDictionary,
    pub module: ModuleId,
    pub own_names: &'a FxHashMap<StringId, yang_ir::FeatureId>,
    pub general: &'a ModuleResolvers<'a>,
}

impl FeatureNameResolver for BootstrapFeatureResolver<'_> {
    fn resolve(&self, prefix: Option<&str>, name: &str) -> Option<FeatureRef> {
        if prefix.is_none() {
            if let Some((_, &id)) = self.own_names.iter().find(|(n, _)| self.dict.resolve(**n) == name) {
                return Some(FeatureRef(self.module, id));
            }
        }
        self.general.resolve(prefix, name)
    }
}
