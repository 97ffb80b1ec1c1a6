//! Node compiler (spec §4.7): config/status inheritance, sibling-list
//! insertion, and the container/leaf payload compilers.

use yang_diagnostic::{Error, Result};
use yang_features::{compile_iffeature, FeatureExpr, FeatureNameResolver};
use yang_ir::pform::{ExtensionInstanceP, NodeP, YangVersion};
use yang_ir::{ModuleId, NodeFlags, NodeId, SchemaPath, Status, StringDictionary, StringId, XPathCompiler};
use yang_types::{IdentityNameResolver, RangePool, TypeCompileCtx, TypedefResolver};

use crate::arena::NodeArena;
use crate::cnode::{CNode, ExtensionInstance, NodeKind, NodePayload};

/// Resolves a (possibly-absent) prefix to the module it names. An
/// external collaborator: prefix-to-import-to-module lookup is context
/// bookkeeping, not something the node compiler tracks on its own.
pub trait ModuleLookup {
    fn resolve(&self, prefix: Option<StringId>) -> Result<ModuleId>;
}

/// Collaborators the node compiler needs but doesn't own (spec §1).
pub struct NodeCompileCtx<'a> {
    pub dict: &'a dyn StringDictionary,
    pub features: &'a dyn FeatureNameResolver,
    pub xpath: &'a dyn XPathCompiler,
    pub typedefs: &'a dyn TypedefResolver,
    pub identities: &'a dyn IdentityNameResolver,
    pub patterns: &'a dyn yang_patterns::PatternEngine,
    pub modules: &'a dyn ModuleLookup,
    pub version: YangVersion,
    pub module: ModuleId,
}

impl<'a> NodeCompileCtx<'a> {
    fn type_ctx(&self) -> TypeCompileCtx<'a> {
        TypeCompileCtx {
            dict: self.dict,
            typedefs: self.typedefs,
            features: self.features,
            identities: self.identities,
            xpath: self.xpath,
            patterns: self.patterns,
            version: self.version,
        }
    }
}

fn node_kind(parsed: &NodeP) -> NodeKind {
    match parsed {
        NodeP::Container(_) => NodeKind::Container,
        NodeP::Leaf(_) => NodeKind::Leaf,
        NodeP::LeafList(_) => NodeKind::LeafList,
        NodeP::List(_) => NodeKind::List,
        NodeP::Choice(_) => NodeKind::Choice,
        NodeP::Case(_) => NodeKind::Case,
        NodeP::AnyData(_) => NodeKind::AnyData,
        NodeP::AnyXml(_) => NodeKind::AnyXml,
        NodeP::Uses(_) => NodeKind::Uses,
    }
}

/// Config inheritance (spec §4.7): "if the node does not explicitly set
/// config R/W, inherit from parent; absent parent => default is R/W."
fn compile_config(explicit: Option<bool>, parent: Option<NodeFlags>) -> NodeFlags {
    match explicit {
        Some(true) => NodeFlags::CONFIG_W | NodeFlags::CONFIG_EXPLICIT,
        Some(false) => NodeFlags::CONFIG_EXPLICIT,
        None => match parent {
            Some(p) if p.is_config_w() => NodeFlags::CONFIG_W,
            Some(_) => NodeFlags::empty(),
            None => NodeFlags::DEFAULT_CONFIG,
        },
    }
}

/// Status inheritance (spec §4.7): explicit status must not be "less
/// advanced" than the parent's; otherwise inherit the parent's
/// deprecated/obsolete status (with a warning) or default to `current`.
fn compile_status(explicit: Option<Status>, parent: Option<Status>, path: &SchemaPath) -> Result<(Status, bool)> {
    if let Some(status) = explicit {
        if let Some(parent_status) = parent {
            if status < parent_status {
                return Err(Error::validation(
                    path.clone(),
                    format!("status {status:?} is less advanced than its parent's {parent_status:?}"),
                ));
            }
        }
        return Ok((status, true));
    }
    match parent {
        Some(parent_status) if parent_status != Status::Current => {
            tracing::warn!(%path, status = ?parent_status, "node inherits non-current status from its parent");
            Ok((parent_status, false))
        }
        _ => Ok((Status::Current, false)),
    }
}

pub(crate) fn compile_iffeatures(sources: &[StringId], ctx: &NodeCompileCtx<'_>, path: &SchemaPath) -> Result<Vec<FeatureExpr>> {
    sources
        .iter()
        .map(|&id| {
            let text = ctx.dict.resolve(id);
            compile_iffeature(&text, ctx.version, path, ctx.features)
        })
        .collect()
}

fn compile_extensions(items: &[ExtensionInstanceP], ctx: &NodeCompileCtx<'_>) -> Result<Vec<ExtensionInstance>> {
    items
        .iter()
        .map(|e| {
            let module = ctx.modules.resolve(e.prefix)?;
            Ok(ExtensionInstance {
                module,
                name: e.name,
                argument: e.argument,
            })
        })
        .collect()
}

/// Compile one parsed node (spec §4.7): common fields, then the
/// variant-specific payload for `container`/`leaf`; other kinds allocate
/// their row with common fields filled in and
/// [`NodePayload::Pending`](crate::cnode::NodePayload::Pending) left for
/// a future extension to fill in.
#[allow(clippy::too_many_arguments)]
pub fn compile_node(
    parsed: &NodeP,
    parent: Option<NodeId>,
    parent_flags: Option<NodeFlags>,
    parent_status: Option<Status>,
    arena: &mut NodeArena,
    ctx: &NodeCompileCtx<'_>,
    range_pool: &mut RangePool,
    pattern_pool: &mut yang_patterns::PatternPool,
    path: &SchemaPath,
) -> Result<NodeId> {
    let mark = arena.len();
    yang_stack::ensure_sufficient_stack(|| {
        compile_node_body(parsed, parent, parent_flags, parent_status, arena, ctx, range_pool, pattern_pool, path)
    })
    .map_err(|e| {
        arena.truncate(mark);
        e
    })
}

/// The fallible body of [`compile_node`], split out so the caller can wrap
/// it in a single rollback point: any `?` below, including ones inside the
/// recursive [`compile_children`] call for a container's own children,
/// unwinds back to `compile_node`'s `mark` rather than leaving a
/// half-built node (or subtree) sitting in the arena.
#[allow(clippy::too_many_arguments)]
fn compile_node_body(
    parsed: &NodeP,
    parent: Option<NodeId>,
    parent_flags: Option<NodeFlags>,
    parent_status: Option<Status>,
    arena: &mut NodeArena,
    ctx: &NodeCompileCtx<'_>,
    range_pool: &mut RangePool,
    pattern_pool: &mut yang_patterns::PatternPool,
    path: &SchemaPath,
) -> Result<NodeId> {
    let common = parsed.common();
    let kind = node_kind(parsed);
    let flags = compile_config(common.config, parent_flags);
    let (status, status_explicit) = compile_status(common.status, parent_status, path)?;
    let flags = if status_explicit {
        flags | NodeFlags::STATUS_EXPLICIT
    } else {
        flags
    };

    // Reserve the slot before compiling children so they can carry
    // this node's id as `parent` (spec §3: "parent pointer").
    let id = arena.insert(CNode {
        name: common.name,
        kind,
        flags,
        status,
        module: ctx.module,
        parent,
        next: None,
        prev: NodeId::INVALID,
        when: None,
        musts: Vec::new(),
        iffeatures: Vec::new(),
        extensions: Vec::new(),
        payload: NodePayload::Pending(kind),
    });

    let when = common.when.map(|s| ctx.xpath.compile(&ctx.dict.resolve(s)));
    let musts = common
        .musts
        .iter()
        .map(|&s| ctx.xpath.compile(&ctx.dict.resolve(s)))
        .collect();
    let iffeatures = compile_iffeatures(&common.iffeatures, ctx, path)?;
    let extensions = compile_extensions(&common.extensions, ctx)?;

    let payload = match parsed {
        NodeP::Container(c) => {
            let first_child = compile_children(
                &c.children,
                Some(id),
                Some(flags),
                Some(status),
                arena,
                ctx,
                range_pool,
                pattern_pool,
                path,
            )?;
            NodePayload::Container {
                presence: c.presence.is_some(),
                first_child,
            }
        }
        NodeP::Leaf(l) => {
            let type_ctx = ctx.type_ctx();
            let type_handle =
                yang_types::compile_type_ref(&l.type_ref, status, &type_ctx, range_pool, pattern_pool, path)?;
            NodePayload::Leaf {
                type_handle,
                units: l.units,
                default: l.default,
            }
        }
        _ => NodePayload::Pending(kind),
    };

    let node = arena.get_mut(id);
    node.when = when;
    node.musts = musts;
    node.iffeatures = iffeatures;
    node.extensions = extensions;
    node.payload = payload;

    Ok(id)
}

/// Compile a sibling list and return its first element (spec §4.7:
/// "new node is appended to the parent's child list ... using the
/// `prev`-circular invariant").
#[allow(clippy::too_many_arguments)]
pub fn compile_children(
    nodes: &[NodeP],
    parent: Option<NodeId>,
    parent_flags: Option<NodeFlags>,
    parent_status: Option<Status>,
    arena: &mut NodeArena,
    ctx: &NodeCompileCtx<'_>,
    range_pool: &mut RangePool,
    pattern_pool: &mut yang_patterns::PatternPool,
    path: &SchemaPath,
) -> Result<Option<NodeId>> {
    let mut head = None;
    for node in nodes {
        let id = compile_node(node, parent, parent_flags, parent_status, arena, ctx, range_pool, pattern_pool, path)?;
        arena.append_sibling(&mut head, id);
    }
    Ok(head)
}
