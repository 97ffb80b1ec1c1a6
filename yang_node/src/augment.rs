//! Augment resolution (spec §3, SPEC_FULL §C): locates the absolute
//! schema-node-id an `augment` names and splices its children in as if
//! they had been declared there directly.
//!
//! Only [`NodePayload::Container`] exposes a `first_child` pointer — every
//! other node kind is `Pending` until its own payload compiler is added —
//! so a target path can only descend *through* containers. Landing on (as
//! opposed to through) any other kind is fine; passing through one is a
//! scope limitation, not a bug.

use yang_diagnostic::{Error, Result};
use yang_ir::pform::AugmentP;
use yang_ir::{NodeFlags, NodeId, SchemaPath, StringDictionary};
use yang_types::RangePool;

use crate::arena::NodeArena;
use crate::cnode::NodePayload;
use crate::compile::{compile_children, NodeCompileCtx};

/// Resolve `target_path` (`prefix:name/name/...`) starting from the
/// module's top-level sibling list.
pub fn resolve_augment_target(
    target_path: &str,
    module_top: Option<NodeId>,
    arena: &NodeArena,
    dict: &dyn StringDictionary,
    path: &SchemaPath,
) -> Result<NodeId> {
    let mut components = target_path.trim_start_matches('/').split('/');
    let first = components.next().ok_or_else(|| {
        Error::validation(path.clone(), "augment target path is empty")
    })?;
    let first_name = first.rsplit(':').next().unwrap_or(first);

    let mut current = arena
        .find_by_name(module_top, dict, first_name)
        .ok_or_else(|| Error::reference(path.clone(), format!("augment target '{first_name}' not found")))?;

    for segment in components {
        let name = segment.rsplit(':').next().unwrap_or(segment);
        let children = match &arena.get(current).payload {
            NodePayload::Container { first_child, .. } => *first_child,
            _ => {
                return Err(Error::validation(
                    path.clone(),
                    format!("augment path descends through a non-container node at '{name}'"),
                ))
            }
        };
        current = arena
            .find_by_name(children, dict, name)
            .ok_or_else(|| Error::reference(path.clone(), format!("augment target '{name}' not found")))?;
    }

    Ok(current)
}

/// Compile `aug`'s children and splice them onto `target`'s child list.
///
/// Every introduced node is marked [`NodeFlags::AUGMENTED`] and inherits
/// the augment's own `if-feature` expressions (spec §3: "augmented nodes
/// carry the introducing augment's own conditions"). The augment's `when`,
/// if present, is recompiled per child and folded into that child's
/// `musts` — `when` is never evaluated by this core (SPEC_FULL non-goal),
/// so attaching one shared compiled copy per child is equivalent to a
/// dedicated augment-when slot without adding one.
#[allow(clippy::too_many_arguments)]
pub fn apply_augment(
    aug: &AugmentP,
    target: NodeId,
    arena: &mut NodeArena,
    ctx: &NodeCompileCtx<'_>,
    range_pool: &mut RangePool,
    pattern_pool: &mut yang_patterns::PatternPool,
    path: &SchemaPath,
) -> Result<()> {
    let target_flags = arena.get(target).flags;
    let target_status = arena.get(target).status;
    let mut target_first_child = match &arena.get(target).payload {
        NodePayload::Container { first_child, .. } => *first_child,
        _ => {
            return Err(Error::validation(
                path.clone(),
                "augment target is not a container, cannot append children",
            ))
        }
    };

    let aug_iffeatures = crate::compile::compile_iffeatures(&aug.iffeatures, ctx, path)?;

    let new_head = compile_children(
        &aug.children,
        Some(target),
        Some(target_flags),
        Some(target_status),
        arena,
        ctx,
        range_pool,
        pattern_pool,
        path,
    )?;

    for id in arena.siblings(new_head).collect::<Vec<_>>() {
        let node = arena.get_mut(id);
        node.flags |= NodeFlags::AUGMENTED;
        node.iffeatures.extend(aug_iffeatures.iter().cloned());
        if let Some(when_src) = aug.when {
            let expr = ctx.xpath.compile(&ctx.dict.resolve(when_src));
            node.musts.push(expr);
        }
    }

    if let Some(new_head) = new_head {
        for id in arena.siblings(Some(new_head)).collect::<Vec<_>>() {
            arena.append_sibling(&mut target_first_child, id);
        }
    }

    if let NodePayload::Container { first_child, .. } = &mut arena.get_mut(target).payload {
        *first_child = target_first_child;
    }

    Ok(())
}
