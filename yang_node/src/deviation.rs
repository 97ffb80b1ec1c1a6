//! Deviation application (RFC 7950 §7.20.3, SPEC_FULL §C): `not-supported`
//! unlinks the target outright; `add`/`replace`/`delete` touch a bounded
//! property set this core already models — `config`/`mandatory` on any
//! node, `default`/`units` only on [`NodePayload::Leaf`]. Anything beyond
//! that (`min-elements`, `max-elements`, any `unsupported_statements`) is
//! rejected with `Validation` rather than silently applied or ignored,
//! since list/leaf-list payload compilation itself is out of scope.

use yang_diagnostic::{Error, Result};
use yang_ir::pform::{DeviateP, DeviatePropsP, DeviationP};
use yang_ir::{NodeFlags, NodeId, SchemaPath, StringDictionary};

use crate::arena::NodeArena;
use crate::cnode::NodePayload;

fn reject_unmodeled(props: &DeviatePropsP, dict: &dyn StringDictionary, path: &SchemaPath) -> Result<()> {
    if props.min_elements.is_some() || props.max_elements.is_some() {
        return Err(Error::validation(
            path.clone(),
            "deviate touches min-elements/max-elements, which this core does not model",
        ));
    }
    if let Some(stmt) = props.unsupported_statements.first() {
        return Err(Error::validation(
            path.clone(),
            format!("deviate touches unsupported statement '{}'", dict.resolve(*stmt)),
        ));
    }
    Ok(())
}

fn apply_props(target: NodeId, props: &DeviatePropsP, arena: &mut NodeArena, dict: &dyn StringDictionary, path: &SchemaPath) -> Result<()> {
    reject_unmodeled(props, dict, path)?;

    if let Some(config) = props.config {
        let node = arena.get_mut(target);
        node.flags.set(NodeFlags::CONFIG_W, config);
        node.flags |= NodeFlags::CONFIG_EXPLICIT;
    }
    if let Some(mandatory) = props.mandatory {
        let node = arena.get_mut(target);
        node.flags.set(NodeFlags::MANDATORY, mandatory);
    }

    if props.default.is_empty() && props.units.is_none() {
        return Ok(());
    }

    let node = arena.get_mut(target);
    match &mut node.payload {
        NodePayload::Leaf { units, default, .. } => {
            if let Some(u) = props.units {
                *units = Some(u);
            }
            if let Some(&d) = props.default.first() {
                *default = Some(d);
            }
            Ok(())
        }
        _ => Err(Error::validation(
            path.clone(),
            "deviate touches default/units on a node that isn't a leaf",
        )),
    }
}

/// `deviate delete` (RFC 7950 §7.20.3.2) clears a property instead of
/// overwriting it, and only when the value named in the deviate matches
/// what's currently there — unlike `add`/`replace`, which always assign.
fn apply_delete(target: NodeId, props: &DeviatePropsP, arena: &mut NodeArena, dict: &dyn StringDictionary, path: &SchemaPath) -> Result<()> {
    reject_unmodeled(props, dict, path)?;

    if let Some(config) = props.config {
        let node = arena.get_mut(target);
        if node.flags.is_config_w() != config {
            return Err(Error::validation(path.clone(), "deviate delete: config does not match the node's current value"));
        }
        node.flags.remove(NodeFlags::CONFIG_EXPLICIT);
    }
    if let Some(mandatory) = props.mandatory {
        let node = arena.get_mut(target);
        if node.flags.contains(NodeFlags::MANDATORY) != mandatory {
            return Err(Error::validation(path.clone(), "deviate delete: mandatory does not match the node's current value"));
        }
        node.flags.remove(NodeFlags::MANDATORY);
    }

    if props.default.is_empty() && props.units.is_none() {
        return Ok(());
    }

    let node = arena.get_mut(target);
    match &mut node.payload {
        NodePayload::Leaf { units, default, .. } => {
            if let Some(u) = props.units {
                if *units != Some(u) {
                    return Err(Error::validation(path.clone(), "deviate delete: units does not match the node's current value"));
                }
                *units = None;
            }
            if let Some(&d) = props.default.first() {
                if *default != Some(d) {
                    return Err(Error::validation(path.clone(), "deviate delete: default does not match the node's current value"));
                }
                *default = None;
            }
            Ok(())
        }
        _ => Err(Error::validation(
            path.clone(),
            "deviate touches default/units on a node that isn't a leaf",
        )),
    }
}

/// Apply `dev` to `target`, which lives in the sibling list headed by
/// `*head`. `not-supported` removes the node from that list; `add`/`replace`
/// assign the given properties; `delete` clears them instead.
pub fn apply_deviation(
    dev: &DeviationP,
    target: NodeId,
    head: &mut Option<NodeId>,
    arena: &mut NodeArena,
    dict: &dyn StringDictionary,
    path: &SchemaPath,
) -> Result<()> {
    for deviate in &dev.deviates {
        match deviate {
            DeviateP::NotSupported => {
                arena.remove_sibling(head, target);
            }
            DeviateP::Add(props) | DeviateP::Replace(props) => {
                apply_props(target, props, arena, dict, path)?;
            }
            DeviateP::Delete(props) => {
                apply_delete(target, props, arena, dict, path)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnode::{CNode, NodeKind, NodePayload};
    use yang_ir::dictionary::SimpleDictionary;
    use yang_ir::{BaseType, ModuleId, Status, StringId};
    use yang_types::CType;

    fn leaf(dict: &SimpleDictionary, default: Option<&str>, units: Option<&str>) -> CNode {
        CNode {
            name: dict.intern("leaf"),
            kind: NodeKind::Leaf,
            flags: NodeFlags::DEFAULT_CONFIG,
            status: Status::Current,
            module: ModuleId::new(0),
            parent: None,
            next: None,
            prev: NodeId::INVALID,
            when: None,
            musts: Vec::new(),
            iffeatures: Vec::new(),
            extensions: Vec::new(),
            payload: NodePayload::Leaf {
                type_handle: std::rc::Rc::new(CType::builtin(BaseType::String)),
                units: units.map(|u| dict.intern(u)),
                default: default.map(|d| dict.intern(d)),
            },
        }
    }

    fn path() -> SchemaPath {
        SchemaPath::root("m")
    }

    #[test]
    fn add_sets_default_on_a_leaf_with_none() {
        let dict = SimpleDictionary::new();
        let mut arena = NodeArena::new();
        let id = arena.insert(leaf(&dict, None, None));
        let props = DeviatePropsP {
            default: vec![dict.intern("x")],
            ..Default::default()
        };
        apply_props(id, &props, &mut arena, &dict, &path()).unwrap();
        match &arena.get(id).payload {
            NodePayload::Leaf { default, .. } => assert_eq!(*default, Some(dict.intern("x"))),
            _ => unreachable!(),
        }
    }

    #[test]
    fn delete_clears_a_matching_default_instead_of_overwriting_it() {
        let dict = SimpleDictionary::new();
        let mut arena = NodeArena::new();
        let id = arena.insert(leaf(&dict, Some("x"), None));
        let props = DeviatePropsP {
            default: vec![dict.intern("x")],
            ..Default::default()
        };
        apply_deviation(
            &DeviationP {
                target_path: StringId::new(0),
                description: None,
                deviates: vec![DeviateP::Delete(props)],
            },
            id,
            &mut None,
            &mut arena,
            &dict,
            &path(),
        )
        .unwrap();
        match &arena.get(id).payload {
            NodePayload::Leaf { default, .. } => assert_eq!(*default, None, "delete must clear, not overwrite, the default"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn delete_rejects_a_default_that_does_not_match_the_current_value() {
        let dict = SimpleDictionary::new();
        let mut arena = NodeArena::new();
        let id = arena.insert(leaf(&dict, Some("x"), None));
        let props = DeviatePropsP {
            default: vec![dict.intern("y")],
            ..Default::default()
        };
        let err = apply_delete(id, &props, &mut arena, &dict, &path()).unwrap_err();
        assert_eq!(err.kind, yang_diagnostic::ErrorKind::Validation);
    }
}
