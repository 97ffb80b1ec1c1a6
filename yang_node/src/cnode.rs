//! Compiled data-tree node (spec §3, §4.7).

use yang_features::FeatureExpr;
use yang_ir::{ModuleId, NodeFlags, NodeId, Status, StringId, XPathExpr};
use yang_types::TypeHandle;

/// Which [`NodeP`](yang_ir::pform::NodeP) variant a [`CNode`] was compiled
/// from.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NodeKind {
    Container,
    Leaf,
    LeafList,
    List,
    Choice,
    Case,
    AnyData,
    AnyXml,
    Uses,
}

/// `(module-prefix, name, argument)` triple (spec §3, SPEC_FULL §C): the
/// core treats an extension instance as inert data, never a plugin point.
#[derive(Clone, Debug)]
pub struct ExtensionInstance {
    pub module: ModuleId,
    pub name: StringId,
    pub argument: Option<StringId>,
}

/// Variant-specific payload. Spec §4.7: "Only `container` and `leaf` have
/// full payload compilers in the in-scope core; other variants allocate
/// but leave payload compilation to be added." [`NodePayload::Pending`]
/// is that allocate-only placeholder — the row exists, common fields are
/// compiled, but its variant data is not, by design.
#[derive(Debug)]
pub enum NodePayload {
    Container {
        presence: bool,
        /// First child in this container's sibling list, if any.
        first_child: Option<NodeId>,
    },
    Leaf {
        type_handle: TypeHandle,
        units: Option<StringId>,
        default: Option<StringId>,
    },
    Pending(NodeKind),
}

/// A compiled data-tree node (spec §3).
#[derive(Debug)]
pub struct CNode {
    pub name: StringId,
    pub kind: NodeKind,
    pub flags: NodeFlags,
    pub status: Status,
    pub module: ModuleId,
    pub parent: Option<NodeId>,
    /// `None` at the last sibling (spec §3: "last element's `next` is
    /// null").
    pub next: Option<NodeId>,
    /// Circular: the first sibling's `prev` is the last sibling's id
    /// (spec §3), giving O(1) append without a tail pointer.
    pub prev: NodeId,
    pub when: Option<Box<dyn XPathExpr>>,
    pub musts: Vec<Box<dyn XPathExpr>>,
    pub iffeatures: Vec<FeatureExpr>,
    pub extensions: Vec<ExtensionInstance>,
    pub payload: NodePayload,
}
