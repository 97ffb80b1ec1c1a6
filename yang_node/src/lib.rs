//! Node compiler (spec §4.7): config/status inheritance, the prev-circular
//! sibling list, the container/leaf payload compilers, and the augment
//! (§3, SPEC_FULL §C) and deviation (RFC 7950 §7.20.3) passes that run
//! over the compiled tree afterward.

mod arena;
mod augment;
mod cnode;
mod compile;
mod deviation;

pub use arena::NodeArena;
pub use augment::{apply_augment, resolve_augment_target};
pub use cnode::{CNode, ExtensionInstance, NodeKind, NodePayload};
pub use compile::{compile_children, compile_node, ModuleLookup, NodeCompileCtx};
pub use deviation::apply_deviation;
