//! YANG IR - shared types for the schema compiler.
//!
//! This crate holds the data that every later stage (feature compiler,
//! pattern compiler, type compiler, identity linker, node compiler, module
//! pipeline) shares:
//!
//! - Interned string handles and the `StringDictionary` trait the core
//!   consumes ([`StringDictionary`] is implemented outside this workspace by
//!   a real caller; [`dictionary::SimpleDictionary`] is a reference impl used
//!   in tests).
//! - Arena index newtypes for P-form/C-form cross-references.
//! - The P-form AST (lossless parsed tree).
//! - Flags bitfields (config/status/ordering) shared by P-form and C-form.
//! - The `ParseBackend` and `XPathCompiler` traits at the edges of the core.
//!
//! # Design Philosophy
//!
//! Mirrors the host compiler convention this workspace was grown from:
//! intern every string, flatten every tree into arena + index, and keep
//! back-links (feature -> depfeatures, identity -> derived, node -> parent)
//! as indices rather than owning references, so teardown is linear and
//! nothing needs a cycle collector.

pub mod dictionary;
mod flags;
mod ids;
pub mod parse_backend;
mod path;
pub mod pform;
mod string_id;
pub mod xpath;

pub use dictionary::StringDictionary;
pub use flags::{BaseType, NodeFlags, OrderedBy, Status};
pub use ids::{
    AugmentId, DeviationId, ExtensionId, FeatureId, GroupingId, IdentityId, IdentityRef, ModuleId,
    NodeId, PatternId, RangeId, TypedefId,
};
pub use parse_backend::{ParseBackend, SourceFormat};
pub use path::SchemaPath;
pub use string_id::StringId;
pub use xpath::{XPathCompiler, XPathExpr};
