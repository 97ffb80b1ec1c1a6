//! P-form: the lossless parsed tree a [`ParseBackend`](crate::ParseBackend)
//! produces (spec §3). Every string field is a [`StringId`](crate::StringId)
//! handle into the caller's dictionary; nothing here owns text.

mod augment;
mod deviation;
mod extension;
mod feature;
mod identity;
mod module;
mod node;
mod type_ref;

pub use augment::{AugmentP, RefineP};
pub use deviation::{DeviatePropsP, DeviateP, DeviationP};
pub use extension::ExtensionInstanceP;
pub use feature::FeatureP;
pub use identity::{IdentityP, IdentityRefP};
pub use module::{ImportP, IncludeP, ModuleP, NotificationP, RevisionP, RpcP, YangVersion};
pub use node::{
    AnyDataP, AnyXmlP, CaseP, ChoiceP, ContainerP, GroupingP, LeafListP, LeafP, ListP,
    NodeCommonP, NodeP, TypedefP, UsesP,
};
pub use type_ref::{BitItemP, EnumItemP, PatternP, TypeRefP};
