//! Arena index newtypes.
//!
//! Per spec §9: cyclic structures (feature/depfeatures, identity/derived,
//! node/parent/sibling) are expressed as indices into a per-module arena
//! rather than owning references, so nothing needs a cycle collector and
//! teardown is a linear `Vec` drop.

use std::fmt;

macro_rules! define_index {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                } else {
                    write!(f, concat!(stringify!($name), "::INVALID"))
                }
            }
        }
    };
}

define_index!(ModuleId, "Index into the context's module table.");
define_index!(NodeId, "Index into a module's data-node arena.");
define_index!(TypedefId, "Index into a module's typedef arena.");
define_index!(GroupingId, "Index into a module's grouping arena.");
define_index!(FeatureId, "Index into a module's feature arena.");
define_index!(IdentityId, "Index into a module's identity arena.");
define_index!(AugmentId, "Index into a module's augment arena.");
define_index!(DeviationId, "Index into a module's deviation arena.");
define_index!(ExtensionId, "Index into a node's extension-instance list.");
define_index!(PatternId, "Handle to a refcounted compiled pattern.");
define_index!(RangeId, "Handle to a refcounted compiled range/length restriction.");

/// Module-qualified reference to an identity (spec §3, §9): identities live
/// in per-module arenas, so a cross-module `base` or `identityref` base
/// needs both halves, the same way [`crate::StringId`] handles need a
/// dictionary. Shared by the identity linker and the type compiler so
/// neither has to depend on the other to name an identity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct IdentityRef(pub ModuleId, pub IdentityId);
