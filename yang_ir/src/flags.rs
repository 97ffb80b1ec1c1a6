use bitflags::bitflags;

bitflags! {
    /// Per-node flags (spec §3: "flags bitfield (config R/W, status
    /// current/deprecated/obsolete, ordering, mandatory)").
    ///
    /// Status is three-valued and doesn't fit a single bit cleanly, so it's
    /// pulled out into [`Status`] and stored alongside the bitflags rather
    /// than packed in; everything that's genuinely binary lives here.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NodeFlags: u16 {
        /// `config true` (read-write). Absence means `config false`.
        const CONFIG_W = 1 << 0;
        /// Config was set explicitly on this node (vs. inherited).
        const CONFIG_EXPLICIT = 1 << 1;
        /// Status was set explicitly on this node (vs. inherited).
        const STATUS_EXPLICIT = 1 << 2;
        /// `mandatory true`.
        const MANDATORY = 1 << 3;
        /// `ordered-by user` (vs. the default `system`).
        const USER_ORDERED = 1 << 4;
        /// Presence container (`presence` statement given).
        const PRESENCE = 1 << 5;
        /// Node was introduced by an augment rather than declared directly.
        const AUGMENTED = 1 << 6;
        /// Node was introduced by `uses` expansion of a grouping.
        const FROM_GROUPING = 1 << 7;
    }
}

impl NodeFlags {
    /// Default config for a node with no parent: read-write (spec §4.7).
    pub const DEFAULT_CONFIG: NodeFlags = NodeFlags::CONFIG_W;

    #[inline]
    pub const fn is_config_w(self) -> bool {
        self.contains(NodeFlags::CONFIG_W)
    }
}

/// Lifecycle status of a definition (spec §3, §4.7).
///
/// Ordered `Current < Deprecated < Obsolete` ("less advanced" in spec
/// terms means earlier in this ordering).
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Status {
    #[default]
    Current,
    Deprecated,
    Obsolete,
}

/// `ordered-by` for list/leaf-list (spec §3).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum OrderedBy {
    #[default]
    System,
    User,
}

/// The 20 YANG built-in base types (spec §3).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BaseType {
    Binary,
    Bits,
    Boolean,
    Decimal64,
    Empty,
    Enumeration,
    Identityref,
    InstanceIdentifier,
    Leafref,
    String,
    Union,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    /// Placeholder base type used while a type reference is still
    /// unresolved (never observed on a fully compiled leaf).
    Unknown,
}

impl BaseType {
    pub const ALL: [BaseType; 20] = [
        BaseType::Binary,
        BaseType::Bits,
        BaseType::Boolean,
        BaseType::Decimal64,
        BaseType::Empty,
        BaseType::Enumeration,
        BaseType::Identityref,
        BaseType::InstanceIdentifier,
        BaseType::Leafref,
        BaseType::String,
        BaseType::Union,
        BaseType::Int8,
        BaseType::Int16,
        BaseType::Int32,
        BaseType::Int64,
        BaseType::Uint8,
        BaseType::Uint16,
        BaseType::Uint32,
        BaseType::Uint64,
        BaseType::Unknown,
    ];

    /// Whether this base type takes a `range` restriction (spec §4.4).
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            BaseType::Decimal64
                | BaseType::Int8
                | BaseType::Int16
                | BaseType::Int32
                | BaseType::Int64
                | BaseType::Uint8
                | BaseType::Uint16
                | BaseType::Uint32
                | BaseType::Uint64
        )
    }

    /// Whether this base type uses signed (`i64`) range comparisons (spec §4.4).
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            BaseType::Int8
                | BaseType::Int16
                | BaseType::Int32
                | BaseType::Int64
                | BaseType::Decimal64
        )
    }

    pub const fn min_i64(self) -> Option<i64> {
        match self {
            BaseType::Int8 => Some(i64::from(i8::MIN)),
            BaseType::Int16 => Some(i64::from(i16::MIN)),
            BaseType::Int32 => Some(i64::from(i32::MIN)),
            BaseType::Int64 => Some(i64::MIN),
            _ => None,
        }
    }

    pub const fn max_i64(self) -> Option<i64> {
        match self {
            BaseType::Int8 => Some(i64::from(i8::MAX)),
            BaseType::Int16 => Some(i64::from(i16::MAX)),
            BaseType::Int32 => Some(i64::from(i32::MAX)),
            BaseType::Int64 => Some(i64::MAX),
            _ => None,
        }
    }

    pub const fn min_u64(self) -> Option<u64> {
        match self {
            BaseType::Uint8 | BaseType::Uint16 | BaseType::Uint32 | BaseType::Uint64 => Some(0),
            _ => None,
        }
    }

    pub const fn max_u64(self) -> Option<u64> {
        match self {
            BaseType::Uint8 => Some(u64::from(u8::MAX)),
            BaseType::Uint16 => Some(u64::from(u16::MAX)),
            BaseType::Uint32 => Some(u64::from(u32::MAX)),
            BaseType::Uint64 => Some(u64::MAX),
            _ => None,
        }
    }
}
