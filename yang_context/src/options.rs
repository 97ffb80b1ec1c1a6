//! Context-wide options (spec §6: "options bitfield").

use bitflags::bitflags;

bitflags! {
    /// Caller-supplied context options (spec §6).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ContextOptions: u32 {
        /// Drop a module's P-form once its C-form compiles successfully
        /// (spec §4.8 step 4, §6: `FREE_PARSED_ON_COMPILE`).
        const FREE_PARSED_ON_COMPILE = 1 << 0;
    }
}
