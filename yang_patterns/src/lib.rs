//! XSD regex to PCRE translation and refcounted pattern storage (spec
//! §4.5).

mod engine;
mod pool;
mod translate;

pub use engine::{CompiledRegex, OpaqueRegex, PassthroughPatternEngine, PatternEngine};
pub use pool::{inherit, CompiledPattern, PatternPool};
pub use translate::{split_inverted, translate};
