//! Range/length compiler (spec §4.4) and typedef-chain type compiler
//! (spec §4.3).

mod compiler;
mod ctype;
mod range;

pub use compiler::{
    compile_type_ref, ChainStep, IdentityNameResolver, TypeCompileCtx, TypedefResolver,
};
pub use ctype::{BitItem, CType, EnumItem, TypeHandle};
pub use range::{compile_range, narrows, CompiledRange, RangeDomain, RangePart, RangePool};
