//! `if-feature` expression compiler (spec §4.1) and feature enable/disable
//! runtime (spec §4.2).

mod expr;
mod feature;
mod runtime;

pub use expr::{compile_iffeature, FeatureExpr, FeatureNameResolver};
pub use feature::{evaluate, value, Feature, FeatureRef, FeatureUniverse};
pub use runtime::{set_feature, FeatureTarget};
