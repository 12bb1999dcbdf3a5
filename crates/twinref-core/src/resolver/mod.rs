pub mod guards;
pub mod lookup;
pub mod parallel;
pub mod requests;

#[cfg(test)]
pub(crate) mod fixtures;

pub use lookup::{match_component, ReferenceResolver, Resolution};
