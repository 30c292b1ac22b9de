//! Service layer for policy records.
//! - Separates the HTTP layer from storage behind the `PolicyRepository` trait.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod policy;
#[cfg(test)]
pub mod test_support;

pub use policy::{PolicyRepository, PolicyService};
