use async_trait::async_trait;

use models::policy::{NewPolicy, Policy, PolicyPatch};

use crate::errors::ServiceError;

/// Storage contract for policy documents.
///
/// Implementations own uniqueness of `applicationNumber` and must apply each
/// call to a single record atomically.
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// Persist a new policy stamped with the current UTC time.
    /// Fails with `ServiceError::Duplicate` when the application number is taken.
    async fn insert(&self, policy: NewPolicy) -> Result<Policy, ServiceError>;

    async fn list(&self) -> Result<Vec<Policy>, ServiceError>;

    /// Returns whether a policy was removed.
    async fn delete(&self, application_number: &str) -> Result<bool, ServiceError>;

    /// Returns whether a policy matched, regardless of whether anything changed.
    async fn merge(&self, application_number: &str, patch: PolicyPatch) -> Result<bool, ServiceError>;

    /// Returns the number of removed policies.
    async fn delete_all(&self) -> Result<u64, ServiceError>;
}
