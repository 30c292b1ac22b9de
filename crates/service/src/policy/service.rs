use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use models::policy::{NewPolicy, Policy, PolicyPatch};

use crate::errors::ServiceError;
use crate::policy::repository::PolicyRepository;

/// Policy operations independent of the web framework.
///
/// Each call is one repository operation; there is no coordination between
/// calls, so the service is freely shared across request handlers.
#[derive(Clone)]
pub struct PolicyService {
    repo: Arc<dyn PolicyRepository>,
}

impl PolicyService {
    pub fn new(repo: Arc<dyn PolicyRepository>) -> Self { Self { repo } }

    /// Validate and store a new policy.
    ///
    /// # Examples
    /// ```
    /// use service::policy::{repo::InMemoryPolicyRepository, PolicyService};
    /// use std::sync::Arc;
    /// let svc = PolicyService::new(Arc::new(InMemoryPolicyRepository::new()));
    /// let body = serde_json::json!({"applicationNumber": "A1", "holder": "Jane"});
    /// let created = tokio_test::block_on(svc.create(body)).unwrap();
    /// assert_eq!(created.application_number, "A1");
    /// let again = tokio_test::block_on(svc.create(serde_json::json!({"applicationNumber": "A1"})));
    /// assert!(again.is_err());
    /// ```
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: Value) -> Result<Policy, ServiceError> {
        let new = NewPolicy::from_value(body)?;
        let created = self.repo.insert(new).await?;
        info!(application_number = %created.application_number, "policy_created");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Policy>, ServiceError> {
        self.repo.list().await
    }

    /// Merge `body` into the policy; `NotFound` when no policy has this number.
    #[instrument(skip(self, body), fields(application_number = %application_number))]
    pub async fn update(&self, application_number: &str, body: Value) -> Result<(), ServiceError> {
        let patch = PolicyPatch::from_value(application_number, body)?;
        if !self.repo.merge(application_number, patch).await? {
            return Err(ServiceError::not_found("policy"));
        }
        info!("policy_updated");
        Ok(())
    }

    #[instrument(skip(self), fields(application_number = %application_number))]
    pub async fn delete(&self, application_number: &str) -> Result<(), ServiceError> {
        if !self.repo.delete(application_number).await? {
            return Err(ServiceError::not_found("policy"));
        }
        info!("policy_deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<u64, ServiceError> {
        let deleted = self.repo.delete_all().await?;
        info!(deleted, "policies_cleared");
        Ok(deleted)
    }
}
