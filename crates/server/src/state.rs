use std::sync::Arc;

use service::policy::{repo::InMemoryPolicyRepository, PolicyRepository, PolicyService};

/// Shared, read-only handles given to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub policies: PolicyService,
}

impl ServerState {
    pub fn new(repo: Arc<dyn PolicyRepository>) -> Self {
        Self { policies: PolicyService::new(repo) }
    }

    /// State backed by a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryPolicyRepository::new()))
    }
}
