use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use models::policy::{NewPolicy, Policy, PolicyPatch};

use crate::errors::ServiceError;
use crate::policy::repository::PolicyRepository;

/// In-process repository with the same semantics as the database one.
///
/// Policies are kept in insertion order. Every mutation runs under the write
/// lock, so the uniqueness check and the insert cannot interleave.
#[derive(Default)]
pub struct InMemoryPolicyRepository {
    rows: RwLock<Vec<Policy>>,
}

impl InMemoryPolicyRepository {
    pub fn new() -> Self { Self::default() }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl PolicyRepository for InMemoryPolicyRepository {
    async fn insert(&self, new: NewPolicy) -> Result<Policy, ServiceError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.application_number == new.application_number) {
            return Err(ServiceError::Duplicate(new.application_number));
        }
        let policy = new.into_policy(Utc::now());
        rows.push(policy.clone());
        Ok(policy)
    }

    async fn list(&self) -> Result<Vec<Policy>, ServiceError> {
        Ok(self.rows.read().await.clone())
    }

    async fn delete(&self, application_number: &str) -> Result<bool, ServiceError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| p.application_number != application_number);
        Ok(rows.len() < before)
    }

    async fn merge(&self, application_number: &str, patch: PolicyPatch) -> Result<bool, ServiceError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|p| p.application_number == application_number) {
            Some(p) => {
                patch.apply_to(&mut p.fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self) -> Result<u64, ServiceError> {
        let mut rows = self.rows.write().await;
        let n = rows.len() as u64;
        rows.clear();
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn new_policy(v: serde_json::Value) -> NewPolicy {
        NewPolicy::from_value(v).unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicates() {
        let repo = InMemoryPolicyRepository::new();
        repo.insert(new_policy(json!({"applicationNumber": "A1", "holder": "Jane"}))).await.unwrap();
        let err = repo.insert(new_policy(json!({"applicationNumber": "A1", "holder": "John"}))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(ref a) if a == "A1"));

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].fields["holder"], "Jane");
    }

    #[tokio::test]
    async fn concurrent_inserts_keep_one_record() {
        let repo = Arc::new(InMemoryPolicyRepository::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(new_policy(json!({"applicationNumber": "RACE", "n": i}))).await
            }));
        }
        let mut ok = 0;
        for h in handles {
            if h.await.unwrap().is_ok() { ok += 1; }
        }
        assert_eq!(ok, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn merge_and_delete_report_matches() {
        let repo = InMemoryPolicyRepository::new();
        let created = repo.insert(new_policy(json!({"applicationNumber": "A1", "holder": "Jane", "mode": "Yearly"}))).await.unwrap();

        let patch = PolicyPatch::from_value("A1", json!({"holder": "Jane Doe"})).unwrap();
        assert!(repo.merge("A1", patch.clone()).await.unwrap());
        // no-op merge still matches
        assert!(repo.merge("A1", patch).await.unwrap());
        assert!(!repo.merge("B2", PolicyPatch::default()).await.unwrap());

        let p = &repo.list().await.unwrap()[0];
        assert_eq!(p.fields["holder"], "Jane Doe");
        assert_eq!(p.fields["mode"], "Yearly");
        assert_eq!(p.created_at, created.created_at);

        assert!(repo.delete("A1").await.unwrap());
        assert!(!repo.delete("A1").await.unwrap());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn delete_all_counts_rows() {
        let repo = InMemoryPolicyRepository::new();
        for n in ["A1", "A2", "A3"] {
            repo.insert(new_policy(json!({"applicationNumber": n}))).await.unwrap();
        }
        assert_eq!(repo.delete_all().await.unwrap(), 3);
        assert_eq!(repo.delete_all().await.unwrap(), 0);
    }
}
