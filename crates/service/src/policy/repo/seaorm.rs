use sea_orm::DatabaseConnection;

use models::policy::{self, NewPolicy, Policy, PolicyPatch};

use crate::errors::ServiceError;
use crate::policy::repository::PolicyRepository;

/// PostgreSQL-backed repository; documents live in a `jsonb` column.
pub struct SeaOrmPolicyRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmPolicyRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl PolicyRepository for SeaOrmPolicyRepository {
    async fn insert(&self, new: NewPolicy) -> Result<Policy, ServiceError> {
        let created = policy::create(&self.db, new).await?;
        Ok(Policy::from(created))
    }

    async fn list(&self) -> Result<Vec<Policy>, ServiceError> {
        let rows = policy::list_all(&self.db).await?;
        Ok(rows.into_iter().map(Policy::from).collect())
    }

    async fn delete(&self, application_number: &str) -> Result<bool, ServiceError> {
        Ok(policy::delete_by_application_number(&self.db, application_number).await?)
    }

    async fn merge(&self, application_number: &str, patch: PolicyPatch) -> Result<bool, ServiceError> {
        Ok(policy::merge_by_application_number(&self.db, application_number, patch).await?)
    }

    async fn delete_all(&self) -> Result<u64, ServiceError> {
        Ok(policy::delete_all(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, skip_db_tests};
    use serde_json::json;

    #[tokio::test]
    async fn seaorm_repo_round_trip() -> Result<(), anyhow::Error> {
        if skip_db_tests() { return Ok(()); }
        let repo = SeaOrmPolicyRepository::new(get_db().await?);
        let app_no = format!("SVC-{}", uuid::Uuid::new_v4());

        let created = repo.insert(NewPolicy::from_value(json!({"applicationNumber": app_no, "holder": "Jane"}))?).await?;
        assert_eq!(created.fields["holder"], "Jane");

        let dup = repo.insert(NewPolicy::from_value(json!({"applicationNumber": app_no}))?).await;
        assert!(matches!(dup, Err(ServiceError::Duplicate(_))));

        let patch = PolicyPatch::from_value(&app_no, json!({"holder": "Jane Doe"}))?;
        assert!(repo.merge(&app_no, patch).await?);

        let listed = repo.list().await?;
        let mine = listed.iter().find(|p| p.application_number == app_no).expect("listed");
        assert_eq!(mine.fields["holder"], "Jane Doe");

        assert!(repo.delete(&app_no).await?);
        assert!(!repo.delete(&app_no).await?);
        Ok(())
    }
}
