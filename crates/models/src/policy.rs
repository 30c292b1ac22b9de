//! Policy documents.
//!
//! A policy is a schema-less JSON object with two reserved keys:
//! `applicationNumber` (client supplied, unique) and `createdAt` (stamped on
//! insert, never changed afterwards). Everything else is stored untouched in a
//! `jsonb` column, so the reserved keys live in their own columns and are
//! stripped from the stored document.

use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, QueryOrder, Set, SqlErr, UpdateMany};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ModelError;

pub const APPLICATION_NUMBER: &str = "applicationNumber";
pub const CREATED_AT: &str = "createdAt";

/// Free-form policy fields.
pub type Document = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "policies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub application_number: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub document: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Client-facing shape: the free-form fields plus the two reserved keys.
/// The storage row id never appears here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(rename = "applicationNumber")]
    pub application_number: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Document,
}

impl From<Model> for Policy {
    fn from(m: Model) -> Self {
        let fields = match m.document {
            Value::Object(map) => map,
            _ => Document::new(),
        };
        Policy {
            application_number: m.application_number,
            created_at: m.created_at.with_timezone(&Utc),
            fields,
        }
    }
}

/// Validated create payload.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPolicy {
    pub application_number: String,
    pub fields: Document,
}

impl NewPolicy {
    /// Accepts any JSON object carrying a non-blank string `applicationNumber`.
    /// A client supplied `createdAt` is discarded; the store stamps its own.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        let Value::Object(mut fields) = value else {
            return Err(ModelError::Validation("policy must be a JSON object".into()));
        };
        let application_number = match fields.remove(APPLICATION_NUMBER) {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(Value::String(_)) => {
                return Err(ModelError::Validation("applicationNumber must not be blank".into()))
            }
            Some(_) => return Err(ModelError::Validation("applicationNumber must be a string".into())),
            None => return Err(ModelError::Validation("applicationNumber is required".into())),
        };
        fields.remove(CREATED_AT);
        Ok(Self { application_number, fields })
    }

    pub fn into_policy(self, created_at: DateTime<Utc>) -> Policy {
        Policy { application_number: self.application_number, created_at, fields: self.fields }
    }
}

/// Validated partial update for one policy.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PolicyPatch {
    pub fields: Document,
}

impl PolicyPatch {
    /// `createdAt` is dropped. `applicationNumber` may only repeat the target's own value.
    pub fn from_value(application_number: &str, value: Value) -> Result<Self, ModelError> {
        let Value::Object(mut fields) = value else {
            return Err(ModelError::Validation("policy update must be a JSON object".into()));
        };
        fields.remove(CREATED_AT);
        match fields.remove(APPLICATION_NUMBER) {
            None => {}
            Some(Value::String(s)) if s == application_number => {}
            Some(_) => {
                return Err(ModelError::Validation("applicationNumber cannot be changed".into()))
            }
        }
        Ok(Self { fields })
    }

    /// Shallow merge: top-level keys in the patch overwrite, everything else is kept.
    pub fn apply_to(&self, target: &mut Document) {
        for (k, v) in &self.fields {
            target.insert(k.clone(), v.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn db_err(e: DbErr) -> ModelError {
    ModelError::Db(e.to_string())
}

/// Insert a policy. A unique index violation is reported as `Duplicate`;
/// there is no separate existence check.
pub async fn create(db: &DatabaseConnection, new: NewPolicy) -> Result<Model, ModelError> {
    let NewPolicy { application_number, fields } = new;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        application_number: Set(application_number.clone()),
        document: Set(Value::Object(fields)),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ModelError::Duplicate(application_number),
        _ => db_err(e),
    })
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find().order_by_asc(Column::CreatedAt).all(db).await.map_err(db_err)
}

/// Returns whether a row was removed.
pub async fn delete_by_application_number(db: &DatabaseConnection, application_number: &str) -> Result<bool, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::ApplicationNumber.eq(application_number))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// Merge `patch` into the stored document with a single `jsonb ||` update.
/// Returns whether a row matched, even if no value actually changed.
pub async fn merge_by_application_number(
    db: &DatabaseConnection,
    application_number: &str,
    patch: PolicyPatch,
) -> Result<bool, ModelError> {
    let res = merge_statement(application_number, patch)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

/// `$1` is numbered relative to this expression; sea-query renumbers it into the full statement.
fn merge_statement(application_number: &str, patch: PolicyPatch) -> UpdateMany<Entity> {
    Entity::update_many()
        .col_expr(
            Column::Document,
            Expr::cust_with_values("\"document\" || $1", [Value::Object(patch.fields)]),
        )
        .filter(Column::ApplicationNumber.eq(application_number))
}

pub async fn delete_all(db: &DatabaseConnection) -> Result<u64, ModelError> {
    let res = Entity::delete_many().exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};
    use serde_json::json;

    #[test]
    fn new_policy_requires_application_number() {
        let err = NewPolicy::from_value(json!({"holder": "Jane"})).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let err = NewPolicy::from_value(json!({"applicationNumber": "  "})).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let err = NewPolicy::from_value(json!({"applicationNumber": 42})).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let err = NewPolicy::from_value(json!(["A1"])).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn new_policy_strips_reserved_keys() {
        let p = NewPolicy::from_value(json!({
            "applicationNumber": "A1",
            "createdAt": "1999-01-01T00:00:00Z",
            "holder": "Jane"
        }))
        .unwrap();
        assert_eq!(p.application_number, "A1");
        assert_eq!(p.fields.len(), 1);
        assert_eq!(p.fields["holder"], "Jane");
    }

    #[test]
    fn patch_rejects_application_number_change() {
        let err = PolicyPatch::from_value("A1", json!({"applicationNumber": "B2"})).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let patch = PolicyPatch::from_value("A1", json!({"applicationNumber": "A1", "createdAt": "x", "mode": "Yearly"})).unwrap();
        assert_eq!(patch.fields.len(), 1);
        assert_eq!(patch.fields["mode"], "Yearly");
    }

    #[test]
    fn patch_apply_is_shallow_merge() {
        let mut doc = json!({"holder": "Jane", "premium": 100, "nominee": {"name": "A"}})
            .as_object()
            .cloned()
            .unwrap();
        let patch = PolicyPatch::from_value("A1", json!({"holder": "Jane Doe", "nominee": {"age": 3}})).unwrap();
        patch.apply_to(&mut doc);
        assert_eq!(doc["holder"], "Jane Doe");
        assert_eq!(doc["premium"], 100);
        assert_eq!(doc["nominee"], json!({"age": 3}));
    }

    #[test]
    fn policy_serializes_flat_without_row_id() {
        let created_at = DateTime::parse_from_rfc3339("2026-10-19T08:30:00Z").unwrap().with_timezone(&Utc);
        let p = NewPolicy::from_value(json!({"applicationNumber": "A1", "holder": "Jane"}))
            .unwrap()
            .into_policy(created_at);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v, json!({"applicationNumber": "A1", "holder": "Jane", "createdAt": "2026-10-19T08:30:00Z"}));
        assert!(v.get("id").is_none());
    }

    #[test]
    fn merge_statement_uses_postgres_placeholders() {
        let patch = PolicyPatch::from_value("A1", json!({"holder": "Jane Doe"})).unwrap();
        let stmt = merge_statement("A1", patch).build(DbBackend::Postgres);
        assert!(!stmt.sql.contains('?'), "unbound placeholder in: {}", stmt.sql);
        assert!(stmt.sql.contains(r#""document" = "document" || $1"#), "{}", stmt.sql);
        assert!(stmt.sql.contains("$2"), "{}", stmt.sql);
        assert_eq!(stmt.values.map(|v| v.0.len()), Some(2));
    }

    #[test]
    fn model_converts_to_policy() {
        let now = Utc::now();
        let m = Model {
            id: Uuid::new_v4(),
            application_number: "A9".into(),
            document: json!({"status": "Issued"}),
            created_at: now.into(),
        };
        let p = Policy::from(m);
        assert_eq!(p.application_number, "A9");
        assert_eq!(p.created_at, now);
        assert_eq!(p.fields["status"], "Issued");
    }
}
