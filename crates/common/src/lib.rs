//! Shared response types and logging setup used by the server and binaries.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_body_shape() {
        let body = serde_json::to_value(types::MessageBody::new("Policy added!")).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Policy added!"}));
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_value(types::ErrorBody::new("Policy not found")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Policy not found"}));
    }
}
