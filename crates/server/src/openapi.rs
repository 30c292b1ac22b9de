use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Policy document. Any extra fields are stored as sent.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "applicationNumber": "A1",
    "customerName": "Jane",
    "advisorName": "Ravi",
    "planName": "Term Plus",
    "mode": "Yearly",
    "status": "Issued",
    "fyfrp": 12000
}))]
pub struct PolicyDoc {
    pub application_number: String,
    /// Server-assigned on creation (RFC 3339, UTC); ignored on input.
    pub created_at: Option<String>,
}

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::home,
        crate::routes::health,
        crate::routes::policies::create,
        crate::routes::policies::list,
        crate::routes::policies::update,
        crate::routes::policies::delete,
        crate::routes::policies::delete_all,
    ),
    components(
        schemas(
            HealthResponse,
            PolicyDoc,
            MessageDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "policies")
    )
)]
pub struct ApiDoc;
