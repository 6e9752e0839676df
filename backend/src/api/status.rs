use crate::models::HealthResponse;
use rocket::get;
use rocket::serde::json::Json;

#[get("/")]
pub fn index() -> &'static str {
    "Viral video search backend"
}

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
