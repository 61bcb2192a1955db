use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// GET /healthz
pub async fn healthz_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
