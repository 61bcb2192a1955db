//! HTTP route table.
//!
//! - GET  /                 preferences page (`?username=`, defaults to `demo`)
//! - POST /save_prefs       form save, redirects back to the page
//! - POST /api/save_prefs   JSON save
//! - GET  /healthz          liveness probe

use crate::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::view_prefs))
        .route("/save_prefs", web::post().to(handlers::save_prefs_form))
        .service(
            web::scope("/api").route("/save_prefs", web::post().to(handlers::save_prefs_api)),
        )
        .route("/healthz", web::get().to(handlers::healthz_handler));
}
