use actix_web::{HttpResponse, Responder, get, web};

pub mod grid;
pub mod presets;
pub mod sessions;

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(
        web::scope("/api/v1")
            .configure(grid::configure)
            .configure(sessions::configure)
            .configure(presets::configure),
    );
}
