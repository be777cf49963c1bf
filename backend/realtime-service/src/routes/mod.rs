use crate::state::AppState;
use actix_web::{get, web, HttpResponse};

pub mod wsroute;

#[get("/health")]
async fn health(state: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "realtime-service",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
        })),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(wsroute::ws_handler);
}
