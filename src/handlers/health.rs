use actix_web::{web, HttpResponse, Result};
use crate::models::ApiResponse;

/// 健康检查
pub async fn health_check() -> Result<HttpResponse> {
    let response = ApiResponse::success(serde_json::json!({
        "service": "twstock-backend",
        "status": "ok",
    }));
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
