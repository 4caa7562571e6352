use axum::Json;

use crate::models::song::MessageResponse;

pub const SERVICE_IDENTITY: &str = "Microservicio de Canciones - API REST CRUD";
pub const HEALTHY: &str = "Service is healthy";

pub struct RootController;

impl RootController {
    pub async fn root() -> Json<MessageResponse> {
        Json(MessageResponse::new(SERVICE_IDENTITY))
    }

    pub async fn health_check() -> Json<MessageResponse> {
        Json(MessageResponse::new(HEALTHY))
    }
}
