use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::api::directory::DirectoryHandle;
use crate::models::ListStatus;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
    /// True while a directory action holds the client.
    pub busy: bool,
    /// State of the list as of the last refresh. Absent while busy.
    pub directory: Option<ListStatus>,
    pub cached_users: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(directory: web::Data<DirectoryHandle>) -> impl Responder {
    // Does not wait for an in-flight action.
    let (busy, status, cached_users) = match directory.try_lock() {
        Ok(client) => (false, Some(client.state().status()), Some(client.state().len())),
        Err(_) => (true, None, None),
    };

    HttpResponse::Ok().json(HealthResponse {
        status: if busy { "busy" } else { "healthy" }.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        busy,
        directory: status,
        cached_users,
    })
}
