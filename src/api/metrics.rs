use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static ACTION_COUNT: AtomicU64 = AtomicU64::new(0);
static ACTION_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_action_count() {
    ACTION_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_action_error_count() {
    ACTION_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub directory_actions_total: u64,
    pub directory_action_errors_total: u64,
}

pub fn snapshot() -> MetricsResponse {
    MetricsResponse {
        directory_actions_total: ACTION_COUNT.load(Ordering::Relaxed),
        directory_action_errors_total: ACTION_ERROR_COUNT.load(Ordering::Relaxed),
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Directory action counters in Prometheus text format", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let current = snapshot();

    let metrics = format!(
        "# HELP directory_actions_total Total number of directory actions dispatched\n\
         # TYPE directory_actions_total counter\n\
         directory_actions_total {}\n\
         \n\
         # HELP directory_action_errors_total Directory actions that ended with an error notification\n\
         # TYPE directory_action_errors_total counter\n\
         directory_action_errors_total {}\n",
        current.directory_actions_total, current.directory_action_errors_total
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}
