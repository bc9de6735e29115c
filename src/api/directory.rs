use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::api::metrics;
use crate::models::{DirectoryView, NotificationLevel};
use crate::services::{DirectoryAction, DirectoryClient, UserApi};

/// Shared client state. The lock is held for a whole action, so actions run
/// one after another and a double submit waits for the first to settle.
pub type DirectoryHandle = Mutex<DirectoryClient<Box<dyn UserApi>>>;

/// Input of the create and edit forms. Missing fields count as empty.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserFormRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/directory")
            .route("", web::get().to(get_view))
            .route("/refresh", web::post().to(refresh))
            .route("/users", web::post().to(create_user))
            .route("/selection", web::put().to(update_selected))
            .route("/selection", web::delete().to(delete_selected))
            .route("/select/{id}", web::post().to(select_user))
            .route("/deselect", web::post().to(deselect))
            .route("/clear-form", web::post().to(clear_form)),
    );
}

async fn run_action(directory: &DirectoryHandle, action: DirectoryAction) -> HttpResponse {
    metrics::increment_action_count();

    let mut client = directory.lock().await;
    let view = client.dispatch(action).await;

    if let Some(notification) = &view.notification {
        if notification.level == NotificationLevel::Error {
            metrics::increment_action_error_count();
            log::warn!("⚠️  Directory action failed: {}", notification.message);
        }
    }

    HttpResponse::Ok().json(view)
}

#[utoipa::path(
    get,
    path = "/api/v1/directory",
    tag = "Directory",
    responses(
        (status = 200, description = "Current directory view", body = DirectoryView)
    )
)]
pub async fn get_view(directory: web::Data<DirectoryHandle>) -> HttpResponse {
    let client = directory.lock().await;
    HttpResponse::Ok().json(client.view())
}

#[utoipa::path(
    post,
    path = "/api/v1/directory/refresh",
    tag = "Directory",
    responses(
        (status = 200, description = "List re-fetched from the backend; failures are reported in `notification`", body = DirectoryView)
    )
)]
pub async fn refresh(directory: web::Data<DirectoryHandle>) -> HttpResponse {
    log::info!("🔄 POST /directory/refresh");
    run_action(&directory, DirectoryAction::Refresh).await
}

#[utoipa::path(
    post,
    path = "/api/v1/directory/users",
    tag = "Directory",
    request_body = UserFormRequest,
    responses(
        (status = 200, description = "Create attempted; failures are reported in `notification`", body = DirectoryView)
    )
)]
pub async fn create_user(
    directory: web::Data<DirectoryHandle>,
    body: web::Json<UserFormRequest>,
) -> HttpResponse {
    log::info!("➕ POST /directory/users - username: {}", body.username);
    let body = body.into_inner();
    run_action(
        &directory,
        DirectoryAction::Create {
            full_name: body.full_name,
            username: body.username,
        },
    )
    .await
}

#[utoipa::path(
    put,
    path = "/api/v1/directory/selection",
    tag = "Directory",
    request_body = UserFormRequest,
    responses(
        (status = 200, description = "Update of the selected user attempted", body = DirectoryView)
    )
)]
pub async fn update_selected(
    directory: web::Data<DirectoryHandle>,
    body: web::Json<UserFormRequest>,
) -> HttpResponse {
    log::info!("✏️  PUT /directory/selection");
    let body = body.into_inner();
    run_action(
        &directory,
        DirectoryAction::Update {
            full_name: body.full_name,
            username: body.username,
        },
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/directory/selection",
    tag = "Directory",
    responses(
        (status = 200, description = "Delete of the selected user attempted", body = DirectoryView)
    )
)]
pub async fn delete_selected(directory: web::Data<DirectoryHandle>) -> HttpResponse {
    log::info!("🗑️  DELETE /directory/selection");
    run_action(&directory, DirectoryAction::Delete).await
}

#[utoipa::path(
    post,
    path = "/api/v1/directory/select/{id}",
    tag = "Directory",
    params(
        ("id" = String, Path, description = "User id as shown in the list")
    ),
    responses(
        (status = 200, description = "User selected; unknown ids are ignored", body = DirectoryView)
    )
)]
pub async fn select_user(
    directory: web::Data<DirectoryHandle>,
    path: web::Path<String>,
) -> HttpResponse {
    let raw = path.into_inner();
    log::info!("👆 POST /directory/select/{}", raw);

    let id = directory.lock().await.resolve_id(&raw);
    run_action(&directory, DirectoryAction::Select(id)).await
}

#[utoipa::path(
    post,
    path = "/api/v1/directory/deselect",
    tag = "Directory",
    responses(
        (status = 200, description = "Selection cleared", body = DirectoryView)
    )
)]
pub async fn deselect(directory: web::Data<DirectoryHandle>) -> HttpResponse {
    run_action(&directory, DirectoryAction::Deselect).await
}

#[utoipa::path(
    post,
    path = "/api/v1/directory/clear-form",
    tag = "Directory",
    responses(
        (status = 200, description = "Input fields cleared", body = DirectoryView)
    )
)]
pub async fn clear_form(directory: web::Data<DirectoryHandle>) -> HttpResponse {
    run_action(&directory, DirectoryAction::ClearForm).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListStatus;
    use crate::services::fake_user_api::FakeUserApi;
    use actix_web::{test, App};
    use serde_json::json;

    fn handle() -> web::Data<DirectoryHandle> {
        let api: Box<dyn UserApi> = Box::new(FakeUserApi::ann());
        web::Data::new(Mutex::new(DirectoryClient::new(api)))
    }

    #[actix_web::test]
    async fn test_refresh_select_and_update_over_http() {
        let app = test::init_service(App::new().app_data(handle()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/api/v1/directory/refresh").to_request();
        let view: DirectoryView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view.status, ListStatus::Populated);
        assert_eq!(view.items[0].label, "Ann Lee (ann) - ID: 1");

        let req = test::TestRequest::post().uri("/api/v1/directory/select/1").to_request();
        let view: DirectoryView = test::call_and_read_body_json(&app, req).await;
        assert!(view.items[0].selected);
        assert_eq!(view.form.update_username, "ann");

        let req = test::TestRequest::put()
            .uri("/api/v1/directory/selection")
            .set_json(json!({"fullName": "Ann L.", "username": "annl"}))
            .to_request();
        let view: DirectoryView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view.items[0].label, "Ann L. (annl) - ID: 1");
        assert_eq!(view.selected_id, None);
        assert!(!view.form.actions_visible);
    }

    #[actix_web::test]
    async fn test_errors_come_back_as_notifications() {
        let app = test::init_service(App::new().app_data(handle()).configure(configure)).await;

        let req = test::TestRequest::delete().uri("/api/v1/directory/selection").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let view: DirectoryView = test::read_body_json(resp).await;
        let notification = view.notification.unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "No user selected");

        let req = test::TestRequest::post()
            .uri("/api/v1/directory/users")
            .set_json(json!({"fullName": "Bo Chen"}))
            .to_request();
        let view: DirectoryView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            view.notification.map(|n| n.message),
            Some("Both full name and username are required".to_string())
        );
        assert_eq!(view.form.full_name, "Bo Chen");
    }

    #[actix_web::test]
    async fn test_create_and_clear_form() {
        let app = test::init_service(App::new().app_data(handle()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/directory/users")
            .set_json(json!({"fullName": "Bo Chen", "username": "bo"}))
            .to_request();
        let view: DirectoryView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.notification.unwrap().level, NotificationLevel::Info);
        assert_eq!(view.form.full_name, "");

        let req = test::TestRequest::get().uri("/api/v1/directory").to_request();
        let view: DirectoryView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view.items[1].label, "Bo Chen (bo) - ID: 100");

        let req = test::TestRequest::post().uri("/api/v1/directory/clear-form").to_request();
        let view: DirectoryView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(view.form, crate::models::FormState::default());
    }
}
