use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory",
        version = "1.0.0",
        description = "Front-end service for the user directory. \n\nEvery action returns the full `DirectoryView` (list entries, list status, form fields, selection and the latest notification). Backend failures never surface as HTTP errors here; they arrive as an error notification in the view.\n\n**Backend:** `GET /users`, `POST /add-user`, `PUT /update-user/{id}`, `DELETE /delete-user?id={id}`."
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Directory
        crate::api::directory::get_view,
        crate::api::directory::refresh,
        crate::api::directory::create_user,
        crate::api::directory::update_selected,
        crate::api::directory::delete_selected,
        crate::api::directory::select_user,
        crate::api::directory::deselect,
        crate::api::directory::clear_form,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
            crate::api::directory::UserFormRequest,
            crate::models::DirectoryView,
            crate::models::ListItem,
            crate::models::ListStatus,
            crate::models::FormState,
            crate::models::Notification,
            crate::models::NotificationLevel,
            crate::models::UserPayload,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and action counters."),
        (name = "Directory", description = "User directory actions: refresh, create, select, update, delete."),
    )
)]
pub struct ApiDoc;
