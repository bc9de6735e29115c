mod api;
mod config;
mod models;
mod services;
mod utils;
mod view;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use tokio::sync::Mutex;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::services::{DirectoryClient, HttpUserApi, UserApi};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();

    log::info!("🚀 Starting User Directory...");
    let api = HttpUserApi::new(&config.user_api_url, config.request_timeout)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    log::info!("👥 User backend: {} (timeout {:?})", api.base_url(), config.request_timeout);

    let api: Box<dyn UserApi> = Box::new(api);
    let mut client = DirectoryClient::new(api);

    if config.refresh_on_startup {
        let report = client.refresh().await;
        match report.error {
            None => log::info!(
                "✅ Initial refresh: {:?}, {} users loaded, {} records skipped",
                report.status,
                report.loaded,
                report.rejected.len()
            ),
            Some(e) => log::warn!("⚠️  Initial refresh failed, list starts in error state: {}", e),
        }
    }

    let directory = web::Data::new(Mutex::new(client));
    let bind_address = config.bind_address();
    let allowed_origins = config.cors_allowed_origins.clone();

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(directory.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .route("/health", web::get().to(api::health::health_check))
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            .configure(api::directory::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
