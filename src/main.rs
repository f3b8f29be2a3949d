use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use dscatalog::config::AppConfig;
use dscatalog::db;
use dscatalog::repositories::auth_repository::SeaOrmAuthRepository;
use dscatalog::repositories::product_repository::SeaOrmProductRepository;
use dscatalog::routes;
use dscatalog::services::auth_service::AuthService;
use dscatalog::services::notifier::EmailNotifier;
use dscatalog::services::product_service::ProductService;
use dscatalog::utils::clock::SystemClock;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dscatalog=info,actix_web=info".into()),
        )
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    tracing::info!("connecting to database");
    let db = Arc::new(
        db::establish_connection(&config.database_url)
            .await
            .map_err(std::io::Error::other)?,
    );
    tracing::info!("database connected");

    let auth_repository = Arc::new(SeaOrmAuthRepository::new(db.clone()));
    let notifier = EmailNotifier::new(
        config.smtp.as_ref(),
        &config.recover_uri,
        config.recover_token_minutes,
    )
    .map_err(std::io::Error::other)?;

    let auth_service = web::Data::new(AuthService::new(
        auth_repository.clone(),
        auth_repository,
        Arc::new(notifier),
        Arc::new(SystemClock),
        config.recover_window(),
        config.password_hash_iterations,
    ));
    let product_service = web::Data::new(ProductService::new(Arc::new(
        SeaOrmProductRepository::new(db.clone()),
    )));

    if config.token_purge_interval_secs > 0 {
        let auth_service = auth_service.clone();
        let every = Duration::from_secs(config.token_purge_interval_secs);
        actix_web::rt::spawn(async move {
            let mut interval = actix_web::rt::time::interval(every);
            loop {
                interval.tick().await;
                if let Err(e) = auth_service.purge_expired_tokens().await {
                    tracing::warn!(error = %e, "failed to purge expired recover tokens");
                }
            }
        });
    }

    tracing::info!(host = %config.host, port = config.port, "starting server");

    let db = web::Data::from(db);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(auth_service.clone())
            .app_data(product_service.clone())
            .configure(routes::configure_routes)
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
