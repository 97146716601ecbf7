use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use automax_api::data::memory::InMemorySessionStore;
use automax_api::data::sqlite::SqliteStore;
use automax_api::infrastructure::config::AppConfig;
use automax_api::infrastructure::logging::init_logging;
use automax_api::presentation::handlers::AppState;
use automax_api::presentation::middleware::RequestLogMiddleware;
use automax_api::presentation::routes::configure;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    info!(
        database_url = %config.database_url,
        session_ttl_hours = config.session_ttl.num_hours(),
        "Configuration loaded"
    );

    let store = SqliteStore::connect(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    store.init_schema().await.map_err(std::io::Error::other)?;
    if config.seed_catalog {
        store.seed_catalog().await.map_err(std::io::Error::other)?;
    }

    let sessions = InMemorySessionStore::new(config.session_ttl);
    let state = web::Data::new(AppState::new(store, sessions, config.cookie_secure));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(RequestLogMiddleware)
            .configure(configure)
    });

    let (host, port) = config.bind_address();
    let server = server.bind((host.as_str(), port))?;
    info!(%host, port, "Server listening");
    server.run().await
}
