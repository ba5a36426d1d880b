use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anketa_match::config::{BlacklistBackend, Settings, StorageBackend};
use anketa_match::core::Matcher;
use anketa_match::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use anketa_match::services::{
    AnketaService, InMemoryProfileStore, MemoryBlacklist, PostgresProfileStore, ProfileBackend,
    RedisBlacklist, TokenBlacklist, TokenVerifier,
};
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

async fn profile_backend(settings: &Settings) -> io::Result<Arc<dyn ProfileBackend>> {
    match settings.database.backend {
        StorageBackend::Memory => {
            info!("Using in-memory profile store");
            Ok(Arc::new(InMemoryProfileStore::new()))
        }
        StorageBackend::Postgres => {
            let db_max_conn = settings.database.max_connections.unwrap_or(10);
            let db_min_conn = settings.database.min_connections.unwrap_or(1);

            let store = PostgresProfileStore::from_settings(
                &settings.database.url,
                Some(db_max_conn),
                Some(db_min_conn),
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

            info!("PostgreSQL profile store initialized (max: {} connections)", db_max_conn);
            Ok(Arc::new(store))
        }
    }
}

async fn token_blacklist(settings: &Settings) -> io::Result<Arc<dyn TokenBlacklist>> {
    match settings.auth.blacklist {
        BlacklistBackend::Memory => {
            info!("Token blacklist in memory (initial capacity: {})", settings.auth.blacklist_capacity);
            Ok(Arc::new(MemoryBlacklist::new(settings.auth.blacklist_capacity)))
        }
        BlacklistBackend::Redis => {
            let url = settings
                .auth
                .redis_url
                .as_deref()
                .ok_or_else(|| startup_error("Redis blacklist selected", "auth.redis_url is not set"))?;

            let blacklist = RedisBlacklist::new(url)
                .await
                .map_err(|e| startup_error("Failed to connect to Redis", e))?;

            info!("Token blacklist backed by Redis");
            Ok(Arc::new(blacklist))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting anketa matching service...");

    let backend = profile_backend(&settings).await?;
    let blacklist = token_blacklist(&settings).await?;

    let matcher = Matcher::new(settings.matching.max_age_gap);
    info!("Matcher initialized with max age gap {}", matcher.max_age_gap());

    // Build application state
    let app_state = AppState {
        service: Arc::new(AnketaService::new(backend, matcher)),
        tokens: Arc::new(TokenVerifier::new(settings.auth.jwt_secret.as_bytes(), blacklist)),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
