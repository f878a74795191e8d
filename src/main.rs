use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tutor_match::config::{LogFormat, Settings};
use tutor_match::core::Matcher;
use tutor_match::routes::{self, matches::AppState};
use tutor_match::services::{CacheManager, DirectoryClient, InMemoryMatchingService, MatchingService, PostgresClient};

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tutor_match={level},actix_web={level}")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Text => subscriber.init(),
    }
}

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    // LOG_LEVEL / LOG_FORMAT win over the config file
    let (config_level, config_format) = match &settings {
        Ok(s) => (s.logging.level.clone(), s.logging.format.clone()),
        Err(_) => ("info".to_string(), "json".to_string()),
    };
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(config_level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(config_format);
    init_tracing(&log_level, LogFormat::parse(&log_format));

    info!("Starting Tutor Match service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        startup_error(e)
    })?;

    info!("Configuration loaded successfully");

    // Initialize directory client
    let directory = Arc::new(
        DirectoryClient::new(
            settings.directory.endpoint.clone(),
            settings.directory.api_key.clone(),
            settings.directory.timeout_secs.unwrap_or(30),
        )
        .map_err(|e| {
            error!("Failed to create directory client: {}", e);
            startup_error(e)
        })?,
    );

    info!("Directory client initialized ({})", settings.directory.endpoint);

    // Initialize cache manager; Redis is optional
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match settings.cache.redis_url.as_deref() {
        Some(redis_url) => match CacheManager::new(redis_url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized with Redis (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
                c
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), using in-process cache only", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        },
        None => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            CacheManager::in_memory(l1_cache_size, cache_ttl)
        }
    };

    // Initialize match store
    let matching: Arc<dyn MatchingService> = match &settings.database {
        Some(db) => {
            let postgres = PostgresClient::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                startup_error(e)
            })?;

            info!("PostgreSQL match store initialized (max: {} connections)", db.max_connections.unwrap_or(10));
            Arc::new(postgres)
        }
        None => {
            warn!("No database configured, confirmed matches are kept in memory");
            Arc::new(InMemoryMatchingService::new())
        }
    };

    // Initialize matcher with configured weights
    let weights = settings.scoring_weights();
    let matcher = Matcher::new(weights)
        .with_jitter(settings.scoring.jitter_policy())
        .with_monthly_hours(settings.matching.estimated_monthly_hours);

    info!("Matcher initialized with weights: {:?}, jitter: {:?}", weights, settings.scoring.jitter);

    // Build application state
    let app_state = AppState {
        directory,
        cache: Arc::new(cache),
        matching,
        matcher,
        default_limit: settings.matching.default_limit,
        max_limit: settings.matching.max_limit,
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
            .app_data(routes::json_config())
            .app_data(routes::query_config())
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
