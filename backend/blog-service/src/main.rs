use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer};
use blog_service::admin;
use blog_service::auth::SessionKeys;
use blog_service::cache::PageCache;
use blog_service::handlers;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::RedisError;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;
use std::io;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    db_pool: PgPool,
    redis: ConnectionManager,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }

    async fn check_redis(&self) -> Result<(), RedisError> {
        let mut conn = self.redis.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING response",
            )))
        }
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "blog-service"
        })),
    }
}

async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();
    let mut ready = true;

    let start = Instant::now();
    let pg_result = state.check_postgres().await;
    let pg_latency = Some(start.elapsed().as_millis() as u64);
    let postgres_check = match pg_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms: pg_latency,
        },
        Err(e) => {
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("PostgreSQL connection failed: {}", e),
                latency_ms: pg_latency,
            }
        }
    };
    checks.insert("postgresql".to_string(), postgres_check);

    let start = Instant::now();
    let redis_result = state.check_redis().await;
    let redis_latency = Some(start.elapsed().as_millis() as u64);
    let redis_check = match redis_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "Redis ping successful".to_string(),
            latency_ms: redis_latency,
        },
        Err(e) => {
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("Redis ping failed: {}", e),
                latency_ms: redis_latency,
            }
        }
    };
    checks.insert("redis".to_string(), redis_check);

    let status = if ready {
        ComponentStatus::Healthy
    } else {
        ComponentStatus::Unhealthy
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

/// Blog Service
///
/// The page-facing HTTP service of the Quill blogging platform: feeds,
/// post authoring, comments, follows, and the admin exposure.
///
/// # Routes
///
/// - `/` - site index (behind the TTL page cache)
/// - `/group/{slug}` - group feed
/// - `/profile/{username}` - author feed, follow/unfollow actions
/// - `/posts/{id}` - detail, edit, comment
/// - `/create` - new post form
/// - `/follow` - feed of followed authors
/// - `/admin/*` - management CRUD with search and filters
///
/// Runs on port 8080 (configurable via BLOG_SERVICE_PORT).
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Support container healthchecks via CLI subcommand: `healthcheck-http` or legacy `healthcheck`
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" || cmd == "healthcheck-http" {
                let port =
                    std::env::var("BLOG_SERVICE_PORT").unwrap_or_else(|_| "8080".to_string());
                let url = format!("http://127.0.0.1:{}/health", port);
                match reqwest::Client::new().get(&url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match blog_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
        tracing::error!("Database migration failed: {:#}", e);
        eprintln!("ERROR: Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Connected to database");

    // Initialize Redis for the page cache
    let redis_client = redis::Client::open(config.cache.url.clone()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to parse Redis URL: {e}"),
        )
    })?;
    let redis_manager = ConnectionManager::new(redis_client).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize Redis connection: {e}"),
        )
    })?;

    let page_cache = PageCache::new(redis_manager.clone(), config.cache.page_ttl_secs);
    let session_keys = SessionKeys::new(&config.auth.session_secret);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let page_cache_data = web::Data::new(page_cache);
    let session_keys_data = web::Data::new(session_keys);
    let config_data = web::Data::new(config.clone());
    let health_state = web::Data::new(HealthState {
        db_pool: db_pool.clone(),
        redis: redis_manager.clone(),
    });

    HttpServer::new(move || {
        // Build CORS configuration
        let cors_builder = Cors::default();
        let mut cors = cors_builder;
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            // A path segment that does not parse (e.g. a malformed post id)
            // is an unknown page, not a bad request.
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                actix_web::error::ErrorNotFound(err.to_string())
            }))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(page_cache_data.clone())
            .app_data(session_keys_data.clone())
            .app_data(config_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(blog_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/health", web::get().to(health_summary))
            .route("/health/ready", web::get().to(readiness_summary))
            .route("/health/live", web::get().to(liveness_check))
            // Page endpoints
            .route("/", web::get().to(handlers::index))
            .route("/follow", web::get().to(handlers::follow_feed))
            .route("/group/{slug}", web::get().to(handlers::group_feed))
            .route("/profile/{username}", web::get().to(handlers::profile))
            .route(
                "/profile/{username}/follow",
                web::get().to(handlers::follow_author),
            )
            .route(
                "/profile/{username}/unfollow",
                web::get().to(handlers::unfollow_author),
            )
            .service(
                web::resource("/create")
                    .route(web::get().to(handlers::create_post_page))
                    .route(web::post().to(handlers::create_post)),
            )
            .route("/posts/{post_id}", web::get().to(handlers::post_detail))
            .service(
                web::resource("/posts/{post_id}/edit")
                    .route(web::get().to(handlers::edit_post_page))
                    .route(web::post().to(handlers::edit_post)),
            )
            .route(
                "/posts/{post_id}/comment",
                web::post().to(handlers::add_comment),
            )
            // Admin exposure
            .service(
                web::scope("/admin")
                    .route("", web::get().to(admin::handlers::overview))
                    .route("/posts", web::get().to(admin::handlers::list_posts))
                    .route(
                        "/posts/{post_id}",
                        web::patch().to(admin::handlers::update_post),
                    )
                    .route(
                        "/posts/{post_id}",
                        web::delete().to(admin::handlers::delete_post),
                    )
                    .route("/groups", web::get().to(admin::handlers::list_groups))
                    .route("/groups", web::post().to(admin::handlers::create_group))
                    .route(
                        "/groups/{group_id}",
                        web::put().to(admin::handlers::update_group),
                    )
                    .route(
                        "/groups/{group_id}",
                        web::delete().to(admin::handlers::delete_group),
                    )
                    .route("/comments", web::get().to(admin::handlers::list_comments))
                    .route(
                        "/comments/{comment_id}",
                        web::delete().to(admin::handlers::delete_comment),
                    )
                    .route("/follows", web::get().to(admin::handlers::list_follows))
                    .route(
                        "/follows/{follow_id}",
                        web::delete().to(admin::handlers::delete_follow),
                    )
                    .route(
                        "/cache/clear",
                        web::post().to(admin::handlers::clear_page_cache),
                    ),
            )
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
