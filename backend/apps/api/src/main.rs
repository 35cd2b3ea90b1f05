//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level failures are handled
//! by the crate-specific error types behind the routers.

use axum::{
    Router, http,
    http::{Method, header},
};
use guard::{FileStore, GuardConfig, RateLimiter, UpstashStore, csrf_router};
use outreach::{OutreachConfig, ResendClient, outreach_router};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,guard=info,outreach=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let production = env::var("APP_ENV").is_ok_and(|v| v == "production");

    // Signing secret backs CSRF tokens and unsubscribe links
    let guard_config = match env::var("SIGNING_SECRET") {
        Ok(secret) => GuardConfig::with_secret(secret),
        Err(_) => {
            if production {
                anyhow::bail!("SIGNING_SECRET must be set in production");
            }
            tracing::warn!("SIGNING_SECRET not set, using the development secret");
            GuardConfig::development()
        }
    };
    if production {
        guard_config.validate_production()?;
    }
    let guard_config = Arc::new(guard_config);

    // Distributed limiter backend; the file store covers dev and outages
    let distributed = match (
        env::var("UPSTASH_REDIS_REST_URL"),
        env::var("UPSTASH_REDIS_REST_TOKEN"),
    ) {
        (Ok(url), Ok(token)) => Some(
            UpstashStore::new(url, token)
                .map_err(|e| anyhow::anyhow!("Upstash client construction failed: {e}"))?,
        ),
        _ => {
            if production {
                anyhow::bail!(
                    "UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN must be set in production"
                );
            }
            tracing::info!("Upstash credentials not set, rate limiting uses the local file store");
            None
        }
    };

    let file_store = match env::var("RATE_LIMIT_FILE") {
        Ok(path) => FileStore::new(path),
        Err(_) => FileStore::new(FileStore::default_path()),
    };
    let limiter = Arc::new(RateLimiter::new(distributed, file_store));
    tracing::info!(backend = limiter.backend_name(), "Rate limiter ready");

    // Mail provider
    let api_key = match env::var("RESEND_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            if production {
                anyhow::bail!("RESEND_API_KEY must be set in production");
            }
            tracing::warn!("RESEND_API_KEY not set, outbound email will fail");
            String::new()
        }
    };
    let audience_id = env::var("RESEND_AUDIENCE_ID").ok();
    let mail_client = ResendClient::new(api_key, audience_id.clone().unwrap_or_default());

    let outreach_config = OutreachConfig {
        base_url: env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        sender: env::var("MAIL_SENDER")
            .unwrap_or_else(|_| "Website <noreply@example.com>".to_string()),
        contact_recipient: env::var("CONTACT_RECIPIENT")
            .unwrap_or_else(|_| "hello@example.com".to_string()),
        audience_id,
        production,
        ..OutreachConfig::default()
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-csrf-token"),
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api",
            csrf_router(guard_config.clone()).merge(outreach_router(
                mail_client,
                limiter,
                guard_config,
                outreach_config,
            )),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
