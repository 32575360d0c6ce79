use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;
use tweetview_core::config;
use tweetview_server::api::create_router;
use tweetview_server::api::handlers::{AppState, Settings};
use tweetview_server::api::metrics;
use tweetview_server::auth::{HttpAuthProvider, OAuthConfig};
use tweetview_server::ledger::MemoryLedger;
use tweetview_server::paypal::{PayPalConfig, PayPalNvp};
use tweetview_server::session::{MemorySessionStore, SessionStore};
use tweetview_server::source::HttpTimelineSource;

#[derive(Parser)]
#[command(name = "tweetview", about = "Home timeline ranked by your favorites")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Externally visible base URL (OAuth callback and checkout return URLs)
    #[arg(long, default_value = config::DEFAULT_PUBLIC_URL)]
    public_url: String,

    /// Base URL of the timeline API
    #[arg(long, default_value = config::DEFAULT_API_BASE)]
    api_base: String,

    /// OAuth authorization endpoint
    #[arg(long, default_value = config::DEFAULT_OAUTH_AUTHORIZE_URL)]
    oauth_authorize_url: String,

    /// OAuth token endpoint
    #[arg(long, default_value = config::DEFAULT_OAUTH_TOKEN_URL)]
    oauth_token_url: String,

    /// Endpoint returning the authenticated user
    #[arg(long, default_value = config::DEFAULT_OAUTH_USER_URL)]
    oauth_user_url: String,

    /// OAuth scopes requested at login
    #[arg(long, default_value = "tweet.read users.read like.read offline.access")]
    oauth_scope: String,

    /// PayPal NVP API endpoint
    #[arg(long, default_value = config::PAYPAL_SANDBOX_ENDPOINT)]
    paypal_endpoint: String,

    /// PayPal checkout page buyers are redirected to
    #[arg(long, default_value = config::PAYPAL_SANDBOX_CHECKOUT_URL)]
    checkout_url: String,

    /// Number of top favorite terms forming the vocabulary
    #[arg(long, default_value_t = config::DEFAULT_VOCABULARY_SIZE)]
    vocabulary_size: usize,

    /// Pages fetched per collection
    #[arg(long, default_value_t = config::DEFAULT_NUM_PAGES)]
    pages: u32,

    /// Session lifetime in seconds
    #[arg(long, default_value_t = config::SESSION_TTL_SECS)]
    session_ttl: u64,

    /// Free login requests granted to new accounts
    #[arg(long, default_value_t = config::FREE_REQUESTS)]
    free_requests: u32,

    /// Directory served under /tweetview (the timeline viewer)
    #[arg(long)]
    static_dir: Option<String>,
}

/// Read a secret from the environment, warning when it is unset.
fn secret(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        tracing::warn!("{} is not set", name);
        String::new()
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("tweetview_server=info".parse()?)
                .add_directive("tweetview_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.port == 0 {
        eprintln!("Error: port must be > 0");
        std::process::exit(1);
    }
    if args.vocabulary_size == 0 || args.vocabulary_size > config::MAX_VOCABULARY_SIZE {
        eprintln!(
            "Error: vocabulary-size must be between 1 and {}",
            config::MAX_VOCABULARY_SIZE
        );
        std::process::exit(1);
    }
    if args.pages == 0 || args.pages > config::MAX_NUM_PAGES {
        eprintln!("Error: pages must be between 1 and {}", config::MAX_NUM_PAGES);
        std::process::exit(1);
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config::UPSTREAM_TIMEOUT_SECS))
        .build()?;
    let public_url = args.public_url.trim_end_matches('/').to_string();

    let auth = HttpAuthProvider::new(
        OAuthConfig {
            client_id: secret("TWEETVIEW_CLIENT_ID"),
            client_secret: secret("TWEETVIEW_CLIENT_SECRET"),
            authorize_url: args.oauth_authorize_url,
            token_url: args.oauth_token_url,
            user_url: args.oauth_user_url,
            callback_url: format!("{public_url}/app"),
            scope: args.oauth_scope,
        },
        client.clone(),
    );
    let payments = PayPalNvp::new(
        PayPalConfig {
            api_username: secret("PP_API_USERNAME"),
            api_password: secret("PP_API_PASSWORD"),
            api_signature: secret("PP_API_SIGNATURE"),
            api_endpoint: args.paypal_endpoint,
            checkout_url: args.checkout_url,
            api_version: config::PAYPAL_API_VERSION.to_string(),
        },
        client.clone(),
    );
    let source = HttpTimelineSource::new(args.api_base, client);

    let sessions = Arc::new(MemorySessionStore::new());
    let ledger = Arc::new(MemoryLedger::new(args.free_requests));

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let state = AppState {
        auth: Arc::new(auth),
        source: Arc::new(source),
        sessions: sessions.clone(),
        ledger: ledger.clone(),
        payments: Arc::new(payments),
        prometheus_handle,
        settings: Settings {
            public_url,
            vocabulary_size: args.vocabulary_size,
            num_pages: args.pages,
            session_ttl: Duration::from_secs(args.session_ttl),
        },
        start_time: Instant::now(),
    };

    let static_routes = match &args.static_dir {
        Some(dir) => axum::Router::new().nest_service("/tweetview", ServeDir::new(dir)),
        None => axum::Router::new(),
    };
    let app = create_router(state, static_routes);

    let addr = format!("0.0.0.0:{}", args.port);
    tracing::info!(
        addr = %addr,
        vocabulary_size = args.vocabulary_size,
        pages = args.pages,
        session_ttl_secs = args.session_ttl,
        free_requests = args.free_requests,
        static_dir = args.static_dir.as_deref().unwrap_or("-"),
        "tweetview ready"
    );

    // Purge expired sessions and refresh store gauges
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(config::SESSION_PURGE_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired sessions");
            }
            metrics::update_store_metrics(sessions.as_ref(), ledger.as_ref());
        }
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
