//! KME Server Binary
//!
//! Runs the ETSI GS QKD 014 key delivery HTTP server. TLS with client
//! certificate verification is terminated in front of this process.

use std::env;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use kme_server::{build_state, create_router, storage, KmeConfig};

#[tokio::main]
async fn main() {
    // Initialize logging
    let log_level = env::var("KME_LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Configuration
    let config = KmeConfig::from_env().expect("Invalid KME configuration");

    // Initialize storage
    let store = storage::connect(config.database_url.as_deref())
        .await
        .expect("Failed to open key store");

    info!(
        kme_id = %config.kme_id,
        store = store.backend(),
        default_key_size = config.default_key_size,
        identity_header = %config.identity_header,
        "Starting KME"
    );

    let addr = config.listen_addr();
    let state = build_state(config, store);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %addr, "KME listening");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
