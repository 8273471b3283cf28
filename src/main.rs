use chatvault::{
    auth::TokenKeys, config::Config, db, memory::SessionMemory, provider::{BoxChatProvider, GeminiProvider}, AppState,
};
use secrecy::SecretString;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "chatvault starting");

    let db_pool = db::connect(&config.database_url).await?;
    info!(database_url = %config.database_url, "database ready");

    let tokens = match &config.secret_key {
        Some(secret) => TokenKeys::new(secret.as_bytes(), config.token_ttl())?,
        None => {
            warn!("SECRET_KEY is not set; using a random key, tokens will not survive a restart");
            TokenKeys::random(config.token_ttl())?
        }
    };

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; chat replies will carry the provider error");
    }
    let gemini = GeminiProvider::new(config.gemini_api_key.clone().map(SecretString::from), config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone());
    info!(model = gemini.model(), "provider configured");

    let app_state = AppState {
        db_pool,
        tokens,
        provider: BoxChatProvider::new(gemini),
        memory: SessionMemory::new(),
    };

    let app = chatvault::app(app_state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("chatvault stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config.log_level.parse().unwrap_or_else(|e| {
            eprintln!("LOG_LEVEL='{}' is not a valid filter ({e}); falling back to 'info'", config.log_level);
            EnvFilter::new("info")
        })
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true);
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
