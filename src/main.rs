use augur::config::Config;
use augur::services::{AlertInbox, AlertScanner, AlertStore, Analyzer, CoinDirectory, SessionStore};
use augur::sources::{CoinGeckoClient, FearGreedClient, NeutralSentiment};
use augur::AppState;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env());
    info!("Starting Augur server on {}:{}", config.host, config.port);

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let coingecko = Arc::new(CoinGeckoClient::new(
        config.coingecko_api_key.clone(),
        timeout,
    ));
    let fear_greed = Arc::new(FearGreedClient::new(config.fear_greed_url.clone(), timeout));

    // Coin directory; analysis still works by id if this fails
    let coins = CoinDirectory::new();
    match coingecko.top_coins().await {
        Ok(listed) => coins.load(listed),
        Err(e) => warn!("Failed to load coin directory: {}", e),
    }

    let analyzer = Analyzer::new(
        coingecko.clone(),
        Arc::new(NeutralSentiment),
        fear_greed,
        config.history_days,
        Duration::from_secs(config.analysis_cache_ttl_secs),
    );

    let alerts = AlertStore::new();
    let inbox = AlertInbox::new(config.alerts.inbox_capacity);
    let scanner = AlertScanner::new(
        alerts.clone(),
        coingecko,
        inbox.clone(),
        coins.clone(),
        &config.alerts,
    );
    scanner.spawn(Duration::from_secs(config.alerts.scan_interval_secs));

    // Periodically drop stale analyses
    {
        let analyzer = analyzer.clone();
        let ttl = config.analysis_cache_ttl_secs.max(1);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(ttl)).await;
                analyzer.evict_expired();
            }
        });
    }

    let state = AppState {
        config: config.clone(),
        analyzer,
        alerts,
        inbox,
        sessions: SessionStore::new(),
        coins,
    };

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur server listening on {}", addr);
    axum::serve(listener, augur::app(state)).await?;

    Ok(())
}
