use std::sync::Arc;

use diskarte::adapters::ai::{GeminiConfig, GeminiProvider};
use diskarte::adapters::auth::{FirebaseConfig, FirebaseSessionValidator};
use diskarte::adapters::http::{create_router, AppState, RouterConfig};
use diskarte::adapters::memory::{InMemoryChatLogRepository, InMemorySubscriptionStore};
use diskarte::adapters::paymongo::{PayMongoCheckoutAdapter, PayMongoConfig};
use diskarte::adapters::postgres::{
    self, PostgresChatLogRepository, PostgresSubscriptionStore,
};
use diskarte::application::handlers::{
    CheckAccessHandler, CreateCheckoutHandler, GetAdminStatsHandler,
    ProcessPaymentWebhookHandler, SendChatMessageHandler,
};
use diskarte::config::{AppConfig, ServerConfig};
use diskarte::domain::payment::PayMongoWebhookVerifier;
use diskarte::ports::{ChatLogRepository, SubscriptionReader, SubscriptionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

struct Storage {
    store: Arc<dyn SubscriptionStore>,
    reader: Arc<dyn SubscriptionReader>,
    chat_log: Arc<dyn ChatLogRepository>,
}

async fn init_storage(config: &AppConfig) -> anyhow::Result<Storage> {
    let Some(url) = config.database.url() else {
        tracing::warn!("No database URL configured, using in-memory storage");
        let store = Arc::new(InMemorySubscriptionStore::new());
        return Ok(Storage {
            store: store.clone(),
            reader: store,
            chat_log: Arc::new(InMemoryChatLogRepository::new()),
        });
    };

    tracing::info!("Connecting to database...");
    let pool = postgres::connect(url, &config.database).await?;
    if config.database.run_migrations {
        tracing::info!("Running migrations...");
        postgres::run_migrations(&pool).await?;
    }

    let store = Arc::new(PostgresSubscriptionStore::new(pool.clone()));
    Ok(Storage {
        store: store.clone(),
        reader: store,
        chat_log: Arc::new(PostgresChatLogRepository::new(pool)),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        live_payments = config.payment.is_live_mode(),
        "Starting Diskarte backend"
    );
    if !config.ai.has_api_key() {
        tracing::warn!("Gemini API key not configured; chat requests will fail");
    }

    let storage = init_storage(&config).await?;

    let session_validator = Arc::new(FirebaseSessionValidator::new(
        FirebaseConfig::new(&config.auth.firebase_project_id)
            .with_cache_duration(config.auth.jwks_cache_ttl()),
    )?);

    let ai = Arc::new(GeminiProvider::new(
        GeminiConfig::new(config.ai.api_key())
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout()),
    )?);

    let payments = Arc::new(PayMongoCheckoutAdapter::new(
        PayMongoConfig::new(config.payment.secret_key(), config.payment.checkout.clone())
            .with_api_base_url(&config.payment.api_base_url)
            .with_timeout(config.payment.timeout()),
    )?);

    let verifier = PayMongoWebhookVerifier::new(
        config.payment.webhook_secret(),
        config.payment.signature_tolerance_secs,
    );

    let gate = Arc::new(CheckAccessHandler::new(storage.store.clone()));
    let state = AppState {
        session_validator,
        chat: Arc::new(SendChatMessageHandler::new(gate, ai, storage.chat_log)),
        checkout: Arc::new(CreateCheckoutHandler::new(payments)),
        admin_stats: Arc::new(GetAdminStatsHandler::new(
            storage.reader,
            config.auth.admin_allow_list(),
            config.payment.pass_price,
        )),
        webhooks: Arc::new(ProcessPaymentWebhookHandler::new(verifier, storage.store)),
    };

    let app = create_router(
        state,
        &RouterConfig {
            cors_origins: config.server.cors_origins_list(),
            request_timeout: std::time::Duration::from_secs(config.server.request_timeout_secs),
        },
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
