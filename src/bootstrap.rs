use crate::application::services::*;
use crate::config::Config;
use crate::domain::ports::auth_provider::AuthProvider;
use crate::domain::ports::change_feed::ChangeFeed;
use crate::domain::ports::channel_repository::ChannelRepository;
use crate::domain::ports::contact_repository::ContactRepository;
use crate::domain::ports::message_repository::MessageRepository;
use crate::domain::ports::template_repository::TemplateRepository;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::Database;
use crate::infrastructure::providers::GoTrueAuthProvider;
use crate::infrastructure::realtime::LocalChangeFeed;
use std::sync::Arc;

/// Connect to the store and apply migrations
pub async fn initialize_database(config: &Config) -> anyhow::Result<Database> {
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connection established");

    db.run_migrations().await?;
    tracing::info!("Database migrations applied");

    Ok(db)
}

pub fn build_auth_provider(config: &Config) -> anyhow::Result<Arc<dyn AuthProvider>> {
    let provider = GoTrueAuthProvider::new(&config.supabase_url, &config.supabase_anon_key)?;
    tracing::info!("Auth provider configured for {}", config.supabase_url);
    Ok(Arc::new(provider))
}

/// Store handles for a chat window; every message stored through `db`
/// reaches `feed`.
pub fn chat_window_deps(db: &Database, feed: Arc<dyn ChangeFeed>) -> ChatWindowDeps {
    let db = db.clone().with_change_feed(feed.clone());
    ChatWindowDeps {
        contacts: Arc::new(db.clone()) as Arc<dyn ContactRepository>,
        messages: Arc::new(db.clone()) as Arc<dyn MessageRepository>,
        templates: Arc::new(db) as Arc<dyn TemplateRepository>,
        feed,
    }
}

pub fn build_app_state(
    db: Database,
    feed: Arc<dyn ChangeFeed>,
    auth: Arc<dyn AuthProvider>,
    config: &Config,
) -> AppState {
    let db = db.with_change_feed(feed.clone());

    let contact_repo = Arc::new(db.clone()) as Arc<dyn ContactRepository>;
    let message_repo = Arc::new(db.clone()) as Arc<dyn MessageRepository>;
    let channel_repo = Arc::new(db.clone()) as Arc<dyn ChannelRepository>;
    let template_repo = Arc::new(db) as Arc<dyn TemplateRepository>;

    let contact_service = ContactService::new(
        contact_repo.clone(),
        message_repo.clone(),
        channel_repo.clone(),
    );
    let message_service = MessageService::new(message_repo.clone());
    let session_service = SessionService::new(auth);

    let webhook_service = WhatsAppWebhookService::new(
        contact_repo,
        message_repo,
        channel_repo,
        config.webhook_verify_token.clone(),
        config.whatsapp_app_secret.clone(),
    );
    if config.whatsapp_app_secret.is_some() {
        tracing::info!("WhatsApp webhook signature verification enabled");
    }

    AppState {
        contact_service,
        message_service,
        session_service,
        webhook_service,
        template_repo,
        change_feed: feed,
    }
}

/// Production wiring: store, in-process change feed and the hosted auth API
pub async fn build_default_app_state(config: &Config) -> anyhow::Result<AppState> {
    let db = initialize_database(config).await?;
    let feed: Arc<dyn ChangeFeed> = Arc::new(LocalChangeFeed::new());
    let auth = build_auth_provider(config)?;

    Ok(build_app_state(db, feed, auth, config))
}
