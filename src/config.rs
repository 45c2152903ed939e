use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Hosted backend project URL (auth API lives under `/auth/v1`)
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Shared secret echoed by the WhatsApp subscription handshake
    pub webhook_verify_token: String,
    /// Enables `X-Hub-Signature-256` checks on webhook deliveries
    pub whatsapp_app_secret: Option<String>,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://zyncro.db?mode=rwc".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "4321".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let supabase_url = required("PUBLIC_SUPABASE_URL")?;
        let supabase_anon_key = required("PUBLIC_SUPABASE_ANON_KEY")?;
        let webhook_verify_token = required("WEBHOOK_VERIFY_TOKEN")?;

        let whatsapp_app_secret = env::var("WHATSAPP_APP_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty());

        let otel_exporter_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

        let service_name = env::var("SERVICE_NAME").unwrap_or_else(|_| "zyncro".to_string());

        let metrics_port = env::var("METRICS_PORT")
            .unwrap_or_else(|_| "9000".to_string())
            .parse()
            .unwrap_or(9000);

        Ok(Config {
            database_url,
            server_host,
            server_port,
            supabase_url,
            supabase_anon_key,
            webhook_verify_token,
            whatsapp_app_secret,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("Invalid port number")]
    InvalidPort,
}
