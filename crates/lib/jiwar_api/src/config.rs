//! API server configuration.

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3200").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Public origin of the web client; login/signup links point here.
    pub web_app_url: String,
    /// Telegram bot token.
    pub bot_token: String,
    /// Chat ids that receive new-signup notifications.
    pub admin_chat_ids: Vec<i64>,
    /// Identity backend endpoint.
    pub provider_endpoint: String,
    /// Identity backend project id.
    pub provider_project_id: String,
    /// Identity backend server API key.
    pub provider_api_key: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable              | Default                                  |
    /// |-----------------------|------------------------------------------|
    /// | `BIND_ADDR`           | `127.0.0.1:3200`                         |
    /// | `DATABASE_URL`        | `postgres://localhost:5432/jiwar`        |
    /// | `WEB_APP_URL`         | `http://localhost:5173`                  |
    /// | `TELEGRAM_BOT_TOKEN`  | empty (webhook sends will fail)          |
    /// | `ADMIN_TELEGRAM_IDS`  | empty (no signup notifications)          |
    /// | `IDENTITY_ENDPOINT`   | `http://localhost:8080/v1`               |
    /// | `IDENTITY_PROJECT_ID` | empty                                    |
    /// | `IDENTITY_API_KEY`    | empty                                    |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3200".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/jiwar".into()),
            web_app_url: std::env::var("WEB_APP_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            admin_chat_ids: parse_admin_ids(
                &std::env::var("ADMIN_TELEGRAM_IDS").unwrap_or_default(),
            ),
            provider_endpoint: std::env::var("IDENTITY_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:8080/v1".into()),
            provider_project_id: std::env::var("IDENTITY_PROJECT_ID").unwrap_or_default(),
            provider_api_key: std::env::var("IDENTITY_API_KEY").unwrap_or_default(),
        }
    }
}

/// Parse a comma-separated chat-id list, skipping blanks and junk.
fn parse_admin_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}
