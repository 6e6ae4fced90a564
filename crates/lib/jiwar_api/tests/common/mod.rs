//! Shared test doubles: in-memory account provider and bot transport.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use jiwar_api::{AppState, config::ApiConfig};
use jiwar_core::models::bridge::{LoginGrant, ProviderSession};
use jiwar_core::models::telegram::{BotCommand, InlineKeyboardMarkup};
use jiwar_core::provider::{AccountProvider, ProviderError};
use jiwar_core::telegram::{BotTransport, TelegramError};

/// In-memory account provider. Accounts and sessions live in mutexed maps;
/// grants are single-use like the real provider's.
#[derive(Default)]
pub struct MockProvider {
    /// Account ids the provider knows; minting for anything else is a 404.
    pub known_accounts: Mutex<HashSet<String>>,
    /// Registered accounts: email → (password, user_id).
    pub credentials: Mutex<HashMap<String, (String, String)>>,
    /// Outstanding one-time grants (user_id → secret).
    pub grants: Mutex<HashMap<String, String>>,
    /// Live sessions by id.
    pub sessions: Mutex<HashMap<String, ProviderSession>>,
    /// Session ids destroyed through the trait.
    pub deleted_sessions: Mutex<Vec<String>>,
    /// Force the "session is active" rejection on the next exchanges.
    pub session_active: AtomicBool,
    counter: AtomicU32,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account id as existing at the provider.
    pub fn add_account(&self, user_id: &str) {
        self.known_accounts.lock().unwrap().insert(user_id.into());
    }

    /// Seed an outstanding one-time grant.
    pub fn add_grant(&self, user_id: &str, secret: &str) {
        self.grants
            .lock()
            .unwrap()
            .insert(user_id.into(), secret.into());
    }

    /// Insert a live session directly (for presented-cookie tests).
    pub fn add_session(&self, session_id: &str, user_id: &str) {
        self.sessions.lock().unwrap().insert(
            session_id.into(),
            ProviderSession {
                id: session_id.into(),
                user_id: user_id.into(),
            },
        );
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.counter.fetch_add(1, Ordering::SeqCst))
    }

    fn open_session(&self, user_id: &str) -> ProviderSession {
        let session = ProviderSession {
            id: self.next_id("sess"),
            user_id: user_id.into(),
        };
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        session
    }
}

#[async_trait]
impl AccountProvider for MockProvider {
    async fn create_login_token(&self, user_id: &str) -> Result<LoginGrant, ProviderError> {
        if !self.known_accounts.lock().unwrap().contains(user_id) {
            return Err(ProviderError::NotFound);
        }
        let secret = self.next_id("grant");
        self.grants
            .lock()
            .unwrap()
            .insert(user_id.into(), secret.clone());
        Ok(LoginGrant {
            user_id: user_id.into(),
            secret,
        })
    }

    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        _name: &str,
    ) -> Result<(), ProviderError> {
        let mut credentials = self.credentials.lock().unwrap();
        if credentials.contains_key(email) {
            return Err(ProviderError::Conflict);
        }
        credentials.insert(email.into(), (password.into(), user_id.into()));
        self.known_accounts.lock().unwrap().insert(user_id.into());
        Ok(())
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, ProviderError> {
        let user_id = match self.credentials.lock().unwrap().get(email) {
            Some((stored, user_id)) if stored == password => user_id.clone(),
            _ => return Err(ProviderError::Unauthorized),
        };
        Ok(self.open_session(&user_id))
    }

    async fn create_session(
        &self,
        user_id: &str,
        secret: &str,
    ) -> Result<ProviderSession, ProviderError> {
        if self.session_active.load(Ordering::SeqCst) {
            return Err(ProviderError::SessionActive);
        }
        // Grants are single-use: a successful exchange consumes them.
        let mut grants = self.grants.lock().unwrap();
        match grants.get(user_id) {
            Some(stored) if stored == secret => {
                grants.remove(user_id);
            }
            _ => return Err(ProviderError::Unauthorized),
        }
        drop(grants);
        Ok(self.open_session(user_id))
    }

    async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ProviderSession>, ProviderError> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), ProviderError> {
        self.sessions.lock().unwrap().remove(session_id);
        self.deleted_sessions
            .lock()
            .unwrap()
            .push(session_id.into());
        Ok(())
    }
}

/// A message captured by the mock transport.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub markup: Option<InlineKeyboardMarkup>,
}

impl SentMessage {
    /// URL of the first (link) button, if any.
    pub fn link_url(&self) -> Option<String> {
        let markup = self.markup.as_ref()?;
        let button = markup.inline_keyboard.first()?.first()?;
        button
            .web_app
            .as_ref()
            .map(|w| w.url.clone())
            .or_else(|| button.url.clone())
    }
}

/// Recording bot transport.
#[derive(Default)]
pub struct MockBot {
    pub sent: Mutex<Vec<SentMessage>>,
    pub markdown: Mutex<Vec<(i64, String)>>,
    pub answered_callbacks: Mutex<Vec<String>>,
    pub deleted_messages: Mutex<Vec<(i64, i64)>>,
}

impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sent(&self) -> Option<SentMessage> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl BotTransport for MockBot {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.into(),
            markup: reply_markup,
        });
        Ok(())
    }

    async fn send_markdown(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.markdown.lock().unwrap().push((chat_id, text.into()));
        Ok(())
    }

    async fn answer_callback_query(
        &self,
        callback_id: &str,
        _text: &str,
    ) -> Result<(), TelegramError> {
        self.answered_callbacks
            .lock()
            .unwrap()
            .push(callback_id.into());
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        self.deleted_messages
            .lock()
            .unwrap()
            .push((chat_id, message_id));
        Ok(())
    }

    async fn set_my_commands(&self, _commands: &[BotCommand]) -> Result<(), TelegramError> {
        Ok(())
    }
}

/// Config pointing at nothing in particular; tests never bind or dial out.
pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: "postgres://127.0.0.1:9/unreachable".into(),
        web_app_url: "https://app.jiwar.test".into(),
        bot_token: "test-bot-token".into(),
        admin_chat_ids: vec![],
        provider_endpoint: "http://127.0.0.1:9/v1".into(),
        provider_project_id: "test".into(),
        provider_api_key: "test".into(),
    }
}

/// State over a lazy pool — usable by flows that never touch the database.
/// The short acquire timeout keeps DB-reaching paths failing fast.
pub fn lazy_state(
    provider: std::sync::Arc<MockProvider>,
    bot: std::sync::Arc<MockBot>,
) -> AppState {
    let config = test_config();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(1))
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    AppState {
        pool,
        config,
        provider,
        bot,
    }
}

/// State over a real pool from `DATABASE_URL`, with migrations applied.
/// Only the `#[ignore]`d end-to-end tests use this.
pub async fn db_state(
    provider: std::sync::Arc<MockProvider>,
    bot: std::sync::Arc<MockBot>,
) -> AppState {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for e2e tests");
    let pool = sqlx::PgPool::connect(&url).await.expect("connect to DATABASE_URL");
    jiwar_api::migrate(&pool).await.expect("migrate");

    let mut config = test_config();
    config.database_url = url;
    AppState {
        pool,
        config,
        provider,
        bot,
    }
}
