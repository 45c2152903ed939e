#![allow(dead_code)]
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use zyncro::domain::entities::{AuthSession, AuthUser, Message, NewMessage, Template};
use zyncro::domain::errors::{DomainError, DomainResult};
use zyncro::domain::ports::auth_provider::{AuthError, AuthProvider, INVALID_CREDENTIALS};
use zyncro::domain::ports::message_repository::MessageRepository;
use zyncro::domain::ports::task_spawner::TaskSpawner;
use zyncro::domain::ports::template_repository::TemplateRepository;

pub const AGENT_ID: &str = "agent-1";
pub const AGENT_EMAIL: &str = "agent@example.com";
pub const AGENT_PASSWORD: &str = "correct-horse";
pub const VALID_ACCESS_TOKEN: &str = "access-valid";
pub const VALID_REFRESH_TOKEN: &str = "refresh-valid";
pub const REFRESHED_ACCESS_TOKEN: &str = "access-refreshed";

pub fn test_agent() -> AuthUser {
    AuthUser {
        id: AGENT_ID.to_string(),
        email: Some(AGENT_EMAIL.to_string()),
    }
}

/// In-memory auth backend with one agent account
pub struct FakeAuthProvider {
    access_tokens: Mutex<HashMap<String, AuthUser>>,
    refresh_tokens: Mutex<HashMap<String, AuthUser>>,
    signed_out: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeAuthProvider {
    pub fn new() -> Self {
        let mut access_tokens = HashMap::new();
        access_tokens.insert(VALID_ACCESS_TOKEN.to_string(), test_agent());
        let mut refresh_tokens = HashMap::new();
        refresh_tokens.insert(VALID_REFRESH_TOKEN.to_string(), test_agent());

        Self {
            access_tokens: Mutex::new(access_tokens),
            refresh_tokens: Mutex::new(refresh_tokens),
            signed_out: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of backend calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn signed_out_tokens(&self) -> Vec<String> {
        self.signed_out.lock().unwrap().clone()
    }

    fn issue(&self, access_token: &str) -> AuthSession {
        self.access_tokens
            .lock()
            .unwrap()
            .insert(access_token.to_string(), test_agent());
        AuthSession {
            access_token: access_token.to_string(),
            refresh_token: VALID_REFRESH_TOKEN.to_string(),
            expires_in: Some(3600),
            user: test_agent(),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if email == AGENT_EMAIL && password == AGENT_PASSWORD {
            Ok(self.issue(VALID_ACCESS_TOKEN))
        } else if email.is_empty() {
            Err(AuthError::Rejected("missing email or phone".to_string()))
        } else {
            Err(AuthError::Rejected(INVALID_CREDENTIALS.to_string()))
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.access_tokens.lock().unwrap().get(access_token).cloned())
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.refresh_tokens.lock().unwrap().contains_key(refresh_token) {
            Ok(self.issue(REFRESHED_ACCESS_TOKEN))
        } else {
            Err(AuthError::Rejected("Invalid Refresh Token".to_string()))
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.access_tokens.lock().unwrap().remove(access_token);
        self.signed_out
            .lock()
            .unwrap()
            .push(access_token.to_string());
        Ok(())
    }
}

/// Spawner that parks futures until the test releases them
#[derive(Default)]
pub struct HeldTaskSpawner {
    held: Mutex<Vec<BoxFuture<'static, ()>>>,
}

impl HeldTaskSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.held.lock().unwrap().len()
    }

    /// Run every parked future to completion, oldest first
    pub async fn release_all(&self) {
        let futures: Vec<_> = self.held.lock().unwrap().drain(..).collect();
        for future in futures {
            future.await;
        }
    }
}

impl TaskSpawner for HeldTaskSpawner {
    fn spawn(&self, future: BoxFuture<'static, ()>) {
        self.held.lock().unwrap().push(future);
    }
}

/// Message store that is down
pub struct FailingMessageRepository;

#[async_trait]
impl MessageRepository for FailingMessageRepository {
    async fn insert_message(&self, _message: &NewMessage) -> DomainResult<Message> {
        Err(DomainError::Store("connection refused".to_string()))
    }

    async fn insert_unread_message(&self, _message: &NewMessage) -> DomainResult<Message> {
        Err(DomainError::Store("connection refused".to_string()))
    }

    async fn list_messages(&self, _contact_id: &str) -> DomainResult<Vec<Message>> {
        Err(DomainError::Store("connection refused".to_string()))
    }
}

/// Message store whose writes never complete
pub struct StalledMessageRepository;

#[async_trait]
impl MessageRepository for StalledMessageRepository {
    async fn insert_message(&self, _message: &NewMessage) -> DomainResult<Message> {
        futures::future::pending().await
    }

    async fn insert_unread_message(&self, _message: &NewMessage) -> DomainResult<Message> {
        futures::future::pending().await
    }

    async fn list_messages(&self, _contact_id: &str) -> DomainResult<Vec<Message>> {
        Ok(Vec::new())
    }
}

pub struct FailingTemplateRepository;

#[async_trait]
impl TemplateRepository for FailingTemplateRepository {
    async fn list_templates(&self) -> DomainResult<Vec<Template>> {
        Err(DomainError::Store("permission denied for table templates".to_string()))
    }
}
