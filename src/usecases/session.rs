//! Session lifecycle: login, registration, guest entry, logout and sign-out.
//!
//! [`SessionManager`] is the only writer of the [`Session`]. Every transition
//! is published through a `watch` channel so the view layer and the feed
//! controllers read credentials from one place instead of re-reading the
//! secret store.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::{
    domain::session::{Credentials, Session, SessionMode},
    usecases::contracts::{ApiError, ErrorCategory, SecretKey, SecretStore, SecretStoreError},
};

const SESSION_TRANSITION: &str = "SESSION_TRANSITION";
const SESSION_AUTH_FAILED: &str = "SESSION_AUTH_FAILED";
const SESSION_STORE_FAILED: &str = "SESSION_STORE_FAILED";

/// Remote authentication endpoints. Both return the issued token.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError>;
    async fn register(&self, username: &str, password: &str) -> Result<String, ApiError>;
}

/// User-facing failures of session operations. `Display` is the notice text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please enter a password!")]
    EmptyPassword,
    #[error("Passwords do not match!")]
    PasswordMismatch,
    #[error("Incorrect password or username! Try again.")]
    IncorrectCredentials,
    #[error("Username taken!")]
    UsernameTaken,
    #[error("An unexpected error occurred. Please try again.")]
    Unavailable,
    #[error("Stored credentials could not be accessed.")]
    Storage,
}

impl SessionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyPassword | Self::PasswordMismatch => ErrorCategory::Validation,
            Self::IncorrectCredentials | Self::UsernameTaken => ErrorCategory::Authentication,
            Self::Unavailable | Self::Storage => ErrorCategory::Transport,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthStep {
    Login,
    Register,
}

impl AuthStep {
    fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }
}

pub struct SessionManager {
    auth: Arc<dyn AuthApi>,
    secrets: Arc<dyn SecretStore>,
    session_tx: watch::Sender<Session>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthApi>, secrets: Arc<dyn SecretStore>) -> Self {
        let (session_tx, _) = watch::channel(Session::anonymous());
        Self {
            auth,
            secrets,
            session_tx,
        }
    }

    pub fn session(&self) -> Session {
        self.session_tx.borrow().clone()
    }

    pub fn mode(&self) -> SessionMode {
        self.session_tx.borrow().mode()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session_tx.subscribe()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<SessionMode, SessionError> {
        let token = self
            .auth
            .login(username, password)
            .await
            .map_err(|error| map_auth_error(error, AuthStep::Login))?;

        self.establish(username, token).await
    }

    /// Validates the passwords locally; nothing is sent when they are empty
    /// or differ.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        repeat_password: &str,
    ) -> Result<SessionMode, SessionError> {
        if password.is_empty() {
            return Err(SessionError::EmptyPassword);
        }

        if password != repeat_password {
            return Err(SessionError::PasswordMismatch);
        }

        let token = self
            .auth
            .register(username, password)
            .await
            .map_err(|error| map_auth_error(error, AuthStep::Register))?;

        self.establish(username, token).await
    }

    pub fn continue_as_guest(&self) -> SessionMode {
        match self.mode() {
            SessionMode::Anonymous | SessionMode::Registering => {
                self.transition(Session::guest());
            }
            current => {
                tracing::debug!(mode = current.as_label(), "guest entry ignored");
            }
        }
        self.mode()
    }

    /// Clears both stored secrets and only then drops to anonymous. If the
    /// store cannot be cleared the session stays authenticated.
    pub async fn logout(&self) -> Result<SessionMode, SessionError> {
        self.clear_secrets().await?;
        self.transition(Session::anonymous());
        Ok(self.mode())
    }

    /// Guest exit path into registration. Guests have nothing stored.
    pub fn sign_out(&self) -> SessionMode {
        if self.mode() == SessionMode::Guest {
            self.transition(Session::registering());
        } else {
            tracing::debug!(mode = self.mode().as_label(), "sign-out ignored");
        }
        self.mode()
    }

    /// Leaves the register view opened by a guest sign-out.
    pub fn cancel_registration(&self) -> SessionMode {
        if self.mode() == SessionMode::Registering {
            self.transition(Session::anonymous());
        }
        self.mode()
    }

    /// Restores an authenticated session from stored secrets without a
    /// network call. Leaves the session untouched unless both are present.
    pub async fn resume(&self) -> Result<SessionMode, SessionError> {
        let token = self.read_secret(SecretKey::Token).await?;
        let username = self.read_secret(SecretKey::Username).await?;

        if let (Some(token), Some(username)) = (token, username) {
            self.transition(Session::authenticated(Credentials { token, username }));
        }

        Ok(self.mode())
    }

    /// Removes stored secrets without touching the in-memory session.
    pub async fn clear_secrets(&self) -> Result<(), SessionError> {
        for key in SecretKey::ALL {
            self.secrets
                .delete(key)
                .await
                .map_err(|error| storage_failure(&error, "delete"))?;
        }
        Ok(())
    }

    async fn establish(&self, username: &str, token: String) -> Result<SessionMode, SessionError> {
        self.secrets
            .set(SecretKey::Token, &token)
            .await
            .map_err(|error| storage_failure(&error, "set"))?;

        if let Err(error) = self.secrets.set(SecretKey::Username, username).await {
            let _ = self.secrets.delete(SecretKey::Token).await;
            return Err(storage_failure(&error, "set"));
        }

        self.transition(Session::authenticated(Credentials {
            token,
            username: username.to_owned(),
        }));
        Ok(self.mode())
    }

    async fn read_secret(&self, key: SecretKey) -> Result<Option<String>, SessionError> {
        self.secrets
            .get(key)
            .await
            .map_err(|error| storage_failure(&error, "get"))
    }

    fn transition(&self, next: Session) {
        let to = next.mode();
        let previous = self.session_tx.send_replace(next);
        tracing::info!(
            code = SESSION_TRANSITION,
            from = previous.mode().as_label(),
            to = to.as_label(),
            "session transition"
        );
    }
}

fn map_auth_error(error: ApiError, step: AuthStep) -> SessionError {
    let mapped = match (step, &error) {
        (AuthStep::Login, ApiError::Unauthorized) => SessionError::IncorrectCredentials,
        (AuthStep::Register, ApiError::Conflict) => SessionError::UsernameTaken,
        _ => SessionError::Unavailable,
    };

    if mapped == SessionError::Unavailable {
        tracing::warn!(
            code = SESSION_AUTH_FAILED,
            step = step.as_str(),
            error = %error,
            "authentication request failed"
        );
    }

    mapped
}

fn storage_failure(error: &SecretStoreError, op: &'static str) -> SessionError {
    tracing::error!(code = SESSION_STORE_FAILED, op, error = %error, "secret store failure");
    SessionError::Storage
}
