//! Session lifecycle: login, signup, logout, and startup reconciliation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use taskmaster_core::{validate_credentials, validate_signup, SignupForm};

use crate::{
    api::{LoginForm, RegisteredUser, SignupRequest, TokenResponse},
    client::{ensure_success, read_json},
    config::ClientConfig,
    error::{ClientError, ClientResult},
    storage::{FileSessionStore, SessionStore, StoredSession},
};

/// The signed-in user. `email` and `username` are display-only and may be
/// stale relative to the server.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub username: String,
}

impl Session {
    fn from_stored(stored: &StoredSession) -> Option<Self> {
        stored.token().map(|token| Self {
            token: token.to_string(),
            email: stored.user_email.clone().unwrap_or_default(),
            username: stored.username.clone().unwrap_or_default(),
        })
    }

    fn to_stored(&self) -> StoredSession {
        StoredSession {
            token: Some(self.token.clone()),
            user_email: Some(self.email.clone()),
            username: Some(self.username.clone()),
        }
    }

    /// Username when set, else the email
    pub fn display_name(&self) -> &str {
        if self.username.trim().is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[redacted]")
            .field("email", &self.email)
            .field("username", &self.username)
            .finish()
    }
}

/// Authentication state broadcast to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SignedOut,
    SignedIn { email: String, username: String },
    /// The server rejected the stored token
    Expired,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::SignedIn { .. })
    }

    fn signed_in(session: &Session) -> Self {
        AuthState::SignedIn {
            email: session.email.clone(),
            username: session.username.clone(),
        }
    }
}

/// Owns the current session and its persisted copy
pub struct SessionManager {
    http: reqwest::Client,
    api_url: String,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    state: watch::Sender<AuthState>,
}

impl SessionManager {
    /// Build a manager backed by the session file named in `config`
    pub async fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let store = Arc::new(FileSessionStore::new(config.session_path()));
        Self::restore(config, store).await
    }

    /// Build a manager and reconcile it with what `store` holds.
    ///
    /// A stored token is trusted as-is; it is only found to be invalid when
    /// the API later answers 401. A record without a token, or one that
    /// cannot be read, is cleared.
    pub async fn restore(config: &ClientConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let api_url = config.api_url()?;
        let http = build_http_client(config.request_timeout())?;

        let stored = match store.load().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Discarding unreadable session: {}", e);
                store.clear().await?;
                StoredSession::default()
            }
        };

        let session = Session::from_stored(&stored);
        if session.is_none() && stored != StoredSession::default() {
            debug!("Stored session has no token, clearing it");
            store.clear().await?;
        }

        let initial = match &session {
            Some(session) => {
                info!("Restored session for {}", session.email);
                AuthState::signed_in(session)
            }
            None => AuthState::SignedOut,
        };
        let (state, _) = watch::channel(initial);

        Ok(Self {
            http,
            api_url,
            store,
            session: RwLock::new(session),
            state,
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// API base URL without a trailing slash
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Exchange credentials for a token and persist the session.
    ///
    /// On failure the previous session, in memory and on disk, is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        validate_credentials(email, password)?;
        let email = email.trim();

        let token = match self.request_token(email, password).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Login failed for {}: {}", email, e);
                return Err(e);
            }
        };

        if token.access_token.trim().is_empty() {
            warn!("Login for {} returned an empty token", email);
            return Err(ClientError::InvalidResponse(
                "Token endpoint returned an empty access token".to_string(),
            ));
        }

        let session = Session {
            token: token.access_token,
            email: email.to_string(),
            username: token.username.unwrap_or_default(),
        };

        self.commit(&session).await?;

        info!("Signed in as {}", session.email);
        Ok(session)
    }

    /// Persist `session` and make it current. Storage and memory change
    /// under the same lock, so they cannot interleave with `expire`.
    async fn commit(&self, session: &Session) -> ClientResult<()> {
        let mut guard = self.session.write().await;
        self.store.save(&session.to_stored()).await?;
        *guard = Some(session.clone());
        self.state.send_replace(AuthState::signed_in(session));
        Ok(())
    }

    async fn request_token(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        let url = format!("{}/token", self.api_url);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .form(&LoginForm {
                username: email,
                password,
            })
            .send()
            .await?;

        read_json(ensure_success(response).await?).await
    }

    /// Register a new account. Does not sign in.
    ///
    /// Any 2xx response counts as success. The created account is returned
    /// when the body describes one.
    pub async fn signup(&self, form: &SignupForm) -> ClientResult<Option<RegisteredUser>> {
        validate_signup(form)?;

        let url = format!("{}/signup", self.api_url);
        debug!("POST {}", url);

        let request = SignupRequest {
            email: form.email.trim(),
            username: form.username.trim(),
            password: &form.password,
        };

        let result = async {
            let response = self.http.post(&url).json(&request).send().await?;
            ensure_success(response).await
        }
        .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Signup failed for {}: {}", request.email, e);
                return Err(e);
            }
        };

        info!("Registered account {}", request.email);
        match read_json::<RegisteredUser>(response).await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                debug!("Signup response carried no account: {}", e);
                Ok(None)
            }
        }
    }

    /// Forget the session. Safe to call when already signed out.
    pub async fn logout(&self) -> ClientResult<()> {
        let mut guard = self.session.write().await;
        self.store.clear().await?;
        let previous = guard.take();
        drop(guard);
        self.state.send_replace(AuthState::SignedOut);

        if let Some(session) = previous {
            info!("Signed out {}", session.email);
        }
        Ok(())
    }

    /// True iff durable storage holds a token
    pub async fn is_authenticated(&self) -> bool {
        match self.store.load().await {
            Ok(stored) => stored.has_token(),
            Err(e) => {
                warn!("Could not read session: {}", e);
                false
            }
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Bearer token for outgoing requests
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.token.clone())
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Watch authentication state changes
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Drop the session because the server no longer accepts it
    pub async fn invalidate(&self) -> ClientResult<()> {
        let mut guard = self.session.write().await;
        self.store.clear().await?;
        if let Some(session) = guard.take() {
            warn!("Session for {} is no longer valid", session.email);
            self.state.send_replace(AuthState::Expired);
        }
        Ok(())
    }

    /// Invalidate only if `token` is still the current one, so a 401 for an
    /// old token cannot sign out a newer login. Returns whether it did.
    pub(crate) async fn expire(&self, token: &str) -> ClientResult<bool> {
        let mut guard = self.session.write().await;
        let is_current = guard.as_ref().map(|s| s.token == token).unwrap_or(false);
        if !is_current {
            return Ok(false);
        }

        self.store.clear().await?;
        if let Some(session) = guard.take() {
            warn!("Session for {} expired", session.email);
        }
        self.state.send_replace(AuthState::Expired);
        Ok(true)
    }
}

fn build_http_client(timeout: Duration) -> ClientResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::config(format!("Failed to build HTTP client: {}", e)))
}
