/*
[INPUT]:  Registered client id, chain descriptor and the user's interactive login
[OUTPUT]: Session key material and user profile from the hosted service
[POS]:    Auth layer - hosted social-login abstraction
[UPDATE]: When integrating a different login service or changing the grant
*/

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::http::{AvalonError, Result};
use crate::types::{ChainConfig, UserInfo};

/// What the hosted login service hands back after a successful login
#[derive(Clone)]
pub struct LoginGrant {
    /// Hex-encoded secp256k1 key reconstructed by the service for this user
    pub private_key: String,
    pub user_info: UserInfo,
}

impl std::fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginGrant")
            .field("private_key", &"<redacted>")
            .field("user_info", &self.user_info)
            .finish()
    }
}

/// Hosted social-login service driving the interactive flow
///
/// Implementations wrap whatever SDK performs the OAuth dance; this crate only
/// relies on the three calls below.
#[async_trait]
pub trait LoginFlow: Send + Sync {
    /// One-time async setup (SDK/modal initialisation)
    async fn init(&self, client_id: &str, chain: &ChainConfig) -> Result<()>;

    /// Run the interactive login.
    ///
    /// Cancellation or an unreachable service must be reported as
    /// [`AvalonError::Authentication`].
    async fn login(&self) -> Result<LoginGrant>;

    /// Tear down the hosted session
    async fn logout(&self) -> Result<()>;
}

/// Mock login flow for testing
#[derive(Debug)]
pub struct MockLoginFlow {
    grant: Option<LoginGrant>,
    init_delay: Option<Duration>,
    init_calls: AtomicUsize,
    login_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    init_client_id: Mutex<Option<String>>,
}

impl MockLoginFlow {
    /// Flow whose login always succeeds with `grant`
    pub fn new(grant: LoginGrant) -> Self {
        Self::with_outcome(Some(grant))
    }

    /// Flow whose login is always cancelled by the user
    pub fn cancelled() -> Self {
        Self::with_outcome(None)
    }

    fn with_outcome(grant: Option<LoginGrant>) -> Self {
        Self {
            grant,
            init_delay: None,
            init_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            init_client_id: Mutex::new(None),
        }
    }

    /// Make every `init` take `delay` before completing
    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = Some(delay);
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    /// Client id passed to the last `init`
    pub fn init_client_id(&self) -> Option<String> {
        self.init_client_id
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LoginFlow for MockLoginFlow {
    async fn init(&self, client_id: &str, _chain: &ChainConfig) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.init_delay {
            tokio::time::sleep(delay).await;
        }
        *self
            .init_client_id
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(client_id.to_string());
        Ok(())
    }

    async fn login(&self) -> Result<LoginGrant> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.grant.clone().ok_or_else(|| AvalonError::Authentication {
            message: "user closed the login modal".to_string(),
        })
    }

    async fn logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
