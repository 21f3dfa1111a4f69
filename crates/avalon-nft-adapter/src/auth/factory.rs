/*
[INPUT]:  Login path (hosted social login or raw private key) and chain descriptor
[OUTPUT]: Connected signing providers and session teardown
[POS]:    Auth layer - orchestrates provider construction for both login paths
[UPDATE]: When login paths or connect/logout flow change
*/

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::auth::{EvmWalletSigner, LoginFlow, SessionManager, WalletSigner};
use crate::http::{AvalonError, ClientConfig, Result, RpcClient};
use crate::provider::SigningProvider;
use crate::types::{ChainConfig, LoginKind, UserInfo};

/// The two mutually exclusive ways of obtaining a provider
pub enum LoginPath {
    /// Hosted social login identified by a registered client id
    Delegated {
        client_id: String,
        flow: Arc<dyn LoginFlow>,
    },
    /// Caller-supplied private key, authorized out of band
    PrivateKey { private_key: String },
}

impl LoginPath {
    pub fn kind(&self) -> LoginKind {
        match self {
            LoginPath::Delegated { .. } => LoginKind::Delegated,
            LoginPath::PrivateKey { .. } => LoginKind::PrivateKey,
        }
    }
}

impl std::fmt::Debug for LoginPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginPath::Delegated { client_id, .. } => f
                .debug_struct("Delegated")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            LoginPath::PrivateKey { .. } => f
                .debug_struct("PrivateKey")
                .field("private_key", &"<redacted>")
                .finish(),
        }
    }
}

/// Builds [`SigningProvider`]s for one login path against one chain
#[derive(Debug)]
pub struct ProviderFactory {
    path: LoginPath,
    chain: ChainConfig,
    client_config: ClientConfig,
    sessions: SessionManager,
    initialized: OnceCell<()>,
}

impl ProviderFactory {
    /// Factory for the hosted social-login path; call [`init`](Self::init) before connecting
    pub fn delegated(client_id: impl Into<String>, chain: ChainConfig, flow: Arc<dyn LoginFlow>) -> Self {
        Self::new(
            LoginPath::Delegated {
                client_id: client_id.into(),
                flow,
            },
            chain,
        )
    }

    /// Factory for the private-key path
    pub fn private_key(chain: ChainConfig, private_key: impl Into<String>) -> Self {
        Self::new(
            LoginPath::PrivateKey {
                private_key: private_key.into(),
            },
            chain,
        )
    }

    pub fn new(path: LoginPath, chain: ChainConfig) -> Self {
        Self {
            path,
            chain,
            client_config: ClientConfig::default(),
            sessions: SessionManager::new(),
            initialized: OnceCell::new(),
        }
    }

    /// Override HTTP timeouts used by the providers' RPC client
    pub fn with_client_config(mut self, client_config: ClientConfig) -> Self {
        self.client_config = client_config;
        self
    }

    pub fn kind(&self) -> LoginKind {
        self.path.kind()
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn is_initialized(&self) -> bool {
        match self.path {
            LoginPath::Delegated { .. } => self.initialized.initialized(),
            LoginPath::PrivateKey { .. } => true,
        }
    }

    /// One-time async setup of the hosted login service. Repeated calls are no-ops.
    ///
    /// Concurrent callers wait for the first one; a failed setup may be retried.
    pub async fn init(&self) -> Result<()> {
        let LoginPath::Delegated { client_id, flow } = &self.path else {
            return Ok(());
        };

        self.initialized
            .get_or_try_init(|| async {
                flow.init(client_id, &self.chain).await?;
                info!(client_id = %client_id, chain_id = self.chain.chain_id, "login service initialized");
                Ok::<(), AvalonError>(())
            })
            .await?;
        Ok(())
    }

    /// Establish a session and return a provider bound to it
    ///
    /// Any previous session of this factory is replaced, which invalidates
    /// providers handed out before.
    pub async fn connect(&self) -> Result<SigningProvider> {
        match &self.path {
            LoginPath::Delegated { flow, .. } => {
                if !self.initialized.initialized() {
                    return Err(AvalonError::NotInitialized);
                }

                let grant = flow.login().await?;
                let wallet = EvmWalletSigner::new(&grant.private_key).map_err(|e| {
                    AvalonError::Authentication {
                        message: format!("login service returned an unusable key: {e}"),
                    }
                })?;
                self.open_session(wallet, Some(grant.user_info))
            }
            LoginPath::PrivateKey { private_key } => {
                let wallet = EvmWalletSigner::new(private_key)?;
                self.open_session(wallet, None)
            }
        }
    }

    /// Profile of the active delegated session
    pub async fn user_info(&self) -> Result<UserInfo> {
        let session = self.sessions.current().ok_or(AvalonError::ProviderInvalidated)?;
        session.user_info.ok_or_else(|| {
            AvalonError::Config("user info is only available for delegated logins".to_string())
        })
    }

    /// End the session; every provider from it fails afterwards
    ///
    /// A delegated factory that was never initialized has no session and
    /// fails with [`AvalonError::NotInitialized`] without touching anything.
    pub async fn logout(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(AvalonError::NotInitialized);
        }

        let ended = self.sessions.clear();
        if let Some(session) = &ended {
            info!(address = %session.address, session_id = %session.id, "session ended");
        }

        if let LoginPath::Delegated { flow, .. } = &self.path {
            if let Err(err) = flow.logout().await {
                warn!(error = %err, "login service logout failed; local session already cleared");
                return Err(err);
            }
        }
        Ok(())
    }

    fn open_session(&self, wallet: EvmWalletSigner, user_info: Option<UserInfo>) -> Result<SigningProvider> {
        let rpc = RpcClient::with_config(self.client_config.clone(), &self.chain.rpc_target)?;
        let session = self.sessions.start(wallet.address(), self.kind(), user_info);

        info!(
            address = %session.address,
            kind = ?session.kind,
            chain_id = self.chain.chain_id,
            "provider connected"
        );

        Ok(SigningProvider::new(
            rpc,
            Arc::new(wallet),
            self.chain.clone(),
            self.sessions.clone(),
            &session,
        ))
    }
}
