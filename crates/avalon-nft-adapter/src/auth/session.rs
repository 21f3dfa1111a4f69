/*
[INPUT]:  Connected wallet address, login path and optional user profile
[OUTPUT]: Session identity checks for provider handles
[POS]:    Auth layer - session lifecycle management
[UPDATE]: When changing session storage or invalidation rules
*/

use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::http::{AvalonError, Result};
use crate::types::{LoginKind, UserInfo};

/// Stored session data with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub id: Uuid,
    pub address: Address,
    pub kind: LoginKind,
    pub started_at: DateTime<Utc>,
    pub user_info: Option<UserInfo>,
}

/// Thread-safe holder of the one active session
///
/// Providers remember the id of the session they were created for, so a
/// provider from an older session stays invalid after a new login.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    data: Arc<RwLock<Option<SessionData>>>,
}

impl SessionManager {
    /// Create a new empty session manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session, replacing any previous one
    pub fn start(&self, address: Address, kind: LoginKind, user_info: Option<UserInfo>) -> SessionData {
        let session = SessionData {
            id: Uuid::new_v4(),
            address,
            kind,
            started_at: Utc::now(),
            user_info,
        };

        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(session.clone());
        session
    }

    /// Get the active session if any
    pub fn current(&self) -> Option<SessionData> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Check whether `id` is still the active session
    pub fn is_active(&self, id: Uuid) -> bool {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().is_some_and(|session| session.id == id)
    }

    pub fn ensure_active(&self, id: Uuid) -> Result<()> {
        if self.is_active(id) {
            Ok(())
        } else {
            Err(AvalonError::ProviderInvalidated)
        }
    }

    /// Clear the active session, returning it
    pub fn clear(&self) -> Option<SessionData> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.take()
    }
}
