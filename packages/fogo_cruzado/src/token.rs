//! Bearer-token cache.
//!
//! The lock is held across a refresh, so concurrent callers wait for the
//! in-flight login instead of starting their own.

use std::{future::Future, time::Duration};

use memorial_fogo_cruzado_models::AuthToken;
use tokio::{sync::Mutex, time::Instant};

use crate::FogoCruzadoError;

/// Tokens are treated as expired this long before the server says so.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Caches one bearer token and its expiry.
#[derive(Debug, Default)]
pub struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if it is still valid, otherwise awaits
    /// `refresh` and caches its result.
    ///
    /// # Errors
    ///
    /// Propagates the error from `refresh`. The cache is left empty.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<String, FogoCruzadoError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<AuthToken, FogoCruzadoError>> + Send,
    {
        let mut guard = self.inner.lock().await;

        if let Some(cached) = guard.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.token.clone());
            }
            log::debug!("Cached Fogo Cruzado token expired; refreshing");
        }

        *guard = None;
        let fresh = refresh().await?;
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(EXPIRY_MARGIN);

        *guard = Some(CachedToken {
            token: fresh.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(fresh.access_token)
    }

    /// Drops the cached token.
    pub async fn invalidate(&self) {
        *self.inner.lock().await = None;
    }
}
