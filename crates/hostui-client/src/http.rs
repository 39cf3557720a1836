use std::sync::{Arc, RwLock};
use std::time::Duration;

use hostui_protocol::HTTP_TIMEOUT_SECS;

use crate::error::{ClientError, Result};

/// Process-wide HTTP client owned by the host bootstrap.
///
/// Must be started before the first request and stopped on shutdown. Using
/// it outside that window returns [`ClientError::NotStarted`].
#[derive(Debug, Clone, Default)]
pub struct HttpClientHandle {
    inner: Arc<RwLock<Option<reqwest::Client>>>,
}

impl HttpClientHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Result<()> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(client);
        tracing::debug!(timeout_secs = HTTP_TIMEOUT_SECS, "HTTP client started");
        Ok(())
    }

    pub fn stop(&self) {
        if self
            .inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .is_some()
        {
            tracing::debug!("HTTP client stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// The running client. Clones share the same connection pool.
    pub fn get(&self) -> Result<reqwest::Client> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(ClientError::NotStarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_before_start_is_an_error() {
        let h = HttpClientHandle::new();
        assert!(matches!(h.get(), Err(ClientError::NotStarted)));
    }

    #[test]
    fn start_then_stop() {
        let h = HttpClientHandle::new();
        h.start().unwrap();
        assert!(h.is_running());
        assert!(h.get().is_ok());

        let shared = h.clone();
        shared.stop();
        assert!(!h.is_running(), "clones observe stop");
        assert!(matches!(h.get(), Err(ClientError::NotStarted)));
    }
}
