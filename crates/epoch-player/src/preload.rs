//! Warming screenshots next to the current snapshot.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

pub trait Preloader: Send + Sync {
    /// Fetch `url` ahead of time. Failures are not reported.
    fn preload(&self, url: &str) -> impl Future<Output = ()> + Send;
}

/// Downloads each URL at most once per process.
///
/// Build it from [`crate::ApiClient::http_client`] so preloads honour the
/// configured timeout.
#[derive(Debug)]
pub struct HttpPreloader {
    http: reqwest::Client,
    seen: Mutex<HashSet<String>>,
}

impl HttpPreloader {
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            seen: Mutex::default(),
        }
    }

    /// Record `url`; `false` if it was already requested.
    fn claim(&self, url: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string())
    }
}

impl Preloader for HttpPreloader {
    async fn preload(&self, url: &str) {
        if !self.claim(url) {
            return;
        }
        let result = match self.http.get(url).send().await {
            Ok(resp) => resp.error_for_status().map(|_| ()),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => tracing::trace!(url, "preloaded"),
            Err(error) => tracing::debug!(url, %error, "preload failed"),
        }
    }
}

/// Does nothing. For headless playback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPreloader;

impl Preloader for NoopPreloader {
    async fn preload(&self, _url: &str) {}
}
