//! Caching decorator for non-blocking providers

use crate::algorithm::Verifiers;
use crate::discovery::{AsyncVerifierProvider, VerifierFuture};
use crate::limits::MAX_CACHE_KEY_LENGTH;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Cache key for candidate verifiers: (issuer, kid)
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct LookupKey {
    issuer: Option<String>,
    key_id: Option<String>,
}

impl LookupKey {
    /// `None` when the issuer is too long to be worth caching
    fn new(issuer: Option<&str>, key_id: Option<&str>) -> Option<Self> {
        if issuer.is_some_and(|issuer| issuer.len() > MAX_CACHE_KEY_LENGTH) {
            return None;
        }
        Some(Self {
            issuer: issuer.map(ToString::to_string),
            key_id: key_id.map(ToString::to_string),
        })
    }
}

/// Remembers successful lookups of an inner provider
///
/// Only non-empty results are cached, so a key that appears after a miss is
/// picked up on the next call. Clones share the cache.
#[derive(Clone)]
pub struct CachingVerifierProvider {
    inner: Arc<dyn AsyncVerifierProvider>,
    cache: Cache<LookupKey, Verifiers>,
}

impl CachingVerifierProvider {
    /// Cache up to `capacity` lookups, each for at most `ttl`
    pub fn new(inner: Arc<dyn AsyncVerifierProvider>, ttl: Duration, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }
}

impl std::fmt::Debug for CachingVerifierProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingVerifierProvider")
            .field("entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl AsyncVerifierProvider for CachingVerifierProvider {
    fn find_verifier<'a>(
        &'a self,
        issuer: Option<&'a str>,
        key_id: Option<&'a str>,
    ) -> VerifierFuture<'a> {
        Box::pin(async move {
            let key = LookupKey::new(issuer, key_id);

            if let Some(key) = &key
                && let Some(verifiers) = self.cache.get(key).await
            {
                tracing::debug!(?issuer, ?key_id, "Verifier cache hit");
                return Ok(Some(verifiers));
            }

            let found = self.inner.find_verifier(issuer, key_id).await?;

            if let (Some(key), Some(verifiers)) = (key, &found)
                && !verifiers.is_empty()
            {
                self.cache.insert(key, verifiers.clone()).await;
            }

            Ok(found)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::hmac::HmacSha256Verifier;
    use crate::error::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts lookups and serves a verifier only for `key2`
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl AsyncVerifierProvider for CountingProvider {
        fn find_verifier<'a>(
            &'a self,
            _issuer: Option<&'a str>,
            key_id: Option<&'a str>,
        ) -> VerifierFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let found: Result<Option<Verifiers>> = Ok((key_id == Some("key2"))
                .then(|| vec![Arc::new(HmacSha256Verifier::new(b"secret".to_vec())) as _]));
            Box::pin(std::future::ready(found))
        }
    }

    #[tokio::test]
    async fn test_caches_hits_only() {
        let inner = Arc::new(CountingProvider::default());
        let provider =
            CachingVerifierProvider::new(inner.clone(), Duration::from_secs(60), 100);

        for _ in 0..3 {
            let found = provider
                .find_verifier(Some("google.com"), Some("key2"))
                .await
                .unwrap();
            assert_eq!(found.map(|v| v.len()), Some(1));
        }
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        for _ in 0..2 {
            let found = provider
                .find_verifier(Some("google.com"), Some("key9"))
                .await
                .unwrap();
            assert!(found.is_none());
        }
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_oversized_issuer_bypasses_cache() {
        let inner = Arc::new(CountingProvider::default());
        let provider =
            CachingVerifierProvider::new(inner.clone(), Duration::from_secs(60), 100);
        let issuer = "i".repeat(MAX_CACHE_KEY_LENGTH + 1);

        for _ in 0..2 {
            provider
                .find_verifier(Some(&issuer), Some("key2"))
                .await
                .unwrap();
        }
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
