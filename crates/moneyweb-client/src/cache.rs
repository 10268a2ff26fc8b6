//! Read-through cache for one resource family

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ClientResult;

/// Holds the last fetched value until a mutation invalidates it
pub struct ResourceCache<T> {
    name: &'static str,
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> ResourceCache<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: RwLock::new(None),
        }
    }

    /// Cached value, or the result of `fetch` which is then cached.
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> ClientResult<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if let Some(value) = self.slot.read().await.as_ref() {
            return Ok(value.clone());
        }
        let mut slot = self.slot.write().await;
        if let Some(value) = slot.as_ref() {
            return Ok(value.clone());
        }
        log::debug!("Cache miss for {}", self.name);
        let value = Arc::new(fetch().await?);
        *slot = Some(value.clone());
        Ok(value)
    }

    pub async fn invalidate(&self) {
        if self.slot.write().await.take().is_some() {
            log::debug!("Invalidated {} cache", self.name);
        }
    }

    pub async fn is_cached(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fetches_once_until_invalidated() {
        let cache: ResourceCache<Vec<u32>> = ResourceCache::new("numbers");
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetch = || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1, 2])
        };

        assert_eq!(*cache.get_or_fetch(fetch).await.unwrap(), vec![1, 2]);
        assert_eq!(*cache.get_or_fetch(fetch).await.unwrap(), vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        assert!(!cache.is_cached().await);
        cache.get_or_fetch(fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ResourceCache<u32> = ResourceCache::new("flaky");
        let failed = cache
            .get_or_fetch(|| async { Err(ClientError::Timeout(1)) })
            .await;
        assert!(failed.is_err());
        assert!(!cache.is_cached().await);
        assert_eq!(*cache.get_or_fetch(|| async { Ok(5) }).await.unwrap(), 5);
    }
}
