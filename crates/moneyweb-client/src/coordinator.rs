//! Stale response suppression for list fetches
//!
//! Each fetch takes a generation ticket. When a newer fetch starts before an
//! older one completes, the older result is reported as superseded instead
//! of being rendered over the newer page.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ClientResult;

/// Generation number handed out per fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Result of a coordinated fetch
#[derive(Debug, PartialEq)]
pub enum Fetched<T> {
    Current(T),
    /// A newer fetch was issued while this one was in flight
    Superseded,
}

impl<T> Fetched<T> {
    pub fn into_current(self) -> Option<T> {
        match self {
            Fetched::Current(value) => Some(value),
            Fetched::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Fetched::Superseded)
    }
}

#[derive(Debug, Default)]
pub struct FetchCoordinator {
    generation: AtomicU64,
}

impl FetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, invalidating all earlier tickets
    pub fn issue(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Run `fetch` under a fresh ticket.
    ///
    /// Errors of a superseded fetch are dropped along with its result.
    pub async fn run<T, F>(&self, fetch: F) -> ClientResult<Fetched<T>>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let ticket = self.issue();
        let result = fetch.await;
        if !self.is_current(ticket) {
            log::debug!(
                "Dropping response of generation {} (current {})",
                ticket.0,
                self.generation.load(Ordering::SeqCst)
            );
            return Ok(Fetched::Superseded);
        }
        result.map(Fetched::Current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[test]
    fn test_tickets_are_monotonic() {
        let coordinator = FetchCoordinator::new();
        let first = coordinator.issue();
        let second = coordinator.issue();
        assert!(second > first);
        assert!(!coordinator.is_current(first));
        assert!(coordinator.is_current(second));
    }

    #[tokio::test]
    async fn test_single_fetch_is_current() {
        let coordinator = FetchCoordinator::new();
        let fetched = coordinator.run(async { Ok::<_, ClientError>(7) }).await.unwrap();
        assert_eq!(fetched, Fetched::Current(7));
    }

    #[tokio::test]
    async fn test_slow_older_fetch_is_superseded() {
        let coordinator = Arc::new(FetchCoordinator::new());
        let (release_old, wait_old) = oneshot::channel::<()>();

        let older = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .run(async move {
                        let _ = wait_old.await;
                        Ok::<_, ClientError>("page 1")
                    })
                    .await
            })
        };
        // let the older fetch take its ticket first
        while coordinator.generation.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let newer = coordinator
            .run(async { Ok::<_, ClientError>("page 2") })
            .await
            .unwrap();
        assert_eq!(newer, Fetched::Current("page 2"));

        let _ = release_old.send(());
        let older = older.await.unwrap().unwrap();
        assert!(older.is_superseded());
    }

    #[tokio::test]
    async fn test_error_of_superseded_fetch_is_dropped() {
        let coordinator = FetchCoordinator::new();
        let fetched: Fetched<u32> = coordinator
            .run(async {
                coordinator.issue();
                Err(ClientError::Timeout(30))
            })
            .await
            .unwrap();
        assert_eq!(fetched, Fetched::Superseded);
    }

    #[tokio::test]
    async fn test_error_of_current_fetch_propagates() {
        let coordinator = FetchCoordinator::new();
        let result = coordinator
            .run(async { Err::<u32, _>(ClientError::Network("down".to_string())) })
            .await;
        assert!(matches!(result, Err(ClientError::Network(_))));
    }
}
