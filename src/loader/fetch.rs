//! Injected asynchronous fetch operations

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Zero-argument asynchronous operation producing a section payload.
///
/// Any `Fn() -> impl Future<Output = anyhow::Result<T>>` closure is a fetch
/// operation, so most callers never implement this by hand.
#[async_trait]
pub trait FetchOperation<T>: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<T>;
}

#[async_trait]
impl<T, F, Fut> FetchOperation<T> for F
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<T>> + Send,
{
    async fn fetch(&self) -> anyhow::Result<T> {
        (self)().await
    }
}

/// Shared handle to a fetch operation
pub type SharedFetch<T> = Arc<dyn FetchOperation<T>>;
