use async_trait::async_trait;
use std::future::Future;

/// A unit of work inside a batch operation.
///
/// Implementations close over whatever handles they need (client, paths,
/// owner/name) at construction time; `run` takes no arguments. Failures are
/// returned as values and caught once at the executor boundary.
#[async_trait]
pub trait Action: Send + Sync {
    async fn run(&self) -> anyhow::Result<()>;
}

/// Adapter turning an async closure into an [`Action`].
pub struct FnAction<F>(F);

#[async_trait]
impl<F, Fut> Action for FnAction<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn run(&self) -> anyhow::Result<()> {
        (self.0)().await
    }
}

/// Build an [`Action`] from an async closure.
pub fn action<F, Fut>(f: F) -> FnAction<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    FnAction(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fn_action_runs_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let act = action(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        act.run().await.unwrap();
        act.run().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fn_action_propagates_error() {
        let act = action(|| async { Err(anyhow::anyhow!("boom")) });
        let err = act.run().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
