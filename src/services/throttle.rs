use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::context::RequestContext;
use crate::error::{FestwrapError, Result};
use crate::ports::song::{GetSongArgs, Song, SongRepository};

/// Caps how many lookups the wrapped repository serves at once.
pub struct ThrottledSongRepository<R> {
    inner: R,
    permits: Arc<Semaphore>,
}

impl<R: SongRepository> ThrottledSongRepository<R> {
    pub fn new(inner: R, max_concurrent: usize) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }
}

#[async_trait::async_trait]
impl<R: SongRepository> SongRepository for ThrottledSongRepository<R> {
    async fn get_song(&self, ctx: &RequestContext, args: GetSongArgs) -> Result<Song> {
        let _permit = tokio::select! {
            permit = self.permits.acquire() => permit.map_err(|_| FestwrapError::Cancelled)?,
            _ = ctx.cancellation().cancelled() => return Err(FestwrapError::Cancelled),
        };
        self.inner.get_song(ctx, args).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::future::join_all;

    use super::*;

    #[derive(Default)]
    struct CountingSongRepository {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl SongRepository for CountingSongRepository {
        async fn get_song(&self, _ctx: &RequestContext, args: GetSongArgs) -> Result<Song> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Song::new(args.title))
        }
    }

    fn args(title: &str) -> GetSongArgs {
        GetSongArgs {
            artist: "artist".into(),
            title: title.into(),
        }
    }

    #[tokio::test]
    async fn test_limits_concurrent_lookups() {
        let repository = ThrottledSongRepository::new(CountingSongRepository::default(), 2);
        let ctx = RequestContext::new("token");

        let lookups = (0..8).map(|i| repository.get_song(&ctx, args(&i.to_string())));
        let results = join_all(lookups).await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(repository.inner.max_in_flight.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancelled_context_does_not_wait_for_permit() {
        let repository = ThrottledSongRepository::new(CountingSongRepository::default(), 1);
        let _held = repository.permits.acquire().await.unwrap();
        let ctx = RequestContext::new("token");
        ctx.cancel();

        let result = repository.get_song(&ctx, args("song")).await;

        assert!(matches!(result, Err(FestwrapError::Cancelled)));
    }
}
