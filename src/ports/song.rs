use crate::context::RequestContext;
use crate::error::Result;

/// A setlist title resolved to a playable item on the streaming service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Song {
    pub uri: String,
}

impl Song {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// Lookup key for a single song.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GetSongArgs {
    pub artist: String,
    pub title: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SongRepository: Send + Sync {
    async fn get_song(&self, ctx: &RequestContext, args: GetSongArgs) -> Result<Song>;
}

#[async_trait::async_trait]
impl<T: SongRepository + ?Sized> SongRepository for std::sync::Arc<T> {
    async fn get_song(&self, ctx: &RequestContext, args: GetSongArgs) -> Result<Song> {
        (**self).get_song(ctx, args).await
    }
}
