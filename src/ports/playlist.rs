use crate::context::RequestContext;
use crate::error::Result;
use crate::ports::song::Song;

/// A playlist on the streaming service, as submitted for creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    pub description: String,
    pub is_public: bool,
}

/// Port trait wrapping the streaming service's playlist API.
///
/// Implementations live in `spotify::playlist` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn create_playlist(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        playlist: Playlist,
    ) -> Result<()>;

    async fn search_playlist(
        &self,
        ctx: &RequestContext,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Playlist>>;

    /// Appends `songs` to the playlist, keeping their order.
    async fn add_songs(
        &self,
        ctx: &RequestContext,
        playlist_id: &str,
        songs: Vec<Song>,
    ) -> Result<()>;
}

#[async_trait::async_trait]
impl<T: PlaylistRepository + ?Sized> PlaylistRepository for std::sync::Arc<T> {
    async fn create_playlist(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        playlist: Playlist,
    ) -> Result<()> {
        (**self).create_playlist(ctx, user_id, playlist).await
    }

    async fn search_playlist(
        &self,
        ctx: &RequestContext,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Playlist>> {
        (**self).search_playlist(ctx, name, limit).await
    }

    async fn add_songs(
        &self,
        ctx: &RequestContext,
        playlist_id: &str,
        songs: Vec<Song>,
    ) -> Result<()> {
        (**self).add_songs(ctx, playlist_id, songs).await
    }
}
