use std::sync::Arc;

use futures::future::join_all;
use tracing::instrument;

use crate::context::RequestContext;
use crate::error::{FestwrapError, Result};
use crate::ports::playlist::{Playlist, PlaylistRepository};
use crate::ports::setlist::{GetSetlistArgs, SetlistRepository, SetlistSong};
use crate::ports::song::{GetSongArgs, Song, SongRepository};

/// Builds playlists from setlists, resolving every song of a setlist
/// concurrently.
pub struct ConcurrentPlaylistService<P, L, S> {
    playlist_repository: P,
    setlist_repository: L,
    song_repository: Arc<S>,
    min_songs: usize,
}

impl<P, L, S> ConcurrentPlaylistService<P, L, S>
where
    P: PlaylistRepository,
    L: SetlistRepository,
    S: SongRepository + 'static,
{
    pub fn new(playlist_repository: P, setlist_repository: L, song_repository: S) -> Self {
        Self {
            playlist_repository,
            setlist_repository,
            song_repository: Arc::new(song_repository),
            min_songs: 0,
        }
    }

    /// Minimum number of songs a setlist needs to be picked up by
    /// subsequent `add_setlist` calls.
    pub fn set_min_songs(&mut self, min_songs: usize) {
        self.min_songs = min_songs;
    }

    pub async fn create_playlist(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        playlist: Playlist,
    ) -> Result<()> {
        self.playlist_repository
            .create_playlist(ctx, user_id, playlist)
            .await
    }

    /// Adds the songs of the artist's latest qualifying setlist to the playlist.
    ///
    /// Songs that cannot be found are left out; the call only fails when the
    /// setlist is empty or none of its songs could be found.
    #[instrument(skip(self, ctx))]
    pub async fn add_setlist(
        &self,
        ctx: &RequestContext,
        playlist_id: &str,
        artist: &str,
    ) -> Result<()> {
        let setlist = self
            .setlist_repository
            .get_setlist(GetSetlistArgs {
                artist: artist.to_string(),
                min_songs: self.min_songs,
            })
            .await?;

        if setlist.songs.is_empty() {
            return Err(FestwrapError::NoSongsFound {
                artist: artist.to_string(),
            });
        }

        let attempted = setlist.songs.len();
        let songs = self.fetch_songs(ctx, artist, setlist.songs).await;

        tracing::info!(
            "Resolved {} of {} setlist songs for {}",
            songs.len(),
            attempted,
            artist
        );

        if songs.is_empty() {
            return Err(FestwrapError::NoSongsResolved {
                artist: artist.to_string(),
                attempted,
            });
        }

        self.playlist_repository
            .add_songs(ctx, playlist_id, songs)
            .await
    }

    /// Looks up every title at once and returns the hits in setlist order.
    async fn fetch_songs(
        &self,
        ctx: &RequestContext,
        artist: &str,
        titles: Vec<SetlistSong>,
    ) -> Vec<Song> {
        let tasks: Vec<_> = titles
            .into_iter()
            .map(|entry| {
                let repository = Arc::clone(&self.song_repository);
                let ctx = ctx.clone();
                let args = GetSongArgs {
                    artist: artist.to_string(),
                    title: entry.title,
                };
                tokio::spawn(async move {
                    let title = args.title.clone();
                    (title, repository.get_song(&ctx, args).await)
                })
            })
            .collect();

        // One slot per setlist entry, in setlist order, no matter which
        // lookup finished first.
        let slots = join_all(tasks).await;

        slots
            .into_iter()
            .filter_map(|slot| match slot {
                Ok((_, Ok(song))) => Some(song),
                Ok((title, Err(e))) => {
                    tracing::debug!("Skipping song {}: {}", title, e);
                    None
                }
                Err(e) => {
                    tracing::warn!("Song lookup task failed: {}", e);
                    None
                }
            })
            .collect()
    }
}
