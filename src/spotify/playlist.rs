use reqwest::StatusCode;

use crate::context::RequestContext;
use crate::error::{FestwrapError, Result};
use crate::ports::playlist::{Playlist, PlaylistRepository};
use crate::ports::song::Song;
use crate::spotify::client::SpotifyApi;
use crate::spotify::types::{AddTracksBody, CreatePlaylistBody, PlaylistSearchResponse};

/// Spotify rejects requests adding more tracks than this.
const MAX_TRACKS_PER_REQUEST: usize = 100;

pub struct SpotifyPlaylistRepository {
    api: SpotifyApi,
}

impl SpotifyPlaylistRepository {
    pub fn new(api: SpotifyApi) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl PlaylistRepository for SpotifyPlaylistRepository {
    async fn create_playlist(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        playlist: Playlist,
    ) -> Result<()> {
        let path = format!("/v1/users/{}/playlists", urlencoding::encode(user_id));
        let body = CreatePlaylistBody {
            name: &playlist.name,
            description: &playlist.description,
            public: playlist.is_public,
        };
        let request = self.api.post(ctx, &path)?.json(&body);

        self.api.send(ctx, request, StatusCode::CREATED).await?;
        tracing::info!("Created playlist {} for user {}", playlist.name, user_id);
        Ok(())
    }

    async fn search_playlist(
        &self,
        ctx: &RequestContext,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Playlist>> {
        let limit = limit.to_string();
        let request = self.api.get(ctx, "/v1/search")?.query(&[
            ("q", name),
            ("type", "playlist"),
            ("limit", limit.as_str()),
        ]);

        let response: PlaylistSearchResponse = self.api.send_json(ctx, request).await?;

        Ok(response
            .playlists
            .items
            .into_iter()
            .flatten()
            .map(|playlist| Playlist {
                name: playlist.name,
                description: playlist.description.unwrap_or_default(),
                is_public: playlist.public.unwrap_or(false),
            })
            .collect())
    }

    async fn add_songs(
        &self,
        ctx: &RequestContext,
        playlist_id: &str,
        songs: Vec<Song>,
    ) -> Result<()> {
        if songs.is_empty() {
            return Err(FestwrapError::NoSongsToAdd);
        }

        let path = format!("/v1/playlists/{}/tracks", urlencoding::encode(playlist_id));
        for chunk in songs.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = AddTracksBody {
                uris: chunk.iter().map(|song| song.uri.as_str()).collect(),
            };
            let request = self.api.post(ctx, &path)?.json(&body);
            self.api.send(ctx, request, StatusCode::CREATED).await?;
        }

        tracing::info!("Added {} songs to playlist {}", songs.len(), playlist_id);
        Ok(())
    }
}
