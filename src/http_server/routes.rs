use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::http_server::error::ApiError;
use crate::http_server::extract::{ApiJson, ApiQuery};
use crate::http_server::state::AppState;
use crate::ports::artist::Artist;
use crate::ports::playlist::Playlist;

const DEFAULT_SEARCH_LIMIT: usize = 5;
const MAX_SEARCH_LIMIT: usize = 50;

pub async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    name: Option<String>,
    limit: Option<usize>,
}

impl SearchParams {
    fn validate(self) -> Result<(String, usize), ApiError> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("name query parameter is required".into()))?;
        let limit = self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }
        Ok((name, limit))
    }
}

pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<Artist>>, ApiError> {
    let (name, limit) = params.validate()?;

    let artists = state
        .artist_repository
        .search_artist(&ctx, &name, limit)
        .await?;
    Ok(Json(artists))
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    name: String,
    description: String,
    is_public: bool,
}

impl From<Playlist> for PlaylistResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            name: playlist.name,
            description: playlist.description,
            is_public: playlist.is_public,
        }
    }
}

pub async fn search_playlists(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<PlaylistResponse>>, ApiError> {
    let (name, limit) = params.validate()?;

    let playlists = state
        .playlist_repository
        .search_playlist(&ctx, &name, limit)
        .await?;
    Ok(Json(playlists.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    user_id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_public: bool,
}

pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    ApiJson(request): ApiJson<CreatePlaylistRequest>,
) -> Result<StatusCode, ApiError> {
    let playlist = Playlist {
        name: request.name,
        description: request.description,
        is_public: request.is_public,
    };
    state
        .playlist_service
        .create_playlist(&ctx, &request.user_id, playlist)
        .await?;
    Ok(StatusCode::CREATED)
}

#[derive(Debug, Deserialize)]
pub struct AddSetlistRequest {
    artist: String,
}

pub async fn add_setlist(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(playlist_id): Path<String>,
    ApiJson(request): ApiJson<AddSetlistRequest>,
) -> Result<StatusCode, ApiError> {
    if request.artist.trim().is_empty() {
        return Err(ApiError::BadRequest("artist must not be empty".into()));
    }
    state
        .playlist_service
        .add_setlist(&ctx, &playlist_id, &request.artist)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
