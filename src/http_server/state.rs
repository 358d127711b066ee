use std::sync::Arc;

use crate::ports::artist::ArtistRepository;
use crate::ports::playlist::PlaylistRepository;
use crate::ports::setlist::SetlistRepository;
use crate::ports::song::SongRepository;
use crate::services::playlist::ConcurrentPlaylistService;

pub type SharedPlaylistService = ConcurrentPlaylistService<
    Arc<dyn PlaylistRepository>,
    Arc<dyn SetlistRepository>,
    Arc<dyn SongRepository>,
>;

pub struct AppState {
    pub playlist_service: SharedPlaylistService,
    pub playlist_repository: Arc<dyn PlaylistRepository>,
    pub artist_repository: Arc<dyn ArtistRepository>,
}
