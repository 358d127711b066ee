pub mod artist;
pub mod client;
pub mod playlist;
pub mod song;
pub mod types;

pub use artist::SpotifyArtistRepository;
pub use client::SpotifyApi;
pub use playlist::SpotifyPlaylistRepository;
pub use song::SpotifySongRepository;
