use reqwest::StatusCode;

/// Errors surfaced by the repositories and the playlist service.
#[derive(Debug, thiserror::Error)]
pub enum FestwrapError {
    #[error("No songs found in setlist for artist {artist}")]
    NoSongsFound { artist: String },

    #[error("None of the {attempted} songs in the setlist for {artist} could be found")]
    NoSongsResolved { artist: String, attempted: usize },

    #[error("Cannot add an empty list of songs to a playlist")]
    NoSongsToAdd,

    #[error("Song {title} by {artist} not found")]
    SongNotFound { artist: String, title: String },

    #[error("No setlist found for artist {artist}")]
    SetlistNotFound { artist: String },

    #[error("Unexpected status code: expected {expected}, got {actual}: {body}")]
    UnexpectedStatus {
        expected: StatusCode,
        actual: StatusCode,
        body: String,
    },

    #[error("Failed to send http request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, FestwrapError>;
