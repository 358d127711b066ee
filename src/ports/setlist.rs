use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetlistSong {
    pub title: String,
}

impl SetlistSong {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Songs an artist played at one event, in the order they were played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setlist {
    pub artist: String,
    pub songs: Vec<SetlistSong>,
}

impl Setlist {
    pub fn new(artist: impl Into<String>, songs: Vec<SetlistSong>) -> Self {
        Self {
            artist: artist.into(),
            songs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSetlistArgs {
    pub artist: String,
    /// Only setlists with at least this many songs qualify.
    pub min_songs: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SetlistRepository: Send + Sync {
    async fn get_setlist(&self, args: GetSetlistArgs) -> Result<Setlist>;
}

#[async_trait::async_trait]
impl<T: SetlistRepository + ?Sized> SetlistRepository for std::sync::Arc<T> {
    async fn get_setlist(&self, args: GetSetlistArgs) -> Result<Setlist> {
        (**self).get_setlist(args).await
    }
}
