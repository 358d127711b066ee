use serde::Deserialize;

use crate::ports::setlist::{Setlist, SetlistSong};

/// One page of `GET /rest/1.0/search/setlists`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetlistPage {
    #[serde(default)]
    pub setlist: Vec<SetlistFmSetlist>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetlistFmSetlist {
    pub artist: SetlistFmArtist,
    pub event_date: Option<String>,
    #[serde(default)]
    pub sets: SetlistFmSets,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetlistFmArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetlistFmSets {
    #[serde(default)]
    pub set: Vec<SetlistFmSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetlistFmSet {
    #[serde(default)]
    pub song: Vec<SetlistFmSong>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetlistFmSong {
    #[serde(default)]
    pub name: String,
    /// Recordings played between songs.
    #[serde(default)]
    pub tape: bool,
}

impl SetlistFmSetlist {
    /// Songs across every set (main set, encores), in order.
    pub fn songs(&self) -> Vec<SetlistSong> {
        self.sets
            .set
            .iter()
            .flat_map(|set| set.song.iter())
            .filter(|song| !song.tape && !song.name.trim().is_empty())
            .map(|song| SetlistSong::new(song.name.trim()))
            .collect()
    }

    pub fn into_setlist(self) -> Setlist {
        let songs = self.songs();
        Setlist::new(self.artist.name, songs)
    }
}
