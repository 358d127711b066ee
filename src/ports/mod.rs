pub mod artist;
pub mod playlist;
pub mod setlist;
pub mod song;
