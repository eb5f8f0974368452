//! Playlist sources
//!
//! Sources are fetched one after another in configured order. A failing
//! source is logged and left out; the run only fails when nothing at all
//! could be fetched.

pub mod m3u;
pub mod traits;

pub use m3u::{fetch_all, FetchedSource, HttpPlaylistFetcher};
pub use traits::PlaylistFetcher;
