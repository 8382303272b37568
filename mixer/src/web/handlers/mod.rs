pub mod api;

pub use api::{AddSongForm, AppContext, add_song, get_songs, get_status};
