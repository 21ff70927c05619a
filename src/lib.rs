pub mod config;
pub mod event;
pub mod http;
pub mod lyrics;
pub mod playback;
pub mod playlist;
pub mod prefs;
pub mod ui;
pub mod util;

#[cfg(test)]
pub mod testing;
