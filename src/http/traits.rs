use async_trait::async_trait;

use crate::{
    http::{
        error::ApiError,
        model::{Page, UserProfile},
    },
    playback::snapshot::{Device, PlaybackSnapshot, RepeatState},
    playlist::PlaylistSummary,
};

/// Remote player and library operations of the streaming service.
#[async_trait]
pub trait PlaybackApi: Send + Sync {
    /// `Ok(None)` when the service reports no active playback context.
    async fn current_playback(&self) -> Result<Option<PlaybackSnapshot>, ApiError>;
    async fn devices(&self) -> Result<Vec<Device>, ApiError>;
    async fn transfer_playback(&self, device_id: &str, play: bool) -> Result<(), ApiError>;

    async fn play(&self) -> Result<(), ApiError>;
    async fn pause(&self) -> Result<(), ApiError>;
    async fn seek(&self, position_ms: u64) -> Result<(), ApiError>;
    async fn next(&self) -> Result<(), ApiError>;
    async fn previous(&self) -> Result<(), ApiError>;
    async fn set_volume(&self, volume_percent: u8) -> Result<(), ApiError>;
    async fn set_shuffle(&self, state: bool) -> Result<(), ApiError>;
    async fn set_repeat(&self, state: RepeatState) -> Result<(), ApiError>;

    async fn is_saved(&self, track_id: &str) -> Result<bool, ApiError>;
    async fn save_track(&self, track_id: &str) -> Result<(), ApiError>;
    async fn remove_track(&self, track_id: &str) -> Result<(), ApiError>;

    async fn current_user(&self) -> Result<UserProfile, ApiError>;
    /// `next` is the url from the previous page; `None` requests the first page.
    async fn user_playlists(&self, next: Option<&str>) -> Result<Page<PlaylistSummary>, ApiError>;
    async fn playlist_track_ids(
        &self,
        playlist_id: &str,
        next: Option<&str>,
    ) -> Result<Page<String>, ApiError>;
    async fn add_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError>;
}

/// Timestamped lyrics lookup by track and artist name.
#[async_trait]
pub trait LyricsApi: Send + Sync {
    async fn fetch_lyrics(&self, track_name: &str, artist_name: &str) -> Result<String, ApiError>;
}
