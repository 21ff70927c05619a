use std::sync::Arc;

use tracing::{debug, info};

use crate::http::{error::ApiError, traits::PlaybackApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub image_url: Option<String>,
    pub track_count: u32,
}

/// A duplicate add waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlaylistAdd {
    pub playlist_id: String,
    pub playlist_name: String,
    pub track_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

#[derive(Clone)]
pub struct PlaylistPicker {
    api: Arc<dyn PlaybackApi>,
}

impl PlaylistPicker {
    pub fn new(api: Arc<dyn PlaybackApi>) -> Self {
        Self { api }
    }

    /// Playlists the current user owns, across every page.
    pub async fn owned_playlists(&self) -> Result<Vec<PlaylistSummary>, ApiError> {
        let user = self.api.current_user().await?;

        let mut playlists = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let page = self.api.user_playlists(next.as_deref()).await?;
            playlists.extend(page.items.into_iter().filter(|p| p.owner_id == user.id));
            next = page.next;
            if next.is_none() {
                break;
            }
        }

        debug!("{} playlists owned by {}", playlists.len(), user.id);
        Ok(playlists)
    }

    /// Pages through the whole playlist looking for `track_id`.
    pub async fn contains_track(&self, playlist_id: &str, track_id: &str) -> Result<bool, ApiError> {
        let mut next: Option<String> = None;
        loop {
            let page = self
                .api
                .playlist_track_ids(playlist_id, next.as_deref())
                .await?;
            if page.items.iter().any(|id| id == track_id) {
                return Ok(true);
            }
            next = page.next;
            if next.is_none() {
                return Ok(false);
            }
        }
    }

    /// Adds the track unless the playlist already has it.
    pub async fn add_track(&self, playlist_id: &str, track_id: &str) -> Result<AddOutcome, ApiError> {
        if self.contains_track(playlist_id, track_id).await? {
            info!("Track {track_id} already in playlist {playlist_id}");
            return Ok(AddOutcome::Duplicate);
        }

        self.add_unchecked(playlist_id, track_id).await?;
        Ok(AddOutcome::Added)
    }

    pub async fn add_anyway(&self, pending: &PendingPlaylistAdd) -> Result<(), ApiError> {
        self.add_unchecked(&pending.playlist_id, &pending.track_id)
            .await
    }

    async fn add_unchecked(&self, playlist_id: &str, track_id: &str) -> Result<(), ApiError> {
        self.api
            .add_to_playlist(playlist_id, &[track_uri(track_id)])
            .await?;
        info!("Added {track_id} to playlist {playlist_id}");
        Ok(())
    }
}
