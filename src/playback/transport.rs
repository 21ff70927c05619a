use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::info;

use crate::{
    http::{error::ApiError, traits::PlaybackApi},
    playback::snapshot::{Device, PlaybackSnapshot, RepeatState},
};

/// Past this point "previous" restarts the current track instead.
pub const SKIP_BACK_THRESHOLD_MS: u64 = 3000;
pub const VOLUME_INDICATOR_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("No devices available for playback")]
    NoDevicesAvailable,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// When a local change becomes visible relative to the remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Shown immediately, whatever the remote answers.
    Optimistic,
    /// Shown only once the remote call succeeded.
    ConfirmThenCommit,
}

/// A change to player state that is mirrored locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Volume(u8),
    Shuffle(bool),
    Repeat(RepeatState),
    Liked { track_id: String, liked: bool },
}

impl StateChange {
    pub fn volume(requested: i32) -> Self {
        StateChange::Volume(clamp_volume(requested))
    }

    pub fn policy(&self) -> CommitPolicy {
        match self {
            StateChange::Volume(_) => CommitPolicy::Optimistic,
            StateChange::Shuffle(_) | StateChange::Repeat(_) | StateChange::Liked { .. } => {
                CommitPolicy::ConfirmThenCommit
            }
        }
    }
}

pub fn clamp_volume(requested: i32) -> u8 {
    requested.clamp(0, 100) as u8
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportState {
    pub is_shuffled: bool,
    pub repeat: RepeatState,
    pub volume: Option<u8>,
    pub volume_visible: bool,
    /// `None` until the liked check for the current track answers.
    pub liked: Option<bool>,
}

impl TransportState {
    pub fn sync_from(&mut self, snapshot: &PlaybackSnapshot) {
        self.is_shuffled = snapshot.shuffle_state;
        self.repeat = snapshot.repeat_state;
    }

    /// Called before the remote call. Returns whether the change was applied.
    pub fn stage(&mut self, change: &StateChange) -> bool {
        if change.policy() != CommitPolicy::Optimistic {
            return false;
        }
        self.apply(change);
        true
    }

    /// Called after the remote call succeeded.
    pub fn confirm(&mut self, change: &StateChange) -> bool {
        if change.policy() != CommitPolicy::ConfirmThenCommit {
            return false;
        }
        self.apply(change);
        true
    }

    fn apply(&mut self, change: &StateChange) {
        match change {
            StateChange::Volume(volume) => {
                self.volume = Some(*volume);
                self.volume_visible = true;
            }
            StateChange::Shuffle(state) => self.is_shuffled = *state,
            StateChange::Repeat(state) => self.repeat = *state,
            StateChange::Liked { liked, .. } => self.liked = Some(*liked),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayPause {
    Paused,
    Resumed,
    Transferred { device_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipBack {
    Restarted,
    Previous,
}

/// Remote player commands. No call is retried.
#[derive(Clone)]
pub struct Transport {
    api: Arc<dyn PlaybackApi>,
}

impl Transport {
    pub fn new(api: Arc<dyn PlaybackApi>) -> Self {
        Self { api }
    }

    pub async fn play_pause(&self, was_playing: bool) -> Result<PlayPause, TransportError> {
        if self.api.current_playback().await?.is_none() {
            let device_id = self
                .resolve_device()
                .await?
                .and_then(|d| d.id)
                .ok_or(TransportError::NoDevicesAvailable)?;

            info!("No active playback, transferring to device {device_id}");
            self.api.transfer_playback(&device_id, true).await?;
            return Ok(PlayPause::Transferred { device_id });
        }

        if was_playing {
            self.api.pause().await?;
            Ok(PlayPause::Paused)
        } else {
            self.api.play().await?;
            Ok(PlayPause::Resumed)
        }
    }

    async fn resolve_device(&self) -> Result<Option<Device>, ApiError> {
        let devices: Vec<Device> = self
            .api
            .devices()
            .await?
            .into_iter()
            .filter(|d| d.id.is_some())
            .collect();

        let active = devices.iter().position(|d| d.is_active);
        Ok(devices.into_iter().nth(active.unwrap_or(0)))
    }

    pub async fn next(&self) -> Result<(), ApiError> {
        self.api.next().await
    }

    pub async fn previous(&self, progress_ms: u64) -> Result<SkipBack, ApiError> {
        if progress_ms > SKIP_BACK_THRESHOLD_MS {
            self.api.seek(0).await?;
            Ok(SkipBack::Restarted)
        } else {
            self.api.previous().await?;
            Ok(SkipBack::Previous)
        }
    }

    pub async fn seek(&self, position_ms: u64) -> Result<(), ApiError> {
        self.api.seek(position_ms).await
    }

    pub async fn send(&self, change: &StateChange) -> Result<(), ApiError> {
        match change {
            StateChange::Volume(volume) => self.api.set_volume(*volume).await,
            StateChange::Shuffle(state) => self.api.set_shuffle(*state).await,
            StateChange::Repeat(state) => self.api.set_repeat(*state).await,
            StateChange::Liked { track_id, liked } => {
                if *liked {
                    self.api.save_track(track_id).await
                } else {
                    self.api.remove_track(track_id).await
                }
            }
        }
    }

    pub async fn is_liked(&self, track_id: &str) -> Result<bool, ApiError> {
        self.api.is_saved(track_id).await
    }
}
