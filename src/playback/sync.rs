use std::time::Duration;

use crate::playback::snapshot::{PlaybackItem, PlaybackSnapshot};

/// Device volume is re-read on its own schedule, separate from the poll.
pub const VOLUME_SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// A different track (or the first one) is now current.
    pub track_changed: bool,
    /// Nothing is playing on any device.
    pub is_empty: bool,
}

/// Holds the latest snapshot and the identity of the track it describes.
#[derive(Debug, Default)]
pub struct PlaybackSync {
    snapshot: Option<PlaybackSnapshot>,
    current_track_id: Option<String>,
}

impl PlaybackSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, snapshot: Option<PlaybackSnapshot>) -> SyncOutcome {
        let new_id = snapshot
            .as_ref()
            .and_then(|s| s.track_id())
            .map(str::to_string);

        let outcome = SyncOutcome {
            track_changed: new_id.is_some() && new_id != self.current_track_id,
            is_empty: new_id.is_none(),
        };

        self.current_track_id = new_id;
        self.snapshot = snapshot;
        outcome
    }

    pub fn snapshot(&self) -> Option<&PlaybackSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn current_item(&self) -> Option<&PlaybackItem> {
        self.snapshot.as_ref().and_then(|s| s.item.as_ref())
    }

    pub fn is_current(&self, track_id: &str) -> bool {
        self.current_track_id.as_deref() == Some(track_id)
    }

    pub fn is_playing(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.is_playing)
    }

    pub fn progress_ms(&self) -> u64 {
        self.snapshot.as_ref().map_or(0, |s| s.progress_ms)
    }

    pub fn progress_secs(&self) -> f64 {
        self.snapshot.as_ref().map_or(0.0, PlaybackSnapshot::progress_secs)
    }

    /// Volume reported by the active device, if it reports one.
    pub fn sample_volume(&self) -> Option<u8> {
        self.snapshot.as_ref().and_then(PlaybackSnapshot::volume_percent)
    }
}
