use tracing::debug;

use crate::{
    lyrics::{LyricsQuery, LyricsSync},
    playback::{
        PlaybackSnapshot, snapshot::ItemKind, sync::PlaybackSync, transport::TransportState,
    },
    playlist::{PendingPlaylistAdd, PlaylistSummary},
    prefs::PreferenceStore,
};

pub struct AppState {
    pub data: AppData,
    pub ui: UiState,
    pub prefs: PreferenceStore,
}

impl AppState {
    pub fn new(prefs: PreferenceStore) -> Self {
        Self {
            data: AppData::default(),
            ui: UiState::default(),
            prefs,
        }
    }
}

#[derive(Debug, Default)]
pub struct AppData {
    pub playback: PlaybackSync,
    pub lyrics: LyricsSync,
    pub transport: TransportState,
    pub playlists: Option<Vec<PlaylistSummary>>,
    pub pending_add: Option<PendingPlaylistAdd>,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub error_message: Option<String>,
    pub status_message: Option<String>,
}

/// Remote work a new snapshot asks for.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SnapshotEffects {
    pub liked_check: Option<String>,
    pub lyrics_query: Option<LyricsQuery>,
}

impl AppData {
    pub fn apply_snapshot(&mut self, snapshot: Option<PlaybackSnapshot>) -> SnapshotEffects {
        let outcome = self.playback.apply(snapshot);
        if let Some(snapshot) = self.playback.snapshot() {
            self.transport.sync_from(snapshot);
        }

        if outcome.is_empty {
            self.lyrics.clear();
            self.transport.liked = None;
            return SnapshotEffects::default();
        }

        let mut effects = SnapshotEffects::default();
        if outcome.track_changed {
            self.transport.liked = None;
            if let Some(item) = self.playback.current_item() {
                debug!("Track changed to {}", item.id);
                if item.kind == ItemKind::Track {
                    effects.liked_check = Some(item.id.clone());
                }
                effects.lyrics_query = self.lyrics.on_track_change(item);
            }
        }
        effects
    }

    /// Stores a liked-status answer unless the track has changed since.
    pub fn apply_liked(&mut self, track_id: &str, liked: bool) -> bool {
        if !self.playback.is_current(track_id) {
            debug!("Discarding liked status for stale track {track_id}");
            return false;
        }
        self.transport.liked = Some(liked);
        true
    }

    pub fn current_track_id(&self) -> Option<String> {
        self.playback.current_item().map(|item| item.id.clone())
    }
}
