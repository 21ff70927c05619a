use crate::{
    playback::{PlaybackSnapshot, transport::StateChange},
    playlist::{PendingPlaylistAdd, PlaylistSummary},
    prefs::Preference,
};

#[derive(Debug, Clone)]
pub enum Event {
    // Events
    Initialize,
    RefreshPlayback,
    PlaybackFetched(Option<PlaybackSnapshot>),
    VolumeSample,
    LyricsTick,
    LyricsFetched {
        track_id: String,
        result: Result<String, String>,
    },
    LikedChecked {
        track_id: String,
        liked: bool,
    },
    Confirmed(StateChange),
    HideVolume,
    PlaylistsFetched(Vec<PlaylistSummary>),
    DuplicateDetected(PendingPlaylistAdd),
    TrackAdded {
        playlist_name: String,
    },
    EscapePressed,
    UserError(String),

    // Commands
    TogglePlayPause,
    Next,
    Previous,
    SeekBy(i64),
    VolumeBy(i32),
    ToggleShuffle,
    CycleRepeat,
    ToggleLike,
    ToggleLyrics,
    AddToPlaylist {
        playlist_id: String,
        playlist_name: String,
    },
    AddAnyway,
    CancelAdd,
    TogglePreference(Preference),
    SignOut,
}
