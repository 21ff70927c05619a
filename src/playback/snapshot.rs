use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatState {
    #[default]
    Off,
    Context,
    Track,
}

impl RepeatState {
    /// Next state in the off -> context -> track -> off cycle.
    pub fn next(self) -> Self {
        match self {
            RepeatState::Off => RepeatState::Context,
            RepeatState::Context => RepeatState::Track,
            RepeatState::Track => RepeatState::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepeatState::Off => "off",
            RepeatState::Context => "context",
            RepeatState::Track => "track",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Track,
    Episode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    pub is_active: bool,
    pub volume_percent: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackItem {
    pub id: String,
    pub kind: ItemKind,
    pub name: String,
    /// Artist names, or the show name for episodes.
    pub artists: Vec<String>,
    pub album_id: Option<String>,
    pub album_name: Option<String>,
    pub album_art_url: Option<String>,
    pub duration_ms: u64,
}

impl PlaybackItem {
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or_default()
    }
}

/// Point-in-time copy of the remote player. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackSnapshot {
    pub item: Option<PlaybackItem>,
    pub progress_ms: u64,
    pub is_playing: bool,
    pub device: Option<Device>,
    pub shuffle_state: bool,
    pub repeat_state: RepeatState,
}

impl PlaybackSnapshot {
    pub fn track_id(&self) -> Option<&str> {
        self.item.as_ref().map(|item| item.id.as_str())
    }

    pub fn track_name(&self) -> &str {
        match &self.item {
            Some(item) if !item.name.is_empty() => &item.name,
            _ => "Not Playing",
        }
    }

    pub fn progress_secs(&self) -> f64 {
        self.progress_ms as f64 / 1000.0
    }

    pub fn duration_ms(&self) -> u64 {
        self.item.as_ref().map_or(0, |item| item.duration_ms)
    }

    pub fn progress_ratio(&self) -> f64 {
        match self.duration_ms() {
            0 => 0.0,
            total => (self.progress_ms as f64 / total as f64).clamp(0.0, 1.0),
        }
    }

    pub fn volume_percent(&self) -> Option<u8> {
        self.device.as_ref().and_then(|d| d.volume_percent)
    }
}
