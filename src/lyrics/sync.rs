use std::collections::HashSet;

use tracing::{debug, info};

use crate::{
    lyrics::parser::{LyricLine, active_line, parse_lrc},
    playback::snapshot::PlaybackItem,
};

/// A lookup to run for the current track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    pub track_id: String,
    pub track_name: String,
    pub artist_name: String,
}

impl LyricsQuery {
    fn for_item(item: &PlaybackItem) -> Self {
        Self {
            track_id: item.id.clone(),
            track_name: item.name.clone(),
            artist_name: item.primary_artist().to_string(),
        }
    }
}

/// Per-session lyrics state: the panel, the lines of the current track and
/// the set of tracks whose lookup was already attempted.
#[derive(Debug, Default)]
pub struct LyricsSync {
    visible: bool,
    track_id: Option<String>,
    lines: Vec<LyricLine>,
    active: Option<usize>,
    loading: bool,
    unavailable: bool,
    attempted: HashSet<String>,
}

impl LyricsSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn was_attempted(&self, track_id: &str) -> bool {
        self.attempted.contains(track_id)
    }

    /// The highlight tick only runs while the panel shows lines.
    pub fn should_tick(&self) -> bool {
        self.visible && !self.lines.is_empty()
    }

    /// Drops everything derived from the previous track. Returns a lookup if
    /// the panel is open and the new track was never attempted.
    pub fn on_track_change(&mut self, item: &PlaybackItem) -> Option<LyricsQuery> {
        self.track_id = Some(item.id.clone());
        self.lines.clear();
        self.active = None;
        self.unavailable = false;
        self.loading = false;

        if self.visible {
            self.begin_fetch(item)
        } else {
            None
        }
    }

    /// Nothing is playing: close the panel and forget the lines.
    pub fn clear(&mut self) {
        self.visible = false;
        self.track_id = None;
        self.lines.clear();
        self.active = None;
        self.unavailable = false;
        self.loading = false;
    }

    pub fn toggle(&mut self, item: Option<&PlaybackItem>) -> Option<LyricsQuery> {
        self.visible = !self.visible;
        if !self.visible || self.unavailable {
            return None;
        }

        item.and_then(|item| self.begin_fetch(item))
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    fn begin_fetch(&mut self, item: &PlaybackItem) -> Option<LyricsQuery> {
        if !self.attempted.insert(item.id.clone()) {
            debug!("Lyrics for {} already attempted", item.id);
            return None;
        }

        self.loading = true;
        self.unavailable = false;
        Some(LyricsQuery::for_item(item))
    }

    /// Applies a finished lookup. Results for a track that is no longer
    /// current are discarded.
    pub fn finish_fetch<E: std::fmt::Display>(&mut self, track_id: &str, result: Result<String, E>) {
        self.attempted.insert(track_id.to_string());

        if self.track_id.as_deref() != Some(track_id) {
            debug!("Discarding lyrics for stale track {track_id}");
            return;
        }

        self.loading = false;
        match result {
            Ok(text) => {
                self.lines = parse_lrc(&text);
                self.unavailable = false;
                info!("Loaded {} lyric lines for {track_id}", self.lines.len());
            }
            Err(e) => {
                info!("Lyrics unavailable for {track_id}: {e}");
                self.lines.clear();
                self.unavailable = true;
            }
        }
        self.active = None;
    }

    /// Recomputes the highlighted line. Returns the new index when it changed.
    pub fn tick(&mut self, progress_secs: f64) -> Option<usize> {
        if !self.should_tick() {
            return None;
        }

        let active = active_line(&self.lines, progress_secs);
        if active != self.active {
            self.active = active;
            return active;
        }
        None
    }
}
