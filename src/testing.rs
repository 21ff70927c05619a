//! Scripted API doubles shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    config::Config,
    http::{
        error::ApiError,
        model::{Page, UserProfile},
        traits::{LyricsApi, PlaybackApi},
    },
    playback::snapshot::{Device, ItemKind, PlaybackItem, PlaybackSnapshot, RepeatState},
    playlist::PlaylistSummary,
    prefs::{PreferenceStore, storage::Storage},
    ui::{context::AppContext, state::AppState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentPlayback,
    Devices,
    Transfer(String, bool),
    Play,
    Pause,
    Seek(u64),
    Next,
    Previous,
    Volume(u8),
    Shuffle(bool),
    Repeat(RepeatState),
    IsSaved(String),
    Save(String),
    Remove(String),
    CurrentUser,
    UserPlaylists(Option<String>),
    PlaylistTracks(String, Option<String>),
    AddToPlaylist(String, Vec<String>),
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    playback: Mutex<Option<PlaybackSnapshot>>,
    devices: Mutex<Vec<Device>>,
    saved: Mutex<bool>,
    user_id: String,
    playlists: Vec<PlaylistSummary>,
    playlist_pages: HashMap<String, Vec<Vec<String>>>,
    failing: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            user_id: "me".to_string(),
            ..Default::default()
        }
    }

    pub fn with_playback(self, snapshot: PlaybackSnapshot) -> Self {
        *lock(&self.playback) = Some(snapshot);
        self
    }

    /// What the next playback poll will report.
    pub fn set_playback(&self, snapshot: Option<PlaybackSnapshot>) {
        *lock(&self.playback) = snapshot;
    }

    pub fn with_devices(self, devices: Vec<Device>) -> Self {
        *lock(&self.devices) = devices;
        self
    }

    pub fn with_saved(self, saved: bool) -> Self {
        *lock(&self.saved) = saved;
        self
    }

    pub fn with_playlists(mut self, playlists: Vec<PlaylistSummary>) -> Self {
        self.playlists = playlists;
        self
    }

    /// Tracks of a playlist, split into the pages the fake will serve.
    pub fn with_playlist_pages(mut self, playlist_id: &str, pages: Vec<Vec<&str>>) -> Self {
        self.playlist_pages.insert(
            playlist_id.to_string(),
            pages
                .into_iter()
                .map(|page| page.into_iter().map(str::to_string).collect())
                .collect(),
        );
        self
    }

    /// Every call answers with a 500.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let endpoint = format!("{call:?}");
        lock(&self.calls).push(call);
        if self.failing {
            return Err(ApiError::Status {
                endpoint,
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PlaybackApi for FakeApi {
    async fn current_playback(&self) -> Result<Option<PlaybackSnapshot>, ApiError> {
        self.record(Call::CurrentPlayback)?;
        Ok(lock(&self.playback).clone())
    }

    async fn devices(&self) -> Result<Vec<Device>, ApiError> {
        self.record(Call::Devices)?;
        Ok(lock(&self.devices).clone())
    }

    async fn transfer_playback(&self, device_id: &str, play: bool) -> Result<(), ApiError> {
        self.record(Call::Transfer(device_id.to_string(), play))
    }

    async fn play(&self) -> Result<(), ApiError> {
        self.record(Call::Play)
    }

    async fn pause(&self) -> Result<(), ApiError> {
        self.record(Call::Pause)
    }

    async fn seek(&self, position_ms: u64) -> Result<(), ApiError> {
        self.record(Call::Seek(position_ms))
    }

    async fn next(&self) -> Result<(), ApiError> {
        self.record(Call::Next)
    }

    async fn previous(&self) -> Result<(), ApiError> {
        self.record(Call::Previous)
    }

    async fn set_volume(&self, volume_percent: u8) -> Result<(), ApiError> {
        self.record(Call::Volume(volume_percent))
    }

    async fn set_shuffle(&self, state: bool) -> Result<(), ApiError> {
        self.record(Call::Shuffle(state))?;
        if let Some(playback) = lock(&self.playback).as_mut() {
            playback.shuffle_state = state;
        }
        Ok(())
    }

    async fn set_repeat(&self, state: RepeatState) -> Result<(), ApiError> {
        self.record(Call::Repeat(state))?;
        if let Some(playback) = lock(&self.playback).as_mut() {
            playback.repeat_state = state;
        }
        Ok(())
    }

    async fn is_saved(&self, track_id: &str) -> Result<bool, ApiError> {
        self.record(Call::IsSaved(track_id.to_string()))?;
        Ok(*lock(&self.saved))
    }

    async fn save_track(&self, track_id: &str) -> Result<(), ApiError> {
        self.record(Call::Save(track_id.to_string()))?;
        *lock(&self.saved) = true;
        Ok(())
    }

    async fn remove_track(&self, track_id: &str) -> Result<(), ApiError> {
        self.record(Call::Remove(track_id.to_string()))?;
        *lock(&self.saved) = false;
        Ok(())
    }

    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.record(Call::CurrentUser)?;
        Ok(UserProfile {
            id: self.user_id.clone(),
            display_name: None,
        })
    }

    async fn user_playlists(&self, next: Option<&str>) -> Result<Page<PlaylistSummary>, ApiError> {
        self.record(Call::UserPlaylists(next.map(str::to_string)))?;
        // Two playlists per page.
        let start: usize = next.and_then(|n| n.parse().ok()).unwrap_or(0);
        let end = (start + 2).min(self.playlists.len());
        Ok(Page {
            items: self.playlists[start.min(end)..end].to_vec(),
            next: (end < self.playlists.len()).then(|| end.to_string()),
        })
    }

    async fn playlist_track_ids(
        &self,
        playlist_id: &str,
        next: Option<&str>,
    ) -> Result<Page<String>, ApiError> {
        self.record(Call::PlaylistTracks(
            playlist_id.to_string(),
            next.map(str::to_string),
        ))?;
        let pages = self
            .playlist_pages
            .get(playlist_id)
            .cloned()
            .unwrap_or_default();
        let index: usize = next.and_then(|n| n.parse().ok()).unwrap_or(0);

        Ok(Page {
            items: pages.get(index).cloned().unwrap_or_default(),
            next: (index + 1 < pages.len()).then(|| (index + 1).to_string()),
        })
    }

    async fn add_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        self.record(Call::AddToPlaylist(playlist_id.to_string(), uris.to_vec()))
    }
}

pub struct FakeLyrics {
    response: Result<String, u16>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeLyrics {
    pub fn returning(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            calls: Mutex::default(),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl LyricsApi for FakeLyrics {
    async fn fetch_lyrics(&self, track_name: &str, artist_name: &str) -> Result<String, ApiError> {
        lock(&self.calls).push((track_name.to_string(), artist_name.to_string()));
        self.response.clone().map_err(|status| ApiError::Status {
            endpoint: "GET lyrics".to_string(),
            status,
        })
    }
}

pub fn track(id: &str) -> PlaybackItem {
    PlaybackItem {
        id: id.to_string(),
        kind: ItemKind::Track,
        name: format!("Track {id}"),
        artists: vec!["Artist".to_string()],
        album_id: Some("album".to_string()),
        album_name: Some("Album".to_string()),
        album_art_url: None,
        duration_ms: 200_000,
    }
}

pub fn playing(id: &str, progress_ms: u64) -> PlaybackSnapshot {
    PlaybackSnapshot {
        item: Some(track(id)),
        progress_ms,
        is_playing: true,
        device: Some(device("dev", true, Some(50))),
        shuffle_state: false,
        repeat_state: RepeatState::Off,
    }
}

pub fn device(id: &str, is_active: bool, volume_percent: Option<u8>) -> Device {
    Device {
        id: Some(id.to_string()),
        name: format!("Device {id}"),
        is_active,
        volume_percent,
    }
}

pub fn app_state() -> AppState {
    AppState::new(PreferenceStore::load(Storage::in_memory()).unwrap())
}

/// A context whose event receiver is already gone; sends are dropped.
pub fn app_context() -> AppContext {
    let (event_tx, _) = flume::unbounded();
    AppContext::new(
        Config::default(),
        Arc::new(FakeApi::new()),
        Arc::new(FakeLyrics::returning("")),
        event_tx,
    )
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
