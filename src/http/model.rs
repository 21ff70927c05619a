//! Wire shapes of the Spotify Web API responses this client reads, and their
//! conversion into the domain types the rest of the crate works with.

use serde::Deserialize;

use crate::{
    playback::snapshot::{Device, ItemKind, PlaybackItem, PlaybackSnapshot, RepeatState},
    playlist::PlaylistSummary,
};

/// One page of a paginated listing. `next` is the absolute url of the
/// following page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlaybackState {
    #[serde(default)]
    device: Option<RawDevice>,
    #[serde(default)]
    shuffle_state: bool,
    #[serde(default)]
    repeat_state: RepeatState,
    #[serde(default)]
    progress_ms: Option<u64>,
    #[serde(default)]
    is_playing: bool,
    #[serde(default)]
    item: Option<RawItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDevice {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    volume_percent: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDevices {
    pub(crate) devices: Vec<RawDevice>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    duration_ms: u64,
    #[serde(default)]
    artists: Vec<RawNamed>,
    #[serde(default)]
    album: Option<RawCollection>,
    #[serde(default)]
    show: Option<RawCollection>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    images: Option<Vec<RawImage>>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPage<T> {
    pub(crate) items: Vec<T>,
    #[serde(default)]
    pub(crate) next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlaylistItem {
    #[serde(default)]
    track: Option<RawTrackRef>,
}

#[derive(Debug, Deserialize)]
struct RawTrackRef {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlaylist {
    id: String,
    #[serde(default)]
    name: String,
    owner: RawOwner,
    #[serde(default)]
    images: Option<Vec<RawImage>>,
    #[serde(default)]
    tracks: Option<RawTrackCount>,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawTrackCount {
    total: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
}

fn first_image(images: Option<Vec<RawImage>>) -> Option<String> {
    images.and_then(|images| images.into_iter().next()).map(|i| i.url)
}

impl From<RawDevice> for Device {
    fn from(raw: RawDevice) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            is_active: raw.is_active,
            volume_percent: raw.volume_percent,
        }
    }
}

impl From<RawItem> for PlaybackItem {
    fn from(raw: RawItem) -> Self {
        let id = raw.id.or(raw.uri).unwrap_or_default();
        if raw.kind == "episode" {
            let show = raw.show;
            let show_name = show.as_ref().map(|s| s.name.clone());
            let show_id = show.as_ref().and_then(|s| s.id.clone());
            Self {
                id,
                kind: ItemKind::Episode,
                name: raw.name,
                artists: show_name.clone().into_iter().collect(),
                album_id: show_id,
                album_name: show_name,
                album_art_url: show.and_then(|s| first_image(s.images)),
                duration_ms: raw.duration_ms,
            }
        } else {
            let album = raw.album;
            Self {
                id,
                kind: ItemKind::Track,
                name: raw.name,
                artists: raw.artists.into_iter().map(|a| a.name).collect(),
                album_id: album.as_ref().and_then(|a| a.id.clone()),
                album_name: album.as_ref().map(|a| a.name.clone()),
                album_art_url: album.and_then(|a| first_image(a.images)),
                duration_ms: raw.duration_ms,
            }
        }
    }
}

impl From<RawPlaybackState> for PlaybackSnapshot {
    fn from(raw: RawPlaybackState) -> Self {
        Self {
            item: raw.item.map(PlaybackItem::from),
            progress_ms: raw.progress_ms.unwrap_or_default(),
            is_playing: raw.is_playing,
            device: raw.device.map(Device::from),
            shuffle_state: raw.shuffle_state,
            repeat_state: raw.repeat_state,
        }
    }
}

impl RawPlaylistItem {
    pub(crate) fn into_track_id(self) -> Option<String> {
        self.track.and_then(|t| t.id)
    }
}

impl From<RawPlaylist> for PlaylistSummary {
    fn from(raw: RawPlaylist) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            owner_id: raw.owner.id,
            image_url: first_image(raw.images),
            track_count: raw.tracks.map_or(0, |t| t.total),
        }
    }
}

impl From<RawUser> for UserProfile {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            display_name: raw.display_name,
        }
    }
}
