pub mod error;
pub mod lyrics;
pub mod model;
pub mod traits;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url, header::CONTENT_LENGTH};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::{
    config::Config,
    http::{
        error::ApiError,
        model::{
            Page, RawDevices, RawPage, RawPlaybackState, RawPlaylist, RawPlaylistItem, RawUser,
            UserProfile,
        },
        traits::PlaybackApi,
    },
    playback::snapshot::{Device, PlaybackSnapshot, RepeatState},
    playlist::PlaylistSummary,
};

const PLAYLIST_TRACKS_PAGE_SIZE: u32 = 100;
const USER_PLAYLISTS_PAGE_SIZE: u32 = 50;

pub struct SpotifyClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().gzip(true).build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn url_with(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        Url::parse_with_params(&self.url(path), params).map_err(|e| ApiError::Url(e.to_string()))
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ApiError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        debug!("{endpoint} -> {status}");

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: impl reqwest::IntoUrl,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(self.client.get(url), endpoint).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("{endpoint}: {e}")))
    }

    async fn command(
        &self,
        method: Method,
        url: impl reqwest::IntoUrl,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        let request = self.client.request(method, url);
        let request = match body {
            Some(body) => request.json(&body),
            None => request.header(CONTENT_LENGTH, 0),
        };
        self.send(request, endpoint).await.map(|_| ())
    }
}

#[async_trait]
impl PlaybackApi for SpotifyClient {
    async fn current_playback(&self) -> Result<Option<PlaybackSnapshot>, ApiError> {
        let endpoint = "GET /me/player";
        let response = self
            .client
            .get(self.url("/me/player"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let raw = response
                    .json::<RawPlaybackState>()
                    .await
                    .map_err(|e| ApiError::Decode(format!("{endpoint}: {e}")))?;
                Ok(Some(raw.into()))
            }
            status => Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    async fn devices(&self) -> Result<Vec<Device>, ApiError> {
        let raw: RawDevices = self
            .get_json(self.url("/me/player/devices"), "GET /me/player/devices")
            .await?;
        Ok(raw.devices.into_iter().map(Device::from).collect())
    }

    async fn transfer_playback(&self, device_id: &str, play: bool) -> Result<(), ApiError> {
        self.command(
            Method::PUT,
            self.url("/me/player"),
            "PUT /me/player",
            Some(json!({ "device_ids": [device_id], "play": play })),
        )
        .await
    }

    async fn play(&self) -> Result<(), ApiError> {
        self.command(
            Method::PUT,
            self.url("/me/player/play"),
            "PUT /me/player/play",
            None,
        )
        .await
    }

    async fn pause(&self) -> Result<(), ApiError> {
        self.command(
            Method::PUT,
            self.url("/me/player/pause"),
            "PUT /me/player/pause",
            None,
        )
        .await
    }

    async fn seek(&self, position_ms: u64) -> Result<(), ApiError> {
        let url = self.url_with("/me/player/seek", &[("position_ms", position_ms.to_string())])?;
        self.command(Method::PUT, url, "PUT /me/player/seek", None)
            .await
    }

    async fn next(&self) -> Result<(), ApiError> {
        self.command(
            Method::POST,
            self.url("/me/player/next"),
            "POST /me/player/next",
            None,
        )
        .await
    }

    async fn previous(&self) -> Result<(), ApiError> {
        self.command(
            Method::POST,
            self.url("/me/player/previous"),
            "POST /me/player/previous",
            None,
        )
        .await
    }

    async fn set_volume(&self, volume_percent: u8) -> Result<(), ApiError> {
        let url = self.url_with(
            "/me/player/volume",
            &[("volume_percent", volume_percent.to_string())],
        )?;
        self.command(Method::PUT, url, "PUT /me/player/volume", None)
            .await
    }

    async fn set_shuffle(&self, state: bool) -> Result<(), ApiError> {
        let url = self.url_with("/me/player/shuffle", &[("state", state.to_string())])?;
        self.command(Method::PUT, url, "PUT /me/player/shuffle", None)
            .await
    }

    async fn set_repeat(&self, state: RepeatState) -> Result<(), ApiError> {
        let url = self.url_with("/me/player/repeat", &[("state", state.as_str().to_string())])?;
        self.command(Method::PUT, url, "PUT /me/player/repeat", None)
            .await
    }

    async fn is_saved(&self, track_id: &str) -> Result<bool, ApiError> {
        let url = self.url_with("/me/tracks/contains", &[("ids", track_id.to_string())])?;
        let saved: Vec<bool> = self.get_json(url, "GET /me/tracks/contains").await?;
        Ok(saved.first().copied().unwrap_or(false))
    }

    async fn save_track(&self, track_id: &str) -> Result<(), ApiError> {
        let url = self.url_with("/me/tracks", &[("ids", track_id.to_string())])?;
        self.command(Method::PUT, url, "PUT /me/tracks", None).await
    }

    async fn remove_track(&self, track_id: &str) -> Result<(), ApiError> {
        let url = self.url_with("/me/tracks", &[("ids", track_id.to_string())])?;
        self.command(Method::DELETE, url, "DELETE /me/tracks", None)
            .await
    }

    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let raw: RawUser = self.get_json(self.url("/me"), "GET /me").await?;
        Ok(raw.into())
    }

    async fn user_playlists(&self, next: Option<&str>) -> Result<Page<PlaylistSummary>, ApiError> {
        let url = match next {
            Some(next) => next.to_string(),
            None => format!(
                "{}?limit={USER_PLAYLISTS_PAGE_SIZE}",
                self.url("/me/playlists")
            ),
        };
        let raw: RawPage<RawPlaylist> = self.get_json(url, "GET /me/playlists").await?;

        Ok(Page {
            items: raw.items.into_iter().map(PlaylistSummary::from).collect(),
            next: raw.next,
        })
    }

    async fn playlist_track_ids(
        &self,
        playlist_id: &str,
        next: Option<&str>,
    ) -> Result<Page<String>, ApiError> {
        let url = match next {
            Some(next) => next.to_string(),
            None => format!(
                "{}?limit={PLAYLIST_TRACKS_PAGE_SIZE}",
                self.url(&format!("/playlists/{playlist_id}/tracks"))
            ),
        };
        let raw: RawPage<RawPlaylistItem> =
            self.get_json(url, "GET /playlists/{id}/tracks").await?;

        Ok(Page {
            items: raw
                .items
                .into_iter()
                .filter_map(RawPlaylistItem::into_track_id)
                .collect(),
            next: raw.next,
        })
    }

    async fn add_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<(), ApiError> {
        self.command(
            Method::POST,
            self.url(&format!("/playlists/{playlist_id}/tracks")),
            "POST /playlists/{id}/tracks",
            Some(json!({ "uris": uris })),
        )
        .await
    }
}
