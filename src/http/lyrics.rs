use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::{
    config::Config,
    http::{error::ApiError, traits::LyricsApi},
};

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    lyrics: String,
}

/// Client for the lyrics lookup service. Answers `{ "lyrics": "<lrc>" }`.
pub struct LyricsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl LyricsClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            endpoint: config.lyrics_url.clone(),
        })
    }
}

#[async_trait]
impl LyricsApi for LyricsClient {
    async fn fetch_lyrics(&self, track_name: &str, artist_name: &str) -> Result<String, ApiError> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[("name", track_name), ("artist", artist_name)],
        )
        .map_err(|e| ApiError::Url(e.to_string()))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: "GET lyrics".to_string(),
                status: status.as_u16(),
            });
        }

        let body: LyricsResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("lyrics: {e}")))?;
        Ok(body.lyrics)
    }
}
