use std::sync::Arc;

use flume::Sender;

use crate::{
    config::Config,
    event::events::Event,
    http::traits::{LyricsApi, PlaybackApi},
    playback::transport::Transport,
    playlist::PlaylistPicker,
};

/// Services shared by the event handler and the views.
pub struct AppContext {
    pub config: Config,
    pub api: Arc<dyn PlaybackApi>,
    pub lyrics_api: Arc<dyn LyricsApi>,
    pub transport: Transport,
    pub picker: PlaylistPicker,
    pub event_tx: Sender<Event>,
}

impl AppContext {
    pub fn new(
        config: Config,
        api: Arc<dyn PlaybackApi>,
        lyrics_api: Arc<dyn LyricsApi>,
        event_tx: Sender<Event>,
    ) -> Self {
        Self {
            config,
            transport: Transport::new(api.clone()),
            picker: PlaylistPicker::new(api.clone()),
            api,
            lyrics_api,
            event_tx,
        }
    }
}
