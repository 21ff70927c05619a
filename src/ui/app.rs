use std::sync::Arc;

use flume::Receiver;
use ratatui::Frame;
use tracing::info;

use crate::{
    config::{Config, settings_path},
    event::events::Event,
    http::{
        SpotifyClient,
        lyrics::LyricsClient,
        traits::{LyricsApi, PlaybackApi},
    },
    prefs::{PreferenceStore, storage::Storage},
    util::task::TaskManager,
};

use super::{
    context::AppContext,
    router::Router,
    state::AppState,
    tui::{self, TerminalEvent},
    util::handler::EventHandler,
    views::NowPlaying,
};

pub struct App {
    pub event_rx: Receiver<Event>,
    pub ctx: AppContext,
    pub state: AppState,
    pub router: Router,
    pub task_manager: TaskManager,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub async fn new() -> color_eyre::Result<Self> {
        let mut storage = Storage::open(settings_path())?;
        let config = Config::load(&mut storage)?;
        let prefs = PreferenceStore::load(storage)?;

        let api: Arc<dyn PlaybackApi> = Arc::new(SpotifyClient::new(&config)?);
        let lyrics_api: Arc<dyn LyricsApi> = Arc::new(LyricsClient::new(&config)?);

        Ok(Self::with_services(config, api, lyrics_api, prefs))
    }

    pub fn with_services(
        config: Config,
        api: Arc<dyn PlaybackApi>,
        lyrics_api: Arc<dyn LyricsApi>,
        prefs: PreferenceStore,
    ) -> Self {
        let (event_tx, event_rx) = flume::unbounded();

        Self {
            event_rx,
            ctx: AppContext::new(config, api, lyrics_api, event_tx),
            state: AppState::new(prefs),
            router: Router::new(Box::new(NowPlaying::default())),
            task_manager: TaskManager::new(),
            has_focus: true,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?.mouse(true);
        tui.enter()?;

        EventHandler::handle_event(self, TerminalEvent::Init, &mut tui).await?;
        while !self.should_quit {
            tui.draw(|f| {
                self.ui(f);
            })?;

            EventHandler::handle_events(self, &mut tui).await?;
        }

        self.shutdown();
        tui.exit()?;
        Ok(())
    }

    pub fn shutdown(&mut self) {
        info!("Shutting down");
        self.task_manager.abort_all();
    }

    fn ui(&mut self, frame: &mut Frame) {
        if self.has_focus {
            let area = frame.area();
            self.router.render(frame, area, &self.state);
        }
    }
}
