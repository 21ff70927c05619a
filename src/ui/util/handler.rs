use std::{future::Future, time::Duration};

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use tracing::{debug, info, warn};

use crate::{
    event::events::Event,
    http::error::ApiError,
    lyrics::LyricsQuery,
    playback::{
        snapshot::ItemKind,
        sync::VOLUME_SAMPLE_INTERVAL,
        transport::{
            CommitPolicy, StateChange, Transport, TransportError, VOLUME_INDICATOR_TIMEOUT,
        },
    },
    playlist::{AddOutcome, PendingPlaylistAdd, PlaylistSummary},
    prefs::{LIBRARY_IMAGE_KEY, Preference},
    ui::{
        app::App,
        input::InputHandler,
        traits::{Action, Overlay},
        tui::{TerminalEvent, Tui},
        views,
    },
};

const PLAYBACK_POLL: &str = "playback_poll";
const PLAYBACK_FETCH: &str = "playback_fetch";
const VOLUME_SAMPLE: &str = "volume_sample";
const VOLUME_HIDE: &str = "volume_hide";
const LYRICS_TICK: &str = "lyrics_tick";

const LYRICS_TICK_INTERVAL: Duration = Duration::from_millis(100);

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let mut should_render = false;
        if let Some(evt) = tui.next().await {
            if Self::handle_event(app, evt, tui).await? {
                should_render = true;
            }
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_action(app, evt).await;
            should_render = true;
        }

        Ok(should_render)
    }

    pub async fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::Init => Self::handle_action(app, Event::Initialize).await,
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key).await,
            TerminalEvent::Mouse(mouse) => Self::handle_mouse_event(app, mouse).await,
            TerminalEvent::Tick => {
                return Ok(app.has_focus);
            }
            TerminalEvent::Resize(..) => {}
        }

        Ok(true)
    }

    pub async fn handle_action(app: &mut App, evt: Event) {
        app.router.on_event(&evt);

        match evt {
            Event::Initialize => Self::start_timers(app),
            Event::RefreshPlayback => Self::refresh_playback(app),
            Event::PlaybackFetched(snapshot) => {
                let effects = app.state.data.apply_snapshot(snapshot);
                if let Some(track_id) = effects.liked_check {
                    Self::check_liked(app, track_id);
                }
                if let Some(query) = effects.lyrics_query {
                    Self::fetch_lyrics(app, query);
                }
                Self::sync_lyrics_tick(app);
            }
            Event::VolumeSample => {
                if let Some(volume) = app.state.data.playback.sample_volume() {
                    app.state.data.transport.volume = Some(volume);
                }
            }
            Event::LyricsTick => {
                let progress = app.state.data.playback.progress_secs();
                if let Some(index) = app.state.data.lyrics.tick(progress) {
                    debug!("Active lyric line {index}");
                }
                Self::sync_lyrics_tick(app);
            }
            Event::LyricsFetched { track_id, result } => {
                app.state.data.lyrics.finish_fetch(&track_id, result);
                Self::sync_lyrics_tick(app);
            }
            Event::LikedChecked { track_id, liked }
            | Event::Confirmed(StateChange::Liked { track_id, liked }) => {
                app.state.data.apply_liked(&track_id, liked);
            }
            Event::Confirmed(change) => {
                app.state.data.transport.confirm(&change);
            }
            Event::HideVolume => app.state.data.transport.volume_visible = false,
            Event::PlaylistsFetched(playlists) => Self::store_playlists(app, playlists),
            Event::DuplicateDetected(pending) => {
                app.state.data.pending_add = Some(pending);
                Self::open_overlay(app, Overlay::ConfirmDuplicate).await;
            }
            Event::TrackAdded { playlist_name } => {
                app.state.data.pending_add = None;
                app.state.ui.status_message = Some(format!("Added to {playlist_name}"));
            }
            Event::EscapePressed => {
                if app.router.has_overlay() {
                    app.router.clear_overlay();
                    app.state.data.pending_add = None;
                }
            }
            Event::UserError(message) => app.state.ui.error_message = Some(message),

            Event::TogglePlayPause => Self::play_pause(app),
            Event::Next => Self::run_transport(app, "skip", |t| async move { t.next().await }),
            Event::Previous => {
                let progress = app.state.data.playback.progress_ms();
                Self::run_transport(app, "skip", move |t| async move {
                    t.previous(progress).await.map(|outcome| debug!("{outcome:?}"))
                });
            }
            Event::SeekBy(delta_ms) => Self::seek_by(app, delta_ms),
            Event::VolumeBy(delta) => Self::change_volume(app, delta),
            Event::ToggleShuffle => {
                let change = StateChange::Shuffle(!app.state.data.transport.is_shuffled);
                Self::send_change(app, "shuffle", change);
            }
            Event::CycleRepeat => {
                let change = StateChange::Repeat(app.state.data.transport.repeat.next());
                Self::send_change(app, "repeat", change);
            }
            Event::ToggleLike => Self::toggle_like(app),
            Event::ToggleLyrics => Self::toggle_lyrics(app),
            Event::AddToPlaylist {
                playlist_id,
                playlist_name,
            } => Self::add_to_playlist(app, playlist_id, playlist_name),
            Event::AddAnyway => Self::add_anyway(app),
            Event::CancelAdd => {
                if let Some(pending) = app.state.data.pending_add.take() {
                    info!("Not adding {} to {}", pending.track_id, pending.playlist_name);
                }
            }
            Event::TogglePreference(preference) => Self::toggle_preference(app, preference),
            Event::SignOut => match app.state.prefs.sign_out() {
                Ok(()) => app.should_quit = true,
                Err(e) => {
                    warn!("Sign out failed: {e}");
                    app.state.ui.error_message = Some(format!("Could not sign out: {e}"));
                }
            },
        }
    }

    async fn handle_key_event(app: &mut App, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        app.state.ui.error_message = None;
        app.state.ui.status_message = None;

        let action = match InputHandler::handle_key(key) {
            Some(action) => Some(action),
            None => app.router.handle_input(key, &app.state, &app.ctx).await,
        };

        if let Some(action) = action {
            Self::dispatch_action(app, action).await;
        }
    }

    async fn dispatch_action(app: &mut App, action: Action) {
        match action {
            Action::Quit => app.should_quit = true,
            Action::Command(event) => Self::handle_action(app, event).await,
            Action::CloseWith(event) => {
                app.router.clear_overlay();
                Self::handle_action(app, event).await;
            }
            Action::Open(kind) => Self::open_overlay(app, kind).await,
            Action::Close => app.router.clear_overlay(),
        }
    }

    async fn handle_mouse_event(app: &mut App, evt: MouseEvent) {
        let step = app.ctx.config.volume_step;
        if let Some(event) = InputHandler::handle_mouse(evt, app.router.has_overlay(), step) {
            Self::handle_action(app, event).await;
        }
    }

    async fn open_overlay(app: &mut App, kind: Overlay) {
        let view = views::build(kind, &app.state);
        app.router.set_overlay(kind, view, &app.ctx).await;
    }

    fn start_timers(app: &mut App) {
        let tx = app.ctx.event_tx.clone();
        app.task_manager
            .every(PLAYBACK_POLL, app.ctx.config.poll_interval, move || {
                tx.send(Event::RefreshPlayback).is_ok()
            });

        let tx = app.ctx.event_tx.clone();
        app.task_manager
            .every(VOLUME_SAMPLE, VOLUME_SAMPLE_INTERVAL, move || {
                tx.send(Event::VolumeSample).is_ok()
            });
    }

    /// One request at a time. A refresh asked for while one is in flight is
    /// covered by the next poll.
    fn refresh_playback(app: &mut App) {
        if app.task_manager.is_running(PLAYBACK_FETCH) {
            debug!("Playback refresh already in flight");
            return;
        }

        let api = app.ctx.api.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn(
            PLAYBACK_FETCH,
            tokio::spawn(async move {
                match api.current_playback().await {
                    Ok(snapshot) => {
                        let _ = tx.send(Event::PlaybackFetched(snapshot));
                    }
                    Err(e) => warn!("Failed to refresh playback: {e}"),
                }
            }),
        );
    }

    fn check_liked(app: &mut App, track_id: String) {
        let transport = app.ctx.transport.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn(
            "liked_check",
            tokio::spawn(async move {
                match transport.is_liked(&track_id).await {
                    Ok(liked) => {
                        let _ = tx.send(Event::LikedChecked { track_id, liked });
                    }
                    Err(e) => warn!("Failed to check liked status of {track_id}: {e}"),
                }
            }),
        );
    }

    fn fetch_lyrics(app: &mut App, query: LyricsQuery) {
        info!(
            "Fetching lyrics for '{}' by '{}'",
            query.track_name, query.artist_name
        );

        let api = app.ctx.lyrics_api.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn(
            "fetch_lyrics",
            tokio::spawn(async move {
                let result = api
                    .fetch_lyrics(&query.track_name, &query.artist_name)
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx.send(Event::LyricsFetched {
                    track_id: query.track_id,
                    result,
                });
            }),
        );
    }

    fn sync_lyrics_tick(app: &mut App) {
        let should_tick = app.state.data.lyrics.should_tick();
        let running = app.task_manager.is_running(LYRICS_TICK);

        if should_tick && !running {
            let tx = app.ctx.event_tx.clone();
            app.task_manager
                .every(LYRICS_TICK, LYRICS_TICK_INTERVAL, move || {
                    tx.send(Event::LyricsTick).is_ok()
                });
        } else if !should_tick && running {
            app.task_manager.abort(LYRICS_TICK);
        }
    }

    fn toggle_lyrics(app: &mut App) {
        if !app.state.prefs.get(Preference::LyricsMenu) {
            debug!("Lyrics are disabled in settings");
            return;
        }

        let query = app
            .state
            .data
            .lyrics
            .toggle(app.state.data.playback.current_item());
        if let Some(query) = query {
            Self::fetch_lyrics(app, query);
        }
        Self::sync_lyrics_tick(app);
    }

    fn play_pause(app: &mut App) {
        let transport = app.ctx.transport.clone();
        let tx = app.ctx.event_tx.clone();
        let was_playing = app.state.data.playback.is_playing();

        app.task_manager.spawn(
            "play_pause",
            tokio::spawn(async move {
                match transport.play_pause(was_playing).await {
                    Ok(outcome) => {
                        debug!("{outcome:?}");
                        let _ = tx.send(Event::RefreshPlayback);
                    }
                    Err(e @ TransportError::NoDevicesAvailable) => {
                        warn!("{e}");
                        let _ = tx.send(Event::UserError(e.to_string()));
                    }
                    Err(e) => warn!("Play/pause failed: {e}"),
                }
            }),
        );
    }

    /// Runs a transport call and refreshes playback once it went through.
    fn run_transport<F, Fut>(app: &mut App, key: &str, call: F)
    where
        F: FnOnce(Transport) -> Fut,
        Fut: Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        let request = call(app.ctx.transport.clone());
        let tx = app.ctx.event_tx.clone();
        let name = key.to_string();

        app.task_manager.spawn(
            key,
            tokio::spawn(async move {
                match request.await {
                    Ok(()) => {
                        let _ = tx.send(Event::RefreshPlayback);
                    }
                    Err(e) => warn!("{name} failed: {e}"),
                }
            }),
        );
    }

    fn seek_by(app: &mut App, delta_ms: i64) {
        let Some(snapshot) = app.state.data.playback.snapshot() else {
            return;
        };
        let duration = snapshot.duration_ms() as i64;
        if duration == 0 {
            return;
        }

        let target = (snapshot.progress_ms as i64 + delta_ms).clamp(0, duration) as u64;
        Self::run_transport(app, "seek", move |t| async move { t.seek(target).await });
    }

    fn change_volume(app: &mut App, delta: i32) {
        let current = app
            .state
            .data
            .transport
            .volume
            .or_else(|| app.state.data.playback.sample_volume())
            .unwrap_or(0);

        let change = StateChange::volume(i32::from(current) + delta);
        app.state.data.transport.stage(&change);

        let tx = app.ctx.event_tx.clone();
        app.task_manager
            .after(VOLUME_HIDE, VOLUME_INDICATOR_TIMEOUT, move || {
                let _ = tx.send(Event::HideVolume);
            });

        Self::send_change(app, "volume", change);
    }

    fn toggle_like(app: &mut App) {
        let Some(track_id) = app.state.data.current_track_id() else {
            return;
        };
        let Some(liked) = app.state.data.transport.liked else {
            debug!("Liked status of {track_id} not known yet");
            return;
        };

        Self::send_change(
            app,
            "like",
            StateChange::Liked {
                track_id,
                liked: !liked,
            },
        );
    }

    /// Sends a state change. Confirm-then-commit changes come back as
    /// [`Event::Confirmed`] once the service accepted them.
    fn send_change(app: &mut App, key: &str, change: StateChange) {
        let transport = app.ctx.transport.clone();
        let tx = app.ctx.event_tx.clone();

        app.task_manager.spawn(
            key,
            tokio::spawn(async move {
                if let Err(e) = transport.send(&change).await {
                    warn!("Failed to apply {change:?}: {e}");
                    return;
                }

                if change.policy() == CommitPolicy::ConfirmThenCommit {
                    let _ = tx.send(Event::Confirmed(change));
                    let _ = tx.send(Event::RefreshPlayback);
                }
            }),
        );
    }

    fn add_to_playlist(app: &mut App, playlist_id: String, playlist_name: String) {
        let Some(item) = app.state.data.playback.current_item() else {
            app.state.ui.error_message = Some("Nothing is playing".to_string());
            return;
        };
        if item.kind == ItemKind::Episode {
            app.state.ui.error_message = Some("Only tracks can be added to playlists".to_string());
            return;
        }

        let track_id = item.id.clone();
        let picker = app.ctx.picker.clone();
        let tx = app.ctx.event_tx.clone();

        app.task_manager.spawn(
            "playlist_add",
            tokio::spawn(async move {
                let event = match picker.add_track(&playlist_id, &track_id).await {
                    Ok(AddOutcome::Added) => Event::TrackAdded { playlist_name },
                    Ok(AddOutcome::Duplicate) => Event::DuplicateDetected(PendingPlaylistAdd {
                        playlist_id,
                        playlist_name,
                        track_id,
                    }),
                    Err(e) => {
                        warn!("Failed to add {track_id} to {playlist_id}: {e}");
                        Event::UserError(format!("Could not add to {playlist_name}"))
                    }
                };
                let _ = tx.send(event);
            }),
        );
    }

    fn add_anyway(app: &mut App) {
        let Some(pending) = app.state.data.pending_add.take() else {
            return;
        };

        let picker = app.ctx.picker.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn(
            "playlist_add",
            tokio::spawn(async move {
                let event = match picker.add_anyway(&pending).await {
                    Ok(()) => Event::TrackAdded {
                        playlist_name: pending.playlist_name,
                    },
                    Err(e) => {
                        warn!("Failed to add {} anyway: {e}", pending.track_id);
                        Event::UserError(format!("Could not add to {}", pending.playlist_name))
                    }
                };
                let _ = tx.send(event);
            }),
        );
    }

    fn store_playlists(app: &mut App, playlists: Vec<PlaylistSummary>) {
        if let Some(image) = playlists.first().and_then(|p| p.image_url.clone()) {
            if let Err(e) = app.state.prefs.storage_mut().set(LIBRARY_IMAGE_KEY, image) {
                warn!("Failed to store library image: {e}");
            }
        }
        app.state.data.playlists = Some(playlists);
    }

    fn toggle_preference(app: &mut App, preference: Preference) {
        match app.state.prefs.toggle(preference) {
            Ok(enabled) => {
                info!("{} set to {enabled}", preference.key());
                if preference == Preference::LyricsMenu && !enabled {
                    app.state.data.lyrics.hide();
                    Self::sync_lyrics_tick(app);
                }
            }
            Err(e) => {
                warn!("Failed to save {}: {e}", preference.key());
                app.state.ui.error_message = Some(format!("Could not save settings: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests;
