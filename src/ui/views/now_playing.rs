use std::time::Instant;

use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
};

use crate::{
    event::events::Event,
    prefs::Preference,
    ui::{
        components::{
            controls::PlayerControlsWidget, lyrics::LyricsWidget, progress::ProgressWidget,
            track_info::TrackInfoWidget,
        },
        context::AppContext,
        state::AppState,
        traits::{Action, Overlay, View},
    },
    util::colors,
};

/// Milliseconds per marquee step.
const MARQUEE_STEP_MS: u128 = 250;

/// The player screen. Everything on it is derived from [`AppState`]; the view
/// itself only remembers when the current name started scrolling.
pub struct NowPlaying {
    marquee_track: Option<String>,
    marquee_started: Instant,
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self {
            marquee_track: None,
            marquee_started: Instant::now(),
        }
    }
}

impl NowPlaying {
    fn marquee_offset(&self) -> usize {
        (self.marquee_started.elapsed().as_millis() / MARQUEE_STEP_MS) as usize
    }

    fn hints(state: &AppState) -> Line<'static> {
        let mut hints = vec![
            "space play",
            "n/p skip",
            "←/→ seek",
            "+/- volume",
            "s shuffle",
            "r repeat",
            "f like",
        ];
        if state.prefs.get(Preference::LyricsMenu) {
            hints.push("l lyrics");
        }
        hints.extend(["a add", "m menu", "q quit"]);
        Line::from(hints.join(" · ").fg(colors::NEUTRAL)).centered()
    }

    fn status_line(state: &AppState) -> Line<'static> {
        if let Some(error) = &state.ui.error_message {
            Line::from(error.clone().fg(colors::ERROR)).centered()
        } else if let Some(status) = &state.ui.status_message {
            Line::from(status.clone().fg(colors::PRIMARY)).centered()
        } else {
            Self::hints(state)
        }
    }
}

#[async_trait]
impl View for NowPlaying {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        f.buffer_mut()
            .set_style(area, Style::new().bg(colors::BACKGROUND));

        let playback = &state.data.playback;
        let snapshot = playback.snapshot();

        let [_, info, device, progress, controls, lyrics, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let [_, info, _] = Layout::horizontal([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(info);
        f.render_widget(
            TrackInfoWidget::new(
                snapshot,
                state.prefs.get(Preference::TrackNameScrolling),
                self.marquee_offset(),
            ),
            info,
        );

        if let Some(name) = snapshot.and_then(|s| s.device.as_ref()).map(|d| &d.name) {
            f.render_widget(
                Paragraph::new(format!("󰓃 {name}").fg(colors::NEUTRAL)).centered(),
                device,
            );
        }

        f.render_widget(ProgressWidget::new(snapshot), progress);
        f.render_widget(
            PlayerControlsWidget::new(&state.data.transport, playback.is_playing()),
            controls,
        );

        if state.data.lyrics.is_visible() {
            f.render_widget(LyricsWidget::new(&state.data.lyrics), lyrics);
        }

        f.render_widget(Self::status_line(state), status);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        let volume_step = i32::from(ctx.config.volume_step);
        let seek_step = ctx.config.seek_step_ms as i64;

        let event = match (key.code, key.modifiers) {
            (KeyCode::Enter | KeyCode::Char(' '), _) => Event::TogglePlayPause,
            (KeyCode::Char('n'), _) => Event::Next,
            (KeyCode::Char('p'), _) => Event::Previous,
            (KeyCode::Left, KeyModifiers::NONE) => Event::SeekBy(-seek_step),
            (KeyCode::Right, KeyModifiers::NONE) => Event::SeekBy(seek_step),
            (KeyCode::Char('+') | KeyCode::Char('='), _) => Event::VolumeBy(volume_step),
            (KeyCode::Char('-'), _) => Event::VolumeBy(-volume_step),
            (KeyCode::Char('s'), _) => Event::ToggleShuffle,
            (KeyCode::Char('r'), _) => Event::CycleRepeat,
            (KeyCode::Char('f'), _) => Event::ToggleLike,
            (KeyCode::Char('l'), _) if state.prefs.get(Preference::LyricsMenu) => {
                Event::ToggleLyrics
            }
            (KeyCode::Char('m'), _) => return Some(Action::Open(Overlay::Menu)),
            (KeyCode::Char('a'), _) => return Some(Action::Open(Overlay::Playlists)),
            (KeyCode::Char(','), _) => return Some(Action::Open(Overlay::Settings)),
            (KeyCode::Char('q'), _) => return Some(Action::Quit),
            _ => return None,
        };

        Some(Action::Command(event))
    }

    fn on_event(&mut self, event: &Event) {
        if let Event::PlaybackFetched(snapshot) = event {
            let track = snapshot
                .as_ref()
                .and_then(|s| s.track_id())
                .map(str::to_string);
            if track != self.marquee_track {
                self.marquee_track = track;
                self.marquee_started = Instant::now();
            }
        }
    }
}
