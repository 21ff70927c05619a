use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Gauge, Widget},
};

use crate::{
    playback::{RepeatState, transport::TransportState},
    util::colors,
};

/// Transport buttons plus the volume indicator while it is visible.
pub struct PlayerControlsWidget<'a> {
    transport: &'a TransportState,
    is_playing: bool,
}

impl<'a> PlayerControlsWidget<'a> {
    pub fn new(transport: &'a TransportState, is_playing: bool) -> Self {
        Self {
            transport,
            is_playing,
        }
    }

    fn buttons(&self) -> Line<'static> {
        let shuffle = if self.transport.is_shuffled {
            "󰒟".fg(colors::PRIMARY)
        } else {
            "󰒞".fg(colors::NEUTRAL)
        };
        let repeat = match self.transport.repeat {
            RepeatState::Off => "󰑗".fg(colors::NEUTRAL),
            RepeatState::Context => "󰑖".fg(colors::PRIMARY),
            RepeatState::Track => "󰑘".fg(colors::PRIMARY),
        };
        let play = if self.is_playing { "" } else { "" };
        let like = match self.transport.liked {
            Some(true) => "󰋑".fg(colors::PRIMARY),
            Some(false) => "󰋕".fg(colors::ACCENT),
            None => "󰋕".fg(colors::NEUTRAL),
        };

        Line::from(vec![
            shuffle,
            Span::raw("    "),
            "󰒮".fg(colors::ACCENT),
            Span::raw("   "),
            play.fg(colors::ACCENT).bold(),
            Span::raw("   "),
            "󰒭".fg(colors::ACCENT),
            Span::raw("    "),
            repeat,
            Span::raw("    "),
            like,
        ])
        .centered()
    }
}

impl Widget for PlayerControlsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [buttons, volume] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        self.buttons().render(buttons, buf);

        let Some(level) = self.transport.volume.filter(|_| self.transport.volume_visible) else {
            return;
        };

        let [_, gauge, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(24),
            Constraint::Fill(1),
        ])
        .areas(volume);

        Gauge::default()
            .gauge_style(Style::new().fg(colors::PRIMARY).bg(colors::NEUTRAL))
            .ratio(f64::from(level) / 100.0)
            .label(format!("󰕾 {level}%"))
            .use_unicode(true)
            .render(gauge, buf);
    }
}
