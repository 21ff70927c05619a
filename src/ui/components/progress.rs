use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    symbols::border,
    text::ToSpan,
    widgets::{Block, Borders, Gauge, Widget},
};

use crate::{playback::PlaybackSnapshot, util::colors};

pub struct ProgressWidget<'a> {
    snapshot: Option<&'a PlaybackSnapshot>,
}

impl<'a> ProgressWidget<'a> {
    pub fn new(snapshot: Option<&'a PlaybackSnapshot>) -> Self {
        Self { snapshot }
    }
}

impl Widget for ProgressWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (ratio, label) = match self.snapshot.filter(|s| s.item.is_some()) {
            Some(snapshot) => {
                let ratio = snapshot.progress_ratio();
                let label = format!(
                    "{} / {}  {:>3}%",
                    format_duration(snapshot.progress_ms),
                    format_duration(snapshot.duration_ms()),
                    (ratio * 100.0).round() as u8
                );
                (ratio, label)
            }
            None => (0.0, "--:-- / --:--".to_string()),
        };

        Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED)
                    .border_style(Style::new().fg(colors::NEUTRAL)),
            )
            .gauge_style(Style::new().fg(colors::PRIMARY).bg(colors::BACKGROUND))
            .ratio(ratio)
            .label(label.to_span().fg(colors::ACCENT))
            .use_unicode(true)
            .render(area, buf);
    }
}

pub fn format_duration(duration_ms: u64) -> String {
    let total_seconds = duration_ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}
