use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Stylize,
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::{
    playback::{PlaybackSnapshot, snapshot::ItemKind},
    util::{colors, marquee},
};

/// Name, artists and album of what is playing. Long names either scroll or
/// get cut, depending on the user's preference.
pub struct TrackInfoWidget<'a> {
    snapshot: Option<&'a PlaybackSnapshot>,
    scrolling: bool,
    offset: usize,
}

impl<'a> TrackInfoWidget<'a> {
    pub fn new(snapshot: Option<&'a PlaybackSnapshot>, scrolling: bool, offset: usize) -> Self {
        Self {
            snapshot,
            scrolling,
            offset,
        }
    }
}

impl Widget for TrackInfoWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let name = self.snapshot.map_or("Not Playing", PlaybackSnapshot::track_name);
        let name = if self.scrolling {
            marquee::scroll(name, width, self.offset)
        } else {
            marquee::truncate(name, width)
        };

        let mut lines = vec![Line::from(name.fg(colors::ACCENT).bold())];
        if let Some(item) = self.snapshot.and_then(|s| s.item.as_ref()) {
            lines.push(Line::from(
                marquee::truncate(&item.artist_line(), width).fg(colors::MUTED),
            ));

            let detail = match item.kind {
                ItemKind::Track => item.album_name.clone().unwrap_or_default(),
                ItemKind::Episode => "Podcast".to_string(),
            };
            lines.push(Line::from(
                marquee::truncate(&detail, width).fg(colors::NEUTRAL),
            ));
        }

        Paragraph::new(lines).centered()
            .render(area, buf);
    }
}
