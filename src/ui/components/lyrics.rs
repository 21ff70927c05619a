use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    lyrics::LyricsSync,
    ui::components::spinner::Spinner,
    util::{colors, marquee},
};

pub struct LyricsWidget<'a> {
    lyrics: &'a LyricsSync,
}

impl<'a> LyricsWidget<'a> {
    pub fn new(lyrics: &'a LyricsSync) -> Self {
        Self { lyrics }
    }
}

/// Rows of `total` lines to show in `height` rows, keeping `focus` centred
/// once there is more text than room.
pub fn visible_range(total: usize, focus: usize, height: usize) -> Range<usize> {
    if total <= height {
        return 0..total;
    }
    let start = focus.saturating_sub(height / 2).min(total - height);
    start..start + height
}

fn centered_line(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let text = marquee::truncate(text, area.width as usize);
    let x = area.x + area.width.saturating_sub(text.width() as u16) / 2;
    buf.set_stringn(x, y, text, area.width as usize, style);
}

impl Widget for LyricsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::new().fg(colors::NEUTRAL))
            .title(" Lyrics ");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.lyrics.is_loading() {
            Spinner::new("Loading lyrics...")
                .style(Style::new().fg(colors::PRIMARY))
                .render(inner, buf);
            return;
        }

        let lines = self.lyrics.lines();
        if lines.is_empty() {
            let y = inner.y + inner.height / 2;
            centered_line(
                buf,
                inner,
                y,
                "Lyrics not available",
                Style::new().fg(colors::MUTED),
            );
            return;
        }

        let active = self.lyrics.active_index();
        let rows = visible_range(lines.len(), active.unwrap_or(0), inner.height as usize);
        let top = inner.y + (inner.height as usize).saturating_sub(rows.len()) as u16 / 2;

        for (row, index) in rows.enumerate() {
            let style = if Some(index) == active {
                Style::new()
                    .fg(colors::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::new().fg(colors::NEUTRAL)
            };
            centered_line(buf, inner, top + row as u16, &lines[index].text, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lyrics_are_shown_whole() {
        assert_eq!(visible_range(3, 2, 10), 0..3);
    }

    #[test]
    fn focus_stays_in_the_middle() {
        assert_eq!(visible_range(20, 10, 5), 8..13);
    }

    #[test]
    fn window_sticks_to_the_edges() {
        assert_eq!(visible_range(20, 0, 5), 0..5);
        assert_eq!(visible_range(20, 19, 5), 15..20);
    }

    #[test]
    fn empty_lyrics_say_so() {
        let lyrics = LyricsSync::new();
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);

        LyricsWidget::new(&lyrics).render(area, &mut buf);

        let middle: String = (1..29).map(|x| buf[(x, 2)].symbol()).collect();
        assert_eq!(middle.trim(), "Lyrics not available");
    }
}
