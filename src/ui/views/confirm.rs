use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    event::events::Event,
    ui::{
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::colors,
};

/// Asks before adding a track that the playlist already holds.
pub struct ConfirmDuplicate {
    message: String,
    add_selected: bool,
}

impl ConfirmDuplicate {
    pub fn new(state: &AppState) -> Self {
        let message = match &state.data.pending_add {
            Some(pending) => {
                let track = state
                    .data
                    .playback
                    .current_item()
                    .filter(|item| item.id == pending.track_id)
                    .map_or("This track", |item| item.name.as_str());
                format!("{track} is already in {}.", pending.playlist_name)
            }
            None => "This track is already in the playlist.".to_string(),
        };

        Self {
            message,
            add_selected: false,
        }
    }

    fn button(label: &str, selected: bool) -> Span<'static> {
        let text = format!("[ {label} ]");
        if selected {
            text.fg(colors::BACKGROUND)
                .bg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            text.fg(colors::ACCENT)
        }
    }
}

#[async_trait]
impl View for ConfirmDuplicate {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::new().fg(colors::PRIMARY))
            .style(Style::new().bg(colors::BACKGROUND))
            .title(" Already added ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let [message, _, buttons] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        f.render_widget(
            Paragraph::new(self.message.as_str())
                .style(Style::new().fg(colors::ACCENT))
                .wrap(Wrap { trim: true })
                .centered(),
            message,
        );
        f.render_widget(
            Line::from(vec![
                Self::button("Add anyway", self.add_selected),
                Span::raw("  "),
                Self::button("Cancel", !self.add_selected),
            ])
            .centered(),
            buttons,
        );
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                self.add_selected = !self.add_selected;
                None
            }
            KeyCode::Char('y') => Some(Action::CloseWith(Event::AddAnyway)),
            KeyCode::Char('n') => Some(Action::CloseWith(Event::CancelAdd)),
            KeyCode::Enter if self.add_selected => Some(Action::CloseWith(Event::AddAnyway)),
            KeyCode::Enter => Some(Action::CloseWith(Event::CancelAdd)),
            _ => None,
        }
    }
}
