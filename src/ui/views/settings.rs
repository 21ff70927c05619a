use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Text},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::{
    event::events::Event,
    prefs::Preference,
    ui::{
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::colors,
};

/// One row per preference, then sign-out.
const ROWS: usize = Preference::ALL.len() + 1;

#[derive(Default)]
pub struct Settings {
    list_state: ListState,
}

impl Settings {
    fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0).min(ROWS - 1)
    }
}

#[async_trait]
impl View for Settings {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        let mut items: Vec<ListItem> = Preference::ALL
            .iter()
            .map(|&preference| {
                let mark = if state.prefs.get(preference) { "[x]" } else { "[ ]" };
                ListItem::new(Text::from(vec![
                    Line::from(format!("{mark} {}", preference.label())),
                    Line::from(format!("    {}", preference.description()).fg(colors::MUTED)),
                ]))
            })
            .collect();
        items.push(ListItem::new("Sign Out".fg(colors::ERROR)));

        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED)
                    .border_style(Style::new().fg(colors::PRIMARY))
                    .title(" Settings "),
            )
            .style(Style::new().fg(colors::ACCENT).bg(colors::BACKGROUND))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let selected = self.selected();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.list_state.select(Some((selected + 1).min(ROWS - 1)));
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_state.select(Some(selected.saturating_sub(1)));
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => match Preference::ALL.get(selected) {
                Some(&preference) => Some(Action::Command(Event::TogglePreference(preference))),
                None => Some(Action::Command(Event::SignOut)),
            },
            _ => None,
        }
    }
}
