use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::{
    event::events::Event,
    playback::RepeatState,
    prefs::Preference,
    ui::{
        context::AppContext,
        state::AppState,
        traits::{Action, Overlay, View},
    },
    util::colors,
};

/// Menu entries for the current state. Labels describe what selecting the
/// entry will do.
pub fn menu_items(state: &AppState) -> Vec<(String, Action)> {
    let transport = &state.data.transport;

    let repeat = match transport.repeat {
        RepeatState::Off => "Enable Repeat",
        RepeatState::Context => "Enable Repeat One",
        RepeatState::Track => "Disable Repeat",
    };
    let shuffle = if transport.is_shuffled {
        "Disable Shuffle"
    } else {
        "Enable Shuffle"
    };

    let mut items = vec![
        (repeat.to_string(), Action::CloseWith(Event::CycleRepeat)),
        (shuffle.to_string(), Action::CloseWith(Event::ToggleShuffle)),
    ];

    if state.prefs.get(Preference::LyricsMenu) {
        let lyrics = if state.data.lyrics.is_visible() {
            "Hide Lyrics"
        } else {
            "Show Lyrics"
        };
        items.push((lyrics.to_string(), Action::CloseWith(Event::ToggleLyrics)));
    }

    items.push((
        "Add to a Playlist".to_string(),
        Action::Open(Overlay::Playlists),
    ));
    items.push(("Settings".to_string(), Action::Open(Overlay::Settings)));
    items
}

#[derive(Default)]
pub struct Menu {
    list_state: ListState,
}

#[async_trait]
impl View for Menu {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        let items: Vec<ListItem> = menu_items(state)
            .into_iter()
            .map(|(label, _)| ListItem::new(label))
            .collect();

        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED)
                    .border_style(Style::new().fg(colors::PRIMARY))
                    .title(" Menu "),
            )
            .style(Style::new().fg(colors::ACCENT).bg(colors::BACKGROUND))
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let items = menu_items(state);
        let selected = self.list_state.selected().unwrap_or(0).min(items.len() - 1);

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.list_state
                    .select(Some((selected + 1).min(items.len() - 1)));
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_state.select(Some(selected.saturating_sub(1)));
                None
            }
            KeyCode::Enter => items.into_iter().nth(selected).map(|(_, action)| action),
            KeyCode::Char('m') | KeyCode::Char('q') => Some(Action::Close),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{app_context, app_state, key};

    fn labels(state: &AppState) -> Vec<String> {
        menu_items(state).into_iter().map(|(label, _)| label).collect()
    }

    #[test]
    fn labels_follow_the_repeat_cycle() {
        let mut state = app_state();
        assert_eq!(labels(&state)[0], "Enable Repeat");

        state.data.transport.repeat = RepeatState::Context;
        assert_eq!(labels(&state)[0], "Enable Repeat One");

        state.data.transport.repeat = RepeatState::Track;
        assert_eq!(labels(&state)[0], "Disable Repeat");
    }

    #[test]
    fn lyrics_entry_depends_on_the_preference() {
        let mut state = app_state();
        assert_eq!(
            labels(&state),
            vec![
                "Enable Repeat",
                "Enable Shuffle",
                "Show Lyrics",
                "Add to a Playlist",
                "Settings"
            ]
        );

        state.prefs.set(Preference::LyricsMenu, false).unwrap();
        assert!(!labels(&state).contains(&"Show Lyrics".to_string()));
    }

    #[tokio::test]
    async fn enter_runs_the_selected_entry() {
        let mut state = app_state();
        state.data.transport.is_shuffled = true;
        let ctx = app_context();
        let mut menu = Menu::default();

        menu.handle_input(key(KeyCode::Down), &state, &ctx).await;
        let action = menu.handle_input(key(KeyCode::Enter), &state, &ctx).await;

        assert!(matches!(
            action,
            Some(Action::CloseWith(Event::ToggleShuffle))
        ));
        assert_eq!(labels(&state)[1], "Disable Shuffle");
    }
}
