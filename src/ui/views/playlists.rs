use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::border,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::{
    event::events::Event,
    playlist::PlaylistSummary,
    ui::{
        components::spinner::Spinner,
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::colors,
};

/// Drawer listing the user's own playlists. Picking one adds the current
/// track to it.
#[derive(Default)]
pub struct Playlists {
    pub list_state: ListState,
    pub fetch_handle: Option<JoinHandle<()>>,
}

impl Drop for Playlists {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
    }
}

fn playlists(state: &AppState) -> &[PlaylistSummary] {
    state.data.playlists.as_deref().unwrap_or_default()
}

#[async_trait]
impl View for Playlists {
    async fn on_mount(&mut self, ctx: &AppContext) {
        let picker = ctx.picker.clone();
        let tx = ctx.event_tx.clone();
        let handle = tokio::spawn(async move {
            match picker.owned_playlists().await {
                Ok(playlists) => {
                    let _ = tx.send(Event::PlaylistsFetched(playlists));
                }
                Err(e) => {
                    warn!("Failed to load playlists: {e}");
                    let _ = tx.send(Event::UserError("Could not load playlists".to_string()));
                }
            }
        });
        self.fetch_handle = Some(handle);
    }

    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::new().fg(colors::PRIMARY))
            .style(Style::new().bg(colors::BACKGROUND))
            .title(" Add to a Playlist ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let Some(playlists) = state.data.playlists.as_deref() else {
            let spinner = Spinner::new("Loading playlists...").style(Style::new().fg(colors::PRIMARY));
            f.render_widget(spinner, inner);
            return;
        };

        if playlists.is_empty() {
            let empty = Paragraph::new("You don't own any playlists")
                .style(Style::new().fg(colors::MUTED))
                .alignment(Alignment::Center);
            f.render_widget(empty, inner);
            return;
        }

        let items: Vec<ListItem> = playlists
            .iter()
            .map(|playlist| {
                ListItem::new(format!("{} ({} tracks)", playlist.name, playlist.track_count))
            })
            .collect();

        let list = List::new(items)
            .style(Style::new().fg(colors::ACCENT))
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }

        f.render_stateful_widget(list, inner, &mut self.list_state);
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let playlists = playlists(state);
        let len = playlists.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    let i = self
                        .list_state
                        .selected()
                        .map_or(0, |i| if i >= len - 1 { i } else { i + 1 });
                    self.list_state.select(Some(i));
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if len > 0 {
                    let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
                    self.list_state.select(Some(i));
                }
                None
            }
            KeyCode::Char('g') => {
                if len > 0 {
                    self.list_state.select(Some(0));
                }
                None
            }
            KeyCode::Char('G') => {
                if len > 0 {
                    self.list_state.select(Some(len - 1));
                }
                None
            }
            KeyCode::Enter => {
                let playlist = playlists.get(self.list_state.selected().unwrap_or(0))?;
                Some(Action::CloseWith(Event::AddToPlaylist {
                    playlist_id: playlist.id.clone(),
                    playlist_name: playlist.name.clone(),
                }))
            }
            _ => None,
        }
    }

    fn on_event(&mut self, event: &Event) {
        if let Event::PlaylistsFetched(playlists) = event {
            let last = playlists.len().checked_sub(1);
            let selected = self.list_state.selected().zip(last).map(|(i, l)| i.min(l));
            self.list_state.select(selected);
        }
    }
}
