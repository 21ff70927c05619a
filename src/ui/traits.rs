use async_trait::async_trait;
use ratatui::crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::{
    event::events::Event,
    ui::{context::AppContext, state::AppState},
};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    /// Run a command and keep the current overlay open.
    Command(Event),
    /// Close the overlay, then run the command.
    CloseWith(Event),
    Open(Overlay),
    Close,
}

/// The secondary panels that can sit on top of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Menu,
    Playlists,
    ConfirmDuplicate,
    Settings,
}

#[async_trait]
pub trait View: Send {
    async fn on_mount(&mut self, _ctx: &AppContext) {}

    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState);

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action>;

    fn on_event(&mut self, _event: &Event) {}
}
