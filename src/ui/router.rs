use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::widgets::Clear;

use crate::event::events::Event;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, Overlay, View};

/// The player view with at most one secondary panel on top of it.
pub struct Router {
    pub base: Box<dyn View>,
    pub overlay: Option<(Overlay, Box<dyn View>)>,
}

impl Router {
    pub fn new(base: Box<dyn View>) -> Self {
        Self {
            base,
            overlay: None,
        }
    }

    /// Replaces any open overlay.
    pub async fn set_overlay(&mut self, kind: Overlay, mut view: Box<dyn View>, ctx: &AppContext) {
        view.on_mount(ctx).await;
        self.overlay = Some((kind, view));
    }

    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn overlay_kind(&self) -> Option<Overlay> {
        self.overlay.as_ref().map(|(kind, _)| *kind)
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        self.base.render(f, area, state);

        if let Some((kind, overlay)) = &mut self.overlay {
            let popup = popup_area(area, *kind);
            f.render_widget(Clear, popup);
            overlay.render(f, popup, state);
        }
    }

    pub async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match &mut self.overlay {
            Some((_, overlay)) => overlay.handle_input(key, state, ctx).await,
            None => self.base.handle_input(key, state, ctx).await,
        }
    }

    pub fn on_event(&mut self, event: &Event) {
        self.base.on_event(event);

        if let Some((_, overlay)) = &mut self.overlay {
            overlay.on_event(event);
        }
    }
}

fn popup_area(area: Rect, kind: Overlay) -> Rect {
    let (width, height) = match kind {
        Overlay::Menu => (32, 9),
        Overlay::Playlists => (48, 18),
        Overlay::ConfirmDuplicate => (52, 7),
        Overlay::Settings => (60, 12),
    };

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
