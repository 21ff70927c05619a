use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::{event::events::Event, ui::traits::Action};

pub struct InputHandler;

impl InputHandler {
    /// Keys that work the same whatever panel is open.
    pub fn handle_key(key: KeyEvent) -> Option<Action> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),
            (KeyCode::Esc, _) => Some(Action::Command(Event::EscapePressed)),
            _ => None,
        }
    }

    /// Wheel volume. Ignored while an overlay is open.
    pub fn handle_mouse(mouse: MouseEvent, has_overlay: bool, step: u8) -> Option<Event> {
        if has_overlay {
            return None;
        }

        let step = i32::from(step);
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Event::VolumeBy(step)),
            MouseEventKind::ScrollDown => Some(Event::VolumeBy(-step)),
            _ => None,
        }
    }
}
