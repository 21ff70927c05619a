pub mod confirm;
pub mod menu;
pub mod now_playing;
pub mod playlists;
pub mod settings;

pub use confirm::ConfirmDuplicate;
pub use menu::Menu;
pub use now_playing::NowPlaying;
pub use playlists::Playlists;
pub use settings::Settings;

use crate::ui::{
    state::AppState,
    traits::{Overlay, View},
};

pub fn build(kind: Overlay, state: &AppState) -> Box<dyn View> {
    match kind {
        Overlay::Menu => Box::new(Menu::default()),
        Overlay::Playlists => Box::new(Playlists::default()),
        Overlay::ConfirmDuplicate => Box::new(ConfirmDuplicate::new(state)),
        Overlay::Settings => Box::new(Settings::default()),
    }
}
