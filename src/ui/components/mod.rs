pub mod controls;
pub mod lyrics;
pub mod progress;
pub mod spinner;
pub mod track_info;
