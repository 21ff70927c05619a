use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x001ed760);
pub const SECONDARY: Color = Color::from_u32(0x00168d40);
pub const NEUTRAL: Color = Color::from_u32(0x00535353);
pub const MUTED: Color = Color::from_u32(0x00a7a7a7);
pub const BACKGROUND: Color = Color::from_u32(0x00121212);
pub const ACCENT: Color = Color::from_u32(0x00ffffff);
pub const ERROR: Color = Color::from_u32(0x00f15e6c);
