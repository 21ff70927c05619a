pub mod parser;
pub mod sync;

pub use parser::{LyricLine, parse_lrc};
pub use sync::{LyricsQuery, LyricsSync};
