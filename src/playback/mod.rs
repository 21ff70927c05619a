pub mod snapshot;
pub mod sync;
pub mod transport;

pub use snapshot::{PlaybackSnapshot, RepeatState};
