pub mod colors;
pub mod hook;
pub mod log;
pub mod marquee;
pub mod task;
