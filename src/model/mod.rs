pub mod board;
pub mod config;
pub mod sample;
pub mod task;

pub use board::*;
pub use config::*;
pub use sample::*;
pub use task::*;
