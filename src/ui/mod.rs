pub mod app;
pub mod state;
pub mod components;

pub use app::{Renderer, TerminalRenderer};
pub use state::RateTracker;
