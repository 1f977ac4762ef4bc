//! The console view-model: session state, the controller that drives it,
//! user prompts and rendering.

pub mod controller;
pub mod prompt;
pub mod render;
pub mod state;

pub use controller::NodeController;
pub use prompt::{Prompter, TerminalPrompter};
pub use state::{ApiStatus, SessionState};
