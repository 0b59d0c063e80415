//! TUI pane rendering modules
//!
//! - [`code`]: C or C++ source display with syntax highlighting and line numbers
//! - [`status`]: Status bar with keybindings, strategy and the last message
//!
//! Each pane module exports a `render_*` function that draws into a frame
//! area from borrowed state; scroll offsets are clamped while rendering.

pub mod code;
pub mod status;

pub use code::{render_code_pane, CodePane};
pub use status::{render_status_bar, StatusRenderData};
