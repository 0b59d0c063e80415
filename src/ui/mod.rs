//! Terminal viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! Shows the C source and the generated C++ side by side:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, file actions
//! - **[`panes`]**: stateless render functions for the code panes and the status bar
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! Construct an [`App`] from an input file and call [`App::run`] to start the
//! event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
