//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: session state, keyboard event loop, pane focus, the command
//!   prompt and its overwrite-confirmation mode
//! - **[`panes`]**: stateless render functions for each visible pane (blocks,
//!   bytes, pointers, output, prompt, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Session`] and call [`App::run`] to start the event loop.
//!
//! [`Session`]: crate::commands::Session
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
