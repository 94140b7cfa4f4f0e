//! Terminal driver for the game: a suspendable drop timer and a
//! run-to-completion event loop around [`ratatui`].
//!
//! Timer firings, terminal input and redraws are delivered one at a time, in
//! the order they are observed. An [`App`] reacts to each and reconfigures the
//! [`DropTimer`] through the [`Runtime`] it is handed.

pub use self::{app::App, drop_timer::DropTimer, event_loop::RenderMode, runtime::Runtime};

mod app;
mod drop_timer;
mod event;
mod event_loop;
mod runtime;
