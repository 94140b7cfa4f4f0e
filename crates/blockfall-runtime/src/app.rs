use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for applications driven by [`Runtime::run`].
pub trait App {
    /// Called once before the first event. Start the drop timer here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Called each time the drop timer fires.
    fn update(&mut self, runtime: &mut Runtime);

    fn draw(&self, frame: &mut Frame);

    /// Called once on teardown, after the drop timer has been cancelled.
    ///
    /// Runs whether the loop ended normally or with an I/O error.
    fn close(&mut self, runtime: &mut Runtime);
}
