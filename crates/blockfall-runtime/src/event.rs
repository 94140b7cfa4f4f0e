use crossterm::event::Event as CrosstermEvent;

/// Events delivered by the event loop, one at a time.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum LoopEvent {
    /// The drop timer fired.
    Tick,
    /// The screen should be redrawn.
    Render,
    /// Key input, mouse, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
