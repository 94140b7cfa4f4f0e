use std::{
    io,
    time::{Duration, Instant},
};

use crate::{
    App, DropTimer,
    event::LoopEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Terminal application runtime.
///
/// Owns the event loop and its [`DropTimer`], and executes applications that
/// implement the [`App`] trait.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the drop timer, replacing any previous period.
    pub fn start_drop_timer(&mut self, interval: Duration) {
        self.events.timer_mut().start(interval, Instant::now());
    }

    pub fn suspend_drop_timer(&mut self) {
        self.events.timer_mut().suspend();
    }

    pub fn resume_drop_timer(&mut self) {
        self.events.timer_mut().resume(Instant::now());
    }

    /// Runs the drop timer iff `running` is true.
    pub fn set_drop_timer_running(&mut self, running: bool) {
        self.events
            .timer_mut()
            .set_running(running, Instant::now());
    }

    pub fn cancel_drop_timer(&mut self) {
        self.events.timer_mut().cancel();
    }

    #[must_use]
    pub fn drop_timer(&self) -> &DropTimer {
        self.events.timer()
    }

    /// Sets the render mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `LoopEvent::Tick`: calls `app.update()`
    ///    - `LoopEvent::Render`: calls `app.draw()`
    ///    - `LoopEvent::Crossterm`: calls `app.handle_event()`
    /// 3. Cancels the drop timer and calls `app.close()`, also when the loop
    ///    failed
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        let result = ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    LoopEvent::Tick => {
                        app.update(&mut self);
                    }
                    LoopEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    LoopEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        });

        self.teardown(app);
        result
    }

    fn teardown<A>(&mut self, app: &mut A)
    where
        A: App,
    {
        self.cancel_drop_timer();
        app.close(self);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::Event;
    use ratatui::Frame;

    use super::*;

    #[derive(Debug, Default)]
    struct ClosingApp {
        timer_running_at_close: Option<bool>,
    }

    impl App for ClosingApp {
        fn init(&mut self, runtime: &mut Runtime) {
            runtime.start_drop_timer(Duration::from_secs(1));
        }

        fn should_exit(&self) -> bool {
            true
        }

        fn handle_event(&mut self, _runtime: &mut Runtime, _event: Event) {}

        fn update(&mut self, _runtime: &mut Runtime) {}

        fn draw(&self, _frame: &mut Frame) {}

        fn close(&mut self, runtime: &mut Runtime) {
            self.timer_running_at_close = Some(runtime.drop_timer().is_running());
        }
    }

    #[test]
    fn test_drop_timer_controls() {
        let mut runtime = Runtime::new();
        assert!(!runtime.drop_timer().is_running());

        runtime.start_drop_timer(Duration::from_millis(250));
        assert!(runtime.drop_timer().is_running());

        runtime.set_drop_timer_running(false);
        assert!(!runtime.drop_timer().is_running());
        runtime.resume_drop_timer();
        assert!(runtime.drop_timer().is_running());
        runtime.suspend_drop_timer();
        runtime.set_drop_timer_running(true);
        assert!(runtime.drop_timer().is_running());

        runtime.cancel_drop_timer();
        runtime.resume_drop_timer();
        assert!(!runtime.drop_timer().is_running());
        assert_eq!(runtime.drop_timer().interval(), None);
    }

    #[test]
    fn test_teardown_cancels_timer_before_close() {
        let mut runtime = Runtime::new();
        let mut app = ClosingApp::default();
        app.init(&mut runtime);
        assert!(runtime.drop_timer().is_running());

        runtime.teardown(&mut app);
        assert_eq!(app.timer_running_at_close, Some(false));
        assert_eq!(runtime.drop_timer(), &DropTimer::new());
    }
}
