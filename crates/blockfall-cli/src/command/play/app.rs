use std::time::Duration;

use blockfall_engine::{Command, Engine, GameState, PieceSource};
use blockfall_runtime::{App, RenderMode, Runtime};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::ui::widgets::GameDisplay;

const FPS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Play(Command),
    NewGame,
    Quit,
}

impl Action {
    fn from_key(key: &KeyEvent) -> Option<Self> {
        let action = match key.code {
            KeyCode::Left => Self::Play(Command::MoveLeft),
            KeyCode::Right => Self::Play(Command::MoveRight),
            KeyCode::Down => Self::Play(Command::SoftDrop),
            KeyCode::Up => Self::Play(Command::Rotate),
            KeyCode::Char(' ') => Self::Play(Command::HardDrop),
            KeyCode::Char('p' | 'P') => Self::Play(Command::TogglePause),
            KeyCode::Char('r') => Self::NewGame,
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}

/// A single game in the terminal.
///
/// Owns the mutable slot holding the current snapshot; every key press and
/// every timer firing replaces it with the engine's result.
pub struct PlayApp<S> {
    engine: Engine<S>,
    state: GameState,
    drop_interval: Duration,
    is_exiting: bool,
}

impl<S> PlayApp<S>
where
    S: PieceSource,
{
    pub fn new(engine: Engine<S>, drop_interval: Duration) -> Self {
        let state = engine.idle();
        Self {
            engine,
            state,
            drop_interval,
            is_exiting: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn apply(&mut self, runtime: &mut Runtime, action: Action) {
        match action {
            // Nothing but a new game or quitting once the game is over.
            Action::Play(_) if self.state.is_game_over() => {}
            Action::Play(command) => {
                self.state = self.engine.apply_command(&self.state, command);
            }
            Action::NewGame => {
                self.state = self.engine.reset();
            }
            Action::Quit => {
                self.is_exiting = true;
                return;
            }
        }
        self.sync_drop_timer(runtime);
    }

    fn sync_drop_timer(&self, runtime: &mut Runtime) {
        runtime.set_drop_timer_running(self.state.accepts_ticks());
    }

    fn help_text(&self) -> &'static str {
        if self.state.is_game_over() {
            "Controls: R (New Game) | Q (Quit)"
        } else if self.state.is_paused() {
            "Controls: P (Resume) | R (New Game) | Q (Quit)"
        } else {
            "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Hard Drop) | P (Pause) | R (New Game) | Q (Quit)"
        }
    }
}

impl<S> App for PlayApp<S>
where
    S: PieceSource,
{
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        self.state = self.engine.reset();
        runtime.start_drop_timer(self.drop_interval);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(action) = Action::from_key(&key) {
            self.apply(runtime, action);
        }
    }

    fn update(&mut self, runtime: &mut Runtime) {
        self.state = self.engine.tick(&self.state);
        self.sync_drop_timer(runtime);
    }

    fn draw(&self, frame: &mut Frame) {
        let display = GameDisplay::new(&self.state);
        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(display.height()), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn close(&mut self, _runtime: &mut Runtime) {
        tracing::info!(
            score = self.state.score(),
            is_game_over = self.state.is_game_over(),
            "game closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{BlockBoard, GameConfig, SequencePieceSource};
    use crossterm::event::KeyModifiers;

    use super::*;

    fn app(sequence: &str) -> (PlayApp<SequencePieceSource>, Runtime) {
        let engine = Engine::new(GameConfig::default(), sequence.parse().unwrap()).unwrap();
        let mut app = PlayApp::new(engine, Duration::from_millis(500));
        let mut runtime = Runtime::new();
        app.init(&mut runtime);
        (app, runtime)
    }

    fn press(app: &mut PlayApp<SequencePieceSource>, runtime: &mut Runtime, code: KeyCode) {
        let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        app.handle_event(runtime, event);
    }

    #[test]
    fn test_init_starts_game_and_timer() {
        let (app, runtime) = app("TO");
        assert!(app.state().current_piece().is_some());
        assert!(runtime.drop_timer().is_running());
        assert_eq!(runtime.drop_timer().interval(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_pause_suspends_timer() {
        let (mut app, mut runtime) = app("TO");
        press(&mut app, &mut runtime, KeyCode::Char('p'));
        assert!(app.state().is_paused());
        assert!(!runtime.drop_timer().is_running());

        press(&mut app, &mut runtime, KeyCode::Char('p'));
        assert!(!app.state().is_paused());
        assert!(runtime.drop_timer().is_running());
    }

    #[test]
    fn test_pause_key_is_case_insensitive() {
        let (mut app, mut runtime) = app("TO");
        press(&mut app, &mut runtime, KeyCode::Char('P'));
        assert!(app.state().is_paused());
        assert!(!runtime.drop_timer().is_running());

        press(&mut app, &mut runtime, KeyCode::Char('p'));
        assert!(!app.state().is_paused());
    }

    #[test]
    fn test_keys_move_piece() {
        let (mut app, mut runtime) = app("TO");
        let x = app.state().current_piece().unwrap().position().x();
        press(&mut app, &mut runtime, KeyCode::Left);
        assert_eq!(app.state().current_piece().unwrap().position().x(), x - 1);

        press(&mut app, &mut runtime, KeyCode::Char(' '));
        assert_eq!(app.state().board().occupied_count(), 4);
        assert_eq!(
            app.state().current_piece().unwrap().kind(),
            blockfall_engine::PieceKind::O
        );
    }

    #[test]
    fn test_game_over_suspends_timer_and_ignores_play_keys() {
        let (mut app, mut runtime) = app("O");
        // O pieces stacked in the spawn columns reach the top after ten drops
        for _ in 0..10 {
            press(&mut app, &mut runtime, KeyCode::Char(' '));
        }
        assert!(app.state().is_game_over());
        assert!(!runtime.drop_timer().is_running());

        let over = app.state().clone();
        press(&mut app, &mut runtime, KeyCode::Char('p'));
        press(&mut app, &mut runtime, KeyCode::Left);
        assert_eq!(app.state(), &over);

        press(&mut app, &mut runtime, KeyCode::Char('r'));
        assert!(!app.state().is_game_over());
        assert_eq!(app.state().board(), &BlockBoard::empty(10, 20));
        assert!(runtime.drop_timer().is_running());
    }

    #[test]
    fn test_tick_drops_piece() {
        let (mut app, mut runtime) = app("TO");
        let y = app.state().current_piece().unwrap().position().y();
        app.update(&mut runtime);
        assert_eq!(app.state().current_piece().unwrap().position().y(), y + 1);
    }

    #[test]
    fn test_quit() {
        let (mut app, mut runtime) = app("TO");
        assert!(!app.should_exit());
        press(&mut app, &mut runtime, KeyCode::Esc);
        assert!(app.should_exit());
    }
}
