use blockfall_engine::GameState;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Color,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, ScoreDisplay, color, style};

/// Board, score panel and next-piece preview, with a banner while paused or
/// after game over.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    state: &'a GameState,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self {
            state,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn border_color(&self) -> Color {
        if self.state.is_game_over() {
            color::RED
        } else if self.state.is_paused() {
            color::YELLOW
        } else {
            color::WHITE
        }
    }

    fn board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.state.render_board()).block(
            Block::bordered()
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    fn panel(&self, title: &'a str) -> Block<'a> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::symmetric(
                self.horizontal_padding,
                self.vertical_padding,
            ))
            .border_style(self.border_color())
            .style(style::DEFAULT)
    }

    /// Rows needed to show the whole board.
    pub fn height(&self) -> u16 {
        self.board().height()
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.board();
        let score_panel = ScoreDisplay::new(self.state).block(self.panel("SCORE"));
        let next_panel = {
            let panel = PieceDisplay::new().block(self.panel("NEXT"));
            match self.state.next_piece() {
                Some(kind) => panel.piece(kind),
                None => panel,
            }
        };

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(score_panel.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [score_area] =
            Layout::vertical([Constraint::Length(score_panel.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        score_panel.render(score_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = if self.state.is_game_over() {
            Some(("GAME OVER!!", style::GAME_OVER))
        } else if self.state.is_paused() {
            Some(("PAUSED", style::PAUSED))
        } else {
            None
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Command, Engine, GameConfig, SequencePieceSource};

    use super::*;

    fn render(state: &GameState) -> Buffer {
        let area = Rect::new(0, 0, 60, 24);
        let mut buf = Buffer::empty(area);
        GameDisplay::new(state).render(area, &mut buf);
        buf
    }

    fn contains(buf: &Buffer, needle: &str) -> bool {
        let area = buf.area;
        (area.top()..area.bottom()).any(|y| {
            let line: String = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect();
            line.contains(needle)
        })
    }

    #[test]
    fn test_banners() {
        let mut engine =
            Engine::new(GameConfig::default(), "TO".parse::<SequencePieceSource>().unwrap())
                .unwrap();
        let state = engine.reset();
        let buf = render(&state);
        assert!(contains(&buf, "SCORE"));
        assert!(contains(&buf, "NEXT"));
        assert!(!contains(&buf, "PAUSED"));

        let paused = engine.apply_command(&state, Command::TogglePause);
        assert!(contains(&render(&paused), "PAUSED"));
    }
}
