use std::iter;

use blockfall_engine::BlockBoard;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::BlockDisplay;

/// The playfield, sized from the board's own dimensions.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: BlockBoard,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    /// `board` should already have the current piece composited onto it.
    pub fn new(board: BlockBoard) -> Self {
        Self { board, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::cells(self.board.width(), BlockDisplay::width())
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells(self.board.height(), BlockDisplay::height())
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.board.rows()) {
            for (grid_cell, block) in iter::zip(grid_row, row) {
                BlockDisplay::from_block(*block, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Block, PieceKind};
    use ratatui::widgets::Block as BlockWidget;

    use super::*;

    #[test]
    fn test_size_follows_board() {
        let display = BoardDisplay::new(BlockBoard::empty(10, 20));
        assert_eq!((display.width(), display.height()), (20, 20));

        let display = BoardDisplay::new(BlockBoard::empty(6, 8)).block(BlockWidget::bordered());
        assert_eq!((display.width(), display.height()), (14, 10));
    }

    #[test]
    fn test_render_cells() {
        let board = BlockBoard::parse(["T....", "....."]).unwrap();
        assert_eq!(board.get(0, 0), Some(Block::Piece(PieceKind::T)));

        let display = BoardDisplay::new(board);
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        let purple = crate::ui::widgets::style::piece(PieceKind::T);
        assert_eq!(buf[(0, 0)].bg, purple.bg.unwrap());
        assert_eq!(buf[(1, 0)].bg, purple.bg.unwrap());
        // empty cells show a dot centered in their two columns
        assert_eq!(buf[(2, 1)].symbol(), " ");
        assert_eq!(buf[(3, 1)].symbol(), ".");
    }
}
