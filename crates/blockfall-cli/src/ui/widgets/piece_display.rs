use blockfall_engine::{Block, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::BlockDisplay;

/// Preview of a piece kind in its spawn orientation.
///
/// Only the matrix rows holding a cell are drawn, so every kind fits in a
/// 4×2 panel.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// The non-empty rows of `kind`'s shape matrix.
fn visible_rows(kind: PieceKind) -> Vec<Vec<bool>> {
    kind.shape()
        .rows()
        .filter(|row| row.contains(&true))
        .map(<[bool]>::to_vec)
        .collect()
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let rows = visible_rows(piece);
        let cols = rows.first().map_or(0, Vec::len);

        let piece_area = area.centered(
            Constraint::Length(super::cells(cols, BlockDisplay::width())),
            Constraint::Length(super::cells(rows.len(), BlockDisplay::height())),
        );
        let col_constraints = (0..cols).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..rows.len()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let occupied_block = BlockDisplay::from_block(Block::Piece(piece), false);
        let empty_block = BlockDisplay::from_block(Block::Empty, false);
        for (grid_row, row) in piece_area.layout_vec(&vertical).into_iter().zip(&rows) {
            for (grid_cell, &occupied) in grid_row.layout_vec(&horizontal).into_iter().zip(row) {
                let block = if occupied {
                    &occupied_block
                } else {
                    &empty_block
                };
                Widget::render(block, grid_cell, buf);
            }
        }
    }
}
