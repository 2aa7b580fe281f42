//! Character-cell canvas
//!
//! Each cell is lit when its center falls inside a filled shape. Good
//! enough to eyeball terrain and resting bodies in a terminal.

use glam::Vec2;

use super::{Canvas, Style};
use crate::sim::region::point_in_polygon;

pub struct AsciiCanvas {
    cols: usize,
    rows: usize,
    /// Domain units covered by one cell
    cell: Vec2,
    cells: Vec<char>,
}

impl AsciiCanvas {
    /// A `cols x rows` grid covering `domain` (width, height)
    pub fn new(cols: usize, rows: usize, domain: Vec2) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cell: domain / Vec2::new(cols as f32, rows as f32),
            cells: vec![' '; cols * rows],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn glyph(style: Style) -> char {
        match style {
            Style::Ground => '#',
            Style::LandingPad => '=',
            Style::Body => '@',
            Style::Probe => '+',
            Style::Trail => '.',
        }
    }

    fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(col as f32 + 0.5, row as f32 + 0.5) * self.cell
    }

    fn cell_at(&self, p: Vec2) -> Option<usize> {
        let c = p / self.cell;
        if c.x < 0.0 || c.y < 0.0 {
            return None;
        }
        let (col, row) = (c.x as usize, c.y as usize);
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }

    /// Glyph at a cell, for inspection
    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    pub fn render(&self) -> String {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Canvas for AsciiCanvas {
    fn fill_polygon(&mut self, points: &[Vec2], style: Style) {
        if points.len() < 3 {
            return;
        }
        let glyph = Self::glyph(style);
        let (lo, hi) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), &p| (lo.min(p), hi.max(p)),
        );

        let first = (lo / self.cell).floor().max(Vec2::ZERO);
        let last = (hi / self.cell).ceil();
        let col_end = (last.x.max(0.0) as usize).min(self.cols);
        let row_end = (last.y.max(0.0) as usize).min(self.rows);

        for row in first.y as usize..row_end {
            for col in first.x as usize..col_end {
                if point_in_polygon(points, self.cell_center(col, row)) {
                    self.cells[row * self.cols + col] = glyph;
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: Style) {
        let glyph = Self::glyph(style);
        let step = self.cell.min_element() * 0.5;
        let steps = ((to - from).length() / step).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            if let Some(idx) = self.cell_at(p) {
                self.cells[idx] = glyph;
            }
        }
    }

    fn fill_marker(&mut self, at: Vec2, style: Style) {
        if let Some(idx) = self.cell_at(at) {
            self.cells[idx] = Self::glyph(style);
        }
    }
}
