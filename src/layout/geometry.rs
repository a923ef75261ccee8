use crate::foundation::core::{Point, Rect};

/// Logical grid description before placement.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    pub cell_w: f64,
    pub cell_h: f64,
    pub gap_x: f64,
    pub gap_y: f64,
    #[serde(default)]
    pub radius: f64,
}

impl GridSpec {
    pub fn square(rows: u32, cols: u32, cell: f64, gap: f64, radius: f64) -> Self {
        Self {
            rows,
            cols,
            cell_w: cell,
            cell_h: cell,
            gap_x: gap,
            gap_y: gap,
            radius,
        }
    }

    pub fn width(&self) -> f64 {
        span(self.cols, self.cell_w, self.gap_x)
    }

    pub fn height(&self) -> f64 {
        span(self.rows, self.cell_h, self.gap_y)
    }
}

fn span(n: u32, cell: f64, gap: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    f64::from(n) * cell + f64::from(n - 1) * gap
}

/// A placed grid: every cell rectangle is derived from `origin` and the (possibly scaled) spec.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub origin: Point,
    pub spec: GridSpec,
    /// Margin reserved around every cell for glow effects.
    pub halo: f64,
}

impl GridGeometry {
    pub fn rows(&self) -> u32 {
        self.spec.rows
    }

    pub fn cols(&self) -> u32 {
        self.spec.cols
    }

    pub fn len(&self) -> usize {
        self.spec.rows as usize * self.spec.cols as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cell_rect(&self, row: u32, col: u32) -> Rect {
        let x = self.origin.x + f64::from(col) * (self.spec.cell_w + self.spec.gap_x);
        let y = self.origin.y + f64::from(row) * (self.spec.cell_h + self.spec.gap_y);
        Rect::new(x, y, x + self.spec.cell_w, y + self.spec.cell_h)
    }

    pub fn cell_center(&self, row: u32, col: u32) -> Point {
        self.cell_rect(row, col).center()
    }

    /// Row-major cell index to `(row, col)`.
    pub fn cell_at(&self, index: usize) -> (u32, u32) {
        let cols = self.spec.cols.max(1) as usize;
        ((index / cols) as u32, (index % cols) as u32)
    }

    /// Bounding box of the cells between two corners (inclusive, any order).
    pub fn span_rect(&self, r1: u32, c1: u32, r2: u32, c2: u32) -> Rect {
        self.cell_rect(r1.min(r2), c1.min(c2))
            .union(self.cell_rect(r1.max(r2), c1.max(c2)))
    }

    /// Bounding box of the whole grid, without halo.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.spec.width(),
            self.origin.y + self.spec.height(),
        )
    }

    /// Bounding box of the whole grid including the halo margin.
    pub fn bounds_with_halo(&self) -> Rect {
        self.bounds().inflate(self.halo, self.halo)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
