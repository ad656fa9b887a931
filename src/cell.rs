//! Cell Accumulation
//!
//! Lines are broken into pixel cells carrying the `cover` (signed height
//! of the line crossing the cell) and `area` (twice the signed area to the
//! left of the line inside the cell).  Coordinates are in subpixel units,
//! see [`POLY_SUBPIXEL_SHIFT`](../constant.POLY_SUBPIXEL_SHIFT.html).

use crate::POLY_SUBPIXEL_SCALE;
use crate::POLY_SUBPIXEL_SHIFT;
use crate::POLY_SUBPIXEL_MASK;

use std::cmp::min;
use std::cmp::max;

#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Cell { // cell_aa
    pub x: i64,
    pub y: i64,
    pub cover: i64,
    pub area: i64,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new()
    }
}

impl Cell {
    pub fn new() -> Self {
        Cell { x: i64::MAX,
               y: i64::MAX,
               cover: 0,
               area: 0
        }
    }
    pub fn at(x: i64, y: i64) -> Self {
        Cell { x, y, cover: 0, area: 0 }
    }
    pub fn equal(&self, x: i64, y: i64) -> bool {
        self.x == x && self.y == y
    }
    pub fn is_empty(&self) -> bool {
        self.cover == 0 && self.area == 0
    }
}

/// Cell storage for a single outline
///
/// Storage is retained between outlines, `reset` only clears it
#[derive(Debug)]
pub struct RasterizerCell {
    /// Finished cells, unsorted
    cells: Vec<Cell>,
    /// Cell currently receiving cover and area
    curr_cell: Cell,
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
    /// Cells bucketed by row, `min_y` is row 0
    sorted_y: Vec<Vec<Cell>>,
    /// Rows of `sorted_y` holding cells of the current outline
    used_rows: usize,
    sorted: bool,
}

impl Default for RasterizerCell {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizerCell {
    pub fn new() -> Self {
        Self { cells: vec![],
               curr_cell: Cell::new(),
               min_x: i64::MAX,
               min_y: i64::MAX,
               max_x: i64::MIN,
               max_y: i64::MIN,
               sorted_y: vec![],
               used_rows: 0,
               sorted: false,
        }
    }
    pub fn reset(&mut self) {
        self.max_x = i64::MIN;
        self.max_y = i64::MIN;
        self.min_x = i64::MAX;
        self.min_y = i64::MAX;
        self.curr_cell = Cell::new();
        self.cells.clear();
        self.sorted_y[..self.used_rows].iter_mut().for_each(|row| row.clear());
        self.used_rows = 0;
        self.sorted = false;
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }
    /// Number of rows between `min_y` and `max_y` after sorting
    pub fn rows(&self) -> usize {
        self.used_rows
    }
    /// Distribute cells into rows and sort each row by x
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }
        self.add_curr_cell();
        self.curr_cell = Cell::new();
        self.sorted = true;
        if self.cells.is_empty() {
            return;
        }
        let rows = (self.max_y - self.min_y + 1) as usize;
        if self.sorted_y.len() < rows {
            self.sorted_y.resize_with(rows, Vec::new);
        }
        self.used_rows = rows;
        for c in self.cells.iter() {
            self.sorted_y[(c.y - self.min_y) as usize].push(*c);
        }
        for row in self.sorted_y[..rows].iter_mut() {
            row.sort_by_key(|c| c.x);
        }
        tracing::trace!(cells = self.cells.len(), rows, "sort cells");
    }
    /// Cells on row `y`, sorted by x
    ///
    /// Only valid after [`sort_cells`](#method.sort_cells)
    pub fn scanline_cells(&self, y: i64) -> &[Cell] {
        if y < self.min_y || y > self.max_y {
            return &[];
        }
        self.sorted_y.get((y - self.min_y) as usize)
            .map(|row| row.as_slice())
            .unwrap_or(&[])
    }

    fn add_curr_cell(&mut self) {
        if !self.curr_cell.is_empty() {
            self.cells.push(self.curr_cell);
        }
    }
    fn set_curr_cell(&mut self, x: i64, y: i64)  {
        if !self.curr_cell.equal(x, y) {
            self.add_curr_cell();
            self.curr_cell = Cell::at(x,y);
        }
    }

    fn render_hline(&mut self, ey: i64, x1: i64, y1: i64, x2: i64, y2: i64) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1  & POLY_SUBPIXEL_MASK;
        let fx2 = x2  & POLY_SUBPIXEL_MASK;

        // Horizontal Line
        if y1 == y2 {
            self.set_curr_cell(ex2, ey);
            return;
        }

        // Single Cell
        if ex1 == ex2 {
            let delta = y2 - y1;
            self.curr_cell.cover += delta;
            self.curr_cell.area  += (fx1 + fx2) * delta;
            return;
        }
        // Adjacent Cells on Same Line
        let (mut p, first, incr, dx) = if x2-x1 < 0 {
            (fx1 * (y2-y1), 0,-1, x1-x2)
        } else {
            ((POLY_SUBPIXEL_SCALE - fx1) * (y2-y1), POLY_SUBPIXEL_SCALE, 1, x2-x1)
        };
        let mut delta = p / dx;
        let mut xmod =  p % dx;

        if xmod < 0 {
            delta -= 1;
            xmod += dx;
        }
        self.curr_cell.cover += delta;
        self.curr_cell.area  += (fx1 + first) * delta;

        let mut ex1 = ex1 + incr;
        self.set_curr_cell(ex1, ey);
        let mut y1 = y1 + delta;

        if ex1 != ex2 {
            p = POLY_SUBPIXEL_SCALE * (y2 - y1 + delta);
            let mut lift = p / dx;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            xmod -= dx;

            while ex1 != ex2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dx;
                    delta += 1;
                }
                self.curr_cell.cover += delta;
                self.curr_cell.area  += POLY_SUBPIXEL_SCALE * delta;
                y1 += delta;
                ex1 += incr;
                self.set_curr_cell(ex1, ey);
            }
        }
        delta = y2-y1;
        self.curr_cell.cover += delta;
        self.curr_cell.area  += (fx2 + POLY_SUBPIXEL_SCALE - first) * delta;
    }

    /// Accumulate a line from (x1,y1) to (x2,y2), subpixel coordinates
    pub fn line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        let dx_limit = 16384 << POLY_SUBPIXEL_SHIFT;
        let dx = x2 - x1;
        // Split long lines in half
        if dx >= dx_limit || dx <= -dx_limit {
            let cx = (x1 + x2) / 2;
            let cy = (y1 + y2) / 2;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }
        self.sorted = false;
        let dy = y2-y1;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 &  POLY_SUBPIXEL_MASK;
        let fy2 = y2 &  POLY_SUBPIXEL_MASK;

        self.min_x = min(ex2, min(ex1, self.min_x));
        self.min_y = min(ey2, min(ey1, self.min_y));
        self.max_x = max(ex2, max(ex1, self.max_x));
        self.max_y = max(ey2, max(ey1, self.max_y));

        self.set_curr_cell(ex1, ey1);
        // Everything on a single scanline
        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        // Vertical line, one cell per row, no render_hline needed
        if dx == 0 {
            let ex = x1 >> POLY_SUBPIXEL_SHIFT;
            let two_fx = (x1 - (ex << POLY_SUBPIXEL_SHIFT)) << 1;

            let (first, incr) = if dy < 0 {
                (0, -1)
            } else {
                (POLY_SUBPIXEL_SCALE, 1)
            };
            let delta = first - fy1;
            self.curr_cell.cover += delta;
            self.curr_cell.area  += two_fx * delta;

            let mut ey1 = ey1 + incr;
            self.set_curr_cell(ex, ey1);
            let delta = first + first - POLY_SUBPIXEL_SCALE;
            let area = two_fx * delta;
            while ey1 != ey2 {
                self.curr_cell.cover = delta;
                self.curr_cell.area = area;
                ey1 += incr;
                self.set_curr_cell(ex, ey1);
            }
            let delta = fy2 - POLY_SUBPIXEL_SCALE + first;
            self.curr_cell.cover += delta;
            self.curr_cell.area += two_fx * delta;
            return;
        }
        // Render Multiple Lines
        let (p,first,incr, dy) = if dy < 0 {
            (fy1 * dx, 0, -1, -dy)
        } else {
            ((POLY_SUBPIXEL_SCALE - fy1) * dx, POLY_SUBPIXEL_SCALE, 1, dy)
        };
        let mut delta = p / dy;
        let mut xmod  = p % dy;
        if xmod < 0 {
            delta -= 1;
            xmod += dy;
        }
        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);
        let mut ey1 = ey1 + incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
        if ey1 != ey2 {
            let p = POLY_SUBPIXEL_SCALE * dx;
            let mut lift = p / dy;
            let mut rem  = p % dy;
            if rem < 0 {
                lift -= 1;
                rem += dy;
            }
            xmod -= dy;
            while ey1 != ey2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dy;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x_to, first);
                x_from = x_to;
                ey1 += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x2, fy2);
    }
}
