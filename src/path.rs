//! Path Storage
//!
//! Paths are stored as two parallel sequences, commands and points.
//! Points are consumed positionally by the commands:
//!
//! | Command   | Points |
//! |-----------|--------|
//! | `MoveTo`  | 1      |
//! | `LineTo`  | 1      |
//! | `CubicTo` | 3      |
//! | `Close`   | 0      |
//!
//! # Example
//!
//!     let mut path = raster_rle::Path::new();
//!     path.move_to(0.0, 0.0);
//!     path.line_to(10.0, 0.0);
//!     path.cubic_to(15.0, 0.0, 15.0, 10.0, 10.0, 10.0);
//!     path.close();
//!     assert_eq!(path.segments(), 1);
//!     assert_eq!(path.points().len(), 5);

use crate::clip::Rectangle;

/// Path Command
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum PathCommand {
    MoveTo,
    LineTo,
    CubicTo,
    Close,
}

impl PathCommand {
    /// Number of points consumed by the command
    pub fn num_points(&self) -> usize {
        match self {
            PathCommand::MoveTo  => 1,
            PathCommand::LineTo  => 1,
            PathCommand::CubicTo => 3,
            PathCommand::Close   => 0,
        }
    }
}

/// Point in user space
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Distance between two points
pub fn len(a: &Point, b: &Point) -> f64 {
    ((a.x-b.x).powi(2) + (a.y-b.y).powi(2)).sqrt()
}
/// Cross product of (p2-p1) and (p-p2)
pub fn cross(p1: &Point, p2: &Point, p: &Point) -> f64 {
    (p.x - p2.x) * (p2.y - p1.y) - (p.y - p2.y) * (p2.x - p1.x)
}

/// Vector Path
///
/// Owned by the caller until it is moved into a rasterization request
#[derive(Debug,Default,Clone,PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
    points: Vec<Point>,
    segments: usize,
}

impl Path {
    /// Create a new, empty Path
    pub fn new() -> Self {
        Self::default()
    }
    /// Create a closed rectangle
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        let mut path = Self::new();
        path.move_to(x, y);
        path.line_to(x + w, y);
        path.line_to(x + w, y + h);
        path.line_to(x, y + h);
        path.close();
        path
    }
    /// Remove all commands and points, keeping allocated storage
    pub fn reset(&mut self) {
        self.commands.clear();
        self.points.clear();
        self.segments = 0;
    }
    /// Start a new sub-path at (x,y)
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo);
        self.points.push(Point::new(x, y));
        self.segments += 1;
    }
    /// Line from the current point to (x,y)
    ///
    /// A sub-path is started if there is no current point
    pub fn line_to(&mut self, x: f64, y: f64) {
        if self.needs_move_to() {
            self.move_to(x, y);
            return;
        }
        self.commands.push(PathCommand::LineTo);
        self.points.push(Point::new(x, y));
    }
    /// Cubic bezier from the current point through two control points
    /// to (x,y)
    pub fn cubic_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) {
        if self.needs_move_to() {
            self.move_to(cx1, cy1);
        }
        self.commands.push(PathCommand::CubicTo);
        self.points.push(Point::new(cx1, cy1));
        self.points.push(Point::new(cx2, cy2));
        self.points.push(Point::new(x, y));
    }
    /// Close the current sub-path
    ///
    /// Repeated Close commands and Close on an empty path are ignored
    pub fn close(&mut self) {
        match self.commands.last() {
            None | Some(PathCommand::Close) => {},
            Some(_) => self.commands.push(PathCommand::Close),
        }
    }
    /// Path contains no commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
    /// Commands of the path
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }
    /// Points of the path, consumed positionally by commands
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    /// Number of sub-paths
    pub fn segments(&self) -> usize {
        self.segments
    }
    /// Bounding rectangle of all points, including control points
    pub fn bounding_rect(&self) -> Option<Rectangle<f64>> {
        let (first, rest) = self.points.split_first()?;
        let mut r = Rectangle::new(first.x, first.y, first.x, first.y);
        for p in rest {
            r.expand(p.x, p.y);
        }
        Some(r)
    }
    fn needs_move_to(&self) -> bool {
        match self.commands.last() {
            None | Some(PathCommand::Close) => true,
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_count_matches_commands() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 0.0);
        path.cubic_to(2.0, 0.0, 2.0, 1.0, 1.0, 1.0);
        path.close();
        path.move_to(5.0, 5.0);
        path.line_to(6.0, 6.0);
        let n: usize = path.commands().iter().map(|c| c.num_points()).sum();
        assert_eq!(n, path.points().len());
        assert_eq!(path.segments(), 2);
    }

    #[test]
    fn line_to_without_move_to_starts_subpath() {
        let mut path = Path::new();
        path.line_to(3.0, 4.0);
        assert_eq!(path.commands(), &[PathCommand::MoveTo]);
        assert_eq!(path.segments(), 1);
    }

    #[test]
    fn close_is_not_repeated() {
        let mut path = Path::new();
        path.close();
        assert!(path.is_empty());
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 1.0);
        path.close();
        path.close();
        assert_eq!(path.commands().len(), 3);
    }

    #[test]
    fn bounding_rect_includes_control_points() {
        let mut path = Path::new();
        assert!(path.bounding_rect().is_none());
        path.move_to(0.0, 0.0);
        path.cubic_to(-5.0, 2.0, 12.0, 20.0, 10.0, 10.0);
        let r = path.bounding_rect().unwrap();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (-5.0, 0.0, 12.0, 20.0));
    }

    #[test]
    fn reset_keeps_storage() {
        let mut path = Path::rect(0.0, 0.0, 10.0, 10.0);
        let cap = path.points.capacity();
        path.reset();
        assert!(path.is_empty());
        assert_eq!(path.segments(), 0);
        assert_eq!(path.points.capacity(), cap);
    }
}
