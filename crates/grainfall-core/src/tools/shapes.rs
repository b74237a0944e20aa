//! Shape rasterizer - turns drawing requests into cell writes
//!
//! Every primitive only ever fills empty cells, so stamping twice or over
//! existing material changes nothing. Shapes are clipped to the grid before
//! they are walked: coordinates far outside the grid cost nothing and never
//! panic.

use bresenham::Bresenham;
use grainfall_simulation::MaterialKind;
use serde::{Deserialize, Serialize};

use crate::world::{Grid, SimRng};

/// A shape to draw with one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub material: MaterialKind,
    pub shape: Shape,
}

/// Geometry of a [`DrawRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point {
        x: i32,
        y: i32,
    },
    Circle {
        x: i32,
        y: i32,
        radius: u32,
        /// Chance for each cell of the disk to be filled
        #[serde(default = "full_probability")]
        probability: f32,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        /// Radius of the disk stamped at every step (0 = one cell wide)
        #[serde(default)]
        thickness: u32,
    },
    Rect {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        #[serde(default = "filled_by_default")]
        filled: bool,
    },
    Scatter {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        probability: f32,
    },
}

fn full_probability() -> f32 {
    1.0
}

fn filled_by_default() -> bool {
    true
}

/// Inclusive cell range of an axis after clipping, `None` when nothing is left
fn clip_span(from: i64, to: i64, size: i32) -> Option<(i32, i32)> {
    let lo = from.min(to).max(0);
    let hi = from.max(to).min(size as i64 - 1);
    (lo <= hi).then_some((lo as i32, hi as i32))
}

/// Clip the segment to the box `[min, max]` on both axes (Liang-Barsky)
fn clip_segment(
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (x2 - x1, y2 - y1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, x1 - min.0),
        (dx, max.0 - x1),
        (-dy, y1 - min.1),
        (dy, max.1 - y1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (x1 + t0 * dx, y1 + t0 * dy),
        (x1 + t1 * dx, y1 + t1 * dy),
    ))
}

/// Roll `probability`; certain stamps leave the RNG untouched
fn roll<R: SimRng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    probability >= 1.0 || (probability > 0.0 && rng.check_probability(probability))
}

/// Drawing primitives over a [`Grid`]
pub struct ShapeRasterizer;

impl ShapeRasterizer {
    /// Fill a single empty cell
    pub fn stamp_point(grid: &mut Grid, x: i32, y: i32, kind: MaterialKind) {
        grid.place_if_empty(x, y, kind);
    }

    /// Fill the disk of `radius` around `(cx, cy)`
    ///
    /// Each cell of the disk is filled independently with `probability`.
    pub fn stamp_circle<R: SimRng + ?Sized>(
        grid: &mut Grid,
        cx: i32,
        cy: i32,
        kind: MaterialKind,
        radius: u32,
        probability: f32,
        rng: &mut R,
    ) {
        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);
        let Some((x_lo, x_hi)) = clip_span(cx - r, cx + r, grid.width()) else {
            return;
        };
        let Some((y_lo, y_hi)) = clip_span(cy - r, cy + r, grid.height()) else {
            return;
        };

        // Squares of i64 distances need 128 bits for radii near u32::MAX
        let r_squared = i128::from(r) * i128::from(r);
        for y in y_lo..=y_hi {
            let dy = i128::from(y as i64 - cy);
            for x in x_lo..=x_hi {
                let dx = i128::from(x as i64 - cx);
                if dx * dx + dy * dy > r_squared {
                    continue;
                }
                if grid.get(x, y) == Some(MaterialKind::Empty) && roll(rng, probability) {
                    grid.set(x, y, kind);
                }
            }
        }
    }

    /// Bresenham line from `(x1, y1)` to `(x2, y2)`, both ends included
    ///
    /// A solid disk of radius `thickness` is stamped at every step.
    #[allow(clippy::too_many_arguments)]
    pub fn stamp_line<R: SimRng + ?Sized>(
        grid: &mut Grid,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        kind: MaterialKind,
        thickness: u32,
        rng: &mut R,
    ) {
        // Steps further out than the thickness cannot touch the grid
        let margin = thickness as f64 + 1.0;
        let min = (-margin, -margin);
        let max = (
            grid.width() as f64 - 1.0 + margin,
            grid.height() as f64 - 1.0 + margin,
        );
        let Some((start, end)) = clip_segment(
            (x1 as f64, y1 as f64),
            (x2 as f64, y2 as f64),
            min,
            max,
        ) else {
            return;
        };

        let start = (start.0.round() as isize, start.1.round() as isize);
        let end = (end.0.round() as isize, end.1.round() as isize);

        // Bresenham yields every point except the end
        for (x, y) in Bresenham::new(start, end).chain(std::iter::once(end)) {
            Self::stamp_circle(grid, x as i32, y as i32, kind, thickness, 1.0, rng);
        }
    }

    /// Axis-aligned box spanning both corners
    ///
    /// `filled` writes every cell, otherwise only the four edges.
    pub fn stamp_rect(
        grid: &mut Grid,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        kind: MaterialKind,
        filled: bool,
    ) {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        let Some((x_lo, x_hi)) = clip_span(left as i64, right as i64, grid.width()) else {
            return;
        };
        let Some((y_lo, y_hi)) = clip_span(top as i64, bottom as i64, grid.height()) else {
            return;
        };

        for y in y_lo..=y_hi {
            let edge_row = y == top || y == bottom;
            for x in x_lo..=x_hi {
                if filled || edge_row || x == left || x == right {
                    grid.place_if_empty(x, y, kind);
                }
            }
        }
    }

    /// Fill each empty cell of the box with `probability`
    #[allow(clippy::too_many_arguments)]
    pub fn scatter_rect<R: SimRng + ?Sized>(
        grid: &mut Grid,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        kind: MaterialKind,
        probability: f32,
        rng: &mut R,
    ) {
        let Some((x_lo, x_hi)) = clip_span(x1 as i64, x2 as i64, grid.width()) else {
            return;
        };
        let Some((y_lo, y_hi)) = clip_span(y1 as i64, y2 as i64, grid.height()) else {
            return;
        };

        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                if grid.get(x, y) == Some(MaterialKind::Empty) && roll(rng, probability) {
                    grid.set(x, y, kind);
                }
            }
        }
    }

    /// Rasterize a scripted request
    pub fn apply<R: SimRng + ?Sized>(grid: &mut Grid, request: &DrawRequest, rng: &mut R) {
        let kind = request.material;
        match request.shape {
            Shape::Point { x, y } => Self::stamp_point(grid, x, y, kind),
            Shape::Circle {
                x,
                y,
                radius,
                probability,
            } => Self::stamp_circle(grid, x, y, kind, radius, probability, rng),
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                thickness,
            } => Self::stamp_line(grid, x1, y1, x2, y2, kind, thickness, rng),
            Shape::Rect {
                x1,
                y1,
                x2,
                y2,
                filled,
            } => Self::stamp_rect(grid, x1, y1, x2, y2, kind, filled),
            Shape::Scatter {
                x1,
                y1,
                x2,
                y2,
                probability,
            } => Self::scatter_rect(grid, x1, y1, x2, y2, kind, probability, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn rng() -> Xoshiro256StarStar {
        Xoshiro256StarStar::seed_from_u64(42)
    }

    #[test]
    fn test_point_only_fills_empty() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set(1, 1, MaterialKind::Wall);

        ShapeRasterizer::stamp_point(&mut grid, 1, 1, MaterialKind::Sand);
        ShapeRasterizer::stamp_point(&mut grid, 2, 2, MaterialKind::Sand);

        assert_eq!(grid.get(1, 1), Some(MaterialKind::Wall));
        assert_eq!(grid.get(2, 2), Some(MaterialKind::Sand));
    }

    #[test]
    fn test_circle_fills_disk() {
        let mut grid = Grid::new(11, 11).unwrap();
        ShapeRasterizer::stamp_circle(&mut grid, 5, 5, MaterialKind::Sand, 2, 1.0, &mut rng());

        // 13 integer points with dx² + dy² <= 4
        assert_eq!(grid.count(MaterialKind::Sand), 13);
        assert_eq!(grid.get(5, 3), Some(MaterialKind::Sand));
        assert_eq!(grid.get(4, 3), Some(MaterialKind::Empty));
    }

    #[test]
    fn test_circle_probability_thins_fill() {
        let mut grid = Grid::new(41, 41).unwrap();
        ShapeRasterizer::stamp_circle(&mut grid, 20, 20, MaterialKind::Sand, 20, 0.5, &mut rng());

        let filled = grid.count(MaterialKind::Sand) as f32;
        // ~1257 cells in the disk
        assert!((500.0..760.0).contains(&filled), "filled {filled}");
    }

    #[test]
    fn test_circle_clipped_at_corner() {
        let mut grid = Grid::new(5, 5).unwrap();
        ShapeRasterizer::stamp_circle(&mut grid, 0, 0, MaterialKind::Water, 1, 1.0, &mut rng());
        assert_eq!(grid.count(MaterialKind::Water), 3);
    }

    #[test]
    fn test_huge_radius_covers_grid() {
        let mut grid = Grid::new(8, 8).unwrap();
        ShapeRasterizer::stamp_circle(&mut grid, 4, 4, MaterialKind::Sand, u32::MAX, 1.0, &mut rng());
        assert_eq!(grid.count(MaterialKind::Sand), 64);

        let mut grid = Grid::new(8, 8).unwrap();
        ShapeRasterizer::stamp_circle(
            &mut grid,
            i32::MIN,
            i32::MAX,
            MaterialKind::Water,
            u32::MAX,
            1.0,
            &mut rng(),
        );
        assert_eq!(grid.count(MaterialKind::Water), 64);
    }

    #[test]
    fn test_line_includes_both_endpoints() {
        let mut grid = Grid::new(10, 10).unwrap();
        ShapeRasterizer::stamp_line(&mut grid, 1, 1, 7, 4, MaterialKind::Wall, 0, &mut rng());

        assert_eq!(grid.get(1, 1), Some(MaterialKind::Wall));
        assert_eq!(grid.get(7, 4), Some(MaterialKind::Wall));
        assert_eq!(grid.count(MaterialKind::Wall), 7);
    }

    #[test]
    fn test_single_point_line() {
        let mut grid = Grid::new(5, 5).unwrap();
        ShapeRasterizer::stamp_line(&mut grid, 2, 2, 2, 2, MaterialKind::Wall, 0, &mut rng());
        assert_eq!(grid.count(MaterialKind::Wall), 1);
    }

    #[test]
    fn test_thick_line() {
        let mut grid = Grid::new(20, 5).unwrap();
        ShapeRasterizer::stamp_line(&mut grid, 2, 2, 17, 2, MaterialKind::Wall, 1, &mut rng());

        for x in 2..=17 {
            assert_eq!(grid.get(x, 1), Some(MaterialKind::Wall));
            assert_eq!(grid.get(x, 3), Some(MaterialKind::Wall));
        }
        assert_eq!(grid.get(1, 2), Some(MaterialKind::Wall));
        assert_eq!(grid.get(18, 2), Some(MaterialKind::Wall));
        assert_eq!(grid.get(2, 0), Some(MaterialKind::Empty));
    }

    #[test]
    fn test_line_crossing_grid_from_far_away() {
        let mut grid = Grid::new(10, 10).unwrap();
        ShapeRasterizer::stamp_line(
            &mut grid,
            -1_000_000_000,
            5,
            1_000_000_000,
            5,
            MaterialKind::Wall,
            0,
            &mut rng(),
        );
        assert_eq!(grid.count(MaterialKind::Wall), 10);
    }

    #[test]
    fn test_rect_outline_and_filled() {
        let mut grid = Grid::new(10, 10).unwrap();
        ShapeRasterizer::stamp_rect(&mut grid, 6, 6, 2, 2, MaterialKind::Wall, false);
        assert_eq!(grid.count(MaterialKind::Wall), 16);
        assert_eq!(grid.get(4, 4), Some(MaterialKind::Empty));

        ShapeRasterizer::stamp_rect(&mut grid, 2, 2, 6, 6, MaterialKind::Sand, true);
        assert_eq!(grid.count(MaterialKind::Sand), 9);
        assert_eq!(grid.count(MaterialKind::Wall), 16);
    }

    #[test]
    fn test_clipped_outline_keeps_only_visible_edges() {
        let mut grid = Grid::new(10, 10).unwrap();
        ShapeRasterizer::stamp_rect(&mut grid, -5, 3, 4, 100, MaterialKind::Wall, false);

        // Only the top edge (y = 3) and the right edge (x = 4) are inside
        assert_eq!(grid.get(0, 3), Some(MaterialKind::Wall));
        assert_eq!(grid.get(4, 9), Some(MaterialKind::Wall));
        assert_eq!(grid.get(0, 9), Some(MaterialKind::Empty));
        assert_eq!(grid.count(MaterialKind::Wall), 5 + 6);
    }

    #[test]
    fn test_stamps_are_idempotent() {
        let mut grid = Grid::new(16, 16).unwrap();
        let request = DrawRequest {
            material: MaterialKind::Sand,
            shape: Shape::Circle {
                x: 8,
                y: 8,
                radius: 4,
                probability: 1.0,
            },
        };
        ShapeRasterizer::apply(&mut grid, &request, &mut rng());
        let first = grid.clone();
        ShapeRasterizer::apply(&mut grid, &request, &mut rng());
        assert_eq!(grid, first);
    }

    #[test]
    fn test_stamps_far_out_of_bounds_are_no_ops() {
        let mut grid = Grid::new(8, 8).unwrap();
        let mut rng = rng();
        let far = [i32::MIN, -1_000_000, 1_000_000, i32::MAX];

        for &x in &far {
            for &y in &far {
                ShapeRasterizer::stamp_point(&mut grid, x, y, MaterialKind::Sand);
                ShapeRasterizer::stamp_circle(&mut grid, x, y, MaterialKind::Sand, 64, 1.0, &mut rng);
                ShapeRasterizer::stamp_line(&mut grid, x, y, x, 0, MaterialKind::Sand, 3, &mut rng);
                ShapeRasterizer::stamp_rect(&mut grid, x, y, x, y, MaterialKind::Sand, true);
                ShapeRasterizer::scatter_rect(&mut grid, x, y, x, y, MaterialKind::Sand, 1.0, &mut rng);
            }
        }

        assert_eq!(grid.particle_count(), 0);
    }

    #[test]
    fn test_draw_request_from_ron() {
        let request: DrawRequest =
            ron::from_str("(material: water, shape: Circle(x: 3, y: 4, radius: 2))").unwrap();
        assert_eq!(request.material, MaterialKind::Water);
        assert_eq!(
            request.shape,
            Shape::Circle {
                x: 3,
                y: 4,
                radius: 2,
                probability: 1.0
            }
        );

        let request: DrawRequest =
            ron::from_str("(material: wall, shape: Rect(x1: 0, y1: 0, x2: 3, y2: 3))").unwrap();
        assert!(matches!(request.shape, Shape::Rect { filled: true, .. }));
    }
}
