//! Nearest-point partition of the interactive region.
//!
//! Every projected reading owns one cell: the part of the extent closer to it
//! than to any other reading. Cells are computed by clipping the extent
//! rectangle against perpendicular bisectors, visiting neighbours through a
//! uniform bucket grid so that distant sites are never examined. The same
//! grid answers pointer lookups.
//!
//! Ties are resolved in favour of the earlier site: a site coincident with an
//! earlier one keeps its entry but owns an empty polygon.

use gpui::Point;
use rayon::prelude::*;
use tracing::debug;

pub type CellId = usize;

/// Axis-aligned rectangle in plot coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub min: Point<f64>,
    pub max: Point<f64>,
}

impl Extent {
    pub fn new(min: Point<f64>, max: Point<f64>) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Point<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn corners(&self) -> Vec<Point<f64>> {
        vec![
            Point::new(self.min.x, self.min.y),
            Point::new(self.max.x, self.min.y),
            Point::new(self.max.x, self.max.y),
            Point::new(self.min.x, self.max.y),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub site: Point<f64>,
    /// Index of the owning reading in the working dataset.
    pub observation: usize,
    /// Closed boundary (last vertex connects to the first); empty when the
    /// site is shadowed by an earlier coincident one.
    pub polygon: Vec<Point<f64>>,
}

pub struct Tessellation {
    extent: Extent,
    cells: Vec<Cell>,
    grid: SiteGrid,
}

impl Tessellation {
    pub fn empty(extent: Extent) -> Self {
        Self::build(Vec::new(), extent)
    }

    /// `sites` pairs each owning observation index with its projected point,
    /// in insertion order.
    pub fn build(sites: Vec<(usize, Point<f64>)>, extent: Extent) -> Self {
        let points: Vec<Point<f64>> = sites.iter().map(|(_, p)| *p).collect();
        let grid = SiteGrid::new(&points, extent);

        // Cells are independent once the grid exists.
        let cells = sites
            .par_iter()
            .enumerate()
            .map(|(i, (observation, site))| Cell {
                site: *site,
                observation: *observation,
                polygon: cell_polygon(i, &points, &grid, extent),
            })
            .collect::<Vec<_>>();

        debug!(
            cells = cells.len(),
            empty = cells.iter().filter(|c| c.polygon.is_empty()).count(),
            "tessellation built"
        );

        Self {
            extent,
            cells,
            grid,
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Boundary and owning observation of a cell.
    pub fn polygon_for(&self, id: CellId) -> Option<(&[Point<f64>], usize)> {
        self.cells
            .get(id)
            .map(|c| (c.polygon.as_slice(), c.observation))
    }

    pub fn cell_for_observation(&self, observation: usize) -> Option<CellId> {
        self.cells.iter().position(|c| c.observation == observation)
    }

    /// The cell whose site is nearest to `p`; `None` outside the extent or
    /// when there are no sites.
    pub fn locate(&self, p: Point<f64>) -> Option<CellId> {
        if self.cells.is_empty() || !self.extent.contains(p) {
            return None;
        }
        self.grid.nearest(p, &self.cells)
    }
}

fn dist2(a: Point<f64>, b: Point<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

fn cell_polygon(i: usize, points: &[Point<f64>], grid: &SiteGrid, extent: Extent) -> Vec<Point<f64>> {
    let site = points[i];
    let mut polygon = extent.corners();

    // Returns false once the polygon is gone.
    let clip_against = |j: usize, polygon: &mut Vec<Point<f64>>| -> bool {
        if j == i {
            return true;
        }
        let other = points[j];
        if other == site {
            if j < i {
                polygon.clear();
                return false;
            }
            return true;
        }
        // Keep q where |q - site| <= |q - other|.
        let a = other.x - site.x;
        let b = other.y - site.y;
        let c = (other.x * other.x + other.y * other.y - site.x * site.x - site.y * site.y) / 2.0;
        *polygon = clip_half_plane(polygon, a, b, c);
        !polygon.is_empty()
    };

    let step = grid.min_bucket_side();
    if !extent.contains(site) || !(step > 0.0) {
        for j in 0..points.len() {
            if !clip_against(j, &mut polygon) {
                return Vec::new();
            }
        }
        return polygon;
    }

    let (col, row) = grid.bucket_of(site);
    for radius in 0..=grid.max_radius() {
        for bucket in grid.ring(col, row, radius) {
            for &j in &grid.buckets[bucket] {
                if !clip_against(j, &mut polygon) {
                    return Vec::new();
                }
            }
        }
        // Sites beyond this ring are at least radius * step away; they can only
        // cut the polygon if they lie within twice its farthest vertex.
        let reach = polygon
            .iter()
            .map(|v| dist2(*v, site))
            .fold(0.0f64, f64::max)
            .sqrt();
        if radius as f64 * step > 2.0 * reach {
            break;
        }
    }
    polygon
}

/// One Sutherland-Hodgman pass keeping `a*x + b*y <= c`.
fn clip_half_plane(polygon: &[Point<f64>], a: f64, b: f64, c: f64) -> Vec<Point<f64>> {
    let side = |p: &Point<f64>| a * p.x + b * p.y - c;
    if polygon.iter().all(|p| side(p) <= 0.0) {
        return polygon.to_vec();
    }

    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 1);
    for k in 0..n {
        let cur = polygon[k];
        let prev = polygon[(k + n - 1) % n];
        let dc = side(&cur);
        let dp = side(&prev);
        if dc <= 0.0 {
            if dp > 0.0 {
                out.push(intersect(prev, cur, dp, dc));
            }
            out.push(cur);
        } else if dp <= 0.0 {
            out.push(intersect(prev, cur, dp, dc));
        }
    }
    if out.len() < 3 {
        out.clear();
    }
    out
}

fn intersect(prev: Point<f64>, cur: Point<f64>, dp: f64, dc: f64) -> Point<f64> {
    let t = dp / (dp - dc);
    Point::new(prev.x + t * (cur.x - prev.x), prev.y + t * (cur.y - prev.y))
}

/// Uniform buckets over the extent. Sites outside the extent are filed in the
/// nearest edge bucket, which only moves them further from any query inside.
struct SiteGrid {
    origin: Point<f64>,
    bucket_w: f64,
    bucket_h: f64,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
}

impl SiteGrid {
    fn new(points: &[Point<f64>], extent: Extent) -> Self {
        let side = ((points.len() as f64).sqrt().ceil() as usize).max(1);
        let mut grid = Self {
            origin: extent.min,
            bucket_w: extent.width() / side as f64,
            bucket_h: extent.height() / side as f64,
            cols: side,
            rows: side,
            buckets: vec![Vec::new(); side * side],
        };
        for (i, p) in points.iter().enumerate() {
            let (col, row) = grid.bucket_of(*p);
            grid.buckets[row * grid.cols + col].push(i);
        }
        grid
    }

    fn min_bucket_side(&self) -> f64 {
        self.bucket_w.min(self.bucket_h)
    }

    fn max_radius(&self) -> usize {
        self.cols.max(self.rows)
    }

    fn bucket_of(&self, p: Point<f64>) -> (usize, usize) {
        let index = |v: f64, origin: f64, size: f64, count: usize| -> usize {
            if !(size > 0.0) {
                return 0;
            }
            let raw = ((v - origin) / size).floor();
            if raw.is_nan() || raw < 0.0 {
                0
            } else {
                (raw as usize).min(count - 1)
            }
        };
        (
            index(p.x, self.origin.x, self.bucket_w, self.cols),
            index(p.y, self.origin.y, self.bucket_h, self.rows),
        )
    }

    /// Bucket indices at Chebyshev distance exactly `radius` from (col, row).
    fn ring(&self, col: usize, row: usize, radius: usize) -> Vec<usize> {
        let (col, row, r) = (col as isize, row as isize, radius as isize);
        let mut out = Vec::new();
        let mut push = |c: isize, rw: isize| {
            if c >= 0 && rw >= 0 && (c as usize) < self.cols && (rw as usize) < self.rows {
                out.push(rw as usize * self.cols + c as usize);
            }
        };
        if r == 0 {
            push(col, row);
            return out;
        }
        for c in (col - r)..=(col + r) {
            push(c, row - r);
            push(c, row + r);
        }
        for rr in (row - r + 1)..=(row + r - 1) {
            push(col - r, rr);
            push(col + r, rr);
        }
        out
    }

    fn nearest(&self, p: Point<f64>, cells: &[Cell]) -> Option<CellId> {
        let better = |best: Option<(f64, usize)>, d: f64, j: usize| match best {
            None => true,
            Some((bd, bj)) => d < bd || (d == bd && j < bj),
        };

        let step = self.min_bucket_side();
        let mut best: Option<(f64, usize)> = None;
        if !(step > 0.0) {
            for (j, cell) in cells.iter().enumerate() {
                let d = dist2(p, cell.site);
                if better(best, d, j) {
                    best = Some((d, j));
                }
            }
            return best.map(|(_, j)| j);
        }

        let (col, row) = self.bucket_of(p);
        for radius in 0..=self.max_radius() {
            for bucket in self.ring(col, row, radius) {
                for &j in &self.buckets[bucket] {
                    let d = dist2(p, cells[j].site);
                    if better(best, d, j) {
                        best = Some((d, j));
                    }
                }
            }
            if let Some((d, _)) = best {
                let bound = radius as f64 * step;
                if bound * bound > d {
                    break;
                }
            }
        }
        best.map(|(_, j)| j)
    }
}
