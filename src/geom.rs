use geo::{Area, BooleanOps, BoundingRect, CoordsIter, LinesIter, MultiPolygon, Polygon};

use crate::rect::Rect;
use crate::units::Pt;

/// Tolerance used when comparing coordinates; geometry below this size is
/// treated as degenerate.
pub(crate) const EPS: f32 = 1e-4;

/// A set of polygons describing a drawable area.
///
/// This is a thin adapter over [geo]'s [MultiPolygon]: the boolean algebra
/// (union, difference, intersection) and the bounding box come straight from
/// [geo] and are assumed correct. On top of that the adapter exposes the one
/// scanning primitive the layout algorithms need: the x-intervals lying
/// inside the set along a horizontal line.
///
/// Orientation of the polygon rings is not assumed; all scanning is done with
/// parity crossing counts, which work for either winding.
#[derive(Debug, Clone)]
pub struct PolygonSet(MultiPolygon<f32>);

impl Default for PolygonSet {
    fn default() -> Self {
        PolygonSet(MultiPolygon::new(Vec::new()))
    }
}

impl From<MultiPolygon<f32>> for PolygonSet {
    fn from(mp: MultiPolygon<f32>) -> Self {
        PolygonSet(mp)
    }
}

impl PolygonSet {
    /// An empty set with no area
    pub fn empty() -> PolygonSet {
        PolygonSet::default()
    }

    /// A set consisting of a single axis-aligned rectangle
    pub fn from_rect(rect: Rect) -> PolygonSet {
        PolygonSet::polygon(&[
            (rect.x1, rect.y1),
            (rect.x2, rect.y1),
            (rect.x2, rect.y2),
            (rect.x1, rect.y2),
        ])
    }

    /// A set consisting of a single polygon given by its vertices in order
    /// (closing edge implied)
    pub fn polygon(points: &[(Pt, Pt)]) -> PolygonSet {
        let coords: Vec<(f32, f32)> = points.iter().map(|(x, y)| (x.0, y.0)).collect();
        let poly = Polygon::new(coords.into(), Vec::new());
        PolygonSet(MultiPolygon::new(vec![poly]))
    }

    /// Access to the underlying [geo] geometry
    pub fn as_multi_polygon(&self) -> &MultiPolygon<f32> {
        &self.0
    }

    pub fn union(&self, other: &PolygonSet) -> PolygonSet {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        PolygonSet(self.0.union(&other.0))
    }

    pub fn difference(&self, other: &PolygonSet) -> PolygonSet {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        PolygonSet(self.0.difference(&other.0))
    }

    pub fn intersection(&self, other: &PolygonSet) -> PolygonSet {
        if self.is_empty() || other.is_empty() {
            return PolygonSet::empty();
        }
        PolygonSet(self.0.intersection(&other.0))
    }

    /// Total enclosed area
    pub fn area(&self) -> f32 {
        self.0.unsigned_area()
    }

    /// Whether the set encloses no usable area. Boolean operations can leave
    /// degenerate slivers behind, so emptiness is judged by area rather than
    /// by the ring count.
    pub fn is_empty(&self) -> bool {
        self.0 .0.is_empty() || self.area() < EPS
    }

    /// The bounding box of the whole set, if it has any extent
    pub fn bbox(&self) -> Option<Rect> {
        let r = self.0.bounding_rect()?;
        Some(Rect::new(
            Pt(r.min().x),
            Pt(r.min().y),
            Pt(r.max().x),
            Pt(r.max().y),
        ))
    }

    /// All edges of all rings as line segments
    pub fn edges(&self) -> impl Iterator<Item = geo::Line<f32>> + '_ {
        self.0.lines_iter()
    }

    /// The x-intervals lying inside the set along the horizontal line at `y`,
    /// sorted left to right. Computed with parity crossing counts, so ring
    /// orientation does not matter.
    pub fn inside_intervals(&self, y: Pt) -> Vec<(Pt, Pt)> {
        let y = y.0;
        let mut crossings: Vec<f32> = Vec::new();
        for line in self.0.lines_iter() {
            let (y1, y2) = (line.start.y, line.end.y);
            // half-open span so that a vertex on the line is counted once
            if (y1 <= y && y2 > y) || (y2 <= y && y1 > y) {
                let t = (y - y1) / (y2 - y1);
                crossings.push(line.start.x + t * (line.end.x - line.start.x));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        let mut intervals: Vec<(Pt, Pt)> = Vec::with_capacity(crossings.len() / 2);
        for pair in crossings.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            if b - a <= EPS {
                continue;
            }
            // merge with the previous interval when they touch
            if let Some(last) = intervals.last_mut() {
                if a - last.1 .0 <= EPS {
                    last.1 = Pt(b.max(last.1 .0));
                    continue;
                }
            }
            intervals.push((Pt(a), Pt(b)));
        }
        intervals
    }

    /// All distinct vertex y-coordinates, sorted from top to bottom
    pub fn vertex_ys(&self) -> Vec<Pt> {
        let mut ys: Vec<f32> = self.0.coords_iter().map(|c| c.y).collect();
        ys.sort_by(|a, b| b.total_cmp(a));
        ys.dedup_by(|a, b| (*a - *b).abs() <= EPS);
        ys.into_iter().map(Pt).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, side: f32) -> PolygonSet {
        PolygonSet::from_rect(Rect::new(Pt(x), Pt(y), Pt(x + side), Pt(y + side)))
    }

    #[test]
    fn intervals_of_plain_square() {
        let s = square(0.0, 0.0, 100.0);
        let iv = s.inside_intervals(Pt(50.0));
        assert_eq!(iv.len(), 1);
        assert!((iv[0].0 .0 - 0.0).abs() < 1e-3);
        assert!((iv[0].1 .0 - 100.0).abs() < 1e-3);
    }

    #[test]
    fn intervals_split_by_hole() {
        let holed = square(0.0, 0.0, 100.0).difference(&square(20.0, 20.0, 60.0));
        let iv = holed.inside_intervals(Pt(50.0));
        assert_eq!(iv.len(), 2);
        assert!((iv[0].0 .0 - 0.0).abs() < 1e-3);
        assert!((iv[0].1 .0 - 20.0).abs() < 1e-3);
        assert!((iv[1].0 .0 - 80.0).abs() < 1e-3);
        assert!((iv[1].1 .0 - 100.0).abs() < 1e-3);
    }

    #[test]
    fn intervals_outside_are_empty() {
        let s = square(0.0, 0.0, 100.0);
        assert!(s.inside_intervals(Pt(150.0)).is_empty());
    }

    #[test]
    fn difference_shrinks_area() {
        let holed = square(0.0, 0.0, 100.0).difference(&square(20.0, 20.0, 60.0));
        assert!((holed.area() - (10000.0 - 3600.0)).abs() < 1.0);
        assert!(!holed.is_empty());
    }

    #[test]
    fn vertex_ys_sorted_descending() {
        let holed = square(0.0, 0.0, 100.0).difference(&square(20.0, 20.0, 60.0));
        let ys = holed.vertex_ys();
        assert_eq!(ys.len(), 4);
        assert!((ys[0].0 - 100.0).abs() < 1e-3);
        assert!((ys[1].0 - 80.0).abs() < 1e-3);
        assert!((ys[2].0 - 20.0).abs() < 1e-3);
        assert!((ys[3].0 - 0.0).abs() < 1e-3);
    }
}
