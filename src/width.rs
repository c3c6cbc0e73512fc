use crate::geom::{PolygonSet, EPS};
use crate::units::Pt;

// inward nudge applied to the band's bounding lines so that edges lying
// exactly on a line resolve restrictively instead of ambiguously
const NUDGE: f32 = EPS * 0.5;

/// Computes horizontal free-space intervals bounded by an arbitrary polygon
/// outline, for content that must flow around non-rectangular obstacles.
///
/// Constructed from a polygon set (the area that is *available*) and a
/// vertical offset: the absolute y-coordinate of the top of the region being
/// laid out. [call](WidthFromPolygon::call) then answers, for a line `y`
/// below that top with a given height, which x-ranges are clear over the
/// entire height of the line.
///
/// The function is total: degenerate bands, bands outside the polygon and
/// bands straddling several holes all produce a well-formed (possibly empty)
/// answer.
pub struct WidthFromPolygon<'a> {
    shape: &'a PolygonSet,
    offset: Pt,
}

impl<'a> WidthFromPolygon<'a> {
    pub fn new(shape: &'a PolygonSet, offset: Pt) -> WidthFromPolygon<'a> {
        WidthFromPolygon { shape, offset }
    }

    /// The alternating gap/width sequence for the horizontal band starting
    /// `y` below the offset and extending `height` further down.
    ///
    /// Each entry is a `(gap, width)` pair: `gap` is blocked space measured
    /// from the end of the previous free interval (initially from the left of
    /// the polygon's bounding box, so the sequence always starts with a gap,
    /// possibly zero), `width` is the free span following it. An empty vec
    /// means the band has no free space at all.
    pub fn call(&self, y: Pt, height: Pt) -> Vec<(Pt, Pt)> {
        let bbox = match self.shape.bbox() {
            Some(b) => b,
            None => return Vec::new(),
        };

        let band_top = self.offset - y;
        let band_bottom = band_top - height.max(Pt(0.0));

        // evaluate just inside the band so edges on the bounding lines count
        // restrictively
        let top_line = Pt(band_top.0 - NUDGE);
        let bottom_line = Pt(band_bottom.0 + NUDGE).min(top_line);

        let top = self.shape.inside_intervals(top_line);
        let bottom = self.shape.inside_intervals(bottom_line);
        let mut free = intersect_intervals(&top, &bottom);

        // obstacles entirely between the bounding lines are invisible to
        // both line scans; subtract the in-band x-extent of every edge
        for edge in self.shape.edges() {
            if let Some((x1, x2)) = clip_extent(&edge, bottom_line.0, top_line.0) {
                if x2 - x1 > EPS {
                    free = subtract_interval(free, Pt(x1), Pt(x2));
                }
            }
        }

        let mut result = Vec::with_capacity(free.len());
        let mut prev = bbox.x1;
        for (a, b) in free {
            result.push(((a - prev).max(Pt(0.0)), b - a));
            prev = b;
        }
        result
    }
}

/// The x-extent of the portion of `edge` lying strictly within the open band
/// `(y_low, y_high)`, if any.
fn clip_extent(edge: &geo::Line<f32>, y_low: f32, y_high: f32) -> Option<(f32, f32)> {
    let (mut ya, mut yb) = (edge.start.y, edge.end.y);
    let (mut xa, mut xb) = (edge.start.x, edge.end.x);
    if ya > yb {
        std::mem::swap(&mut ya, &mut yb);
        std::mem::swap(&mut xa, &mut xb);
    }
    if yb <= y_low || ya >= y_high {
        return None;
    }
    if (yb - ya).abs() <= EPS {
        // horizontal edge inside the band
        return Some((xa.min(xb), xa.max(xb)));
    }
    let x_at = |y: f32| xa + (y - ya) / (yb - ya) * (xb - xa);
    let x_lo = x_at(ya.max(y_low));
    let x_hi = x_at(yb.min(y_high));
    Some((x_lo.min(x_hi), x_lo.max(x_hi)))
}

/// Intersection of two sorted interval lists.
fn intersect_intervals(a: &[(Pt, Pt)], b: &[(Pt, Pt)]) -> Vec<(Pt, Pt)> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].0.max(b[j].0);
        let hi = a[i].1.min(b[j].1);
        if hi.0 - lo.0 > EPS {
            out.push((lo, hi));
        }
        if a[i].1 <= b[j].1 {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Removes `[x1, x2]` from every interval in the sorted list.
pub(crate) fn subtract_interval(intervals: Vec<(Pt, Pt)>, x1: Pt, x2: Pt) -> Vec<(Pt, Pt)> {
    let mut out = Vec::with_capacity(intervals.len() + 1);
    for (a, b) in intervals {
        if x2 <= a || x1 >= b {
            out.push((a, b));
            continue;
        }
        if x1.0 - a.0 > EPS {
            out.push((a, x1));
        }
        if b.0 - x2.0 > EPS {
            out.push((x2, b));
        }
    }
    out
}
