use crate::boxes::{Canvas, DynBox, FitStatus};
use crate::error::LayoutError;
use crate::geom::{PolygonSet, EPS};
use crate::rect::Rect;
use crate::style::{Align, Overflow, Position, VAlign};
use crate::units::Pt;
use crate::width::{subtract_interval, WidthFromPolygon};

/// The current maximal placement rectangle within a [Frame]'s shape.
///
/// `x`/`y` name the *top-left* corner of the rectangle; content stacks
/// downward from there. A cursor with zero available width and height is the
/// terminal sentinel: the frame's shape holds no further usable region.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: Pt,
    pub y: Pt,
    pub available_width: Pt,
    pub available_height: Pt,
}

impl Cursor {
    /// Whether this cursor is the terminal zero-region sentinel
    pub fn is_exhausted(&self) -> bool {
        self.available_width.0 <= EPS || self.available_height.0 <= EPS
    }
}

/// Outcome status of a [Frame::fit] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitResultStatus {
    /// The whole box was placed
    Success,
    /// Part of the box was placed; split off the remainder and continue
    /// elsewhere
    Overflow,
    /// Nothing could be placed
    Failure,
}

/// The result of fitting a box into a [Frame]: the box itself, where it
/// landed and the area it consumes from the frame.
///
/// Created by [Frame::fit], consumed by [Frame::draw] or [Frame::split];
/// never reused across frames.
pub struct FitResult {
    /// The box that was fitted (ownership moves through the result)
    pub content: DynBox,
    pub status: FitResultStatus,
    /// x-coordinate of the placed box's lower-left corner
    pub x: Pt,
    /// y-coordinate of the placed box's lower-left corner
    pub y: Pt,
    /// The area the placement consumes from the frame, margins included
    pub mask: PolygonSet,
}

impl FitResult {
    /// Draw the fitted box translated by `(dx, dy)`. This only translates
    /// coordinates and delegates the actual mark-making to the box.
    ///
    /// Drawing a failed result is a contract violation, and drawing an
    /// overflowed result is refused unless the box style opts into
    /// truncation.
    pub fn draw(&self, canvas: &mut dyn Canvas, dx: Pt, dy: Pt) -> Result<(), LayoutError> {
        match self.status {
            FitResultStatus::Failure => Err(LayoutError::DrawAfterFailure),
            FitResultStatus::Overflow if self.content.style().overflow == Overflow::Error => {
                Err(LayoutError::ContentOverflow)
            }
            _ => self.content.draw(canvas, self.x + dx, self.y + dy),
        }
    }
}

// region scan bookkeeping: the strips between adjacent vertex y-levels of
// the shape, plus which x-intervals of each strip have been handed out
struct RegionScan {
    ys: Vec<Pt>,
    consumed: Vec<Vec<(Pt, Pt)>>,
    exhausted: bool,
}

impl RegionScan {
    fn new(shape: &PolygonSet) -> RegionScan {
        let ys = shape.vertex_ys();
        let strips = ys.len().saturating_sub(1);
        RegionScan {
            ys,
            consumed: vec![Vec::new(); strips],
            exhausted: false,
        }
    }
}

/// Tracks the still-available drawing region of a page or page area.
///
/// A frame starts out with an immutable `contour` (by default its bounding
/// rectangle) and a mutable `shape` initialized from it. Placing boxes only
/// ever shrinks the shape, via [remove_area](Frame::remove_area). The frame
/// decomposes its shape into usable rectangular sub-regions on demand and
/// keeps a [Cursor] on the current one.
pub struct Frame {
    left: Pt,
    bottom: Pt,
    width: Pt,
    height: Pt,
    contour: PolygonSet,
    shape: PolygonSet,
    cursor: Cursor,
    scan: RegionScan,
    /// When set, [Frame::draw] strokes the bounding box of each consumed
    /// mask as a diagnostic overlay
    pub debug_outlines: bool,
}

impl Frame {
    /// Create a frame whose contour is its bounding rectangle
    pub fn new(left: Pt, bottom: Pt, width: Pt, height: Pt) -> Frame {
        let contour =
            PolygonSet::from_rect(Rect::new(left, bottom, left + width, bottom + height));
        Frame::with_contour(left, bottom, width, height, contour)
    }

    /// Create a frame with an arbitrary polygonal contour. The contour is
    /// expected to lie within the bounding box; the shape starts out equal
    /// to it.
    pub fn with_contour(left: Pt, bottom: Pt, width: Pt, height: Pt, contour: PolygonSet) -> Frame {
        let shape = contour.clone();
        let scan = RegionScan::new(&shape);
        let mut frame = Frame {
            left,
            bottom,
            width,
            height,
            contour,
            shape,
            cursor: Cursor::default(),
            scan,
            debug_outlines: false,
        };
        frame.cursor = frame.next_region().unwrap_or_default();
        frame
    }

    pub fn left(&self) -> Pt {
        self.left
    }

    pub fn bottom(&self) -> Pt {
        self.bottom
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    pub fn height(&self) -> Pt {
        self.height
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The immutable initial outline
    pub fn contour(&self) -> &PolygonSet {
        &self.contour
    }

    /// The current available area; only ever shrinks
    pub fn shape(&self) -> &PolygonSet {
        &self.shape
    }

    /// A width function over the current shape, for content flowing around
    /// the frame's holes and cut-outs. `offset` is the absolute y of the top
    /// of the region the content starts at.
    pub fn width_specification(&self, offset: Pt) -> WidthFromPolygon<'_> {
        WidthFromPolygon::new(&self.shape, offset)
    }

    /// Permanently remove an area from the frame's shape. Removing an area
    /// that does not intersect the shape is a no-op. The cursor is
    /// recomputed from a fresh scan of the new shape.
    pub fn remove_area(&mut self, area: &PolygonSet) {
        self.shape = self.shape.difference(area);
        self.scan = RegionScan::new(&self.shape);
        self.cursor = self.next_region().unwrap_or_default();
    }

    /// Advance the cursor to the next maximal axis-aligned rectangle of the
    /// shape, scanning top-to-bottom, left-to-right. Once the scan is
    /// exhausted the cursor stays at the zero sentinel and further calls are
    /// idempotent.
    pub fn find_next_region(&mut self) -> Cursor {
        self.cursor = self.next_region().unwrap_or_default();
        self.cursor
    }

    fn next_region(&mut self) -> Option<Cursor> {
        if self.scan.exhausted || self.shape.is_empty() {
            self.scan.exhausted = true;
            return None;
        }
        let strips = self.scan.ys.len().saturating_sub(1);
        for level in 0..strips {
            let y_top = self.scan.ys[level];
            let available = self.strip_intervals(level);
            let (a, b) = match available.first() {
                Some(&iv) => iv,
                None => continue,
            };

            // extend downward until the first strip whose free interval
            // differs; every spanned strip gives up that interval
            let mut bottom_level = level;
            while bottom_level + 1 < strips {
                let below = self.strip_intervals(bottom_level + 1);
                let same = below
                    .iter()
                    .any(|&(c, d)| (c.0 - a.0).abs() <= 1e-3 && (d.0 - b.0).abs() <= 1e-3);
                if same {
                    bottom_level += 1;
                } else {
                    break;
                }
            }
            for lvl in level..=bottom_level {
                self.scan.consumed[lvl].push((a, b));
            }
            let bottom = self.scan.ys[bottom_level + 1];
            return Some(Cursor {
                x: a,
                y: y_top,
                available_width: b - a,
                available_height: y_top - bottom,
            });
        }
        self.scan.exhausted = true;
        None
    }

    // free intervals of the strip below scan.ys[level], minus what earlier
    // regions already consumed
    fn strip_intervals(&self, level: usize) -> Vec<(Pt, Pt)> {
        let mid = Pt((self.scan.ys[level].0 + self.scan.ys[level + 1].0) * 0.5);
        let mut intervals = self.shape.inside_intervals(mid);
        for &(c, d) in &self.scan.consumed[level] {
            intervals = subtract_interval(intervals, c, d);
        }
        intervals
    }

    /// Fit a box against the frame, honoring its position mode. The cursor
    /// may advance through several regions during a single call; the result
    /// reports success, partial placement (overflow) or failure as a status,
    /// never as an error.
    pub fn fit(&mut self, content: DynBox) -> FitResult {
        match content.style().position {
            Position::Absolute { dx, dy } => self.fit_absolute(content, dx, dy),
            _ => self.fit_at_cursor(content),
        }
    }

    fn fit_at_cursor(&mut self, mut content: DynBox) -> FitResult {
        let style = content.style().clone();
        let frame_right = self.left + self.width;
        let frame_top = self.bottom + self.height;

        loop {
            if self.cursor.is_exhausted() {
                return FitResult {
                    content,
                    status: FitResultStatus::Failure,
                    x: Pt::ZERO,
                    y: Pt::ZERO,
                    mask: PolygonSet::empty(),
                };
            }
            let c = self.cursor;

            // margins coinciding with the frame boundary are not charged
            let left_m = boundary_margin(c.x, self.left, style.margin.left);
            let right_m = boundary_margin(c.x + c.available_width, frame_right, style.margin.right);
            let top_m = boundary_margin(c.y, frame_top, style.margin.top);
            let aw = c.available_width - left_m - right_m;
            let ah = c.available_height - top_m;
            if aw.0 <= EPS || ah.0 <= EPS {
                self.find_next_region();
                continue;
            }

            match content.fit(aw, ah, self) {
                FitStatus::Failure => {
                    self.find_next_region();
                    continue;
                }
                status @ (FitStatus::Full | FitStatus::Partial) => {
                    let bw = content.width();
                    let placed_h = content.fitted_height();
                    let x = match style.align {
                        Align::Left | Align::Justify => c.x + left_m,
                        Align::Center => c.x + left_m + (aw - bw) * 0.5,
                        Align::Right => c.x + c.available_width - right_m - bw,
                    };
                    let region_bottom = c.y - c.available_height;
                    let y_top = if status == FitStatus::Full {
                        match style.valign {
                            VAlign::Top => c.y - top_m,
                            VAlign::Center => c.y - top_m - (ah - placed_h) * 0.5,
                            VAlign::Bottom => region_bottom + placed_h,
                        }
                    } else {
                        c.y - top_m
                    };
                    let y = y_top - placed_h;
                    let bottom_m = boundary_margin(y, self.bottom, style.margin.bottom);
                    let mask_bottom = (y - bottom_m).max(self.bottom);
                    let mask = match style.position {
                        Position::Float => PolygonSet::from_rect(Rect::new(
                            (x - left_m).max(self.left),
                            mask_bottom,
                            (x + bw + right_m).min(frame_right),
                            c.y,
                        )),
                        Position::Flow => self.shape.intersection(&PolygonSet::from_rect(
                            Rect::new(self.left, mask_bottom, frame_right, c.y),
                        )),
                        _ => PolygonSet::from_rect(Rect::new(
                            self.left,
                            mask_bottom,
                            frame_right,
                            c.y,
                        )),
                    };
                    let status = if status == FitStatus::Full {
                        FitResultStatus::Success
                    } else {
                        FitResultStatus::Overflow
                    };
                    return FitResult {
                        content,
                        status,
                        x,
                        y,
                        mask,
                    };
                }
            }
        }
    }

    fn fit_absolute(&mut self, mut content: DynBox, dx: Pt, dy: Pt) -> FitResult {
        let margin = content.style().margin;
        let x = self.left + dx;
        let y = self.bottom + dy;
        let aw = self.left + self.width - x;
        let ah = self.bottom + self.height - y;

        let status = match content.fit(aw, ah, self) {
            FitStatus::Full => FitResultStatus::Success,
            FitStatus::Partial => FitResultStatus::Overflow,
            FitStatus::Failure => FitResultStatus::Failure,
        };

        // the margin area is taken out of the shape no matter whether the
        // box fitted
        let footprint = Rect::from_origin(x, y, content.width(), content.fitted_height())
            .expanded(margin.left, margin.bottom, margin.right, margin.top);
        let mask = match clamp_rect(footprint, self.frame_rect()) {
            Some(r) => PolygonSet::from_rect(r),
            None => PolygonSet::empty(),
        };
        self.remove_area(&mask);

        FitResult {
            content,
            status,
            x,
            y,
            mask,
        }
    }

    /// Split an overflowed fit result into the placed part and the remainder
    /// box. A successful result comes back unchanged; a failed result gives
    /// back its box untouched; an unsplittable box is wholly deferred as
    /// `(None, Some(box))`. The shape is not mutated.
    pub fn split(&self, result: FitResult) -> (Option<FitResult>, Option<DynBox>) {
        match result.status {
            FitResultStatus::Success => (Some(result), None),
            FitResultStatus::Failure => (None, Some(result.content)),
            FitResultStatus::Overflow => {
                let FitResult {
                    content, x, y, mask, ..
                } = result;
                match content.split() {
                    (Some(front), rest) => (
                        Some(FitResult {
                            content: front,
                            status: FitResultStatus::Success,
                            x,
                            y,
                            mask,
                        }),
                        rest,
                    ),
                    (None, rest) => (None, rest),
                }
            }
        }
    }

    /// Draw a fit result into the canvas and consume its mask from the
    /// shape. Fails for failed results and for clipped content whose style
    /// demands `Overflow::Error`.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, result: FitResult) -> Result<(), LayoutError> {
        result.draw(canvas, Pt::ZERO, Pt::ZERO)?;
        if self.debug_outlines {
            if let Some(bbox) = result.mask.bbox() {
                canvas.draw_rect(bbox);
            }
        }
        self.remove_area(&result.mask);
        Ok(())
    }

    fn frame_rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.bottom,
            self.left + self.width,
            self.bottom + self.height,
        )
    }
}

// margin helper: a box edge sitting on the frame boundary is not charged
fn boundary_margin(edge: Pt, boundary: Pt, margin: Pt) -> Pt {
    if (edge.0 - boundary.0).abs() <= EPS {
        Pt::ZERO
    } else {
        margin
    }
}

fn clamp_rect(r: Rect, bounds: Rect) -> Option<Rect> {
    let x1 = r.x1.max(bounds.x1);
    let y1 = r.y1.max(bounds.y1);
    let x2 = r.x2.min(bounds.x2);
    let y2 = r.y2.min(bounds.y2);
    if x2.0 - x1.0 <= EPS || y2.0 - y1.0 <= EPS {
        None
    } else {
        Some(Rect { x1, y1, x2, y2 })
    }
}
