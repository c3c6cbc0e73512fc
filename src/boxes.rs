use crate::error::LayoutError;
use crate::frame::Frame;
use crate::rect::Rect;
use crate::style::Style;
use crate::units::Pt;

/// The drawing seam between the layout engine and the PDF content-stream
/// layer. The engine itself never emits drawing operators; it only translates
/// coordinates and hands them to the box implementations, which talk to a
/// [Canvas]. The single primitive here is what the engine's own diagnostic
/// overlay and simple boxes need.
pub trait Canvas {
    /// Stroke or fill an axis-aligned rectangle
    fn draw_rect(&mut self, rect: Rect);
}

/// Outcome of asking a box to fit itself into an available rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    /// The whole box fits
    Full,
    /// Part of the box fits; the box can be split to place the rest elsewhere
    Partial,
    /// Nothing of the box fits
    Failure,
}

/// A box owned by the layout engine, behind the [LayoutBox] capability.
pub type DynBox = Box<dyn LayoutBox>;

/// The capability every placeable content box exposes to the layout engine.
///
/// Concrete boxes (text, images, tables, ...) live outside this crate and are
/// injected through this trait. Implementations must guarantee that [fit]
/// is idempotent given identical arguments, and that [split] never returns a
/// remainder with a larger footprint than the original box.
///
/// [fit]: LayoutBox::fit
/// [split]: LayoutBox::split
pub trait LayoutBox {
    /// The styling attributes the engine consults for placement
    fn style(&self) -> &Style;

    /// The box's natural width
    fn width(&self) -> Pt;

    /// The box's natural height
    fn height(&self) -> Pt;

    /// Try to fit into the available rectangle, remembering whatever state is
    /// needed for a later [split](LayoutBox::split) or
    /// [draw](LayoutBox::draw). The frame is available for boxes that need
    /// its width specification (flow content).
    fn fit(&mut self, available_width: Pt, available_height: Pt, frame: &Frame) -> FitStatus;

    /// Split into the part that fitted during the last
    /// [fit](LayoutBox::fit) call and the remainder. A box that cannot be
    /// split returns `(None, Some(self))`, deferring itself wholly.
    fn split(self: Box<Self>) -> (Option<DynBox>, Option<DynBox>);

    /// The height that actually fitted during the last
    /// [fit](LayoutBox::fit) call; equals [height](LayoutBox::height) when
    /// the box fitted fully
    fn fitted_height(&self) -> Pt;

    /// Draw the fitted content with its lower-left corner at `(x, y)`
    fn draw(&self, canvas: &mut dyn Canvas, x: Pt, y: Pt) -> Result<(), LayoutError>;
}

/// A minimal concrete box: a plain rectangle of fixed width and height that
/// can be split horizontally. It is what the tests drive the engine with and
/// doubles as a spacer/placeholder for callers.
#[derive(Debug, Clone)]
pub struct BlockBox {
    width: Pt,
    height: Pt,
    style: Style,
    fitted_height: Option<Pt>,
}

impl BlockBox {
    pub fn new(width: Pt, height: Pt) -> BlockBox {
        BlockBox {
            width,
            height,
            style: Style::default(),
            fitted_height: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> BlockBox {
        self.style = style;
        self
    }
}

impl LayoutBox for BlockBox {
    fn style(&self) -> &Style {
        &self.style
    }

    fn width(&self) -> Pt {
        self.width
    }

    fn height(&self) -> Pt {
        self.height
    }

    fn fit(&mut self, available_width: Pt, available_height: Pt, _frame: &Frame) -> FitStatus {
        const TOL: Pt = Pt(1e-4);
        if self.width > available_width + TOL {
            self.fitted_height = None;
            return FitStatus::Failure;
        }
        if self.height <= available_height + TOL {
            self.fitted_height = Some(self.height);
            FitStatus::Full
        } else if available_height > TOL {
            self.fitted_height = Some(available_height);
            FitStatus::Partial
        } else {
            self.fitted_height = None;
            FitStatus::Failure
        }
    }

    fn split(self: Box<Self>) -> (Option<DynBox>, Option<DynBox>) {
        match self.fitted_height {
            Some(fitted) if fitted < self.height => {
                let front = BlockBox {
                    width: self.width,
                    height: fitted,
                    style: self.style.clone(),
                    fitted_height: Some(fitted),
                };
                let rest = BlockBox {
                    width: self.width,
                    height: self.height - fitted,
                    style: self.style.clone(),
                    fitted_height: None,
                };
                (Some(Box::new(front)), Some(Box::new(rest)))
            }
            Some(_) => (Some(self), None),
            None => (None, Some(self)),
        }
    }

    fn fitted_height(&self) -> Pt {
        self.fitted_height.unwrap_or(self.height)
    }

    fn draw(&self, canvas: &mut dyn Canvas, x: Pt, y: Pt) -> Result<(), LayoutError> {
        let height = self.fitted_height();
        canvas.draw_rect(Rect::from_origin(x, y, self.width, height));
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Records every rectangle drawn on it; lets tests assert on translation
    #[derive(Default)]
    pub struct RecordingCanvas {
        pub rects: Vec<Rect>,
    }

    impl Canvas for RecordingCanvas {
        fn draw_rect(&mut self, rect: Rect) {
            self.rects.push(rect);
        }
    }
}
