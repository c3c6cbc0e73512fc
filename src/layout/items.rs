use crate::boxes::Canvas;
use crate::error::LayoutError;
use crate::units::Pt;

/// Measured inline content: anything the line breaker can place on a line.
///
/// Text runs, inline images and the like implement this outside the engine.
/// The breaker only reads the metrics; drawing happens per line after the
/// breaks are decided, with `(x, y)` at the content's lower-left corner on
/// the baseline.
pub trait InlineContent {
    fn width(&self) -> Pt;
    fn height(&self) -> Pt;
    fn draw(&self, canvas: &mut dyn Canvas, x: Pt, y: Pt) -> Result<(), LayoutError>;
}

/// A fixed-size inline rectangle. Stands in for any measured run whose
/// internals the line breaker does not care about.
#[derive(Debug, Clone, Copy)]
pub struct InlineBox {
    width: Pt,
    height: Pt,
}

impl InlineBox {
    pub fn new(width: Pt, height: Pt) -> InlineBox {
        InlineBox { width, height }
    }
}

impl InlineContent for InlineBox {
    fn width(&self) -> Pt {
        self.width
    }

    fn height(&self) -> Pt {
        self.height
    }

    fn draw(&self, canvas: &mut dyn Canvas, x: Pt, y: Pt) -> Result<(), LayoutError> {
        canvas.draw_rect(crate::rect::Rect::from_origin(x, y, self.width, self.height));
        Ok(())
    }
}

/// Breakable, stretchable spacing between boxes. `stretch` is a relative
/// weight: justification distributes a line's deficit across its glue items
/// proportionally to it.
#[derive(Debug, Clone, Copy)]
pub struct Glue {
    pub width: Pt,
    pub stretch: f32,
}

/// How strongly a [Penalty] invites or forbids breaking at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyCost {
    /// Break here unconditionally, ending the current line
    Mandatory,
    /// Never break here; the directly preceding glue stops being a
    /// breakpoint
    Prohibited,
    /// An ordinary candidate breakpoint with a bias value
    Cost(i32),
}

/// An explicit breakpoint candidate in the item stream. `width` is charged
/// against the line only when the break is actually taken (a hyphen, say),
/// and `post_break` opens the following line.
pub struct Penalty {
    pub cost: PenaltyCost,
    pub width: Pt,
    pub post_break: Option<Box<dyn InlineContent>>,
}

impl Penalty {
    /// A forced paragraph break
    pub fn mandatory_break() -> Penalty {
        Penalty {
            cost: PenaltyCost::Mandatory,
            width: Pt::ZERO,
            post_break: None,
        }
    }

    /// Forbids breaking at this position
    pub fn prohibited() -> Penalty {
        Penalty {
            cost: PenaltyCost::Prohibited,
            width: Pt::ZERO,
            post_break: None,
        }
    }

    pub fn new(cost: i32, width: Pt) -> Penalty {
        Penalty {
            cost: PenaltyCost::Cost(cost),
            width,
            post_break: None,
        }
    }

    pub fn with_post_break(mut self, content: Box<dyn InlineContent>) -> Penalty {
        self.post_break = Some(content);
        self
    }
}

/// One element of the line breaker's input stream.
pub enum Item {
    Box(Box<dyn InlineContent>),
    Glue(Glue),
    Penalty(Penalty),
}

impl Item {
    pub fn boxed(content: impl InlineContent + 'static) -> Item {
        Item::Box(Box::new(content))
    }

    pub fn glue(width: Pt, stretch: f32) -> Item {
        Item::Glue(Glue { width, stretch })
    }

    pub fn penalty(penalty: Penalty) -> Item {
        Item::Penalty(penalty)
    }

    /// The width the item contributes while sitting inside a line. A penalty
    /// contributes nothing unless the break is taken at it.
    pub fn width(&self) -> Pt {
        match self {
            Item::Box(content) => content.width(),
            Item::Glue(glue) => glue.width,
            Item::Penalty(_) => Pt::ZERO,
        }
    }

    pub fn height(&self) -> Pt {
        match self {
            Item::Box(content) => content.height(),
            _ => Pt::ZERO,
        }
    }

    pub fn is_glue(&self) -> bool {
        matches!(self, Item::Glue(_))
    }

    pub fn is_box(&self) -> bool {
        matches!(self, Item::Box(_))
    }
}
