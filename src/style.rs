use crate::units::Pt;

/// Margins are used when laying out boxes in a frame. They inflate the area a
/// placed box removes from the frame, but a margin that coincides with the
/// frame's own boundary is not charged, so content at a page edge does not
/// get a double margin.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Create margins where all values are 0.0
    pub fn none() -> Margins {
        Margins::default()
    }
}

/// How a box is positioned within a frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Position {
    /// Placed against the current cursor region, stacking downward
    #[default]
    Default,
    /// Anchored at a fixed offset from the frame's lower-left corner
    Absolute { dx: Pt, dy: Pt },
    /// Placed like [Position::Default] but removing only its own footprint,
    /// so later boxes can use the space beside it
    Float,
    /// Fitted against the frame's actual polygon shape so content can wrap
    /// around holes and cut-outs
    Flow,
}

/// Horizontal alignment of a box within its region, or of a text line within
/// its width budget.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    /// Stretch inter-item glue so the line exactly fills the budget; only
    /// meaningful for text lines
    Justify,
}

/// Vertical alignment of a box within the current region.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// What should happen when a box's content does not fully fit where it is
/// drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Overflow {
    /// Refuse to draw clipped content; drawing returns an error
    #[default]
    Error,
    /// Silently render the part that fits
    Truncate,
}

/// The styling surface the layout engine consumes. Owned by the box
/// implementations, read here.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Style {
    pub position: Position,
    pub margin: Margins,
    pub padding: Margins,
    pub border: Pt,
    pub align: Align,
    pub valign: VAlign,
    pub overflow: Overflow,
}

impl Style {
    pub fn with_position(mut self, position: Position) -> Style {
        self.position = position;
        self
    }

    pub fn with_margin(mut self, margin: Margins) -> Style {
        self.margin = margin;
        self
    }

    pub fn with_align(mut self, align: Align) -> Style {
        self.align = align;
        self
    }

    pub fn with_valign(mut self, valign: VAlign) -> Style {
        self.valign = valign;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Style {
        self.overflow = overflow;
        self
    }
}
