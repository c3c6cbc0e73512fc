use crate::units::Pt;

/// A rectangle, specified by two opposite corners.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the first (typically, lower-left) corner.
    pub x1: Pt,
    /// The y-coordinate of the first (typically, lower-left) corner.
    pub y1: Pt,
    /// The x-coordinate of the second (typically, upper-right) corner.
    pub x2: Pt,
    /// The y-coordinate of the second (typically, upper-right) corner.
    pub y2: Pt,
}

impl Rect {
    /// Create a rectangle from two opposite corners, normalising so that
    /// `(x1, y1)` ends up the lower-left corner
    pub fn new(x1: Pt, y1: Pt, x2: Pt, y2: Pt) -> Rect {
        Rect {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Create a rectangle from its lower-left corner and its dimensions
    pub fn from_origin(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// Whether the point lies within the rectangle (boundary included)
    pub fn contains(&self, x: Pt, y: Pt) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Whether the two rectangles share any area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }

    /// The same rectangle shifted by the given offsets
    pub fn translated(&self, dx: Pt, dy: Pt) -> Rect {
        Rect {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Grow the rectangle outward on each side; used to inflate a placement
    /// rectangle by its margins
    pub fn expanded(&self, left: Pt, bottom: Pt, right: Pt, top: Pt) -> Rect {
        Rect::new(
            self.x1 - left,
            self.y1 - bottom,
            self.x2 + right,
            self.y2 + top,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_corners() {
        let r = Rect::new(Pt(10.0), Pt(20.0), Pt(0.0), Pt(5.0));
        assert_eq!(r.x1, Pt(0.0));
        assert_eq!(r.y1, Pt(5.0));
        assert_eq!(r.width(), Pt(10.0));
        assert_eq!(r.height(), Pt(15.0));
    }

    #[test]
    fn intersection_is_open() {
        let a = Rect::new(Pt(0.0), Pt(0.0), Pt(10.0), Pt(10.0));
        let b = Rect::new(Pt(10.0), Pt(0.0), Pt(20.0), Pt(10.0));
        let c = Rect::new(Pt(5.0), Pt(5.0), Pt(15.0), Pt(15.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }
}
