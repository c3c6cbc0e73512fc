use crate::units::Pt;

use super::items::Item;

/// Vertical rhythm between consecutive lines, expressed as the
/// baseline-to-baseline distance. The first line's baseline always sits at
/// its own height below the layout top; the policy governs every distance
/// after that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSpacing {
    /// Baseline distance equals the next line's natural height
    Single,
    /// Multiplier on the next line's natural height
    Proportional(f32),
    /// Absolute baseline distance regardless of line heights
    Fixed(Pt),
    /// Natural height plus an additive leading
    Leading(Pt),
}

impl Default for LineSpacing {
    fn default() -> LineSpacing {
        LineSpacing::Single
    }
}

impl LineSpacing {
    /// Distance from the previous line's baseline to the next one's
    pub fn baseline_distance(&self, _prev_height: Pt, next_height: Pt) -> Pt {
        match *self {
            LineSpacing::Single => next_height,
            LineSpacing::Proportional(factor) => next_height * factor,
            LineSpacing::Fixed(distance) => distance,
            LineSpacing::Leading(leading) => next_height + leading,
        }
    }

    /// The blank distance between the previous line's bottom and the next
    /// line's top
    pub fn gap(&self, prev_height: Pt, next_height: Pt) -> Pt {
        self.baseline_distance(prev_height, next_height) - next_height
    }
}

/// One finished line of the breaker's output: the items that made it,
/// measured and positioned.
///
/// `y_offset` is the baseline's distance below the layout's top edge.
/// `width` reflects any glue adjustment justification applied; for
/// `ignore_justification` lines it equals the natural width.
pub struct Line {
    pub items: Vec<Item>,
    pub width: Pt,
    pub x_offset: Pt,
    pub y_offset: Pt,
    pub ignore_justification: bool,
}

impl Line {
    /// The tallest box on the line; zero for a line of pure spacing
    pub fn height(&self) -> Pt {
        self.items
            .iter()
            .map(Item::height)
            .fold(Pt::ZERO, Pt::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_policies_measure_baseline_to_baseline() {
        let h = Pt(12.0);
        assert_eq!(LineSpacing::Single.baseline_distance(h, h), Pt(12.0));
        assert_eq!(
            LineSpacing::Proportional(1.5).baseline_distance(h, h),
            Pt(18.0)
        );
        assert_eq!(
            LineSpacing::Fixed(Pt(30.0)).baseline_distance(h, h),
            Pt(30.0)
        );
        assert_eq!(
            LineSpacing::Leading(Pt(3.0)).baseline_distance(h, h),
            Pt(15.0)
        );
    }

    #[test]
    fn gap_is_the_distance_not_covered_by_the_line_itself() {
        let h = Pt(10.0);
        assert_eq!(LineSpacing::Fixed(Pt(25.0)).gap(h, h), Pt(15.0));
        assert_eq!(LineSpacing::Single.gap(h, h), Pt::ZERO);
    }
}
