use std::collections::VecDeque;

use crate::boxes::Canvas;
use crate::error::LayoutError;
use crate::geom::EPS;
use crate::style::Align;
use crate::units::Pt;

use super::items::{Item, PenaltyCost};
use super::line::{Line, LineSpacing};

/// The width budget a line has to fit into.
///
/// `Variable` widths are a function of the candidate line's vertical offset
/// from the layout top and its tentative height; the breaker re-evaluates it
/// whenever a new item could change the line's height. A frame's
/// [width_specification](crate::Frame::width_specification) is the
/// typical source of such a function when text wraps around cut-outs.
pub enum LineWidth<'a> {
    Fixed(Pt),
    Variable(&'a dyn Fn(Pt, Pt) -> Pt),
}

impl LineWidth<'_> {
    fn at(&self, offset: Pt, line_height: Pt) -> Pt {
        match self {
            LineWidth::Fixed(width) => *width,
            LineWidth::Variable(f) => f(offset, line_height),
        }
    }

    fn is_variable(&self) -> bool {
        matches!(self, LineWidth::Variable(_))
    }
}

/// How a [TextLayouter::fit] run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStatus {
    /// Every item was placed on a line
    Success,
    /// The height budget ran out; resume with the remaining items elsewhere
    Height,
    /// A box was wider than any line can be; it heads the remaining items
    BoxTooWide,
}

/// The outcome of a [TextLayouter::fit] run: the finished lines, the
/// unconsumed suffix of the item stream and the vertical extent used.
pub struct TextLayout {
    pub lines: Vec<Line>,
    pub remaining_items: Vec<Item>,
    pub status: TextStatus,
    pub height: Pt,
}

impl TextLayout {
    /// Draw every line with the layout's top-left corner at `(x, y)`. Boxes
    /// sit with their lower-left corner on their line's baseline.
    pub fn draw(&self, canvas: &mut dyn Canvas, x: Pt, y: Pt) -> Result<(), LayoutError> {
        for line in &self.lines {
            let mut pen = x + line.x_offset;
            let baseline = y - line.y_offset;
            for item in &line.items {
                match item {
                    Item::Box(content) => {
                        content.draw(canvas, pen, baseline)?;
                        pen += content.width();
                    }
                    Item::Glue(glue) => pen += glue.width,
                    Item::Penalty(_) => {}
                }
            }
        }
        Ok(())
    }
}

/// Breaks a box/glue/penalty item stream into lines.
///
/// A single forward pass with lookahead limited to the current candidate
/// line: items accumulate until one no longer fits the width budget, then
/// the line ends at the rightmost legal breakpoint seen so far. Justification
/// and horizontal alignment are applied per line as it is committed.
#[derive(Debug, Clone, Default)]
pub struct TextLayouter {
    pub align: Align,
    pub line_spacing: LineSpacing,
    /// Extra blocked width for the first line of every paragraph
    pub text_indent: Pt,
}

impl TextLayouter {
    pub fn new() -> TextLayouter {
        TextLayouter::default()
    }

    pub fn with_align(mut self, align: Align) -> TextLayouter {
        self.align = align;
        self
    }

    pub fn with_line_spacing(mut self, spacing: LineSpacing) -> TextLayouter {
        self.line_spacing = spacing;
        self
    }

    pub fn with_text_indent(mut self, indent: Pt) -> TextLayouter {
        self.text_indent = indent;
        self
    }

    /// Lay the items out into lines no wider than `width` and no deeper than
    /// `height`. Capacity exhaustion is a status on the result, never an
    /// error; the unplaced suffix comes back in `remaining_items`.
    pub fn fit(&self, items: Vec<Item>, width: LineWidth<'_>, height: Pt) -> TextLayout {
        let mut pending: VecDeque<Item> = items.into();
        let mut lines: Vec<Line> = Vec::new();
        let mut buf: Vec<Item> = Vec::new();
        let mut buf_width = Pt::ZERO;
        let mut buf_height = Pt::ZERO;
        let mut last_baseline = Pt::ZERO;
        let mut prev_height = Pt::ZERO;
        // vertical offset added by the search for a wide-enough position
        let mut extra = Pt::ZERO;
        let mut indent_next = true;

        macro_rules! commit {
            ($items:expr, $extra_width:expr, $ignore_justification:expr) => {{
                let mut line_items: Vec<Item> = $items;
                let mut trailing: Vec<Item> = Vec::new();
                while matches!(line_items.last(), Some(i) if !i.is_box()) {
                    if let Some(item) = line_items.pop() {
                        trailing.push(item);
                    }
                }
                let line_height = line_items
                    .iter()
                    .map(Item::height)
                    .fold(Pt::ZERO, Pt::max);
                let baseline = baseline_at(
                    self.line_spacing,
                    lines.is_empty(),
                    last_baseline,
                    prev_height,
                    line_height,
                    extra,
                );
                if baseline.0 > height.0 + EPS {
                    // the line was not committed, so nothing of it counts as
                    // consumed; hand every item back
                    trailing.reverse();
                    line_items.extend(trailing);
                    Err(line_items)
                } else {
                    let natural: Pt =
                        line_items.iter().map(Item::width).sum::<Pt>() + $extra_width;
                    let indent = if indent_next { self.text_indent } else { Pt::ZERO };
                    let target = width.at(baseline - line_height, line_height) - indent;
                    let mut line_width = natural;
                    if self.align == Align::Justify && !$ignore_justification {
                        line_width = justify(&mut line_items, natural, target, $extra_width);
                    }
                    let x_offset = indent
                        + match self.align {
                            Align::Left | Align::Justify => Pt::ZERO,
                            Align::Center => (target - line_width) * 0.5,
                            Align::Right => target - line_width,
                        };
                    lines.push(Line {
                        items: line_items,
                        width: line_width,
                        x_offset,
                        y_offset: baseline,
                        ignore_justification: $ignore_justification,
                    });
                    last_baseline = baseline;
                    prev_height = line_height;
                    extra = Pt::ZERO;
                    indent_next = false;
                    buf_width = Pt::ZERO;
                    buf_height = Pt::ZERO;
                    Ok(())
                }
            }};
        }

        macro_rules! abort {
            ($status:expr, $head:expr) => {{
                let mut remaining: Vec<Item> = $head;
                remaining.extend(pending);
                return TextLayout {
                    height: last_baseline,
                    lines,
                    remaining_items: remaining,
                    status: $status,
                };
            }};
        }

        while let Some(item) = pending.pop_front() {
            match item {
                Item::Glue(glue) => {
                    // glue at the start of a line is discarded
                    if buf.iter().any(Item::is_box) {
                        buf_width += glue.width;
                        buf.push(Item::Glue(glue));
                    }
                }
                Item::Penalty(penalty) => match penalty.cost {
                    PenaltyCost::Mandatory => {
                        match commit!(std::mem::take(&mut buf), penalty.width, true) {
                            Ok(()) => {
                                indent_next = true;
                                if let Some(post) = penalty.post_break {
                                    pending.push_front(Item::Box(post));
                                }
                            }
                            Err(mut items) => {
                                // the break was not taken; the penalty stays
                                // part of the unconsumed suffix
                                items.push(Item::Penalty(penalty));
                                abort!(TextStatus::Height, items);
                            }
                        }
                    }
                    _ => buf.push(Item::Penalty(penalty)),
                },
                Item::Box(content) => {
                    let tentative_height = buf_height.max(content.height());
                    let baseline = baseline_at(
                        self.line_spacing,
                        lines.is_empty(),
                        last_baseline,
                        prev_height,
                        tentative_height,
                        extra,
                    );
                    let indent = if indent_next { self.text_indent } else { Pt::ZERO };
                    let target =
                        width.at(baseline - tentative_height, tentative_height) - indent;

                    if (buf_width + content.width()).0 <= target.0 + EPS {
                        buf_width += content.width();
                        buf_height = tentative_height;
                        buf.push(Item::Box(content));
                        continue;
                    }

                    match find_breakpoint(&buf) {
                        Some(index) => {
                            // rest keeps the break item at its head until
                            // the line actually commits, so an aborted run
                            // returns the suffix untouched
                            let mut rest = buf.split_off(index);
                            let extra_width = match &rest[0] {
                                Item::Penalty(penalty) => penalty.width,
                                _ => Pt::ZERO,
                            };
                            if let Err(mut items) =
                                commit!(std::mem::take(&mut buf), extra_width, false)
                            {
                                items.extend(rest);
                                items.push(Item::Box(content));
                                abort!(TextStatus::Height, items);
                            }
                            if let Item::Penalty(penalty) = rest.remove(0) {
                                if let Some(post) = penalty.post_break {
                                    rest.insert(0, Item::Box(post));
                                }
                            }
                            // the unbroken tail and the box go back through
                            // the loop onto the next line
                            pending.push_front(Item::Box(content));
                            for item in rest.into_iter().rev() {
                                pending.push_front(item);
                            }
                        }
                        None if buf.iter().any(Item::is_box) => {
                            // no legal break before an overlong box: place
                            // what we have and report the box
                            if let Err(mut items) =
                                commit!(std::mem::take(&mut buf), Pt::ZERO, true)
                            {
                                items.push(Item::Box(content));
                                abort!(TextStatus::Height, items);
                            }
                            abort!(TextStatus::BoxTooWide, vec![Item::Box(content)]);
                        }
                        None => {
                            if width.is_variable() {
                                // search downward for a position wide enough
                                let step = content.height().max(Pt(1.0));
                                extra += step;
                                let searched = baseline_at(
                                    self.line_spacing,
                                    lines.is_empty(),
                                    last_baseline,
                                    prev_height,
                                    content.height(),
                                    extra,
                                );
                                if searched.0 > height.0 + EPS {
                                    abort!(TextStatus::Height, vec![Item::Box(content)]);
                                }
                                pending.push_front(Item::Box(content));
                            } else {
                                abort!(TextStatus::BoxTooWide, vec![Item::Box(content)]);
                            }
                        }
                    }
                }
            }
        }

        if buf.iter().any(Item::is_box) {
            if let Err(items) = commit!(std::mem::take(&mut buf), Pt::ZERO, true) {
                abort!(TextStatus::Height, items);
            }
        }

        TextLayout {
            height: last_baseline,
            lines,
            remaining_items: Vec::new(),
            status: TextStatus::Success,
        }
    }
}

fn baseline_at(
    spacing: LineSpacing,
    first_line: bool,
    last_baseline: Pt,
    prev_height: Pt,
    line_height: Pt,
    extra: Pt,
) -> Pt {
    if first_line {
        extra + line_height
    } else {
        last_baseline + spacing.baseline_distance(prev_height, line_height) + extra
    }
}

// rightmost legal breakpoint in the current line buffer: a glue preceded by
// a box and not guarded by a prohibited penalty, or an ordinary-cost penalty
// preceded by a box
fn find_breakpoint(buf: &[Item]) -> Option<usize> {
    for index in (0..buf.len()).rev() {
        let preceded_by_box = || buf[..index].iter().any(Item::is_box);
        match &buf[index] {
            Item::Glue(_) => {
                let guarded = matches!(
                    buf.get(index + 1),
                    Some(Item::Penalty(p)) if p.cost == PenaltyCost::Prohibited
                );
                if !guarded && preceded_by_box() {
                    return Some(index);
                }
            }
            Item::Penalty(penalty) => {
                if matches!(penalty.cost, PenaltyCost::Cost(_)) && preceded_by_box() {
                    return Some(index);
                }
            }
            Item::Box(_) => {}
        }
    }
    None
}

// stretch the line's glue so it fills the target width exactly; with no
// stretchable glue the natural width stands
fn justify(items: &mut [Item], natural: Pt, target: Pt, extra_width: Pt) -> Pt {
    let total_stretch: f32 = items
        .iter()
        .filter_map(|item| match item {
            Item::Glue(glue) => Some(glue.stretch),
            _ => None,
        })
        .sum();
    if total_stretch <= f32::EPSILON {
        return natural;
    }
    let deficit = target - natural;
    for item in items.iter_mut() {
        if let Item::Glue(glue) = item {
            glue.width += deficit * (glue.stretch / total_stretch);
        }
    }
    items.iter().map(Item::width).sum::<Pt>() + extra_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::testutil::RecordingCanvas;
    use crate::layout::items::{InlineBox, Penalty, PenaltyCost};

    fn boxes_with_glue(count: usize, width: f32, height: f32) -> Vec<Item> {
        let mut items = Vec::new();
        for i in 0..count {
            if i > 0 {
                items.push(Item::glue(Pt::ZERO, 1.0));
            }
            items.push(Item::boxed(InlineBox::new(Pt(width), Pt(height))));
        }
        items
    }

    #[test]
    fn five_boxes_fill_one_line_at_exactly_their_width() {
        let layouter = TextLayouter::new();
        let result = layouter.fit(
            boxes_with_glue(5, 20.0, 20.0),
            LineWidth::Fixed(Pt(100.0)),
            Pt(1000.0),
        );
        assert_eq!(result.status, TextStatus::Success);
        assert_eq!(result.lines.len(), 1);
        assert!((result.lines[0].width.0 - 100.0).abs() < 0.001);
    }

    #[test]
    fn one_point_less_breaks_off_the_last_box() {
        let layouter = TextLayouter::new();
        let result = layouter.fit(
            boxes_with_glue(5, 20.0, 20.0),
            LineWidth::Fixed(Pt(99.0)),
            Pt(1000.0),
        );
        assert_eq!(result.status, TextStatus::Success);
        assert_eq!(result.lines.len(), 2);
        assert!((result.lines[0].width.0 - 80.0).abs() < 0.001);
        assert!((result.lines[1].width.0 - 20.0).abs() < 0.001);
    }

    #[test]
    fn mandatory_break_ends_the_line_despite_ample_width() {
        let layouter = TextLayouter::new();
        let items = vec![
            Item::boxed(InlineBox::new(Pt(20.0), Pt(10.0))),
            Item::penalty(Penalty::mandatory_break()),
            Item::boxed(InlineBox::new(Pt(20.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(500.0)), Pt(1000.0));
        assert_eq!(result.lines.len(), 2);
        assert!(result.lines[0].ignore_justification);
        assert!((result.lines[0].width.0 - 20.0).abs() < 0.001);
    }

    #[test]
    fn prohibited_break_forces_box_too_wide_instead_of_breaking() {
        let layouter = TextLayouter::new();
        let items = vec![
            Item::boxed(InlineBox::new(Pt(50.0), Pt(10.0))),
            Item::glue(Pt(10.0), 1.0),
            Item::penalty(Penalty::prohibited()),
            Item::boxed(InlineBox::new(Pt(60.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(1000.0));
        assert_eq!(result.status, TextStatus::BoxTooWide);
        assert_eq!(result.lines.len(), 1);
        assert!((result.lines[0].width.0 - 50.0).abs() < 0.001);
        // the overflowing box heads the unconsumed suffix
        assert_eq!(result.remaining_items.len(), 1);
        assert!((result.remaining_items[0].width().0 - 60.0).abs() < 0.001);
    }

    #[test]
    fn without_the_prohibition_the_same_stream_breaks_at_the_glue() {
        let layouter = TextLayouter::new();
        let items = vec![
            Item::boxed(InlineBox::new(Pt(50.0), Pt(10.0))),
            Item::glue(Pt(10.0), 1.0),
            Item::boxed(InlineBox::new(Pt(60.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(1000.0));
        assert_eq!(result.status, TextStatus::Success);
        assert_eq!(result.lines.len(), 2);
    }

    #[test]
    fn justified_lines_hit_the_target_width_exactly() {
        let layouter = TextLayouter::new().with_align(Align::Justify);
        let items = vec![
            Item::boxed(InlineBox::new(Pt(40.0), Pt(10.0))),
            Item::glue(Pt(10.0), 1.0),
            Item::boxed(InlineBox::new(Pt(40.0), Pt(10.0))),
            Item::glue(Pt(10.0), 1.0),
            Item::boxed(InlineBox::new(Pt(40.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(1000.0));
        assert_eq!(result.lines.len(), 2);
        // first line stretched from its natural 90 to the full 100
        assert!(!result.lines[0].ignore_justification);
        assert!((result.lines[0].width.0 - 100.0).abs() < 0.001);
        // the paragraph's last line keeps its natural width
        assert!(result.lines[1].ignore_justification);
        assert!((result.lines[1].width.0 - 40.0).abs() < 0.001);
    }

    #[test]
    fn hyphenation_penalty_adds_its_width_and_opens_the_next_line() {
        let layouter = TextLayouter::new();
        let items = vec![
            Item::boxed(InlineBox::new(Pt(60.0), Pt(10.0))),
            Item::penalty(
                Penalty::new(50, Pt(5.0))
                    .with_post_break(Box::new(InlineBox::new(Pt(8.0), Pt(10.0)))),
            ),
            Item::boxed(InlineBox::new(Pt(60.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(1000.0));
        assert_eq!(result.status, TextStatus::Success);
        assert_eq!(result.lines.len(), 2);
        assert!((result.lines[0].width.0 - 65.0).abs() < 0.001);
        assert!((result.lines[1].width.0 - 68.0).abs() < 0.001);
    }

    #[test]
    fn fixed_line_spacing_places_baselines_at_constant_distance() {
        let layouter = TextLayouter::new().with_line_spacing(LineSpacing::Fixed(Pt(50.0)));
        let items = vec![
            Item::boxed(InlineBox::new(Pt(20.0), Pt(20.0))),
            Item::penalty(Penalty::mandatory_break()),
            Item::boxed(InlineBox::new(Pt(20.0), Pt(20.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(1000.0));
        assert!((result.lines[0].y_offset.0 - 20.0).abs() < 0.001);
        assert!((result.lines[1].y_offset.0 - 70.0).abs() < 0.001);
        assert!((result.height.0 - 70.0).abs() < 0.001);
    }

    #[test]
    fn height_budget_exhaustion_returns_the_unplaced_suffix() {
        let layouter = TextLayouter::new();
        let items = vec![
            Item::boxed(InlineBox::new(Pt(20.0), Pt(10.0))),
            Item::penalty(Penalty::mandatory_break()),
            Item::boxed(InlineBox::new(Pt(20.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(15.0));
        assert_eq!(result.status, TextStatus::Height);
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.remaining_items.len(), 1);
        assert!((result.height.0 - 10.0).abs() < 0.001);
    }

    #[test]
    fn height_abort_at_a_mandatory_break_keeps_the_penalty_in_the_suffix() {
        let layouter = TextLayouter::new();
        let items = vec![
            Item::boxed(InlineBox::new(Pt(20.0), Pt(10.0))),
            Item::penalty(Penalty::mandatory_break()),
            Item::boxed(InlineBox::new(Pt(20.0), Pt(10.0))),
        ];
        // not even the first line fits, so nothing at all is consumed
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(5.0));
        assert_eq!(result.status, TextStatus::Height);
        assert!(result.lines.is_empty());
        assert_eq!(result.remaining_items.len(), 3);
        assert!(matches!(
            &result.remaining_items[1],
            Item::Penalty(p) if p.cost == PenaltyCost::Mandatory
        ));
    }

    #[test]
    fn height_abort_at_a_glue_break_keeps_the_glue_in_the_suffix() {
        let layouter = TextLayouter::new();
        let items = vec![
            Item::boxed(InlineBox::new(Pt(60.0), Pt(10.0))),
            Item::glue(Pt(5.0), 1.0),
            Item::boxed(InlineBox::new(Pt(60.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(5.0));
        assert_eq!(result.status, TextStatus::Height);
        assert!(result.lines.is_empty());
        assert_eq!(result.remaining_items.len(), 3);
        assert!(result.remaining_items[1].is_glue());
    }

    #[test]
    fn variable_width_searches_downward_for_a_wide_enough_spot() {
        // narrow above 30pt depth, wide below
        let f = |offset: Pt, _h: Pt| if offset.0 < 30.0 { Pt(10.0) } else { Pt(100.0) };
        let layouter = TextLayouter::new();
        let items = vec![Item::boxed(InlineBox::new(Pt(50.0), Pt(10.0)))];
        let result = layouter.fit(items, LineWidth::Variable(&f), Pt(100.0));
        assert_eq!(result.status, TextStatus::Success);
        assert_eq!(result.lines.len(), 1);
        assert!((result.lines[0].y_offset.0 - 40.0).abs() < 0.001);
    }

    #[test]
    fn variable_width_search_gives_up_at_the_height_budget() {
        let f = |_offset: Pt, _h: Pt| Pt(10.0);
        let layouter = TextLayouter::new();
        let items = vec![Item::boxed(InlineBox::new(Pt(50.0), Pt(10.0)))];
        let result = layouter.fit(items, LineWidth::Variable(&f), Pt(40.0));
        assert_eq!(result.status, TextStatus::Height);
        assert!(result.lines.is_empty());
        assert_eq!(result.remaining_items.len(), 1);
    }

    #[test]
    fn text_indent_blocks_width_on_the_first_line_of_a_paragraph() {
        let layouter = TextLayouter::new().with_text_indent(Pt(10.0));
        let items = vec![
            Item::boxed(InlineBox::new(Pt(50.0), Pt(10.0))),
            Item::glue(Pt(5.0), 1.0),
            Item::boxed(InlineBox::new(Pt(45.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(1000.0));
        // 50 + 5 + 45 would fit 100, but the indent blocks 10
        assert_eq!(result.lines.len(), 2);
        assert!((result.lines[0].x_offset.0 - 10.0).abs() < 0.001);
        assert!((result.lines[1].x_offset.0 - 0.0).abs() < 0.001);
    }

    #[test]
    fn a_box_wider_than_a_fixed_width_is_reported_not_dropped() {
        let layouter = TextLayouter::new();
        let items = vec![Item::boxed(InlineBox::new(Pt(200.0), Pt(10.0)))];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(1000.0));
        assert_eq!(result.status, TextStatus::BoxTooWide);
        assert!(result.lines.is_empty());
        assert_eq!(result.remaining_items.len(), 1);
    }

    #[test]
    fn draw_advances_the_pen_through_boxes_and_glue() {
        let layouter = TextLayouter::new();
        let items = vec![
            Item::boxed(InlineBox::new(Pt(20.0), Pt(10.0))),
            Item::glue(Pt(5.0), 1.0),
            Item::boxed(InlineBox::new(Pt(20.0), Pt(10.0))),
        ];
        let result = layouter.fit(items, LineWidth::Fixed(Pt(100.0)), Pt(1000.0));
        let mut canvas = RecordingCanvas::default();
        result.draw(&mut canvas, Pt(100.0), Pt(200.0)).unwrap();

        assert_eq!(canvas.rects.len(), 2);
        // baseline sits one line height below the top anchor
        assert!((canvas.rects[0].x1.0 - 100.0).abs() < 0.001);
        assert!((canvas.rects[0].y1.0 - 190.0).abs() < 0.001);
        assert!((canvas.rects[1].x1.0 - 125.0).abs() < 0.001);
    }

    #[test]
    fn empty_input_is_a_trivial_success() {
        let layouter = TextLayouter::new();
        let result = layouter.fit(Vec::new(), LineWidth::Fixed(Pt(100.0)), Pt(100.0));
        assert_eq!(result.status, TextStatus::Success);
        assert!(result.lines.is_empty());
        assert!((result.height.0 - 0.0).abs() < 0.001);
    }
}
