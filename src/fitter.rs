use crate::boxes::{Canvas, DynBox};
use crate::error::LayoutError;
use crate::frame::{FitResult, FitResultStatus, Frame};
use crate::units::Pt;

/// Places a sequence of boxes into a sequence of [Frame]s, splitting boxes
/// across frame boundaries where they allow it.
///
/// The fitter owns the frames for the duration of the run and consumes their
/// area as it places content, so successive [fit](BoxFitter::fit) calls see
/// the space earlier boxes took. Once a box can be placed nowhere, the fitter
/// stops placing and collects every further box verbatim, so no content is
/// ever lost: each input box ends up either in a fit result or in
/// [remaining_boxes](BoxFitter::remaining_boxes).
pub struct BoxFitter {
    frames: Vec<Frame>,
    fit_results: Vec<(usize, FitResult)>,
    content_heights: Vec<Pt>,
    remaining_boxes: Vec<DynBox>,
    frame_index: usize,
    success: bool,
}

impl BoxFitter {
    pub fn new(frames: Vec<Frame>) -> BoxFitter {
        let heights = vec![Pt::ZERO; frames.len()];
        BoxFitter {
            frames,
            fit_results: Vec::new(),
            content_heights: heights,
            remaining_boxes: Vec::new(),
            frame_index: 0,
            success: true,
        }
    }

    /// Whether every box fitted so far found a home
    pub fn success(&self) -> bool {
        self.success
    }

    /// The placements so far, each paired with the index of the frame it
    /// landed in
    pub fn fit_results(&self) -> &[(usize, FitResult)] {
        &self.fit_results
    }

    /// Boxes that could not be placed anywhere
    pub fn remaining_boxes(&self) -> &[DynBox] {
        &self.remaining_boxes
    }

    /// Per frame, the vertical extent from the frame's top edge down to the
    /// lowest placed content
    pub fn content_heights(&self) -> &[Pt] {
        &self.content_heights
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Fit one box, splitting it across frames as needed. After the first
    /// box that fits nowhere, every later box goes straight to
    /// [remaining_boxes](BoxFitter::remaining_boxes) so ordering is
    /// preserved.
    pub fn fit(&mut self, content: DynBox) {
        if !self.success {
            self.remaining_boxes.push(content);
            return;
        }

        let mut current = content;
        loop {
            let frame = match self.frames.get_mut(self.frame_index) {
                Some(frame) => frame,
                None => {
                    self.remaining_boxes.push(current);
                    self.success = false;
                    return;
                }
            };
            let result = frame.fit(current);
            match result.status {
                FitResultStatus::Success => {
                    self.record(result);
                    return;
                }
                FitResultStatus::Overflow => {
                    let (fitted, rest) = frame.split(result);
                    if let Some(fitted) = fitted {
                        self.record(fitted);
                    } else {
                        // the box refused to split; try it whole elsewhere
                        self.frame_index += 1;
                    }
                    match rest {
                        Some(rest) => current = rest,
                        None => return,
                    }
                }
                FitResultStatus::Failure => {
                    self.frame_index += 1;
                    current = result.content;
                }
            }
        }
    }

    /// Draw every recorded placement. The consumed areas were already taken
    /// out of the frames during fitting.
    pub fn draw(&self, canvas: &mut dyn Canvas) -> Result<(), LayoutError> {
        for (_, result) in &self.fit_results {
            result.draw(canvas, Pt::ZERO, Pt::ZERO)?;
        }
        Ok(())
    }

    /// Tear the fitter apart into its placements and leftovers
    pub fn into_parts(self) -> (Vec<Frame>, Vec<(usize, FitResult)>, Vec<DynBox>) {
        (self.frames, self.fit_results, self.remaining_boxes)
    }

    fn record(&mut self, result: FitResult) {
        let frame = &mut self.frames[self.frame_index];
        frame.remove_area(&result.mask);
        let top = frame.bottom() + frame.height();
        let depth = top - result.y;
        if depth > self.content_heights[self.frame_index] {
            self.content_heights[self.frame_index] = depth;
        }
        self.fit_results.push((self.frame_index, result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BlockBox;

    fn two_column_fitter() -> BoxFitter {
        BoxFitter::new(vec![
            Frame::new(Pt(0.0), Pt(0.0), Pt(100.0), Pt(90.0)),
            Frame::new(Pt(120.0), Pt(0.0), Pt(100.0), Pt(40.0)),
        ])
    }

    #[test]
    fn a_tall_box_splits_across_frames() {
        let mut fitter = two_column_fitter();
        fitter.fit(Box::new(BlockBox::new(Pt(100.0), Pt(120.0))));

        assert!(fitter.success());
        let results = fitter.fit_results();
        assert_eq!(results.len(), 2);

        let (frame_a, first) = &results[0];
        assert_eq!(*frame_a, 0);
        assert!((first.content.height().0 - 90.0).abs() < 0.001);
        assert!((first.y.0 - 0.0).abs() < 0.001);

        let (frame_b, second) = &results[1];
        assert_eq!(*frame_b, 1);
        assert!((second.content.height().0 - 30.0).abs() < 0.001);
        assert!((second.y.0 - 10.0).abs() < 0.001);
    }

    #[test]
    fn fitting_continues_in_the_next_frame_when_one_fills_up() {
        let mut fitter = two_column_fitter();
        fitter.fit(Box::new(BlockBox::new(Pt(50.0), Pt(90.0))));
        fitter.fit(Box::new(BlockBox::new(Pt(50.0), Pt(20.0))));

        assert!(fitter.success());
        let results = fitter.fit_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert_eq!(results[1].0, 1);
        assert!((results[1].1.y.0 - 20.0).abs() < 0.001);
    }

    #[test]
    fn content_heights_measure_from_each_frame_top() {
        let mut fitter = two_column_fitter();
        fitter.fit(Box::new(BlockBox::new(Pt(50.0), Pt(30.0))));
        fitter.fit(Box::new(BlockBox::new(Pt(50.0), Pt(70.0))));

        // 30 + 60 in the first frame, the remaining 10 in the second
        let heights = fitter.content_heights();
        assert!((heights[0].0 - 90.0).abs() < 0.001);
        assert!((heights[1].0 - 10.0).abs() < 0.001);
    }

    #[test]
    fn after_the_first_unplaceable_box_everything_is_collected() {
        let mut fitter = two_column_fitter();
        fitter.fit(Box::new(BlockBox::new(Pt(500.0), Pt(10.0))));
        fitter.fit(Box::new(BlockBox::new(Pt(10.0), Pt(10.0))));

        assert!(!fitter.success());
        assert!(fitter.fit_results().is_empty());
        // the small box would have fitted, but ordering wins
        assert_eq!(fitter.remaining_boxes().len(), 2);
    }

    #[test]
    fn every_box_is_accounted_for() {
        let mut fitter = two_column_fitter();
        let heights = [40.0, 40.0, 40.0, 40.0, 40.0];
        for h in heights {
            fitter.fit(Box::new(BlockBox::new(Pt(100.0), Pt(h))));
        }

        let placed: f32 = fitter
            .fit_results()
            .iter()
            .map(|(_, r)| r.content.height().0)
            .sum();
        let left: f32 = fitter
            .remaining_boxes()
            .iter()
            .map(|b| b.height().0)
            .sum();
        assert!((placed + left - 200.0).abs() < 0.01);
    }
}
