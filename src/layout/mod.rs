//! Line breaking for streams of inline content.
//!
//! The item model follows the box/glue/penalty scheme: measured content
//! ([items::InlineContent]), stretchable spacing ([items::Glue]) and
//! explicit breakpoints ([items::Penalty]). [text::TextLayouter] turns an
//! item stream into positioned [line::Line]s against a fixed or
//! vertically-varying width budget.

pub mod items;
pub mod line;
pub mod text;

pub use items::{Glue, InlineBox, InlineContent, Item, Penalty, PenaltyCost};
pub use line::{Line, LineSpacing};
pub use text::{LineWidth, TextLayout, TextLayouter, TextStatus};
