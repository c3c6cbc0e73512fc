//! `pdf-flow` is the document-flow layout core of a PDF-producing library:
//! it decides where content goes on a page and how a stream of inline items
//! becomes concrete lines and placed rectangles. It deliberately stops short
//! of drawing: boxes implement the [Canvas]/[LayoutBox] seams and emit their
//! own marks, the engine only hands them coordinates.
//!
//! The pieces, leaves first:
//!
//! * [PolygonSet] wraps the polygon arithmetic the engine consumes.
//! * [WidthFromPolygon] computes the free horizontal intervals of a vertical
//!   band against a polygon outline, for content flowing around cut-outs.
//! * [Frame] tracks the still-available region of a page area and fits boxes
//!   into it, one rectangular sub-region at a time.
//! * [BoxFitter] drives a box sequence across several frames (columns,
//!   pages), splitting boxes at frame boundaries.
//! * [layout] breaks box/glue/penalty item streams into justified lines.
//!
//! A minimal flow, fitting two blocks into a column:
//!
//! ```
//! use pdf_flow::{BlockBox, BoxFitter, Frame, Pt};
//!
//! let frame = Frame::new(Pt(72.0), Pt(72.0), Pt(468.0), Pt(648.0));
//! let mut fitter = BoxFitter::new(vec![frame]);
//! fitter.fit(Box::new(BlockBox::new(Pt(468.0), Pt(100.0))));
//! fitter.fit(Box::new(BlockBox::new(Pt(200.0), Pt(50.0))));
//! assert!(fitter.success());
//! ```

mod boxes;
mod error;
mod fitter;
mod frame;
mod geom;
pub mod layout;
mod rect;
mod style;
mod units;
mod width;

pub use boxes::{BlockBox, Canvas, DynBox, FitStatus, LayoutBox};
pub use error::LayoutError;
pub use fitter::BoxFitter;
pub use frame::{Cursor, FitResult, FitResultStatus, Frame};
pub use geom::PolygonSet;
pub use rect::Rect;
pub use style::{Align, Margins, Overflow, Position, Style, VAlign};
pub use units::Pt;
pub use width::WidthFromPolygon;

pub use geo;
