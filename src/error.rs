use thiserror::Error;

/// All errors that the crate can generate.
///
/// Capacity problems (a box or line that does not fit) are never reported
/// through this type; they come back as status values so that callers can
/// retry in another frame or column. [LayoutError] covers the hard failures:
/// contract violations and the `overflow: error` drawing policy.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A [FitResult](crate::FitResult) whose status is failure was handed to
    /// a drawing entry point
    #[error("cannot draw a fit result whose status is failure")]
    DrawAfterFailure,

    /// Content was clipped while the box style demands `Overflow::Error`
    #[error("content exceeds the available space and overflow is set to error")]
    ContentOverflow,
}
