//! Error types for the viewer core.

use thiserror::Error;

/// Errors that can occur in the viewer core.
///
/// None of these are fatal; callers either surface them through the
/// [`WarningOperator`](crate::collab::WarningOperator) or recover locally
/// (for example by dropping a drawn sample whose unprojection failed).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// Attempted to invert a matrix whose determinant is near zero.
    #[error("matrix is singular (|det| = {determinant:e})")]
    SingularMatrix {
        /// Absolute value of the determinant at the time of the failure
        determinant: f64,
    },

    /// Screen to model unprojection failed (degenerate projection matrix).
    #[error("unprojection failed at window coordinates ({x}, {y})")]
    UnprojectionFailed {
        /// Window x coordinate of the attempted unprojection
        x: i32,
        /// Window y coordinate of the attempted unprojection
        y: i32,
    },

    /// The two endpoints of a border splice refer to different borders.
    #[error("splice endpoints refer to different borders ({first} and {second})")]
    MisalignedSplice {
        /// Border index of the first endpoint
        first: usize,
        /// Border index of the second endpoint
        second: usize,
    },

    /// Volume border drawing requires a displayed volume.
    #[error("at least one volume must be displayed to draw a volume border")]
    MissingVolume,

    /// The operation requires a displayed model of a kind that is not shown.
    #[error("no suitable model is displayed in this window")]
    NoModelDisplayed,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ViewerError>;
