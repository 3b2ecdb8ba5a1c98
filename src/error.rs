//! Errors raised while preparing a region for packing.

use crate::shape::ShapeId;

/// Reasons a region cannot be turned into a packing problem.
///
/// These are scoped to a single region, callers should keep processing the
/// remaining regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The region requires copies of a shape with no occupied cells.
    #[error("shape {shape} has no occupied cells but is required by the region")]
    MalformedShape {
        /// The empty shape.
        shape: ShapeId,
    },
    /// The region requires a shape that is missing from the shape set.
    #[error("shape {shape} is required by the region but was never defined")]
    UnknownShape {
        /// The missing shape identifier.
        shape: ShapeId,
    },
}
