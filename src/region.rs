//! Rectangular regions and the area check used to skip obvious cases.

use crate::{
    error::Error,
    shape::{Shape, ShapeId, ShapeSet, SHAPE_SIDE},
};
use std::collections::BTreeMap;

/// A board cell as `(row, column)`.
pub type Cell = (usize, usize);

/// A rectangular board together with the number of copies of each shape that
/// must be packed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    width: usize,
    height: usize,
    counts: BTreeMap<ShapeId, usize>,
}

impl Region {
    /// Create a new region. Counts given for the same shape more than once
    /// are added together.
    pub fn new(
        width: usize,
        height: usize,
        counts: impl IntoIterator<Item = (ShapeId, usize)>,
    ) -> Self {
        let mut merged = BTreeMap::new();
        for (shape, count) in counts {
            *merged.entry(shape).or_insert(0) += count;
        }

        Region {
            width,
            height,
            counts: merged,
        }
    }

    /// Get the board width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the board height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Return the number of cells on the board.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Return the number of copies required of `shape`.
    pub fn count(&self, shape: ShapeId) -> usize {
        self.counts.get(&shape).copied().unwrap_or(0)
    }

    /// Return the required counts in shape identifier order, including zero
    /// counts.
    pub fn counts(&self) -> impl Iterator<Item = (ShapeId, usize)> + '_ {
        self.counts.iter().map(|(shape, count)| (*shape, *count))
    }

    /// Return the total number of shape copies required.
    pub fn total_instances(&self) -> usize {
        self.counts
            .values()
            .fold(0usize, |total, count| total.saturating_add(*count))
    }

    /// Return every required instance, ordered by shape then index.
    pub fn instances(&self) -> impl Iterator<Item = Instance> + '_ {
        self.counts()
            .flat_map(|(shape, count)| (0..count).map(move |index| Instance { shape, index }))
    }

    /// Resolve every shape with a non-zero count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShape`] if a required shape is missing from
    /// `shapes`, and [`Error::MalformedShape`] if it has no occupied cells.
    pub fn required_shapes<'s>(
        &self,
        shapes: &'s ShapeSet,
    ) -> Result<Vec<(&'s Shape, usize)>, Error> {
        self.counts()
            .filter(|(_, count)| *count > 0)
            .map(|(id, count)| {
                let shape = shapes.get(id).ok_or(Error::UnknownShape { shape: id })?;
                if shape.is_empty() {
                    log::warn!("Shape [{}] is required [{}] times but is empty.", id, count);
                    return Err(Error::MalformedShape { shape: id });
                }

                Ok((shape, count))
            })
            .collect()
    }

    /// Return the total number of cells occupied by all required copies.
    ///
    /// # Errors
    ///
    /// Fails like [`Region::required_shapes`].
    pub fn needed_cells(&self, shapes: &ShapeSet) -> Result<usize, Error> {
        Ok(self
            .required_shapes(shapes)?
            .into_iter()
            .fold(0usize, |total, (shape, count)| {
                total.saturating_add(shape.cell_count().saturating_mul(count))
            }))
    }
}

/// One distinguishable copy of a shape required by a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instance {
    /// The shape being copied.
    pub shape: ShapeId,
    /// Which copy, ranging from 0 to `count - 1`.
    pub index: usize,
}

/// Verdict of the area check performed by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Enough room even if every shape took its whole 3×3 grid.
    EasyYes,
    /// The shapes have more cells than the board.
    EasyNo,
    /// The area check is inconclusive, a search is needed.
    NeedsSolve,
}

/// Decide from area alone whether a region obviously can or cannot be packed.
///
/// A region whose shapes need more cells than the board has is
/// [`Classification::EasyNo`]. Otherwise, if every shape could be given its
/// own full 3×3 area, it is [`Classification::EasyYes`]. Everything else is
/// [`Classification::NeedsSolve`].
///
/// # Errors
///
/// Fails like [`Region::required_shapes`].
pub fn classify(shapes: &ShapeSet, region: &Region) -> Result<Classification, Error> {
    let needed = region.needed_cells(shapes)?;
    let area = region.area();

    let classification = if needed > area {
        Classification::EasyNo
    } else if region
        .total_instances()
        .saturating_mul(SHAPE_SIDE * SHAPE_SIDE)
        <= area
    {
        Classification::EasyYes
    } else {
        Classification::NeedsSolve
    };

    log::debug!(
        "Region {}x{} needs [{}] of [{}] cells: {:?}.",
        region.width(),
        region.height(),
        needed,
        area,
        classification
    );

    Ok(classification)
}
