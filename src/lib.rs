#![deny(missing_docs)]

//! Packing of small [polyominoes](https://en.wikipedia.org/wiki/Polyomino)
//! into rectangular regions, solved with
//! [Dancing Links](https://en.wikipedia.org/wiki/Dancing_Links) and
//! [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) as an
//! [exact cover](https://en.wikipedia.org/wiki/Exact_cover) problem.
//!
//! Shapes are drawn on a 3×3 grid and may be rotated and reflected. A
//! [`Region`] asks for a number of copies of each shape; [`classify`] answers
//! the obvious cases from area alone and [`solve`] searches for a placement of
//! every copy.
//!
//! ```
//! use polyomino_links::{solve, Region, Shape, ShapeSet, SolveOptions};
//!
//! let shapes: ShapeSet = [Shape::from_mask(0, [[1, 1, 0], [1, 0, 0], [0, 0, 0]])]
//!     .into_iter()
//!     .collect();
//! let region = Region::new(3, 2, [(0, 2)]);
//!
//! let outcome = solve(&shapes, &region, &SolveOptions::new().with_full_cover(true)).unwrap();
//! assert_eq!(outcome.solution().map(|solution| solution.len()), Some(2));
//! ```

pub mod error;
pub mod grid;
pub mod packing;
pub mod placement;
pub mod region;
pub mod shape;
pub(crate) mod solver;
pub(crate) mod util;

pub use error::Error;
pub use grid::Grid;
pub use packing::{
    block_packing, solve, CoverMode, Infeasibility, Outcome, Packing, PlacedShape, Solution,
    SolveOptions,
};
pub use placement::{placements, Translation};
pub use region::{classify, Cell, Classification, Instance, Region};
pub use shape::{Orientation, Shape, ShapeId, ShapeSet};
pub use solver::{Budget, Cutoff, SearchOutcome, SearchStats, Solver};

/// An instance of an exact cover problem.
pub trait ExactCover {
    /// The type of values that are elements of a solution to the exact cover
    /// problem.
    type Possibility: core::fmt::Debug;

    /// The type of value that are constraints on a given instance of an exact
    /// cover problem.
    type Constraint: core::fmt::Debug;

    /// Return the indices into [`ExactCover::constraints`] of every
    /// constraint the given `Possibility` satisfies.
    fn satisfied_constraints(&self, poss: &Self::Possibility) -> Vec<usize>;

    /// Return true if the given `Constraint` is optional.
    ///
    /// Optional constraints may be satisfied at most once instead of exactly
    /// once.
    fn is_optional(&self, cons: &Self::Constraint) -> bool;

    /// Return a list of possibilities for this instance of the problem.
    fn possibilities(&self) -> &[Self::Possibility];

    /// Return a list of constraints that must be satisfied for this instance of
    /// the problem.
    fn constraints(&self) -> &[Self::Constraint];

    /// Return a solver for this instance of the exact cover problem.
    fn solver(&self) -> Solver<'_, Self>
    where
        Self: Sized,
    {
        Solver::new(self)
    }
}

impl<E> ExactCover for &E
where
    E: ExactCover,
{
    type Constraint = E::Constraint;
    type Possibility = E::Possibility;

    fn satisfied_constraints(&self, poss: &Self::Possibility) -> Vec<usize> {
        <E as ExactCover>::satisfied_constraints(self, poss)
    }

    fn is_optional(&self, cons: &Self::Constraint) -> bool {
        <E as ExactCover>::is_optional(self, cons)
    }

    fn possibilities(&self) -> &[Self::Possibility] {
        <E as ExactCover>::possibilities(self)
    }

    fn constraints(&self) -> &[Self::Constraint] {
        <E as ExactCover>::constraints(self)
    }
}
