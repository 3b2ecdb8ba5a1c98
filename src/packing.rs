//! Packing shapes into a region, phrased as an exact cover problem.
//!
//! Every required copy of a shape is a constraint that must be satisfied
//! exactly once, and every board cell is a constraint that may be satisfied at
//! most once (or exactly once, when the board must be tiled completely). Each
//! possibility is one copy of a shape in one orientation at one position.

use crate::{
    error::Error,
    placement::placements,
    region::{Cell, Instance, Region},
    shape::{ShapeSet, SHAPE_SIDE},
    solver::{Budget, Cutoff, SearchOutcome, Solver},
    util::two_combination_iter,
    ExactCover,
};
use bumpalo::Bump;

/// Whether the shapes must tile the whole board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CoverMode {
    /// Every copy is placed exactly once and no cell is used twice, but cells
    /// may be left empty.
    #[default]
    InstancesOnly,
    /// Additionally every cell of the board must be covered.
    Full,
}

impl CoverMode {
    /// Pick the mode matching a `require_full_cover` flag.
    pub const fn from_full_cover(require_full_cover: bool) -> Self {
        if require_full_cover {
            CoverMode::Full
        } else {
            CoverMode::InstancesOnly
        }
    }

    /// Return true if every cell must be covered.
    pub const fn requires_full_cover(self) -> bool {
        matches!(self, CoverMode::Full)
    }
}

/// A condition which must be satisfied in order to pack a region.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constraint {
    /// A condition that a copy of a shape is placed exactly once.
    Instance(Instance),
    /// A condition that a cell is covered by at most one shape, or exactly
    /// one in [`CoverMode::Full`].
    Cell {
        /// The row index
        row: usize,
        /// The column index
        column: usize,
    },
}

/// A possible placement of one shape copy in the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Possibility<'a> {
    /// The copy being placed.
    pub instance: Instance,
    /// The cells occupied, all inside the board.
    pub cells: &'a [Cell],

    instance_column: usize,
}

/// Instance of a polyomino packing puzzle for a single region.
///
/// Cell lists are allocated in the arena given to [`Packing::new`] and shared
/// between interchangeable copies of the same shape.
#[derive(Debug)]
pub struct Packing<'a> {
    possibilities: Vec<Possibility<'a>>,
    constraints: Vec<Constraint>,
    num_instances: usize,
    width: usize,
    mode: CoverMode,
}

impl<'a> Packing<'a> {
    /// Build the packing problem for `region`.
    ///
    /// A copy whose shape fits nowhere on the board still gets its
    /// constraint, just without any possibility satisfying it.
    ///
    /// # Errors
    ///
    /// Fails like [`Region::required_shapes`].
    pub fn new(
        arena: &'a Bump,
        shapes: &ShapeSet,
        region: &Region,
        mode: CoverMode,
    ) -> Result<Self, Error> {
        let (width, height) = (region.width(), region.height());
        let required = region.required_shapes(shapes)?;

        let mut constraints: Vec<Constraint> = required
            .iter()
            .flat_map(|(shape, count)| {
                (0..*count).map(move |index| {
                    Constraint::Instance(Instance {
                        shape: shape.id(),
                        index,
                    })
                })
            })
            .collect();
        let num_instances = constraints.len();
        constraints.extend(
            two_combination_iter([height, width]).map(|[row, column]| Constraint::Cell { row, column }),
        );

        let mut possibilities = Vec::new();
        let mut instance_column = 0;
        for (shape, count) in &required {
            let cell_sets: Vec<&'a [Cell]> = shape
                .orientations()
                .iter()
                .flat_map(|orientation| {
                    placements(orientation, width, height)
                        .map(|shift| &*arena.alloc_slice_fill_iter(shift.apply(orientation)))
                        .collect::<Vec<_>>()
                })
                .collect();

            log::trace!(
                "Shape [{}] has [{}] placements on a {}x{} board.",
                shape.id(),
                cell_sets.len(),
                width,
                height
            );

            for index in 0..*count {
                let instance = Instance {
                    shape: shape.id(),
                    index,
                };
                possibilities.extend(cell_sets.iter().copied().map(|cells| Possibility {
                    instance,
                    cells,
                    instance_column,
                }));
                instance_column += 1;
            }
        }

        log::debug!(
            "Built packing for {}x{} region: [{}] instances, [{}] constraints, [{}] possibilities.",
            width,
            height,
            num_instances,
            constraints.len(),
            possibilities.len()
        );

        Ok(Self {
            possibilities,
            constraints,
            num_instances,
            width,
            mode,
        })
    }

    /// Get the cover mode fixed at construction.
    pub fn mode(&self) -> CoverMode {
        self.mode
    }

    /// Return the number of shape copies to place.
    pub fn num_instances(&self) -> usize {
        self.num_instances
    }

    fn cell_column(&self, (row, column): Cell) -> usize {
        self.num_instances + row * self.width + column
    }

    /// Convert the rows picked by the solver into a [`Solution`].
    pub fn solution<'p>(&self, rows: impl IntoIterator<Item = &'p Possibility<'a>>) -> Solution
    where
        'a: 'p,
    {
        Solution::new(
            rows.into_iter()
                .map(|poss| PlacedShape {
                    instance: poss.instance,
                    cells: poss.cells.to_vec(),
                })
                .collect(),
        )
    }
}

impl<'a> ExactCover for Packing<'a> {
    type Constraint = Constraint;
    type Possibility = Possibility<'a>;

    fn satisfied_constraints(&self, poss: &Self::Possibility) -> Vec<usize> {
        let mut columns = Vec::with_capacity(poss.cells.len() + 1);
        columns.push(poss.instance_column);
        columns.extend(poss.cells.iter().map(|cell| self.cell_column(*cell)));
        columns
    }

    fn is_optional(&self, cons: &Self::Constraint) -> bool {
        matches!(cons, Constraint::Cell { .. }) && !self.mode.requires_full_cover()
    }

    fn possibilities(&self) -> &[Self::Possibility] {
        &self.possibilities
    }

    fn constraints(&self) -> &[Self::Constraint] {
        &self.constraints
    }
}

/// One shape copy placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlacedShape {
    /// The copy that was placed.
    pub instance: Instance,
    /// The absolute cells it occupies.
    pub cells: Vec<Cell>,
}

/// A packing of every required shape copy into a region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    placements: Vec<PlacedShape>,
}

impl Solution {
    /// Create a solution from placed shapes, which are sorted by instance.
    pub fn new(mut placements: Vec<PlacedShape>) -> Self {
        placements.sort_by_key(|placed| placed.instance);
        Solution { placements }
    }

    /// Return the placed shapes, sorted by instance.
    pub fn placements(&self) -> &[PlacedShape] {
        &self.placements
    }

    /// Return the number of placed shapes.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Return true if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Return an iterator over the placed shapes.
    pub fn iter(&self) -> std::slice::Iter<'_, PlacedShape> {
        self.placements.iter()
    }
}

impl<'s> IntoIterator for &'s Solution {
    type IntoIter = std::slice::Iter<'s, PlacedShape>;
    type Item = &'s PlacedShape;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Why a region cannot be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Infeasibility {
    /// A constraint had no possibility at all, so no search was run.
    ///
    /// For a shape copy this means the shape fits nowhere on the board.
    EmptyCandidateSet {
        /// The constraint that cannot be satisfied.
        constraint: Constraint,
    },
    /// The shapes have more cells than the board.
    AreaExceeded {
        /// Cells occupied by all required copies.
        needed: usize,
        /// Cells on the board.
        area: usize,
    },
    /// The shapes have fewer cells than the board, which has to be covered
    /// completely.
    AreaUncovered {
        /// Cells occupied by all required copies.
        needed: usize,
        /// Cells on the board.
        area: usize,
    },
    /// The search tried everything and found no packing.
    ExhaustedSearch,
}

/// Result of [`solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The region can be packed, as shown by the solution.
    Solved(Solution),
    /// The region provably cannot be packed.
    Infeasible(Infeasibility),
    /// The budget ran out before the question was settled.
    Unknown(Cutoff),
}

impl Outcome {
    /// Return true if a solution was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    /// Return true if the region was proven impossible to pack.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Outcome::Infeasible(_))
    }

    /// Return true if the search was cut off.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Outcome::Unknown(_))
    }

    /// Return the solution, if one was found.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// Options for [`solve`].
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Whether every cell has to be covered.
    pub mode: CoverMode,
    /// Limits on the search, unlimited if `None`.
    pub budget: Option<Budget>,
}

impl SolveOptions {
    /// Options for an unlimited search in [`CoverMode::InstancesOnly`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cover mode.
    pub fn with_mode(mut self, mode: CoverMode) -> Self {
        self.mode = mode;
        self
    }

    /// Require every cell to be covered or not.
    pub fn with_full_cover(self, require_full_cover: bool) -> Self {
        self.with_mode(CoverMode::from_full_cover(require_full_cover))
    }

    /// Limit the search.
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Place every required copy in its own 3×3 block of the board, if there are
/// enough whole blocks.
///
/// Shapes are copied as drawn, without rotating them. Returns `None` when the
/// board has fewer whole 3×3 blocks than required copies.
///
/// # Errors
///
/// Fails like [`Region::required_shapes`].
pub fn block_packing(shapes: &ShapeSet, region: &Region) -> Result<Option<Solution>, Error> {
    let required = region.required_shapes(shapes)?;
    let block_rows = region.height() / SHAPE_SIDE;
    let block_columns = region.width() / SHAPE_SIDE;

    if block_rows.saturating_mul(block_columns) < region.total_instances() {
        return Ok(None);
    }

    let mut blocks = two_combination_iter([block_rows, block_columns]);
    let mut placed = Vec::with_capacity(region.total_instances());
    for (shape, count) in required {
        for index in 0..count {
            let Some([block_row, block_column]) = blocks.next() else {
                return Ok(None);
            };

            placed.push(PlacedShape {
                instance: Instance {
                    shape: shape.id(),
                    index,
                },
                cells: shape
                    .occupied_cells()
                    .map(|(row, column)| {
                        (
                            block_row * SHAPE_SIDE + row,
                            block_column * SHAPE_SIDE + column,
                        )
                    })
                    .collect(),
            });
        }
    }

    Ok(Some(Solution::new(placed)))
}

/// Find one way to pack the shapes required by `region`, or prove there is
/// none.
///
/// In [`CoverMode::InstancesOnly`] a region with a whole 3×3 block for every
/// copy is packed directly by [`block_packing`]. A shape that fits nowhere on
/// the board is reported next, then a cell count that cannot match the board.
/// Only then is the exact cover problem built and searched.
///
/// # Errors
///
/// Returns [`Error::UnknownShape`] or [`Error::MalformedShape`] if a required
/// shape is missing or empty.
pub fn solve(shapes: &ShapeSet, region: &Region, options: &SolveOptions) -> Result<Outcome, Error> {
    let needed = region.needed_cells(shapes)?;

    if !options.mode.requires_full_cover() {
        if let Some(solution) = block_packing(shapes, region)? {
            log::debug!(
                "Packed [{}] shapes into separate blocks of a {}x{} region.",
                solution.len(),
                region.width(),
                region.height()
            );
            return Ok(Outcome::Solved(solution));
        }
    }

    for (shape, _) in region.required_shapes(shapes)? {
        if !shape.fits_within(region.width(), region.height()) {
            return Ok(Outcome::Infeasible(Infeasibility::EmptyCandidateSet {
                constraint: Constraint::Instance(Instance {
                    shape: shape.id(),
                    index: 0,
                }),
            }));
        }
    }

    let area = region.area();
    if needed > area {
        return Ok(Outcome::Infeasible(Infeasibility::AreaExceeded { needed, area }));
    }
    if options.mode.requires_full_cover() && needed < area {
        return Ok(Outcome::Infeasible(Infeasibility::AreaUncovered { needed, area }));
    }

    let arena = Bump::new();
    let packing = Packing::new(&arena, shapes, region, options.mode)?;
    let mut solver = match &options.budget {
        Some(budget) => Solver::with_budget(&packing, budget.clone()),
        None => Solver::new(&packing),
    };

    // Some cell may still be out of reach of every placement
    if let Some(constraint) = solver.empty_column() {
        return Ok(Outcome::Infeasible(Infeasibility::EmptyCandidateSet {
            constraint: *constraint,
        }));
    }

    let outcome = match solver.first_solution() {
        SearchOutcome::Solution(rows) => Outcome::Solved(packing.solution(rows)),
        SearchOutcome::EmptyColumn(constraint) => {
            Outcome::Infeasible(Infeasibility::EmptyCandidateSet {
                constraint: *constraint,
            })
        }
        SearchOutcome::Exhausted => Outcome::Infeasible(Infeasibility::ExhaustedSearch),
        SearchOutcome::Cutoff(cutoff) => Outcome::Unknown(cutoff),
    };

    log::debug!(
        "Region {}x{} resolved after [{}] nodes: {}.",
        region.width(),
        region.height(),
        solver.stats().nodes,
        match &outcome {
            Outcome::Solved(_) => "solved",
            Outcome::Infeasible(_) => "infeasible",
            Outcome::Unknown(_) => "unknown",
        }
    );

    Ok(outcome)
}
