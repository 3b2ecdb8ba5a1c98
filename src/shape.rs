//! Shapes are small [polyominoes](https://en.wikipedia.org/wiki/Polyomino)
//! drawn on a 3×3 grid, which may be rotated and reflected when packed.

use std::collections::{btree_map, BTreeMap, BTreeSet};

/// Identifier of a shape.
pub type ShapeId = usize;

/// Side length of the grid every shape is drawn on.
pub const SHAPE_SIDE: usize = 3;

/// A shape drawn on a fixed 3×3 occupancy grid.
///
/// A shape may have no occupied cells at all. Such a shape only becomes an
/// error once a region requires a copy of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    id: ShapeId,
    pattern: [[bool; SHAPE_SIDE]; SHAPE_SIDE],
}

impl Shape {
    /// Create a new shape from a grid of occupied cells, indexed
    /// `pattern[row][column]`.
    pub const fn new(id: ShapeId, pattern: [[bool; SHAPE_SIDE]; SHAPE_SIDE]) -> Self {
        Shape { id, pattern }
    }

    /// Create a new shape from a binary mask, where any non-zero value marks
    /// an occupied cell.
    pub fn from_mask(id: ShapeId, mask: [[u8; SHAPE_SIDE]; SHAPE_SIDE]) -> Self {
        Shape::new(id, mask.map(|row| row.map(|cell| cell != 0)))
    }

    /// Get the shape identifier.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Get the occupancy grid.
    pub fn pattern(&self) -> &[[bool; SHAPE_SIDE]; SHAPE_SIDE] {
        &self.pattern
    }

    /// Return the number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.pattern.iter().flatten().filter(|cell| **cell).count()
    }

    /// Return true if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Return the `(row, column)` coordinates of the occupied cells, as drawn.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pattern.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, occupied)| **occupied)
                .map(move |(column, _)| (row, column))
        })
    }

    /// Return every distinct orientation of this shape.
    ///
    /// The candidates are the four rotations of the shape and the four
    /// rotations of its mirror image. Symmetric shapes produce repeated
    /// candidates, which are only kept once.
    pub fn orientations(&self) -> Vec<Orientation> {
        let base = Orientation::normalized(
            self.occupied_cells()
                .map(|(row, column)| (row as isize, column as isize)),
        );
        let mirror = base.mirror();

        let mut orientations = BTreeSet::new();
        for start in [base, mirror] {
            let mut current = start;
            for _ in 0..4 {
                let next = current.rotate();
                orientations.insert(current);
                current = next;
            }
        }

        orientations.into_iter().collect()
    }

    /// Return true if some orientation fits on a board of the given size.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.orientations()
            .iter()
            .any(|orientation| orientation.width() <= width && orientation.height() <= height)
    }
}

/// A rotation or reflection of a shape, as a set of `(row, column)` offsets
/// whose smallest row and smallest column are both 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Orientation {
    // Sorted and deduplicated
    offsets: Vec<(usize, usize)>,
}

impl Orientation {
    /// Create an orientation from arbitrary integer points, shifting them so
    /// the minimum row and column become 0.
    pub fn normalized(points: impl IntoIterator<Item = (isize, isize)>) -> Self {
        let points: Vec<_> = points.into_iter().collect();
        let min_row = points.iter().map(|(row, _)| *row).min().unwrap_or(0);
        let min_column = points.iter().map(|(_, column)| *column).min().unwrap_or(0);

        let mut offsets: Vec<_> = points
            .into_iter()
            .map(|(row, column)| ((row - min_row) as usize, (column - min_column) as usize))
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        Orientation { offsets }
    }

    /// Return the offsets, sorted by row then column.
    pub fn offsets(&self) -> &[(usize, usize)] {
        &self.offsets
    }

    /// Return the number of cells.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Return true if the orientation has no cells.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Return the number of rows spanned, 0 for an empty orientation.
    pub fn height(&self) -> usize {
        self.offsets.iter().map(|(row, _)| row + 1).max().unwrap_or(0)
    }

    /// Return the number of columns spanned, 0 for an empty orientation.
    pub fn width(&self) -> usize {
        self.offsets
            .iter()
            .map(|(_, column)| column + 1)
            .max()
            .unwrap_or(0)
    }

    fn points(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        self.offsets
            .iter()
            .map(|(row, column)| (*row as isize, *column as isize))
    }

    /// Rotate a quarter turn clockwise.
    pub fn rotate(&self) -> Self {
        Self::normalized(self.points().map(|(row, column)| (column, -row)))
    }

    /// Reflect across a vertical axis.
    pub fn mirror(&self) -> Self {
        Self::normalized(self.points().map(|(row, column)| (row, -column)))
    }
}

/// The shapes available for packing, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeSet {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl ShapeSet {
    /// Create an empty set of shapes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape, returning the shape previously stored under the same
    /// identifier.
    pub fn insert(&mut self, shape: Shape) -> Option<Shape> {
        self.shapes.insert(shape.id(), shape)
    }

    /// Look up a shape by identifier.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Return the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Return true if there are no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Return an iterator over the shapes in identifier order.
    pub fn iter(&self) -> btree_map::Values<'_, ShapeId, Shape> {
        self.shapes.values()
    }
}

impl FromIterator<Shape> for ShapeSet {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        let mut shapes = ShapeSet::new();
        for shape in iter {
            shapes.insert(shape);
        }
        shapes
    }
}

impl<'a> IntoIterator for &'a ShapeSet {
    type IntoIter = btree_map::Values<'a, ShapeId, Shape>;
    type Item = &'a Shape;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
