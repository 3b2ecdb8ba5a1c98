//! Enumeration of every position an orientation can take on a board.

use crate::{
    region::Cell,
    shape::Orientation,
    util::{two_combination_iter, TwoCombinationIter},
};

/// A shift applied to every offset of an orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Translation {
    /// Rows to shift down by.
    pub row: usize,
    /// Columns to shift right by.
    pub column: usize,
}

impl Translation {
    /// Return the absolute cells covered by `orientation` under this shift.
    pub fn apply(self, orientation: &Orientation) -> impl ExactSizeIterator<Item = Cell> + '_ {
        orientation
            .offsets()
            .iter()
            .map(move |(row, column)| (row + self.row, column + self.column))
    }
}

/// Iterator over the translations returned by [`placements`].
#[derive(Debug, Clone)]
pub struct Placements(TwoCombinationIter);

impl Iterator for Placements {
    type Item = Translation;

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|[row, column]| Translation { row, column })
    }
}

impl ExactSizeIterator for Placements {}

/// Return every translation that keeps `orientation` inside a board of the
/// given size.
///
/// Equivalent to trying every shift in `[0, height) × [0, width)` and keeping
/// those where all cells land on the board, but only visits the shifts that
/// fit the orientation's bounding box. Translations come out in row-major
/// order.
pub fn placements(orientation: &Orientation, width: usize, height: usize) -> Placements {
    // An empty orientation fits at every shift, so the range is still capped
    // at the board size.
    let rows = (height + 1).saturating_sub(orientation.height()).min(height);
    let columns = (width + 1).saturating_sub(orientation.width()).min(width);

    Placements(two_combination_iter([rows, columns]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use std::collections::BTreeSet;

    fn exhaustive(orientation: &Orientation, width: usize, height: usize) -> BTreeSet<Vec<Cell>> {
        (0..height)
            .flat_map(|row| (0..width).map(move |column| Translation { row, column }))
            .map(|shift| shift.apply(orientation).collect::<Vec<_>>())
            .filter(|cells| cells.iter().all(|(r, c)| *r < height && *c < width))
            .collect()
    }

    fn enumerated(orientation: &Orientation, width: usize, height: usize) -> BTreeSet<Vec<Cell>> {
        placements(orientation, width, height)
            .map(|shift| shift.apply(orientation).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn single_cell_on_single_cell_board() {
        let cell = &Shape::from_mask(0, [[1, 0, 0], [0, 0, 0], [0, 0, 0]]).orientations()[0];
        let found: Vec<_> = placements(cell, 1, 1).collect();

        assert_eq!(found, vec![Translation { row: 0, column: 0 }]);
        assert_eq!(found[0].apply(cell).collect::<Vec<_>>(), vec![(0, 0)]);
    }

    #[test]
    fn too_large_for_board() {
        let line = &Shape::from_mask(0, [[1, 1, 1], [0, 0, 0], [0, 0, 0]]).orientations();

        for orientation in line {
            assert_eq!(placements(orientation, 2, 2).count(), 0);
        }
    }

    #[test]
    fn counts_match_bounding_box() {
        // 2 rows x 3 columns, placed on a 5 wide, 4 high board
        let shape = Shape::from_mask(0, [[1, 0, 0], [1, 1, 1], [0, 0, 0]]);
        let wide = shape
            .orientations()
            .into_iter()
            .find(|o| o.width() == 3)
            .unwrap();

        assert_eq!(placements(&wide, 5, 4).len(), 3 * 3);
    }

    #[test]
    fn matches_exhaustive_scan() {
        let shapes = [
            Shape::from_mask(0, [[1, 1, 1], [1, 1, 0], [1, 1, 0]]),
            Shape::from_mask(1, [[0, 1, 0], [1, 1, 1], [0, 1, 0]]),
            Shape::from_mask(2, [[1, 0, 0], [1, 1, 0], [0, 0, 0]]),
            Shape::from_mask(3, [[0, 0, 0], [0, 0, 0], [0, 0, 0]]),
        ];

        for shape in &shapes {
            for orientation in shape.orientations() {
                for (width, height) in [(1, 1), (2, 3), (3, 3), (5, 4), (7, 2)] {
                    let found = enumerated(&orientation, width, height);
                    assert_eq!(found, exhaustive(&orientation, width, height));
                    if !orientation.is_empty() {
                        assert_eq!(placements(&orientation, width, height).count(), found.len());
                    }

                    for cells in &found {
                        assert!(cells.iter().all(|(r, c)| *r < height && *c < width));
                    }
                }
            }
        }
    }
}
