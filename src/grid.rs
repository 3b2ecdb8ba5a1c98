//! Sparse `Grid` implementation for use in the `Solver`.
//!
//! Every column header and every filled entry is a node in a single arena.
//! Nodes refer to their four neighbors by index, so covering and uncovering a
//! column only rewrites a handful of integers and never allocates.
//!
//! Node `0` is the root of the header list, nodes `1..=num_columns` are the
//! column headers and everything after that is a filled entry.

use std::iter;

const ROOT: usize = 0;

/// A filled entry in the grid, identifying one (row, column) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    left: usize,
    right: usize,
    up: usize,
    down: usize,

    // Column id for entries and headers, unused for the root.
    column: usize,
    // Row id for entries, unused for headers and the root.
    row: usize,
}

impl Node {
    const fn self_ref(index: usize, column: usize) -> Self {
        Node {
            left: index,
            right: index,
            up: index,
            down: index,
            column,
            row: usize::MAX,
        }
    }
}

/// Reversible sparse 0/1 matrix supporting Algorithm X.
///
/// Primary columns are linked into the header list and must be covered for a
/// solution to be complete. Optional columns stay out of the header list: they
/// are never chosen by the search, but covering them still removes every
/// conflicting row, so each one is covered at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    nodes: Vec<Node>,
    sizes: Vec<usize>,
    optional: Vec<bool>,
    num_rows: usize,
}

impl Grid {
    /// Create a new grid with the given number of columns and the given
    /// coordinates filled.
    ///
    /// Coordinates are `(row, column)` pairs, both 0 indexed. Entries of the
    /// same row must be adjacent in the iterator and rows must be given in
    /// increasing order. `is_optional` is queried once per column.
    ///
    /// # Panics
    ///
    /// Panics if a column index is out of range or rows are given out of
    /// order.
    pub fn new(
        num_columns: usize,
        is_optional: impl Fn(usize) -> bool,
        filled_coordinates: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let optional: Vec<bool> = (0..num_columns).map(is_optional).collect();

        let mut nodes = Vec::with_capacity(num_columns + 1);
        nodes.push(Node::self_ref(ROOT, usize::MAX));
        for column in 0..num_columns {
            let header = column + 1;
            nodes.push(Node::self_ref(header, column));

            if !optional[column] {
                // Append to the end of the header list
                let last = nodes[ROOT].left;
                nodes[header].left = last;
                nodes[header].right = ROOT;
                nodes[last].right = header;
                nodes[ROOT].left = header;
            }
        }

        let mut grid = Grid {
            nodes,
            sizes: vec![0; num_columns],
            optional,
            num_rows: 0,
        };

        let mut current_row: Option<(usize, usize)> = None;
        for (row, column) in filled_coordinates {
            assert!(
                column < num_columns,
                "Column index {column} out of range for {num_columns} columns"
            );

            let row_start = match current_row {
                Some((current, start)) if current == row => Some(start),
                Some((current, _)) => {
                    assert!(current < row, "Rows must be given in increasing order");
                    None
                }
                None => None,
            };

            let index = grid.push_entry(row, column, row_start);
            if row_start.is_none() {
                current_row = Some((row, index));
            }
            grid.num_rows = grid.num_rows.max(row + 1);
        }

        grid
    }

    // Append an entry to the bottom of its column and to the end of its row.
    fn push_entry(&mut self, row: usize, column: usize, row_start: Option<usize>) -> usize {
        let index = self.nodes.len();
        let header = column + 1;
        let bottom = self.nodes[header].up;

        let (left, right) = match row_start {
            Some(start) => (self.nodes[start].left, start),
            None => (index, index),
        };

        self.nodes.push(Node {
            left,
            right,
            up: bottom,
            down: header,
            column,
            row,
        });

        self.nodes[bottom].down = index;
        self.nodes[header].up = index;
        self.nodes[left].right = index;
        self.nodes[right].left = index;
        self.sizes[column] += 1;

        index
    }

    /// Cover entire column, and any rows that that appear in this column.
    ///
    /// Calls must be paired with `uncover` in reverse order.
    pub fn cover(&mut self, column: usize) {
        let header = column + 1;
        let Node { left, right, .. } = self.nodes[header];
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let mut row_node = self.nodes[header].down;
        while row_node != header {
            let mut node = self.nodes[row_node].right;
            while node != row_node {
                let Node { up, down, column: other, .. } = self.nodes[node];
                self.nodes[up].down = down;
                self.nodes[down].up = up;
                self.sizes[other] -= 1;

                node = self.nodes[node].right;
            }

            row_node = self.nodes[row_node].down;
        }
    }

    /// Uncover entire column, and any rows that appear in this column.
    ///
    /// Exactly reverses the matching `cover`.
    pub fn uncover(&mut self, column: usize) {
        let header = column + 1;

        let mut row_node = self.nodes[header].up;
        while row_node != header {
            let mut node = self.nodes[row_node].left;
            while node != row_node {
                let Node { up, down, column: other, .. } = self.nodes[node];
                self.sizes[other] += 1;
                self.nodes[up].down = node;
                self.nodes[down].up = node;

                node = self.nodes[node].left;
            }

            row_node = self.nodes[row_node].up;
        }

        let Node { left, right, .. } = self.nodes[header];
        self.nodes[left].right = header;
        self.nodes[right].left = header;
    }

    /// Return the number of columns, covered or not.
    pub fn num_columns(&self) -> usize {
        self.sizes.len()
    }

    /// Return the number of rows the grid was built with.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Return true if the column does not need to be covered by a solution.
    pub fn is_optional(&self, column: usize) -> bool {
        self.optional[column]
    }

    /// Return an iterator over the primary columns that are uncovered, in
    /// header order.
    pub fn uncovered_columns(&self) -> impl Iterator<Item = usize> + '_ {
        let mut node = self.nodes[ROOT].right;
        iter::from_fn(move || {
            if node == ROOT {
                None
            } else {
                let column = self.nodes[node].column;
                node = self.nodes[node].right;
                Some(column)
            }
        })
    }

    /// Return the number of rows uncovered in this column.
    pub fn column_size(&self, column: usize) -> usize {
        self.sizes[column]
    }

    /// Return an iterator over the ids of all uncovered rows in this column,
    /// in link order.
    pub fn uncovered_rows_in_column(&self, column: usize) -> impl Iterator<Item = usize> + '_ {
        let mut entry = self.first_entry(column);
        iter::from_fn(move || {
            let current = entry?;
            entry = self.next_entry(current);
            Some(self.row_id(current))
        })
    }

    /// Return the topmost uncovered entry of this column.
    pub fn first_entry(&self, column: usize) -> Option<Entry> {
        self.below(column + 1)
    }

    /// Return the next uncovered entry below this one in the same column.
    pub fn next_entry(&self, entry: Entry) -> Option<Entry> {
        self.below(entry.0)
    }

    fn below(&self, node: usize) -> Option<Entry> {
        let down = self.nodes[node].down;
        if down <= self.sizes.len() {
            // Wrapped around to the header
            None
        } else {
            Some(Entry(down))
        }
    }

    /// Return the entry to the right of this one in the same row, wrapping
    /// around at the end of the row.
    pub fn right(&self, entry: Entry) -> Entry {
        Entry(self.nodes[entry.0].right)
    }

    /// Return the entry to the left of this one in the same row, wrapping
    /// around at the start of the row.
    pub fn left(&self, entry: Entry) -> Entry {
        Entry(self.nodes[entry.0].left)
    }

    /// Return a stable unique identifier for the row of this entry.
    pub fn row_id(&self, entry: Entry) -> usize {
        self.nodes[entry.0].row
    }

    /// Return a stable unique identifier for the column of this entry.
    pub fn column_id(&self, entry: Entry) -> usize {
        self.nodes[entry.0].column
    }
}
