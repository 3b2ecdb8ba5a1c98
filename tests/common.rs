use polyomino_links::{Region, Shape, ShapeSet, Solution};
use std::collections::BTreeSet;

/// Start logging for a test, ignoring repeated initialization from other tests
/// in the same binary.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse shapes drawn with `#` for occupied and `.` for empty cells.
///
/// # Expected Format
///  - Shapes are separated by blank lines
///  - Each shape starts with `<id>:` on its own line, followed by exactly three
///    rows of three characters
///
/// # Panics
///  - If a shape does not have three rows of three characters
///  - If the identifier is not a number
#[allow(dead_code)]
pub fn parse_shapes(input: &str) -> ShapeSet {
    input
        .trim()
        .split("\n\n")
        .map(|block| {
            let mut lines = block.lines().map(str::trim);
            let id = lines
                .next()
                .and_then(|header| header.strip_suffix(':'))
                .unwrap()
                .parse()
                .unwrap();

            let rows: Vec<_> = lines.collect();
            assert_eq!(rows.len(), 3, "Shape [{}] needs exactly three rows.", id);

            let mut pattern = [[false; 3]; 3];
            for (row, line) in rows.iter().enumerate() {
                assert_eq!(line.len(), 3, "Shape [{}] row [{}] is not 3 wide.", id, row);
                for (column, c) in line.chars().enumerate() {
                    pattern[row][column] = c == '#';
                }
            }

            Shape::new(id, pattern)
        })
        .collect()
}

/// Parse a region line like `12x5: 1 0 1 0 2 2`, where the n-th count belongs
/// to shape `n`.
#[allow(dead_code)]
pub fn parse_region(line: &str) -> Region {
    let (size, counts) = line.split_once(':').unwrap();
    let (width, height) = size.trim().split_once('x').unwrap();

    Region::new(
        width.parse().unwrap(),
        height.parse().unwrap(),
        counts
            .split_whitespace()
            .map(|count| count.parse().unwrap())
            .enumerate(),
    )
}

/// The six shapes from the Advent of Code 2025 day 12 example.
#[allow(dead_code)]
pub fn example_shapes() -> ShapeSet {
    parse_shapes(
        "
0:
###
##.
##.

1:
###
##.
.##

2:
.##
###
##.

3:
##.
###
##.

4:
###
#..
###

5:
###
.#.
###",
    )
}

/// Check that `solution` is a valid packing of `region`.
///
/// # Panics
///  - If a copy is missing, placed twice, or not congruent to its shape
///  - If a cell is outside the board or covered twice
///  - If `full_cover` is set and a cell is left empty
#[allow(dead_code)]
pub fn verify_solution(shapes: &ShapeSet, region: &Region, solution: &Solution, full_cover: bool) {
    let placed: Vec<_> = solution.iter().map(|placed| placed.instance).collect();
    let expected: Vec<_> = region.instances().collect();
    assert_eq!(placed, expected, "Every copy must be placed exactly once.");

    let mut covered = BTreeSet::new();
    for placed in solution {
        let shape = shapes.get(placed.instance.shape).unwrap();
        let orientation = polyomino_links::Orientation::normalized(
            placed
                .cells
                .iter()
                .map(|(row, column)| (*row as isize, *column as isize)),
        );
        assert!(
            shape.orientations().contains(&orientation),
            "Copy [{:?}] does not match its shape.",
            placed.instance
        );

        for cell in &placed.cells {
            assert!(
                cell.0 < region.height() && cell.1 < region.width(),
                "Cell [{:?}] is outside the board.",
                cell
            );
            assert!(covered.insert(*cell), "Cell [{:?}] is covered twice.", cell);
        }
    }

    if full_cover {
        assert_eq!(covered.len(), region.area(), "Every cell must be covered.");
    }
}
