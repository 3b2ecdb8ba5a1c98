use crate::{grid::Grid, ExactCover};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Solver that searches for a single solution to an exact cover problem.
#[derive(Debug)]
pub struct Solver<'e, E: ExactCover> {
    problem: &'e E,

    // Values used to track the state of solving
    grid: Grid,
    partial_solution: Vec<usize>,
    budget: Budget,
    stats: SearchStats,
    // Set when a search stopped without unwinding the grid
    dirty: bool,
}

/// Result of a call to [`Solver::first_solution`].
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome<'e, P, C> {
    /// A set of possibilities covering every primary constraint exactly once.
    Solution(Vec<&'e P>),
    /// A primary constraint had no possibilities before the search started.
    EmptyColumn(&'e C),
    /// Every branch was explored without finding a solution.
    Exhausted,
    /// The search was abandoned before it could finish.
    ///
    /// This says nothing about whether a solution exists.
    Cutoff(Cutoff),
}

/// The reason a search was abandoned early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cutoff {
    /// The configured number of search nodes was reached.
    NodeLimit,
    /// The configured deadline passed.
    Deadline,
    /// The shared cancellation flag was raised.
    Cancelled,
}

/// Limits on how much work a single search may do.
///
/// The budget is checked before each candidate row is tried, so a search that
/// is stopped is always reported as [`SearchOutcome::Cutoff`].
#[derive(Debug, Clone, Default)]
pub struct Budget {
    node_limit: Option<u64>,
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Budget {
    /// Create a budget without any limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after trying `limit` candidate rows.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Stop once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop once `timeout` has elapsed, measured from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Stop as soon as `flag` is set, possibly from another thread.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Return true if no limit is configured.
    pub fn is_unlimited(&self) -> bool {
        self.node_limit.is_none() && self.deadline.is_none() && self.cancel.is_none()
    }

    fn check(&self, nodes: u64) -> Option<Cutoff> {
        if self.node_limit.is_some_and(|limit| nodes >= limit) {
            Some(Cutoff::NodeLimit)
        } else if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            Some(Cutoff::Cancelled)
        } else if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            Some(Cutoff::Deadline)
        } else {
            None
        }
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of candidate rows tried.
    pub nodes: u64,
    /// Number of candidate rows that were undone after failing.
    pub backtracks: u64,
    /// Largest number of rows selected at once.
    pub deepest: usize,
}

enum Step {
    Found,
    Failed,
    Aborted(Cutoff),
}

impl<'e, E> Solver<'e, E>
where
    E: ExactCover,
{
    /// Create a new `Solver` with the given instance of an exact cover problem.
    pub fn new(problem: &'e E) -> Self {
        Self::with_budget(problem, Budget::new())
    }

    /// Create a new `Solver` that gives up once `budget` is spent.
    pub fn with_budget(problem: &'e E, budget: Budget) -> Self {
        let grid = Self::populate_grid(problem);

        log::debug!(
            "Populated grid with [{}] columns and [{}] rows.",
            grid.num_columns(),
            grid.num_rows()
        );

        Self {
            problem,

            grid,
            partial_solution: Vec::new(),
            budget,
            stats: SearchStats::default(),
            dirty: false,
        }
    }

    /// Reset all solver state except for the stored possibilities and
    /// constraints.
    pub fn reset(&mut self) {
        self.grid = Self::populate_grid(self.problem);
        self.partial_solution.clear();
        self.stats = SearchStats::default();
        self.dirty = false;
    }

    fn populate_grid(problem: &E) -> Grid {
        let constraints = problem.constraints();
        let coordinates_iter = problem
            .possibilities()
            .iter()
            .enumerate()
            .flat_map(|(row_idx, poss)| {
                problem
                    .satisfied_constraints(poss)
                    .into_iter()
                    .map(move |col_idx| (row_idx, col_idx))
            });

        Grid::new(
            constraints.len(),
            |col_idx| problem.is_optional(&constraints[col_idx]),
            coordinates_iter,
        )
    }

    /// Return the counters collected by the last search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Return the first primary constraint that no possibility satisfies, if
    /// there is one.
    pub fn empty_column(&self) -> Option<&'e E::Constraint> {
        let problem = self.problem;
        self.grid
            .uncovered_columns()
            .find(|column| self.grid.column_size(*column) == 0)
            .map(|column| &problem.constraints()[column])
    }

    /// Search for one solution.
    ///
    /// Columns with no candidate rows are rejected up front, without entering
    /// the search.
    pub fn first_solution(&mut self) -> SearchOutcome<'e, E::Possibility, E::Constraint> {
        if self.dirty {
            self.reset();
        }
        self.stats = SearchStats::default();

        if let Some(constraint) = self.empty_column() {
            log::debug!("Constraint [{:?}] cannot be satisfied.", constraint);
            return SearchOutcome::EmptyColumn(constraint);
        }

        let step = self.search();

        log::debug!(
            "Search finished after [{}] nodes, [{}] backtracks, depth [{}].",
            self.stats.nodes,
            self.stats.backtracks,
            self.stats.deepest
        );

        match step {
            Step::Found => {
                self.dirty = true;
                let problem = self.problem;
                let possibilities = problem.possibilities();
                SearchOutcome::Solution(
                    self.partial_solution
                        .iter()
                        .map(|row_index| &possibilities[*row_index])
                        .collect(),
                )
            }
            Step::Failed => SearchOutcome::Exhausted,
            Step::Aborted(cutoff) => {
                self.dirty = true;
                log::debug!("Search abandoned: [{:?}].", cutoff);
                SearchOutcome::Cutoff(cutoff)
            }
        }
    }

    /// Select a column to remove from the matrix.
    ///
    /// This implementation chooses the primary column that has the least
    /// number of entries uncovered in the grid, preferring the first one in
    /// header order on ties.
    fn choose_column(&self) -> Option<usize> {
        self.grid
            .uncovered_columns()
            .min_by_key(|column| self.grid.column_size(*column))
    }

    fn search(&mut self) -> Step {
        // Only optional columns left, so the partial solution is complete
        let Some(column) = self.choose_column() else {
            return Step::Found;
        };

        log::trace!(
            "Level [{}]: column [{}] with [{}] rows.",
            self.partial_solution.len(),
            column,
            self.grid.column_size(column)
        );

        self.grid.cover(column);

        let mut candidate = self.grid.first_entry(column);
        while let Some(row_entry) = candidate {
            if let Some(cutoff) = self.budget.check(self.stats.nodes) {
                return Step::Aborted(cutoff);
            }
            self.stats.nodes += 1;

            self.partial_solution.push(self.grid.row_id(row_entry));
            self.stats.deepest = self.stats.deepest.max(self.partial_solution.len());

            let mut entry = self.grid.right(row_entry);
            while entry != row_entry {
                self.grid.cover(self.grid.column_id(entry));
                entry = self.grid.right(entry);
            }

            match self.search() {
                Step::Failed => {}
                done => return done,
            }

            let mut entry = self.grid.left(row_entry);
            while entry != row_entry {
                self.grid.uncover(self.grid.column_id(entry));
                entry = self.grid.left(entry);
            }

            self.partial_solution.pop();
            self.stats.backtracks += 1;

            candidate = self.grid.next_entry(row_entry);
        }

        self.grid.uncover(column);
        Step::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Knuth's example from "Dancing Links", rows as lists of column indices.
    #[derive(Debug)]
    struct Listed {
        rows: Vec<Vec<usize>>,
        columns: Vec<char>,
        optional: Vec<char>,
    }

    impl Listed {
        fn new(columns: &str, rows: &[&[usize]]) -> Self {
            Listed {
                rows: rows.iter().map(|row| row.to_vec()).collect(),
                columns: columns.chars().collect(),
                optional: Vec::new(),
            }
        }
    }

    impl ExactCover for Listed {
        type Constraint = char;
        type Possibility = Vec<usize>;

        fn satisfied_constraints(&self, poss: &Self::Possibility) -> Vec<usize> {
            poss.clone()
        }

        fn is_optional(&self, cons: &Self::Constraint) -> bool {
            self.optional.contains(cons)
        }

        fn possibilities(&self) -> &[Self::Possibility] {
            &self.rows
        }

        fn constraints(&self) -> &[Self::Constraint] {
            &self.columns
        }
    }

    fn knuth() -> Listed {
        Listed::new(
            "ABCDEFG",
            &[
                &[2, 4, 5],
                &[0, 3, 6],
                &[1, 2, 5],
                &[0, 3],
                &[1, 6],
                &[3, 4, 6],
            ],
        )
    }

    #[test]
    fn solves_knuth_example() {
        let problem = knuth();
        let mut solver = problem.solver();

        let SearchOutcome::Solution(mut solution) = solver.first_solution() else {
            panic!("expected a solution");
        };
        solution.sort();

        assert_eq!(solution, vec![&vec![0, 3], &vec![1, 6], &vec![2, 4, 5]]);
        assert!(solver.stats().nodes >= 3);
        assert_eq!(solver.stats().deepest, 3);
    }

    #[test]
    fn exhausted_search_restores_grid() {
        // Every pair of rows overlaps and no single row covers all columns
        let problem = Listed::new("ABC", &[&[0, 1], &[1, 2], &[0, 2]]);
        let mut solver = Solver::new(&problem);
        let before = solver.grid.clone();

        assert_eq!(solver.first_solution(), SearchOutcome::Exhausted);
        assert_eq!(solver.grid, before);
        assert!(solver.partial_solution.is_empty());
        assert!(solver.stats().backtracks > 0);
    }

    #[test]
    fn empty_column_rejected_without_search() {
        let problem = Listed::new("ABC", &[&[0, 1], &[1]]);
        let mut solver = Solver::new(&problem);

        assert_eq!(solver.first_solution(), SearchOutcome::EmptyColumn(&'C'));
        assert_eq!(solver.stats(), SearchStats::default());
    }

    #[test]
    fn optional_columns_limit_overlap() {
        // Rows 0 and 1 both use the optional column X, so only one may be
        // chosen; A and B are primary.
        let mut problem = Listed::new("ABX", &[&[0, 2], &[1, 2], &[1]]);
        problem.optional.push('X');
        let mut solver = Solver::new(&problem);

        let SearchOutcome::Solution(mut solution) = solver.first_solution() else {
            panic!("expected a solution");
        };
        solution.sort();

        assert_eq!(solution, vec![&vec![0, 2], &vec![1]]);
    }

    #[test]
    fn optional_only_problem_is_trivially_solved() {
        let mut problem = Listed::new("X", &[&[0]]);
        problem.optional.push('X');

        assert_eq!(
            Solver::new(&problem).first_solution(),
            SearchOutcome::Solution(vec![])
        );
    }

    #[test]
    fn node_limit_reports_cutoff() {
        let problem = knuth();
        let mut solver = Solver::with_budget(&problem, Budget::new().with_node_limit(1));

        assert_eq!(
            solver.first_solution(),
            SearchOutcome::Cutoff(Cutoff::NodeLimit)
        );
        assert_eq!(solver.stats().nodes, 1);

        // Running again starts over from a rebuilt grid
        assert_eq!(
            solver.first_solution(),
            SearchOutcome::Cutoff(Cutoff::NodeLimit)
        );
    }

    #[test]
    fn cancel_flag_reports_cutoff() {
        let flag = Arc::new(AtomicBool::new(true));
        let problem = knuth();
        let mut solver =
            Solver::with_budget(&problem, Budget::new().with_cancel_flag(Arc::clone(&flag)));

        assert_eq!(
            solver.first_solution(),
            SearchOutcome::Cutoff(Cutoff::Cancelled)
        );

        flag.store(false, Ordering::Relaxed);
        assert!(matches!(
            solver.first_solution(),
            SearchOutcome::Solution(_)
        ));
    }

    #[test]
    fn expired_deadline_reports_cutoff() {
        let problem = knuth();
        let budget = Budget::new().with_deadline(Instant::now());

        assert!(!budget.is_unlimited());
        assert_eq!(
            Solver::with_budget(&problem, budget).first_solution(),
            SearchOutcome::Cutoff(Cutoff::Deadline)
        );
    }
}
