/// Iterator over every `[a, b]` with `a < dimensions[0]` and
/// `b < dimensions[1]`, in row-major order.
#[derive(Debug, Clone)]
pub struct TwoCombinationIter {
    dimensions: [usize; 2],
    next_value: Option<[usize; 2]>,
}

impl Iterator for TwoCombinationIter {
    type Item = [usize; 2];

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = match self.next_value {
            Some([a, b]) => (self.dimensions[0] - a) * self.dimensions[1] - b,
            None => 0,
        };

        (size, Some(size))
    }

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next_value?;
        let [a, b] = current;

        self.next_value = if b + 1 < self.dimensions[1] {
            Some([a, b + 1])
        } else if a + 1 < self.dimensions[0] {
            Some([a + 1, 0])
        } else {
            None
        };

        Some(current)
    }
}

impl ExactSizeIterator for TwoCombinationIter {}

/// Return an iterator over all pairs below `dimensions`, the last component
/// varying fastest.
pub fn two_combination_iter(dimensions: [usize; 2]) -> TwoCombinationIter {
    let next_value = if dimensions.iter().any(|dim| *dim == 0) {
        None
    } else {
        Some([0, 0])
    };

    TwoCombinationIter {
        dimensions,
        next_value,
    }
}
