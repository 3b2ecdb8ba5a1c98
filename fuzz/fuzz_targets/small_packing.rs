#![no_main]

use libfuzzer_sys::fuzz_target;
use polyomino_links::{
    classify, solve, Budget, Classification, Outcome, Region, Shape, ShapeSet, SolveOptions,
};
use std::collections::BTreeSet;

#[derive(Debug)]
struct SmallPackingInput {
    shapes: ShapeSet,
    region: Region,
    full_cover: bool,
}

impl<'a> arbitrary::Arbitrary<'a> for SmallPackingInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let shapes = (0..3)
            .map(|id| {
                let bits = u.arbitrary::<u16>()?;
                let mut pattern = [[false; 3]; 3];
                for (index, cell) in pattern.iter_mut().flatten().enumerate() {
                    *cell = bits & (1 << index) != 0;
                }

                Ok(Shape::new(id, pattern))
            })
            .collect::<arbitrary::Result<_>>()?;

        let width = u.int_in_range(1..=6)?;
        let height = u.int_in_range(1..=6)?;
        let counts = (0..3)
            .map(|id| Ok((id, u.int_in_range(0..=3)?)))
            .collect::<arbitrary::Result<Vec<_>>>()?;

        Ok(SmallPackingInput {
            shapes,
            region: Region::new(width, height, counts),
            full_cover: u.arbitrary()?,
        })
    }
}

fuzz_target!(|data: SmallPackingInput| {
    let options = SolveOptions::new()
        .with_full_cover(data.full_cover)
        .with_budget(Budget::new().with_node_limit(20_000));

    let (Ok(classification), Ok(outcome)) = (
        classify(&data.shapes, &data.region),
        solve(&data.shapes, &data.region, &options),
    ) else {
        return;
    };

    if let Outcome::Solved(solution) = outcome {
        assert_ne!(classification, Classification::EasyNo);
        assert_eq!(solution.len(), data.region.total_instances());

        let mut covered = BTreeSet::new();
        for placed in &solution {
            for cell in &placed.cells {
                assert!(cell.0 < data.region.height() && cell.1 < data.region.width());
                assert!(covered.insert(*cell));
            }
        }

        if data.full_cover {
            assert_eq!(covered.len(), data.region.area());
        }
    }
});
