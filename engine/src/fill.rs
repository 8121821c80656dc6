//! Depression filling.
//!
//! The stepper only needs "some conforming filler": after `fill`, every cell must have a
//! non-increasing neighbor path to the lattice border. [`DepressionFiller`] is that seam;
//! [`PriorityFlood`] is the default implementation (boundary-seeded min-heap flood, raising
//! each newly reached cell to at least the elevation it was reached from).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::field::Field2;
use crate::lattice::Lattice;

/// Anything that can remove closed depressions from an elevation field in place.
pub trait DepressionFiller {
    /// Fill `topo` in place. Returns the number of cells that were raised.
    fn fill(&self, lattice: &Lattice, topo: &mut Field2) -> usize;
}

/// Iterative priority-flood filler (no recursion, `O(n log n)`).
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorityFlood;

impl DepressionFiller for PriorityFlood {
    fn fill(&self, lattice: &Lattice, topo: &mut Field2) -> usize {
        let (nx, ny) = (lattice.nx, lattice.ny);
        let n = lattice.cells();
        if n == 0 {
            return 0;
        }
        let mut closed = vec![false; n];
        // Min-heap keyed on elevation; flat index breaks ties deterministically
        let mut open: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();

        // Seed with the whole border ring
        for j in 0..ny {
            for i in 0..nx {
                if lattice.is_interior(i, j) {
                    continue;
                }
                let k = topo.idx(i, j);
                closed[k] = true;
                open.push(Reverse((OrderedFloat(topo.data[k]), k)));
            }
        }

        let mut raised = 0usize;
        while let Some(Reverse((OrderedFloat(spill), k))) = open.pop() {
            let (i, j) = (k % nx, k / nx);
            for nb in lattice.neighbors(i, j) {
                let m = topo.idx(nb.i, nb.j);
                if closed[m] {
                    continue;
                }
                closed[m] = true;
                if topo.data[m] < spill {
                    topo.data[m] = spill;
                    raised += 1;
                }
                open.push(Reverse((OrderedFloat(topo.data[m]), m)));
            }
        }
        raised
    }
}
