//! Rectangular lattice topology with clamped (non-periodic) neighbor tables.
//!
//! Conventions:
//! - Cells are addressed `(i, j)` with `i ∈ [0, nx)` along x and `j ∈ [0, ny)` along y.
//! - `iup[i] = i + 1`, `idown[i] = i - 1`, except at the edges where the table maps the
//!   index onto itself (`idown[0] = 0`, `iup[nx-1] = nx-1`). Same for `jup`/`jdown`.
//! - A clamped lookup that lands back on the cell's own row/column is not a real
//!   neighbor. [`Lattice::neighbor`] reports it as `None` so that routing never
//!   self-loops and diagonal lookups at an edge never alias an axis neighbor.

use smallvec::SmallVec;

/// One of the eight D8 directions, in the order the routing fractions are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    /// `(iup[i], j)`
    IUp,
    /// `(idown[i], j)`
    IDown,
    /// `(i, jup[j])`
    JUp,
    /// `(i, jdown[j])`
    JDown,
    /// `(iup[i], jup[j])`
    IUpJUp,
    /// `(iup[i], jdown[j])`
    IUpJDown,
    /// `(idown[i], jup[j])`
    IDownJUp,
    /// `(idown[i], jdown[j])`
    IDownJDown,
}

impl Dir {
    /// All directions, axis-aligned first.
    pub const ALL: [Dir; 8] = [
        Dir::IUp,
        Dir::IDown,
        Dir::JUp,
        Dir::JDown,
        Dir::IUpJUp,
        Dir::IUpJDown,
        Dir::IDownJUp,
        Dir::IDownJDown,
    ];

    /// Position of this direction in [`Dir::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// True for the four diagonal directions.
    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.index() >= 4
    }

    /// Unclamped `(di, dj)` offset.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Dir::IUp => (1, 0),
            Dir::IDown => (-1, 0),
            Dir::JUp => (0, 1),
            Dir::JDown => (0, -1),
            Dir::IUpJUp => (1, 1),
            Dir::IUpJDown => (1, -1),
            Dir::IDownJUp => (-1, 1),
            Dir::IDownJDown => (-1, -1),
        }
    }
}

/// A resolved neighbor of some cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    /// Direction from the source cell
    pub dir: Dir,
    /// Neighbor x index
    pub i: usize,
    /// Neighbor y index
    pub j: usize,
}

/// Lattice dimensions plus the four per-axis neighbor lookup tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    /// Cells along x
    pub nx: usize,
    /// Cells along y
    pub ny: usize,
    /// Successor along x, clamped at `nx - 1`
    pub iup: Vec<usize>,
    /// Predecessor along x, clamped at 0
    pub idown: Vec<usize>,
    /// Successor along y, clamped at `ny - 1`
    pub jup: Vec<usize>,
    /// Predecessor along y, clamped at 0
    pub jdown: Vec<usize>,
}

impl Lattice {
    /// Build clamped neighbor tables for an `nx × ny` lattice.
    pub fn new(nx: usize, ny: usize) -> Self {
        let iup = (0..nx).map(|i| (i + 1).min(nx.saturating_sub(1))).collect();
        let idown = (0..nx).map(|i| i.saturating_sub(1)).collect();
        let jup = (0..ny).map(|j| (j + 1).min(ny.saturating_sub(1))).collect();
        let jdown = (0..ny).map(|j| j.saturating_sub(1)).collect();
        Self { nx, ny, iup, idown, jup, jdown }
    }

    /// Total number of cells.
    #[inline]
    pub fn cells(&self) -> usize {
        self.nx * self.ny
    }

    /// True unless the cell lies on the one-cell border ring.
    #[inline]
    pub fn is_interior(&self, i: usize, j: usize) -> bool {
        i > 0 && j > 0 && i + 1 < self.nx && j + 1 < self.ny
    }

    /// Table lookup exactly as stored; may return the cell's own row/column at an edge.
    #[inline]
    pub fn neighbor_clamped(&self, i: usize, j: usize, dir: Dir) -> (usize, usize) {
        match dir {
            Dir::IUp => (self.iup[i], j),
            Dir::IDown => (self.idown[i], j),
            Dir::JUp => (i, self.jup[j]),
            Dir::JDown => (i, self.jdown[j]),
            Dir::IUpJUp => (self.iup[i], self.jup[j]),
            Dir::IUpJDown => (self.iup[i], self.jdown[j]),
            Dir::IDownJUp => (self.idown[i], self.jup[j]),
            Dir::IDownJDown => (self.idown[i], self.jdown[j]),
        }
    }

    /// Neighbor in `dir`, or `None` when the table clamped that lookup.
    #[inline]
    pub fn neighbor(&self, i: usize, j: usize, dir: Dir) -> Option<(usize, usize)> {
        let (ni, nj) = self.neighbor_clamped(i, j, dir);
        let (di, dj) = dir.offset();
        let moved_i = if di == 0 { ni == i } else { ni != i };
        let moved_j = if dj == 0 { nj == j } else { nj != j };
        (moved_i && moved_j).then_some((ni, nj))
    }

    /// All in-bounds neighbors of `(i, j)`: 8 in the interior, 5 on edges, 3 at corners.
    pub fn neighbors(&self, i: usize, j: usize) -> SmallVec<[Neighbor; 8]> {
        Dir::ALL
            .iter()
            .filter_map(|&dir| self.neighbor(i, j, dir).map(|(ni, nj)| Neighbor { dir, i: ni, j: nj }))
            .collect()
    }
}
