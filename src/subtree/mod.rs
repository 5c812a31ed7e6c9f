//! Incremental induced-subtree state.
//!
//! A [`Subtree`] records which vertices are induced and, for every vertex, its
//! *effective degree*: the number of induced neighbours in the lattice's
//! current adjacency. Degrees are kept for all vertices, induced or not, so the
//! driver can tell in O(1) whether a candidate would close a cycle.
//!
//! # Local validity
//!
//! A vertex is invalid when some coordinate plane around it has all four of its
//! in-plane neighbours induced. Below degree four that cannot happen. At degree
//! four it means the neighbours are confined to two axes; degree five or six
//! always fills a plane. The rule is closed under taking subsets, so a valid
//! tree can always be grown one valid vertex at a time.
//!
//! [`Subtree::add`] checks this rule at the new vertex and at each induced
//! neighbour (the only vertices whose degree changed) instead of running a
//! global cycle check. That is sound only while every added vertex has exactly
//! one induced neighbour and an id above the root, which the search driver
//! guarantees.

pub mod enclosure;
pub mod shape;

pub use shape::Shape;

use crate::graph::{Axis, Lattice, VertexId, EMPTY};

/// The induced set of one search branch, plus its degree bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    induced: Vec<bool>,
    degree: Vec<u8>,
    num_induced: usize,
    num_excluded: usize,
    root: VertexId,
}

impl Subtree {
    /// Creates a subtree holding only `root`.
    ///
    /// # Panics
    /// Panics if `root` is out of range.
    pub fn new(lattice: &Lattice, root: VertexId) -> Self {
        let n = lattice.len();
        assert!((root as usize) < n, "root {root} out of range");
        let mut subtree = Self {
            induced: vec![false; n],
            degree: vec![0; n],
            num_induced: 0,
            num_excluded: 0,
            root,
        };
        let added = subtree.add(lattice, root);
        debug_assert!(added, "a lone root is always valid");
        subtree
    }

    /// The fixed minimum-id vertex this subtree grows from.
    #[inline]
    pub fn root(&self) -> VertexId {
        self.root
    }

    /// Number of induced vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_induced
    }

    /// Returns `true` if nothing is induced (only after removing the root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_induced == 0
    }

    /// Effective degree of `v`.
    #[inline]
    pub fn degree(&self, v: VertexId) -> u32 {
        u32::from(self.degree[v as usize])
    }

    /// Returns `true` if `v` is induced.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.induced[v as usize]
    }

    /// Like [`contains`](Self::contains), but accepts [`EMPTY`].
    #[inline]
    pub fn exists(&self, v: VertexId) -> bool {
        v != EMPTY && self.induced[v as usize]
    }

    /// Frontier vertices the driver has ruled out along the current path.
    #[inline]
    pub fn num_excluded(&self) -> usize {
        self.num_excluded
    }

    #[inline]
    pub(crate) fn note_excluded(&mut self) {
        self.num_excluded += 1;
    }

    #[inline]
    pub(crate) fn note_readmitted(&mut self) {
        assert!(self.num_excluded > 0, "excluded count underflow: restore without matching update");
        self.num_excluded -= 1;
    }

    /// Induced vertices in ascending id order.
    pub fn induced(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.induced
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(v, _)| v as VertexId)
    }

    /// Tries to induce `v`.
    ///
    /// Increments the degree of every neighbour, then checks local validity at
    /// `v` and at each induced neighbour. If any check fails the call is fully
    /// undone and returns `false`.
    ///
    /// # Panics
    /// Panics if `v` is already induced.
    pub fn add(&mut self, lattice: &Lattice, v: VertexId) -> bool {
        assert!(!self.induced[v as usize], "vertex {v} is already induced");
        debug_assert!(lattice.is_enabled(v), "vertex {v} is disabled");

        self.induced[v as usize] = true;
        self.num_induced += 1;
        for &n in lattice.neighbors(v) {
            self.degree[n as usize] += 1;
        }

        let valid = self.is_locally_valid(lattice, v)
            && lattice
                .neighbors(v)
                .iter()
                .all(|&n| !self.induced[n as usize] || self.is_locally_valid(lattice, n));

        if !valid {
            self.retract(lattice, v);
        }
        valid
    }

    /// Undoes a successful [`add`](Self::add) of `v`.
    ///
    /// # Panics
    /// Panics if `v` is not induced.
    pub fn rem(&mut self, lattice: &Lattice, v: VertexId) {
        assert!(self.induced[v as usize], "vertex {v} removed but not induced");
        self.retract(lattice, v);
    }

    #[inline]
    fn retract(&mut self, lattice: &Lattice, v: VertexId) {
        self.induced[v as usize] = false;
        self.num_induced -= 1;
        for &n in lattice.neighbors(v) {
            self.degree[n as usize] -= 1;
        }
    }

    /// Returns `false` iff some plane around `v` has all four in-plane
    /// neighbours induced.
    pub fn is_locally_valid(&self, lattice: &Lattice, v: VertexId) -> bool {
        if self.degree(v) < 4 {
            return true;
        }
        let full_axes = Axis::ALL
            .iter()
            .filter(|&&axis| {
                let (neg, pos) = axis.directions();
                self.exists(lattice.direction(v, neg)) && self.exists(lattice.direction(v, pos))
            })
            .count();
        full_axes < 2
    }

    /// Snapshot of the induced set.
    pub fn to_shape(&self, lattice: &Lattice) -> Shape {
        Shape::from_cells(lattice.dims(), self.induced())
    }

    /// Returns `true` if the induced set seals off an empty cell.
    pub fn has_enclosed_space(&self, lattice: &Lattice) -> bool {
        self.to_shape(lattice).has_enclosed_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Dimensions;

    fn lattice(x: u32, y: u32, z: u32) -> Lattice {
        Lattice::new(Dimensions::new(x, y, z).unwrap())
    }

    fn assert_degrees_consistent(g: &Lattice, s: &Subtree) {
        for v in 0..g.len() as VertexId {
            let expected = g.neighbors(v).iter().filter(|&&n| s.contains(n)).count();
            assert_eq!(s.degree(v) as usize, expected, "degree of {v}");
        }
        assert_eq!(s.len(), s.induced().count());
    }

    #[test]
    fn test_new_induces_root() {
        let g = lattice(3, 3, 3);
        let s = Subtree::new(&g, 4);
        assert_eq!(s.root(), 4);
        assert_eq!(s.len(), 1);
        assert!(s.contains(4));
        assert!(s.exists(4));
        assert!(!s.exists(EMPTY));
        assert_degrees_consistent(&g, &s);
    }

    #[test]
    fn test_add_rem_restores_state() {
        let g = lattice(3, 3, 3);
        let mut s = Subtree::new(&g, 0);
        assert!(s.add(&g, 1));
        let before = s.clone();
        assert!(s.add(&g, 2));
        assert_degrees_consistent(&g, &s);
        s.rem(&g, 2);
        assert_eq!(s, before);
    }

    #[test]
    fn test_planar_plus_is_rejected() {
        // 3x3x1: the centre with all four in-plane neighbours.
        let g = lattice(3, 3, 1);
        let mut s = Subtree::new(&g, 1);
        for v in [4, 3, 5] {
            assert!(s.add(&g, v));
        }
        let before = s.clone();
        assert!(!s.add(&g, 7));
        assert_eq!(s, before, "failed add leaves no trace");
        assert_degrees_consistent(&g, &s);
    }

    #[test]
    fn test_three_axis_star_is_accepted() {
        let g = lattice(3, 3, 3);
        let d = g.dims();
        let centre = d.id(1, 1, 1);
        // Root below the centre, then centre, then +-x and +y: spans all three axes.
        let mut s = Subtree::new(&g, d.id(1, 1, 0));
        assert!(s.add(&g, centre));
        assert!(s.add(&g, d.id(0, 1, 1)));
        assert!(s.add(&g, d.id(2, 1, 1)));
        assert!(s.add(&g, d.id(1, 2, 1)));
        assert_eq!(s.degree(centre), 4);
        assert!(s.is_locally_valid(&g, centre));

        // A fifth arm always completes a plane.
        assert!(!s.add(&g, d.id(1, 0, 1)));
        assert!(!s.add(&g, d.id(1, 1, 2)));
        assert_degrees_consistent(&g, &s);
    }

    #[test]
    #[should_panic(expected = "not induced")]
    fn test_rem_without_add_panics() {
        let g = lattice(2, 2, 2);
        let mut s = Subtree::new(&g, 0);
        s.rem(&g, 3);
    }

    #[test]
    #[should_panic(expected = "already induced")]
    fn test_double_add_panics() {
        let g = lattice(2, 2, 2);
        let mut s = Subtree::new(&g, 0);
        s.add(&g, 0);
    }

    #[test]
    fn test_degrees_follow_disabled_adjacency() {
        let mut g = lattice(3, 1, 1);
        g.disable(1);
        let s = Subtree::new(&g, 0);
        assert_eq!(s.degree(1), 0, "disabled vertex is no longer a neighbour");
        assert_eq!(s.degree(2), 0);
    }
}
