//! Plain cubic lattice graph over a fixed `SIZEX x SIZEY x SIZEZ` grid.
//!
//! Every cell is a vertex, identified by `id = x + SIZEX * (y + SIZEY * z)`.
//! Each vertex has six directional slots (west/east, south/north, down/up)
//! holding either a neighbour id or [`EMPTY`], plus a derived neighbour list in
//! ascending id order.
//!
//! # Optimization
//! Topology is stored as a Structure-of-Arrays:
//! - `directions`: the six directional slots, read by the plane check.
//! - `adjacency`: the compact sorted neighbour lists, read on every add/remove.
//! - `enabled`: one flag per vertex, only read when choosing roots.
//!
//! The lattice is built once and, after the optional [`Lattice::disable`]
//! preprocessing, only ever shared by `&Lattice` across worker threads.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::subtree::Shape;

/// Vertex identifier: an encoded lattice coordinate.
pub type VertexId = u32;

/// Sentinel for "no such neighbour".
pub const EMPTY: VertexId = VertexId::MAX;

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// West/east.
    X,
    /// South/north.
    Y,
    /// Down/up.
    Z,
}

impl Axis {
    /// All axes in x, y, z order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The `(negative, positive)` directions along this axis.
    #[inline]
    pub const fn directions(self) -> (Direction, Direction) {
        match self {
            Axis::X => (Direction::West, Direction::East),
            Axis::Y => (Direction::South, Direction::North),
            Axis::Z => (Direction::Down, Direction::Up),
        }
    }
}

/// One of the six lattice directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// -x
    West = 0,
    /// +x
    East = 1,
    /// -y
    South = 2,
    /// +y
    North = 3,
    /// -z
    Down = 4,
    /// +z
    Up = 5,
}

impl Direction {
    /// All directions, in slot order.
    pub const ALL: [Direction; 6] = [
        Direction::West,
        Direction::East,
        Direction::South,
        Direction::North,
        Direction::Down,
        Direction::Up,
    ];

    /// The direction pointing the other way along the same axis.
    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::North => Direction::South,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }

    /// The axis this direction runs along.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Direction::West | Direction::East => Axis::X,
            Direction::South | Direction::North => Axis::Y,
            Direction::Down | Direction::Up => Axis::Z,
        }
    }

    #[inline]
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Per-axis extents of the grid.
///
/// Parses from and displays as `XxYxZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along x.
    pub x: u32,
    /// Extent along y.
    pub y: u32,
    /// Extent along z.
    pub z: u32,
}

impl Dimensions {
    /// Validates and creates a set of extents.
    ///
    /// Every extent must be at least one, and the total cell count must stay
    /// below [`EMPTY`] so the sentinel never collides with a real id.
    pub fn new(x: u32, y: u32, z: u32) -> Result<Self> {
        let cells = u64::from(x) * u64::from(y) * u64::from(z);
        if x == 0 || y == 0 || z == 0 || cells >= u64::from(EMPTY) {
            return Err(Error::InvalidDimensions {
                x: x.into(),
                y: y.into(),
                z: z.into(),
            });
        }
        Ok(Self { x, y, z })
    }

    /// Number of cells (vertices).
    #[inline]
    pub const fn len(&self) -> usize {
        (self.x as usize) * (self.y as usize) * (self.z as usize)
    }

    /// Always `false`: validated dimensions hold at least one cell.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes a coordinate.
    ///
    /// # Panics
    /// Panics in debug builds if the coordinate is out of range.
    #[inline]
    pub fn id(&self, x: u32, y: u32, z: u32) -> VertexId {
        debug_assert!(x < self.x && y < self.y && z < self.z);
        x + self.x * (y + self.y * z)
    }

    /// Decodes an id into `(x, y, z)`.
    #[inline]
    pub fn coords(&self, v: VertexId) -> (u32, u32, u32) {
        (v % self.x, (v / self.x) % self.y, v / (self.x * self.y))
    }

    /// Geometric neighbour of `v` in direction `d`, ignoring any disabled
    /// cells; [`EMPTY`] past the bounding box.
    #[inline]
    pub fn step(&self, v: VertexId, d: Direction) -> VertexId {
        let (x, y, z) = self.coords(v);
        let layer = self.x * self.y;
        match d {
            Direction::West if x > 0 => v - 1,
            Direction::East if x + 1 < self.x => v + 1,
            Direction::South if y > 0 => v - self.x,
            Direction::North if y + 1 < self.y => v + self.x,
            Direction::Down if z > 0 => v - layer,
            Direction::Up if z + 1 < self.z => v + layer,
            _ => EMPTY,
        }
    }

    /// `true` if `v` lies on the outer shell of the bounding box.
    #[inline]
    pub fn on_shell(&self, v: VertexId) -> bool {
        Direction::ALL.iter().any(|&d| self.step(v, d) == EMPTY)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

impl FromStr for Dimensions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let syntax = || Error::DimensionsSyntax(s.to_owned());
        let mut parts = s.trim().split(['x', 'X']);
        let mut next = || -> Result<u32> {
            parts
                .next()
                .ok_or_else(syntax)?
                .trim()
                .parse()
                .map_err(|_| syntax())
        };
        let (x, y, z) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(syntax());
        }
        Dimensions::new(x, y, z)
    }
}

/// Up to six neighbour ids in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NeighborList {
    ids: [VertexId; 6],
    len: u8,
}

impl NeighborList {
    #[inline]
    fn as_slice(&self) -> &[VertexId] {
        &self.ids[..self.len as usize]
    }

    fn remove(&mut self, v: VertexId) -> bool {
        let len = self.len as usize;
        match self.ids[..len].iter().position(|&n| n == v) {
            Some(pos) => {
                self.ids.copy_within(pos + 1..len, pos);
                self.ids[len - 1] = EMPTY;
                self.len -= 1;
                true
            }
            None => false,
        }
    }
}

/// The lattice graph shared by every search branch.
#[derive(Debug, Clone)]
pub struct Lattice {
    dims: Dimensions,
    directions: Vec<[VertexId; 6]>,
    adjacency: Vec<NeighborList>,
    enabled: Vec<bool>,
    num_disabled: usize,
}

impl Lattice {
    /// Builds the full cubic lattice for `dims`.
    pub fn new(dims: Dimensions) -> Self {
        let n = dims.len();
        let mut directions = Vec::with_capacity(n);
        let mut adjacency = Vec::with_capacity(n);

        for v in 0..n as VertexId {
            let slots = Direction::ALL.map(|d| dims.step(v, d));

            let mut ids = [EMPTY; 6];
            let mut len = 0u8;
            for &id in slots.iter().filter(|&&id| id != EMPTY) {
                ids[len as usize] = id;
                len += 1;
            }
            ids[..len as usize].sort_unstable();

            directions.push(slots);
            adjacency.push(NeighborList { ids, len });
        }

        Self {
            dims,
            directions,
            adjacency,
            enabled: vec![true; n],
            num_disabled: 0,
        }
    }

    /// Builds the lattice spanned by `shape`'s bounding box and disables every
    /// cell the shape does not contain.
    pub fn restricted_to(shape: &Shape) -> Self {
        let mut lattice = Lattice::new(shape.dims());
        for v in 0..lattice.len() as VertexId {
            if !shape.contains(v) {
                lattice.disable(v);
            }
        }
        lattice
    }

    /// Grid extents.
    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Number of vertices, enabled or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// `true` if the lattice has no vertices (never, for validated dimensions).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Neighbour of `v` in direction `d`, or [`EMPTY`].
    #[inline]
    pub fn direction(&self, v: VertexId, d: Direction) -> VertexId {
        self.directions[v as usize][d.slot()]
    }

    /// Current neighbours of `v` in ascending id order.
    #[inline]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        self.adjacency[v as usize].as_slice()
    }

    /// `false` once `v` has been disabled.
    #[inline]
    pub fn is_enabled(&self, v: VertexId) -> bool {
        self.enabled[v as usize]
    }

    /// Number of disabled vertices.
    #[inline]
    pub fn num_disabled(&self) -> usize {
        self.num_disabled
    }

    /// Enabled vertex ids in ascending order.
    pub fn enabled_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.len() as VertexId).filter(move |&v| self.is_enabled(v))
    }

    /// Splices `v` out of the graph.
    ///
    /// The reciprocal slot on each directional neighbour becomes [`EMPTY`] and
    /// `v` is dropped from their neighbour lists. `v`'s own slots are left as
    /// they were, so adjacency is no longer symmetric around `v`.
    /// Disabling a vertex twice is a no-op. Must not run concurrently with a
    /// search; the borrow checker already forbids it.
    ///
    /// # Panics
    /// Panics if `v` is out of range.
    pub fn disable(&mut self, v: VertexId) {
        if !self.enabled[v as usize] {
            return;
        }
        self.enabled[v as usize] = false;

        for d in Direction::ALL {
            let n = self.directions[v as usize][d.slot()];
            if n == EMPTY {
                continue;
            }
            self.directions[n as usize][d.opposite().slot()] = EMPTY;
            // Linear scan; preprocessing only.
            self.adjacency[n as usize].remove(v);
        }

        self.num_disabled += 1;
    }
}
