//! The exploration map: a mutable grid parallel to the maze, storing a
//! visited flag and a `came_from` direction per cell, protected by a
//! region-lock grid that partitions the maze into fixed-size tiles and
//! assigns one mutex per tile.
//!
//! The visited flag and the `came_from` direction are stored as atomics
//! rather than behind the tile mutex directly. This is what lets
//! `unexplored_exits` (spec §4.1, §4.3 step 6) read a *neighbouring* cell's
//! visited flag while the caller holds only the *current* cell's tile lock:
//! that read is a hint, not a commitment, and a stale "unvisited" answer
//! costs at most one wasted claim attempt on the next iteration. The commit
//! point — the actual transition from unvisited to visited — always happens
//! under the owning cell's tile lock (see [`ExplorationMap::mark_visited`]).

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::direction::{Coord, Direction};
use crate::grid::Matrix;

/// Size (in cells, per side) of a region lock tile. Smaller means more
/// parallelism and more locks; `1` would give every cell its own lock at the
/// cost of memory. `2` is the spec's tuned default.
pub const REGION_SIZE: usize = 2;

/// A handle on one region's mutex, held by at most one worker at a time.
/// `is_visited`/`mark_visited`/`came_from` on [`ExplorationMap`] require a
/// `&TileGuard` covering the cell in question, which statically prevents
/// calling them without holding the corresponding lock.
pub struct TileGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    tile: usize,
}

/// The shared, mutable exploration state: one visited flag and one
/// `came_from` direction per maze cell, partitioned into `REGION_SIZE x
/// REGION_SIZE` tiles each guarded by its own mutex (spec §3, §4.1).
pub struct ExplorationMap {
    width: usize,
    height: usize,
    visited: Vec<AtomicBool>,
    came_from: Vec<AtomicU8>,
    locks: Vec<Mutex<()>>,
    tiles_wide: usize,
}

impl ExplorationMap {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        let tiles_wide = width.div_ceil(REGION_SIZE);
        let tiles_high = height.div_ceil(REGION_SIZE);
        let num_tiles = tiles_wide * tiles_high;

        ExplorationMap {
            width,
            height,
            visited: (0..size).map(|_| AtomicBool::new(false)).collect(),
            came_from: (0..size).map(|_| AtomicU8::new(0)).collect(),
            locks: (0..num_tiles).map(|_| Mutex::new(())).collect(),
            tiles_wide,
        }
    }

    fn index(&self, cell: Coord) -> usize {
        cell.y * self.width + cell.x
    }

    fn tile_index(&self, cell: Coord) -> usize {
        (cell.x / REGION_SIZE) + (cell.y / REGION_SIZE) * self.tiles_wide
    }

    /// Acquires the region lock covering `cell`. The returned guard must be
    /// dropped (releasing the lock) before acquiring a different tile's
    /// lock — a worker holds at most one region lock at a time (spec §5).
    pub fn acquire(&self, cell: Coord) -> TileGuard<'_> {
        let tile = self.tile_index(cell);
        TileGuard { _guard: self.locks[tile].lock(), tile }
    }

    /// Whether `guard` covers `cell`'s tile. Used to decide whether a move
    /// needs a fresh lock acquisition or can reuse the currently held one
    /// (spec §4.3 step 3).
    pub fn covers(&self, guard: &TileGuard, cell: Coord) -> bool {
        guard.tile == self.tile_index(cell)
    }

    fn assert_covers(&self, guard: &TileGuard, cell: Coord) {
        debug_assert!(self.covers(guard, cell), "cell {cell:?} is not covered by the held region lock");
    }

    /// Reads `cell`'s visited flag while holding the lock covering it.
    pub fn is_visited(&self, guard: &TileGuard, cell: Coord) -> bool {
        self.assert_covers(guard, cell);
        self.visited[self.index(cell)].load(Ordering::Relaxed)
    }

    /// Claims `cell` for the caller: marks it visited and records
    /// `came_from` (`None` for the start cell, which has no predecessor).
    /// Must only be called once per cell (spec: "set exactly once... never
    /// cleared"); callers check [`Self::is_visited`] first under the same
    /// lock to guarantee this.
    pub fn mark_visited(&self, guard: &TileGuard, cell: Coord, came_from: Option<Direction>) {
        self.assert_covers(guard, cell);
        let idx = self.index(cell);
        self.visited[idx].store(true, Ordering::Relaxed);
        self.came_from[idx].store(came_from.map_or(0, Direction::bit), Ordering::Relaxed);
    }

    /// Reads `cell`'s `came_from` direction while holding the lock covering
    /// it. Returns `None` for the start cell or an unvisited cell.
    pub fn came_from(&self, guard: &TileGuard, cell: Coord) -> Option<Direction> {
        self.assert_covers(guard, cell);
        Direction::from_bit(self.came_from[self.index(cell)].load(Ordering::Relaxed))
    }

    /// A lock-free hint read of `cell`'s visited flag, usable without
    /// holding any region lock. Used only to decide which neighbours look
    /// worth exploring (spec §4.1's "hint, not a commitment").
    pub fn is_visited_hint(&self, cell: Coord) -> bool {
        self.visited[self.index(cell)].load(Ordering::Relaxed)
    }

    /// Reads `cell`'s `came_from` direction without holding a lock. Sound
    /// to call once all workers have joined (path reconstruction, spec
    /// §4.5), when there is no concurrent writer left.
    pub fn came_from_hint(&self, cell: Coord) -> Option<Direction> {
        Direction::from_bit(self.came_from[self.index(cell)].load(Ordering::Relaxed))
    }

    /// Snapshots the whole visited set. Used by tests and by the CLI's
    /// "explored cells" rendering when the maze turns out unsolvable.
    pub fn visited_snapshot(&self) -> Matrix<bool> {
        let mut snapshot = Matrix::new_default(self.width, self.height, false);
        for coord in snapshot.iter_coords() {
            snapshot[coord] = self.is_visited_hint(coord);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_exclusive_under_one_guard() {
        let map = ExplorationMap::new(4, 4);
        let cell = Coord::new(1, 1);
        let guard = map.acquire(cell);
        assert!(!map.is_visited(&guard, cell));
        map.mark_visited(&guard, cell, Some(Direction::NORTH));
        assert!(map.is_visited(&guard, cell));
        assert_eq!(map.came_from(&guard, cell), Some(Direction::NORTH));
    }

    #[test]
    fn hint_read_does_not_require_lock() {
        let map = ExplorationMap::new(4, 4);
        let cell = Coord::new(3, 3);
        assert!(!map.is_visited_hint(cell));
        {
            let guard = map.acquire(cell);
            map.mark_visited(&guard, cell, Some(Direction::WEST));
        }
        assert!(map.is_visited_hint(cell));
    }

    #[test]
    fn tiles_partition_the_grid() {
        let map = ExplorationMap::new(5, 5);
        // Adjacent cells within a 2x2 tile share a lock index.
        assert_eq!(map.tile_index(Coord::new(0, 0)), map.tile_index(Coord::new(1, 1)));
        assert_ne!(map.tile_index(Coord::new(0, 0)), map.tile_index(Coord::new(2, 0)));
    }
}
