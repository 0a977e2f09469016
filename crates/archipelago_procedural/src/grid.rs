//! # World Grid
//!
//! The generated world: one tile type and one quantized elevation per cell,
//! stored row-major by `(x, z)`.
//!
//! Reads outside the grid return neutral defaults (`Empty`, height 0) and
//! writes outside it are ignored. Consumers rely on this permissive edge.

use crate::biome::TileType;

/// Half-size of the collision footprint used by [`WorldGrid::is_walkable`].
pub const FOOTPRINT_RADIUS: f32 = 0.45;

/// A rectangular grid of tiles and elevations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldGrid {
    width: usize,
    depth: usize,
    tiles: Vec<TileType>,
    heights: Vec<u32>,
}

impl WorldGrid {
    /// Creates an empty grid (all `Empty`, all height 0).
    #[must_use]
    pub fn new(width: usize, depth: usize) -> Self {
        Self {
            width,
            depth,
            tiles: vec![TileType::Empty; width * depth],
            heights: vec![0; width * depth],
        }
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid depth in cells.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    fn index(&self, x: i64, z: i64) -> Option<usize> {
        if self.is_valid(x, z) {
            Some(z as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Returns true if `(x, z)` lies inside the grid.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, x: i64, z: i64) -> bool {
        x >= 0 && z >= 0 && (x as usize) < self.width && (z as usize) < self.depth
    }

    /// Tile at a cell, `Empty` outside the grid.
    #[inline]
    #[must_use]
    pub fn tile(&self, x: i64, z: i64) -> TileType {
        self.index(x, z).map_or(TileType::Empty, |i| self.tiles[i])
    }

    /// Sets a tile; ignored outside the grid.
    #[inline]
    pub fn set_tile(&mut self, x: i64, z: i64, tile: TileType) {
        if let Some(i) = self.index(x, z) {
            self.tiles[i] = tile;
        }
    }

    /// Elevation at a cell, 0 outside the grid.
    #[inline]
    #[must_use]
    pub fn height(&self, x: i64, z: i64) -> u32 {
        self.index(x, z).map_or(0, |i| self.heights[i])
    }

    /// Sets an elevation; ignored outside the grid.
    #[inline]
    pub fn set_height(&mut self, x: i64, z: i64, height: u32) {
        if let Some(i) = self.index(x, z) {
            self.heights[i] = height;
        }
    }

    /// Stamps one tile and elevation onto the `size`×`size` block at `(x, z)`.
    ///
    /// Cells falling outside the grid are skipped.
    pub fn set_block(&mut self, x: i64, z: i64, size: i64, tile: TileType, height: u32) {
        for dz in 0..size {
            for dx in 0..size {
                self.set_tile(x + dx, z + dz, tile);
                self.set_height(x + dx, z + dz, height);
            }
        }
    }

    /// All tiles, row-major.
    #[inline]
    #[must_use]
    pub fn tiles(&self) -> &[TileType] {
        &self.tiles
    }

    /// All elevations, row-major.
    #[inline]
    #[must_use]
    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    /// The height map as raw bytes, for direct GPU upload.
    #[must_use]
    pub fn height_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.heights)
    }

    /// Number of cells of each tile type, indexed by `TileType as usize`.
    #[must_use]
    pub fn tile_counts(&self) -> [usize; 8] {
        let mut counts = [0; 8];
        for &tile in &self.tiles {
            counts[tile as usize] += 1;
        }
        counts
    }

    /// Iterates the 8 neighbors of a cell that lie inside the grid.
    pub fn neighbors8(&self, x: i64, z: i64) -> impl Iterator<Item = (i64, i64)> + '_ {
        const DIRS: [(i64, i64); 8] = [
            (-1, -1), (0, -1), (1, -1),
            (-1, 0), (1, 0),
            (-1, 1), (0, 1), (1, 1),
        ];
        DIRS.iter()
            .map(move |&(dx, dz)| (x + dx, z + dz))
            .filter(move |&(nx, nz)| self.is_valid(nx, nz))
    }

    /// Iterates the 4 cardinal neighbors of a cell that lie inside the grid.
    pub fn neighbors4(&self, x: i64, z: i64) -> impl Iterator<Item = (i64, i64)> + '_ {
        const DIRS: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
        DIRS.iter()
            .map(move |&(dx, dz)| (x + dx, z + dz))
            .filter(move |&(nx, nz)| self.is_valid(nx, nz))
    }

    // -------------------------------------------------------------------------
    // Spatial queries
    // -------------------------------------------------------------------------

    /// Elevation at continuous coordinates, snapped to the nearest cell.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.height(snap(x), snap(z)) as f32
    }

    /// Returns true if a single cell can be stood on.
    ///
    /// Border cells never are; otherwise the tile must be land.
    #[must_use]
    pub fn is_cell_walkable(&self, x: i64, z: i64) -> bool {
        let interior = x >= 1
            && z >= 1
            && x < self.width as i64 - 1
            && z < self.depth as i64 - 1;
        interior && self.tile(x, z).is_walkable()
    }

    /// Footprint check: all four corners at `±FOOTPRINT_RADIUS` must be walkable.
    #[must_use]
    pub fn is_walkable(&self, x: f32, z: f32) -> bool {
        const CORNERS: [(f32, f32); 4] = [
            (-FOOTPRINT_RADIUS, -FOOTPRINT_RADIUS),
            (FOOTPRINT_RADIUS, -FOOTPRINT_RADIUS),
            (-FOOTPRINT_RADIUS, FOOTPRINT_RADIUS),
            (FOOTPRINT_RADIUS, FOOTPRINT_RADIUS),
        ];
        CORNERS
            .iter()
            .all(|&(dx, dz)| self.is_cell_walkable(snap(x + dx), snap(z + dz)))
    }

    /// Nearest walkable cell to the grid center, by outward ring search.
    ///
    /// Each ring scans the whole top row, then the whole bottom row, both
    /// left to right, then the left and right columns without their corners. Returns `None` if nothing is walkable.
    #[must_use]
    pub fn find_spawn(&self) -> Option<(f32, f32)> {
        let cx = (self.width / 2) as i64;
        let cz = (self.depth / 2) as i64;
        let max_radius = self.width.max(self.depth) as i64;

        for radius in 0..=max_radius {
            if let Some((x, z)) = self.scan_ring(cx, cz, radius) {
                return Some((x as f32, z as f32));
            }
        }
        None
    }

    fn scan_ring(&self, cx: i64, cz: i64, radius: i64) -> Option<(i64, i64)> {
        if radius == 0 {
            return self.is_cell_walkable(cx, cz).then_some((cx, cz));
        }
        for z in [cz - radius, cz + radius] {
            for dx in -radius..=radius {
                if self.is_cell_walkable(cx + dx, z) {
                    return Some((cx + dx, z));
                }
            }
        }
        for dz in (1 - radius)..radius {
            for x in [cx - radius, cx + radius] {
                if self.is_cell_walkable(x, cz + dz) {
                    return Some((x, cz + dz));
                }
            }
        }
        None
    }
}

/// Rounds a continuous coordinate to its cell.
#[inline]
fn snap(v: f32) -> i64 {
    v.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: usize, depth: usize, tile: TileType) -> WorldGrid {
        let mut grid = WorldGrid::new(width, depth);
        for z in 0..depth as i64 {
            for x in 0..width as i64 {
                grid.set_tile(x, z, tile);
            }
        }
        grid
    }

    #[test]
    fn test_out_of_bounds_defaults() {
        let mut grid = WorldGrid::new(4, 3);
        grid.set_tile(-1, 0, TileType::Grass);
        grid.set_height(4, 0, 9);

        assert_eq!(grid.tile(-1, 0), TileType::Empty);
        assert_eq!(grid.tile(0, 3), TileType::Empty);
        assert_eq!(grid.height(4, 0), 0);
        assert_eq!(grid.height_at(-10.0, 2.0), 0.0);
        assert!(grid.tiles().iter().all(|&t| t == TileType::Empty));
    }

    #[test]
    fn test_block_stamp_clips_at_edge() {
        let mut grid = WorldGrid::new(3, 3);
        grid.set_block(2, 2, 2, TileType::Snow, 2);

        assert_eq!(grid.tile(2, 2), TileType::Snow);
        assert_eq!(grid.height(2, 2), 2);
        assert_eq!(grid.tile_counts()[TileType::Snow as usize], 1);
    }

    #[test]
    fn test_height_at_rounds_to_nearest() {
        let mut grid = WorldGrid::new(4, 4);
        grid.set_height(2, 1, 3);

        assert_eq!(grid.height_at(1.6, 0.7), 3.0);
        assert_eq!(grid.height_at(2.4, 1.4), 3.0);
        assert_eq!(grid.height_at(1.4, 1.0), 0.0);
    }

    #[test]
    fn test_edges_never_walkable() {
        let grid = filled(6, 5, TileType::Grass);
        for x in 0..6 {
            assert!(!grid.is_cell_walkable(x, 0));
            assert!(!grid.is_cell_walkable(x, 4));
        }
        for z in 0..5 {
            assert!(!grid.is_cell_walkable(0, z));
            assert!(!grid.is_cell_walkable(5, z));
        }
        assert!(grid.is_cell_walkable(1, 1));
        assert!(grid.is_cell_walkable(4, 3));
    }

    #[test]
    fn test_water_and_empty_block_walking() {
        let mut grid = filled(5, 5, TileType::Dirt);
        grid.set_tile(2, 2, TileType::Water);
        grid.set_tile(1, 2, TileType::Empty);

        assert!(!grid.is_cell_walkable(2, 2));
        assert!(!grid.is_cell_walkable(1, 2));
        assert!(grid.is_cell_walkable(3, 2));
    }

    #[test]
    fn test_footprint_checks_all_corners() {
        let mut grid = filled(8, 8, TileType::Grass);
        grid.set_tile(4, 4, TileType::Water);

        // Cell centers only touch their own cell
        assert!(grid.is_walkable(3.0, 3.0));
        assert!(!grid.is_walkable(4.0, 4.0));

        // Straddling the corner of the water cell reaches into it
        assert!(!grid.is_walkable(3.5, 3.5));
        assert!(grid.is_walkable(2.5, 2.5));

        // Footprint hanging over the border
        assert!(!grid.is_walkable(1.0, 0.6));
    }

    #[test]
    fn test_spawn_at_center_when_walkable() {
        let grid = filled(9, 9, TileType::Grass);
        assert_eq!(grid.find_spawn(), Some((4.0, 4.0)));
    }

    #[test]
    fn test_spawn_ring_search_order() {
        let mut grid = filled(9, 9, TileType::Water);
        // Two candidates at ring 2: bottom row wins over a side column
        grid.set_tile(6, 3, TileType::Grass);
        grid.set_tile(3, 6, TileType::Grass);
        assert_eq!(grid.find_spawn(), Some((3.0, 6.0)));

        // Rows are scanned left to right
        grid.set_tile(2, 6, TileType::Grass);
        assert_eq!(grid.find_spawn(), Some((2.0, 6.0)));

        // The whole top row comes before the bottom row, even at a larger dx
        grid.set_tile(6, 2, TileType::Grass);
        assert_eq!(grid.find_spawn(), Some((6.0, 2.0)));
        grid.set_tile(2, 2, TileType::Grass);
        assert_eq!(grid.find_spawn(), Some((2.0, 2.0)));

        // A closer ring always wins
        grid.set_tile(5, 5, TileType::Island);
        assert_eq!(grid.find_spawn(), Some((5.0, 5.0)));
    }

    #[test]
    fn test_spawn_none_without_land() {
        let grid = filled(7, 7, TileType::Water);
        assert_eq!(grid.find_spawn(), None);

        // Land only on the border is not walkable either
        let mut border = filled(7, 7, TileType::Water);
        border.set_tile(0, 3, TileType::Grass);
        assert_eq!(border.find_spawn(), None);
    }

    #[test]
    fn test_spawn_found_far_from_center() {
        let mut grid = filled(20, 10, TileType::Water);
        grid.set_tile(18, 1, TileType::Stone);
        let spawn = grid.find_spawn();
        assert_eq!(spawn, Some((18.0, 1.0)));
        let (x, z) = spawn.unwrap_or_default();
        assert!(grid.is_walkable(x, z));
    }

    #[test]
    fn test_height_bytes_view() {
        let mut grid = WorldGrid::new(2, 1);
        grid.set_height(1, 0, 7);
        assert_eq!(grid.height_bytes().len(), 8);
    }

    #[test]
    fn test_neighbor_iterators_clip() {
        let grid = WorldGrid::new(3, 3);
        assert_eq!(grid.neighbors8(0, 0).count(), 3);
        assert_eq!(grid.neighbors8(1, 1).count(), 8);
        assert_eq!(grid.neighbors4(0, 0).count(), 2);
        assert_eq!(grid.neighbors4(1, 1).count(), 4);
    }
}
