//! # Shoreline Erosion
//!
//! Post-process at full resolution: interior biomes touching water are
//! downgraded to `Island`, giving every coast a soft beach buffer.
//!
//! Each pass marks first and downgrades after the full scan, so a pass never
//! sees its own output. Once a pass marks nothing the grid is stable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::biome::TileType;
use crate::grid::WorldGrid;

/// Which neighbors count as touching water.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Cardinal neighbors only.
    Four,
    /// Cardinal and diagonal neighbors.
    #[default]
    Eight,
}

/// Shoreline pass settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionConfig {
    /// Maximum number of passes.
    pub passes: u32,
    /// Neighborhood used for the water test.
    pub connectivity: Connectivity,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            passes: 2,
            connectivity: Connectivity::Eight,
        }
    }
}

/// Outcome of [`erode_shoreline`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErosionReport {
    /// Cells downgraded by each pass that ran.
    pub downgraded_per_pass: Vec<usize>,
    /// True if the last pass that ran changed nothing.
    pub converged: bool,
}

impl ErosionReport {
    /// Total cells downgraded.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downgraded_per_pass.iter().sum()
    }
}

/// Returns true if any in-bounds neighbor of `(x, z)` is water.
///
/// Neighbors outside the grid are never water.
#[must_use]
pub fn touches_water(grid: &WorldGrid, x: i64, z: i64, connectivity: Connectivity) -> bool {
    let is_water = |(nx, nz): (i64, i64)| grid.tile(nx, nz) == TileType::Water;
    match connectivity {
        Connectivity::Four => grid.neighbors4(x, z).any(is_water),
        Connectivity::Eight => grid.neighbors8(x, z).any(is_water),
    }
}

/// Runs up to `config.passes` shoreline passes over the grid.
pub fn erode_shoreline(grid: &mut WorldGrid, config: &ErosionConfig) -> ErosionReport {
    let mut report = ErosionReport::default();
    let mut marked: Vec<(i64, i64)> = Vec::new();

    for pass in 0..config.passes {
        marked.clear();
        for z in 0..grid.depth() as i64 {
            for x in 0..grid.width() as i64 {
                if grid.tile(x, z).is_erodible() && touches_water(grid, x, z, config.connectivity) {
                    marked.push((x, z));
                }
            }
        }

        for &(x, z) in &marked {
            grid.set_tile(x, z, TileType::Island);
        }

        debug!(pass, downgraded = marked.len(), "shoreline pass");
        report.downgraded_per_pass.push(marked.len());

        if marked.is_empty() {
            report.converged = true;
            break;
        }
    }

    report
}
