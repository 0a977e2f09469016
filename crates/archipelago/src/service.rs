//! # World Generation Service
//!
//! Owns the current world and answers movement and spawn queries against it.
//!
//! ## Concurrency
//!
//! - `generate_world` is the only writer; it builds the new grid without
//!   holding the lock, then swaps it in.
//! - Queries take a read lock just long enough to clone the `Arc`.
//! - A finished grid is immutable, so readers holding an old `Arc` keep a
//!   consistent snapshot while a new world is generated.

use std::sync::Arc;

use archipelago_procedural::{
    GenerationParams, GenerationReport, GenerationResult, WorldGenerator, WorldGrid,
};
use parking_lot::RwLock;
use tracing::{info, warn};

/// Spawn position reported when no world exists or nothing is walkable.
pub const SPAWN_SENTINEL: (f32, f32) = (0.0, 0.0);

/// Queries the rest of the game makes against the world.
pub trait WorldService: Send + Sync {
    /// Generates a new world and makes it current.
    ///
    /// # Errors
    ///
    /// Propagates parameter validation failures; the current world is kept.
    fn generate_world(&self, params: &GenerationParams) -> GenerationResult<Arc<WorldGrid>>;

    /// Elevation at continuous coordinates, 0 without a world.
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Footprint walkability at continuous coordinates, false without a world.
    fn is_walkable(&self, x: f32, z: f32) -> bool;

    /// Nearest walkable cell to the map center, or [`SPAWN_SENTINEL`].
    fn default_spawn_position(&self) -> (f32, f32);

    /// The current world, for renderers.
    fn current_world(&self) -> Option<Arc<WorldGrid>>;
}

/// [`WorldService`] backed by a [`WorldGenerator`].
#[derive(Debug, Default)]
pub struct WorldGenerationService {
    generator: WorldGenerator,
    current: RwLock<Option<Arc<WorldGrid>>>,
}

impl WorldGenerationService {
    /// Creates a service with no world yet.
    #[must_use]
    pub fn new(generator: WorldGenerator) -> Self {
        Self {
            generator,
            current: RwLock::new(None),
        }
    }

    /// The generator used for every call.
    #[must_use]
    pub const fn generator(&self) -> &WorldGenerator {
        &self.generator
    }

    /// Generates a new world, makes it current and returns what the passes did.
    ///
    /// # Errors
    ///
    /// Propagates parameter validation failures; the current world is kept.
    pub fn generate_world_with_report(
        &self,
        params: &GenerationParams,
    ) -> GenerationResult<(Arc<WorldGrid>, GenerationReport)> {
        let (grid, report) = self.generator.generate_with_report(params)?;
        let world = Arc::new(grid);
        *self.current.write() = Some(Arc::clone(&world));

        info!(
            seed = params.seed,
            passes = report.erosion.downgraded_per_pass.len(),
            "current world replaced"
        );
        Ok((world, report))
    }
}

impl WorldService for WorldGenerationService {
    fn generate_world(&self, params: &GenerationParams) -> GenerationResult<Arc<WorldGrid>> {
        self.generate_world_with_report(params).map(|(world, _)| world)
    }

    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.current_world().map_or(0.0, |world| world.height_at(x, z))
    }

    fn is_walkable(&self, x: f32, z: f32) -> bool {
        self.current_world().is_some_and(|world| world.is_walkable(x, z))
    }

    fn default_spawn_position(&self) -> (f32, f32) {
        let Some(world) = self.current_world() else {
            warn!("spawn requested before any world was generated");
            return SPAWN_SENTINEL;
        };
        world.find_spawn().unwrap_or_else(|| {
            warn!(
                width = world.width(),
                depth = world.depth(),
                "no walkable cell, using spawn sentinel"
            );
            SPAWN_SENTINEL
        })
    }

    fn current_world(&self) -> Option<Arc<WorldGrid>> {
        self.current.read().clone()
    }
}
