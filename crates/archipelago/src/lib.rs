//! # ARCHIPELAGO
//!
//! Application layer over `archipelago_procedural`.
//!
//! ```text
//! ┌──────────────┐   params    ┌──────────────────────────┐
//! │ worldgen CLI │ ──────────> │ WorldGenerationService   │
//! │ renderer     │ <────────── │  RwLock<Arc<WorldGrid>>  │
//! │ movement     │   queries   └────────────┬─────────────┘
//! └──────────────┘                          │ generate
//!                               ┌───────────v─────────────┐
//!                               │ archipelago_procedural  │
//!                               └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `service`: current world, height / walkability / spawn queries
//! - `seed`: wall-clock seed source

pub mod seed;
pub mod service;

// Re-export the generator
pub use archipelago_procedural as procedural;

pub use seed::{clock_seed, clock_seed_from};
pub use service::{WorldGenerationService, WorldService, SPAWN_SENTINEL};
