//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod collision;
pub mod difficulty;
pub mod generator;
pub mod hazard;
pub mod kinematics;
pub mod pause;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, canopy_contact};
pub use difficulty::{DifficultyParameters, Rank, update_rank};
pub use pause::{PauseManager, Snapshot};
pub use state::{
    Camera, GameEvent, GamePhase, GameState, HorizontalInput, Platform, PlatformKind, Player,
    Raindrop, RunState, Swing, TemporaryState, TerminalCause, Viewport,
};
pub use tick::{TickInput, tick};
