//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::autopilot;
use super::camera;
use super::collision;
use super::difficulty::update_rank;
use super::generator;
use super::hazard;
use super::kinematics;
use super::state::{GameEvent, GamePhase, GameState, HorizontalInput, TerminalCause};
use crate::consts::MAX_FRAME_DT;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction (ignored in idle mode)
    pub horizontal: HorizontalInput,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Only a running game advances
    if state.phase != GamePhase::Running {
        return;
    }

    // --- Clock ---
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };
    state.time_ticks += 1;

    // --- Input ---
    state.player.input = if input.idle_mode {
        autopilot::steer(state)
    } else {
        input.horizontal
    };

    // --- Kinematics ---
    if let Some(cause) = kinematics::integrate(state, dt) {
        end_run(state, cause);
        return;
    }

    // --- Platform registry ---
    generator::update(state, dt);

    // --- Collision ---
    collision::resolve(state);

    // --- Hazards ---
    if let Some(cause) = hazard::update(state) {
        end_run(state, cause);
        return;
    }

    // --- Camera ---
    camera::update(state, dt);

    // --- Difficulty ---
    let score = state.run.score;
    if let Some(rank) = update_rank(state.run.rank, score, &mut state.difficulty) {
        state.run.rank = rank;
        state.push_event(GameEvent::RankChange { rank });
        state.push_event(GameEvent::LevelChange { rank });
    }
}

/// Stop the run and report the final score
fn end_run(state: &mut GameState, cause: TerminalCause) {
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over ({:?}): score {}, rank {}",
        cause,
        state.run.score,
        state.run.rank
    );
    state.push_event(GameEvent::GameOver {
        score: state.run.score,
        rank: state.run.rank,
    });
}
