//! Idle/demo mode steering
//!
//! Picks an umbrella and steers toward its canopy centre. While rising it
//! aims for the highest umbrella the remaining jump can still clear; while
//! descending it aims for the nearest umbrella below the player's feet.

use super::state::{GameState, HorizontalInput, Platform};

/// Horizontal distance treated as "on target"
const DEAD_ZONE: f32 = 10.0;

/// Umbrella the autopilot is currently heading for
pub fn choose_target(state: &GameState) -> Option<&Platform> {
    let player = &state.player;
    let bottom = player.bottom();
    let tolerance = state.tuning.collision_tolerance * state.viewport.scale;
    let visible = |p: &&Platform| {
        let rel_y = state.camera.relative(p.pos.y);
        rel_y <= state.viewport.height
    };
    // Fading umbrellas may vanish mid-approach
    let usable = |p: &&Platform| !p.is_fading();

    if player.vel.y < 0.0 {
        // Height still to gain before the apex
        let apex = player.vel.y * player.vel.y / (2.0 * player.gravity.max(f32::EPSILON));
        let reachable = |p: &&Platform| {
            let rel_y = state.camera.relative(p.pos.y);
            rel_y < bottom && rel_y > bottom - apex
        };
        state
            .platforms
            .iter()
            .filter(visible)
            .filter(usable)
            .filter(reachable)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    } else {
        state
            .platforms
            .iter()
            .filter(visible)
            .filter(usable)
            .filter(|p| state.camera.relative(p.pos.y) >= bottom - tolerance)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    }
}

/// Input the autopilot would hold this tick
pub fn steer(state: &GameState) -> HorizontalInput {
    let Some(target) = choose_target(state) else {
        return HorizontalInput::None;
    };

    let dx = target.center_x() - state.player.center_x();
    let dead_zone = DEAD_ZONE * state.viewport.scale;
    if dx > dead_zone {
        HorizontalInput::Right
    } else if dx < -dead_zone {
        HorizontalInput::Left
    } else {
        HorizontalInput::None
    }
}
