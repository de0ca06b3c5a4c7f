//! Player integration: input, wind, gravity, wrap and fall tracking
//!
//! Velocities are per reference frame; `dt * REFERENCE_FPS` converts a tick
//! into reference frames so the feel is frame-rate independent.

use rand::Rng;

use super::state::{GameState, TerminalCause};
use crate::consts::REFERENCE_FPS;
use crate::wrap_horizontal;

/// Advance the wind timer, re-rolling the direction every `change_interval`
pub fn update_wind(state: &mut GameState, dt: f32) {
    let wind = &mut state.difficulty.wind;
    if !wind.enabled {
        return;
    }

    wind.change_timer += dt;
    if wind.change_timer >= wind.change_interval {
        wind.change_timer = 0.0;
        wind.direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        log::debug!("Wind direction now {}", wind.direction);
    }
}

/// Target horizontal velocity from held input plus wind
pub fn horizontal_target(state: &GameState) -> f32 {
    let scale = state.viewport.scale;
    let mut target = state.player.input.axis() * state.tuning.move_speed * scale;
    let wind = &state.difficulty.wind;
    if wind.enabled {
        target += wind.strength * scale * wind.direction;
    }
    target
}

/// Integrate the player one tick; returns `PlayerFell` when the fall is fatal
pub fn integrate(state: &mut GameState, dt: f32) -> Option<TerminalCause> {
    let frames = dt * REFERENCE_FPS;

    update_wind(state, dt);
    let target = horizontal_target(state);

    let player = &mut state.player;
    player.grounded = false;

    // Horizontal: direct control, or drift toward the target on slippery traction
    player.vel.x = match player.slip_factor {
        Some(slip) => {
            let keep = slip.clamp(0.0, 1.0).powf(frames);
            player.vel.x * keep + target * (1.0 - keep)
        }
        None => target,
    };

    // Vertical
    player.vel.y += player.gravity * frames;

    player.pos += player.vel * frames;
    player.pos.x = wrap_horizontal(player.pos.x, player.size, state.viewport.width);

    // Fall tracking
    let scale = state.viewport.scale;
    let run = &mut state.run;
    if player.vel.y > state.tuning.fall_threshold * scale {
        run.is_falling = true;
        run.fall_timer += dt;
    } else {
        run.is_falling = false;
        run.fall_timer = 0.0;
    }

    let below_view =
        player.pos.y > state.viewport.height + player.size * state.tuning.fall_margin;
    if run.is_falling && (below_view || run.fall_timer >= state.tuning.max_fall_duration) {
        log::info!(
            "Player fell (y={:.1}, fall {:.2}s)",
            player.pos.y,
            run.fall_timer
        );
        return Some(TerminalCause::PlayerFell);
    }

    None
}
