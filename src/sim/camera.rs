//! Dead-zone camera
//!
//! The camera only scrolls while the player is outside the band between the
//! upper and lower bounds. Camera and player screen-y always move by the same
//! delta, so the player's world height is unchanged by scrolling.

use super::state::GameState;
use crate::consts::REFERENCE_FPS;

/// Scroll toward the player; returns the world-space camera delta
pub fn update(state: &mut GameState, dt: f32) -> f32 {
    let frames = dt * REFERENCE_FPS;
    let tuning = &state.tuning;
    let scale = state.viewport.scale;
    let height = state.viewport.height;
    let player = &mut state.player;
    let camera = &mut state.camera;

    let upper = height * camera.upper_bound;
    let lower = height * camera.lower_bound;

    let delta = if player.pos.y < upper {
        let mut speed = camera.speed;
        if player.vel.y < -tuning.camera_fast_rise * scale {
            speed = (player.vel.y.abs() * tuning.camera_velocity_factor)
                .min(camera.speed * tuning.camera_max_multiplier);
        }
        if upper - player.pos.y > player.size {
            speed *= tuning.camera_overshoot_boost;
        }
        -speed * frames
    } else if player.pos.y > lower && !state.run.is_falling {
        let mut speed = camera.speed * tuning.camera_down_factor;
        if player.pos.y - lower > player.size {
            speed *= tuning.camera_overshoot_boost;
        }
        speed * frames
    } else {
        0.0
    };

    camera.y += delta;
    player.pos.y -= delta;
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::Tuning;

    fn test_state() -> GameState {
        GameState::new(1, Tuning::default(), 800.0, 600.0)
    }

    #[test]
    fn test_idle_inside_dead_zone() {
        let mut state = test_state();
        state.player.pos.y = 300.0;
        assert_eq!(update(&mut state, SIM_DT), 0.0);
        assert_eq!(state.camera.y, 0.0);
    }

    #[test]
    fn test_scrolls_up_above_upper_bound() {
        let mut state = test_state();
        state.player.pos.y = 140.0;
        state.player.vel.y = 0.0;
        let delta = update(&mut state, SIM_DT);
        assert!(delta < 0.0);
        assert!((delta + 3.0).abs() < 1e-3);
        assert!((state.player.pos.y - 143.0).abs() < 1e-3);
    }

    #[test]
    fn test_fast_rise_is_capped_and_boosted() {
        let mut state = test_state();
        state.player.pos.y = 0.0;
        state.player.vel.y = -30.0;
        let delta = update(&mut state, SIM_DT);
        // min(30 * 1.2, 3 * 4) * 1.5
        assert!((delta + 18.0).abs() < 1e-3);
    }

    #[test]
    fn test_world_height_preserved() {
        let mut state = test_state();
        state.player.pos.y = 50.0;
        state.player.vel.y = -12.0;
        let world_before = state.camera.y + state.player.pos.y;
        update(&mut state, SIM_DT);
        let world_after = state.camera.y + state.player.pos.y;
        assert!((world_before - world_after).abs() < 1e-3);
    }

    #[test]
    fn test_follows_down_unless_falling() {
        let mut state = test_state();
        state.player.pos.y = 500.0;
        let delta = update(&mut state, SIM_DT);
        assert!((delta - 2.4).abs() < 1e-3);

        state.player.pos.y = 500.0;
        state.run.is_falling = true;
        assert_eq!(update(&mut state, SIM_DT), 0.0);
    }
}
