//! Raindrop hazards
//!
//! Drops are static in world space. They spawn just above the camera, are
//! recycled once they leave the visible band, and end the run on contact.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Player, Raindrop, TerminalCause};

/// Spawn a drop just above the current camera top
fn spawn_drop(state: &mut GameState) -> Raindrop {
    let scale = state.viewport.scale;
    let x = state.rng.random_range(0.0..state.viewport.width);
    let y = state.camera.y - state.rng.random_range(0.0..state.tuning.hazard_margin) * scale;
    let size = state
        .rng
        .random_range(state.tuning.hazard_min_size..=state.tuning.hazard_max_size)
        * scale;
    Raindrop {
        pos: Vec2::new(x, y),
        size,
    }
}

/// Box overlap between a drop (screen space y) and the player
pub fn drop_hits_player(drop: &Raindrop, rel_y: f32, player: &Player) -> bool {
    drop.pos.x + drop.size > player.pos.x
        && drop.pos.x - drop.size < player.pos.x + player.size
        && rel_y + drop.size > player.pos.y
        && rel_y - drop.size < player.pos.y + player.size
}

/// Top up, recycle and test drops; returns `HazardHit` on contact
pub fn update(state: &mut GameState) -> Option<TerminalCause> {
    let target = state.difficulty.hazard_target();
    if target == 0 {
        state.raindrops.clear();
        return None;
    }

    while state.raindrops.len() < target {
        let drop = spawn_drop(state);
        state.raindrops.push(drop);
    }

    let margin = state.tuning.hazard_margin * state.viewport.scale;
    let height = state.viewport.height;
    for i in 0..state.raindrops.len() {
        let rel_y = state.camera.relative(state.raindrops[i].pos.y);
        if rel_y < -margin || rel_y > height + margin {
            let drop = spawn_drop(state);
            state.raindrops[i] = drop;
            continue;
        }
        if drop_hits_player(&state.raindrops[i], rel_y, &state.player) {
            log::info!(
                "Hazard hit at ({:.1}, {:.1})",
                state.raindrops[i].pos.x,
                rel_y
            );
            return Some(TerminalCause::HazardHit);
        }
    }

    None
}
