//! Player vs umbrella collision and landing effects
//!
//! Umbrellas are tested as a half-disc canopy rather than a flat box: the
//! hit window rises toward the canopy centre, so landing on the rim needs a
//! lower approach than landing dead centre.

use super::state::{GameState, Platform, PlatformKind, Player};
use crate::consts::SCORE_PER_JUMP;

/// Result of a landing on one umbrella
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResult {
    /// Umbrella that was hit
    pub platform_id: u32,
    /// Whether the landing awarded points
    pub scored: bool,
}

/// Canopy radius for a platform width and width/radius ratio
#[inline]
pub fn canopy_radius(width: f32, ratio: f32) -> f32 {
    width / ratio
}

/// Check whether a descending player touches the canopy of `platform`
///
/// `rel_y` is the platform's canopy base in screen space. The horizontal
/// reach is the canopy radius plus a quarter of the player; the vertical
/// window follows the canopy profile `r * sqrt(1 - (dx / reach)^2)` with
/// `tolerance` slack on both ends.
pub fn canopy_contact(
    player: &Player,
    platform: &Platform,
    rel_y: f32,
    ratio: f32,
    tolerance: f32,
) -> bool {
    if player.vel.y <= 0.0 {
        return false;
    }

    let radius = canopy_radius(platform.width, ratio);
    let reach = radius + player.size / 4.0;
    let dx = (player.center_x() - platform.center_x()).abs();
    if dx >= reach {
        return false;
    }

    let t = dx / reach;
    let y_offset = radius * (1.0 - t * t).max(0.0).sqrt();
    let bottom = player.bottom();
    bottom >= rel_y - y_offset - tolerance && bottom <= rel_y + tolerance
}

/// First umbrella (in id order) inside the visible band that the player hits
pub fn find_contact(state: &GameState) -> Option<u32> {
    let scale = state.viewport.scale;
    let margin = state.tuning.visibility_margin * scale;
    let tolerance = state.tuning.collision_tolerance * scale;
    let ratio = state
        .difficulty
        .umbrella_ratio(state.tuning.umbrella_width_ratio);

    state
        .platforms
        .iter()
        .find(|platform| {
            let rel_y = state.camera.relative(platform.pos.y);
            rel_y >= -margin
                && rel_y <= state.viewport.height + margin
                && canopy_contact(&state.player, platform, rel_y, ratio, tolerance)
        })
        .map(|platform| platform.id)
}

/// Detect and apply at most one landing this tick
pub fn resolve(state: &mut GameState) -> Option<CollisionResult> {
    let id = find_contact(state)?;
    let platform = state.platform(id)?.clone();
    let scale = state.viewport.scale;

    // Bounce
    state.player.vel.y = -state.player.jump_impulse;
    state.player.grounded = true;

    // Traction
    if platform.slippery && state.difficulty.slippery.enabled {
        let slip = state.difficulty.slippery.slip_factor;
        state.player.vel.x *= slip;
        if state.player.vel.x.abs() < 0.1 {
            state.player.vel.x += state.player.input.axis() * state.tuning.slip_nudge * scale;
        }
        state.player.slip_factor = Some(slip);
    } else {
        state.player.slip_factor = None;
    }

    // Scoring: new umbrella and strictly higher than the last scored one
    let is_new = state.run.last_platform_id != Some(id);
    let is_higher = state.run.last_platform_y.is_none_or(|last| platform.pos.y < last);
    let scored = is_new && is_higher;
    if scored {
        state.run.score += SCORE_PER_JUMP;
        state.run.last_platform_id = Some(id);
        state.run.last_platform_y = Some(platform.pos.y);
        log::debug!(
            "Scored on platform {} at y={:.1}, score {}",
            id,
            platform.pos.y,
            state.run.score
        );
    }

    // Kind effects
    match platform.kind {
        PlatformKind::Breaking => {
            state.remove_platform(id);
            log::debug!("Platform {} broke", id);
        }
        PlatformKind::Temporary(_) => {
            if let Some(Platform {
                kind: PlatformKind::Temporary(temp),
                ..
            }) = state.platforms.iter_mut().find(|p| p.id == id)
            {
                if temp.fade_elapsed.is_none() {
                    temp.fade_elapsed = Some(0.0);
                }
            }
        }
        PlatformKind::Normal | PlatformKind::Moving { .. } => {}
    }

    Some(CollisionResult {
        platform_id: id,
        scored,
    })
}
