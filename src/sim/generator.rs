//! Platform registry: spawning, retiring and animating umbrellas
//!
//! All randomness comes from the run RNG in `GameState`, so the same seed
//! always yields the same tower.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Platform, PlatformKind, Swing, TemporaryState};
use crate::consts::REFERENCE_FPS;

/// Fade progress treated as complete (absorbs float drift in the accumulator)
const FADE_EPSILON: f32 = 1e-4;

/// Build the opening layout: one wide umbrella under the spawn point and a
/// ladder of levels above the screen centre
pub fn spawn_initial_layout(state: &mut GameState) {
    let scale = state.viewport.scale;
    let width = (state.tuning.platform_max_width * scale).min(state.viewport.width);
    let start = Platform::new(
        state.next_entity_id(),
        Vec2::new(
            state.viewport.width / 2.0 - width / 2.0,
            state.viewport.height / 2.0 + state.player.size * 2.0,
        ),
        width,
        state.tuning.platform_height * scale,
        PlatformKind::Normal,
    );
    state.platforms.push(start);

    let step = state.tuning.initial_step_y * scale;
    let first = state.viewport.height / 2.0 - step;
    for level in 0..state.tuning.initial_levels {
        spawn_level(state, first - step * level as f32, 2);
    }

    log::debug!("Initial layout: {} platforms", state.platforms.len());
}

/// Per-tick registry maintenance: retire, top up, then animate
pub fn update(state: &mut GameState, dt: f32) {
    retire_platforms(state);
    generate_platforms(state);
    update_moving(state, dt);
    update_swinging(state, dt);
    update_temporary(state, dt);
}

/// Drop platforms that scrolled far below the camera
pub fn retire_platforms(state: &mut GameState) {
    let limit = state.camera.y + state.viewport.height * state.tuning.retire_screens;
    let retired: Vec<u32> = state
        .platforms
        .iter()
        .filter(|p| p.pos.y > limit)
        .map(|p| p.id)
        .collect();
    if retired.is_empty() {
        return;
    }

    for &id in &retired {
        state.remove_platform(id);
    }
    log::debug!("Retired {} platforms below y={:.1}", retired.len(), limit);
}

/// World y of the highest live platform
fn highest_platform(state: &GameState) -> Option<f32> {
    state
        .platforms
        .iter()
        .map(|p| p.pos.y)
        .min_by(|a, b| a.total_cmp(b))
}

/// Keep the registry populated up to `reach_screens` above the visible top
pub fn generate_platforms(state: &mut GameState) {
    let height = state.viewport.height;
    let reach = state.camera.y - height - height * state.tuning.reach_screens;
    let step = state.tuning.step_y
        * state.viewport.scale
        * (1.0 - state.tuning.step_shrink_per_rank * state.run.rank.index() as f32).max(0.1);

    let mut highest = highest_platform(state).unwrap_or(state.camera.y + height);
    while state.platforms.len() < state.tuning.max_platforms && highest > reach {
        let max_count = state.tuning.max_platforms_per_level;
        spawn_level(state, highest - step, max_count);

        let Some(next) = highest_platform(state) else {
            break;
        };
        if next >= highest {
            // Jitter swallowed the step; stop rather than spin
            break;
        }
        highest = next;
    }
}

/// Spawn 1..=`max_count` platforms around `base_y`
///
/// The first platform is always placed. Each sibling re-rolls its x up to
/// `placement_attempts` times to keep `min_horizontal_gap`, then is rejected.
pub fn spawn_level(state: &mut GameState, base_y: f32, max_count: u32) {
    let scale = state.viewport.scale;
    let viewport_width = state.viewport.width;
    let gap = state.tuning.min_horizontal_gap * scale;
    let jitter = state.tuning.step_jitter * scale;
    let count = state.rng.random_range(1..=max_count.max(1));

    let mut placed: Vec<(f32, f32)> = Vec::with_capacity(count as usize);
    for i in 0..count {
        if state.platforms.len() >= state.tuning.max_platforms {
            break;
        }

        let attempts = if i == 0 {
            1
        } else {
            state.tuning.placement_attempts.max(1)
        };
        let mut slot = None;
        for _ in 0..attempts {
            let (x, width) = roll_span(state, viewport_width);
            if i == 0 || keeps_gap(&placed, x, width, gap) {
                slot = Some((x, width));
                break;
            }
        }
        let Some((x, width)) = slot else {
            log::debug!("Rejected sibling {} at y={:.1}: no gap", i, base_y);
            continue;
        };
        placed.push((x, width));

        let y = if jitter > 0.0 {
            base_y + state.rng.random_range(-jitter..=jitter)
        } else {
            base_y
        };
        let kind = roll_kind(state);
        let id = state.next_entity_id();
        let mut platform = Platform::new(
            id,
            Vec2::new(x, y),
            width,
            state.tuning.platform_height * scale,
            kind,
        );

        if state.difficulty.swing.enabled
            && state.rng.random_bool(f64::from(state.tuning.swinging_chance))
        {
            platform.swing = Some(Swing {
                phase: state.rng.random_range(0.0..std::f32::consts::TAU),
                offset: 0.0,
            });
        }
        if state.difficulty.slippery.enabled
            && state.rng.random_bool(f64::from(state.tuning.slippery_chance))
        {
            platform.slippery = true;
        }

        state.platforms.push(platform);
    }
}

/// Random width and x, clamped so the platform fits the viewport
fn roll_span(state: &mut GameState, viewport_width: f32) -> (f32, f32) {
    let scale = state.viewport.scale;
    let min = state.tuning.platform_min_width * scale;
    let max = state.tuning.platform_max_width * scale;
    let width = state.rng.random_range(min..=max).min(viewport_width);
    let room = viewport_width - width;
    let x = if room > 0.0 {
        state.rng.random_range(0.0..=room)
    } else {
        0.0
    };
    (x, width)
}

/// Whether `[x, x + width]` keeps `gap` clearance from every placed span
fn keeps_gap(placed: &[(f32, f32)], x: f32, width: f32, gap: f32) -> bool {
    placed
        .iter()
        .all(|&(px, pw)| x + width + gap <= px || px + pw + gap <= x)
}

/// Cumulative sampling: breaking, temporary, moving, otherwise normal
fn roll_kind(state: &mut GameState) -> PlatformKind {
    let params = &state.difficulty;
    let broken = params.broken_chance;
    let temporary = broken + params.temporary_chance;
    let moving = temporary
        + state.tuning.moving_base_chance
        + state.tuning.moving_chance_per_level * state.run.rank.level() as f32;
    let speed_mult = params.moving_speed_multiplier;

    let roll: f32 = state.rng.random();
    if roll < broken {
        PlatformKind::Breaking
    } else if roll < temporary {
        let (min, max) = (
            state.tuning.temporary_min_lifetime,
            state.tuning.temporary_max_lifetime,
        );
        PlatformKind::Temporary(TemporaryState {
            age: 0.0,
            lifetime: state.rng.random_range(min..=max),
            fade_elapsed: None,
        })
    } else if roll < moving {
        let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let speed = (state.rng.random::<f32>() * 2.0 + 1.0) * state.viewport.scale * speed_mult;
        PlatformKind::Moving { direction, speed }
    } else {
        PlatformKind::Normal
    }
}

/// Patrol moving platforms, bouncing off the viewport edges
pub fn update_moving(state: &mut GameState, dt: f32) {
    let frames = dt * REFERENCE_FPS;
    let viewport_width = state.viewport.width;
    for platform in &mut state.platforms {
        if let PlatformKind::Moving { direction, speed } = &mut platform.kind {
            platform.pos.x += *direction * *speed * frames;
            if platform.pos.x <= 0.0 {
                platform.pos.x = 0.0;
                *direction = 1.0;
            } else if platform.pos.x + platform.width >= viewport_width {
                platform.pos.x = (viewport_width - platform.width).max(0.0);
                *direction = -1.0;
            }
        }
    }
}

/// Advance swing phases and recompute offsets
pub fn update_swinging(state: &mut GameState, dt: f32) {
    let amplitude = state.difficulty.swing.amplitude * state.viewport.scale;
    let frequency = state.difficulty.swing.frequency;
    for swing in state.platforms.iter_mut().filter_map(|p| p.swing.as_mut()) {
        swing.phase += dt;
        swing.offset = (swing.phase * frequency).sin() * amplitude;
    }
}

/// Age temporary platforms, start fades, and remove finished ones
pub fn update_temporary(state: &mut GameState, dt: f32) {
    let fade_duration = state.tuning.temporary_fade_duration;
    let mut expired = Vec::new();

    for platform in &mut state.platforms {
        let PlatformKind::Temporary(temp) = &mut platform.kind else {
            continue;
        };
        temp.age += dt;
        match temp.fade_elapsed.as_mut() {
            Some(elapsed) => {
                *elapsed += dt;
                if *elapsed + FADE_EPSILON >= fade_duration {
                    expired.push(platform.id);
                }
            }
            None if temp.age >= temp.lifetime => {
                temp.fade_elapsed = Some(0.0);
            }
            None => {}
        }
    }

    for id in expired {
        log::debug!("Temporary platform {} faded out", id);
        state.remove_platform(id);
    }
}
