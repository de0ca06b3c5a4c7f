//! Secret Jump - An endless vertical umbrella-hopping platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, generation, ranks)
//! - `game`: Host-facing command surface and frame clock
//! - `tuning`: Data-driven game balance
//! - `records`: Best-score records kept by the host
//! - `error`: Error types for the fallible edges (config, records)

pub mod error;
pub mod game;
pub mod records;
pub mod sim;
pub mod tuning;

pub use error::{RecordsError, TuningError};
pub use game::Game;
pub use records::PlayerRecords;
pub use tuning::Tuning;

/// Engine constants that are not balance knobs
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one reference frame per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frame rate the per-frame physics constants were authored at
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Largest frame delta accepted from the host (tab stalls, breakpoints)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Reference viewport all balance values are authored against
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 600.0;
    /// Smallest viewport accepted by `resize`
    pub const MIN_VIEWPORT_WIDTH: f32 = 160.0;
    pub const MIN_VIEWPORT_HEIGHT: f32 = 120.0;

    /// Points for each scoring departure
    pub const SCORE_PER_JUMP: u64 = 25;
}

/// Uniform scale factor for a viewport relative to the reference 800x600
#[inline]
pub fn scale_for_viewport(width: f32, height: f32) -> f32 {
    (width / consts::REFERENCE_WIDTH).min(height / consts::REFERENCE_HEIGHT)
}

/// Clamp viewport dimensions to the accepted minimum (non-finite counts as zero)
pub fn clamp_viewport(width: f32, height: f32) -> (f32, f32) {
    let sanitize = |v: f32, min: f32| if v.is_finite() { v.max(min) } else { min };
    (
        sanitize(width, consts::MIN_VIEWPORT_WIDTH),
        sanitize(height, consts::MIN_VIEWPORT_HEIGHT),
    )
}

/// Horizontal screen-wrap: leaving one edge fully re-enters from the other
#[inline]
pub fn wrap_horizontal(x: f32, object_width: f32, viewport_width: f32) -> f32 {
    if x + object_width < 0.0 {
        viewport_width
    } else if x > viewport_width {
        -object_width
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_for_reference_viewport() {
        assert!((scale_for_viewport(800.0, 600.0) - 1.0).abs() < 1e-6);
        // Limited by the tighter axis
        assert!((scale_for_viewport(1600.0, 600.0) - 1.0).abs() < 1e-6);
        assert!((scale_for_viewport(400.0, 600.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_viewport() {
        assert_eq!(clamp_viewport(0.0, -5.0), (160.0, 120.0));
        assert_eq!(clamp_viewport(f32::NAN, 700.0), (160.0, 700.0));
        assert_eq!(clamp_viewport(1024.0, 768.0), (1024.0, 768.0));
    }

    #[test]
    fn test_wrap_horizontal() {
        assert_eq!(wrap_horizontal(-61.0, 60.0, 800.0), 800.0);
        assert_eq!(wrap_horizontal(801.0, 60.0, 800.0), -60.0);
        assert_eq!(wrap_horizontal(-30.0, 60.0, 800.0), -30.0);
    }
}
