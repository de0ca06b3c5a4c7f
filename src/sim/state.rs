//! Game state and core simulation types
//!
//! Coordinates: the player lives in screen space (y = 0 at the top of the
//! viewport), platforms and raindrops live in world space. A world position
//! maps to the screen as `world_y - camera.y`; the camera's y decreases as it
//! scrolls upward.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyParameters, Rank};
use crate::scale_for_viewport;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Layout built, waiting for `start()`
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Frozen by the pause manager
    Paused,
    /// Run ended
    GameOver,
}

/// Held horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalInput {
    Left,
    Right,
    #[default]
    None,
}

impl HorizontalInput {
    /// -1, 0 or +1
    #[inline]
    pub fn axis(self) -> f32 {
        match self {
            HorizontalInput::Left => -1.0,
            HorizontalInput::Right => 1.0,
            HorizontalInput::None => 0.0,
        }
    }
}

/// Events queued for the host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    GameStarted,
    GamePaused { is_paused: bool },
    RankChange { rank: Rank },
    LevelChange { rank: Rank },
    GameOver { score: u64, rank: Rank },
}

/// What ended a run (logged, never surfaced as an event)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCause {
    PlayerFell,
    HazardHit,
}

/// The jumping player (screen-space position, top-left corner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Edge length of the square hit box
    pub size: f32,
    /// Downward acceleration per reference frame (scaled)
    pub gravity: f32,
    /// Upward speed of a bounce (scaled)
    pub jump_impulse: f32,
    /// Set on the tick the player lands on an umbrella
    pub grounded: bool,
    pub input: HorizontalInput,
    /// Traction carried from a slippery landing until the next plain one
    pub slip_factor: Option<f32>,
}

impl Player {
    pub fn new(tuning: &Tuning, scale: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: tuning.player_size * scale,
            gravity: tuning.gravity * scale,
            jump_impulse: tuning.jump_impulse * scale,
            grounded: false,
            input: HorizontalInput::None,
            slip_factor: None,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size
    }
}

/// Lifecycle of a temporary umbrella
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporaryState {
    /// Seconds since creation
    pub age: f32,
    /// Seconds until the fade starts on its own
    pub lifetime: f32,
    /// Seconds spent fading; `None` until landed on or expired
    pub fade_elapsed: Option<f32>,
}

/// Platform behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    /// Removed on the first bounce
    Breaking,
    /// Fades out shortly after landing or when its lifetime runs out
    Temporary(TemporaryState),
    /// Patrols horizontally, bouncing off the viewport edges
    Moving { direction: f32, speed: f32 },
}

/// Sinusoidal sway of a swinging umbrella
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Swing {
    /// Seconds of accumulated swing time
    pub phase: f32,
    /// Current horizontal offset of the canopy
    pub offset: f32,
}

/// An umbrella platform (world-space position; `pos.y` is the canopy base)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
    pub swing: Option<Swing>,
    pub slippery: bool,
}

impl Platform {
    pub fn new(id: u32, pos: Vec2, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            id,
            pos,
            width,
            height,
            kind,
            swing: None,
            slippery: false,
        }
    }

    #[inline]
    pub fn swing_offset(&self) -> f32 {
        self.swing.map_or(0.0, |s| s.offset)
    }

    /// Canopy centre including any swing offset
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.swing_offset() + self.width / 2.0
    }

    pub fn is_fading(&self) -> bool {
        matches!(
            self.kind,
            PlatformKind::Temporary(TemporaryState {
                fade_elapsed: Some(_),
                ..
            })
        )
    }
}

/// A static raindrop hazard (world space, centre position)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raindrop {
    pub pos: Vec2,
    pub size: f32,
}

/// Vertical scroll state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World y of the viewport's top edge
    pub y: f32,
    /// Base follow speed per reference frame (scaled)
    pub speed: f32,
    /// Dead-zone bounds as fractions of the viewport height
    pub upper_bound: f32,
    pub lower_bound: f32,
}

impl Camera {
    pub fn new(tuning: &Tuning, scale: f32) -> Self {
        Self {
            y: 0.0,
            speed: tuning.camera_speed * scale,
            upper_bound: tuning.camera_upper_bound,
            lower_bound: tuning.camera_lower_bound,
        }
    }

    /// World y to screen y
    #[inline]
    pub fn relative(&self, world_y: f32) -> f32 {
        world_y - self.y
    }
}

/// Host viewport and the derived uniform scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scale: scale_for_viewport(width, height),
        }
    }
}

/// Per-run bookkeeping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunState {
    /// Monotone within a run
    pub score: u64,
    pub rank: Rank,
    /// Last umbrella that awarded points
    pub last_platform_id: Option<u32>,
    /// World y of the last scoring umbrella
    pub last_platform_y: Option<f32>,
    pub is_falling: bool,
    /// Seconds of continuous falling
    pub fall_timer: f32,
}

/// Complete simulation state (deterministic per seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub player: Player,
    /// Live umbrellas (sorted by id)
    pub platforms: Vec<Platform>,
    pub raindrops: Vec<Raindrop>,
    pub camera: Camera,
    pub run: RunState,
    pub difficulty: DifficultyParameters,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending host events
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a state for the given viewport (already clamped)
    pub fn new(seed: u64, tuning: Tuning, width: f32, height: f32) -> Self {
        let viewport = Viewport::new(width, height);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning, viewport.scale),
            camera: Camera::new(&tuning, viewport.scale),
            tuning,
            viewport,
            phase: GamePhase::Idle,
            platforms: Vec::new(),
            raindrops: Vec::new(),
            run: RunState::default(),
            difficulty: DifficultyParameters::default(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset_run();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reinitialize every per-run value and rebuild the opening layout
    ///
    /// The RNG keeps its stream so consecutive runs differ.
    pub fn reset_run(&mut self) {
        let scale = self.viewport.scale;
        self.player = Player::new(&self.tuning, scale);
        self.player.pos = Vec2::new(
            self.viewport.width / 2.0 - self.player.size / 2.0,
            self.viewport.height / 2.0 - self.player.size * 3.0,
        );
        self.player.vel = Vec2::new(0.0, -5.0 * scale);

        self.camera = Camera::new(&self.tuning, scale);
        self.run = RunState::default();
        self.difficulty = DifficultyParameters::default();
        self.platforms.clear();
        self.raindrops.clear();
        self.time_ticks = 0;
        self.phase = GamePhase::Idle;

        super::generator::spawn_initial_layout(self);
    }

    /// Give the player the launch impulse
    pub fn launch(&mut self) {
        self.player.vel.y = -self.tuning.start_impulse * self.viewport.scale;
    }

    /// Queue an event for the host
    pub fn push_event(&mut self, event: GameEvent) {
        log::debug!("Event: {:?}", event);
        self.events.push(event);
    }

    pub fn platform(&self, id: u32) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    /// Remove a platform, clearing the scoring marker if it pointed at it
    pub fn remove_platform(&mut self, id: u32) {
        self.platforms.retain(|p| p.id != id);
        if self.run.last_platform_id == Some(id) {
            self.run.last_platform_id = None;
        }
    }

    /// Whether every tracked quantity is finite
    pub fn is_finite(&self) -> bool {
        let player = &self.player;
        player.pos.is_finite()
            && player.vel.is_finite()
            && player.size.is_finite()
            && self.camera.y.is_finite()
            && self.run.fall_timer.is_finite()
            && self.platforms.iter().all(|p| {
                p.pos.is_finite() && p.width.is_finite() && p.swing_offset().is_finite()
            })
            && self.raindrops.iter().all(|d| d.pos.is_finite() && d.size.is_finite())
    }
}
