//! Host-facing game instance
//!
//! Owns the simulation state, the pause manager and the frame clock. The host
//! calls `frame(now_ms)` once per display frame and drains events afterwards;
//! every other interaction goes through the command methods.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{
    Camera, DifficultyParameters, GameEvent, GamePhase, GameState, HorizontalInput, PauseManager,
    Platform, PlatformKind, Player, Raindrop, Rank, TickInput, Viewport, tick,
};
use crate::tuning::Tuning;
use crate::{clamp_viewport, wrap_horizontal};

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    pause: PauseManager,
    input: TickInput,
    accumulator: f32,
    /// Timestamp of the previous frame; `None` until the clock is synced
    last_time: Option<f64>,
}

impl Game {
    /// Create an idle game with default tuning
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self::with_tuning(seed, Tuning::default(), width, height)
    }

    /// Create an idle game with custom tuning
    ///
    /// Tuning that fails validation is replaced by the defaults so the
    /// simulation never runs with values it cannot handle.
    pub fn with_tuning(seed: u64, tuning: Tuning, width: f32, height: f32) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(err) => {
                log::warn!("Invalid tuning ({}), falling back to defaults", err);
                Tuning::default()
            }
        };
        let (width, height) = checked_viewport(width, height);
        log::info!(
            "New game: seed {}, viewport {}x{}",
            seed,
            width,
            height
        );
        Self {
            state: GameState::new(seed, tuning, width, height),
            pause: PauseManager::new(),
            input: TickInput::default(),
            accumulator: 0.0,
            last_time: None,
        }
    }

    // === Commands ===

    /// Start a fresh run, or continue a paused one
    pub fn start(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.resume();
            self.state.push_event(GameEvent::GameStarted);
            return;
        }

        self.reset();
        self.state.launch();
        self.state.phase = GamePhase::Running;
        self.state.push_event(GameEvent::GameStarted);
        log::info!("Run started");
    }

    /// Rebuild the run and return to idle
    pub fn reset(&mut self) {
        self.pause.clear();
        self.state.reset_run();
        self.input.horizontal = HorizontalInput::None;
        self.sync_clock();
        log::info!("Game reset");
    }

    pub fn pause(&mut self) {
        self.pause.pause(&mut self.state);
    }

    pub fn resume(&mut self) {
        if self.pause.resume(&mut self.state) {
            self.sync_clock();
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.pause.toggle(&mut self.state) && self.state.phase == GamePhase::Running {
            self.sync_clock();
        }
    }

    pub fn set_horizontal_input(&mut self, input: HorizontalInput) {
        self.input.horizontal = input;
        self.state.player.input = input;
    }

    /// Let the built-in autopilot steer (demo/attract mode)
    pub fn set_idle_mode(&mut self, enabled: bool) {
        self.input.idle_mode = enabled;
    }

    /// Rescale every size-dependent value to a new viewport
    ///
    /// All lengths and speeds are multiplied by the ratio of the new to the old
    /// uniform scale, so the layout keeps its proportions.
    pub fn resize(&mut self, width: f32, height: f32) {
        let (width, height) = checked_viewport(width, height);
        let old_scale = self.state.viewport.scale;
        let viewport = Viewport::new(width, height);
        let k = viewport.scale / old_scale;
        let state = &mut self.state;
        state.viewport = viewport;

        // Player
        let player = &mut state.player;
        player.pos *= k;
        player.vel *= k;
        player.size *= k;
        player.gravity = state.tuning.gravity * viewport.scale;
        player.jump_impulse = state.tuning.jump_impulse * viewport.scale;
        player.pos.x = wrap_horizontal(player.pos.x, player.size, width);

        // Camera and scoring marker
        state.camera.y *= k;
        state.camera.speed = state.tuning.camera_speed * viewport.scale;
        state.run.last_platform_y = state.run.last_platform_y.map(|y| y * k);

        // Platforms
        for platform in &mut state.platforms {
            rescale_platform(platform, k, width);
        }

        // Hazards
        for drop in &mut state.raindrops {
            drop.pos *= k;
            drop.size *= k;
        }

        // A paused run must resume into the rescaled layout
        self.pause.refresh(&self.state);

        log::info!(
            "Resized to {}x{} (scale {:.3}, x{:.3})",
            width,
            height,
            viewport.scale,
            k
        );
    }

    // === Clock ===

    /// Advance by the wall-clock time since the previous frame
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);
        self.advance(dt)
    }

    /// Run fixed ticks for `dt` seconds of frame time; returns ticks run
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.state.phase != GamePhase::Running {
            return 0;
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            if self.state.phase != GamePhase::Running {
                self.accumulator = 0.0;
                break;
            }
        }
        substeps
    }

    /// Drop the frame baseline so the next frame counts as a fresh start
    fn sync_clock(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }

    // === Events ===

    /// Take every queued event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Take every queued event as a JSON array
    pub fn drain_events_json(&mut self) -> serde_json::Result<String> {
        serde_json::to_string(&self.drain_events())
    }

    // === Read access ===

    pub fn score(&self) -> u64 {
        self.state.run.score
    }

    pub fn rank(&self) -> Rank {
        self.state.run.rank
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.state.platforms
    }

    pub fn raindrops(&self) -> &[Raindrop] {
        &self.state.raindrops
    }

    pub fn camera(&self) -> &Camera {
        &self.state.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn difficulty(&self) -> &DifficultyParameters {
        &self.state.difficulty
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
}

/// Clamp host dimensions, warning when they had to change
fn checked_viewport(width: f32, height: f32) -> (f32, f32) {
    let clamped = clamp_viewport(width, height);
    if clamped != (width, height) {
        log::warn!(
            "Viewport {}x{} clamped to {}x{}",
            width,
            height,
            clamped.0,
            clamped.1
        );
    }
    clamped
}

/// Scale one platform by `k` and pull it back inside the viewport
fn rescale_platform(platform: &mut Platform, k: f32, viewport_width: f32) {
    platform.pos *= k;
    platform.width = (platform.width * k).min(viewport_width);
    platform.height *= k;
    if let PlatformKind::Moving { speed, .. } = &mut platform.kind {
        *speed *= k;
    }
    if let Some(swing) = platform.swing.as_mut() {
        swing.offset *= k;
    }
    platform.pos.x = platform
        .pos
        .x
        .clamp(0.0, (viewport_width - platform.width).max(0.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Snapshot;

    fn running_game() -> Game {
        let mut game = Game::new(21, 800.0, 600.0);
        game.start();
        game.drain_events();
        game
    }

    #[test]
    fn test_new_game_is_idle() {
        let game = Game::new(1, 800.0, 600.0);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.rank(), Rank::Sybil);
    }

    #[test]
    fn test_start_emits_event_and_launches() {
        let mut game = Game::new(1, 800.0, 600.0);
        game.start();
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.player().vel.y < 0.0);
        assert_eq!(game.drain_events(), vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_idle_frames_do_nothing() {
        let mut game = Game::new(1, 800.0, 600.0);
        assert_eq!(game.frame(0.0), 0);
        assert_eq!(game.frame(16.0), 0);
    }

    #[test]
    fn test_frame_runs_fixed_ticks() {
        let mut game = running_game();
        // First frame has no baseline and runs one tick
        assert_eq!(game.frame(1000.0), 1);
        // A long stall is clamped to two ticks
        assert_eq!(game.frame(6000.0), 2);
        assert_eq!(game.state().time_ticks, 3);
    }

    #[test]
    fn test_pause_then_resume_is_identity() {
        let mut game = running_game();
        for _ in 0..30 {
            game.advance(SIM_DT);
        }
        let before_run = game.state().run.clone();
        let before = Snapshot::capture(game.state());

        game.pause();
        assert!(game.is_paused());
        assert_eq!(game.advance(SIM_DT), 0);
        game.resume();

        assert_eq!(game.state().run, before_run);
        assert_eq!(Snapshot::capture(game.state()), before);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::GamePaused { is_paused: true },
                GameEvent::GamePaused { is_paused: false }
            ]
        );
    }

    #[test]
    fn test_toggle_pause_round_trip() {
        let mut game = running_game();
        game.toggle_pause();
        assert!(game.is_paused());
        game.toggle_pause();
        assert!(!game.is_paused());
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.advance(SIM_DT), 1);
    }

    #[test]
    fn test_start_while_paused_resumes() {
        let mut game = running_game();
        game.advance(SIM_DT);
        let score = game.score();
        game.pause();
        game.start();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), score);
        assert!(game.drain_events().contains(&GameEvent::GameStarted));
    }

    #[test]
    fn test_pause_ignored_after_game_over() {
        let mut game = running_game();
        game.state.phase = GamePhase::GameOver;
        game.pause();
        game.toggle_pause();
        game.resume();
        assert!(game.is_game_over());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut game = running_game();
        for _ in 0..20 {
            game.advance(SIM_DT);
        }
        game.reset();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.score(), 0);
        assert_eq!(game.camera().y, 0.0);
    }

    #[test]
    fn test_resize_preserves_relative_layout() {
        let mut game = running_game();
        for _ in 0..10 {
            game.advance(SIM_DT);
        }
        let ratio_before = game.player().size / game.viewport().width;
        let platform_ratio_before = game.platforms()[0].width / game.player().size;

        game.resize(1200.0, 900.0);

        let ratio_after = game.player().size / game.viewport().width;
        let platform_ratio_after = game.platforms()[0].width / game.player().size;
        assert!((ratio_before - ratio_after).abs() < 1e-5);
        assert!((platform_ratio_before - platform_ratio_after).abs() < 1e-4);
        for p in game.platforms() {
            assert!(p.pos.x >= 0.0 && p.pos.x + p.width <= 1200.0 + 1e-3);
        }
    }

    #[test]
    fn test_resize_height_limited_keeps_scale() {
        let mut game = running_game();
        let size = game.player().size;
        let height_ratio = size / game.viewport().height;

        // Only the width grows, so the height still sets the scale
        game.resize(1600.0, 600.0);

        assert_eq!(game.viewport().scale, 1.0);
        assert!((game.player().size - size).abs() < 1e-6);
        assert!((game.player().size / game.viewport().height - height_ratio).abs() < 1e-6);
        assert!((game.player().size / game.viewport().width - 0.0375).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let tuning = Tuning {
            swinging_chance: 1.5,
            platform_min_width: 300.0,
            platform_max_width: 100.0,
            hazard_margin: 0.0,
            ..Default::default()
        };
        let mut game = Game::with_tuning(9, tuning, 800.0, 600.0);
        assert_eq!(game.state().tuning, Tuning::default());

        game.start();
        game.state.difficulty = DifficultyParameters::for_rank(Rank::Monster);
        for _ in 0..120 {
            game.advance(SIM_DT);
        }
        assert!(game.state().is_finite());
    }

    #[test]
    fn test_resize_clamps_bad_dimensions() {
        let mut game = Game::new(1, 800.0, 600.0);
        game.resize(-10.0, f32::NAN);
        let viewport = game.viewport();
        assert_eq!((viewport.width, viewport.height), (160.0, 120.0));
        assert!(game.state().is_finite());
    }

    #[test]
    fn test_resize_while_paused_survives_resume() {
        let mut game = running_game();
        game.pause();
        game.resize(400.0, 300.0);
        let size = game.player().size;
        game.resume();
        assert!((game.player().size - size).abs() < 1e-6);
        assert!((game.player().pos.x + size / 2.0 - 200.0).abs() < 1.0);
    }

    #[test]
    fn test_events_drain_as_json() {
        let mut game = Game::new(1, 800.0, 600.0);
        game.start();
        let json = game.drain_events_json().unwrap();
        assert_eq!(json, r#"[{"type":"GameStarted"}]"#);
        assert_eq!(game.drain_events_json().unwrap(), "[]");
    }

    #[test]
    fn test_demo_run_eventually_ends_or_scores() {
        let mut game = Game::new(5, 800.0, 600.0);
        game.set_idle_mode(true);
        game.start();
        for _ in 0..(60 * 60) {
            game.advance(SIM_DT);
            if game.is_game_over() {
                break;
            }
        }
        assert!(game.state().is_finite());
        if game.is_game_over() {
            let events = game.drain_events();
            let over = events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
            assert_eq!(over, 1);
        }
    }
}
