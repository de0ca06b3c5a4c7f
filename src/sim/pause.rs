//! Pause manager: freezes a run and restores it verbatim on resume

use glam::Vec2;

use super::difficulty::Rank;
use super::state::{GameEvent, GamePhase, GameState, Platform};

/// Value copy of the mutable run state taken at pause time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub score: u64,
    pub rank: Rank,
    pub player_pos: Vec2,
    pub player_vel: Vec2,
    pub camera_y: f32,
    pub platforms: Vec<Platform>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            score: state.run.score,
            rank: state.run.rank,
            player_pos: state.player.pos,
            player_vel: state.player.vel,
            camera_y: state.camera.y,
            platforms: state.platforms.clone(),
        }
    }

    pub fn restore(&self, state: &mut GameState) {
        state.run.score = self.score;
        state.run.rank = self.rank;
        state.player.pos = self.player_pos;
        state.player.vel = self.player_vel;
        state.camera.y = self.camera_y;
        state.platforms = self.platforms.clone();
    }
}

#[derive(Debug, Clone, Default)]
pub struct PauseManager {
    snapshot: Option<Snapshot>,
}

impl PauseManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Freeze a running game; returns whether the phase changed
    pub fn pause(&mut self, state: &mut GameState) -> bool {
        if state.phase != GamePhase::Running {
            return false;
        }

        self.snapshot = Some(Snapshot::capture(state));
        state.phase = GamePhase::Paused;
        state.push_event(GameEvent::GamePaused { is_paused: true });
        log::info!("Paused at score {}", state.run.score);
        true
    }

    /// Restore the snapshot and continue; returns whether the phase changed
    pub fn resume(&mut self, state: &mut GameState) -> bool {
        if state.phase != GamePhase::Paused {
            return false;
        }

        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore(state);
        }
        state.phase = GamePhase::Running;
        state.push_event(GameEvent::GamePaused { is_paused: false });
        log::info!("Resumed at score {}", state.run.score);
        true
    }

    pub fn toggle(&mut self, state: &mut GameState) -> bool {
        match state.phase {
            GamePhase::Running => self.pause(state),
            GamePhase::Paused => self.resume(state),
            GamePhase::Idle | GamePhase::GameOver => false,
        }
    }

    /// Re-capture while paused (after the host changes the frozen state)
    pub fn refresh(&mut self, state: &GameState) {
        if self.snapshot.is_some() {
            self.snapshot = Some(Snapshot::capture(state));
        }
    }

    /// Drop any snapshot (new run)
    pub fn clear(&mut self) {
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(8, Tuning::default(), 800.0, 600.0);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_pause_resume_restores_state() {
        let mut state = running_state();
        state.run.score = 300;
        let mut pause = PauseManager::new();
        let before = Snapshot::capture(&state);

        assert!(pause.pause(&mut state));
        assert_eq!(state.phase, GamePhase::Paused);

        // Anything that touches the frozen state is undone on resume
        state.player.pos.y += 100.0;
        state.camera.y -= 40.0;
        state.platforms.clear();

        assert!(pause.resume(&mut state));
        assert_eq!(Snapshot::capture(&state), before);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(
            state.events,
            vec![
                GameEvent::GamePaused { is_paused: true },
                GameEvent::GamePaused { is_paused: false }
            ]
        );
    }

    #[test]
    fn test_double_pause_is_noop() {
        let mut state = running_state();
        let mut pause = PauseManager::new();
        assert!(pause.pause(&mut state));
        assert!(!pause.pause(&mut state));
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn test_noop_after_game_over() {
        let mut state = running_state();
        state.phase = GamePhase::GameOver;
        let mut pause = PauseManager::new();
        assert!(!pause.pause(&mut state));
        assert!(!pause.resume(&mut state));
        assert!(!pause.toggle(&mut state));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut state = running_state();
        let mut pause = PauseManager::new();
        assert!(pause.toggle(&mut state));
        assert!(pause.is_paused());
        assert!(pause.toggle(&mut state));
        assert!(!pause.is_paused());
        assert_eq!(state.phase, GamePhase::Running);
    }
}
