//! Game Session
//!
//! Level-wide state that every system consults: player health, the aggro
//! alarm, pause and game-over. All changes go through methods so the
//! rules hold everywhere:
//!
//! - health stays within `0..=max_health`
//! - game over happens once per level, when health first reaches zero
//! - aggro only ever goes from passive to alert within a level
//!
//! Every visible change is queued as a [`UiEvent`].

use tracing::{info, warn};

use crate::game::events::{
    ALERT_COLOR, EventQueue, GameEvent, HIT_FLASH_DURATION, HealthDisplay, NORMAL_COLOR, UiEvent,
};

/// Status line while the player is undetected.
pub const STATUS_HIDDEN: &str = "STATUS: HIDDEN";

/// Status line once aggro is raised.
pub const STATUS_UNDER_ATTACK: &str = "STATUS: UNDER ATTACK!";

#[derive(Debug)]
pub struct GameSession {
    health: f32,
    max_health: f32,
    aggro: bool,
    paused: bool,
    game_over: bool,
    ui: EventQueue<UiEvent>,
    events: EventQueue<GameEvent>,
}

impl GameSession {
    /// Full health, passive, and paused until the pointer is captured.
    pub fn new(max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            health: max_health,
            max_health,
            aggro: false,
            paused: true,
            game_over: false,
            ui: EventQueue::new(),
            events: EventQueue::new(),
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_aggro(&self) -> bool {
        self.aggro
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Apply damage to the player. Ignored once the game is over.
    ///
    /// Returns `true` when this hit ended the game.
    pub fn damage_player(&mut self, amount: f32) -> bool {
        if self.game_over {
            return false;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.events.push(GameEvent::PlayerDamaged {
            amount,
            health: self.health,
        });
        self.ui.push(UiEvent::Health(HealthDisplay::new(self.health, self.max_health)));
        self.ui.push(UiEvent::HitFlash {
            duration: HIT_FLASH_DURATION,
        });

        if self.health <= 0.0 {
            warn!("player health depleted, game over");
            self.game_over = true;
            self.paused = true;
            self.ui.push(UiEvent::GameOver);
            return true;
        }
        false
    }

    /// Raise the alarm. Returns `true` only on the passive → aggro edge.
    pub fn trigger_aggro(&mut self) -> bool {
        if self.aggro {
            return false;
        }
        info!("enemies alerted");
        self.aggro = true;
        self.ui.push(UiEvent::Status {
            text: STATUS_UNDER_ATTACK.to_string(),
            color: ALERT_COLOR,
        });
        true
    }

    /// Back to full health, passive, not game over. Pause is untouched.
    pub fn reset_for_level(&mut self) {
        self.health = self.max_health;
        self.aggro = false;
        self.game_over = false;
        self.ui.push(UiEvent::Health(HealthDisplay::new(self.health, self.max_health)));
        self.ui.push(UiEvent::Status {
            text: STATUS_HIDDEN.to_string(),
            color: NORMAL_COLOR,
        });
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.ui.push(UiEvent::Paused);
        }
    }

    /// Resume play. Refused while the game is over.
    pub fn resume(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if self.paused {
            self.paused = false;
            self.ui.push(UiEvent::Resumed);
        }
        true
    }

    pub(crate) fn push_ui(&mut self, event: UiEvent) {
        self.ui.push(event);
    }

    /// Take the overlay updates queued since the last drain.
    pub fn drain_ui(&mut self) -> Vec<UiEvent> {
        self.ui.drain()
    }

    /// Take the damage events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(max_health: f32) -> GameSession {
        let mut session = GameSession::new(max_health);
        session.resume();
        session.drain_ui();
        session
    }

    #[test]
    fn test_starts_paused_at_full_health() {
        let session = GameSession::new(100.0);
        assert!(session.is_paused());
        assert_eq!(session.health(), 100.0);
        assert!(!session.is_aggro());
    }

    #[test]
    fn test_damage_clamps_and_ends_game_once() {
        let mut session = running(100.0);
        session.damage_player(90.0);
        assert_eq!(session.health(), 10.0);

        assert!(session.damage_player(20.0));
        assert_eq!(session.health(), 0.0);
        assert!(session.is_game_over());
        assert!(session.is_paused());

        assert!(!session.damage_player(20.0));
        let game_overs = session
            .drain_ui()
            .iter()
            .filter(|e| **e == UiEvent::GameOver)
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_healing_never_exceeds_max() {
        let mut session = running(100.0);
        session.damage_player(-50.0);
        assert_eq!(session.health(), 100.0);
    }

    #[test]
    fn test_aggro_edge_reported_once() {
        let mut session = running(100.0);
        assert!(session.trigger_aggro());
        assert!(!session.trigger_aggro());
        assert!(session.is_aggro());
        assert_eq!(
            session.drain_ui(),
            vec![UiEvent::Status {
                text: STATUS_UNDER_ATTACK.to_string(),
                color: ALERT_COLOR
            }]
        );
    }

    #[test]
    fn test_reset_clears_aggro_and_game_over() {
        let mut session = running(50.0);
        session.trigger_aggro();
        session.damage_player(100.0);
        session.reset_for_level();
        assert!(!session.is_aggro());
        assert!(!session.is_game_over());
        assert_eq!(session.health(), 50.0);
        assert!(session.resume());
    }

    #[test]
    fn test_cannot_resume_while_game_over() {
        let mut session = running(10.0);
        session.damage_player(10.0);
        assert!(!session.resume());
        assert!(session.is_paused());
    }

    #[test]
    fn test_damage_queues_hit_flash() {
        let mut session = running(100.0);
        session.damage_player(10.0);
        let ui = session.drain_ui();
        assert!(ui.contains(&UiEvent::HitFlash {
            duration: HIT_FLASH_DURATION
        }));
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::PlayerDamaged {
                amount: 10.0,
                health: 90.0
            }]
        );
    }
}
