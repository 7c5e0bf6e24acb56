//! Outgoing notifications
//!
//! [`GameEvent`]s describe what happened in the simulation (actors coming
//! and going, damage taken). [`UiEvent`]s are what the overlay layer needs
//! to redraw. Both are queued during a frame and drained by the host.
//!
//! Queues are bounded by [`MAX_PENDING_EVENTS`]. A host that stops
//! draining loses the oldest entries, never memory.

use std::collections::VecDeque;

use glam::Vec3;
use tracing::warn;

use crate::game::actors::{ActorId, ActorKind};

/// Below this share of max health the health bar turns critical.
pub const CRITICAL_HEALTH_FRACTION: f32 = 0.3;

/// How long the red hit flash stays up, seconds.
pub const HIT_FLASH_DURATION: f32 = 0.2;

/// Status text color used while under attack.
pub const ALERT_COLOR: u32 = 0xff0000;

/// Default status text color.
pub const NORMAL_COLOR: u32 = 0xffffff;

/// Undrained events kept per queue before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 4096;

/// Bounded FIFO of undrained events.
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    pending: VecDeque<T>,
    capacity: usize,
    dropped: usize,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::with_capacity(MAX_PENDING_EVENTS)
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue holding at most `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Append, evicting the oldest event when full.
    pub fn push(&mut self, event: T) {
        if self.pending.len() >= self.capacity {
            self.pending.pop_front();
            if self.dropped == 0 {
                warn!(capacity = self.capacity, "event queue full, dropping oldest events");
            }
            self.dropped += 1;
        }
        self.pending.push_back(event);
    }

    /// Everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        self.dropped = 0;
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Events evicted since the last drain.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Simulation-level event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Spawned {
        id: ActorId,
        kind: ActorKind,
        position: Vec3,
    },
    Despawned {
        id: ActorId,
        kind: ActorKind,
    },
    /// The player lost health; `health` is the clamped value afterwards
    PlayerDamaged { amount: f32, health: f32 },
}

/// Overlay update.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Health bar change
    Health(HealthDisplay),
    /// Status line text and color; empty text hides it
    Status { text: String, color: u32 },
    /// Brief red overlay; a new flash restarts the timer
    HitFlash { duration: f32 },
    GameOver,
    LoadingComplete,
    Paused,
    Resumed,
}

/// Health bar payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthDisplay {
    /// Fill in percent of max health
    pub percent: f32,
    /// Whole number shown next to the bar (rounded up)
    pub value: u32,
    pub critical: bool,
}

impl HealthDisplay {
    pub fn new(health: f32, max_health: f32) -> Self {
        let fraction = if max_health > 0.0 {
            (health / max_health).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            percent: fraction * 100.0,
            value: health.max(0.0).ceil() as u32,
            critical: fraction < CRITICAL_HEALTH_FRACTION,
        }
    }
}
