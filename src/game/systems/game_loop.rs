//! Game Loop Driver
//!
//! Owns the whole simulation and advances it one host frame at a time.
//! Every frame runs the same fixed pipeline:
//!
//! 1. animation clocks
//! 2. player physics (with the fall-out safety net)
//! 3. weapon rig recoil
//! 4. mob AI, then the shots it requested
//! 5. bullet resolution
//! 6. particle decay
//!
//! Each phase is the only writer of the actor registry while it runs.
//! While paused (pointer not captured, or game over) a frame does nothing
//! and time does not accumulate: resuming restarts the delta clock.
//!
//! Hosts drain [`GameLoop::drain_ui`] and [`GameLoop::drain_events`] once
//! per frame. Undrained queues are capped and drop their oldest entries.

use glam::{Mat4, Vec3};
use tracing::{debug, info};

use crate::game::actors::{ActorRegistry, ActorView};
use crate::game::animation::{AnimatedActor, ClipSet};
use crate::game::config::{AssetCatalog, GameSettings};
use crate::game::events::{GameEvent, UiEvent};
use crate::game::rng::{GameRng, seeded};
use crate::game::routes::{RouteLine, RouteTable};
use crate::game::session::GameSession;
use crate::game::spawn::populate_level;
use crate::game::world::{StaticWorld, WorldData};
use crate::input::{InputEvent, MovementKeys};
use crate::physics::{ColliderSet, SlabRaycaster, SpatialQuery};
use crate::player::{PlayerController, WeaponRig};

use super::combat::{BulletOutcome, CombatSystem};
use super::mob_ai::MobAiSystem;

/// What the renderer needs after a frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Camera local-to-world transform
    pub camera: Mat4,
    /// Weapon rig local-to-world transform
    pub weapon: Mat4,
    pub actors: Vec<ActorView>,
    /// Route overlay, empty unless debug mode is on
    pub route_lines: Vec<RouteLine>,
    pub health: f32,
    pub aggro: bool,
    pub paused: bool,
    pub game_over: bool,
}

/// The simulation core.
pub struct GameLoop<Q: SpatialQuery = SlabRaycaster> {
    settings: GameSettings,
    catalog: AssetCatalog,
    session: GameSession,
    player: PlayerController,
    weapon: WeaponRig,
    hands: Option<ClipSet>,
    registry: ActorRegistry,
    routes: RouteTable,
    colliders: ColliderSet,
    query: Q,
    mob_ai: MobAiSystem,
    combat: CombatSystem,
    rng: GameRng,
    /// Host time of the last simulated frame (seconds)
    prev_time: f64,
    debug_overlay: bool,
}

impl GameLoop<SlabRaycaster> {
    /// Build a game over box colliders and start the first level.
    pub fn new(settings: GameSettings, world: Option<&WorldData>, catalog: AssetCatalog) -> Self {
        Self::with_query(settings, world, catalog, SlabRaycaster)
    }
}

impl<Q: SpatialQuery> GameLoop<Q> {
    /// Build a game with a custom spatial query service.
    ///
    /// World geometry is split into colliders and routes once, here. The
    /// session starts paused; the host resumes it on pointer capture.
    pub fn with_query(
        settings: GameSettings,
        world: Option<&WorldData>,
        catalog: AssetCatalog,
        query: Q,
    ) -> Self {
        let world = StaticWorld::build(world, &settings.spawn.route_prefix);
        let routes = RouteTable::from_paths(&world.paths);
        let hands = catalog
            .hands
            .as_ref()
            .and_then(|proto| ClipSet::new(proto.clips.clone()));

        let mut game = Self {
            session: GameSession::new(settings.max_health),
            player: PlayerController::new(settings.player.clone(), settings.spawn.player_spawn),
            weapon: WeaponRig::new(),
            hands,
            registry: ActorRegistry::new(),
            routes,
            colliders: world.colliders,
            query,
            mob_ai: MobAiSystem::new(settings.mobs.clone()),
            combat: CombatSystem::new(settings.combat.clone()),
            rng: seeded(settings.rng_seed),
            prev_time: 0.0,
            debug_overlay: false,
            settings,
            catalog,
        };
        game.start_level();
        game.session.push_ui(UiEvent::LoadingComplete);
        game
    }

    /// Clear every actor, repopulate, and restore the player.
    ///
    /// Aggro and game over are reset; pause state is left alone.
    pub fn start_level(&mut self) {
        self.registry.clear();
        populate_level(
            &mut self.registry,
            &self.routes,
            &self.catalog,
            &self.settings,
            &self.query,
            &self.colliders,
            &mut self.rng,
        );
        self.session.reset_for_level();
        self.player.reset(self.settings.spawn.player_spawn);
        self.weapon.reset();
        if let Some(hands) = &mut self.hands {
            hands.play_loop("idle");
        }
        info!("level started");
    }

    /// React to a discrete input event at host time `now` (seconds).
    pub fn handle_input(&mut self, event: InputEvent, now: f64) {
        match event {
            InputEvent::PointerLocked => {
                if self.session.is_game_over() {
                    self.start_level();
                }
                if self.session.resume() {
                    self.prev_time = now;
                }
            }
            InputEvent::PointerUnlocked => self.session.pause(),
            InputEvent::Fire => {
                if self.session.is_paused() {
                    if self.session.is_game_over() {
                        self.start_level();
                    }
                } else {
                    self.fire();
                }
            }
            InputEvent::Jump => {
                if !self.session.is_paused() {
                    self.player.try_jump();
                }
            }
            InputEvent::ToggleDebug => {
                self.debug_overlay = !self.debug_overlay;
                debug!(on = self.debug_overlay, "route overlay toggled");
            }
            InputEvent::Look { yaw, pitch } => {
                if !self.session.is_paused() {
                    self.player.look(yaw, pitch);
                }
            }
        }
    }

    /// Fire the player's weapon from the rig's muzzle along the view.
    fn fire(&mut self) {
        let muzzle = self.weapon.muzzle(self.player.camera_matrix());
        self.weapon.kick();
        self.combat
            .fire_player(&mut self.registry, muzzle, self.player.forward());
        if let Some(hands) = &mut self.hands {
            hands.play_once("shoot");
            hands.play_once("fire");
        }
    }

    /// Run one host frame at time `now` (seconds).
    ///
    /// Returns the simulated delta, or `None` while paused. The delta is
    /// clamped to `max_frame_delta`.
    pub fn frame(&mut self, now: f64, keys: &MovementKeys) -> Option<f32> {
        if self.session.is_paused() {
            return None;
        }
        let delta = ((now - self.prev_time) as f32).clamp(0.0, self.settings.max_frame_delta);
        self.prev_time = now;
        self.step(delta, keys);
        Some(delta)
    }

    /// Advance the pipeline by exactly `delta` seconds.
    pub fn step(&mut self, delta: f32, keys: &MovementKeys) -> Vec<BulletOutcome> {
        for mob in self.registry.mobs_mut() {
            mob.advance_animation(delta);
        }
        if let Some(hands) = &mut self.hands {
            hands.advance(delta);
        }

        if !self.session.is_game_over() {
            let tick = self.player.tick(delta, keys, &self.query, &self.colliders);
            if tick.fell_out_of_world {
                info!("player fell out of the world, respawning");
                self.session.damage_player(self.player.config().fall_damage);
            }
        }

        self.weapon.update(delta);

        if !self.session.is_game_over() {
            let shots = self.mob_ai.update(
                &mut self.registry,
                self.session.is_aggro(),
                self.player.position,
                &self.query,
                &self.colliders,
                &mut self.rng,
                delta,
            );
            for shot in shots {
                self.combat
                    .fire_mob(&mut self.registry, shot.shooter, self.player.position);
            }
        }

        let outcomes = self.combat.update_bullets(
            &mut self.registry,
            &mut self.session,
            self.player.position,
            &self.query,
            &self.colliders,
            &mut self.rng,
            delta,
        );
        self.combat.update_particles(&mut self.registry, delta);
        outcomes
    }

    /// Camera, actors and overlay for the renderer.
    pub fn snapshot(&self) -> FrameSnapshot {
        let camera = self.player.camera_matrix();
        FrameSnapshot {
            camera,
            weapon: self.weapon.world_matrix(camera),
            actors: self.registry.views(),
            route_lines: if self.debug_overlay {
                self.routes.debug_lines()
            } else {
                Vec::new()
            },
            health: self.session.health(),
            aggro: self.session.is_aggro(),
            paused: self.session.is_paused(),
            game_over: self.session.is_game_over(),
        }
    }

    /// Overlay updates since the last call. Call every frame.
    pub fn drain_ui(&mut self) -> Vec<UiEvent> {
        self.session.drain_ui()
    }

    /// Spawn, despawn and damage events since the last call. Call every
    /// frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let mut events = self.registry.drain_events();
        events.extend(self.session.drain_events());
        events
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn weapon(&self) -> &WeaponRig {
        &self.weapon
    }

    pub fn hands(&self) -> Option<&ClipSet> {
        self.hands.as_ref()
    }

    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ActorRegistry {
        &mut self.registry
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    /// Eye position.
    pub fn camera_position(&self) -> Vec3 {
        self.player.position
    }
}
