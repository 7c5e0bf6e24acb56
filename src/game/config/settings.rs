//! Gameplay Settings
//!
//! Every tuning constant of the simulation in one serde-loadable struct.
//! `Default` carries the shipped values; a JSON file only needs the fields
//! it overrides.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::error::{LoadError, read_file};
use crate::player::PlayerPhysicsConfig;

/// Mob behavior tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobAiConfig {
    /// Mobs farther than this from the player are not simulated
    pub cull_radius: f32,
    /// Speed while chasing the player
    pub pursuit_speed: f32,
    /// Pursuing enemies stop closing in at this distance
    pub standoff_distance: f32,
    /// Speed while following a route
    pub patrol_speed: f32,
    /// Horizontal distance at which a waypoint counts as reached
    pub waypoint_threshold: f32,
    /// Wander velocity components are drawn from `[-spread/2, spread/2)`
    pub wander_spread: f32,
    pub wander_interval_min: f32,
    pub wander_interval_max: f32,
    pub shoot_interval_min: f32,
    pub shoot_interval_max: f32,
    /// Upper bound of the first shot delay after spawning
    pub initial_shoot_delay_max: f32,
    /// Ground probe origin height above the mob's feet
    pub ground_probe_height: f32,
    pub ground_probe_range: f32,
    /// Fall speed applied when no floor is found
    pub fallback_gravity: f32,
}

impl Default for MobAiConfig {
    fn default() -> Self {
        Self {
            cull_radius: 80.0,
            pursuit_speed: 4.0,
            standoff_distance: 3.0,
            patrol_speed: 3.5,
            waypoint_threshold: 0.5,
            wander_spread: 3.0,
            wander_interval_min: 2.0,
            wander_interval_max: 5.0,
            shoot_interval_min: 1.0,
            shoot_interval_max: 3.0,
            initial_shoot_delay_max: 2.0,
            ground_probe_height: 1.0,
            ground_probe_range: 20.0,
            fallback_gravity: 9.8,
        }
    }
}

/// Bullet and particle tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub player_bullet_speed: f32,
    pub mob_bullet_speed: f32,
    /// Seconds a bullet lives without hitting anything
    pub bullet_life: f32,
    /// Enemy bullets closer than this to the camera hit the player
    pub player_hit_radius: f32,
    pub mob_bullet_damage: f32,
    /// Mob bullets leave from this height above the mob's feet
    pub mob_muzzle_height: f32,
    pub burst_particles: usize,
    pub particle_life: f32,
    /// Burst velocity components are drawn from `[-spread/2, spread/2)`
    pub particle_spread: f32,
    /// RGB burst color when a mob is destroyed
    pub kill_burst_color: u32,
    /// RGB burst color when a player bullet hits the world
    pub impact_color: u32,
    /// RGB burst color when an enemy bullet hits the world
    pub enemy_impact_color: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_bullet_speed: 100.0,
            mob_bullet_speed: 30.0,
            bullet_life: 3.0,
            player_hit_radius: 1.0,
            mob_bullet_damage: 10.0,
            mob_muzzle_height: 1.2,
            burst_particles: 6,
            particle_life: 0.5,
            particle_spread: 5.0,
            kill_burst_color: 0xff0000,
            impact_color: 0xffffaa,
            enemy_impact_color: 0x555555,
        }
    }
}

/// Level population and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub enemy_count: usize,
    pub npc_count: usize,
    /// Prefix of path objects that define routes
    pub route_prefix: String,
    /// Random spawns pick x and z in `[-extent, extent)`
    pub search_half_extent: f32,
    /// Spawn floor probes start at this height
    pub probe_height: f32,
    pub probe_range: f32,
    /// Random spawn attempts before giving up on validation
    pub max_attempts: u32,
    /// Mob bounding box (width, height, depth), standing on its position
    pub mob_size: Vec3,
    /// Camera position at level start
    pub player_spawn: Vec3,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            enemy_count: 5,
            npc_count: 5,
            route_prefix: "Route_".to_string(),
            search_half_extent: 40.0,
            probe_height: 50.0,
            probe_range: 100.0,
            max_attempts: 50,
            mob_size: Vec3::new(1.0, 2.0, 1.0),
            player_spawn: Vec3::new(0.0, 10.0, 0.0),
        }
    }
}

/// All gameplay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub player: PlayerPhysicsConfig,
    pub mobs: MobAiConfig,
    pub combat: CombatConfig,
    pub spawn: SpawnConfig,
    pub max_health: f32,
    /// Longest frame the simulation will integrate in one step (seconds)
    pub max_frame_delta: f32,
    pub rng_seed: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player: PlayerPhysicsConfig::default(),
            mobs: MobAiConfig::default(),
            combat: CombatConfig::default(),
            spawn: SpawnConfig::default(),
            max_health: 100.0,
            max_frame_delta: 0.1,
            rng_seed: 0x5eed_b055,
        }
    }
}

impl GameSettings {
    /// Parse and validate settings from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::from_json_str(&read_file(path)?)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.max_health <= 0.0 {
            return Err(LoadError::invalid("max_health", "must be positive"));
        }
        if self.max_frame_delta <= 0.0 {
            return Err(LoadError::invalid("max_frame_delta", "must be positive"));
        }
        if self.player.crouch_height > self.player.height {
            return Err(LoadError::invalid(
                "player.crouch_height",
                "must not exceed player.height",
            ));
        }
        if self.mobs.wander_interval_min > self.mobs.wander_interval_max {
            return Err(LoadError::invalid(
                "mobs.wander_interval_min",
                "must not exceed mobs.wander_interval_max",
            ));
        }
        if self.mobs.shoot_interval_min > self.mobs.shoot_interval_max {
            return Err(LoadError::invalid(
                "mobs.shoot_interval_min",
                "must not exceed mobs.shoot_interval_max",
            ));
        }
        if self.combat.bullet_life <= 0.0 || self.combat.particle_life <= 0.0 {
            return Err(LoadError::invalid("combat", "lifetimes must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = GameSettings::from_json_str(
            r#"{ "max_health": 50, "spawn": { "enemy_count": 2 }, "player": { "walk_speed": 6.0 } }"#,
        )
        .unwrap();
        assert_eq!(settings.max_health, 50.0);
        assert_eq!(settings.spawn.enemy_count, 2);
        assert_eq!(settings.spawn.npc_count, 5);
        assert_eq!(settings.player.walk_speed, 6.0);
        assert_eq!(settings.player.crouch_speed, 4.0);
        assert_eq!(settings.mobs, MobAiConfig::default());
    }

    #[test]
    fn test_vectors_parse_from_arrays() {
        let settings =
            GameSettings::from_json_str(r#"{ "player": { "respawn_point": [1.0, 20.0, -3.0] } }"#)
                .unwrap();
        assert_eq!(settings.player.respawn_point, Vec3::new(1.0, 20.0, -3.0));
    }

    #[test]
    fn test_rejects_non_positive_health() {
        let err = GameSettings::from_json_str(r#"{ "max_health": 0 }"#).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { field: "max_health", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GameSettings::from_json_str("{ max_health: ").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = GameSettings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
