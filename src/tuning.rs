//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. All structs use
//! `#[serde(default)]` so a partial JSON file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::{EnemyKind, WeaponKind};

/// Per-type enemy preset, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: f32,
    /// Carried for balance tables; enemy shots use projectile damage
    pub damage: f32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    /// Minimum seconds between shots
    pub fire_rate: f32,
}

/// Per-type weapon table (fire rate, projectile stats, magazine)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: f32,
    pub fire_rate: f32,
    pub projectile_speed: f32,
    /// Projectile lifetime cap (seconds)
    pub lifetime: f32,
    pub ammo_capacity: u32,
    pub reload_time: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub tank: EnemyStats,
    pub chopper: EnemyStats,
    pub turret: EnemyStats,
    pub drone: EnemyStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            // Slow, tanky, short range
            tank: EnemyStats {
                health: 60.0,
                damage: 15.0,
                speed: 50.0,
                detection_range: 350.0,
                attack_range: 300.0,
                fire_rate: 1.5,
            },
            // Fast, ranged, rapid fire
            chopper: EnemyStats {
                health: 40.0,
                damage: 10.0,
                speed: 150.0,
                detection_range: 500.0,
                attack_range: 350.0,
                fire_rate: 0.4,
            },
            // Stationary, long range
            turret: EnemyStats {
                health: 80.0,
                damage: 20.0,
                speed: 0.0,
                detection_range: 450.0,
                attack_range: 400.0,
                fire_rate: 0.8,
            },
            // Very fast, fragile, very rapid fire
            drone: EnemyStats {
                health: 20.0,
                damage: 5.0,
                speed: 200.0,
                detection_range: 400.0,
                attack_range: 200.0,
                fire_rate: 0.2,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    pub machine_gun: WeaponStats,
    pub missile: WeaponStats,
    pub laser: WeaponStats,
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            machine_gun: WeaponStats {
                damage: 10.0,
                fire_rate: 0.1,
                projectile_speed: 800.0,
                lifetime: 1.5,
                ammo_capacity: 100,
                reload_time: 2.0,
            },
            missile: WeaponStats {
                damage: 50.0,
                fire_rate: 0.5,
                projectile_speed: 400.0,
                lifetime: 5.0,
                ammo_capacity: 10,
                reload_time: 3.0,
            },
            laser: WeaponStats {
                damage: 5.0,
                fire_rate: 0.05,
                projectile_speed: 1200.0,
                lifetime: 0.5,
                ammo_capacity: 50,
                reload_time: 1.5,
            },
        }
    }
}

/// Player helicopter handling and vitals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub max_armor: f32,
    pub max_fuel: f32,
    pub max_energy: f32,
    pub acceleration: f32,
    pub max_speed: f32,
    /// Velocity multiplier applied once per tick
    pub friction: f32,
    /// Below this speed the helicopter comes to rest
    pub stop_speed: f32,
    pub rotation_speed: f32,
    /// Fuel burned per second
    pub fuel_burn: f32,
    /// Velocity multiplier per tick while out of fuel
    pub out_of_fuel_drag: f32,
    /// Velocity kicked back per shot
    pub recoil: f32,
    /// Fraction of each hit that armor may absorb
    pub armor_absorption: f32,
    /// Seconds of invulnerability after a hit
    pub invulnerability: f32,
    pub health_pickup: f32,
    pub armor_pickup: f32,
    pub fuel_pickup: f32,
    pub energy_pickup: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_armor: 50.0,
            max_fuel: 100.0,
            max_energy: 100.0,
            acceleration: 400.0,
            max_speed: 300.0,
            friction: 0.92,
            stop_speed: 5.0,
            rotation_speed: 3.0,
            fuel_burn: 2.0,
            out_of_fuel_drag: 0.95,
            recoil: 20.0,
            armor_absorption: 0.5,
            invulnerability: 0.5,
            health_pickup: 25.0,
            armor_pickup: 25.0,
            fuel_pickup: 30.0,
            energy_pickup: 30.0,
        }
    }
}

/// Camera shake request parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shake {
    pub duration: f32,
    pub intensity: f32,
}

/// Contact and reward constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Damage the player takes when ramming an enemy
    pub ram_damage_to_player: f32,
    /// Damage an enemy takes when rammed
    pub ram_damage_to_enemy: f32,
    /// Chance that a destroyed enemy drops a power-up
    pub power_up_drop_chance: f64,
    /// Proportional steering gain for player missiles (1/s)
    pub missile_turn_rate: f32,
    pub shake_player_hit: Shake,
    pub shake_ram: Shake,
    pub shake_enemy_destroyed: Shake,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            ram_damage_to_player: 20.0,
            ram_damage_to_enemy: 50.0,
            power_up_drop_chance: 0.3,
            missile_turn_rate: 2.0,
            shake_player_hit: Shake {
                duration: 0.2,
                intensity: 5.0,
            },
            shake_ram: Shake {
                duration: 0.3,
                intensity: 10.0,
            },
            shake_enemy_destroyed: Shake {
                duration: 0.15,
                intensity: 3.0,
            },
        }
    }
}

/// Complete balance set owned by a `World`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub enemies: EnemyTable,
    pub weapons: WeaponTable,
    pub player: PlayerTuning,
    pub combat: CombatTuning,
}

/// Failure to read or parse a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Tuning {
    pub fn enemy(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Tank => &self.enemies.tank,
            EnemyKind::Chopper => &self.enemies.chopper,
            EnemyKind::Turret => &self.enemies.turret,
            EnemyKind::Drone => &self.enemies.drone,
        }
    }

    pub fn weapon(&self, kind: WeaponKind) -> &WeaponStats {
        match kind {
            WeaponKind::MachineGun => &self.weapons.machine_gun,
            WeaponKind::Missile => &self.weapons.missile,
            WeaponKind::Laser => &self.weapons.laser,
        }
    }

    /// Parse tuning from JSON (missing fields keep their defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    /// Read tuning from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets() {
        let t = Tuning::default();
        assert_eq!(t.enemy(EnemyKind::Tank).health, 60.0);
        assert_eq!(t.enemy(EnemyKind::Turret).speed, 0.0);
        assert_eq!(t.enemy(EnemyKind::Drone).fire_rate, 0.2);
        assert_eq!(t.weapon(WeaponKind::Missile).damage, 50.0);
        assert_eq!(t.weapon(WeaponKind::Laser).lifetime, 0.5);
        assert_eq!(t.weapon(WeaponKind::MachineGun).ammo_capacity, 100);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "combat": { "power_up_drop_chance": 1.0 } }"#;
        let t = Tuning::from_json(json).unwrap();
        assert_eq!(t.combat.power_up_drop_chance, 1.0);
        assert_eq!(t.combat.ram_damage_to_enemy, 50.0);
        assert_eq!(t.enemy(EnemyKind::Chopper).attack_range, 350.0);
    }

    #[test]
    fn test_json_roundtrip_preserves_tables() {
        let mut t = Tuning::default();
        t.enemies.tank.health = 75.0;
        let back = Tuning::from_json(&t.to_json().unwrap()).unwrap();
        assert_eq!(back.enemy(EnemyKind::Tank).health, 75.0);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_parse_error_carries_source() {
        let err = TuningError::from(Tuning::from_json("{ not json").unwrap_err());
        assert!(err.to_string().starts_with("failed to parse tuning file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let t = Tuning::load_or_default("/definitely/not/here/tuning.json");
        assert_eq!(t.player.max_health, 100.0);
        assert!(matches!(
            Tuning::load("/definitely/not/here/tuning.json"),
            Err(TuningError::Io(_))
        ));
    }
}
