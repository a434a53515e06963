//! Read-only view of the world for presentation and debugging

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{AiState, EnemyKind, EntityId, GamePhase, PowerUp, Side, WeaponKind, World};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub rotation: f32,
    pub weapon: WeaponKind,
    pub health: f32,
    pub armor: f32,
    pub fuel: f32,
    pub energy: f32,
    pub ammo: u32,
    pub reloading: bool,
    pub invulnerable: bool,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub facing: f32,
    pub turret_facing: Option<f32>,
    /// Health bar fill in [0, 1]
    pub health_fraction: f32,
    pub ai: AiState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub weapon: WeaponKind,
    pub owner: Side,
    pub pos: Vec2,
    pub heading: f32,
    pub alpha: f32,
}

/// Everything a renderer needs for one frame, keyed by entity id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time: f64,
    pub phase: GamePhase,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub power_ups: Vec<PowerUp>,
}

impl World {
    pub fn snapshot(&self) -> Snapshot {
        let p = &self.player;
        Snapshot {
            tick: self.time_ticks,
            time: self.time,
            phase: self.phase,
            player: PlayerView {
                pos: p.pos,
                rotation: p.rotation,
                weapon: p.weapon,
                health: p.health,
                armor: p.armor,
                fuel: p.fuel,
                energy: p.energy,
                ammo: p.weapons.current_ammo(),
                reloading: p.weapons.is_reloading(),
                invulnerable: p.is_invulnerable(),
                destroyed: p.destroyed,
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    facing: e.facing,
                    turret_facing: e.turret_facing,
                    health_fraction: e.health_fraction(),
                    ai: e.ai,
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    weapon: p.weapon,
                    owner: p.owner,
                    pos: p.pos,
                    heading: p.heading,
                    alpha: p.fade_alpha(),
                })
                .collect(),
            power_ups: self.power_ups.clone(),
        }
    }
}
