//! Events emitted by the simulation for presentation, VFX and audio
//!
//! The simulation never drives animations directly. It records what happened
//! and the owner of the scene graph decides how it looks and sounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{AiState, EnemyKind, EntityId, PowerUpKind, Side, WeaponKind};

/// Explosion size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    Small,
    Medium,
    Large,
}

/// Why a projectile left the world; each projectile is removed at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Lifetime ran out
    Expired,
    /// Strayed too far from the camera
    OutOfBounds,
    /// Hit something
    Consumed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned {
        id: EntityId,
        kind: EnemyKind,
        pos: Vec2,
    },
    ProjectileSpawned {
        id: EntityId,
        weapon: WeaponKind,
        owner: Side,
        pos: Vec2,
        dir: Vec2,
    },
    PowerUpSpawned {
        id: EntityId,
        kind: PowerUpKind,
        pos: Vec2,
    },
    MuzzleFlash {
        pos: Vec2,
    },
    Explosion {
        pos: Vec2,
        size: ExplosionSize,
    },
    Spark {
        pos: Vec2,
    },
    CameraShake {
        duration: f32,
        intensity: f32,
    },
    EnemyStateChanged {
        id: EntityId,
        from: AiState,
        to: AiState,
    },
    /// Presentation flashes the enemy body
    EnemyDamaged {
        id: EntityId,
        amount: f32,
        health: f32,
    },
    EnemyDestroyed {
        id: EntityId,
        kind: EnemyKind,
        pos: Vec2,
    },
    ProjectileRemoved {
        id: EntityId,
        reason: RemovalReason,
    },
    PlayerDamaged {
        amount: f32,
        health: f32,
        armor: f32,
    },
    PlayerDestroyed {
        pos: Vec2,
    },
    PowerUpCollected {
        id: EntityId,
        kind: PowerUpKind,
    },
    WeaponSwitched {
        weapon: WeaponKind,
    },
}
