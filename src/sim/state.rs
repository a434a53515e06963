//! World state and core simulation types
//!
//! Entities are plain records with no rendering handles. The presentation layer
//! keys its own state by `EntityId` and learns about changes from `GameEvent`s.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, RemovalReason};
use super::player::Player;
use super::weapon::{FireGate, FireRequest};
use crate::consts::*;
use crate::tuning::{EnemyStats, Tuning, WeaponStats};
use crate::{heading_vec, wrap_angle};

/// Stable entity identifier, unique across all entity kinds within a world
pub type EntityId = u32;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player destroyed
    GameOver,
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Tank,
    Chopper,
    Turret,
    Drone,
}

impl EnemyKind {
    /// Tanks and turrets carry a gun turret that tracks the player
    pub fn has_turret(self) -> bool {
        matches!(self, EnemyKind::Tank | EnemyKind::Turret)
    }

    /// Choppers and drones circle the player while attacking
    pub fn strafes(self) -> bool {
        matches!(self, EnemyKind::Chopper | EnemyKind::Drone)
    }
}

/// Enemy behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Idle,
    Patrol,
    Chase,
    Attack,
    /// Declared but never behaves; falls back to `Patrol` on the next update
    Retreat,
}

/// Weapon types (player and enemy fire share the table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    MachineGun,
    Missile,
    Laser,
}

impl WeaponKind {
    pub(crate) fn index(self) -> usize {
        match self {
            WeaponKind::MachineGun => 0,
            WeaponKind::Missile => 1,
            WeaponKind::Laser => 2,
        }
    }
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Armor,
    Fuel,
    Energy,
    Ammo,
    /// Never dropped by enemies
    WeaponUpgrade,
}

impl PowerUpKind {
    /// Kinds a destroyed enemy can drop (uniformly)
    pub const DROPPABLE: [PowerUpKind; 5] = [
        PowerUpKind::Health,
        PowerUpKind::Armor,
        PowerUpKind::Fuel,
        PowerUpKind::Energy,
        PowerUpKind::Ammo,
    ];
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Body facing (radians)
    pub facing: f32,
    /// Gun turret facing, tanks and turrets only
    pub turret_facing: Option<f32>,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub fire_rate: f32,
    pub fire_gate: FireGate,
    pub ai: AiState,
    pub patrol_center: Vec2,
    pub patrol_radius: f32,
    pub wander_target: Option<Vec2>,
    pub destroyed: bool,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, stats: &EnemyStats) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            facing: 0.0,
            turret_facing: kind.has_turret().then_some(0.0),
            health: stats.health,
            max_health: stats.health,
            damage: stats.damage,
            speed: stats.speed,
            detection_range: stats.detection_range,
            attack_range: stats.attack_range,
            fire_rate: stats.fire_rate,
            fire_gate: FireGate::default(),
            ai: AiState::Patrol,
            patrol_center: pos,
            patrol_radius: PATROL_RADIUS,
            wander_target: None,
            destroyed: false,
        }
    }

    /// Apply damage, clamping health at zero.
    ///
    /// Returns true only on the call that destroys the enemy, so the
    /// destruction sequence runs exactly once. Hits on an already destroyed
    /// enemy are ignored.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.destroyed {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.destroyed = true;
            return true;
        }
        false
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub weapon: WeaponKind,
    pub owner: Side,
    pub pos: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
    /// Heading angle matching `dir`
    pub heading: f32,
    pub damage: f32,
    pub speed: f32,
    pub age: f32,
    pub lifetime: f32,
}

impl Projectile {
    pub fn new(
        id: EntityId,
        weapon: WeaponKind,
        owner: Side,
        pos: Vec2,
        dir: Vec2,
        stats: &WeaponStats,
    ) -> Self {
        let dir = dir.try_normalize().unwrap_or(Vec2::X);
        Self {
            id,
            weapon,
            owner,
            pos,
            dir,
            heading: dir.y.atan2(dir.x),
            damage: stats.damage,
            speed: stats.projectile_speed,
            age: 0.0,
            lifetime: stats.lifetime,
        }
    }

    /// Only player missiles seek targets
    pub fn homes(&self) -> bool {
        self.weapon == WeaponKind::Missile && self.owner == Side::Player
    }

    /// Rendered opacity: 1 until the final fade window, then linear to 0
    pub fn fade_alpha(&self) -> f32 {
        let fade_start = self.lifetime - PROJECTILE_FADE_WINDOW;
        if self.age > fade_start {
            ((self.lifetime - self.age) / PROJECTILE_FADE_WINDOW).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub(crate) fn set_heading(&mut self, heading: f32) {
        self.heading = wrap_angle(heading);
        self.dir = heading_vec(self.heading);
    }
}

/// A power-up waiting to be collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

/// The simulation registry: owns every live entity plus the event queue
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Active enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Active projectiles (sorted by id for determinism)
    pub projectiles: Vec<Projectile>,
    /// Active power-ups (sorted by id for determinism)
    pub power_ups: Vec<PowerUp>,
    pub(crate) rng: Pcg32,
    /// Fire requests raised this tick, spawned after the projectile pass
    pub(crate) pending_shots: Vec<FireRequest>,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Create a world with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        log::info!("World created (seed {seed})");
        Self {
            seed,
            player: Player::new(&tuning.player, &tuning.weapons),
            tuning,
            phase: GamePhase::Playing,
            time: 0.0,
            time_ticks: 0,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            pending_shots: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain, in call order
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand accumulated events to the presentation layer.
    ///
    /// `tick` never clears the queue; hosts drain it once per frame or it
    /// keeps growing.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let enemy = Enemy::new(id, kind, pos, self.tuning.enemy(kind));
        self.enemies.push(enemy);
        self.emit(GameEvent::EnemySpawned { id, kind, pos });
        id
    }

    /// Spawn the opening encounter: a ring around the player, alternating
    /// tanks and choppers
    pub fn spawn_test_enemies(&mut self) {
        let center = self.player.pos;
        for i in 0..TEST_ENEMY_COUNT {
            let angle = i as f32 * std::f32::consts::TAU / TEST_ENEMY_COUNT as f32;
            let kind = if i % 2 == 0 { EnemyKind::Tank } else { EnemyKind::Chopper };
            self.spawn_enemy(kind, center + heading_vec(angle) * TEST_ENEMY_RING_RADIUS);
        }
    }

    /// Spawn a projectile immediately
    pub fn spawn_projectile(
        &mut self,
        origin: Vec2,
        dir: Vec2,
        weapon: WeaponKind,
        owner: Side,
    ) -> EntityId {
        let id = self.next_entity_id();
        let projectile = Projectile::new(id, weapon, owner, origin, dir, self.tuning.weapon(weapon));
        let dir = projectile.dir;
        self.projectiles.push(projectile);
        self.emit(GameEvent::ProjectileSpawned {
            id,
            weapon,
            owner,
            pos: origin,
            dir,
        });
        self.emit(GameEvent::MuzzleFlash { pos: origin });
        id
    }

    /// Queue a fire request; it becomes a projectile after this tick's
    /// projectile pass and is first integrated on the next tick
    pub fn queue_shot(&mut self, request: FireRequest) {
        self.pending_shots.push(request);
    }

    pub(crate) fn flush_shots(&mut self) {
        let shots = std::mem::take(&mut self.pending_shots);
        for shot in shots {
            self.spawn_projectile(shot.origin, shot.dir, shot.weapon, shot.owner);
        }
    }

    pub fn spawn_power_up(&mut self, kind: PowerUpKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp { id, kind, pos });
        self.emit(GameEvent::PowerUpSpawned { id, kind, pos });
        id
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    /// Remove a projectile; removing one that is already gone is a no-op
    pub fn remove_projectile(&mut self, id: EntityId, reason: RemovalReason) -> Option<Projectile> {
        let idx = self.projectiles.iter().position(|p| p.id == id)?;
        let projectile = self.projectiles.remove(idx);
        self.emit(GameEvent::ProjectileRemoved { id, reason });
        Some(projectile)
    }

    /// Cull projectiles that strayed too far from the camera anchor
    pub fn cull_projectiles(&mut self, anchor: Vec2, max_distance: f32) -> usize {
        let far: Vec<EntityId> = self
            .projectiles
            .iter()
            .filter(|p| p.pos.distance(anchor) > max_distance)
            .map(|p| p.id)
            .collect();
        for &id in &far {
            self.remove_projectile(id, RemovalReason::OutOfBounds);
        }
        far.len()
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
