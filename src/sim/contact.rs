//! Collision and damage resolution
//!
//! Contacts come from whatever broadphase the host runs. Pairs are unordered
//! and a contact naming an entity that is already gone does nothing, so the
//! same contact may be delivered twice without double damage.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::{ExplosionSize, GameEvent, RemovalReason};
use super::player::PlayerHit;
use super::state::{EntityId, GamePhase, PowerUpKind, Side, World};
use crate::tuning::Shake;

/// Collision category bits, one per body kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Enemy,
    Projectile,
    EnemyProjectile,
    Building,
    PowerUp,
}

impl Category {
    pub const fn bits(self) -> u32 {
        match self {
            Category::Player => 0b1,
            Category::Enemy => 0b10,
            Category::Projectile => 0b100,
            Category::EnemyProjectile => 0b1000,
            Category::Building => 0b1_0000,
            Category::PowerUp => 0b10_0000,
        }
    }

    /// Categories this one reports contacts with
    pub const fn contact_mask(self) -> u32 {
        match self {
            Category::Player => {
                Category::EnemyProjectile.bits() | Category::Enemy.bits() | Category::PowerUp.bits()
            }
            Category::Enemy => Category::Projectile.bits() | Category::Player.bits(),
            Category::Projectile => Category::Enemy.bits() | Category::Building.bits(),
            Category::EnemyProjectile => Category::Player.bits() | Category::Building.bits(),
            Category::Building => 0,
            Category::PowerUp => Category::Player.bits(),
        }
    }

    /// True when either side asks to hear about the other
    pub fn interacts(self, other: Category) -> bool {
        self.contact_mask() & other.bits() != 0 || other.contact_mask() & self.bits() != 0
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Player,
    Enemy(EntityId),
    /// Player-owned projectile
    Projectile(EntityId),
    EnemyProjectile(EntityId),
    /// Static scenery, not tracked by the world
    Building,
    PowerUp(EntityId),
}

impl Body {
    pub fn category(self) -> Category {
        match self {
            Body::Player => Category::Player,
            Body::Enemy(_) => Category::Enemy,
            Body::Projectile(_) => Category::Projectile,
            Body::EnemyProjectile(_) => Category::EnemyProjectile,
            Body::Building => Category::Building,
            Body::PowerUp(_) => Category::PowerUp,
        }
    }
}

/// A begin-contact report between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
    /// World-space contact point
    pub point: Vec2,
}

impl Contact {
    pub fn new(a: Body, b: Body, point: Vec2) -> Self {
        Self { a, b, point }
    }
}

impl World {
    /// Apply the effects of one contact. Returns false when the pair is not a
    /// combat pair or names something no longer live.
    pub fn resolve_contact(&mut self, contact: &Contact) -> bool {
        if !contact.a.category().interacts(contact.b.category()) {
            return false;
        }
        let point = contact.point;
        match (contact.a, contact.b) {
            (Body::Projectile(p), Body::Enemy(e)) | (Body::Enemy(e), Body::Projectile(p)) => {
                self.projectile_hits_enemy(p, e, point)
            }
            (Body::EnemyProjectile(p), Body::Player) | (Body::Player, Body::EnemyProjectile(p)) => {
                self.projectile_hits_player(p, point)
            }
            (Body::Player, Body::Enemy(e)) | (Body::Enemy(e), Body::Player) => {
                self.player_rams_enemy(e, point)
            }
            (Body::Player, Body::PowerUp(u)) | (Body::PowerUp(u), Body::Player) => {
                self.collect_power_up(u)
            }
            (Body::Projectile(p), Body::Building) | (Body::Building, Body::Projectile(p)) => {
                self.projectile_hits_building(p, point)
            }
            _ => false,
        }
    }

    /// Live projectile with the given owner
    fn live_projectile_damage(&self, id: EntityId, owner: Side) -> Option<f32> {
        self.projectile(id)
            .filter(|p| p.owner == owner)
            .map(|p| p.damage)
    }

    fn projectile_hits_enemy(&mut self, projectile: EntityId, enemy: EntityId, point: Vec2) -> bool {
        let Some(damage) = self.live_projectile_damage(projectile, Side::Player) else {
            return false;
        };
        let Some(idx) = self.enemies.iter().position(|e| e.id == enemy && !e.destroyed) else {
            return false;
        };

        let destroyed = self.enemies[idx].take_damage(damage);
        let health = self.enemies[idx].health;
        self.emit(GameEvent::EnemyDamaged {
            id: enemy,
            amount: damage,
            health,
        });
        self.emit(GameEvent::Explosion {
            pos: point,
            size: ExplosionSize::Small,
        });
        self.remove_projectile(projectile, RemovalReason::Consumed);

        if destroyed {
            self.destroy_enemy(enemy);
        }
        true
    }

    fn projectile_hits_player(&mut self, projectile: EntityId, point: Vec2) -> bool {
        if self.player.destroyed {
            return false;
        }
        let Some(damage) = self.live_projectile_damage(projectile, Side::Enemy) else {
            return false;
        };

        self.damage_player(damage);
        let shake = self.tuning.combat.shake_player_hit;
        self.shake(shake);
        self.emit(GameEvent::Spark { pos: point });
        self.remove_projectile(projectile, RemovalReason::Consumed);
        true
    }

    fn player_rams_enemy(&mut self, enemy: EntityId, point: Vec2) -> bool {
        if self.player.destroyed {
            return false;
        }
        let Some(idx) = self.enemies.iter().position(|e| e.id == enemy && !e.destroyed) else {
            return false;
        };

        let combat = self.tuning.combat.clone();
        self.damage_player(combat.ram_damage_to_player);

        let destroyed = self.enemies[idx].take_damage(combat.ram_damage_to_enemy);
        let health = self.enemies[idx].health;
        self.emit(GameEvent::EnemyDamaged {
            id: enemy,
            amount: combat.ram_damage_to_enemy,
            health,
        });
        self.shake(combat.shake_ram);
        self.emit(GameEvent::Explosion {
            pos: point,
            size: ExplosionSize::Medium,
        });

        if destroyed {
            self.destroy_enemy(enemy);
        }
        true
    }

    fn collect_power_up(&mut self, power_up: EntityId) -> bool {
        if self.player.destroyed {
            return false;
        }
        let Some(idx) = self.power_ups.iter().position(|u| u.id == power_up) else {
            return false;
        };
        let power_up = self.power_ups.remove(idx);
        self.player.apply_power_up(power_up.kind);
        self.emit(GameEvent::PowerUpCollected {
            id: power_up.id,
            kind: power_up.kind,
        });
        log::debug!("Collected {:?}", power_up.kind);
        true
    }

    fn projectile_hits_building(&mut self, projectile: EntityId, point: Vec2) -> bool {
        if self.live_projectile_damage(projectile, Side::Player).is_none() {
            return false;
        }
        self.emit(GameEvent::Spark { pos: point });
        self.remove_projectile(projectile, RemovalReason::Consumed);
        true
    }

    fn damage_player(&mut self, amount: f32) {
        match self.player.take_damage(amount) {
            PlayerHit::Ignored => {}
            PlayerHit::Damaged => self.emit(GameEvent::PlayerDamaged {
                amount,
                health: self.player.health,
                armor: self.player.armor,
            }),
            PlayerHit::Destroyed => {
                self.emit(GameEvent::PlayerDamaged {
                    amount,
                    health: self.player.health,
                    armor: self.player.armor,
                });
                let pos = self.player.pos;
                self.emit(GameEvent::Explosion {
                    pos,
                    size: ExplosionSize::Large,
                });
                self.emit(GameEvent::PlayerDestroyed { pos });
                self.phase = GamePhase::GameOver;
                log::info!("Player destroyed at tick {}", self.time_ticks);
            }
        }
    }

    fn shake(&mut self, shake: Shake) {
        self.emit(GameEvent::CameraShake {
            duration: shake.duration,
            intensity: shake.intensity,
        });
    }

    /// Destruction sequence: explosion, shake, removal, then maybe a drop.
    /// Runs at most once per enemy since the enemy leaves the active set.
    pub(crate) fn destroy_enemy(&mut self, id: EntityId) {
        let Some(idx) = self.enemies.iter().position(|e| e.id == id) else {
            return;
        };
        let enemy = self.enemies.remove(idx);
        let pos = enemy.pos;

        self.emit(GameEvent::Explosion {
            pos,
            size: ExplosionSize::Large,
        });
        let shake = self.tuning.combat.shake_enemy_destroyed;
        self.shake(shake);
        self.emit(GameEvent::EnemyDestroyed {
            id,
            kind: enemy.kind,
            pos,
        });
        log::debug!("{:?} {} destroyed at ({:.0}, {:.0})", enemy.kind, id, pos.x, pos.y);

        if self.rng.random::<f64>() < self.tuning.combat.power_up_drop_chance {
            let kind = PowerUpKind::DROPPABLE[self.rng.random_range(0..PowerUpKind::DROPPABLE.len())];
            self.spawn_power_up(kind, pos);
            log::debug!("{:?} dropped {:?}", enemy.kind, kind);
        }
    }
}
