//! Simulation tick
//!
//! Phase order per tick: input, player, enemies, projectiles, spawn of this
//! tick's shots, contacts, cleanup.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::{AiContext, update_enemy};
use super::contact::Contact;
use super::events::{GameEvent, RemovalReason};
use super::player::PlayerControls;
use super::state::{EntityId, GamePhase, WeaponKind, World};
use super::weapon::update_projectile;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Movement stick, components in [-1, 1]
    pub movement: Vec2,
    /// Aim direction; zero keeps the current heading
    pub aim: Vec2,
    /// Fire button held
    pub firing: bool,
    /// Pause toggle
    pub pause: bool,
    pub switch_weapon: Option<WeaponKind>,
    /// Begin-contacts reported by the host's physics since the last tick
    pub contacts: Vec<Contact>,
}

impl TickInput {
    fn controls(&self) -> PlayerControls {
        PlayerControls {
            movement: self.movement,
            aim: self.aim,
            firing: self.firing,
        }
    }
}

/// Advance the world by `dt` seconds (clamped to `MAX_DT`)
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if input.pause {
        match world.phase {
            GamePhase::Playing => {
                world.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => world.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    if matches!(world.phase, GamePhase::Paused | GamePhase::GameOver) {
        return;
    }

    let dt = dt.clamp(0.0, MAX_DT);
    world.time += f64::from(dt);
    world.time_ticks += 1;

    if let Some(weapon) = input.switch_weapon.filter(|&w| w != world.player.weapon) {
        world.player.switch_weapon(weapon);
        world.emit(GameEvent::WeaponSwitched { weapon });
    }

    // Player
    let now = world.time;
    if let Some(shot) = world.player.update(&input.controls(), dt, now) {
        world.queue_shot(shot);
    }

    // Enemies
    let ctx = AiContext {
        dt,
        now,
        player_pos: world.player.pos,
    };
    for enemy in world.enemies.iter_mut() {
        let out = update_enemy(enemy, &ctx, &mut world.rng);
        if let Some(shot) = out.fire {
            world.pending_shots.push(shot);
        }
        if let Some((from, to)) = out.transition {
            world.events.push(GameEvent::EnemyStateChanged {
                id: enemy.id,
                from,
                to,
            });
        }
    }

    // Projectiles
    let turn_rate = world.tuning.combat.missile_turn_rate;
    let mut expired: Vec<EntityId> = Vec::new();
    for projectile in world.projectiles.iter_mut() {
        if update_projectile(projectile, dt, &world.enemies, turn_rate) {
            expired.push(projectile.id);
        }
    }
    for id in expired {
        world.remove_projectile(id, RemovalReason::Expired);
    }

    // Shots fired this tick enter the world now and first move next tick
    world.flush_shots();

    for contact in &input.contacts {
        world.resolve_contact(contact);
    }

    let anchor = world.player.pos;
    let culled = world.cull_projectiles(anchor, CLEANUP_DISTANCE);
    if culled > 0 {
        log::trace!("Culled {culled} projectiles");
    }

    world.normalize_order();
}
