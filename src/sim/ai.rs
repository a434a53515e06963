//! Enemy AI controller
//!
//! One finite-state machine per enemy, stepped once per tick. Exit thresholds
//! are wider than entry thresholds (1.5x for chase, 1.2x for attack) so an
//! enemy hovering at a boundary does not flicker between states.

use glam::Vec2;
use rand::Rng;

use super::state::{AiState, Enemy, Side, WeaponKind};
use super::weapon::FireRequest;
use crate::consts::*;
use crate::{bearing, heading_vec};

/// What an enemy needs to know about the world this tick
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    pub dt: f32,
    /// Simulation clock (seconds)
    pub now: f64,
    pub player_pos: Vec2,
}

/// Result of one AI step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiOutput {
    pub velocity: Vec2,
    pub facing: f32,
    pub turret_facing: Option<f32>,
    pub fire: Option<FireRequest>,
    /// Set when the state changed this tick
    pub transition: Option<(AiState, AiState)>,
}

/// Step one enemy: decide state, velocity and facing, maybe fire, then move.
///
/// Destroyed enemies are frozen and never fire.
pub fn update_enemy(enemy: &mut Enemy, ctx: &AiContext, rng: &mut impl Rng) -> AiOutput {
    if enemy.destroyed {
        return AiOutput {
            velocity: enemy.vel,
            facing: enemy.facing,
            turret_facing: enemy.turret_facing,
            fire: None,
            transition: None,
        };
    }

    let before = enemy.ai;
    let distance = enemy.pos.distance(ctx.player_pos);
    let to_player = bearing(enemy.pos, ctx.player_pos);
    let mut fire = None;

    match enemy.ai {
        AiState::Idle => {
            if distance < enemy.detection_range {
                enemy.ai = AiState::Chase;
            }
        }
        AiState::Patrol => {
            if distance < enemy.detection_range {
                enemy.ai = AiState::Chase;
            } else {
                patrol(enemy, rng);
            }
        }
        AiState::Chase => {
            if distance > enemy.detection_range * CHASE_EXIT_FACTOR {
                enemy.ai = AiState::Patrol;
            } else if distance < enemy.attack_range {
                enemy.ai = AiState::Attack;
            } else {
                enemy.vel = heading_vec(to_player) * enemy.speed;
                enemy.facing = to_player;
            }
        }
        AiState::Attack => {
            if distance > enemy.attack_range * ATTACK_EXIT_FACTOR {
                enemy.ai = AiState::Chase;
            } else {
                enemy.facing = to_player;
                fire = try_fire(enemy, ctx.now, to_player);
                enemy.vel = if enemy.kind.strafes() {
                    heading_vec(to_player + std::f32::consts::FRAC_PI_2) * enemy.speed * 0.5
                } else {
                    Vec2::ZERO
                };
            }
        }
        AiState::Retreat => {
            // Never implemented; behaves as patrol
            enemy.ai = AiState::Patrol;
        }
    }

    enemy.pos += enemy.vel * ctx.dt;

    if enemy.kind.has_turret() {
        enemy.turret_facing = Some(bearing(enemy.pos, ctx.player_pos));
    }

    let transition = (before != enemy.ai).then_some((before, enemy.ai));
    if let Some((from, to)) = transition {
        log::trace!("Enemy {} {:?} -> {:?} at distance {:.1}", enemy.id, from, to, distance);
    }

    AiOutput {
        velocity: enemy.vel,
        facing: enemy.facing,
        turret_facing: enemy.turret_facing,
        fire,
        transition,
    }
}

/// Stay near the patrol center, wandering between random points on a circle
/// of half the patrol radius
fn patrol(enemy: &mut Enemy, rng: &mut impl Rng) {
    if enemy.pos.distance(enemy.patrol_center) > enemy.patrol_radius {
        let home = bearing(enemy.pos, enemy.patrol_center);
        enemy.vel = heading_vec(home) * enemy.speed;
        return;
    }

    let arrived = enemy
        .wander_target
        .is_none_or(|t| enemy.pos.distance(t) < WANDER_ARRIVAL_DISTANCE);
    if arrived {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let radius = enemy.patrol_radius * WANDER_RADIUS_FACTOR;
        enemy.wander_target = Some(enemy.patrol_center + heading_vec(angle) * radius);
    }

    if let Some(target) = enemy.wander_target {
        enemy.vel = heading_vec(bearing(enemy.pos, target)) * enemy.speed * 0.5;
    }
}

fn try_fire(enemy: &mut Enemy, now: f64, aim: f32) -> Option<FireRequest> {
    if !enemy.fire_gate.try_fire(now, enemy.fire_rate) {
        return None;
    }
    let dir = heading_vec(aim);
    Some(FireRequest {
        origin: enemy.pos + dir * ENEMY_MUZZLE_OFFSET,
        dir,
        weapon: WeaponKind::MachineGun,
        owner: Side::Enemy,
    })
}
