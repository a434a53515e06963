//! Weapons and projectiles
//!
//! - `FireGate`: rate limiting shared by player and enemy fire
//! - `update_projectile`: lifetime, integration and missile homing
//! - `WeaponSystem`: per-weapon ammo and timed reloads

use std::cmp::Ordering;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, Projectile, Side, WeaponKind};
use crate::consts::MISSILE_ACQUISITION_RADIUS;
use crate::tuning::{WeaponStats, WeaponTable};
use crate::{angle_diff, bearing, wrap_angle};

/// A request to spawn a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireRequest {
    pub origin: Vec2,
    pub dir: Vec2,
    pub weapon: WeaponKind,
    pub owner: Side,
}

/// Tracks the last shot so no shooter fires more often than its rate allows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FireGate {
    last_fire: Option<f64>,
}

impl FireGate {
    /// True when `rate` seconds have elapsed since the last shot (or no shot yet)
    pub fn ready(&self, now: f64, rate: f32) -> bool {
        self.last_fire.is_none_or(|last| now - last >= f64::from(rate))
    }

    /// Fire if ready; a refused attempt is not an error and changes nothing
    pub fn try_fire(&mut self, now: f64, rate: f32) -> bool {
        if !self.ready(now, rate) {
            return false;
        }
        self.last_fire = Some(now);
        true
    }

    pub fn last_fire(&self) -> Option<f64> {
        self.last_fire
    }
}

/// Proportional steering: turn by a fraction of the heading error.
///
/// With `turn_rate * dt < 1` the heading approaches `target_bearing` without
/// crossing it.
pub fn steer_heading(heading: f32, target_bearing: f32, turn_rate: f32, dt: f32) -> f32 {
    let diff = angle_diff(heading, target_bearing);
    wrap_angle(heading + diff * turn_rate * dt)
}

/// Nearest live enemy strictly inside the acquisition radius
pub fn acquire_target(pos: Vec2, enemies: &[Enemy]) -> Option<Vec2> {
    enemies
        .iter()
        .filter(|e| !e.destroyed)
        .map(|e| (e.pos, e.pos.distance(pos)))
        .filter(|&(_, d)| d < MISSILE_ACQUISITION_RADIUS)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map(|(p, _)| p)
}

/// Advance a projectile by `dt`. Returns true when its lifetime is spent and it
/// must be removed.
pub fn update_projectile(
    projectile: &mut Projectile,
    dt: f32,
    enemies: &[Enemy],
    turn_rate: f32,
) -> bool {
    projectile.age += dt;
    if projectile.age >= projectile.lifetime {
        return true;
    }

    projectile.pos += projectile.dir * projectile.speed * dt;

    if projectile.homes() {
        // No target in range: keep flying straight
        if let Some(target) = acquire_target(projectile.pos, enemies) {
            let to_target = bearing(projectile.pos, target);
            let heading = steer_heading(projectile.heading, to_target, turn_rate, dt);
            projectile.set_heading(heading);
        }
    }

    false
}

/// An in-progress reload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reload {
    pub weapon: WeaponKind,
    pub remaining: f32,
}

/// Ammo and reload bookkeeping for the player's weapons.
///
/// Live fire requests do not consult this yet; it tracks state only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSystem {
    current: WeaponKind,
    ammo: [u32; 3],
    stats: [WeaponStats; 3],
    reload: Option<Reload>,
}

impl WeaponSystem {
    pub fn new(table: &WeaponTable) -> Self {
        let stats = [table.machine_gun, table.missile, table.laser];
        Self {
            current: WeaponKind::MachineGun,
            ammo: stats.map(|s| s.ammo_capacity),
            stats,
            reload: None,
        }
    }

    pub fn stats(&self, weapon: WeaponKind) -> &WeaponStats {
        &self.stats[weapon.index()]
    }

    pub fn current(&self) -> WeaponKind {
        self.current
    }

    pub fn ammo(&self, weapon: WeaponKind) -> u32 {
        self.ammo[weapon.index()]
    }

    pub fn current_ammo(&self) -> u32 {
        self.ammo(self.current)
    }

    pub fn is_reloading(&self) -> bool {
        self.reload.is_some()
    }

    pub fn reload(&self) -> Option<Reload> {
        self.reload
    }

    /// Spend one round of the current weapon.
    ///
    /// Fails while reloading. Emptying the magazine starts a reload right away.
    pub fn consume_ammo(&mut self) -> bool {
        if self.reload.is_some() {
            return false;
        }
        let idx = self.current.index();
        if self.ammo[idx] == 0 {
            self.start_reload();
            return false;
        }
        self.ammo[idx] -= 1;
        if self.ammo[idx] == 0 {
            self.start_reload();
        }
        true
    }

    pub fn add_ammo(&mut self, weapon: WeaponKind, amount: u32) {
        let idx = weapon.index();
        let capacity = self.stats[idx].ammo_capacity;
        self.ammo[idx] = self.ammo[idx].saturating_add(amount).min(capacity);
    }

    /// Start reloading the current weapon; ignored if a reload is running
    pub fn start_reload(&mut self) {
        if self.reload.is_some() {
            return;
        }
        self.reload = Some(Reload {
            weapon: self.current,
            remaining: self.stats(self.current).reload_time,
        });
        log::debug!("Reloading {:?}", self.current);
    }

    /// Advance the reload timer. Returns true on the tick the reload completes.
    pub fn update_reload(&mut self, dt: f32) -> bool {
        let Some(reload) = self.reload.as_mut() else {
            return false;
        };
        reload.remaining -= dt;
        if reload.remaining > 0.0 {
            return false;
        }
        let idx = reload.weapon.index();
        self.ammo[idx] = self.stats[idx].ammo_capacity;
        self.reload = None;
        true
    }

    /// Switch weapons. A running reload keeps going and still refills the
    /// weapon that started it.
    pub fn switch_to(&mut self, weapon: WeaponKind) {
        self.current = weapon;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyKind;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    fn missile(pos: Vec2, heading: f32, owner: Side) -> Projectile {
        let stats = Tuning::default().weapons.missile;
        Projectile::new(1, WeaponKind::Missile, owner, pos, crate::heading_vec(heading), &stats)
    }

    fn enemy_at(id: u32, pos: Vec2) -> Enemy {
        Enemy::new(id, EnemyKind::Tank, pos, &Tuning::default().enemies.tank)
    }

    #[test]
    fn test_fire_gate_rate_limit() {
        let rate = 1.5;
        let eps = 1e-3;
        let t = 10.0;
        let mut gate = FireGate::default();
        let fired: Vec<bool> = [t, t + f64::from(rate) - eps, t + f64::from(rate)]
            .iter()
            .map(|&now| gate.try_fire(now, rate))
            .collect();
        assert_eq!(fired, vec![true, false, true]);
        assert_eq!(gate.last_fire(), Some(t + 1.5));
    }

    #[test]
    fn test_projectile_expires_at_lifetime() {
        let stats = Tuning::default().weapons.laser;
        let mut p = Projectile::new(1, WeaponKind::Laser, Side::Player, Vec2::ZERO, Vec2::X, &stats);
        assert!(!update_projectile(&mut p, 0.25, &[], 2.0));
        assert!((p.pos.x - 300.0).abs() < 1e-3);
        assert!(update_projectile(&mut p, 0.25, &[], 2.0));
        // Expiry does not move the projectile
        assert!((p.pos.x - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_missile_flies_straight_without_target() {
        let mut p = missile(Vec2::ZERO, 0.0, Side::Player);
        let far = [enemy_at(2, Vec2::new(0.0, 400.0))];
        for _ in 0..10 {
            update_projectile(&mut p, 1.0 / 60.0, &far, 2.0);
        }
        assert_eq!(p.heading, 0.0);
        assert_eq!(p.pos.y, 0.0);
    }

    #[test]
    fn test_enemy_missile_never_homes() {
        let mut p = missile(Vec2::ZERO, 0.0, Side::Enemy);
        let near = [enemy_at(2, Vec2::new(0.0, 100.0))];
        update_projectile(&mut p, 1.0 / 60.0, &near, 2.0);
        assert_eq!(p.heading, 0.0);
    }

    #[test]
    fn test_acquire_picks_nearest_in_range() {
        let enemies = [
            enemy_at(1, Vec2::new(250.0, 0.0)),
            enemy_at(2, Vec2::new(0.0, 120.0)),
            enemy_at(3, Vec2::new(-299.0, 0.0)),
        ];
        assert_eq!(acquire_target(Vec2::ZERO, &enemies), Some(Vec2::new(0.0, 120.0)));
        // Exactly at the radius does not qualify
        let edge = [enemy_at(4, Vec2::new(300.0, 0.0))];
        assert_eq!(acquire_target(Vec2::ZERO, &edge), None);
    }

    #[test]
    fn test_missile_turns_toward_target() {
        let dt = 1.0 / 60.0;
        let target = Vec2::new(280.0, 0.0);
        let enemies = [enemy_at(2, target)];
        let mut p = missile(Vec2::ZERO, 0.3, Side::Player);
        let mut last_err = angle_diff(p.heading, bearing(p.pos, target)).abs();
        for _ in 0..5 {
            update_projectile(&mut p, dt, &enemies, 2.0);
            let err = angle_diff(p.heading, bearing(p.pos, target)).abs();
            assert!(err < last_err, "error grew: {err} >= {last_err}");
            last_err = err;
        }
        assert!((p.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_extreme_turn_rate_stays_bounded() {
        let h = steer_heading(0.0, 1.0, 1.0e12, 1.0 / 60.0);
        assert!(h.is_finite());
        assert!(h > -PI && h <= PI);
    }

    #[test]
    fn test_steer_across_wraparound() {
        // Heading just below +π, target just above -π: the short way is positive
        let h = steer_heading(PI - 0.1, -PI + 0.1, 2.0, 0.1);
        assert!(h > PI - 0.1 || h < -PI + 0.2);
        assert!(angle_diff(h, -PI + 0.1).abs() < 0.2);
    }

    proptest! {
        #[test]
        fn prop_steering_converges_without_overshoot(
            heading in -PI..PI,
            target in -PI..PI,
            turn_rate in 0.5f32..4.0,
        ) {
            let dt = 1.0 / 60.0;
            let mut h = heading;
            let mut err = angle_diff(h, target);
            prop_assume!(err.abs() > 1e-3);
            for _ in 0..30 {
                let next = steer_heading(h, target, turn_rate, dt);
                let next_err = angle_diff(next, target);
                // Same side of the target, strictly closer
                prop_assert!(next_err.abs() < err.abs());
                prop_assert!(next_err * err >= 0.0);
                // Never more than one tick's proportional turn
                prop_assert!(angle_diff(h, next).abs() <= err.abs() * turn_rate * dt + 1e-5);
                h = next;
                err = next_err;
            }
        }
    }

    #[test]
    fn test_ammo_consumption_and_auto_reload() {
        let mut ws = WeaponSystem::new(&Tuning::default().weapons);
        ws.switch_to(WeaponKind::Missile);
        for _ in 0..9 {
            assert!(ws.consume_ammo());
        }
        assert!(!ws.is_reloading());
        assert!(ws.consume_ammo());
        assert_eq!(ws.current_ammo(), 0);
        assert!(ws.is_reloading());
        assert!(!ws.consume_ammo());

        assert!(!ws.update_reload(2.0));
        assert!(ws.update_reload(1.0));
        assert_eq!(ws.current_ammo(), 10);
        assert!(ws.consume_ammo());
    }

    #[test]
    fn test_reload_survives_weapon_switch() {
        let mut ws = WeaponSystem::new(&Tuning::default().weapons);
        ws.switch_to(WeaponKind::Laser);
        for _ in 0..50 {
            ws.consume_ammo();
        }
        assert!(ws.is_reloading());
        ws.switch_to(WeaponKind::MachineGun);
        assert!(ws.is_reloading());
        assert!(!ws.consume_ammo());
        assert!(ws.update_reload(1.5));
        assert_eq!(ws.ammo(WeaponKind::Laser), 50);
        assert_eq!(ws.ammo(WeaponKind::MachineGun), 100);
    }

    #[test]
    fn test_add_ammo_clamps_to_capacity() {
        let mut ws = WeaponSystem::new(&Tuning::default().weapons);
        ws.consume_ammo();
        ws.consume_ammo();
        ws.add_ammo(WeaponKind::MachineGun, 500);
        assert_eq!(ws.ammo(WeaponKind::MachineGun), 100);
    }
}
