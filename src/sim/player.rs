//! Player helicopter: movement, fuel, firing, damage and pickups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{PowerUpKind, Side, WeaponKind};
use super::weapon::{FireGate, FireRequest, WeaponSystem};
use crate::consts::PLAYER_MUZZLE_OFFSET;
use crate::tuning::{PlayerTuning, WeaponTable};
use crate::{angle_diff, heading_vec, wrap_angle};

/// Fraction of the aim error closed per tick, scaled by rotation speed
const AIM_SMOOTHING: f32 = 0.1;

/// Per-tick control input for the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerControls {
    /// Movement stick, components in [-1, 1]
    pub movement: Vec2,
    /// Aim direction; zero leaves rotation unchanged
    pub aim: Vec2,
    pub firing: bool,
}

/// Outcome of a hit on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerHit {
    /// Invulnerable or already destroyed
    Ignored,
    Damaged,
    /// This hit took health to zero
    Destroyed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading (radians); shots leave along it
    pub rotation: f32,
    pub health: f32,
    pub armor: f32,
    pub fuel: f32,
    pub energy: f32,
    pub weapon: WeaponKind,
    pub weapons: WeaponSystem,
    pub fire_gate: FireGate,
    /// Seconds of invulnerability left
    pub invulnerable_for: f32,
    pub destroyed: bool,
    limits: PlayerTuning,
    fire_rates: [f32; 3],
}

impl Player {
    pub fn new(tuning: &PlayerTuning, weapons: &WeaponTable) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            health: tuning.max_health,
            armor: tuning.max_armor,
            fuel: tuning.max_fuel,
            energy: tuning.max_energy,
            weapon: WeaponKind::MachineGun,
            weapons: WeaponSystem::new(weapons),
            fire_gate: FireGate::default(),
            invulnerable_for: 0.0,
            destroyed: false,
            limits: tuning.clone(),
            fire_rates: [
                weapons.machine_gun.fire_rate,
                weapons.missile.fire_rate,
                weapons.laser.fire_rate,
            ],
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    /// Advance one tick. Returns the shot to spawn, if any.
    pub fn update(&mut self, controls: &PlayerControls, dt: f32, now: f64) -> Option<FireRequest> {
        if self.destroyed {
            return None;
        }

        self.invulnerable_for = (self.invulnerable_for - dt).max(0.0);
        self.update_movement(controls.movement, dt);
        self.update_rotation(controls.aim);
        self.update_fuel(dt);
        self.weapons.update_reload(dt);

        if !controls.firing {
            return None;
        }
        let rate = self.fire_rates[self.weapon.index()];
        if !self.fire_gate.try_fire(now, rate) {
            return None;
        }

        let dir = heading_vec(self.rotation);
        // Recoil shows up in next tick's movement
        self.vel -= dir * self.limits.recoil;
        Some(FireRequest {
            origin: self.pos + dir * PLAYER_MUZZLE_OFFSET,
            dir,
            weapon: self.weapon,
            owner: Side::Player,
        })
    }

    fn update_movement(&mut self, movement: Vec2, dt: f32) {
        if movement != Vec2::ZERO {
            self.vel += movement * self.limits.acceleration * dt;
            self.vel = self.vel.clamp_length_max(self.limits.max_speed);
        }
        self.vel *= self.limits.friction;
        if self.vel.length() < self.limits.stop_speed {
            self.vel = Vec2::ZERO;
        }
        self.pos += self.vel * dt;
    }

    fn update_rotation(&mut self, aim: Vec2) {
        if aim == Vec2::ZERO {
            return;
        }
        let target = aim.y.atan2(aim.x);
        let diff = angle_diff(self.rotation, target);
        self.rotation = wrap_angle(self.rotation + diff * self.limits.rotation_speed * AIM_SMOOTHING);
    }

    fn update_fuel(&mut self, dt: f32) {
        self.fuel = (self.fuel - self.limits.fuel_burn * dt).max(0.0);
        if self.fuel <= 0.0 {
            self.vel *= self.limits.out_of_fuel_drag;
        }
    }

    /// Apply a hit. Armor soaks up to half of it; the rest comes off health.
    pub fn take_damage(&mut self, amount: f32) -> PlayerHit {
        if self.destroyed || self.is_invulnerable() {
            return PlayerHit::Ignored;
        }

        let absorbed = self.armor.min(amount * self.limits.armor_absorption);
        self.armor -= absorbed;
        self.health = (self.health - (amount - absorbed)).max(0.0);
        self.invulnerable_for = self.limits.invulnerability;

        if self.health <= 0.0 {
            self.destroyed = true;
            self.vel = Vec2::ZERO;
            return PlayerHit::Destroyed;
        }
        PlayerHit::Damaged
    }

    /// Apply a pickup, clamping each stat to its max
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        let l = &self.limits;
        match kind {
            PowerUpKind::Health => self.health = (self.health + l.health_pickup).min(l.max_health),
            PowerUpKind::Armor => self.armor = (self.armor + l.armor_pickup).min(l.max_armor),
            PowerUpKind::Fuel => self.fuel = (self.fuel + l.fuel_pickup).min(l.max_fuel),
            PowerUpKind::Energy => self.energy = (self.energy + l.energy_pickup).min(l.max_energy),
            // Collected but no effect
            PowerUpKind::Ammo | PowerUpKind::WeaponUpgrade => {}
        }
    }

    /// Select the active weapon; the fire gate is shared across weapons
    pub fn switch_weapon(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
        self.weapons.switch_to(weapon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn player() -> Player {
        let t = Tuning::default();
        Player::new(&t.player, &t.weapons)
    }

    fn idle() -> PlayerControls {
        PlayerControls::default()
    }

    #[test]
    fn test_movement_accelerates_and_clamps() {
        let mut p = player();
        let controls = PlayerControls {
            movement: Vec2::X,
            ..idle()
        };
        p.update(&controls, DT, 0.0);
        // 400 * dt = 6.67, then friction
        assert!((p.vel.x - 400.0 * DT * 0.92).abs() < 1e-3);
        assert!(p.pos.x > 0.0);

        for i in 0..600 {
            p.update(&controls, DT, f64::from(i) * 0.1);
        }
        assert!(p.vel.length() <= 300.0 * 0.92 + 1e-3);
    }

    #[test]
    fn test_friction_brings_player_to_rest() {
        let mut p = player();
        p.vel = Vec2::new(100.0, 0.0);
        let mut ticks = 0;
        while p.vel != Vec2::ZERO && ticks < 200 {
            p.update(&idle(), DT, 0.0);
            ticks += 1;
        }
        assert_eq!(p.vel, Vec2::ZERO);
        assert!(ticks < 50);
    }

    #[test]
    fn test_rotation_smooths_toward_aim() {
        let mut p = player();
        let controls = PlayerControls {
            aim: Vec2::Y,
            ..idle()
        };
        p.update(&controls, DT, 0.0);
        // 0.3 of the error closed per tick
        assert!((p.rotation - std::f32::consts::FRAC_PI_2 * 0.3).abs() < 1e-5);
        for _ in 0..60 {
            p.update(&controls, DT, 0.0);
        }
        assert!((p.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_fuel_burns_and_runs_out() {
        let mut p = player();
        p.update(&idle(), 0.5, 0.0);
        assert!((p.fuel - 99.0).abs() < 1e-4);

        p.fuel = 0.01;
        p.vel = Vec2::new(200.0, 0.0);
        p.update(&idle(), DT, 0.0);
        assert_eq!(p.fuel, 0.0);
        assert!((p.vel.x - 200.0 * 0.92 * 0.95).abs() < 1e-3);
    }

    #[test]
    fn test_firing_is_gated_and_recoils() {
        let mut p = player();
        let controls = PlayerControls {
            firing: true,
            ..idle()
        };
        let shot = p.update(&controls, DT, 1.0).expect("first shot");
        assert_eq!(shot.owner, Side::Player);
        assert_eq!(shot.weapon, WeaponKind::MachineGun);
        assert!((shot.origin - Vec2::new(30.0, 0.0)).length() < 1e-4);
        assert!((p.vel.x + 20.0).abs() < 1e-4);

        // Machine gun fires every 0.1 s
        assert!(p.update(&controls, DT, 1.05).is_none());
        assert!(p.update(&controls, DT, 1.25).is_some());

        p.switch_weapon(WeaponKind::Missile);
        assert!(p.update(&controls, DT, 1.5).is_none());
        let shot = p.update(&controls, DT, 1.8).expect("missile");
        assert_eq!(shot.weapon, WeaponKind::Missile);
    }

    #[test]
    fn test_armor_absorbs_half_and_grants_invulnerability() {
        let mut p = player();
        assert_eq!(p.take_damage(20.0), PlayerHit::Damaged);
        assert_eq!(p.armor, 40.0);
        assert_eq!(p.health, 90.0);
        assert!(p.is_invulnerable());

        assert_eq!(p.take_damage(20.0), PlayerHit::Ignored);
        assert_eq!(p.health, 90.0);

        p.update(&idle(), 0.3, 0.0);
        p.update(&idle(), 0.3, 0.0);
        assert!(!p.is_invulnerable());

        // Armor soaks only what it has left
        p.armor = 4.0;
        assert_eq!(p.take_damage(20.0), PlayerHit::Damaged);
        assert_eq!(p.armor, 0.0);
        assert_eq!(p.health, 74.0);
    }

    #[test]
    fn test_lethal_hit_destroys_once() {
        let mut p = player();
        p.armor = 0.0;
        assert_eq!(p.take_damage(150.0), PlayerHit::Destroyed);
        assert_eq!(p.health, 0.0);
        assert!(p.destroyed);
        p.invulnerable_for = 0.0;
        assert_eq!(p.take_damage(10.0), PlayerHit::Ignored);
        assert!(p.update(&PlayerControls { firing: true, ..idle() }, DT, 5.0).is_none());
    }

    #[test]
    fn test_power_ups_clamp_to_max() {
        let mut p = player();
        p.health = 90.0;
        p.fuel = 20.0;
        p.armor = 0.0;
        p.apply_power_up(PowerUpKind::Health);
        p.apply_power_up(PowerUpKind::Fuel);
        p.apply_power_up(PowerUpKind::Armor);
        assert_eq!(p.health, 100.0);
        assert_eq!(p.fuel, 50.0);
        assert_eq!(p.armor, 25.0);

        let before = p.clone();
        p.apply_power_up(PowerUpKind::Ammo);
        p.apply_power_up(PowerUpKind::WeaponUpgrade);
        assert_eq!(p.health, before.health);
        assert_eq!(p.weapons.current_ammo(), before.weapons.current_ammo());
    }

    proptest! {
        #[test]
        fn prop_player_stats_stay_in_range(hits in proptest::collection::vec(0.0f32..80.0, 0..12)) {
            let mut p = player();
            for h in hits {
                p.take_damage(h);
                p.invulnerable_for = 0.0;
                prop_assert!(p.health >= 0.0 && p.health <= 100.0);
                prop_assert!(p.armor >= 0.0 && p.armor <= 50.0);
                prop_assert_eq!(p.destroyed, p.health <= 0.0);
            }
        }
    }
}
