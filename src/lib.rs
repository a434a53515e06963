//! Cyber Strike - combat simulation core for a top-down helicopter shooter
//!
//! Core modules:
//! - `sim`: Simulation (enemy AI, projectiles, contact resolution, world state)
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound effect mapping behind an injected sink

pub mod audio;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest delta time a single tick may integrate (seconds)
    pub const MAX_DT: f32 = 1.0 / 30.0;
    /// Nominal frame step used by the demo driver
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Enemy muzzle offset along the firing direction
    pub const ENEMY_MUZZLE_OFFSET: f32 = 25.0;
    /// Player muzzle offset along the helicopter's rotation
    pub const PLAYER_MUZZLE_OFFSET: f32 = 30.0;

    /// Default patrol radius for freshly spawned enemies
    pub const PATROL_RADIUS: f32 = 200.0;
    /// Wander targets sit on a circle of patrol_radius * this factor
    pub const WANDER_RADIUS_FACTOR: f32 = 0.5;
    /// A wander target closer than this counts as reached
    pub const WANDER_ARRIVAL_DISTANCE: f32 = 10.0;

    /// Chase gives up beyond detection_range * this
    pub const CHASE_EXIT_FACTOR: f32 = 1.5;
    /// Attack falls back to chase beyond attack_range * this
    pub const ATTACK_EXIT_FACTOR: f32 = 1.2;

    /// Missiles only acquire enemies strictly closer than this
    pub const MISSILE_ACQUISITION_RADIUS: f32 = 300.0;
    /// Projectiles fade out over the last N seconds of their lifetime
    pub const PROJECTILE_FADE_WINDOW: f32 = 0.3;

    /// Projectiles farther than this from the camera anchor are culled
    pub const CLEANUP_DISTANCE: f32 = 1500.0;

    /// Ring used by the test encounter
    pub const TEST_ENEMY_COUNT: usize = 5;
    pub const TEST_ENEMY_RING_RADIUS: f32 = 400.0;
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in (-π, π]
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Bearing (radians) of `to` as seen from `from`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wrap_angle_boundaries() {
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_angle_huge_input_terminates() {
        for a in [1.0e9_f32, -1.0e9, 3.0e38, -3.0e38] {
            let w = wrap_angle(a);
            assert!(w > -PI - 1e-5 && w <= PI + 1e-5, "{a} wrapped to {w}");
        }
        assert!(wrap_angle(f32::INFINITY).is_nan());
    }

    #[test]
    fn test_bearing_axes() {
        assert!(bearing(Vec2::ZERO, Vec2::new(10.0, 0.0)).abs() < 1e-6);
        assert!((bearing(Vec2::ZERO, Vec2::new(0.0, 5.0)) - PI / 2.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_wrap_angle_in_range(a in -100.0f32..100.0) {
            let w = wrap_angle(a);
            prop_assert!(w > -PI - 1e-5 && w <= PI + 1e-5);
            // Same direction on the unit circle
            prop_assert!((w.cos() - a.cos()).abs() < 1e-3);
            prop_assert!((w.sin() - a.sin()).abs() < 1e-3);
        }
    }
}
