//! Deterministic combat simulation
//!
//! All gameplay logic lives here:
//! - Caller-supplied delta time, clamped per tick
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod contact;
pub mod events;
pub mod player;
pub mod state;
pub mod tick;
pub mod view;
pub mod weapon;

pub use ai::{AiContext, AiOutput, update_enemy};
pub use contact::{Body, Category, Contact};
pub use events::{ExplosionSize, GameEvent, RemovalReason};
pub use player::{Player, PlayerControls, PlayerHit};
pub use state::{
    AiState, Enemy, EnemyKind, EntityId, GamePhase, PowerUp, PowerUpKind, Projectile, Side,
    WeaponKind, World,
};
pub use tick::{TickInput, tick};
pub use view::Snapshot;
pub use weapon::{FireGate, FireRequest, WeaponSystem, acquire_target, steer_heading, update_projectile};
