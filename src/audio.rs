//! Sound effect mapping
//!
//! The simulation never plays audio. Hosts feed drained `GameEvent`s through an
//! `AudioManager`, which picks the effect and volume and hands them to whatever
//! `AudioSink` the platform provides.

use crate::sim::events::GameEvent;
use crate::sim::state::{AiState, WeaponKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    MachineGun,
    Missile,
    Laser,
    Explosion,
    /// Player took a hit
    Hit,
    PowerUp,
    /// An enemy spotted the player
    Alert,
}

impl SoundEffect {
    /// Asset name the platform layer loads
    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::MachineGun => "machine_gun",
            SoundEffect::Missile => "missile",
            SoundEffect::Laser => "laser",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Hit => "hit",
            SoundEffect::PowerUp => "powerup",
            SoundEffect::Alert => "alert",
        }
    }

    /// Per-effect mix level; rapid-fire weapons sit lower
    fn gain(self) -> f32 {
        match self {
            SoundEffect::MachineGun | SoundEffect::Laser => 0.5,
            SoundEffect::Alert => 0.7,
            _ => 1.0,
        }
    }
}

/// Platform audio output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Logs each effect at debug level; used by the headless driver
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {} @ {:.2}", effect.name(), volume);
    }
}

/// Effect for an event, if it makes a sound
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::ProjectileSpawned { weapon, .. } => Some(match weapon {
            WeaponKind::MachineGun => SoundEffect::MachineGun,
            WeaponKind::Missile => SoundEffect::Missile,
            WeaponKind::Laser => SoundEffect::Laser,
        }),
        GameEvent::Explosion { .. } => Some(SoundEffect::Explosion),
        GameEvent::PlayerDamaged { .. } => Some(SoundEffect::Hit),
        GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUp),
        GameEvent::EnemyStateChanged {
            from: AiState::Idle | AiState::Patrol,
            to: AiState::Chase,
            ..
        } => Some(SoundEffect::Alert),
        _ => None,
    }
}

/// Volume control in front of an injected sink
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume() * effect.gain();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play the sound for each event that has one, in order
    pub fn play_for_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(sound_for) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
