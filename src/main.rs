//! Cyber Strike headless driver
//!
//! Runs the opening encounter with scripted input and a naive overlap
//! broadphase, then prints the final snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use cyber_strike::Tuning;
    use cyber_strike::audio::{AudioManager, LogAudio};
    use cyber_strike::consts::SIM_DT;
    use cyber_strike::sim::{
        Body, Contact, EnemyKind, GamePhase, Side, TickInput, WeaponKind, World, tick,
    };
    use glam::Vec2;

    const PLAYER_RADIUS: f32 = 20.0;
    const PROJECTILE_RADIUS: f32 = 4.0;
    const POWER_UP_RADIUS: f32 = 15.0;
    const DEMO_TICKS: u32 = 60 * 30;

    fn enemy_radius(kind: EnemyKind) -> f32 {
        match kind {
            EnemyKind::Tank | EnemyKind::Turret => 25.0,
            EnemyKind::Chopper => 20.0,
            EnemyKind::Drone => 12.0,
        }
    }

    fn overlaps(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Vec2> {
        (a.distance(b) < ra + rb).then(|| a.lerp(b, ra / (ra + rb)))
    }

    /// Circle-overlap contacts. Reports every overlap each tick; the world
    /// ignores contacts for entities already consumed.
    fn detect_contacts(world: &World) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let player = world.player.pos;

        for p in &world.projectiles {
            match p.owner {
                Side::Player => {
                    for e in &world.enemies {
                        if let Some(point) = overlaps(p.pos, PROJECTILE_RADIUS, e.pos, enemy_radius(e.kind)) {
                            contacts.push(Contact::new(Body::Projectile(p.id), Body::Enemy(e.id), point));
                        }
                    }
                }
                Side::Enemy => {
                    if let Some(point) = overlaps(p.pos, PROJECTILE_RADIUS, player, PLAYER_RADIUS) {
                        contacts.push(Contact::new(Body::EnemyProjectile(p.id), Body::Player, point));
                    }
                }
            }
        }
        for e in &world.enemies {
            if let Some(point) = overlaps(player, PLAYER_RADIUS, e.pos, enemy_radius(e.kind)) {
                contacts.push(Contact::new(Body::Player, Body::Enemy(e.id), point));
            }
        }
        for u in &world.power_ups {
            if let Some(point) = overlaps(player, PLAYER_RADIUS, u.pos, POWER_UP_RADIUS) {
                contacts.push(Contact::new(Body::Player, Body::PowerUp(u.id), point));
            }
        }
        contacts
    }

    /// Aim at the nearest enemy and fire whenever one is in view
    fn scripted_input(world: &World, contacts: Vec<Contact>) -> TickInput {
        let player = world.player.pos;
        let target = world
            .enemies
            .iter()
            .min_by(|a, b| a.pos.distance_squared(player).total_cmp(&b.pos.distance_squared(player)));
        let aim = target.map_or(Vec2::ZERO, |e| (e.pos - player).normalize_or_zero());
        let switch_weapon = match world.time_ticks {
            600 => Some(WeaponKind::Missile),
            1200 => Some(WeaponKind::Laser),
            _ => None,
        };
        TickInput {
            movement: aim * 0.3,
            aim,
            firing: target.is_some_and(|e| e.pos.distance(player) < 600.0),
            switch_weapon,
            contacts,
            ..Default::default()
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let tuning = match std::env::var("CYBER_STRIKE_TUNING") {
            Ok(path) => Tuning::load_or_default(path),
            Err(_) => Tuning::default(),
        };
        let seed = std::env::var("CYBER_STRIKE_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0xC0FFEE);

        let mut world = World::with_tuning(seed, tuning);
        world.spawn_test_enemies();
        let mut audio = AudioManager::new(LogAudio);

        for _ in 0..DEMO_TICKS {
            let contacts = detect_contacts(&world);
            let input = scripted_input(&world, contacts);
            tick(&mut world, &input, SIM_DT);
            audio.play_for_events(&world.drain_events());

            if world.phase == GamePhase::GameOver || world.enemies.is_empty() {
                break;
            }
        }

        log::info!(
            "Demo finished after {} ticks: {} enemies left, player health {:.0}",
            world.time_ticks,
            world.enemies.len(),
            world.player.health
        );
        println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cyber Strike (headless) starting...");
    if let Err(e) = demo::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host; there is no standalone web entry point
}
