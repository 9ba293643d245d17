//! Headless skirmish demo
//!
//! Spawns a player sphere at the origin, a ring of enemy boxes closing in,
//! and a kill plane below the arena, then runs a fixed number of ticks.
//! Demonstrates staging, the per-tick collision pass, and synchronous event
//! delivery; run with `RUST_LOG=debug` for per-tick grid statistics.

use log::info;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use strike_engine::prelude::*;

const TICKS: u32 = 120;
const ENEMY_COUNT: usize = 4;
const ENEMY_SPEED: f32 = 0.05;

/// Player response: lose health on every contact
struct PlayerStatus {
    health: Arc<AtomicI32>,
}

impl CollisionHandler for PlayerStatus {
    fn on_collision(&mut self, _transform: &mut Transform, event: &CollisionEvent) {
        let health = self.health.fetch_sub(1, Ordering::SeqCst) - 1;
        info!(
            "player hit near {:?}, health now {health}",
            event.contact_point
        );
    }
}

/// Enemy response: bounce back from whatever was hit
struct EnemyBehavior;

impl CollisionHandler for EnemyBehavior {
    fn on_collision(&mut self, transform: &mut Transform, event: &CollisionEvent) {
        let away = transform.position - event.other_transform.position;
        if away.norm() > f32::EPSILON {
            transform.position += away.normalize() * 0.5;
        }
    }
}

fn main() {
    env_logger::init();

    let config = match CollisionConfig::load_from_file("skirmish.toml") {
        Ok(config) => config,
        Err(_) => CollisionConfig {
            max_object_scale: 2.0,
            grid_half_width: [30.0, 30.0, 30.0],
        },
    };

    let mut scene = Scene::new();
    let mut collision = CollisionSystem::new(&config).expect("collision config is valid");

    let player_health = Arc::new(AtomicI32::new(10));
    let player = scene.spawn_with_handler(
        "Player",
        Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
        Box::new(PlayerStatus {
            health: Arc::clone(&player_health),
        }),
    );
    let mut hurtbox = Collider::new(ShapeKind::Sphere, player);
    hurtbox.set_scale(Vec3::new(0.5, 0.5, 0.5));
    let hurtbox = collision.add_collider(hurtbox);
    collision.stage(hurtbox);

    // Kill plane below the arena, solid side down: rotate local +Z onto -Y.
    // Anything that sinks past y = -1 starts colliding with it.
    let plane_tilt = Quat::from_axis_angle(&Vec3::x_axis(), std::f32::consts::FRAC_PI_2);
    let kill_plane = scene.spawn(
        "KillPlane",
        Transform::from_position_rotation(Vec3::new(0.0, -1.0, 0.0), plane_tilt),
    );
    let plane_collider = collision.add_collider(Collider::new(ShapeKind::HalfSpace, kill_plane));
    collision.stage(plane_collider);

    let mut enemies = Vec::new();
    for i in 0..ENEMY_COUNT {
        let angle = i as f32 / ENEMY_COUNT as f32 * std::f32::consts::TAU;
        let position = Vec3::new(5.0 * angle.cos(), 1.0, 5.0 * angle.sin());
        let enemy = scene.spawn_with_handler(
            format!("Enemy {i}"),
            Transform::from_position(position),
            Box::new(EnemyBehavior),
        );
        let mut body = Collider::new(ShapeKind::Obb, enemy);
        body.set_scale(Vec3::new(0.4, 0.4, 0.4));
        let body = collision.add_collider(body);
        collision.stage(body);
        enemies.push(enemy);
    }

    info!(
        "skirmish start: {} entities, {} staged colliders",
        scene.len(),
        collision.staged_count()
    );

    for tick in 0..TICKS {
        // Gameplay step: enemies home in on the player's current position.
        let target = scene
            .get(player)
            .map(|entity| entity.transform.position)
            .unwrap_or_default();
        for &enemy in &enemies {
            if let Some(entity) = scene.get_mut(enemy) {
                let to_player = target - entity.transform.position;
                if to_player.norm() > f32::EPSILON {
                    entity.transform.position += to_player.normalize() * ENEMY_SPEED;
                }
            }
        }

        // Collision step, once per tick after entity updates.
        collision.update(&mut scene);

        if player_health.load(Ordering::SeqCst) <= 0 {
            info!("player down on tick {tick}");
            break;
        }
    }

    info!(
        "skirmish over: player health {}",
        player_health.load(Ordering::SeqCst)
    );
}
