//! # Strike Engine
//!
//! Collision detection core for a real-time 3D arcade shooter.
//!
//! ## Features
//!
//! - **Broad phase**: uniform hash grid rebuilt every tick
//! - **Narrow phase**: separating-axis tests for OBB, AABB, sphere, and
//!   half-space colliders, dispatched through fixed shape-pair tables
//! - **Synchronous events**: confirmed collisions are delivered to both
//!   owning entities within the same tick
//!
//! ## Quick Start
//!
//! ```rust
//! use strike_engine::prelude::*;
//!
//! let mut scene = Scene::new();
//! let player = scene.spawn("player", Transform::from_position(Vec3::zeros()));
//!
//! let config = CollisionConfig::default();
//! let mut collision = CollisionSystem::new(&config)?;
//! let hurtbox = collision.add_collider(Collider::new(ShapeKind::Sphere, player));
//! collision.stage(hurtbox);
//!
//! // Once per simulation tick, after entity updates:
//! collision.update(&mut scene);
//! # Ok::<(), strike_engine::core::config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::core::config::{CollisionConfig, ConfigError};
    pub use crate::foundation::math::{Quat, Transform, Vec3};
    pub use crate::physics::collision::{
        Collider, ColliderId, CollisionEvent, CollisionSystem, ShapeKind,
    };
    pub use crate::scene::{CollisionHandler, Entity, EntityId, Scene};
}
