//! Physics subsystems
//!
//! Currently collision detection only; the engine reports contacts but does
//! not resolve impulses.

pub mod collision;

pub use collision::{Collider, ColliderId, CollisionEvent, CollisionSystem, ShapeKind};
