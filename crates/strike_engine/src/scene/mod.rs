//! Scene and entity management
//!
//! The collision core does not own gameplay. This module provides the minimal
//! entity collaborator contract it needs: a stable identity, a live world
//! transform, and a synchronous collision-handler entry point.

pub mod entity;

pub use entity::{CollisionHandler, Entity, EntityId, Scene};
