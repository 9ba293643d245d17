//! Collision detection core
//!
//! Two-phase collision detection for a real-time arcade shooter:
//!
//! - broad phase: a uniform hash grid rebuilt every tick buckets colliders by
//!   the cells their bounding sphere overlaps ([`grid::SpatialGrid`]);
//! - narrow phase: separating-axis tests per shape-pair, dispatched through a
//!   fixed 4x4 table of function pointers ([`narrow`]);
//! - orchestration: [`system::CollisionSystem`] owns the collider arena, the
//!   grid, and the dispatch tables, and delivers [`CollisionEvent`]s to both
//!   owning entities synchronously within the tick.

pub mod collider;
pub mod event;
pub mod grid;
pub mod narrow;
pub mod system;

pub use collider::{Collider, ColliderId, ShapeKind, WorldCollider};
pub use event::CollisionEvent;
pub use grid::SpatialGrid;
pub use system::CollisionSystem;
