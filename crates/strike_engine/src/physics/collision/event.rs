//! Collision event records delivered to entity handlers

use crate::foundation::math::{Transform, Vec3};
use crate::scene::EntityId;

use super::collider::ColliderId;

/// One side's view of a confirmed collision
///
/// Built fresh per confirmed collision and delivered synchronously to the
/// owning entity's handler. `other_transform` is a snapshot taken at delivery
/// time, not a live reference, so the handler never reads state the other
/// side mutated after the event was built.
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    /// The entity on the other side of the collision
    pub other_entity: EntityId,

    /// The other entity's collider
    pub other_collider: ColliderId,

    /// Snapshot of the other entity's transform at the moment of collision
    pub other_transform: Transform,

    /// Best-effort world-space contact estimate
    ///
    /// Accurate for tests that compute a nearest point (sphere and box-sphere
    /// pairs, half-spaces); stale for AABB-AABB and OBB-OBB, which do not
    /// refine a contact.
    pub contact_point: Vec3,
}
