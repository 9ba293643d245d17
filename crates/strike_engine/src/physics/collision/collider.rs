//! Collider shapes attached to entities
//!
//! A collider stores its shape in entity-local space (offset, half-extents,
//! rotation) plus a back-reference to its owning entity. World-space values
//! are derived from the owner's live transform at query time and never
//! cached, so every test runs against the current frame's state.

use crate::foundation::math::{Mat3, Quat, Transform, Vec3};
use crate::scene::EntityId;

slotmap::new_key_type! {
    /// Stable handle to a collider in the [`CollisionSystem`] arena
    ///
    /// [`CollisionSystem`]: super::CollisionSystem
    pub struct ColliderId;
}

/// Geometric shape of a collider
///
/// Fixed at construction; changing a collider's shape would invalidate the
/// dispatch-table entry picked for it, so it is deliberately unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ShapeKind {
    /// Oriented bounding box
    Obb = 0,
    /// Axis-aligned bounding box
    Aabb = 1,
    /// Sphere (radius = max half-extent component)
    Sphere = 2,
    /// Infinite one-sided plane; solid on the side its local +Z points to
    HalfSpace = 3,
}

impl ShapeKind {
    /// Number of shape kinds, sizing the dispatch tables
    pub const COUNT: usize = 4;

    /// Ordinal used to index the dispatch tables
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A collision shape owned by exactly one entity
///
/// The owner is set at construction and never reassigned; colliders sharing
/// an owner are excluded from colliding with each other.
#[derive(Debug, Clone)]
pub struct Collider {
    kind: ShapeKind,
    offset: Vec3,
    scale: Vec3,
    rotation: Quat,
    owner: EntityId,
}

impl Collider {
    /// Create a collider with zero offset, unit scale, and identity rotation
    pub fn new(kind: ShapeKind, owner: EntityId) -> Self {
        Self {
            kind,
            offset: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation: Quat::identity(),
            owner,
        }
    }

    /// Create a collider with explicit local shape parameters
    pub fn with_shape(
        kind: ShapeKind,
        owner: EntityId,
        offset: Vec3,
        scale: Vec3,
        rotation: Quat,
    ) -> Self {
        Self {
            kind,
            offset,
            scale,
            rotation,
            owner,
        }
    }

    /// Shape kind, fixed at construction
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Offset from the owning entity's position, in entity-local space
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Half-extents (box shapes) or radius proxy (spheres)
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Local rotation, composed with the owner's rotation at query time
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Owning entity; every collider has exactly one
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Largest absolute half-extent component
    ///
    /// Used as the sphere radius and as the bounding-sphere proxy for grid
    /// insertion regardless of the actual shape.
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs())
    }

    /// Move the shape relative to its owner (e.g. recentering a hurtbox)
    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    /// Resize the shape (e.g. shrinking a damaged entity's hurtbox)
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }
}

/// A collider paired with its owner's live transform
///
/// All world-space queries go through this view so that derived values always
/// reflect the owner's current state.
#[derive(Clone, Copy)]
pub struct WorldCollider<'a> {
    /// The collider's local shape data
    pub collider: &'a Collider,
    /// The owning entity's transform for the current frame
    pub owner_transform: &'a Transform,
}

impl<'a> WorldCollider<'a> {
    /// Pair a collider with its owner's transform
    pub fn new(collider: &'a Collider, owner_transform: &'a Transform) -> Self {
        Self {
            collider,
            owner_transform,
        }
    }

    /// Shape kind of the underlying collider
    pub fn kind(&self) -> ShapeKind {
        self.collider.kind()
    }

    /// Half-extents of the underlying collider
    pub fn scale(&self) -> Vec3 {
        self.collider.scale()
    }

    /// Largest absolute half-extent component
    pub fn max_scale(&self) -> f32 {
        self.collider.max_scale()
    }

    /// World-space center: owner position plus local offset
    pub fn position(&self) -> Vec3 {
        self.owner_transform.position + self.collider.offset()
    }

    /// World rotation: owner rotation composed with the collider's local
    /// rotation
    pub fn rotation(&self) -> Quat {
        self.owner_transform.rotation * self.collider.rotation()
    }

    /// World rotation as a 3x3 basis matrix
    pub fn rotation_matrix(&self) -> Mat3 {
        self.rotation().to_rotation_matrix().into_inner()
    }

    /// One basis vector of the world rotation
    ///
    /// Column 2 is the outward normal for half-space colliders. Panics on a
    /// column index outside `0..3`; that is a wiring bug, not a runtime
    /// condition.
    pub fn basis(&self, col: usize) -> Vec3 {
        assert!(col < 3, "rotation basis column {col} out of range");
        self.rotation_matrix().column(col).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vector3;
    use approx::assert_relative_eq;

    fn owner_at(position: Vec3) -> Transform {
        Transform::from_position(position)
    }

    #[test]
    fn world_position_combines_owner_and_offset() {
        let owner = owner_at(Vec3::new(1.0, 2.0, 3.0));
        let mut collider = Collider::new(ShapeKind::Sphere, EntityId::default());
        collider.set_offset(Vec3::new(0.5, 0.0, -1.0));

        let view = WorldCollider::new(&collider, &owner);
        assert_relative_eq!(view.position(), Vec3::new(1.5, 2.0, 2.0));
    }

    #[test]
    fn max_scale_takes_largest_absolute_component() {
        let mut collider = Collider::new(ShapeKind::Aabb, EntityId::default());
        collider.set_scale(Vec3::new(0.5, -3.0, 1.0));
        assert_relative_eq!(collider.max_scale(), 3.0);
    }

    #[test]
    fn basis_columns_follow_composed_rotation() {
        // Owner yawed 90 degrees about +Y: right-handed, so local +X lands
        // on world -Z.
        let rotation = Quat::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2);
        let owner = Transform::from_position_rotation(Vec3::zeros(), rotation);
        let collider = Collider::new(ShapeKind::Obb, EntityId::default());
        let view = WorldCollider::new(&collider, &owner);

        let x_axis = view.basis(0);
        assert_relative_eq!(x_axis, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn basis_column_out_of_range_panics() {
        let owner = Transform::identity();
        let collider = Collider::new(ShapeKind::Obb, EntityId::default());
        WorldCollider::new(&collider, &owner).basis(3);
    }
}
