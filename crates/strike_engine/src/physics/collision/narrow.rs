//! Narrow-phase intersection tests and their dispatch tables
//!
//! Every pair test is built on one separating-axis primitive: a candidate
//! world axis separates two shapes when the distance between their centers,
//! projected on the axis, exceeds the sum of both shapes' projected
//! half-extents ("radial" vectors). Radial projection is shape-specific and
//! looked up per shape kind; pair tests are looked up per ordered kind pair.
//!
//! Both lookups are fixed arrays indexed by [`ShapeKind`] ordinals, built
//! once when the collision system is constructed and read-only afterwards.

use super::collider::{ShapeKind, WorldCollider};
use crate::foundation::math::Vec3;

/// Shape-specific projection: a vector whose dot with the test axis
/// approximates the shape's half-extent along that axis
pub type RadialFn = fn(&WorldCollider, &Vec3) -> Vec3;

/// Narrow-phase test for one ordered shape-kind pair
///
/// Writes a world-space contact estimate through `contact` when the test
/// computes one; AABB-AABB and OBB-OBB report intersection without refining
/// a contact.
pub type NarrowPhaseFn = fn(&DispatchTables, &WorldCollider, &WorldCollider, &mut Vec3) -> bool;

/// Normalize, mapping degenerate axes to zero
///
/// A zero axis never separates (all projections are zero), which is exactly
/// the behavior wanted for coincident sphere centers and for cross products
/// of parallel OBB edges.
fn normalize_or_zero(axis: Vec3) -> Vec3 {
    axis.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
}

/// Componentwise sign, mapping each component to -1.0 or +1.0
fn signs(v: &Vec3) -> Vec3 {
    Vec3::new(
        if v.x < 0.0 { -1.0 } else { 1.0 },
        if v.y < 0.0 { -1.0 } else { 1.0 },
        if v.z < 0.0 { -1.0 } else { 1.0 },
    )
}

/// The separating-axis predicate
///
/// True when `axis` separates the two shapes, i.e. the projected center
/// distance exceeds the sum of projected radial extents.
pub fn axis_separates(
    a_center: Vec3,
    a_radial: Vec3,
    b_center: Vec3,
    b_radial: Vec3,
    axis: &Vec3,
) -> bool {
    let centers = axis.dot(&(a_center - b_center)).abs();
    let extents = axis.dot(&a_radial).abs() + axis.dot(&b_radial).abs();
    centers > extents
}

/// Pair-keyed and kind-keyed lookup tables for the narrow phase
///
/// All 16 ordered shape-kind combinations are populated; mirrored pairs
/// route to the shared implementation with swapped arguments, and the
/// half-space/half-space entry rejects unconditionally (two infinite
/// half-volumes are never reported as a collision).
pub struct DispatchTables {
    tests: [[NarrowPhaseFn; ShapeKind::COUNT]; ShapeKind::COUNT],
    radials: [RadialFn; ShapeKind::COUNT],
}

impl Default for DispatchTables {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchTables {
    /// Build the full 4x4 test table and the radial-projection table
    pub fn new() -> Self {
        // Start fully populated with the fail-safe, then register each pair.
        let mut tests: [[NarrowPhaseFn; ShapeKind::COUNT]; ShapeKind::COUNT] =
            [[reject; ShapeKind::COUNT]; ShapeKind::COUNT];

        let obb = ShapeKind::Obb.index();
        let aabb = ShapeKind::Aabb.index();
        let sphere = ShapeKind::Sphere.index();
        let half = ShapeKind::HalfSpace.index();

        tests[sphere][sphere] = sphere_v_sphere;
        tests[sphere][aabb] = sphere_v_aabb;
        tests[aabb][sphere] = aabb_v_sphere;
        tests[aabb][aabb] = aabb_v_aabb;
        tests[obb][obb] = obb_v_obb;
        tests[obb][sphere] = obb_v_sphere;
        tests[sphere][obb] = sphere_v_obb;
        // An AABB is a degenerate axis-aligned OBB for these paths.
        tests[obb][aabb] = obb_v_obb;
        tests[aabb][obb] = obb_v_obb;
        tests[half][aabb] = half_space_v_shape;
        tests[half][obb] = half_space_v_shape;
        tests[half][sphere] = half_space_v_shape;
        tests[aabb][half] = shape_v_half_space;
        tests[obb][half] = shape_v_half_space;
        tests[sphere][half] = shape_v_half_space;

        let mut radials: [RadialFn; ShapeKind::COUNT] = [radial_sphere; ShapeKind::COUNT];
        radials[obb] = radial_obb;
        radials[aabb] = radial_aabb;
        radials[sphere] = radial_sphere;
        radials[half] = radial_half_space;

        Self { tests, radials }
    }

    /// Run the narrow-phase test registered for this ordered kind pair
    pub fn test(&self, a: &WorldCollider, b: &WorldCollider, contact: &mut Vec3) -> bool {
        self.tests[a.kind().index()][b.kind().index()](self, a, b, contact)
    }

    /// Radial projection for a shape along a world axis
    pub fn radial(&self, shape: &WorldCollider, axis: &Vec3) -> Vec3 {
        self.radials[shape.kind().index()](shape, axis)
    }

    /// SAT test along one candidate axis using both shapes' radial
    /// projections; the axis is normalized first
    fn separated_along(&self, a: &WorldCollider, b: &WorldCollider, axis: Vec3) -> bool {
        let axis = normalize_or_zero(axis);
        let a_radial = self.radial(a, &axis);
        let b_radial = self.radial(b, &axis);
        axis_separates(a.position(), a_radial, b.position(), b_radial, &axis)
    }
}

// --- radial projections ---------------------------------------------------

fn radial_sphere(shape: &WorldCollider, axis: &Vec3) -> Vec3 {
    shape.max_scale() * axis
}

fn radial_aabb(shape: &WorldCollider, axis: &Vec3) -> Vec3 {
    signs(axis).component_mul(&shape.scale())
}

fn radial_obb(shape: &WorldCollider, axis: &Vec3) -> Vec3 {
    let rotation = shape.rotation_matrix();
    // Axis into OBB-local space, sign-extract against the local half-extents,
    // then back to world space.
    let local_axis = rotation.transpose() * axis;
    rotation * signs(&local_axis).component_mul(&shape.scale())
}

fn radial_half_space(_shape: &WorldCollider, _axis: &Vec3) -> Vec3 {
    // Half-spaces contribute no extent; they are tested one-sided.
    Vec3::zeros()
}

// --- nearest-point estimators ----------------------------------------------

/// Nearest point on an AABB to `center + rel`, recorded as the contact
fn nearest_on_aabb(aabb: &WorldCollider, rel: Vec3, contact: &mut Vec3) -> Vec3 {
    let h = aabb.scale();
    let clamped = Vec3::new(
        rel.x.clamp(-h.x, h.x),
        rel.y.clamp(-h.y, h.y),
        rel.z.clamp(-h.z, h.z),
    );
    let point = clamped + aabb.position();
    *contact = point;
    point
}

/// Nearest point on an OBB to `center + rel`, recorded as the contact
fn nearest_on_obb(obb: &WorldCollider, rel: Vec3, contact: &mut Vec3) -> Vec3 {
    let rotation = obb.rotation_matrix();
    let local = rotation.transpose() * rel;
    let h = obb.scale();
    let clamped = Vec3::new(
        local.x.clamp(-h.x, h.x),
        local.y.clamp(-h.y, h.y),
        local.z.clamp(-h.z, h.z),
    );
    let point = rotation * clamped + obb.position();
    *contact = point;
    point
}

/// Projection of the other shape's center onto the plane, recorded as the
/// contact
fn nearest_on_plane(plane: &WorldCollider, other: &WorldCollider, contact: &mut Vec3) -> Vec3 {
    let normal = normalize_or_zero(plane.basis(2));
    let rel = other.position() - plane.position();
    let point = other.position() - normal * normal.dot(&rel);
    *contact = point;
    point
}

// --- pair tests -------------------------------------------------------------

fn aabb_v_aabb(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    _contact: &mut Vec3,
) -> bool {
    for axis in [Vec3::z(), Vec3::y(), Vec3::x()] {
        if tables.separated_along(a, b, axis) {
            return false;
        }
    }
    // No contact estimate for box-box; callers get the last recorded point.
    true
}

fn sphere_v_sphere(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    contact: &mut Vec3,
) -> bool {
    let axis = a.position() - b.position();
    if tables.separated_along(a, b, axis) {
        return false;
    }
    *contact = a.position() + normalize_or_zero(axis) * a.max_scale();
    true
}

fn aabb_v_sphere(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    contact: &mut Vec3,
) -> bool {
    let rel = b.position() - a.position();
    let nearest = nearest_on_aabb(a, rel, contact);

    // One axis from the box's nearest point to the sphere center; the box
    // side contributes zero radius at that point.
    let axis = normalize_or_zero(nearest - b.position());
    let b_radial = tables.radial(b, &axis);
    !axis_separates(nearest, Vec3::zeros(), b.position(), b_radial, &axis)
}

fn sphere_v_aabb(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    contact: &mut Vec3,
) -> bool {
    aabb_v_sphere(tables, b, a, contact)
}

fn obb_v_obb(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    _contact: &mut Vec3,
) -> bool {
    // Classic 15-axis SAT: both boxes' face normals plus every pairwise edge
    // cross product. Parallel edges yield a zero axis, which never separates.
    for i in 0..3 {
        if tables.separated_along(a, b, a.basis(i)) {
            return false;
        }
        if tables.separated_along(a, b, b.basis(i)) {
            return false;
        }
        for j in 0..3 {
            if tables.separated_along(a, b, a.basis(i).cross(&b.basis(j))) {
                return false;
            }
        }
    }
    true
}

fn obb_v_sphere(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    contact: &mut Vec3,
) -> bool {
    let rel = b.position() - a.position();
    let nearest = nearest_on_obb(a, rel, contact);

    let axis = normalize_or_zero(b.position() - nearest);
    let b_radial = tables.radial(b, &axis);
    !axis_separates(nearest, Vec3::zeros(), b.position(), b_radial, &axis)
}

fn sphere_v_obb(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    contact: &mut Vec3,
) -> bool {
    obb_v_sphere(tables, b, a, contact)
}

fn half_space_v_shape(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    contact: &mut Vec3,
) -> bool {
    // The only candidate axis is the plane's outward normal.
    let axis = normalize_or_zero(a.basis(2));
    let a_radial = tables.radial(a, &axis);
    let b_radial = tables.radial(b, &axis);
    let nearest = nearest_on_plane(a, b, contact);

    if axis_separates(nearest, a_radial, b.position(), b_radial, &axis) {
        // Not touching the plane: still a collision if the shape's center is
        // anywhere inside the solid half-volume.
        return (b.position() - a.position()).dot(&axis) > 0.0;
    }
    true
}

fn shape_v_half_space(
    tables: &DispatchTables,
    a: &WorldCollider,
    b: &WorldCollider,
    contact: &mut Vec3,
) -> bool {
    half_space_v_shape(tables, b, a, contact)
}

fn reject(
    _tables: &DispatchTables,
    _a: &WorldCollider,
    _b: &WorldCollider,
    _contact: &mut Vec3,
) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform, Vector3};
    use crate::physics::collision::collider::Collider;
    use crate::scene::EntityId;
    use approx::assert_relative_eq;

    struct Fixture {
        collider: Collider,
        transform: Transform,
    }

    impl Fixture {
        fn new(kind: ShapeKind, position: Vec3, scale: Vec3) -> Self {
            let mut collider = Collider::new(kind, EntityId::default());
            collider.set_scale(scale);
            Self {
                collider,
                transform: Transform::from_position(position),
            }
        }

        fn rotated(kind: ShapeKind, position: Vec3, scale: Vec3, rotation: Quat) -> Self {
            let mut collider = Collider::new(kind, EntityId::default());
            collider.set_scale(scale);
            Self {
                collider,
                transform: Transform::from_position_rotation(position, rotation),
            }
        }

        fn view(&self) -> WorldCollider<'_> {
            WorldCollider::new(&self.collider, &self.transform)
        }
    }

    fn collides(tables: &DispatchTables, a: &Fixture, b: &Fixture) -> bool {
        let mut contact = Vec3::zeros();
        tables.test(&a.view(), &b.view(), &mut contact)
    }

    fn sphere(position: Vec3, radius: f32) -> Fixture {
        Fixture::new(ShapeKind::Sphere, position, Vec3::new(radius, radius, radius))
    }

    #[test]
    fn sphere_sphere_collides_inside_radius_sum() {
        let tables = DispatchTables::new();
        let a = sphere(Vec3::zeros(), 1.0);
        let near = sphere(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let far = sphere(Vec3::new(2.5, 0.0, 0.0), 1.0);

        assert!(collides(&tables, &a, &near));
        assert!(!collides(&tables, &a, &far));
    }

    #[test]
    fn coincident_spheres_collide() {
        let tables = DispatchTables::new();
        let a = sphere(Vec3::zeros(), 1.0);
        let b = sphere(Vec3::zeros(), 0.5);
        assert!(collides(&tables, &a, &b));
    }

    #[test]
    fn sphere_sphere_contact_lies_on_first_sphere() {
        let tables = DispatchTables::new();
        let a = sphere(Vec3::zeros(), 1.0);
        let b = sphere(Vec3::new(1.5, 0.0, 0.0), 1.0);

        let mut contact = Vec3::zeros();
        assert!(tables.test(&a.view(), &b.view(), &mut contact));
        // Axis is center_a - center_b, so the recorded point sits at radius
        // distance from a's center along that axis.
        assert_relative_eq!(contact, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn aabb_aabb_collides_within_summed_extents() {
        let tables = DispatchTables::new();
        let a = Fixture::new(ShapeKind::Aabb, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let near = Fixture::new(
            ShapeKind::Aabb,
            Vec3::new(1.9, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let far = Fixture::new(
            ShapeKind::Aabb,
            Vec3::new(2.1, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        );

        assert!(collides(&tables, &a, &near));
        assert!(!collides(&tables, &a, &far));
    }

    #[test]
    fn aabb_sphere_uses_nearest_point_on_box() {
        let tables = DispatchTables::new();
        let box_ = Fixture::new(ShapeKind::Aabb, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let touching = sphere(Vec3::new(1.4, 0.0, 0.0), 0.5);
        let separated = sphere(Vec3::new(1.6, 0.0, 0.0), 0.5);

        assert!(collides(&tables, &box_, &touching));
        assert!(!collides(&tables, &box_, &separated));

        // The recorded contact is the nearest point on the box face.
        let mut contact = Vec3::zeros();
        assert!(tables.test(&box_.view(), &touching.view(), &mut contact));
        assert_relative_eq!(contact, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn obb_obb_respects_rotated_extents() {
        let tables = DispatchTables::new();
        let identity = Fixture::new(ShapeKind::Obb, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let spin = Quat::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_4);

        // A 45-degree box projects sqrt(2) onto X, so contact range ends at
        // 1 + sqrt(2) ~= 2.414.
        let touching = Fixture::rotated(
            ShapeKind::Obb,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            spin,
        );
        let separated = Fixture::rotated(
            ShapeKind::Obb,
            Vec3::new(2.7, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            spin,
        );

        assert!(collides(&tables, &identity, &touching));
        assert!(!collides(&tables, &identity, &separated));
    }

    #[test]
    fn obb_sphere_uses_nearest_point_in_obb_space() {
        let tables = DispatchTables::new();
        let spin = Quat::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_4);
        let obb = Fixture::rotated(
            ShapeKind::Obb,
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            spin,
        );
        // Along world X the rotated box reaches sqrt(2) ~= 1.414.
        let touching = sphere(Vec3::new(1.8, 0.0, 0.0), 0.5);
        let separated = sphere(Vec3::new(2.0, 0.0, 0.0), 0.5);

        assert!(collides(&tables, &obb, &touching));
        assert!(!collides(&tables, &obb, &separated));
    }

    #[test]
    fn aabb_routes_through_obb_path_against_obb() {
        let tables = DispatchTables::new();
        let aabb = Fixture::new(ShapeKind::Aabb, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let obb = Fixture::new(
            ShapeKind::Obb,
            Vec3::new(1.9, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        assert!(collides(&tables, &aabb, &obb));
        assert!(collides(&tables, &obb, &aabb));
    }

    #[test]
    fn half_space_is_one_sided() {
        let tables = DispatchTables::new();
        // Identity rotation: outward normal is +Z.
        let plane = Fixture::new(ShapeKind::HalfSpace, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

        let just_above = sphere(Vec3::new(0.0, 0.0, 0.1), 0.5);
        let deep_inside = sphere(Vec3::new(0.0, 0.0, 5.0), 0.5);
        let far_below = sphere(Vec3::new(0.0, 0.0, -5.0), 0.5);

        assert!(collides(&tables, &plane, &just_above));
        assert!(collides(&tables, &plane, &deep_inside));
        assert!(!collides(&tables, &plane, &far_below));
    }

    #[test]
    fn half_space_against_boxes() {
        let tables = DispatchTables::new();
        let plane = Fixture::new(ShapeKind::HalfSpace, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let box_above = Fixture::new(
            ShapeKind::Aabb,
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let box_below = Fixture::new(
            ShapeKind::Obb,
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::new(1.0, 1.0, 1.0),
        );

        assert!(collides(&tables, &plane, &box_above));
        assert!(!collides(&tables, &plane, &box_below));
    }

    #[test]
    fn two_half_spaces_never_collide() {
        let tables = DispatchTables::new();
        let a = Fixture::new(ShapeKind::HalfSpace, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let b = Fixture::new(ShapeKind::HalfSpace, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        assert!(!collides(&tables, &a, &b));
    }

    #[test]
    fn results_are_symmetric_across_shape_pairs() {
        let tables = DispatchTables::new();
        let spin = Quat::from_axis_angle(&Vector3::y_axis(), 0.7);
        let fixtures = [
            sphere(Vec3::new(0.3, 0.2, 0.0), 0.8),
            Fixture::new(ShapeKind::Aabb, Vec3::new(1.0, 0.0, 0.5), Vec3::new(1.0, 0.5, 1.0)),
            Fixture::rotated(
                ShapeKind::Obb,
                Vec3::new(-0.5, 0.4, 0.0),
                Vec3::new(0.7, 0.7, 0.7),
                spin,
            ),
            Fixture::new(ShapeKind::HalfSpace, Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 1.0)),
            sphere(Vec3::new(6.0, 6.0, 6.0), 0.3),
        ];

        for (i, a) in fixtures.iter().enumerate() {
            for b in fixtures.iter().skip(i + 1) {
                assert_eq!(
                    collides(&tables, a, b),
                    collides(&tables, b, a),
                    "asymmetric result for kinds {:?} vs {:?}",
                    a.collider.kind(),
                    b.collider.kind()
                );
            }
        }
    }
}
