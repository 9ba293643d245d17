//! Uniform hash grid for broad-phase candidate pairing
//!
//! The grid covers `[-half_width, +half_width]` in world space and is cleared
//! and rebuilt from the active collider set every tick; it carries no state
//! across frames and never owns colliders, only their arena handles.
//!
//! Cell resolution is derived from the configured maximum object scale so
//! that no object spans much more than one cell width, which bounds how many
//! buckets a single collider can land in.

use super::collider::ColliderId;
use crate::foundation::math::Vec3;
use std::collections::HashMap;

/// Sparse uniform grid keyed by integer cell hash
///
/// Out-of-bounds policy: cell coordinates are *not* clamped to the configured
/// extent. A collider outside the grid volume hashes into buckets that may be
/// unused (detection silently degrades for it) or that alias an in-range cell
/// (the narrow phase rejects the spurious candidates). Either way insertion
/// never panics; off-grid objects lose collision detection rather than
/// crashing the frame.
pub struct SpatialGrid {
    cols: i32,
    half_width: Vec3,
    cells: HashMap<i32, Vec<ColliderId>>,
}

impl SpatialGrid {
    /// Create a grid sized so one cell is roughly `max_object_scale` wide
    ///
    /// Panics on non-positive inputs; the [`CollisionConfig`] validation
    /// rejects those before they can reach here.
    ///
    /// [`CollisionConfig`]: crate::core::config::CollisionConfig
    pub fn new(max_object_scale: f32, half_width: Vec3) -> Self {
        assert!(
            max_object_scale > 0.0,
            "max_object_scale must be positive"
        );
        assert!(
            half_width.x > 0.0 && half_width.y > 0.0 && half_width.z > 0.0,
            "grid half_width must be positive on every axis"
        );

        let cols = ((half_width.x / max_object_scale) as i32).max(1);
        Self {
            cols,
            half_width,
            cells: HashMap::new(),
        }
    }

    /// Cells per axis
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Half-extent of the covered volume
    pub fn half_width(&self) -> Vec3 {
        self.half_width
    }

    /// Empty every bucket
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Hash for integer cell coordinates
    pub fn cell_hash(&self, i: i32, j: i32, k: i32) -> i32 {
        i + self.cols * j + self.cols * self.cols * k
    }

    /// Insert a collider handle into every cell its bounding box overlaps
    ///
    /// The box is `2 * half_extent` centered at `center`; the covered integer
    /// cell range is inclusive on both ends, so a collider straddling a cell
    /// boundary lands in every neighboring bucket (conservative, duplicates
    /// candidate pairs rather than missing them).
    pub fn insert(&mut self, center: Vec3, half_extent: Vec3, id: ColliderId) {
        let cols = self.cols as f32;
        let to_cell = |world: Vec3| -> Vec3 {
            (world + self.half_width)
                .component_mul(&Vec3::new(cols, cols, cols))
                .component_div(&(2.0 * self.half_width))
        };
        let lo = to_cell(center - half_extent);
        let hi = to_cell(center + half_extent);

        for i in lo.x as i32..=hi.x as i32 {
            for j in lo.y as i32..=hi.y as i32 {
                for k in lo.z as i32..=hi.z as i32 {
                    let hash = self.cell_hash(i, j, k);
                    self.cells.entry(hash).or_default().push(id);
                }
            }
        }
    }

    /// Contents of one bucket; empty slice if the cell is unoccupied
    pub fn bucket(&self, hash: i32) -> &[ColliderId] {
        self.cells.get(&hash).map_or(&[], Vec::as_slice)
    }

    /// Iterate over every occupied bucket
    pub fn buckets(&self) -> impl Iterator<Item = &Vec<ColliderId>> {
        self.cells.values()
    }

    /// Number of occupied cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}
