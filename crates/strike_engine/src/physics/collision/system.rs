//! Collision orchestration: staging, broad phase, narrow phase, delivery
//!
//! One [`CollisionSystem`] exists per running game. It is constructed
//! explicitly and passed where needed instead of living behind a global
//! singleton; "exactly one" is an ownership property of the game loop, not
//! something the type enforces at a distance.

use super::collider::{Collider, ColliderId, WorldCollider};
use super::event::CollisionEvent;
use super::grid::SpatialGrid;
use super::narrow::DispatchTables;
use crate::core::config::{CollisionConfig, ConfigError};
use crate::foundation::math::Vec3;
use crate::scene::Scene;
use log::{debug, info, trace, warn};
use slotmap::SlotMap;

/// Owner of the collider arena, the broad-phase grid, and the narrow-phase
/// dispatch tables
///
/// Call [`update`](Self::update) once per simulation tick, after entity
/// updates and before rendering. The pass is single-threaded and synchronous:
/// confirmed collisions are delivered to both owning entities' handlers
/// immediately, so a handler's mutations are visible to every pair test that
/// runs later in the same pass.
///
/// Handlers cannot reach the system while it is updating (the borrow rules
/// forbid it), so staging or unstaging in response to a collision must be
/// queued by the game layer and applied before the next tick.
pub struct CollisionSystem {
    grid: SpatialGrid,
    tables: DispatchTables,
    colliders: SlotMap<ColliderId, Collider>,
    staged: Vec<ColliderId>,
    contact_point: Vec3,
}

impl CollisionSystem {
    /// Build the system from validated configuration
    ///
    /// The grid and both dispatch tables are constructed exactly once, here.
    pub fn new(config: &CollisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = SpatialGrid::new(config.max_object_scale, config.half_width());
        info!(
            "collision system ready: {} cells per axis over half-width {:?}",
            grid.cols(),
            config.grid_half_width
        );

        Ok(Self {
            grid,
            tables: DispatchTables::new(),
            colliders: SlotMap::with_key(),
            staged: Vec::new(),
            contact_point: Vec3::zeros(),
        })
    }

    /// Add a collider to the arena; it stays inert until staged
    pub fn add_collider(&mut self, collider: Collider) -> ColliderId {
        self.colliders.insert(collider)
    }

    /// Remove a collider, unstaging it first
    pub fn remove_collider(&mut self, id: ColliderId) -> Option<Collider> {
        self.unstage(id);
        self.colliders.remove(id)
    }

    /// Look up a collider
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    /// Look up a collider mutably (offset/scale tweaks)
    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(id)
    }

    /// Mark a collider active for collision detection
    pub fn stage(&mut self, id: ColliderId) {
        self.staged.push(id);
    }

    /// Remove a collider from the active set
    ///
    /// Swap-removes every occurrence; the order of the remaining staged
    /// colliders is not preserved.
    pub fn unstage(&mut self, id: ColliderId) {
        let mut i = 0;
        while i < self.staged.len() {
            if self.staged[i] == id {
                self.staged.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Number of colliders currently staged
    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    /// Contact estimate recorded by the most recent confirmed test
    pub fn last_contact(&self) -> Vec3 {
        self.contact_point
    }

    /// Run one full collision pass
    ///
    /// Clears and rebuilds the grid from the staged set, then tests every
    /// unordered collider pair sharing a grid cell and delivers events for
    /// confirmed collisions to both owners, synchronously. A pair straddling
    /// several cells is tested (and its handlers fired) once per shared cell;
    /// duplicates are tolerated rather than deduplicated.
    pub fn update(&mut self, scene: &mut Scene) {
        self.grid.clear();
        for &id in &self.staged {
            let Some(collider) = self.colliders.get(id) else {
                continue;
            };
            let Some(owner) = scene.get(collider.owner()) else {
                warn!("staged collider {id:?} has a despawned owner; skipping");
                continue;
            };
            let view = WorldCollider::new(collider, &owner.transform);
            // Bounding-sphere proxy regardless of shape: a cube of the max
            // half-extent always covers the collider.
            let proxy = Vec3::repeat(collider.max_scale());
            self.grid.insert(view.position(), proxy, id);
        }
        debug!(
            "collision pass: {} staged colliders in {} occupied cells",
            self.staged.len(),
            self.grid.occupied_cells()
        );

        for bucket in self.grid.buckets() {
            for i in 0..bucket.len() {
                for j in (i + 1)..bucket.len() {
                    let (id_a, id_b) = (bucket[i], bucket[j]);
                    let (Some(a), Some(b)) = (self.colliders.get(id_a), self.colliders.get(id_b))
                    else {
                        continue;
                    };
                    // Child colliders of one entity never collide with each
                    // other.
                    if a.owner() == b.owner() {
                        continue;
                    }
                    let (owner_a, owner_b) = (a.owner(), b.owner());

                    // Transforms are re-read per pair: an earlier handler in
                    // this same pass may have moved either entity.
                    let (Some(entity_a), Some(entity_b)) = (scene.get(owner_a), scene.get(owner_b))
                    else {
                        continue;
                    };
                    let transform_a = entity_a.transform.clone();
                    let transform_b = entity_b.transform.clone();
                    let view_a = WorldCollider::new(a, &transform_a);
                    let view_b = WorldCollider::new(b, &transform_b);

                    if !self.tables.test(&view_a, &view_b, &mut self.contact_point) {
                        continue;
                    }
                    trace!(
                        "collision: {:?} ({:?}) vs {:?} ({:?}) at {:?}",
                        owner_a,
                        a.kind(),
                        owner_b,
                        b.kind(),
                        self.contact_point
                    );

                    // Each side gets a snapshot of the other side taken right
                    // before its own delivery, so the second event observes
                    // anything the first handler mutated.
                    let event_a = CollisionEvent {
                        other_entity: owner_b,
                        other_collider: id_b,
                        other_transform: transform_b,
                        contact_point: self.contact_point,
                    };
                    scene.notify(owner_a, &event_a);

                    let Some(entity_a) = scene.get(owner_a) else {
                        continue;
                    };
                    let event_b = CollisionEvent {
                        other_entity: owner_a,
                        other_collider: id_a,
                        other_transform: entity_a.transform.clone(),
                        contact_point: self.contact_point,
                    };
                    scene.notify(owner_b, &event_b);
                }
            }
        }
    }

    /// Narrow-phase test for one explicit pair
    ///
    /// Returns false for unknown colliders and for colliders sharing an
    /// owner. On a confirmed collision the contact estimate is readable via
    /// [`last_contact`](Self::last_contact).
    pub fn test_pair(&mut self, id_a: ColliderId, id_b: ColliderId, scene: &Scene) -> bool {
        let (Some(a), Some(b)) = (self.colliders.get(id_a), self.colliders.get(id_b)) else {
            return false;
        };
        if a.owner() == b.owner() {
            return false;
        }
        let (Some(entity_a), Some(entity_b)) = (scene.get(a.owner()), scene.get(b.owner())) else {
            return false;
        };
        let view_a = WorldCollider::new(a, &entity_a.transform);
        let view_b = WorldCollider::new(b, &entity_b.transform);
        self.tables.test(&view_a, &view_b, &mut self.contact_point)
    }
}
