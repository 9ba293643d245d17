//! Entity storage and the collision-handler capability
//!
//! Entities live in a slotmap arena; `EntityId` keys stay stable for the
//! entity's whole lifetime, which gives the collision system the identity it
//! needs for same-owner exclusion. Collision response is a capability: an
//! entity opts in by installing a [`CollisionHandler`], instead of the engine
//! downcasting to concrete gameplay types.

use crate::foundation::math::Transform;
use crate::physics::collision::CollisionEvent;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to an entity in a [`Scene`]
    pub struct EntityId;
}

/// Synchronous collision-response capability
///
/// Handlers run inside the collision pass, one call per confirmed collision
/// per side. They may mutate their own state and the entity's transform
/// immediately; those mutations are visible to every pair test and handler
/// that runs later in the same tick. Handlers get no access to the scene or
/// the collision system, so staging changes made in response to a collision
/// must be deferred to the next tick by the game layer.
pub trait CollisionHandler: Send {
    /// Called once per confirmed collision involving the owning entity
    fn on_collision(&mut self, transform: &mut Transform, event: &CollisionEvent);
}

/// A game object with a world transform and an optional collision response
pub struct Entity {
    /// Display name, for logs and debugging
    pub name: String,

    /// Live world transform, read by the collision system at query time
    pub transform: Transform,

    handler: Option<Box<dyn CollisionHandler>>,
}

impl Entity {
    /// Create an entity with no collision response
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            handler: None,
        }
    }

    /// True if this entity reacts to collision events
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }
}

/// Arena of all live entities
#[derive(Default)]
pub struct Scene {
    entities: SlotMap<EntityId, Entity>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an entity and return its stable id
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> EntityId {
        self.entities.insert(Entity::new(name, transform))
    }

    /// Spawn an entity that reacts to collisions
    pub fn spawn_with_handler(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        handler: Box<dyn CollisionHandler>,
    ) -> EntityId {
        let mut entity = Entity::new(name, transform);
        entity.handler = Some(handler);
        self.entities.insert(entity)
    }

    /// Install or replace an entity's collision handler
    pub fn set_handler(&mut self, id: EntityId, handler: Box<dyn CollisionHandler>) {
        if let Some(entity) = self.entities.get_mut(id) {
            entity.handler = Some(handler);
        }
    }

    /// Remove an entity; its id becomes invalid
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(id)
    }

    /// Look up an entity
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Look up an entity mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if the scene holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Deliver a collision event to an entity's handler, if it has one
    ///
    /// The handler is taken out for the duration of the call so it can borrow
    /// the entity's transform mutably alongside its own state.
    pub fn notify(&mut self, id: EntityId, event: &CollisionEvent) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        if let Some(mut handler) = entity.handler.take() {
            handler.on_collision(&mut entity.transform, event);
            // Handler reinstalled after the call; despawn during delivery is
            // impossible because the scene is exclusively borrowed here.
            if let Some(entity) = self.entities.get_mut(id) {
                entity.handler = Some(handler);
            }
        }
    }
}
