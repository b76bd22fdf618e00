//! Entities: stable identities, coarse tags and the per-entity component
//! bundle.
//!
//! An [`Id`] is a monotonically increasing `u64` issued by the registry and
//! never reused within a world, so a stale id held across frames can never
//! silently alias a newer entity. A [`Tag`] is the coarse category used for
//! group queries (all platforms, all attacks). The [`Entity`] itself is a
//! thin record: id, tag, alive flag and a [`Bundle`] of components.

use std::fmt;

use crate::ecs::component::{Bundle, Component};

/// A unique, never-reused entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub u64);

impl Id {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse entity category for group queries and spawn bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Player,
    Enemy,
    Freya,
    Platform,
    Attack,
    Bone,
    Trail,
    Default,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Player => "player",
            Tag::Enemy => "enemy",
            Tag::Freya => "freya",
            Tag::Platform => "platform",
            Tag::Attack => "attack",
            Tag::Bone => "bone",
            Tag::Trail => "trail",
            Tag::Default => "default",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single simulated object: identity, tag, liveness and components.
///
/// Entities are only constructed by the registry; systems receive them by
/// reference and interact with components through the bundle forwarding
/// methods.
#[derive(Debug, Clone)]
pub struct Entity {
    id: Id,
    tag: Tag,
    active: bool,
    bundle: Bundle,
}

impl Entity {
    pub(crate) fn new(id: Id, tag: Tag) -> Self {
        Self { id, tag, active: true, bundle: Bundle::new() }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the entity for removal at the next registry commit.
    ///
    /// Destroying twice is tolerated but logged; it usually indicates two
    /// systems both claiming responsibility for the same kill.
    pub fn destroy(&mut self) {
        if !self.active {
            log::warn!("entity {} ({}) destroyed twice", self.id, self.tag);
            return;
        }
        self.active = false;
    }

    pub fn has<C: Component>(&self) -> bool {
        self.bundle.has::<C>()
    }

    pub fn insert<C: Component>(&mut self, value: C) -> &mut C {
        self.bundle.insert(value)
    }

    /// Borrow a component. Panics if absent; guard with [`Entity::has`].
    pub fn get<C: Component>(&self) -> &C {
        self.bundle.get::<C>()
    }

    /// Mutably borrow a component. Panics if absent; guard with [`Entity::has`].
    pub fn get_mut<C: Component>(&mut self) -> &mut C {
        self.bundle.get_mut::<C>()
    }

    pub fn try_get<C: Component>(&self) -> Option<&C> {
        self.bundle.try_get::<C>()
    }

    pub fn try_get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.bundle.try_get_mut::<C>()
    }

    pub fn remove<C: Component>(&mut self) {
        self.bundle.remove::<C>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::{Health, Transform};
    use crate::math::Vec2;

    #[test]
    fn new_entity_is_active_and_empty() {
        // Given
        let entity = Entity::new(Id(1), Tag::Enemy);

        // Then
        assert_eq!(entity.id(), Id(1));
        assert_eq!(entity.tag(), Tag::Enemy);
        assert!(entity.is_active());
        assert!(!entity.has::<Transform>());
    }

    #[test]
    fn destroy_clears_active_flag() {
        // Given
        let mut entity = Entity::new(Id(2), Tag::Attack);

        // When
        entity.destroy();

        // Then
        assert!(!entity.is_active());
    }

    #[test]
    fn destroy_twice_stays_inactive() {
        // Given
        let mut entity = Entity::new(Id(3), Tag::Bone);
        entity.destroy();

        // When - second destroy is a no-op (logged upstream)
        entity.destroy();

        // Then
        assert!(!entity.is_active());
    }

    #[test]
    fn components_forward_to_bundle() {
        // Given
        let mut entity = Entity::new(Id(4), Tag::Player);

        // When
        entity.insert(Transform::new(Vec2::new(3.0, 4.0), Vec2::ZERO, 0.0));
        entity.insert(Health::new(2));
        entity.get_mut::<Health>().current -= 1;

        // Then
        assert_eq!(entity.get::<Transform>().pos, Vec2::new(3.0, 4.0));
        assert_eq!(entity.get::<Health>().current, 1);

        // When
        entity.remove::<Health>();

        // Then
        assert!(!entity.has::<Health>());
    }
}
