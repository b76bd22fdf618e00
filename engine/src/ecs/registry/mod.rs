//! The entity registry: creation, lookup, group queries and the deferred
//! lifecycle.
//!
//! Lifecycle contract:
//! - [`Registry::create`] allocates the entity immediately so the caller can
//!   attach components and find it by tag in the same frame, but it does not
//!   join the live set until the next [`Registry::commit`].
//! - [`Entity::destroy`] only clears the active flag; the entity stays
//!   queryable (inactive) until the next commit physically removes it.
//! - [`Registry::commit`] runs once per frame before any system: it promotes
//!   pending entities and sweeps inactive ones, so within a frame every
//!   system observes the same population.
//!
//! Ids are monotonic and never reused. Iteration hands out id snapshots
//! rather than references, which keeps systems free to take mutable borrows
//! of individual entities mid-walk.

use std::collections::HashMap;

use crate::ecs::entity::{Entity, Id, Tag};

/// Ids above this are treated as evidence of memory corruption rather than a
/// legitimately long-lived world, and are skipped during the sweep.
pub const SANE_ID_LIMIT: u64 = 1_000_000;

/// Owner of every entity in the world.
#[derive(Debug, Default)]
pub struct Registry {
    entities: HashMap<Id, Entity>,
    live: Vec<Id>,
    pending: Vec<Id>,
    by_tag: HashMap<Tag, Vec<Id>>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity with the given tag.
    ///
    /// The entity is immediately retrievable via [`Registry::get`] and the
    /// tag index, but is excluded from the live set until the next commit.
    pub fn create(&mut self, tag: Tag) -> Id {
        let id = Id(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, tag));
        self.pending.push(id);
        self.by_tag.entry(tag).or_default().push(id);
        id
    }

    /// Promote pending entities into the live set and sweep out the dead.
    /// Called exactly once per frame, before any system runs.
    pub fn commit(&mut self) {
        self.live.append(&mut self.pending);

        // Partition rather than retain so removal can be logged per entity.
        let mut removed = Vec::new();
        self.live.retain(|&id| {
            if id.value() > SANE_ID_LIMIT {
                log::error!("entity id {id} exceeds sane limit, dropping from live set");
                return false;
            }
            match self.entities.get(&id) {
                Some(entity) if entity.is_active() => true,
                Some(_) => {
                    removed.push(id);
                    false
                }
                None => {
                    log::error!("live set held unknown entity id {id}");
                    false
                }
            }
        });

        for id in removed {
            if let Some(entity) = self.entities.remove(&id) {
                if let Some(ids) = self.by_tag.get_mut(&entity.tag()) {
                    ids.retain(|&other| other != id);
                }
            }
        }
    }

    pub fn get(&self, id: Id) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Snapshot of the live id list, in creation order.
    pub fn ids(&self) -> Vec<Id> {
        self.live.clone()
    }

    /// Snapshot of every id carrying the tag, pending entities included.
    pub fn ids_by_tag(&self, tag: Tag) -> Vec<Id> {
        self.by_tag.get(&tag).cloned().unwrap_or_default()
    }

    /// The oldest entity with the tag, if any. Used for singleton lookups
    /// such as the player.
    pub fn first_by_tag(&self, tag: Tag) -> Option<&Entity> {
        self.by_tag
            .get(&tag)
            .and_then(|ids| ids.first())
            .and_then(|id| self.entities.get(id))
    }

    /// Iterate live entities in creation order.
    pub fn iter_live(&self) -> impl Iterator<Item = &Entity> {
        self.live.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
