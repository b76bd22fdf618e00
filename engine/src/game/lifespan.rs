//! Lifespan countdown: ticking, expiry and the bone-return rule.

use crate::ecs::component::Lifespan;
use crate::ecs::entity::Tag;
use crate::ecs::registry::Registry;

/// Tick every live entity's lifespan and destroy those that expired.
///
/// Returns true when an expiring bone hands possession back to the player.
pub(crate) fn run(registry: &mut Registry) -> bool {
    let mut bone_returned = false;

    for id in registry.ids() {
        let Some(entity) = registry.get_mut(id) else { continue };
        if !entity.is_active() || !entity.has::<Lifespan>() {
            continue;
        }

        let life = entity.get_mut::<Lifespan>();
        life.remaining -= 1;
        if life.remaining <= 0 {
            if entity.tag() == Tag::Bone {
                bone_returned = true;
            }
            entity.destroy();
        }
    }

    bone_returned
}
