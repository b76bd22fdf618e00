//! Read-only world introspection for a host's debug UI: entity listings,
//! the player snapshot and overlay toggles.

use crate::anim::Catalog;
use crate::ecs::component::{Buffer, Cooldowns, Jump, State, Transform};
use crate::ecs::entity::Tag;
use crate::ecs::registry::Registry;
use crate::math::Vec2;

/// Render overlay toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFlags {
    /// Draw collision-box polygons over everything.
    pub show_ecb: bool,
    /// Draw magenta hitbox outlines instead of attack fills.
    pub show_hitboxes: bool,
}

/// One row of the entity listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummary {
    pub id: u64,
    pub tag: Tag,
    pub pos: Option<Vec2>,
}

/// The player's control-relevant state, flattened for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub state: &'static str,
    pub facing_right: bool,
    pub jumps_left: i32,
    pub jump_released: bool,
    /// Action name and remaining frames, per cooldown slot.
    pub cooldowns: Vec<(&'static str, i32)>,
    /// Action name and remaining window frames, per buffered input.
    pub buffered: Vec<(&'static str, i32)>,
}

/// Every active entity with its position, in creation order.
pub fn entity_list(registry: &Registry) -> Vec<EntitySummary> {
    registry
        .iter_live()
        .filter(|e| e.is_active())
        .map(|e| EntitySummary {
            id: e.id().value(),
            tag: e.tag(),
            pos: e.try_get::<Transform>().map(|t| t.pos),
        })
        .collect()
}

/// Snapshot the player's state machine, jump resources, cooldowns and
/// buffered inputs. None when no player exists.
pub fn player_snapshot(registry: &Registry) -> Option<PlayerSnapshot> {
    let player = registry.first_by_tag(Tag::Player)?;
    let state = player.try_get::<State>()?;

    let mut cooldowns: Vec<(&'static str, i32)> = player
        .try_get::<Cooldowns>()
        .map(|cds| cds.iter().map(|(action, cd)| (action.as_str(), cd.remaining)).collect())
        .unwrap_or_default();
    cooldowns.sort_by_key(|(name, _)| *name);

    let buffered = player
        .try_get::<Buffer>()
        .map(|buffer| {
            buffer.iter().map(|b| (b.action.as_str(), b.frames_remaining)).collect()
        })
        .unwrap_or_default();

    let jump = player.try_get::<Jump>();
    Some(PlayerSnapshot {
        state: state.state.name(),
        facing_right: state.facing_right,
        jumps_left: jump.map_or(0, |j| j.jumps_left),
        jump_released: jump.is_none_or(|j| j.jump_released),
        cooldowns,
        buffered,
    })
}

/// The animation names a host can preview, sorted for stable display.
pub fn animation_names(catalog: &Catalog) -> Vec<String> {
    let mut names: Vec<String> = catalog.names().map(str::to_string).collect();
    names.sort();
    names
}
