//! Animation driving: state-to-clip selection, clip swapping, per-tick
//! playback and the unlock that fires when a one-shot clip ends.

use crate::anim::Catalog;
use crate::ecs::component::{AnimationRef, Ecb, PlayerState, State, Transform};
use crate::ecs::entity::{Entity, Tag};
use crate::ecs::registry::Registry;
use crate::game::collision::{self, PlatformExtent};
use crate::math::Vec2;

/// Uniform sprite scale for the player and most entities.
const SPRITE_SCALE: f32 = 4.0;
/// Freya sprites are normalized to this on-screen height instead.
const FREYA_HEIGHT: f32 = 80.0;

/// The clip name for a player state. Without the bone, every clip swaps to
/// its `_boneless` variant.
pub fn player_clip(state: PlayerState, has_bone: bool) -> String {
    let base = match state {
        PlayerState::Idle => "idle",
        PlayerState::RunningStart => "dashstart",
        PlayerState::Running => "dash",
        PlayerState::RunningStop => "dashstop",
        PlayerState::RunningTurn => "dashturn",
        PlayerState::Jump1 => "jump",
        PlayerState::Jump2 => "doublejump",
        PlayerState::Falling => "fall",
        PlayerState::Dashing => "dattack",
        PlayerState::Attacking => "ftilt",
    };
    if has_bone { base.to_string() } else { format!("{base}_boneless") }
}

/// The clip name for a freya state. Freya only distinguishes idle, walk and
/// attack.
pub fn freya_clip(state: PlayerState) -> &'static str {
    match state {
        PlayerState::Running => "freya_walk",
        PlayerState::Attacking => "freya_attack",
        _ => "freya_idle",
    }
}

/// Drive every animated entity one tick.
pub(crate) fn run(registry: &mut Registry, catalog: &Catalog, player_has_bone: bool) {
    let platforms = collision::platform_extents(registry);

    for id in registry.ids() {
        let Some(entity) = registry.get_mut(id) else { continue };
        if !entity.is_active() || !entity.has::<AnimationRef>() || !entity.has::<Transform>() {
            continue;
        }

        if entity.has::<State>() {
            let state = *entity.get::<State>();
            let desired = if entity.tag() == Tag::Freya {
                freya_clip(state.state).to_string()
            } else {
                player_clip(state.state, player_has_bone)
            };

            let current = entity.get::<AnimationRef>().name.clone();
            if desired != current && catalog.contains(&desired) {
                if let Some(anim) = catalog.instantiate(&desired) {
                    entity.insert(AnimationRef::new(anim, desired));
                }
            }

            // Facing flips the horizontal scale
            let scale = if entity.tag() == Tag::Freya {
                let height = entity.get::<AnimationRef>().anim.strip.frame_size.y;
                if height > 0.0 { FREYA_HEIGHT / height } else { 1.0 }
            } else {
                SPRITE_SCALE
            };
            let anim = &mut entity.get_mut::<AnimationRef>().anim;
            anim.scale = Vec2::new(if state.facing_right { scale } else { -scale }, scale);
        }

        if entity.tag() == Tag::Bone {
            entity.get_mut::<AnimationRef>().anim.scale = Vec2::new(SPRITE_SCALE, SPRITE_SCALE);
        }

        // Trails never advance: they hold the frame they captured
        if entity.tag() != Tag::Trail {
            entity.get_mut::<AnimationRef>().anim.update();
        }

        let (pos, angle) = {
            let trans = entity.get::<Transform>();
            (trans.pos, trans.angle)
        };
        let anim = &mut entity.get_mut::<AnimationRef>().anim;
        anim.pos = pos;
        anim.angle = angle;

        if entity.has::<State>() {
            unlock_after_one_shot(entity, &platforms);
        }
    }
}

/// When a one-shot clip finishes, drop the state lock and settle into the
/// state matching the current motion.
fn unlock_after_one_shot(entity: &mut Entity, platforms: &[PlatformExtent]) {
    let anim = &entity.get::<AnimationRef>().anim;
    if anim.looping || !anim.finished() {
        return;
    }

    let on_ground_now = entity
        .try_get::<Ecb>()
        .is_some_and(|ecb| collision::on_ground(ecb, platforms));
    let vel = entity.get::<Transform>().velocity;

    let state = entity.get_mut::<State>();
    state.lock_frames = 0;
    if !on_ground_now && vel.y > 0.0 {
        state.state = PlayerState::Falling;
    } else if on_ground_now && vel.x == 0.0 {
        state.state = PlayerState::Idle;
    } else if on_ground_now && vel.x != 0.0 {
        state.state = PlayerState::Running;
    }
}
