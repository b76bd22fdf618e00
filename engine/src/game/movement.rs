//! Per-tick movement: ability timers, dash handling, landing and coyote
//! bookkeeping, gravity, integration and collision-box upkeep.

use crate::anim::Animation;
use crate::config::AbilityConfig;
use crate::ecs::component::{
    Action, AnimationRef, Buffer, Cooldowns, Dash, Ecb, Gravity, Input, Jump, PlayerState, State,
    Stuck, Transform,
};
use crate::ecs::entity::{Entity, Tag};
use crate::ecs::registry::Registry;
use crate::game::collision;
use crate::game::spawn;
use crate::game::state;
use crate::math::{Color, Vec2};

/// Horizontal dash speed in pixels per tick.
pub const DASH_SPEED: f32 = 15.0;
/// Frames the state machine locks while dashing.
pub const DASH_LOCK_FRAMES: i32 = 12;
/// Terminal fall speed.
pub const MAX_FALL_SPEED: f32 = 10.0;
/// Frames an afterimage lingers.
pub const TRAIL_LIFESPAN: i32 = 10;
/// Afterimage tint.
const TRAIL_TINT: Color = Color::rgba(0, 100, 255, 128);

/// A trail spawn deferred until iteration is done, so the source entity's
/// borrow can be released first.
struct TrailRequest {
    pos: Vec2,
    anim: Animation,
}

/// Advance every mobile entity one tick.
///
/// The player branch runs timers, dash and input resolution; everything with
/// gravity accelerates downward; stuck entities stay put; the rest translate
/// by velocity and drag their collision box along.
pub(crate) fn run(registry: &mut Registry, abilities: &AbilityConfig, frame: u64) {
    let platforms = collision::platform_extents(registry);
    let mut trails: Vec<TrailRequest> = Vec::new();

    for id in registry.ids() {
        let Some(entity) = registry.get_mut(id) else { continue };
        if !entity.has::<Transform>() || entity.tag() == Tag::Platform {
            continue;
        }

        if entity.tag() == Tag::Player && entity.has::<Input>() {
            entity.get_mut::<Buffer>().tick();
            entity.get_mut::<Cooldowns>().tick();
            entity.get_mut::<Dash>().tick();

            // An active dash overrides velocity every tick and sheds an
            // afterimage on even ticks, lock or no lock.
            if entity.get::<Dash>().active {
                let facing_right = entity.get::<State>().facing_right;
                let vel = &mut entity.get_mut::<Transform>().velocity;
                vel.y = 0.0;
                vel.x = if facing_right { DASH_SPEED } else { -DASH_SPEED };
                if frame % 2 == 0 {
                    trails.push(trail_request(entity.get::<Transform>().pos, entity));
                }
            }

            if entity.get::<State>().lock_frames > 0 {
                entity.get_mut::<State>().lock_frames -= 1;
                let trans = entity.get_mut::<Transform>();
                let next = trans.pos + trans.velocity;
                trans.pos = next;
                recenter_ecb(entity);
                continue;
            }

            let on_ground_now = collision::on_ground(entity.get::<Ecb>(), &platforms);
            if on_ground_now {
                state::handle_landing(entity, abilities.max_jumps);
                entity.get_mut::<Jump>().coyote_timer = abilities.coyote_frames;
            } else if entity.get::<Jump>().coyote_timer > 0 {
                entity.get_mut::<Jump>().coyote_timer -= 1;
            }

            if let Some(request) = handle_dash(entity, abilities, frame) {
                trails.push(request);
            }

            if !entity.get::<Dash>().active {
                state::resolve_player_input(entity, on_ground_now);
            }
        }

        if entity.has::<Gravity>() {
            let accel = entity.get::<Gravity>().accel;
            let vel = &mut entity.get_mut::<Transform>().velocity;
            vel.y = (vel.y + accel).min(MAX_FALL_SPEED);
        }

        if entity.has::<Stuck>() {
            entity.get_mut::<Transform>().velocity = Vec2::ZERO;
            continue;
        }

        let trans = entity.get_mut::<Transform>();
        let next = trans.pos + trans.velocity;
        trans.pos = next;

        recenter_ecb(entity);
    }

    for request in trails {
        spawn::trail(registry, request.pos, request.anim);
    }
}

/// Start a dash when requested and off cooldown. Returns a trail request if
/// the starting tick happens to be an even one.
fn handle_dash(
    entity: &mut Entity,
    abilities: &AbilityConfig,
    frame: u64,
) -> Option<TrailRequest> {
    let wants_dash =
        entity.get::<Input>().dash || entity.get::<Buffer>().contains(Action::Dash);
    if !wants_dash
        || !entity.get::<Cooldowns>().ready(Action::Dash)
        || entity.get::<Dash>().active
    {
        return None;
    }

    entity.get_mut::<Cooldowns>().reset(Action::Dash);
    entity.get_mut::<Dash>().start();
    entity.get_mut::<Buffer>().clear(Action::Dash);
    let state = entity.get_mut::<State>();
    state.state = PlayerState::Dashing;
    state.lock_frames = DASH_LOCK_FRAMES;

    let facing_right = entity.get::<State>().facing_right;
    let vel = &mut entity.get_mut::<Transform>().velocity;
    vel.y = 0.0;
    vel.x = if facing_right { DASH_SPEED } else { -DASH_SPEED };

    (frame % 2 == 0).then(|| trail_request(entity.get::<Transform>().pos, entity))
}

/// Snapshot the entity's current animation frame as a tinted afterimage.
fn trail_request(pos: Vec2, entity: &Entity) -> TrailRequest {
    let facing_right = entity.try_get::<State>().map_or(true, |s| s.facing_right);
    let mut anim = entity
        .try_get::<AnimationRef>()
        .map(|a| a.anim.clone())
        .unwrap_or_default();
    anim.scale = Vec2::new(if facing_right { 4.0 } else { -4.0 }, 4.0);
    anim.tint = TRAIL_TINT;
    anim.pos = pos;
    TrailRequest { pos, anim }
}

fn recenter_ecb(entity: &mut Entity) {
    let pos = entity.get::<Transform>().pos;
    if let Some(ecb) = entity.try_get_mut::<Ecb>() {
        ecb.recenter(pos);
    }
}
