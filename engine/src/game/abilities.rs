//! The cooldown-gated abilities: melee attack and the bone throw.
//!
//! Both follow the same shape: check the transition policy, fire if the
//! input is held or buffered and the cooldown is ready, then spawn the
//! resulting entity and lock the player into the attacking state. Hit
//! resolution and projectile landing run every tick regardless of whether
//! anything fired.

use crate::anim::Catalog;
use crate::config::AbilityConfig;
use crate::ecs::component::{
    Action, AnimationRef, Buffer, Collision, Cooldowns, Ecb, Gravity, Health, Input, PlayerState,
    Shape, State, Stuck, Transform,
};
use crate::ecs::entity::Tag;
use crate::ecs::registry::Registry;
use crate::game::collision::{self, aabb_overlap};
use crate::game::spawn;
use crate::game::state::TransitionPolicy;
use crate::math::Vec2;

/// Frames the player locks into the attacking state after firing.
pub const ATTACK_LOCK_FRAMES: i32 = 20;
/// Horizontal spawn offset in front of the player.
pub const SPAWN_OFFSET: f32 = 40.0;

/// Outcome of the bone-throw system, surfaced so the possession flag can
/// live on the game rather than in here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoneThrowOutcome {
    pub thrown: bool,
}

/// Fire a melee attack if requested, then resolve hits for every live
/// attack hitbox against every enemy.
pub(crate) fn attack(registry: &mut Registry, policy: TransitionPolicy) {
    if let Some(player_id) = registry.first_by_tag(Tag::Player).map(|p| p.id()) {
        let mut spawn_at: Option<Vec2> = None;
        if let Some(p) = registry.get_mut(player_id) {
            let state = *p.get::<State>();
            let wants_attack =
                p.get::<Input>().attack || p.get::<Buffer>().contains(Action::Attack);

            if policy.allows(state.state, PlayerState::Attacking)
                && wants_attack
                && p.get::<Cooldowns>().ready(Action::Attack)
            {
                p.get_mut::<Cooldowns>().reset(Action::Attack);
                p.get_mut::<Buffer>().clear(Action::Attack);

                let offset = if state.facing_right { SPAWN_OFFSET } else { -SPAWN_OFFSET };
                spawn_at = Some(p.get::<Transform>().pos + Vec2::new(offset, 0.0));

                let state = p.get_mut::<State>();
                state.state = PlayerState::Attacking;
                state.lock_frames = ATTACK_LOCK_FRAMES;
            }
        }
        if let Some(pos) = spawn_at {
            spawn::attack_hitbox(registry, pos);
        }
    }

    resolve_hits(registry);
}

/// Every attack hitbox damages the first enemy it overlaps, then expires.
fn resolve_hits(registry: &mut Registry) {
    for attack_id in registry.ids_by_tag(Tag::Attack) {
        let Some(attack) = registry.get(attack_id) else { continue };
        let Some(attack_pos) = attack.try_get::<Transform>().map(|t| t.pos) else { continue };
        let Some(attack_size) = attack.try_get::<Shape>().map(Shape::rect_size) else { continue };

        for enemy_id in registry.ids_by_tag(Tag::Enemy) {
            let Some(enemy) = registry.get_mut(enemy_id) else { continue };
            if !enemy.has::<Health>() || !enemy.has::<Transform>() || !enemy.has::<Shape>() {
                continue;
            }

            let enemy_pos = enemy.get::<Transform>().pos;
            let enemy_size = enemy.get::<Shape>().rect_size();
            if !aabb_overlap(attack_pos, attack_size, enemy_pos, enemy_size) {
                continue;
            }

            let health = enemy.get_mut::<Health>();
            health.current -= 1;
            if health.current <= 0 {
                enemy.destroy();
            }

            if let Some(attack) = registry.get_mut(attack_id) {
                attack.destroy();
            }
            break;
        }
    }
}

/// Throw the bone if the player still holds it and requested the throw,
/// then land any airborne bones that reached the ground.
pub(crate) fn bone_throw(
    registry: &mut Registry,
    catalog: &Catalog,
    abilities: &AbilityConfig,
    policy: TransitionPolicy,
    player_has_bone: bool,
) -> BoneThrowOutcome {
    let mut outcome = BoneThrowOutcome { thrown: false };

    if player_has_bone {
        if let Some(player_id) = registry.first_by_tag(Tag::Player).map(|p| p.id()) {
            let mut launch: Option<(Vec2, Vec2)> = None;
            if let Some(p) = registry.get_mut(player_id) {
                let state = *p.get::<State>();
                let wants_throw =
                    p.get::<Input>().throw || p.get::<Buffer>().contains(Action::BoneThrow);

                if policy.allows(state.state, PlayerState::Attacking)
                    && wants_throw
                    && p.get::<Cooldowns>().ready(Action::BoneThrow)
                {
                    p.get_mut::<Input>().throw = false;
                    p.get_mut::<Buffer>().clear(Action::BoneThrow);
                    p.get_mut::<Cooldowns>().reset(Action::BoneThrow);

                    let player_state = p.get_mut::<State>();
                    player_state.state = PlayerState::Attacking;
                    player_state.lock_frames = ATTACK_LOCK_FRAMES;

                    let cfg = &abilities.bone_throw;
                    if let Some(anim) = catalog.instantiate(&cfg.player_animation) {
                        p.insert(AnimationRef::new(anim, cfg.player_animation.clone()));
                    }

                    let offset = if state.facing_right { SPAWN_OFFSET } else { -SPAWN_OFFSET };
                    let pos = p.get::<Transform>().pos + Vec2::new(offset, 0.0);
                    let mut velocity =
                        Vec2::new(cfg.projectile_velocity[0], cfg.projectile_velocity[1]);
                    if !state.facing_right {
                        velocity.x = -velocity.x;
                    }
                    launch = Some((pos, velocity));
                }
            }
            if let Some((pos, velocity)) = launch {
                spawn::bone(registry, catalog, abilities, pos, velocity);
                outcome.thrown = true;
            }
        }
    }

    land_bones(registry, catalog, abilities);
    outcome
}

/// A bone that reaches a platform top freezes there and swaps to its resting
/// art. Movement and collision stop touching it once it is stuck.
fn land_bones(registry: &mut Registry, catalog: &Catalog, abilities: &AbilityConfig) {
    let platforms = collision::platform_extents(registry);

    for id in registry.ids_by_tag(Tag::Bone) {
        let Some(bone) = registry.get_mut(id) else { continue };
        if !bone.has::<Transform>() || !bone.has::<Ecb>() || bone.has::<Stuck>() {
            continue;
        }
        if !collision::on_ground(bone.get::<Ecb>(), &platforms) {
            continue;
        }

        bone.get_mut::<Transform>().velocity = Vec2::ZERO;
        bone.insert(Stuck);
        bone.remove::<Gravity>();
        bone.remove::<Collision>();

        let resting = &abilities.bone_throw.projectile_animation;
        if let Some(mut anim) = catalog.instantiate(resting) {
            anim.scale = Vec2::new(4.0, 4.0);
            if let Some(anim_ref) = bone.try_get_mut::<AnimationRef>() {
                anim_ref.anim = anim;
            }
        }
    }
}
