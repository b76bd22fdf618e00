//! Entity archetype spawners and the built-in test level.
//!
//! Spawners attach the full component set for their archetype in one place
//! so systems can assume a consistent shape per tag. All of them go through
//! the registry's deferred create, so a spawned entity participates from the
//! next tick on.

use crate::anim::{Animation, Catalog};
use crate::config::AbilityConfig;
use crate::ecs::component::{
    Action, AnimationRef, Buffer, Collision, Cooldowns, Dash, Ecb, Gravity, Health, Input, Jump,
    Lifespan, PlayerState, Shape, State, Transform,
};
use crate::ecs::entity::{Id, Tag};
use crate::ecs::registry::Registry;
use crate::game::movement::{DASH_LOCK_FRAMES, TRAIL_LIFESPAN};
use crate::math::{Color, Vec2};

/// Downward acceleration shared by everything that falls.
pub const GRAVITY_ACCEL: f32 = 0.5;
/// Player collision diamond.
pub const PLAYER_ECB: Vec2 = Vec2 { x: 40.0, y: 80.0 };
/// Large enemy collision diamond.
pub const FREYA_ECB: Vec2 = Vec2 { x: 40.0, y: 120.0 };
/// Frames an attack hitbox persists.
pub const ATTACK_LIFESPAN: i32 = 7;
/// Attack hitbox dimensions.
pub const ATTACK_SIZE: Vec2 = Vec2 { x: 60.0, y: 120.0 };

/// The player with the full movement/ability component set.
pub fn player(registry: &mut Registry, catalog: &Catalog, abilities: &AbilityConfig) -> Id {
    let pos = Vec2::new(100.0, 100.0);
    let id = registry.create(Tag::Player);
    let p = registry.get_mut(id).expect("entity just created");

    p.insert(Transform::new(pos, Vec2::ZERO, 0.0));
    p.insert(Input::default());
    p.insert(Dash::new(DASH_LOCK_FRAMES));
    p.insert(State::new(PlayerState::Idle));
    p.insert(Gravity::new(GRAVITY_ACCEL));
    p.insert(Collision::new(0.0));
    p.insert(Jump::with_charges(abilities.max_jumps));
    p.insert(Buffer::default());

    let mut cooldowns = Cooldowns::default();
    cooldowns.add(Action::Dash, abilities.dash_cooldown);
    cooldowns.add(Action::Attack, abilities.attack_cooldown);
    cooldowns.add(Action::BoneThrow, abilities.bone_throw_cooldown);
    p.insert(cooldowns);

    let idle = catalog.instantiate("idle").unwrap_or_default();
    // Debug outline sized to the scaled sprite
    let frame_size = idle.strip.frame_size * 4.0;
    p.insert(Shape::rect(frame_size, Color::TRANSPARENT, Color::WHITE, 0.0));
    p.insert(AnimationRef::new(idle, "idle"));
    p.insert(Ecb::diamond(pos, PLAYER_ECB.x, PLAYER_ECB.y));

    id
}

/// A static platform. Its rectangle shape doubles as its collision extent.
pub fn platform(registry: &mut Registry, pos: Vec2, size: Vec2) -> Id {
    let id = registry.create(Tag::Platform);
    let p = registry.get_mut(id).expect("entity just created");
    p.insert(Transform::new(pos, Vec2::ZERO, 0.0));
    p.insert(Shape::rect(size, Color::BLUE, Color::WHITE, 2.0));
    p.insert(Collision::new(0.0));
    id
}

/// A basic target enemy.
pub fn enemy(registry: &mut Registry, pos: Vec2, size: Vec2, health: i32) -> Id {
    let id = registry.create(Tag::Enemy);
    let e = registry.get_mut(id).expect("entity just created");
    e.insert(Transform::new(pos, Vec2::ZERO, 0.0));
    e.insert(Shape::rect(size, Color::GREEN, Color::BLACK, 2.0));
    e.insert(Health::new(health));
    e.insert(Gravity::new(GRAVITY_ACCEL));
    e.insert(Collision::new(0.0));
    id
}

/// The large animated enemy.
pub fn freya(registry: &mut Registry, catalog: &Catalog, pos: Vec2, health: i32) -> Id {
    let id = registry.create(Tag::Freya);
    let f = registry.get_mut(id).expect("entity just created");

    f.insert(Health::new(health));
    f.insert(Gravity::new(GRAVITY_ACCEL));
    f.insert(Collision::default());
    f.insert(State::new(PlayerState::Idle));
    f.insert(Transform::new(pos, Vec2::ZERO, 0.0));

    let idle = catalog.instantiate("freya_idle").unwrap_or_default();
    let frame_size = idle.strip.frame_size;
    f.insert(Shape::rect(frame_size, Color::TRANSPARENT, Color::WHITE, 0.0));
    f.insert(AnimationRef::new(idle, "freya_idle"));
    f.insert(Ecb::diamond(pos, FREYA_ECB.x, FREYA_ECB.y));

    id
}

/// A short-lived melee hitbox in front of the attacker.
pub fn attack_hitbox(registry: &mut Registry, pos: Vec2) -> Id {
    let id = registry.create(Tag::Attack);
    let a = registry.get_mut(id).expect("entity just created");
    a.insert(Transform::new(pos, Vec2::ZERO, 0.0));
    a.insert(Shape::rect(ATTACK_SIZE, Color::RED, Color::WHITE, 1.0));
    a.insert(Lifespan::new(ATTACK_LIFESPAN));
    id
}

/// A tinted afterimage snapshot left behind by a dash.
pub fn trail(registry: &mut Registry, pos: Vec2, anim: Animation) -> Id {
    let id = registry.create(Tag::Trail);
    let t = registry.get_mut(id).expect("entity just created");
    t.insert(Transform::new(pos, Vec2::ZERO, 0.0));
    t.insert(AnimationRef::new(anim, "trail"));
    t.insert(Lifespan::new(TRAIL_LIFESPAN));
    id
}

/// The thrown bone projectile.
pub fn bone(
    registry: &mut Registry,
    catalog: &Catalog,
    abilities: &AbilityConfig,
    pos: Vec2,
    velocity: Vec2,
) -> Id {
    let cfg = &abilities.bone_throw;
    let id = registry.create(Tag::Bone);
    let b = registry.get_mut(id).expect("entity just created");

    b.insert(Transform::new(pos, velocity, 0.0));
    b.insert(Lifespan::new(cfg.lifespan));
    b.insert(Collision::default());
    b.insert(Gravity::new(GRAVITY_ACCEL));

    match catalog.instantiate(&cfg.projectile_animation) {
        Some(mut anim) => {
            anim.scale = Vec2::new(4.0, 4.0);
            b.insert(AnimationRef::new(anim, cfg.projectile_animation.clone()));
        }
        None => {
            b.insert(Shape::rect(Vec2::new(60.0, 60.0), Color::WHITE, Color::WHITE, 1.0));
        }
    }

    b.insert(Ecb::triangle(pos, cfg.ecb[0], cfg.ecb[1]));
    id
}

/// Populate the registry with the built-in level: floor, ascending platform
/// columns and a spread of enemies.
pub fn test_level(registry: &mut Registry, catalog: &Catalog, abilities: &AbilityConfig) {
    player(registry, catalog, abilities);

    platform(registry, Vec2::new(1920.0, 2100.0), Vec2::new(3840.0, 60.0));
    enemy(registry, Vec2::new(1800.0, 2040.0), Vec2::new(60.0, 60.0), 5);

    platform(registry, Vec2::new(300.0, 1900.0), Vec2::new(200.0, 30.0));
    platform(registry, Vec2::new(300.0, 1700.0), Vec2::new(200.0, 30.0));
    platform(registry, Vec2::new(300.0, 1500.0), Vec2::new(200.0, 30.0));
    platform(registry, Vec2::new(300.0, 1300.0), Vec2::new(200.0, 30.0));
    enemy(registry, Vec2::new(300.0, 1250.0), Vec2::new(60.0, 60.0), 3);

    platform(registry, Vec2::new(1920.0, 1800.0), Vec2::new(300.0, 30.0));
    platform(registry, Vec2::new(1920.0, 1600.0), Vec2::new(250.0, 30.0));
    platform(registry, Vec2::new(1920.0, 1400.0), Vec2::new(200.0, 30.0));
    platform(registry, Vec2::new(1920.0, 1200.0), Vec2::new(150.0, 30.0));
    enemy(registry, Vec2::new(1920.0, 1160.0), Vec2::new(60.0, 60.0), 4);

    platform(registry, Vec2::new(2800.0, 1600.0), Vec2::new(200.0, 30.0));
    platform(registry, Vec2::new(3000.0, 1450.0), Vec2::new(200.0, 30.0));
    platform(registry, Vec2::new(3200.0, 1300.0), Vec2::new(200.0, 30.0));
    enemy(registry, Vec2::new(3200.0, 1260.0), Vec2::new(60.0, 60.0), 6);

    platform(registry, Vec2::new(300.0, 600.0), Vec2::new(150.0, 30.0));
    enemy(registry, Vec2::new(300.0, 540.0), Vec2::new(60.0, 60.0), 7);

    platform(registry, Vec2::new(3500.0, 600.0), Vec2::new(200.0, 30.0));
    freya(registry, catalog, Vec2::new(3500.0, 540.0), 100);

    platform(registry, Vec2::new(1400.0, 1000.0), Vec2::new(250.0, 30.0));
    platform(registry, Vec2::new(1800.0, 1000.0), Vec2::new(250.0, 30.0));
    freya(registry, catalog, Vec2::new(1600.0, 940.0), 100);

    platform(registry, Vec2::new(800.0, 1600.0), Vec2::new(100.0, 20.0));
    platform(registry, Vec2::new(1000.0, 1500.0), Vec2::new(100.0, 20.0));
    platform(registry, Vec2::new(1200.0, 1400.0), Vec2::new(100.0, 20.0));

    freya(registry, catalog, Vec2::new(1800.0, 1980.0), 100);
}
