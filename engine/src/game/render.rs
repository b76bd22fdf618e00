//! Fixed-order render pass over a host-provided drawing surface.
//!
//! The engine never draws pixels itself; it walks the live entities in a
//! fixed layer order and issues draw calls against the [`Surface`] trait.
//! Hosts back it with a real window, tests with a recording stub.

use crate::anim::Animation;
use crate::ecs::component::{
    AnimationRef, Ecb, Health, Shape, ShapeKind, Transform,
};
use crate::ecs::entity::{Entity, Tag};
use crate::ecs::registry::Registry;
use crate::game::debug::DebugFlags;
use crate::math::{Color, Vec2};

const HEALTH_BAR_SIZE: Vec2 = Vec2 { x: 50.0, y: 6.0 };
const HEALTH_BAR_RAISE: f32 = 40.0;

/// Host-side drawing backend.
pub trait Surface {
    fn clear(&mut self);
    fn draw_sprite(&mut self, anim: &Animation);
    fn draw_rect(&mut self, center: Vec2, size: Vec2, fill: Color, outline: Color, thickness: f32);
    fn draw_circle(&mut self, center: Vec2, radius: f32, fill: Color, outline: Color, thickness: f32);
    fn draw_polygon(&mut self, points: &[Vec2], outline: Color);
    fn present(&mut self);
}

/// Draw one frame: trails under everything, then player, freya, bones,
/// attacks and the remaining shapes, with optional wireframe overlays.
pub fn run(registry: &Registry, flags: DebugFlags, surface: &mut dyn Surface) {
    surface.clear();

    for entity in live_tagged(registry, Tag::Trail) {
        if let Some(anim_ref) = entity.try_get::<AnimationRef>() {
            surface.draw_sprite(&anim_ref.anim);
        }
    }

    for entity in live_tagged(registry, Tag::Player) {
        draw_animated_with_health(entity, surface);
    }

    for entity in live_tagged(registry, Tag::Freya) {
        draw_animated_with_health(entity, surface);
    }

    for entity in live_tagged(registry, Tag::Bone) {
        if let Some(anim_ref) = entity.try_get::<AnimationRef>() {
            surface.draw_sprite(&anim_ref.anim);
        } else {
            draw_shape(entity, surface);
        }
    }

    for entity in live_tagged(registry, Tag::Attack) {
        // Wireframe mode replaces attack fills with the overlay below
        if !flags.show_hitboxes {
            draw_shape(entity, surface);
        }
    }

    for entity in registry.iter_live() {
        match entity.tag() {
            Tag::Trail | Tag::Player | Tag::Freya | Tag::Bone | Tag::Attack => continue,
            _ => draw_shape(entity, surface),
        }
    }

    if flags.show_ecb {
        for entity in registry.iter_live() {
            if let Some(ecb) = entity.try_get::<Ecb>() {
                surface.draw_polygon(ecb.points(), Color::WHITE);
            }
        }
    }

    if flags.show_hitboxes {
        for entity in registry.iter_live() {
            if entity.tag() == Tag::Trail {
                continue;
            }
            let (Some(trans), Some(shape)) =
                (entity.try_get::<Transform>(), entity.try_get::<Shape>())
            else {
                continue;
            };
            match shape.kind {
                ShapeKind::Rect { size } => surface.draw_rect(
                    trans.pos,
                    size,
                    Color::TRANSPARENT,
                    Color::MAGENTA,
                    2.0,
                ),
                ShapeKind::Circle { radius, .. } => surface.draw_circle(
                    trans.pos,
                    radius,
                    Color::TRANSPARENT,
                    Color::MAGENTA,
                    2.0,
                ),
            }
        }
    }

    surface.present();
}

fn live_tagged(registry: &Registry, tag: Tag) -> impl Iterator<Item = &Entity> {
    registry
        .ids_by_tag(tag)
        .into_iter()
        .filter_map(|id| registry.get(id))
        .filter(|e| e.is_active() && e.has::<Transform>())
}

fn draw_animated_with_health(entity: &Entity, surface: &mut dyn Surface) {
    let Some(trans) = entity.try_get::<Transform>() else { return };

    if let Some(anim_ref) = entity.try_get::<AnimationRef>() {
        surface.draw_sprite(&anim_ref.anim);
    }

    if let Some(health) = entity.try_get::<Health>() {
        let percent = health.current.max(0) as f32 / health.max.max(1) as f32;
        let bar_pos = Vec2::new(trans.pos.x, trans.pos.y - HEALTH_BAR_RAISE);
        surface.draw_rect(bar_pos, HEALTH_BAR_SIZE, Color::BLACK, Color::TRANSPARENT, 0.0);
        surface.draw_rect(
            bar_pos,
            Vec2::new(HEALTH_BAR_SIZE.x * percent, HEALTH_BAR_SIZE.y),
            Color::RED,
            Color::TRANSPARENT,
            0.0,
        );
    }
}

fn draw_shape(entity: &Entity, surface: &mut dyn Surface) {
    let (Some(trans), Some(shape)) = (entity.try_get::<Transform>(), entity.try_get::<Shape>())
    else {
        return;
    };
    match shape.kind {
        ShapeKind::Rect { size } => {
            surface.draw_rect(trans.pos, size, shape.fill, shape.outline, shape.thickness)
        }
        ShapeKind::Circle { radius, .. } => {
            surface.draw_circle(trans.pos, radius, shape.fill, shape.outline, shape.thickness)
        }
    }
}
