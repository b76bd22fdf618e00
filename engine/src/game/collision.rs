//! Platform collision: polygon-vs-AABB tests, ground probing and the
//! landing resolution pass.

use crate::ecs::component::{Ecb, Shape, Stuck, Transform};
use crate::ecs::entity::Tag;
use crate::ecs::registry::Registry;
use crate::math::Vec2;

/// Vertical leniency for "touching" a platform top.
pub const GROUND_EPSILON: f32 = 1.0;

/// An axis-aligned box in min/max form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build from a center point and full size.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self { min: center - half, max: center + half }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.min.x, self.max.y),
            self.max,
        ]
    }
}

/// A platform's collision extent, precomputed once per pass so systems can
/// test for ground while holding a mutable borrow on some other entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformExtent {
    pub pos: Vec2,
    pub size: Vec2,
}

impl PlatformExtent {
    pub fn aabb(&self) -> Aabb {
        Aabb::centered(self.pos, self.size)
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }
}

/// Snapshot every platform's position and rectangle size.
pub fn platform_extents(registry: &Registry) -> Vec<PlatformExtent> {
    registry
        .ids_by_tag(Tag::Platform)
        .into_iter()
        .filter_map(|id| registry.get(id))
        .filter_map(|platform| {
            let pos = platform.try_get::<Transform>()?.pos;
            let size = platform.try_get::<Shape>()?.rect_size();
            Some(PlatformExtent { pos, size })
        })
        .collect()
}

/// Even-odd ray-crossing point-in-polygon test.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let mut crossings = 0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        if ((a.y > point.y) != (b.y > point.y))
            && (point.x < (b.x - a.x) * (point.y - a.y) / ((b.y - a.y) + 1e-6) + a.x)
        {
            crossings += 1;
        }
    }
    crossings % 2 == 1
}

/// A polygon and an AABB intersect when either contains a vertex of the
/// other. Exact for convex polygons of this size against boxes that are
/// never thinner than the polygon.
pub fn polygon_intersects_aabb(polygon: &[Vec2], aabb: &Aabb) -> bool {
    if polygon.iter().any(|&p| aabb.contains(p)) {
        return true;
    }
    aabb.corners().iter().any(|&corner| point_in_polygon(corner, polygon))
}

/// Center/half-extent overlap test between two rectangles.
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let x_overlap = (a_pos.x - b_pos.x).abs() <= (a_size.x + b_size.x) / 2.0;
    let y_overlap = (a_pos.y - b_pos.y).abs() <= (a_size.y + b_size.y) / 2.0;
    x_overlap && y_overlap
}

/// Is the collision box resting on any platform? True when the bottom vertex
/// sits within [`GROUND_EPSILON`] of a platform top and inside its span.
pub fn on_ground(ecb: &Ecb, platforms: &[PlatformExtent]) -> bool {
    let bottom = ecb.bottom();
    platforms.iter().any(|platform| {
        let aabb = platform.aabb();
        (bottom.y - platform.top()).abs() <= GROUND_EPSILON
            && bottom.x >= aabb.min.x
            && bottom.x <= aabb.max.x
    })
}

/// Resolve every mobile collision box against the platforms.
///
/// Movement already translated the entity this tick; resolution happens in
/// place on the pose it produced, and the transform is only written when a
/// platform was actually touched. Descending entities whose bottom vertex
/// reaches a platform top are snapped to rest on it; any other contact
/// undoes this tick's horizontal motion into the platform. Only the first
/// intersecting platform resolves vertically. Projectiles stick to whatever
/// they touch.
pub(crate) fn run(registry: &mut Registry) {
    let platforms = platform_extents(registry);

    for id in registry.ids() {
        let Some(entity) = registry.get_mut(id) else { continue };
        if !entity.is_active() || entity.tag() == Tag::Platform {
            continue;
        }
        if !entity.has::<Ecb>() || !entity.has::<Transform>() || entity.has::<Stuck>() {
            continue;
        }

        let ecb = *entity.get::<Ecb>();
        let bottom_offset = ecb.bottom_offset();
        let trans = entity.get_mut::<Transform>();
        let mut vel = trans.velocity;
        let mut pos = trans.pos;
        let mut stick = false;
        let mut resolved = false;

        for platform in &platforms {
            let aabb = platform.aabb();
            if !polygon_intersects_aabb(ecb.points(), &aabb) {
                continue;
            }
            if entity.tag() == Tag::Bone {
                stick = true;
            }

            let bottom = ecb.bottom().y;
            let top = platform.top();

            if vel.y > 0.0
                && bottom >= top
                && (bottom - top).abs() <= GROUND_EPSILON + bottom_offset
            {
                // Coming down onto the platform: land and snap flush
                vel.y = 0.0;
                pos.y = top - bottom_offset;
                resolved = true;
                break;
            } else {
                // Side contact: undo this tick's motion into the platform
                pos.x -= vel.x;
                vel.x = 0.0;
                resolved = true;
            }
        }

        if resolved {
            let trans = entity.get_mut::<Transform>();
            trans.velocity = vel;
            trans.pos = pos;
            if let Some(ecb) = entity.try_get_mut::<Ecb>() {
                ecb.recenter(pos);
            }
        }
        if stick {
            entity.insert(Stuck);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::{Ecb, Gravity, Shape, Transform};
    use crate::math::Color;

    fn world_with_platform(pos: Vec2, size: Vec2) -> Registry {
        let mut registry = Registry::new();
        let id = registry.create(Tag::Platform);
        let platform = registry.get_mut(id).unwrap();
        platform.insert(Transform::new(pos, Vec2::ZERO, 0.0));
        platform.insert(Shape::rect(size, Color::BLUE, Color::WHITE, 2.0));
        registry
    }

    #[test]
    fn point_in_diamond() {
        // Given - diamond centered at origin, 40 wide, 80 tall
        let ecb = Ecb::diamond(Vec2::ZERO, 40.0, 80.0);

        // Then
        assert!(point_in_polygon(Vec2::ZERO, ecb.points()));
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), ecb.points()));
        assert!(!point_in_polygon(Vec2::new(19.0, 39.0), ecb.points()));
        assert!(!point_in_polygon(Vec2::new(100.0, 0.0), ecb.points()));
    }

    #[test]
    fn polygon_vertex_inside_box_intersects() {
        // Given - diamond bottom vertex dipping into the box
        let ecb = Ecb::diamond(Vec2::new(0.0, -35.0), 40.0, 80.0);
        let aabb = Aabb::centered(Vec2::new(0.0, 10.0), Vec2::new(200.0, 20.0));

        // Then
        assert!(polygon_intersects_aabb(ecb.points(), &aabb));
    }

    #[test]
    fn box_corner_inside_polygon_intersects() {
        // Given - small box tucked entirely inside a large diamond
        let ecb = Ecb::diamond(Vec2::ZERO, 200.0, 200.0);
        let aabb = Aabb::centered(Vec2::ZERO, Vec2::new(10.0, 10.0));

        // Then
        assert!(polygon_intersects_aabb(ecb.points(), &aabb));
    }

    #[test]
    fn separated_shapes_do_not_intersect() {
        // Given
        let ecb = Ecb::diamond(Vec2::ZERO, 40.0, 80.0);
        let aabb = Aabb::centered(Vec2::new(500.0, 500.0), Vec2::new(50.0, 50.0));

        // Then
        assert!(!polygon_intersects_aabb(ecb.points(), &aabb));
    }

    #[test]
    fn aabb_overlap_uses_half_extents() {
        assert!(aabb_overlap(
            Vec2::ZERO,
            Vec2::new(60.0, 120.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(60.0, 60.0)
        ));
        assert!(!aabb_overlap(
            Vec2::ZERO,
            Vec2::new(60.0, 120.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(60.0, 60.0)
        ));
    }

    #[test]
    fn on_ground_needs_proximity_and_span() {
        // Given - platform top at y = 90
        let platforms =
            vec![PlatformExtent { pos: Vec2::new(0.0, 100.0), size: Vec2::new(200.0, 20.0) }];

        // Then - bottom vertex exactly on top
        let resting = Ecb::diamond(Vec2::new(0.0, 50.0), 40.0, 80.0);
        assert!(on_ground(&resting, &platforms));

        // Bottom vertex 5px above the top is airborne
        let above = Ecb::diamond(Vec2::new(0.0, 45.0), 40.0, 80.0);
        assert!(!on_ground(&above, &platforms));

        // On the right height but past the platform edge
        let beside = Ecb::diamond(Vec2::new(150.0, 50.0), 40.0, 80.0);
        assert!(!on_ground(&beside, &platforms));
    }

    #[test]
    fn descending_entity_snaps_to_platform_top() {
        // Given - platform top at y = 90, faller just above it, moving down
        let mut registry = world_with_platform(Vec2::new(0.0, 100.0), Vec2::new(200.0, 20.0));
        let id = registry.create(Tag::Player);
        let faller = registry.get_mut(id).unwrap();
        faller.insert(Transform::new(Vec2::new(0.0, 52.0), Vec2::new(0.0, 6.0), 0.0));
        faller.insert(Ecb::diamond(Vec2::new(0.0, 52.0), 40.0, 80.0));
        registry.commit();

        // When
        run(&mut registry);

        // Then - bottom vertex flush with the platform top, fall stopped
        let trans = registry.get(id).unwrap().get::<Transform>();
        assert_eq!(trans.pos.y, 50.0);
        assert_eq!(trans.velocity.y, 0.0);
    }

    #[test]
    fn side_contact_cancels_horizontal_motion() {
        // Given - entity moving up into a platform from below/side
        let mut registry = world_with_platform(Vec2::new(50.0, 0.0), Vec2::new(100.0, 100.0));
        let id = registry.create(Tag::Player);
        let mover = registry.get_mut(id).unwrap();
        mover.insert(Transform::new(Vec2::new(-10.0, 0.0), Vec2::new(5.0, -2.0), 0.0));
        mover.insert(Ecb::diamond(Vec2::new(-10.0, 0.0), 40.0, 80.0));
        registry.commit();

        // When
        run(&mut registry);

        // Then - this tick's x motion undone, y left alone
        let trans = registry.get(id).unwrap().get::<Transform>();
        assert_eq!(trans.velocity.x, 0.0);
        assert_eq!(trans.pos.x, -15.0);
        assert_eq!(trans.pos.y, 0.0);
    }

    #[test]
    fn clear_of_platforms_nothing_is_written() {
        // Given - a moving entity nowhere near the platform
        let mut registry = world_with_platform(Vec2::new(500.0, 500.0), Vec2::new(50.0, 50.0));
        let id = registry.create(Tag::Player);
        let mover = registry.get_mut(id).unwrap();
        mover.insert(Transform::new(Vec2::ZERO, Vec2::new(5.0, 0.0), 0.0));
        mover.insert(Ecb::diamond(Vec2::ZERO, 40.0, 80.0));
        registry.commit();

        // When
        run(&mut registry);

        // Then - movement owns translation; collision leaves the pose as-is
        let trans = registry.get(id).unwrap().get::<Transform>();
        assert_eq!(trans.pos, Vec2::ZERO);
        assert_eq!(trans.velocity, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn projectile_sticks_on_contact() {
        // Given - bone overlapping a platform
        let mut registry = world_with_platform(Vec2::new(0.0, 100.0), Vec2::new(200.0, 20.0));
        let id = registry.create(Tag::Bone);
        let bone = registry.get_mut(id).unwrap();
        bone.insert(Transform::new(Vec2::new(0.0, 92.0), Vec2::new(3.0, 2.0), 0.0));
        bone.insert(Ecb::triangle(Vec2::new(0.0, 92.0), 40.0, 40.0));
        bone.insert(Gravity::new(0.5));
        registry.commit();

        // When
        run(&mut registry);

        // Then
        assert!(registry.get(id).unwrap().has::<Stuck>());
    }

    #[test]
    fn stuck_entities_are_skipped() {
        // Given
        let mut registry = world_with_platform(Vec2::new(0.0, 100.0), Vec2::new(200.0, 20.0));
        let id = registry.create(Tag::Bone);
        let bone = registry.get_mut(id).unwrap();
        bone.insert(Transform::new(Vec2::new(0.0, 92.0), Vec2::new(3.0, 2.0), 0.0));
        bone.insert(Ecb::triangle(Vec2::new(0.0, 92.0), 40.0, 40.0));
        bone.insert(Stuck);
        registry.commit();

        // When
        run(&mut registry);

        // Then - untouched
        let trans = registry.get(id).unwrap().get::<Transform>();
        assert_eq!(trans.pos, Vec2::new(0.0, 92.0));
    }
}
