//! Movement system: integrate velocity into position.

use tracing::warn;

use crate::world::World;

/// `position += velocity * delta` for every entity that has both a velocity
/// and a transform. Entities missing a transform are skipped, and a step
/// that would overflow to a non-finite position is not written.
pub fn run(world: &mut World, delta: f64) {
    let dt = delta as f32;
    for (entity, velocity) in world.velocities.entries() {
        if let Some(transform) = world.transforms.get_mut(entity) {
            let next = transform.position + velocity.linear * dt;
            if next.is_finite() {
                transform.position = next;
            } else {
                warn!(%entity, "movement step overflowed, position kept");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use engine_math::{Transform, Vec3};

    use super::*;
    use crate::components::Velocity;

    #[test]
    fn test_integrates_velocity() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, Transform::IDENTITY).unwrap();
        world.insert(e, Velocity::new(1.0, 0.0, 0.0)).unwrap();

        run(&mut world, 2.0);
        assert_eq!(world.get::<Transform>(e).unwrap().position, Vec3::new(2.0, 0.0, 0.0));

        run(&mut world, 1.0);
        assert_eq!(world.get::<Transform>(e).unwrap().position, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_skips_entities_without_transform() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, Velocity::new(1.0, 0.0, 0.0)).unwrap();

        run(&mut world, 1.0);

        assert!(!world.has::<Transform>(e));
        assert_eq!(world.get::<Velocity>(e).unwrap().linear, Vec3::X);
    }

    #[test]
    fn test_overflowing_step_is_dropped() {
        let mut world = World::new();
        let e = world.create_entity();
        world.insert(e, Transform::from_position(Vec3::new(f32::MAX, 1.0, 0.0))).unwrap();
        world.insert(e, Velocity::new(1.0, 0.0, 0.0)).unwrap();

        run(&mut world, f64::from(f32::MAX));

        let t = world.get::<Transform>(e).unwrap();
        assert!(t.is_finite());
        assert_eq!(t.position, Vec3::new(f32::MAX, 1.0, 0.0));
    }

    #[test]
    fn test_leaves_rotation_and_scale() {
        let mut world = World::new();
        let e = world.create_entity();
        let start = Transform {
            rotation: Vec3::new(0.0, 1.0, 0.0),
            scale: Vec3::splat(2.0),
            ..Transform::IDENTITY
        };
        world.insert(e, start).unwrap();
        world.insert(e, Velocity::new(0.0, 0.0, -4.0)).unwrap();

        run(&mut world, 0.5);

        let t = world.get::<Transform>(e).unwrap();
        assert_eq!(t.position, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(t.rotation, start.rotation);
        assert_eq!(t.scale, start.scale);
    }
}
