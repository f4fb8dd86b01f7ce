//! Input system: key state → player velocity.

use crate::input::{InputState, Key};
use crate::world::World;

/// For every player-controlled entity that has a velocity, reset the
/// horizontal axes and add `speed` along each pressed direction.
///
/// Forward/backward drive `z` (forward is `-z`), left/right drive `x`. The
/// vertical axis is left alone. Entities without a velocity are skipped; this
/// system never creates components.
pub fn run(world: &mut World, input: &InputState, speed: f32) {
    for entity in world.player_controlled.keys() {
        let Some(velocity) = world.velocities.get_mut(entity) else {
            continue;
        };
        let v = &mut velocity.linear;
        v.x = 0.0;
        v.z = 0.0;

        if input.is_pressed(Key::Forward) {
            v.z -= speed;
        }
        if input.is_pressed(Key::Backward) {
            v.z += speed;
        }
        if input.is_pressed(Key::Left) {
            v.x -= speed;
        }
        if input.is_pressed(Key::Right) {
            v.x += speed;
        }
    }
}
