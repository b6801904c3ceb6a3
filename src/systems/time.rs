//! Time update system.
//!
//! Updates the shared [`FrameTime`](crate::resources::frametime::FrameTime)
//! resource once per frame, applying the delta policy and `time_scale`.
use bevy_ecs::prelude::*;

use crate::resources::frametime::{DeltaPolicy, FrameTime};

/// Start a new frame on the `FrameTime` resource.
///
/// `dt` is the unscaled delta sampled from the platform. The policy is
/// applied first, then `time_scale`. Returns the delta the game will see.
pub fn update_frame_time(world: &mut World, dt: f32, policy: DeltaPolicy) -> f32 {
    let mut ft = world.resource_mut::<FrameTime>();
    let scaled_dt = policy.apply(dt) * ft.time_scale.max(0.0);
    ft.raw_delta = dt;
    ft.delta = scaled_dt;
    ft.elapsed += scaled_dt;
    ft.frame_count += 1;
    scaled_dt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(FrameTime::default());
        world
    }

    #[test]
    fn accumulates_elapsed_and_counts_frames() {
        let mut world = world();
        update_frame_time(&mut world, 0.5, DeltaPolicy::Unbounded);
        update_frame_time(&mut world, 0.25, DeltaPolicy::Unbounded);
        let ft = world.resource::<FrameTime>();
        assert_eq!(ft.elapsed, 0.75);
        assert_eq!(ft.delta, 0.25);
        assert_eq!(ft.frame_count, 2);
    }

    #[test]
    fn applies_policy_before_scale() {
        let mut world = World::new();
        world.insert_resource(FrameTime::default().with_time_scale(2.0));
        let dt = update_frame_time(&mut world, 1.0, DeltaPolicy::Clamp { max: 0.1 });
        assert!((dt - 0.2).abs() < 1e-6);
        let ft = world.resource::<FrameTime>();
        assert_eq!(ft.raw_delta, 1.0);
    }

    #[test]
    fn negative_time_scale_freezes_time() {
        let mut world = World::new();
        world.insert_resource(FrameTime::default().with_time_scale(-1.0));
        let dt = update_frame_time(&mut world, 0.016, DeltaPolicy::Unbounded);
        assert_eq!(dt, 0.0);
    }
}
