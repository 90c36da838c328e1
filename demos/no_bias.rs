//! Two identical swinging joints, one without positional correction.
//! The uncorrected joint drifts away from its rest length.

use impulse2d::*;

const DT: f32 = 1.0 / 30.0;

fn anchored_pair(
    world: &mut PhysicsWorld,
    x: f32,
    baumgarte_term: f32,
) -> Result<(EntityId, EntityId, ConstraintId), ConfigError> {
    let size = Vec2::ONE;
    let pivot = world.add_body(RigidBody::fixed(Vec2::new(x, 20.0), size));
    let bob = world.add_body(RigidBody::new_box(Vec2::new(x + 5.0, 20.0), size, 1.0));
    let joint = world.add_constraint(
        Constraint::distance(pivot, bob, Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.0), 3.0)
            .with_baumgarte_term(baumgarte_term),
    )?;
    Ok((pivot, bob, joint))
}

fn anchor_distance(world: &PhysicsWorld, pivot: EntityId, bob: EntityId) -> f32 {
    match (world.body(pivot), world.body(bob)) {
        (Some(p), Some(b)) => p
            .model_to_world(Vec2::new(1.0, 0.0))
            .distance(b.model_to_world(Vec2::new(-1.0, 0.0))),
        _ => f32::NAN,
    }
}

fn main() -> Result<(), ConfigError> {
    let mut world = PhysicsWorld::default();
    let (a, b, _) = anchored_pair(&mut world, 15.0, 0.0)?;
    let (c, d, _) = anchored_pair(&mut world, 30.0, config::DEFAULT_BAUMGARTE_TERM)?;

    for frame in 0..=300 {
        if frame % 30 == 0 {
            println!(
                "t = {:>4.1}s  no bias: {:.4}  with bias: {:.4}",
                frame as f32 * DT,
                anchor_distance(&world, a, b),
                anchor_distance(&world, c, d)
            );
        }
        world.step(DT);
    }
    Ok(())
}
