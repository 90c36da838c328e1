use approx::assert_relative_eq;
use impulse2d::*;

const DT: f32 = 1.0 / 30.0;

fn ground(world: &mut PhysicsWorld) -> EntityId {
    world.add_body(RigidBody::fixed(Vec2::ZERO, Vec2::new(10.0, 1.0)))
}

fn contact_impulses(world: &PhysicsWorld, a: EntityId, b: EntityId) -> Vec<(f32, f32)> {
    world
        .contact_cache()
        .constraints_for(a, b)
        .iter()
        .map(|&(contact, friction)| {
            (
                world.constraint(contact).unwrap().lambda_sum,
                world.constraint(friction).unwrap().lambda_sum,
            )
        })
        .collect()
}

#[test]
fn dropped_box_comes_to_rest_on_ground() {
    let mut world = PhysicsWorld::default();
    let floor = ground(&mut world);
    let block = world.add_body(RigidBody::new_box(Vec2::new(0.0, 3.0), Vec2::ONE, 1.0));

    for _ in 0..120 {
        world.step(DT);
    }

    let body = world.body(block).unwrap();
    let slop = world.settings().contact_slop;
    let bottom = body.position().y - 1.0;
    assert!(body.velocity.linear.length() < 1e-3, "{:?}", body.velocity);
    assert!(
        (bottom - 1.0).abs() <= slop + 1e-3,
        "bottom at {bottom}, ground top at 1.0"
    );
    assert!(world.contact_cache().contains(floor, block));
}

#[test]
fn resting_contact_is_reused_and_carries_the_weight() {
    let mut world = PhysicsWorld::default();
    let floor = ground(&mut world);
    let block = world.add_body(RigidBody::new_box(Vec2::new(0.0, 3.0), Vec2::ONE, 1.0));
    for _ in 0..120 {
        world.step(DT);
    }

    let before = world.contact_cache().constraints_for(floor, block).to_vec();
    assert_eq!(before.len(), 2);
    world.step(DT);
    let after = world.contact_cache().constraints_for(floor, block).to_vec();
    assert_eq!(before, after, "stationary contacts must not be recreated");

    // Total normal impulse per step balances gravity: m * g * dt.
    let body = world.body(block).unwrap();
    let mass = 1.0 / body.inverse_mass;
    let weight = mass * world.gravity().length() * DT;
    let normal: f32 = contact_impulses(&world, floor, block)
        .iter()
        .map(|&(n, _)| n)
        .sum();
    assert_relative_eq!(normal, weight, epsilon = 1e-2);
}

#[test]
fn friction_stays_inside_coulomb_bounds() {
    let mut world = PhysicsWorld::default();
    let floor = ground(&mut world);
    let block = world.add_body(
        RigidBody::new_box(Vec2::new(0.0, 1.99), Vec2::ONE, 1.0).with_velocity(Vec2::new(3.0, 0.0), 0.0),
    );

    for _ in 0..90 {
        world.step(DT);
        for &id in world.active_constraints() {
            let c = world.constraint(id).unwrap();
            if let ConstraintKind::Friction(friction) = c.kind {
                let normal = world.constraint(friction.contact).unwrap().lambda_sum;
                assert!(c.lambda_sum.abs() <= normal * friction.coefficient + 1e-5);
            }
        }
    }

    // It slid forward, then friction stopped it.
    let body = world.body(block).unwrap();
    assert!(body.position().x > 0.1);
    assert!(body.velocity.linear.length() < 1e-2);
    assert!(world.contact_cache().contains(floor, block));
}

#[test]
fn frictionless_box_keeps_sliding() {
    let mut world = PhysicsWorld::new(WorldSettings {
        friction: 0.0,
        ..WorldSettings::default()
    })
    .unwrap();
    ground(&mut world);
    let block = world.add_body(
        RigidBody::new_box(Vec2::new(0.0, 1.99), Vec2::ONE, 1.0).with_velocity(Vec2::new(3.0, 0.0), 0.0),
    );

    for _ in 0..30 {
        world.step(DT);
    }
    let body = world.body(block).unwrap();
    // Only damping slows it down.
    assert!(body.velocity.linear.x > 2.0);
}

#[test]
fn tilted_box_settles_flat() {
    let mut world = PhysicsWorld::default();
    ground(&mut world);
    let block = world.add_body(RigidBody::new_box(Vec2::new(0.0, 3.0), Vec2::ONE, 1.0).with_rotation(0.3));

    for _ in 0..300 {
        world.step(DT);
    }

    let body = world.body(block).unwrap();
    let quarter = std::f32::consts::FRAC_PI_2;
    let off_axis = body.rotation() - (body.rotation() / quarter).round() * quarter;
    assert!(off_axis.abs() < 0.02, "rotation {}", body.rotation());
    assert!((body.position().y - 1.99).abs() < 0.02);
    assert!(body.velocity.linear.length() < 1e-2);
    assert!(body.velocity.angular.abs() < 1e-2);
}

#[test]
fn three_box_stack_stays_up() {
    let mut world = PhysicsWorld::default();
    ground(&mut world);
    let boxes: Vec<EntityId> = (0..3)
        .map(|i| {
            world.add_body(RigidBody::new_box(
                Vec2::new(0.1 * i as f32, 2.02 + 2.0 * i as f32),
                Vec2::ONE,
                1.0,
            ))
        })
        .collect();

    for _ in 0..300 {
        world.step(DT);
    }

    for (i, &id) in boxes.iter().enumerate() {
        let body = world.body(id).unwrap();
        let expected_y = 2.0 + 2.0 * i as f32;
        assert!((body.position().y - expected_y).abs() < 0.1, "box {i} at {:?}", body.position());
        assert!(body.rotation().abs() < 0.05);
        assert!(body.velocity.linear.length() < 1e-2);
    }
    assert_eq!(world.contact_cache().pair_count(), 3);
}

#[test]
fn cleared_contacts_are_rebuilt_cold() {
    let mut world = PhysicsWorld::default();
    let floor = ground(&mut world);
    let block = world.add_body(RigidBody::new_box(Vec2::new(0.0, 1.99), Vec2::ONE, 1.0));
    for _ in 0..10 {
        world.step(DT);
    }
    let before = world.contact_cache().constraints_for(floor, block).to_vec();

    world.clear_contacts();
    assert!(world.active_constraints().is_empty());
    world.step(DT);

    let after = world.contact_cache().constraints_for(floor, block).to_vec();
    assert_eq!(after.len(), 2);
    assert!(after.iter().all(|pair| !before.contains(pair)));
}
