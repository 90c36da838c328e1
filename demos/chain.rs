use impulse2d::*;

const DT: f32 = 1.0 / 30.0;

fn add_walls(world: &mut PhysicsWorld, max: Vec2, thickness: f32) {
    let half = max * 0.5;
    world.add_body(RigidBody::fixed(Vec2::new(half.x, max.y), Vec2::new(half.x, thickness)));
    world.add_body(RigidBody::fixed(Vec2::new(0.0, half.y), Vec2::new(thickness, half.y)));
    world.add_body(RigidBody::fixed(Vec2::new(max.x, half.y), Vec2::new(thickness, half.y)));
    world.add_body(RigidBody::fixed(Vec2::new(half.x, 0.0), Vec2::new(half.x, thickness)));
}

fn main() -> Result<(), ConfigError> {
    let mut world = PhysicsWorld::default();
    add_walls(&mut world, Vec2::splat(40.0), 0.5);

    let size = Vec2::ONE;
    let link_gap = 2.0;
    // Pivot: pinned in place but free to spin.
    let mut anchor = RigidBody::new_box(Vec2::new(19.0, 36.0), size, 1.0);
    anchor.inverse_mass = 0.0;
    let anchor_position = anchor.position();
    let mut last = world.add_body(anchor);

    // Links hang corner to corner.
    let model_anchor = Vec2::new(1.0, -1.0);
    for i in 0..5 {
        let offset = (i + 1) as f32 * (size.x + link_gap);
        let link = world.add_body(RigidBody::new_box(
            anchor_position + Vec2::new(offset, -offset),
            size,
            1.0,
        ));
        world.add_distance_constraint(last, link, model_anchor, -model_anchor, link_gap)?;
        last = link;
    }

    for _ in 0..10 {
        world.add_body(
            RigidBody::new_box(Vec2::new(10.0, 25.0), size, 1.0)
                .with_velocity(Vec2::new(15.0, 15.0), std::f32::consts::TAU),
        );
    }

    let recorder = LineRecorder::new();
    let lines = recorder.lines();
    world.set_debug_drawer(Box::new(recorder));

    for frame in 0..300 {
        world.step(DT);
        let drawn = lines.lock().drain(..).count();
        if frame % 60 == 0 {
            let profile = world.profiler();
            println!(
                "frame {frame}: {drawn} joint lines, {} contact pairs, {} constraints",
                profile.contact_pair_count, profile.constraint_count
            );
        }
    }

    if let Some(tail) = world.body(last) {
        println!("chain tail settled at {:?}", tail.position());
    }
    Ok(())
}
