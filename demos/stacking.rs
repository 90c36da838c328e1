use impulse2d::*;

const DT: f32 = 1.0 / 30.0;

fn main() {
    let mut world = PhysicsWorld::default();
    world.add_body(RigidBody::fixed(Vec2::ZERO, Vec2::new(10.0, 1.0)));

    let boxes: Vec<EntityId> = (0..5)
        .map(|i| {
            world.add_body(RigidBody::new_box(
                Vec2::new(0.05 * i as f32, 2.0 + 2.0 * i as f32),
                Vec2::ONE,
                1.0,
            ))
        })
        .collect();

    for _ in 0..150 {
        world.step(DT);
    }

    for (i, id) in boxes.iter().enumerate() {
        if let Some(body) = world.body(*id) {
            println!(
                "box {i}: position {:?}, rotation {:.4}",
                body.position(),
                body.rotation()
            );
        }
    }
    let metrics = world.last_solver_metrics();
    println!(
        "Simulated stack of {} boxes for 5 seconds: {} constraints, {} sweeps in the last step",
        boxes.len(),
        metrics.constraints_solved,
        metrics.iterations
    );
}
