use impulse2d::{config::*, *};

#[test]
fn default_world_uses_default_settings() {
    let world = PhysicsWorld::default();
    let settings = world.settings();
    assert_eq!(settings.gravity, Vec2::from_array(DEFAULT_GRAVITY));
    assert_eq!(settings.solver_iterations, DEFAULT_SOLVER_ITERATIONS);
    assert_eq!(settings.contact_slop, DEFAULT_CONTACT_SLOP);
    assert_eq!(settings.match_threshold, DEFAULT_MATCH_THRESHOLD);
    assert_eq!(settings.normal_similarity, DEFAULT_NORMAL_SIMILARITY);
}

#[test]
fn world_construction_reports_the_bad_field() {
    let cases = [
        (
            WorldSettings {
                normal_similarity: 1.5,
                ..WorldSettings::default()
            },
            ConfigError::NormalSimilarity(1.5),
        ),
        (
            WorldSettings {
                match_threshold: -1.0,
                ..WorldSettings::default()
            },
            ConfigError::MatchThreshold(-1.0),
        ),
        (
            WorldSettings {
                gravity: Vec2::new(f32::NAN, 0.0),
                ..WorldSettings::default()
            },
            ConfigError::Gravity([f32::NAN, 0.0]),
        ),
    ];

    for (settings, expected) in cases {
        match PhysicsWorld::new(settings) {
            Err(err) => assert_eq!(
                std::mem::discriminant(&err),
                std::mem::discriminant(&expected)
            ),
            Ok(_) => panic!("expected {expected:?}"),
        }
    }
}

#[test]
fn errors_render_the_offending_value() {
    let message = ConfigError::Friction(-0.5).to_string();
    assert!(message.contains("friction"));
    assert!(message.contains("-0.5"));
    assert_eq!(
        ConfigError::ZeroIterations.to_string(),
        "solver iteration cap must be at least 1"
    );
}

#[test]
fn contact_settings_reach_new_constraints() {
    let settings = WorldSettings {
        contact_slop: 0.02,
        contact_baumgarte_term: 4.0,
        friction: 0.3,
        ..WorldSettings::default()
    };
    let mut world = PhysicsWorld::new(settings).unwrap();
    let floor = world.add_body(RigidBody::fixed(Vec2::ZERO, Vec2::new(10.0, 1.0)));
    let block = world.add_body(RigidBody::new_box(Vec2::new(0.0, 1.98), Vec2::ONE, 1.0));
    world.step(DEFAULT_TIME_STEP);

    for &(contact, friction) in world.contact_cache().constraints_for(floor, block) {
        let contact = world.constraint(contact).unwrap();
        assert_eq!(contact.slop, 0.02);
        assert_eq!(contact.baumgarte_term, 4.0);
        match world.constraint(friction).unwrap().kind {
            ConstraintKind::Friction(f) => assert_eq!(f.coefficient, 0.3),
            other => panic!("expected friction, got {other:?}"),
        }
    }
}

#[test]
fn iteration_cap_bounds_solver_work() {
    let mut world = PhysicsWorld::new(WorldSettings {
        solver_iterations: 1,
        ..WorldSettings::default()
    })
    .unwrap();
    world.add_body(RigidBody::fixed(Vec2::ZERO, Vec2::new(10.0, 1.0)));
    world.add_body(RigidBody::new_box(Vec2::new(0.0, 1.9), Vec2::ONE, 1.0));
    world.step(DEFAULT_TIME_STEP);
    assert_eq!(world.last_solver_metrics().iterations, 1);
}

fn fixed_and_free(world: &mut PhysicsWorld) -> (EntityId, EntityId) {
    let anchor = world.add_body(RigidBody::fixed(Vec2::ZERO, Vec2::splat(0.5)));
    let free = world.add_body(RigidBody::new_box(Vec2::new(3.0, 0.0), Vec2::splat(0.5), 1.0));
    (anchor, free)
}

#[test]
fn constraint_tunables_are_validated_on_registration() {
    let mut world = PhysicsWorld::default();
    let (anchor, free) = fixed_and_free(&mut world);
    let joint = || Constraint::distance(anchor, free, Vec2::ZERO, Vec2::ZERO, 3.0);

    assert_eq!(
        world.add_constraint(joint().with_slop(-0.1)),
        Err(ConfigError::Slop(-0.1))
    );
    assert_eq!(
        world.add_constraint(joint().with_baumgarte_term(-2.0)),
        Err(ConfigError::BaumgarteTerm(-2.0))
    );
    assert!(matches!(
        world.add_constraint(joint().with_limit(DistanceLimit::MaxImpulse(f32::NAN))),
        Err(ConfigError::ImpulseCap(_))
    ));
    assert!(matches!(
        world.add_distance_constraint(anchor, free, Vec2::ZERO, Vec2::ZERO, f32::INFINITY),
        Err(ConfigError::JointDistance(_))
    ));

    let contact = world
        .add_constraint(Constraint::contact(anchor, free, Vec2::ZERO, Vec2::X, 0.0))
        .unwrap();
    assert_eq!(
        world.add_constraint(
            Constraint::friction(anchor, free, Vec2::ZERO, Vec2::X, contact).with_friction(-0.5)
        ),
        Err(ConfigError::Friction(-0.5))
    );

    // Rejected constraints never reach the solver.
    assert_eq!(world.active_constraints(), &[contact]);
}

#[test]
fn joint_at_rest_length_stays_still() {
    let mut world = PhysicsWorld::new(WorldSettings {
        gravity: Vec2::ZERO,
        ..WorldSettings::default()
    })
    .unwrap();
    let (anchor, free) = fixed_and_free(&mut world);
    let joint = world
        .add_constraint(Constraint::distance(anchor, free, Vec2::ZERO, Vec2::ZERO, 3.0).with_slop(0.0))
        .unwrap();

    world.step(DEFAULT_TIME_STEP);
    assert_eq!(world.constraint(joint).unwrap().bias, 0.0);
    assert_eq!(world.body(free).unwrap().velocity.linear, Vec2::ZERO);
}
