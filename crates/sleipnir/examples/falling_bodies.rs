//! Headless demo: a few spheres and crates dropped onto a floor.
//!
//! Run with an optional JSON config path:
//!
//! ```sh
//! RUST_LOG=sleipnir=debug cargo run -p sleipnir --example falling_bodies -- config.json
//! ```

use sleipnir::diag;
use sleipnir::prelude::*;

fn main() {
    diag::init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    let mut sim = Simulation::new(config);
    let world = sim.world_mut();

    world.spawn((
        Name::new("floor"),
        Transform::default(),
        Collider::plane(0.0),
    ));

    let gravity = Acceleration(Vec3::new(0.0, -9.8, 0.0));
    for i in 0..3 {
        let x = i as f32 * 1.5 - 1.5;
        world.spawn((
            Name::new(format!("ball {i}")),
            Transform::from_xyz(x, 3.0 + i as f32, 0.0),
            RigidBody::new(1.0),
            gravity,
            Damping { factor: 0.999 },
            Collider::sphere(0.5),
            Material {
                base_color: Vec4::new(0.9, 0.3, 0.2, 1.0),
            },
        ));
    }

    let spinner = world.spawn((
        Name::new("spinner"),
        Transform::from_xyz(0.0, 6.0, 0.0),
        RigidBody::new(2.0),
        gravity,
        AngularVelocity(Vec3::new(0.0, 2.0, 0.0)),
        AngularDamping { factor: 0.99 },
        Collider::cube(0.4),
    ));
    // A marker riding on top of the spinner.
    world.spawn_child(
        spinner,
        (Name::new("flag"), Transform::from_xyz(0.0, 0.6, 0.0)),
    );

    for _ in 0..180 {
        sim.tick(1.0 / 60.0);
    }

    let snapshot = sim.snapshot();
    for entity in &snapshot.entities {
        if let (Some(name), Some(pos)) = (&entity.name, entity.world_position) {
            log::info!("{name:>8}: ({:6.3}, {:6.3}, {:6.3})", pos.x, pos.y, pos.z);
        }
    }
    log::info!(
        "{} instances, {} gizmos after {} ticks",
        collect_instances(sim.world()).len(),
        collect_gizmos(sim.world()).len(),
        sim.time().tick()
    );

    #[cfg(feature = "diagnostics")]
    log::info!("last tick:\n{}", diag::timing_report(sim.schedule()));
}
