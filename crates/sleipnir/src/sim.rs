//! # Simulation — The Tick Driver
//!
//! [`Simulation`] owns the [`World`], the [`Schedule`] and the clock, and
//! advances them one frame per [`tick`](Simulation::tick):
//!
//! ```text
//! tick(raw_dt)
//!   dt = clamp(raw_dt, 0, max_delta)
//!   ForceSystem → TorqueSystem → Integrator → CollisionResolver → TransformPropagation
//!   apply queued commands
//! ```
//!
//! After a tick returns, every `Transform` world matrix is current, so the
//! renderer can read it (or call [`render::collect_instances`](crate::render::collect_instances))
//! without further work.

use crate::commands::apply_commands;
use crate::config::SimConfig;
use crate::ecs::{Schedule, System, TransformPropagation, World};
use crate::physics::{CollisionResolver, ForceSystem, Integrator, TorqueSystem};
use crate::snapshot::{WorldSnapshot, snapshot_world};
use crate::time::SimTime;

pub struct Simulation {
    world: World,
    schedule: Schedule,
    config: SimConfig,
    time: SimTime,
}

impl Simulation {
    /// A simulation running the standard pipeline.
    pub fn new(config: SimConfig) -> Self {
        let mut schedule = Schedule::new();
        schedule.add_system(ForceSystem::new(config.force));
        schedule.add_system(TorqueSystem::new(config.torque));
        schedule.add_system(Integrator::new(config.integrator));
        schedule.add_system(CollisionResolver::new(config.collision));
        schedule.add_system(TransformPropagation);
        log::info!(
            "simulation: {} systems, max_delta {}s",
            schedule.len(),
            config.max_delta
        );
        Self::with_schedule(config, schedule)
    }

    /// A simulation with no systems; build the pipeline with
    /// [`add_system`](Self::add_system).
    pub fn empty(config: SimConfig) -> Self {
        Self::with_schedule(config, Schedule::new())
    }

    fn with_schedule(config: SimConfig, schedule: Schedule) -> Self {
        Self {
            world: World::new(),
            schedule,
            config,
            time: SimTime::new(),
        }
    }

    /// Append a system to the end of the pipeline.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> &mut Self {
        self.schedule.add_system(system);
        self
    }

    /// Advance one frame. Returns the delta the systems actually saw.
    pub fn tick(&mut self, raw_dt: f32) -> f32 {
        let dt = self.time.advance(raw_dt, self.config.max_delta);
        if dt < raw_dt {
            log::debug!("tick {}: dt {raw_dt} clamped to {dt}", self.time.tick());
        }
        self.schedule.run(&mut self.world, dt);
        apply_commands(&mut self.world);
        log::trace!(
            "tick {} done, {} entities",
            self.time.tick(),
            self.world.entity_count()
        );
        dt
    }

    /// Run `ticks` frames of `dt` each.
    pub fn run_for(&mut self, ticks: usize, dt: f32) {
        for _ in 0..ticks {
            self.tick(dt);
        }
    }

    /// Serializable snapshot of the current state.
    pub fn snapshot(&self) -> WorldSnapshot {
        snapshot_world(&self.world, self.time.tick())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn time(&self) -> &SimTime {
        &self.time
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
