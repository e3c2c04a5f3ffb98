//! # System — Stages That Operate on the World
//!
//! A system is a stage of the per-tick pipeline: it takes `&mut World` plus
//! the tick's delta time and reads or writes components in place.
//!
//! - Any `FnMut(&mut World, f32)` is a system.
//! - Systems run in the order they're added.
//! - No isolation: a system sees everything earlier systems wrote this tick.
//! - Systems must not spawn or despawn directly; they queue a
//!   [`Command`](crate::commands::Command) instead, applied after the tick.
//!
//! ## Schedule
//!
//! A [`Schedule`] is just a `Vec` of named systems. Call `run()` and they
//! execute sequentially.

use super::world::World;

/// A stage that can be executed on a [`World`] once per tick.
pub trait System {
    fn update(&mut self, world: &mut World, dt: f32);
}

/// Blanket impl: any `FnMut(&mut World, f32)` is a `System`.
impl<F: FnMut(&mut World, f32)> System for F {
    fn update(&mut self, world: &mut World, dt: f32) {
        (self)(world, dt);
    }
}

/// A boxed [`System`] with a short name for logs and diagnostics.
struct NamedSystem {
    name: String,
    system: Box<dyn System>,
}

/// Per-system timing recorded during a single tick.
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone)]
pub struct SystemTiming {
    pub name: String,
    pub duration_us: f64,
}

/// An ordered list of systems to run.
pub struct Schedule {
    systems: Vec<NamedSystem>,
    /// Per-system timings from the most recent `run()` call.
    #[cfg(feature = "diagnostics")]
    timings: Vec<SystemTiming>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            #[cfg(feature = "diagnostics")]
            timings: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule, named after its type.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        let name = short_system_name(std::any::type_name::<S>());
        self.add_named_system(name, system);
    }

    /// Add a system under an explicit name.
    pub fn add_named_system<S: System + 'static>(&mut self, name: impl Into<String>, system: S) {
        let name = name.into();
        log::debug!("schedule: registered system #{} `{}`", self.systems.len(), name);
        self.systems.push(NamedSystem {
            name,
            system: Box::new(system),
        });
    }

    /// Run all systems in order on the given world.
    pub fn run(&mut self, world: &mut World, dt: f32) {
        #[cfg(feature = "diagnostics")]
        {
            self.timings.clear();
            for ns in &mut self.systems {
                let start = std::time::Instant::now();
                ns.system.update(world, dt);
                let elapsed = start.elapsed();
                self.timings.push(SystemTiming {
                    name: ns.name.clone(),
                    duration_us: elapsed.as_secs_f64() * 1_000_000.0,
                });
            }
        }
        #[cfg(not(feature = "diagnostics"))]
        {
            for ns in &mut self.systems {
                ns.system.update(world, dt);
            }
        }
    }

    /// Names of the registered systems, in run order.
    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|ns| ns.name.as_str())
    }

    /// Timings from the most recent [`run`](Self::run).
    #[cfg(feature = "diagnostics")]
    pub fn timings(&self) -> &[SystemTiming] {
        &self.timings
    }

    /// Returns the number of systems in this schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the module path from a fully-qualified type name, keeping only the
/// last meaningful segment (e.g. `sleipnir::physics::integrator::Integrator`
/// → `Integrator`, `{{closure}}` → `<closure>`).
fn short_system_name(full: &str) -> String {
    let name = full.rsplit("::").next().unwrap_or(full);
    if name.contains("closure") {
        "<closure>".to_string()
    } else {
        name.to_string()
    }
}
