//! Logging setup and per-system timing reports.

#[cfg(feature = "diagnostics")]
use std::fmt::Write;

#[cfg(feature = "diagnostics")]
use crate::ecs::Schedule;

/// Install `env_logger` as the `log` backend.
///
/// Defaults to `info` for this crate; `RUST_LOG` overrides it. Safe to call
/// more than once (later calls are no-ops).
pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .filter_module("sleipnir", log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Human-readable table of the last tick's system timings.
///
/// ```text
/// ForceSystem              1.2 µs
/// Integrator              14.8 µs
/// total                   16.0 µs
/// ```
#[cfg(feature = "diagnostics")]
pub fn timing_report(schedule: &Schedule) -> String {
    let mut out = String::new();
    let mut total = 0.0;
    for timing in schedule.timings() {
        total += timing.duration_us;
        let _ = writeln!(out, "{:<22} {:>8.1} µs", timing.name, timing.duration_us);
    }
    let _ = writeln!(out, "{:<22} {:>8.1} µs", "total", total);
    out
}

#[cfg(all(test, feature = "diagnostics"))]
mod tests {
    use super::*;
    use crate::ecs::World;

    #[test]
    fn report_lists_every_system() {
        let mut schedule = Schedule::new();
        schedule.add_named_system("first", |_: &mut World, _: f32| {});
        schedule.add_named_system("second", |_: &mut World, _: f32| {});
        schedule.run(&mut World::new(), 0.016);

        let report = timing_report(&schedule);
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("first"));
        assert!(lines[1].starts_with("second"));
        assert!(lines[2].starts_with("total"));
    }

    #[test]
    fn init_logger_is_idempotent() {
        init_logger();
        init_logger();
        log::info!("logger ready");
    }
}
