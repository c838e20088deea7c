use log::info;

use crate::bucket::TimeMS;

/// A trait used to represent a scheduler. The scheduler owns the simulation
/// state and is triggered once per tick until the configured duration is
/// reached. Timer mechanics live outside this trait so that tests can step a
/// scheduler deterministically without wall-clock waits.
pub trait Scheduler: Send {
    fn duration(&self) -> TimeMS;
    fn initialize(&mut self);
    fn trigger(&mut self) -> TimeMS;
    fn terminate(self);
}

/// Drives a scheduler from time zero to its duration. The loop never aborts a
/// tick in flight; teardown happens in `terminate` after the last tick
/// completes.
pub fn run_simulation<S: Scheduler>(mut scheduler: S) {
    let end_time = scheduler.duration();
    let mut now = TimeMS::default();
    scheduler.initialize();
    info!("Starting the simulation.");
    while now < end_time {
        now = scheduler.trigger();
    }
    info!("Simulation completed at {}.", now);
    scheduler.terminate();
}
