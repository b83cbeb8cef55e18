mod rate_scheduler;
mod run_summary;
mod schedule_window;
mod start_gate;
mod tick_cadence;

pub use self::{
    rate_scheduler::RateScheduler, run_summary::RunSummary, schedule_window::ScheduleWindow,
    start_gate::StartGate, tick_cadence::TickCadence,
};
