pub mod errors;
pub mod schedule;

pub use errors::ScheduleError;
pub use schedule::{calculate_taking_times, Schedule, Taking, TakingTime};
