pub mod schedule_mapper;

pub use schedule_mapper::ScheduleMapper;
